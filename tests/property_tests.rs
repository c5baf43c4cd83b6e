//! Property-based tests using proptest
//!
//! These tests generate random sequences of operations and verify that the
//! heap property, the maximum and the element multiset match a simple
//! vector oracle after every step.

use proptest::prelude::*;
use instrumented_max_heap::{HeapError, MaxHeap, OpCounter, OperationCounter};

#[derive(Debug, Clone)]
enum Op {
    Insert(i64),
    ExtractMax,
    /// Index is taken modulo the current size
    IncreaseKey(usize, i64),
    Max,
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => (-1000i64..1000).prop_map(Op::Insert),
        2 => Just(Op::ExtractMax),
        2 => (any::<usize>(), -50i64..500).prop_map(|(i, delta)| Op::IncreaseKey(i, delta)),
        1 => Just(Op::Max),
    ]
}

fn check_heap_property<C: OpCounter>(heap: &MaxHeap<C>) -> Result<(), TestCaseError> {
    let data = heap.as_slice();
    for i in 1..data.len() {
        prop_assert!(
            data[(i - 1) / 2] >= data[i],
            "heap property violated at index {}: {:?}",
            i,
            data
        );
    }
    Ok(())
}

fn sorted_desc(mut values: Vec<i64>) -> Vec<i64> {
    values.sort_unstable_by(|a, b| b.cmp(a));
    values
}

/// Applies `ops` to `heap` and to a vector oracle, checking both agree
fn run_against_oracle<C: OpCounter>(
    mut heap: MaxHeap<C>,
    mut oracle: Vec<i64>,
    ops: Vec<Op>,
) -> Result<(), TestCaseError> {
    for op in ops {
        let len_before = heap.len();
        match op {
            Op::Insert(key) => {
                heap.insert(key);
                oracle.push(key);
                prop_assert_eq!(heap.len(), len_before + 1);
            }
            Op::ExtractMax => {
                let expected = oracle.iter().copied().max();
                match expected {
                    Some(max) => {
                        prop_assert_eq!(heap.extract_max(), Ok(max));
                        let pos = oracle.iter().position(|&v| v == max).unwrap();
                        oracle.swap_remove(pos);
                        prop_assert_eq!(heap.len(), len_before - 1);
                    }
                    None => {
                        prop_assert_eq!(heap.extract_max(), Err(HeapError::EmptyCollection));
                        prop_assert!(heap.is_empty());
                    }
                }
            }
            Op::IncreaseKey(index, delta) => {
                if heap.is_empty() {
                    let is_out_of_range =
                        matches!(heap.increase_key(0, delta), Err(HeapError::IndexOutOfRange { .. }));
                    prop_assert!(is_out_of_range);
                    continue;
                }
                let index = index % heap.len();
                let current = heap.get(index).unwrap();
                let new_key = current + delta;
                let before = heap.as_slice().to_vec();
                let result = heap.increase_key(index, new_key);
                if delta < 0 {
                    let is_invalid = matches!(result, Err(HeapError::InvalidArgument(_)));
                    prop_assert!(is_invalid);
                    prop_assert_eq!(heap.as_slice(), &before[..]);
                } else {
                    prop_assert_eq!(result, Ok(()));
                    let pos = oracle.iter().position(|&v| v == current).unwrap();
                    oracle[pos] = new_key;
                }
                prop_assert_eq!(heap.len(), len_before);
            }
            Op::Max => {
                match oracle.iter().copied().max() {
                    Some(max) => prop_assert_eq!(heap.max(), Ok(max)),
                    None => prop_assert_eq!(heap.max(), Err(HeapError::EmptyCollection)),
                }
                prop_assert_eq!(heap.len(), len_before);
            }
        }

        check_heap_property(&heap)?;
        prop_assert_eq!(heap.len(), oracle.len());
        prop_assert_eq!(sorted_desc(heap.as_slice().to_vec()), sorted_desc(oracle.clone()));
    }

    prop_assert_eq!(heap.into_sorted_vec(), sorted_desc(oracle));
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn prop_operations_match_oracle(
        initial in prop::collection::vec(-1000i64..1000, 0..40),
        ops in prop::collection::vec(op_strategy(), 0..120),
    ) {
        let heap = MaxHeap::from_slice(&initial);
        run_against_oracle(heap, initial, ops)?;
    }

    #[test]
    fn prop_operations_match_oracle_with_counter(
        ops in prop::collection::vec(op_strategy(), 0..120),
        capacity in 0usize..8,
    ) {
        let counter = OperationCounter::new();
        let heap = MaxHeap::with_capacity_and_counter(capacity, &counter);
        run_against_oracle(heap, Vec::new(), ops)?;
    }

    #[test]
    fn prop_bulk_build_drains_sorted(values in prop::collection::vec(any::<i64>(), 0..300)) {
        let heap = MaxHeap::from_slice(&values);
        check_heap_property(&heap)?;
        prop_assert_eq!(heap.len(), values.len());
        prop_assert_eq!(heap.into_sorted_vec(), sorted_desc(values));
    }

    #[test]
    fn prop_inserts_drain_non_increasing(values in prop::collection::vec(any::<i64>(), 1..300)) {
        let mut heap = MaxHeap::with_capacity(1);
        for &v in &values {
            heap.insert(v);
            check_heap_property(&heap)?;
        }
        let mut previous = i64::MAX;
        let mut drained = Vec::new();
        while let Ok(v) = heap.extract_max() {
            prop_assert!(v <= previous, "{} extracted after {}", v, previous);
            previous = v;
            drained.push(v);
        }
        prop_assert_eq!(drained, sorted_desc(values));
    }

    #[test]
    fn prop_counter_is_invisible(values in prop::collection::vec(-100i64..100, 0..200)) {
        let counter = OperationCounter::new();
        let mut plain = MaxHeap::from_slice(&values);
        let mut counted = MaxHeap::from_slice_with_counter(&values, &counter);
        prop_assert_eq!(plain.as_slice(), counted.as_slice());

        for &v in values.iter().rev() {
            plain.insert(v);
            counted.insert(v);
        }
        prop_assert_eq!(plain.as_slice(), counted.as_slice());
        prop_assert_eq!(plain.capacity(), counted.capacity());
    }

    #[test]
    fn prop_capacity_is_power_of_two_multiple(start in 0usize..20, inserts in 0usize..500) {
        let mut heap = MaxHeap::with_capacity(start);
        let base = start.max(1);
        for i in 0..inserts {
            heap.insert(i as i64);
        }
        let capacity = heap.capacity();
        prop_assert!(capacity >= heap.len());
        prop_assert_eq!(capacity % base, 0);
        prop_assert!((capacity / base).is_power_of_two());
        // Never more than double what is needed
        prop_assert!(capacity == base || capacity < 2 * heap.len());
    }
}
