//! Array-backed binary max-heap
//!
//! [`MaxHeap`] keeps `i64` keys in a flat buffer where the children of slot
//! `i` live at `2i + 1` and `2i + 2`. Every parent is at least as large as its
//! children, so the maximum is always at slot 0.
//!
//! The buffer is managed by hand rather than through `Vec`'s own growth: it
//! starts at `max(1, capacity)` slots and doubles whenever an insert would
//! overflow it. It never shrinks. Owning the growth decision is what lets the
//! heap report every reallocation to its [`OpCounter`].
//!
//! # Time Complexity
//!
//! | Operation      | Complexity         |
//! |----------------|--------------------|
//! | `insert`       | O(log n) amortized |
//! | `max` / `get`  | O(1)               |
//! | `extract_max`  | O(log n)           |
//! | `increase_key` | O(log n)           |
//! | bulk build     | O(n)               |
//!
//! # Example
//!
//! ```rust
//! use instrumented_max_heap::MaxHeap;
//!
//! let mut heap = MaxHeap::with_capacity(4);
//! heap.insert(5);
//! heap.insert(7);
//! heap.insert(3);
//!
//! assert_eq!(heap.max(), Ok(7));
//! heap.increase_key(2, 30).unwrap();
//! assert_eq!(heap.extract_max(), Ok(30));
//! assert_eq!(heap.extract_max(), Ok(7));
//! ```

use std::fmt;

use crate::traits::{HeapError, InvalidArgument, NoopCounter, OpCounter};

#[inline]
const fn parent(i: usize) -> usize {
    (i - 1) / 2
}

#[inline]
const fn left(i: usize) -> usize {
    2 * i + 1
}

#[inline]
const fn right(i: usize) -> usize {
    2 * i + 2
}

/// A binary max-heap of `i64` keys with optional operation counting
///
/// The counter type `C` defaults to [`NoopCounter`]. Pass an
/// `&OperationCounter` (or an `Arc` of one) to record comparisons, swaps,
/// array accesses, allocations and method calls.
pub struct MaxHeap<C: OpCounter = NoopCounter> {
    /// Backing storage; `buf.len()` is the capacity
    buf: Box<[i64]>,
    /// Number of valid elements at the front of `buf`
    len: usize,
    counter: C,
}

impl MaxHeap {
    /// Creates an empty heap with room for one element
    pub fn new() -> Self {
        Self::with_capacity(1)
    }

    /// Creates an empty heap with room for `max(1, capacity)` elements
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_counter(capacity, NoopCounter)
    }

    /// Creates an empty heap from a signed capacity
    ///
    /// # Errors
    /// Returns `HeapError::InvalidArgument` if `capacity` is negative.
    pub fn try_with_capacity(capacity: i64) -> Result<Self, HeapError> {
        Self::try_with_capacity_and_counter(capacity, NoopCounter)
    }

    /// Builds a heap from a copy of `data` in linear time
    pub fn from_slice(data: &[i64]) -> Self {
        Self::from_slice_with_counter(data, NoopCounter)
    }
}

impl<C: OpCounter> MaxHeap<C> {
    /// Creates an empty heap with room for `max(1, capacity)` elements,
    /// reporting to `counter`
    pub fn with_capacity_and_counter(capacity: usize, counter: C) -> Self {
        counter.add_method_calls(1);
        counter.add_allocations(1);
        Self {
            buf: vec![0; capacity.max(1)].into_boxed_slice(),
            len: 0,
            counter,
        }
    }

    /// Signed-capacity variant of [`with_capacity_and_counter`](Self::with_capacity_and_counter)
    ///
    /// # Errors
    /// Returns `HeapError::InvalidArgument` if `capacity` is negative. Nothing
    /// is reported to the counter in that case.
    pub fn try_with_capacity_and_counter(capacity: i64, counter: C) -> Result<Self, HeapError> {
        let capacity = usize::try_from(capacity).map_err(|_| {
            HeapError::InvalidArgument(InvalidArgument::NegativeCapacity(capacity))
        })?;
        Ok(Self::with_capacity_and_counter(capacity, counter))
    }

    /// Builds a heap from a copy of `data`, reporting to `counter`
    ///
    /// The copy is counted as one allocation plus a read and a write per
    /// element.
    pub fn from_slice_with_counter(data: &[i64], counter: C) -> Self {
        counter.add_array_accesses(2 * data.len() as u64);
        Self::from_vec_with_counter(data.to_vec(), counter)
    }

    /// Builds a heap that takes ownership of `data`, reporting to `counter`
    ///
    /// Runs sift-down from the last parent back to the root, which restores
    /// the heap property in O(n) total.
    pub fn from_vec_with_counter(mut data: Vec<i64>, counter: C) -> Self {
        counter.add_method_calls(1);
        counter.add_allocations(1);
        let len = data.len();
        if data.is_empty() {
            data.push(0);
        }
        let mut heap = Self {
            buf: data.into_boxed_slice(),
            len,
            counter,
        };
        heap.heapify();
        heap
    }

    /// Returns the number of elements in the heap
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the heap holds no elements
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the number of allocated slots
    #[inline]
    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    /// Returns the counter this heap reports to
    pub fn counter(&self) -> &C {
        &self.counter
    }

    /// Returns the valid elements in heap order
    pub fn as_slice(&self) -> &[i64] {
        &self.buf[..self.len]
    }

    /// Returns the largest key without removing it
    ///
    /// # Errors
    /// Returns `HeapError::EmptyCollection` if the heap is empty.
    pub fn max(&self) -> Result<i64, HeapError> {
        self.counter.add_method_calls(1);
        if self.len == 0 {
            return Err(HeapError::EmptyCollection);
        }
        self.counter.add_array_accesses(1);
        Ok(self.buf[0])
    }

    /// Returns the key stored at `index` in heap order
    ///
    /// # Errors
    /// Returns `HeapError::IndexOutOfRange` if `index >= len()`.
    pub fn get(&self, index: usize) -> Result<i64, HeapError> {
        self.counter.add_method_calls(1);
        self.check_index(index)?;
        self.counter.add_array_accesses(1);
        Ok(self.buf[index])
    }

    /// Inserts a key, doubling the buffer first if it is full
    pub fn insert(&mut self, key: i64) {
        self.counter.add_method_calls(1);
        self.reserve_for(self.len + 1);
        self.buf[self.len] = key;
        self.counter.add_array_accesses(1);
        self.len += 1;
        self.sift_up(self.len - 1);
    }

    /// Raises the key at `index` to `new_key`
    ///
    /// Only sift-up runs afterwards: a larger key can violate the heap
    /// property towards the root but never towards the leaves. Passing the
    /// current key is accepted and changes nothing.
    ///
    /// # Errors
    /// Returns `HeapError::IndexOutOfRange` if `index >= len()`, and
    /// `HeapError::InvalidArgument` if `new_key` is less than the current key.
    pub fn increase_key(&mut self, index: usize, new_key: i64) -> Result<(), HeapError> {
        self.counter.add_method_calls(1);
        self.check_index(index)?;
        let current = self.buf[index];
        self.counter.add_array_accesses(1);
        if new_key < current {
            return Err(HeapError::InvalidArgument(InvalidArgument::KeyDecreased {
                current,
                requested: new_key,
            }));
        }
        self.buf[index] = new_key;
        self.counter.add_array_accesses(1);
        self.sift_up(index);
        Ok(())
    }

    /// Removes and returns the largest key
    ///
    /// # Errors
    /// Returns `HeapError::EmptyCollection` if the heap is empty.
    pub fn extract_max(&mut self) -> Result<i64, HeapError> {
        self.counter.add_method_calls(1);
        if self.len == 0 {
            return Err(HeapError::EmptyCollection);
        }
        let top = self.buf[0];
        self.counter.add_array_accesses(1);

        self.len -= 1;
        if self.len > 0 {
            self.buf[0] = self.buf[self.len];
            self.counter.add_array_accesses(2);
            self.sift_down(0);
        }
        Ok(top)
    }

    /// Drains the heap into a vector in non-increasing order
    pub fn into_sorted_vec(mut self) -> Vec<i64> {
        let mut out = Vec::with_capacity(self.len);
        while let Ok(key) = self.extract_max() {
            out.push(key);
        }
        out
    }

    /// Checks the heap property over all valid elements
    pub fn is_valid_heap(&self) -> bool {
        let data = self.as_slice();
        (1..data.len()).all(|i| data[parent(i)] >= data[i])
    }

    fn check_index(&self, index: usize) -> Result<(), HeapError> {
        if index >= self.len {
            return Err(HeapError::IndexOutOfRange {
                index,
                len: self.len,
            });
        }
        Ok(())
    }

    /// Doubles the buffer until it holds at least `needed` slots
    fn reserve_for(&mut self, needed: usize) {
        if needed <= self.buf.len() {
            return;
        }
        let mut new_capacity = self.buf.len();
        while new_capacity < needed {
            new_capacity = new_capacity.saturating_mul(2);
        }

        let mut grown = vec![0; new_capacity].into_boxed_slice();
        grown[..self.len].copy_from_slice(&self.buf[..self.len]);
        self.buf = grown;

        self.counter.add_allocations(1);
        self.counter.add_array_accesses(2 * self.len as u64);
    }

    fn heapify(&mut self) {
        if self.len < 2 {
            return;
        }
        for i in (0..=parent(self.len - 1)).rev() {
            self.sift_down(i);
        }
    }

    /// Returns true if the key at `a` is strictly less than the key at `b`
    #[inline]
    fn less(&self, a: usize, b: usize) -> bool {
        self.counter.add_comparisons(1);
        self.counter.add_array_accesses(2);
        self.buf[a] < self.buf[b]
    }

    #[inline]
    fn swap(&mut self, a: usize, b: usize) {
        self.counter.add_swaps(1);
        self.counter.add_array_accesses(4);
        self.buf.swap(a, b);
    }

    /// Move element at index up to maintain heap property
    fn sift_up(&mut self, mut index: usize) {
        while index > 0 {
            let p = parent(index);
            if self.less(p, index) {
                self.swap(p, index);
                index = p;
            } else {
                break;
            }
        }
    }

    /// Move element at index down to maintain heap property
    ///
    /// Only a strictly greater child is swapped up, and the left child wins
    /// a tie with the right one.
    fn sift_down(&mut self, mut index: usize) {
        while left(index) < self.len {
            let l = left(index);
            let r = right(index);
            let mut largest = index;

            if self.less(largest, l) {
                largest = l;
            }
            if r < self.len && self.less(largest, r) {
                largest = r;
            }

            if largest != index {
                self.swap(index, largest);
                index = largest;
            } else {
                break;
            }
        }
    }
}

impl Default for MaxHeap {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: OpCounter + Clone> Clone for MaxHeap<C> {
    fn clone(&self) -> Self {
        Self {
            buf: self.buf.clone(),
            len: self.len,
            counter: self.counter.clone(),
        }
    }
}

impl<C: OpCounter> fmt::Debug for MaxHeap<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MaxHeap")
            .field("len", &self.len)
            .field("capacity", &self.buf.len())
            .field("elements", &self.as_slice())
            .finish()
    }
}

impl From<Vec<i64>> for MaxHeap {
    fn from(data: Vec<i64>) -> Self {
        Self::from_vec_with_counter(data, NoopCounter)
    }
}

impl FromIterator<i64> for MaxHeap {
    fn from_iter<I: IntoIterator<Item = i64>>(iter: I) -> Self {
        Self::from(iter.into_iter().collect::<Vec<_>>())
    }
}

impl<C: OpCounter> Extend<i64> for MaxHeap<C> {
    fn extend<I: IntoIterator<Item = i64>>(&mut self, iter: I) {
        for key in iter {
            self.insert(key);
        }
    }
}
