//! Instrumented Binary Max-Heap
//!
//! This crate provides an array-backed binary max-heap of `i64` keys that can
//! report every comparison, swap, array access, allocation and method call to
//! an operation counter, plus a small harness that times heap workloads and
//! appends the results to a CSV log.
//!
//! # Features
//!
//! - **MaxHeap**: O(log n) insert, extract-max and increase-key; O(1) max; O(n) bulk build
//! - **OperationCounter**: atomic tallies with CSV export
//! - **Benchmark harness**: build / insert / increase-key / drain phases over
//!   random, sorted, reverse and nearly-sorted inputs
//!
//! # Example
//!
//! ```rust
//! use instrumented_max_heap::{MaxHeap, OperationCounter};
//!
//! let counter = OperationCounter::new();
//! let mut heap = MaxHeap::from_slice_with_counter(&[3, 1, 6, 5, 2, 4], &counter);
//! heap.insert(9);
//!
//! assert_eq!(heap.max(), Ok(9));
//! assert_eq!(heap.extract_max(), Ok(9));
//! assert_eq!(heap.extract_max(), Ok(6));
//! assert!(counter.comparisons() > 0);
//! ```

pub mod bench;
pub mod counter;
pub mod dataset;
pub mod max_heap;
pub mod traits;

// Re-export the main types for convenience
pub use counter::{CounterSnapshot, OperationCounter};
pub use dataset::Distribution;
pub use max_heap::MaxHeap;
pub use traits::{HeapError, InvalidArgument, NoopCounter, OpCounter};
