//! Common types shared by the heap and its instrumentation
//!
//! This module provides:
//!
//! - [`HeapError`]: the error type returned by fallible heap operations
//! - [`OpCounter`]: the capability a heap notifies about the work it does
//! - [`NoopCounter`]: the zero-sized default counter that ignores everything
//!
//! Instrumentation is a type parameter rather than a trait object, so an
//! uninstrumented [`MaxHeap`](crate::max_heap::MaxHeap) compiles down to the
//! bare algorithm.

use std::fmt;
use std::sync::Arc;

/// Error type for heap operations
///
/// Every error is detected before the heap is touched, so a failed call
/// leaves the structure exactly as it was.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeapError {
    /// An argument violated the operation's contract
    InvalidArgument(InvalidArgument),
    /// `max` or `extract_max` was called on an empty heap
    EmptyCollection,
    /// The index does not name a valid element
    IndexOutOfRange {
        /// The requested index
        index: usize,
        /// The heap size at the time of the call
        len: usize,
    },
}

/// Which contract an [`HeapError::InvalidArgument`] refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidArgument {
    /// A negative initial capacity was requested
    NegativeCapacity(i64),
    /// `increase_key` was asked to lower a key
    KeyDecreased {
        /// Key currently stored at the index
        current: i64,
        /// The rejected replacement
        requested: i64,
    },
}

impl fmt::Display for HeapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HeapError::InvalidArgument(InvalidArgument::NegativeCapacity(capacity)) => {
                write!(f, "invalid argument: capacity {} is negative", capacity)
            }
            HeapError::InvalidArgument(InvalidArgument::KeyDecreased { current, requested }) => {
                write!(
                    f,
                    "invalid argument: new key {} is less than current key {}",
                    requested, current
                )
            }
            HeapError::EmptyCollection => write!(f, "heap is empty"),
            HeapError::IndexOutOfRange { index, len } => {
                write!(f, "index {} out of range for heap of size {}", index, len)
            }
        }
    }
}

impl std::error::Error for HeapError {}

/// Receiver for operation counts reported by a heap
///
/// A heap calls these hooks for every comparison, swap, element access,
/// buffer allocation and public method call. Implementations must not
/// influence the heap: results are identical with any counter attached.
///
/// All hooks take `&self` so one counter can be shared between heaps;
/// implementations that need mutation use interior mutability (see
/// [`OperationCounter`](crate::counter::OperationCounter)).
///
/// Every method defaults to doing nothing.
pub trait OpCounter {
    /// Records `n` element comparisons
    fn add_comparisons(&self, n: u64) {
        let _ = n;
    }

    /// Records `n` element swaps
    fn add_swaps(&self, n: u64) {
        let _ = n;
    }

    /// Records `n` reads or writes of buffer slots
    fn add_array_accesses(&self, n: u64) {
        let _ = n;
    }

    /// Records `n` buffer allocations
    fn add_allocations(&self, n: u64) {
        let _ = n;
    }

    /// Records `n` public method calls
    fn add_method_calls(&self, n: u64) {
        let _ = n;
    }
}

/// Counter that discards every notification
///
/// This is the default counter type of [`MaxHeap`](crate::max_heap::MaxHeap).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoopCounter;

impl OpCounter for NoopCounter {}

impl<C: OpCounter + ?Sized> OpCounter for &C {
    fn add_comparisons(&self, n: u64) {
        (**self).add_comparisons(n)
    }

    fn add_swaps(&self, n: u64) {
        (**self).add_swaps(n)
    }

    fn add_array_accesses(&self, n: u64) {
        (**self).add_array_accesses(n)
    }

    fn add_allocations(&self, n: u64) {
        (**self).add_allocations(n)
    }

    fn add_method_calls(&self, n: u64) {
        (**self).add_method_calls(n)
    }
}

impl<C: OpCounter + ?Sized> OpCounter for Arc<C> {
    fn add_comparisons(&self, n: u64) {
        (**self).add_comparisons(n)
    }

    fn add_swaps(&self, n: u64) {
        (**self).add_swaps(n)
    }

    fn add_array_accesses(&self, n: u64) {
        (**self).add_array_accesses(n)
    }

    fn add_allocations(&self, n: u64) {
        (**self).add_allocations(n)
    }

    fn add_method_calls(&self, n: u64) {
        (**self).add_method_calls(n)
    }
}
