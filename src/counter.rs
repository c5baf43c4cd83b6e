//! Operation counting and CSV export
//!
//! [`OperationCounter`] keeps five independent tallies (comparisons, swaps,
//! array accesses, allocations and method calls) in atomics, so a single
//! counter can be shared by reference across heaps and call sites. Exporting
//! appends one CSV row per call under a mutex, so rows from different callers
//! never interleave.
//!
//! # Example
//!
//! ```rust
//! use instrumented_max_heap::{MaxHeap, OperationCounter};
//!
//! let counter = OperationCounter::new();
//! let mut heap = MaxHeap::with_capacity_and_counter(4, &counter);
//! heap.insert(1);
//! heap.insert(2);
//!
//! assert_eq!(counter.comparisons(), 1);
//! assert_eq!(counter.swaps(), 1);
//! ```

use std::fs::OpenOptions;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;

use crate::traits::OpCounter;

/// Header row written to a fresh CSV file
pub const CSV_HEADER: &str =
    "label,n,time_ms,comparisons,swaps,array_accesses,allocations,method_calls";

/// Point-in-time copy of the five tallies
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CounterSnapshot {
    /// Element comparisons
    pub comparisons: u64,
    /// Element swaps
    pub swaps: u64,
    /// Buffer slot reads and writes
    pub array_accesses: u64,
    /// Buffer allocations
    pub allocations: u64,
    /// Public method calls
    pub method_calls: u64,
}

impl CounterSnapshot {
    /// Formats a CSV row for this snapshot
    pub fn csv_row(&self, label: &str, n: usize, time_ms: u128) -> String {
        format!(
            "{},{},{},{},{},{},{},{}",
            label,
            n,
            time_ms,
            self.comparisons,
            self.swaps,
            self.array_accesses,
            self.allocations,
            self.method_calls
        )
    }
}

/// Thread-safe tally of heap operations
#[derive(Debug, Default)]
pub struct OperationCounter {
    comparisons: AtomicU64,
    swaps: AtomicU64,
    array_accesses: AtomicU64,
    allocations: AtomicU64,
    method_calls: AtomicU64,
    export_lock: Mutex<()>,
}

impl OperationCounter {
    /// Creates a counter with every tally at zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Element comparisons recorded so far
    pub fn comparisons(&self) -> u64 {
        self.comparisons.load(Ordering::Relaxed)
    }

    /// Element swaps recorded so far
    pub fn swaps(&self) -> u64 {
        self.swaps.load(Ordering::Relaxed)
    }

    /// Buffer reads and writes recorded so far
    pub fn array_accesses(&self) -> u64 {
        self.array_accesses.load(Ordering::Relaxed)
    }

    /// Buffer allocations recorded so far
    pub fn allocations(&self) -> u64 {
        self.allocations.load(Ordering::Relaxed)
    }

    /// Public method calls recorded so far
    pub fn method_calls(&self) -> u64 {
        self.method_calls.load(Ordering::Relaxed)
    }

    /// Copies all five tallies
    ///
    /// Each tally is read independently, so a snapshot taken while another
    /// thread is counting may mix values from slightly different moments.
    pub fn snapshot(&self) -> CounterSnapshot {
        CounterSnapshot {
            comparisons: self.comparisons(),
            swaps: self.swaps(),
            array_accesses: self.array_accesses(),
            allocations: self.allocations(),
            method_calls: self.method_calls(),
        }
    }

    /// Sets every tally back to zero
    pub fn reset(&self) {
        self.comparisons.store(0, Ordering::Relaxed);
        self.swaps.store(0, Ordering::Relaxed);
        self.array_accesses.store(0, Ordering::Relaxed);
        self.allocations.store(0, Ordering::Relaxed);
        self.method_calls.store(0, Ordering::Relaxed);
    }

    /// Appends one row with the current tallies to the CSV file at `path`
    ///
    /// The header is written first if the file does not exist yet. Appends
    /// through the same counter are serialized.
    pub fn append_csv<P: AsRef<Path>>(
        &self,
        path: P,
        label: &str,
        n: usize,
        time_ms: u128,
    ) -> io::Result<()> {
        let path = path.as_ref();
        let _guard = self.export_lock.lock();

        let write_header = !path.exists();
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        let mut out = BufWriter::new(file);
        if write_header {
            writeln!(out, "{}", CSV_HEADER)?;
        }
        writeln!(out, "{}", self.snapshot().csv_row(label, n, time_ms))?;
        out.flush()
    }
}

impl OpCounter for OperationCounter {
    fn add_comparisons(&self, n: u64) {
        self.comparisons.fetch_add(n, Ordering::Relaxed);
    }

    fn add_swaps(&self, n: u64) {
        self.swaps.fetch_add(n, Ordering::Relaxed);
    }

    fn add_array_accesses(&self, n: u64) {
        self.array_accesses.fetch_add(n, Ordering::Relaxed);
    }

    fn add_allocations(&self, n: u64) {
        self.allocations.fetch_add(n, Ordering::Relaxed);
    }

    fn add_method_calls(&self, n: u64) {
        self.method_calls.fetch_add(n, Ordering::Relaxed);
    }
}
