//! Benchmark harness
//!
//! Each repetition exercises the heap in four phases over the same base data
//! and appends one CSV row per phase:
//!
//! 1. `build_heap`: bulk build from a copy of the data
//! 2. `insert_n`: insert every key into a heap that starts at 16 slots
//! 3. `increase_key_batch`: `max(1, n / 10)` random key increases
//! 4. `extract_all`: drain with `extract_max`
//!
//! Labels are `<phase>:<distribution>`. The counter is reset before every
//! phase, so each row reports only that phase's work.

use std::hint::black_box;
use std::io;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use log::{debug, info};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::counter::{CounterSnapshot, OperationCounter};
use crate::dataset::Distribution;
use crate::max_heap::MaxHeap;
use crate::traits::HeapError;

/// Initial capacity of the heap used by the `insert_n` phase
pub const INSERT_PHASE_CAPACITY: usize = 16;

/// Largest amount a key is raised by in the `increase_key_batch` phase
pub const MAX_KEY_INCREMENT: i64 = 1000;

/// Errors that abort a benchmark run
#[derive(Debug, thiserror::Error)]
pub enum BenchError {
    /// A heap operation failed mid-run
    #[error("heap operation failed during {phase}: {source}")]
    Heap {
        /// Phase that was running
        phase: Phase,
        /// The heap's error
        #[source]
        source: HeapError,
    },
    /// Drained keys came out of order
    #[error("extract_max returned {next} after {previous}")]
    OrderViolation {
        /// Key extracted first
        previous: i64,
        /// Larger key extracted later
        next: i64,
    },
    /// The CSV log could not be written
    #[error("failed to append to {}: {}", .path.display(), .source)]
    Csv {
        /// Target file
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },
}

/// One measured phase of a repetition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Bulk build
    BuildHeap,
    /// Repeated insert
    InsertN,
    /// Random key increases
    IncreaseKeyBatch,
    /// Drain via `extract_max`
    ExtractAll,
}

impl Phase {
    /// Name used in CSV labels
    pub fn name(&self) -> &'static str {
        match self {
            Phase::BuildHeap => "build_heap",
            Phase::InsertN => "insert_n",
            Phase::IncreaseKeyBatch => "increase_key_batch",
            Phase::ExtractAll => "extract_all",
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Settings for a benchmark run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BenchConfig {
    /// Number of keys per repetition
    pub n: usize,
    /// Number of repetitions
    pub runs: usize,
    /// CSV file that rows are appended to
    pub csv: PathBuf,
    /// Input distribution
    pub dist: Distribution,
    /// RNG seed; `None` seeds from the OS
    pub seed: Option<u64>,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            n: 1000,
            runs: 3,
            csv: PathBuf::from("heap-bench.csv"),
            dist: Distribution::Random,
            seed: None,
        }
    }
}

/// Measurements of one phase, as written to the CSV log
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhaseResult {
    /// Repetition this phase belongs to, starting at 0
    pub run: usize,
    /// Which phase
    pub phase: Phase,
    /// CSV label, `<phase>:<distribution>`
    pub label: String,
    /// Wall-clock time of the phase
    pub elapsed: Duration,
    /// Counter values at the end of the phase
    pub counts: CounterSnapshot,
}

/// Outcome of a complete run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BenchSummary {
    /// Every phase that was logged, in order
    pub phases: Vec<PhaseResult>,
    /// Sum of all extracted keys, per repetition
    pub checksums: Vec<i64>,
}

impl BenchSummary {
    /// Number of CSV rows written
    pub fn rows_written(&self) -> usize {
        self.phases.len()
    }
}

/// Runs the benchmark described by `config`
///
/// # Errors
/// Stops at the first heap error, out-of-order extraction or CSV write
/// failure. Rows already written stay in the file.
pub fn run(config: &BenchConfig) -> Result<BenchSummary, BenchError> {
    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let base = config.dist.generate(config.n, &mut rng);
    let counter = OperationCounter::new();
    let mut runner = Runner {
        config,
        counter: &counter,
        summary: BenchSummary::default(),
    };

    info!(
        "benchmarking n={} runs={} dist={} -> {}",
        config.n,
        config.runs,
        config.dist,
        config.csv.display()
    );

    for run in 0..config.runs {
        let checksum = runner.run_once(run, &base, &mut rng)?;
        runner.summary.checksums.push(checksum);
        info!("run {} finished, checksum {}", run, checksum);
    }

    Ok(runner.summary)
}

struct Runner<'a> {
    config: &'a BenchConfig,
    counter: &'a OperationCounter,
    summary: BenchSummary,
}

impl<'a> Runner<'a> {
    fn run_once(&mut self, run: usize, base: &[i64], rng: &mut StdRng) -> Result<i64, BenchError> {
        let counter = self.counter;

        counter.reset();
        let start = Instant::now();
        let heap = MaxHeap::from_slice_with_counter(base, counter);
        self.record(run, Phase::BuildHeap, start.elapsed())?;
        black_box(heap);

        counter.reset();
        let start = Instant::now();
        let mut heap = MaxHeap::with_capacity_and_counter(INSERT_PHASE_CAPACITY, counter);
        for &key in base {
            heap.insert(key);
        }
        self.record(run, Phase::InsertN, start.elapsed())?;

        if heap.is_empty() {
            debug!("run {}: heap is empty, skipping {}", run, Phase::IncreaseKeyBatch);
        } else {
            counter.reset();
            let start = Instant::now();
            increase_key_batch(&mut heap, rng)?;
            self.record(run, Phase::IncreaseKeyBatch, start.elapsed())?;
        }

        counter.reset();
        let start = Instant::now();
        let checksum = drain(&mut heap)?;
        self.record(run, Phase::ExtractAll, start.elapsed())?;

        Ok(black_box(checksum))
    }

    fn record(&mut self, run: usize, phase: Phase, elapsed: Duration) -> Result<(), BenchError> {
        let label = format!("{}:{}", phase, self.config.dist);
        let n = self.config.n;
        self.counter
            .append_csv(&self.config.csv, &label, n, elapsed.as_millis())
            .map_err(|source| BenchError::Csv {
                path: self.config.csv.clone(),
                source,
            })?;

        let counts = self.counter.snapshot();
        debug!(
            "run {}: {} took {:?} ({} comparisons, {} swaps)",
            run, label, elapsed, counts.comparisons, counts.swaps
        );
        self.summary.phases.push(PhaseResult {
            run,
            phase,
            label,
            elapsed,
            counts,
        });
        Ok(())
    }
}

fn increase_key_batch(
    heap: &mut MaxHeap<&OperationCounter>,
    rng: &mut StdRng,
) -> Result<(), BenchError> {
    let heap_err = |source| BenchError::Heap {
        phase: Phase::IncreaseKeyBatch,
        source,
    };
    let ops = (heap.len() / 10).max(1);
    for _ in 0..ops {
        let index = rng.gen_range(0..heap.len());
        let current = heap.get(index).map_err(heap_err)?;
        let new_key = current.saturating_add(rng.gen_range(1..=MAX_KEY_INCREMENT));
        heap.increase_key(index, new_key).map_err(heap_err)?;
    }
    Ok(())
}

fn drain(heap: &mut MaxHeap<&OperationCounter>) -> Result<i64, BenchError> {
    let mut checksum = 0i64;
    let mut previous: Option<i64> = None;
    while !heap.is_empty() {
        let key = heap.extract_max().map_err(|source| BenchError::Heap {
            phase: Phase::ExtractAll,
            source,
        })?;
        if let Some(previous) = previous {
            if key > previous {
                return Err(BenchError::OrderViolation {
                    previous,
                    next: key,
                });
            }
        }
        previous = Some(key);
        checksum = checksum.wrapping_add(key);
    }
    Ok(checksum)
}
