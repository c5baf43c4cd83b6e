//! Command-line benchmark driver
//!
//! ```bash
//! heap-bench --n 10000 --runs 3 --csv results.csv --dist random
//! RUST_LOG=debug heap-bench --n 1000 --dist nearly --seed 7
//! ```

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use instrumented_max_heap::bench::{self, BenchConfig};
use instrumented_max_heap::Distribution;

#[derive(Parser, Debug)]
#[command(name = "heap-bench")]
#[command(about = "Time max-heap operations and append operation counts to a CSV log")]
struct Args {
    /// Number of keys per run
    #[arg(long, default_value_t = 1000)]
    n: usize,

    /// Number of repetitions
    #[arg(long, default_value_t = 3)]
    runs: usize,

    /// CSV file to append results to
    #[arg(long, default_value = "heap-bench.csv")]
    csv: PathBuf,

    /// Input distribution
    #[arg(long, value_enum, default_value_t = Distribution::Random)]
    dist: Distribution,

    /// Seed for reproducible inputs
    #[arg(long)]
    seed: Option<u64>,
}

impl From<Args> for BenchConfig {
    fn from(args: Args) -> Self {
        BenchConfig {
            n: args.n,
            runs: args.runs,
            csv: args.csv,
            dist: args.dist,
            seed: args.seed,
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = BenchConfig::from(Args::parse());
    let summary = bench::run(&config)
        .with_context(|| format!("benchmark writing to {} failed", config.csv.display()))?;

    log::debug!("{} rows written", summary.rows_written());
    println!("Done. Results -> {}", config.csv.display());
    Ok(())
}
