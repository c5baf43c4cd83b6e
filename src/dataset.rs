//! Synthetic input generators for the benchmark harness

use std::fmt;
use std::str::FromStr;

use clap::ValueEnum;
use rand::Rng;

/// Shape of the generated input sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum Distribution {
    /// Uniform keys over the 32-bit signed range
    Random,
    /// `0, 1, ..., n - 1`
    Sorted,
    /// `n, n - 1, ..., 1`
    Reverse,
    /// Sorted with a few short-range swaps
    #[value(alias = "nearly-sorted")]
    Nearly,
}

impl Distribution {
    /// All distributions, in the order the harness reports them
    pub const ALL: [Distribution; 4] = [
        Distribution::Random,
        Distribution::Sorted,
        Distribution::Reverse,
        Distribution::Nearly,
    ];

    /// Name used on the command line and in CSV labels
    pub fn name(&self) -> &'static str {
        match self {
            Distribution::Random => "random",
            Distribution::Sorted => "sorted",
            Distribution::Reverse => "reverse",
            Distribution::Nearly => "nearly",
        }
    }

    /// Generates `n` keys with this shape
    pub fn generate<R: Rng + ?Sized>(&self, n: usize, rng: &mut R) -> Vec<i64> {
        match self {
            Distribution::Random => (0..n)
                .map(|_| rng.gen_range(i64::from(i32::MIN)..i64::from(i32::MAX)))
                .collect(),
            Distribution::Sorted => (0..n as i64).collect(),
            Distribution::Reverse => (1..=n as i64).rev().collect(),
            Distribution::Nearly => {
                let mut data: Vec<i64> = (0..n as i64).collect();
                if n == 0 {
                    return data;
                }
                for _ in 0..(n / 20).max(1) {
                    let i = rng.gen_range(0..n);
                    let j = (i + rng.gen_range(0..5)).min(n - 1);
                    data.swap(i, j);
                }
                data
            }
        }
    }
}

impl fmt::Display for Distribution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when parsing an unknown distribution name
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown distribution `{0}` (expected random, sorted, reverse or nearly)")]
pub struct ParseDistributionError(String);

impl FromStr for Distribution {
    type Err = ParseDistributionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "random" => Ok(Distribution::Random),
            "sorted" => Ok(Distribution::Sorted),
            "reverse" => Ok(Distribution::Reverse),
            "nearly" | "nearly-sorted" => Ok(Distribution::Nearly),
            other => Err(ParseDistributionError(other.to_string())),
        }
    }
}
