//! Immutable settings for one run.

use crate::kernel::{KernelParams, DEFAULT_EPS2};
use crate::oracle::DEFAULT_TOLERANCE;

pub const DEFAULT_EXPONENT: u32 = 14;
pub const DEFAULT_SEED: u64 = 0x5eed_2d6b;
pub const MAX_LANES: usize = 16;

// Adjacent j indices handed to one rayon task before it may be split further.
const DEFAULT_MIN_CHUNK: usize = 256;

// Floating point operations per pair evaluation.
const FLOPS_PER_PAIR: f64 = 20.0;

#[derive(Clone, Debug, PartialEq)]
pub struct RunConfig {
    pub exponent: u32,
    pub eps2: f32,
    pub tolerance: f32,
    pub seed: u64,
    pub lanes: usize,
    pub threads: usize,
    pub min_chunk: usize,
}

impl Default for RunConfig {
    fn default() -> Self {
        RunConfig::new(DEFAULT_EXPONENT)
    }
}

impl RunConfig {
    pub fn new(exponent: u32) -> Self {
        RunConfig {
            exponent,
            eps2: DEFAULT_EPS2,
            tolerance: DEFAULT_TOLERANCE,
            seed: DEFAULT_SEED,
            lanes: MAX_LANES,
            threads: num_cpus::get(),
            min_chunk: DEFAULT_MIN_CHUNK,
        }
    }

    /// Lane width rounded up to a power of two and capped at [`MAX_LANES`].
    pub fn with_lanes(mut self, lanes: usize) -> Self {
        self.lanes = lanes.max(1).next_power_of_two().min(MAX_LANES);
        self
    }

    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads.max(1);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// `2^exponent`.
    ///
    /// # Panics
    ///
    /// If the exponent does not fit in a `usize` shift (64 or more on 64-bit
    /// targets). Exponents are not validated when parsed.
    pub fn body_count(&self) -> usize {
        1usize
            .checked_shl(self.exponent)
            .expect("problem size exponent too large for usize")
    }

    pub fn kernel(&self) -> KernelParams {
        KernelParams::new(self.eps2)
    }

    /// Work of one full N x N pass in GFLOP.
    pub fn gflop_count(&self) -> f64 {
        gflop_count(self.body_count())
    }
}

pub fn gflop_count(n: usize) -> f64 {
    let n = n as f64;
    FLOPS_PER_PAIR * n * n * 1e-9
}

/// Reads the problem-size exponent; anything absent or non-numeric means the default.
pub fn parse_exponent(arg: Option<&str>) -> u32 {
    arg.and_then(|s| s.trim().parse().ok())
        .unwrap_or(DEFAULT_EXPONENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exponent_falls_back_to_default() {
        assert_eq!(parse_exponent(None), 14);
        assert_eq!(parse_exponent(Some("abc")), 14);
        assert_eq!(parse_exponent(Some("")), 14);
        assert_eq!(parse_exponent(Some("10")), 10);
        assert_eq!(parse_exponent(Some(" 3 ")), 3);
    }

    #[test]
    fn body_count_is_power_of_two() {
        assert_eq!(RunConfig::default().body_count(), 16384);
        assert_eq!(RunConfig::new(0).body_count(), 1);
        assert_eq!(RunConfig::new(2).body_count(), 4);
    }

    #[test]
    #[should_panic(expected = "problem size exponent too large")]
    fn oversized_exponent_panics() {
        RunConfig::new(usize::BITS).body_count();
    }

    #[test]
    fn lanes_are_bounded() {
        assert_eq!(RunConfig::new(4).with_lanes(0).lanes, 1);
        assert_eq!(RunConfig::new(4).with_lanes(3).lanes, 4);
        assert_eq!(RunConfig::new(4).with_lanes(64).lanes, MAX_LANES);
    }

    #[test]
    fn gflops_follow_pair_count() {
        assert!((gflop_count(1000) - 0.02).abs() < 1e-12);
        assert!((RunConfig::new(1).gflop_count() - 80e-9).abs() < 1e-18);
    }
}
