//! The three ways of running the all-pairs reduction.
//!
//! Every strategy walks the targets `i` in order and sums the kernel over all
//! sources `j`; they differ only in how that inner sum is executed.

use std::fmt;

use log::debug;
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuildError, ThreadPoolBuilder};

use crate::config::{RunConfig, MAX_LANES};
use crate::kernel::{Contribution, KernelParams};
use crate::particle::{Forces, ParticleSet};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Strategy {
    Sequential,
    Vectorized,
    Parallel,
}

impl Strategy {
    pub const ALL: [Strategy; 3] = [Strategy::Sequential, Strategy::Vectorized, Strategy::Parallel];

    pub fn label(&self) -> &'static str {
        match self {
            Strategy::Sequential => "serial",
            Strategy::Vectorized => "parallel (inner loop with vectorization)",
            Strategy::Parallel => "parallel (inner loop with parallel for)",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Owns what the strategies need beyond the particles: kernel constants, the
/// lane width and the worker pool.
pub struct Evaluator {
    params: KernelParams,
    lanes: usize,
    min_chunk: usize,
    pool: ThreadPool,
}

impl Evaluator {
    pub fn new(config: &RunConfig) -> Result<Self, ThreadPoolBuildError> {
        let pool = ThreadPoolBuilder::new()
            .num_threads(config.threads)
            .thread_name(|i| format!("pairwise-worker-{}", i))
            .build()?;
        debug!("worker pool ready with {} threads", pool.current_num_threads());
        Ok(Evaluator {
            params: config.kernel(),
            lanes: config.lanes.clamp(1, MAX_LANES),
            min_chunk: config.min_chunk.max(1),
            pool,
        })
    }

    pub fn params(&self) -> KernelParams {
        self.params
    }

    pub fn lanes(&self) -> usize {
        self.lanes
    }

    pub fn threads(&self) -> usize {
        self.pool.current_num_threads()
    }

    /// Overwrites every entry of `out` with the result of `strategy`.
    ///
    /// `out` must be sized for `set`; this is a caller bug rather than a
    /// result to report, so it panics instead of returning an error.
    ///
    /// # Panics
    ///
    /// If `out.len() != set.len()`.
    pub fn run(&self, strategy: Strategy, set: &ParticleSet, out: &mut Forces) {
        assert_eq!(set.len(), out.len(), "output buffer does not match particle count");
        match strategy {
            Strategy::Sequential => sequential(set, self.params, out),
            Strategy::Vectorized => vectorized(set, self.params, self.lanes, out),
            Strategy::Parallel => parallel(set, self.params, &self.pool, self.min_chunk, out),
        }
    }

    /// Runs `strategy` into a fresh buffer.
    pub fn evaluate(&self, strategy: Strategy, set: &ParticleSet) -> Forces {
        let mut out = Forces::new(set.len());
        self.run(strategy, set, &mut out);
        out
    }
}

/// Reference pass: j ascending, three scalar accumulators per target.
pub fn sequential(set: &ParticleSet, params: KernelParams, out: &mut Forces) {
    for i in 0..set.count {
        let xi = set.xs[i];
        let yi = set.ys[i];
        let mut acc = Contribution::default();
        for j in 0..set.count {
            acc += params.pair(xi, yi, set.xs[j], set.ys[j], set.masses[j]);
        }
        out.set(i, acc);
    }
}

/// Lane-wise pass. `lanes` is rounded to a supported power of two.
pub fn vectorized(set: &ParticleSet, params: KernelParams, lanes: usize, out: &mut Forces) {
    match lanes {
        0..=1 => vectorized_with::<1>(set, params, out),
        2 => vectorized_with::<2>(set, params, out),
        3..=4 => vectorized_with::<4>(set, params, out),
        5..=8 => vectorized_with::<8>(set, params, out),
        _ => vectorized_with::<MAX_LANES>(set, params, out),
    }
}

fn vectorized_with<const L: usize>(set: &ParticleSet, params: KernelParams, out: &mut Forces) {
    let full = set.count / L * L;
    for i in 0..set.count {
        let xi = set.xs[i];
        let yi = set.ys[i];
        let mut lanes = LaneAccumulator::<L>::new();

        let xs = set.xs[..full].chunks_exact(L);
        let ys = set.ys[..full].chunks_exact(L);
        let ms = set.masses[..full].chunks_exact(L);
        for ((xc, yc), mc) in xs.zip(ys).zip(ms) {
            for l in 0..L {
                lanes.add(l, params.pair(xi, yi, xc[l], yc[l], mc[l]));
            }
        }

        let mut acc = lanes.combine();
        for j in full..set.count {
            acc += params.pair(xi, yi, set.xs[j], set.ys[j], set.masses[j]);
        }
        out.set(i, acc);
    }
}

/// Independent partial sums, one per lane.
struct LaneAccumulator<const L: usize> {
    potential: [f32; L],
    accel_x: [f32; L],
    accel_y: [f32; L],
}

impl<const L: usize> LaneAccumulator<L> {
    fn new() -> Self {
        LaneAccumulator {
            potential: [0.0; L],
            accel_x: [0.0; L],
            accel_y: [0.0; L],
        }
    }

    #[inline(always)]
    fn add(&mut self, lane: usize, c: Contribution) {
        self.potential[lane] += c.potential;
        self.accel_x[lane] += c.accel_x;
        self.accel_y[lane] += c.accel_y;
    }

    fn combine(self) -> Contribution {
        Contribution::new(
            tree_sum(self.potential),
            tree_sum(self.accel_x),
            tree_sum(self.accel_y),
        )
    }
}

// Pairwise halving; L is a power of two.
fn tree_sum<const L: usize>(mut lanes: [f32; L]) -> f32 {
    let mut width = L;
    while width > 1 {
        width /= 2;
        for l in 0..width {
            lanes[l] += lanes[l + width];
        }
    }
    lanes[0]
}

/// Thread-parallel pass. For each target the source range is split across
/// the pool by work stealing; every task folds its own partial sum and the
/// partials are merged before the target's result is written.
pub fn parallel(
    set: &ParticleSet,
    params: KernelParams,
    pool: &ThreadPool,
    min_chunk: usize,
    out: &mut Forces,
) {
    let xs = &set.xs;
    let ys = &set.ys;
    let ms = &set.masses;
    for i in 0..set.count {
        let xi = xs[i];
        let yi = ys[i];
        let acc = pool.install(|| {
            (0..set.count)
                .into_par_iter()
                .with_min_len(min_chunk)
                .fold(Contribution::default, |acc, j| {
                    acc + params.pair(xi, yi, xs[j], ys[j], ms[j])
                })
                .reduce(Contribution::default, |a, b| a + b)
        });
        out.set(i, acc);
    }
}
