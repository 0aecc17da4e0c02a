//! Runs every strategy once, times it and checks it against the baseline.

use std::time::Instant;

use log::{debug, info, warn};
use rayon::ThreadPoolBuildError;
use thiserror::Error;

use crate::config::{gflop_count, RunConfig};
use crate::oracle::{Baseline, Oracle, Verdict};
use crate::particle::{Forces, ParticleSet};
use crate::strategy::{Evaluator, Strategy};

#[derive(Debug, Error)]
pub enum HarnessError {
    #[error("could not start the worker pool")]
    Pool(#[from] ThreadPoolBuildError),
}

#[derive(Clone, Debug)]
pub struct StrategyReport {
    pub strategy: Strategy,
    /// Wall-clock seconds, dropped when the result failed verification.
    pub seconds: Option<f64>,
    /// `None` for the sequential pass, which defines the baseline.
    pub verdict: Option<Verdict>,
    pub gflops: Option<f64>,
}

impl StrategyReport {
    pub fn passed(&self) -> bool {
        self.verdict.map_or(true, |v| v.passed())
    }
}

#[derive(Clone, Debug)]
pub struct RunReport {
    pub body_count: usize,
    pub strategies: Vec<StrategyReport>,
}

impl RunReport {
    pub fn all_passed(&self) -> bool {
        self.strategies.iter().all(|s| s.passed())
    }

    pub fn get(&self, strategy: Strategy) -> Option<&StrategyReport> {
        self.strategies.iter().find(|s| s.strategy == strategy)
    }
}

/// Generates the particle set described by `config` and runs it.
pub fn run(config: &RunConfig) -> Result<RunReport, HarnessError> {
    let n = config.body_count();
    info!("seed {:#x}, {} lanes, {} worker threads", config.seed, config.lanes, config.threads);
    let set = ParticleSet::random(n, config.seed);
    run_on(&set, config)
}

pub fn run_on(set: &ParticleSet, config: &RunConfig) -> Result<RunReport, HarnessError> {
    let evaluator = Evaluator::new(config)?;
    let n = set.len();
    let gflop = gflop_count(n);
    if set.is_empty() {
        warn!("particle set is empty, every pass is a no-op");
    }

    println!("Running for problem size N: {}", n);

    let mut out = Forces::new(n);
    let mut strategies = Vec::with_capacity(Strategy::ALL.len());

    print_banner(Strategy::Sequential);
    let seconds = timed(|| evaluator.run(Strategy::Sequential, set, &mut out));
    println!("Time: {:.4}s", seconds);
    strategies.push(StrategyReport {
        strategy: Strategy::Sequential,
        seconds: Some(seconds),
        verdict: None,
        gflops: Some(gflop / seconds),
    });

    let oracle = Oracle::new(Baseline::capture(&out), config.tolerance);

    for strategy in [Strategy::Vectorized, Strategy::Parallel] {
        print_banner(strategy);
        out.reset();
        let seconds = timed(|| evaluator.run(strategy, set, &mut out));

        let verdict = match oracle.first_mismatch(&out) {
            Ok(None) => Verdict::Pass,
            Ok(Some(mismatch)) => {
                debug!("{}: {} (tolerance {})", strategy, mismatch, oracle.tolerance());
                Verdict::Fail
            }
            Err(e) => {
                warn!("{}: {}", strategy, e);
                Verdict::Fail
            }
        };

        let report = match verdict {
            Verdict::Pass => {
                println!("Time: {:.4}s -- {} ({:.2} GFLOP/s)", seconds, verdict, gflop / seconds);
                StrategyReport {
                    strategy,
                    seconds: Some(seconds),
                    verdict: Some(verdict),
                    gflops: Some(gflop / seconds),
                }
            }
            Verdict::Fail => {
                println!("{}", verdict);
                StrategyReport { strategy, seconds: None, verdict: Some(verdict), gflops: None }
            }
        };
        strategies.push(report);
    }

    Ok(RunReport { body_count: n, strategies })
}

fn print_banner(strategy: Strategy) {
    let label = format!("Running {}", strategy.label());
    println!("{:.<52}", label);
}

fn timed<F: FnOnce()>(f: F) -> f64 {
    let start = Instant::now();
    f();
    start.elapsed().as_nanos() as f64 / 1e9
}
