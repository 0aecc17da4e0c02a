pub mod config;
pub mod harness;
pub mod kernel;
pub mod oracle;
pub mod particle;
pub mod strategy;

pub use config::{parse_exponent, RunConfig};
pub use harness::{run, run_on, HarnessError, RunReport, StrategyReport};
pub use kernel::{Contribution, KernelParams};
pub use oracle::{nearly_equal, Baseline, Oracle, Verdict};
pub use particle::{Body, Forces, ParticleSet};
pub use strategy::{Evaluator, Strategy};
