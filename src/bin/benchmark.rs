use nbody_pairwise::config::{gflop_count, DEFAULT_SEED};
use nbody_pairwise::kernel::KernelParams;
use nbody_pairwise::particle::{Forces, ParticleSet};
use nbody_pairwise::strategy;
use std::time::Instant;

fn main() {
    println!("All-Pairs Serial Scaling Benchmark");
    println!("----------------------------------");

    let exponents = 8..=12;
    let params = KernelParams::default();

    println!("Each doubling of N should take roughly 4x longer");
    println!("\n  Body Count | Runtime (s) | GFLOP/s | Ratio to previous");
    println!("-------------|-------------|---------|------------------");

    let mut previous: Option<f64> = None;
    for exponent in exponents {
        let n = 1usize << exponent;
        let set = ParticleSet::random(n, DEFAULT_SEED);
        let mut out = Forces::new(n);

        let start = Instant::now();
        strategy::sequential(&set, params, &mut out);
        let runtime = start.elapsed().as_nanos() as f64 / 1e9;

        let ratio = match previous {
            Some(p) if p > 0.0 => format!("{:.2}x", runtime / p),
            _ => "-".to_string(),
        };
        println!("{:12} | {:11.4} | {:7.2} | {}",
                 n, runtime, gflop_count(n) / runtime, ratio);
        previous = Some(runtime);
    }
}
