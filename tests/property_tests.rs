//! Property-based tests for the oracle and the evaluation strategies.

use nbody_pairwise::config::RunConfig;
use nbody_pairwise::oracle::{Baseline, Oracle, Verdict, DEFAULT_TOLERANCE};
use nbody_pairwise::particle::{Body, Forces, ParticleSet};
use nbody_pairwise::strategy::{Evaluator, Strategy as EvalStrategy};
use proptest::prelude::*;

fn forces_strategy(len: usize) -> impl proptest::strategy::Strategy<Value = Forces> {
    let values = || proptest::collection::vec(-100.0f32..100.0, len);
    (values(), values(), values()).prop_map(|(potential, accel_x, accel_y)| Forces {
        potential,
        accel_x,
        accel_y,
    })
}

// Bodies on a 1/8 grid so no two sit closer than 0.125.
fn grid_set(masses: &[f32]) -> ParticleSet {
    let n = masses.len() as f32;
    let bodies: Vec<Body> = masses
        .iter()
        .enumerate()
        .map(|(k, &m)| Body {
            x: (k % 8) as f32 * 0.125,
            y: (k / 8) as f32 * 0.125,
            mass: m / n,
        })
        .collect();
    ParticleSet::from_bodies(&bodies)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Property: every value within half the tolerance of the baseline passes
    #[test]
    fn small_deviations_pass(
        (base, deltas) in (1usize..32).prop_flat_map(|n| {
            (forces_strategy(n), proptest::collection::vec(-0.0005f32..0.0005, 3 * n))
        })
    ) {
        let n = base.len();
        let mut cand = base.clone();
        for i in 0..n {
            cand.potential[i] += deltas[i];
            cand.accel_x[i] += deltas[n + i];
            cand.accel_y[i] += deltas[2 * n + i];
        }
        let oracle = Oracle::new(Baseline::capture(&base), DEFAULT_TOLERANCE);
        prop_assert_eq!(oracle.check(&cand), Ok(Verdict::Pass));
    }

    /// Property: a single value pushed past the tolerance fails
    #[test]
    fn one_large_deviation_fails(
        (base, index, which) in (1usize..32).prop_flat_map(|n| (forces_strategy(n), 0..n, 0usize..3))
    ) {
        let mut cand = base.clone();
        let column = match which {
            0 => &mut cand.potential,
            1 => &mut cand.accel_x,
            _ => &mut cand.accel_y,
        };
        column[index] += 0.01;
        let oracle = Oracle::new(Baseline::capture(&base), DEFAULT_TOLERANCE);
        prop_assert_eq!(oracle.check(&cand), Ok(Verdict::Fail));
    }

    /// Property: all strategies agree with the serial pass within tolerance
    #[test]
    fn strategies_agree(masses in proptest::collection::vec(0.0f32..1.0, 1..64), lanes in 1usize..=16) {
        let config = RunConfig::new(6).with_threads(2).with_lanes(lanes);
        let evaluator = Evaluator::new(&config).unwrap();
        let set = grid_set(&masses);

        let baseline = evaluator.evaluate(EvalStrategy::Sequential, &set);
        let oracle = Oracle::new(Baseline::capture(&baseline), config.tolerance);
        for strategy in [EvalStrategy::Vectorized, EvalStrategy::Parallel] {
            let out = evaluator.evaluate(strategy, &set);
            prop_assert_eq!(oracle.check(&out), Ok(Verdict::Pass));
        }
    }
}
