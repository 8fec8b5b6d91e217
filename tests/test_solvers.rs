use std::cell::Cell;

use anyhow::anyhow;
use firefly_opt::core::domain::FaParams;
use firefly_opt::core::population::Population;
use firefly_opt::engine::benchmarks::Benchmark;
use firefly_opt::engine::evaluator::{Fallible, ObjectiveAdapter};
use firefly_opt::solvers::fa::{optimize, FireflyAlgorithm};
use firefly_opt::solvers::SolverState;
use firefly_opt::FaError;
use nalgebra::DVector;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::common::{matrix_within, neg_sphere, seeded, sphere};

mod common;

#[test]
fn test_same_seed_same_run() {
    let a = optimize(sphere, seeded(3, 50, 9)).unwrap();
    let b = optimize(sphere, seeded(3, 50, 9)).unwrap();

    assert_eq!(a.best_x, b.best_x);
    assert_eq!(a.best_value, b.best_value);
    assert_eq!(a.info.history_best, b.info.history_best);
    assert_eq!(a.info.best_iteration, b.info.best_iteration);
}

#[test]
fn test_different_seeds_differ() {
    let a = optimize(sphere, seeded(3, 5, 1)).unwrap();
    let b = optimize(sphere, seeded(3, 5, 2)).unwrap();
    assert_ne!(a.best_x, b.best_x);
}

#[test]
fn test_positions_stay_in_bounds() {
    let params = FaParams {
        alpha: 2.0,
        alpha_decay: 1.0,
        track_positions: true,
        ..seeded(2, 40, 4)
    };
    let res = optimize(Benchmark::Rastrigin, params).unwrap();

    let snapshots = res.info.history_positions.expect("tracking enabled for d = 2");
    for (t, snap) in snapshots.iter().enumerate() {
        assert!(matrix_within(snap, -5.0, 5.0), "snapshot {} left the box", t);
    }

    // Higher dimension, checked through the stepping interface
    let mut solver = FireflyAlgorithm::new(sphere, FaParams { alpha: 2.0, ..seeded(4, 30, 4) }).unwrap();
    while solver.step().unwrap().is_some() {
        for f in solver.population().iter() {
            assert!(solver.search_space().contains(&f.position));
        }
    }
}

#[test]
fn test_history_best_is_monotone() {
    let res = optimize(Benchmark::Rastrigin, seeded(2, 100, 17)).unwrap();
    for w in res.info.history_best.windows(2) {
        assert!(w[1] <= w[0], "best value got worse: {} -> {}", w[0], w[1]);
    }
    assert_eq!(res.best_value, *res.info.history_best.last().unwrap());
}

#[test]
fn test_zero_iterations_returns_initial_best() {
    let params = seeded(2, 0, 21);
    let space = params.validate().unwrap();
    let res = optimize(sphere, params.clone()).unwrap();

    // Rebuild the initial population from the same seed
    let mut rng = ChaCha8Rng::seed_from_u64(21);
    let mut pop = Population::initialize(params.n, &space, &mut rng);
    let adapter = ObjectiveAdapter::new(sphere, false);
    let intensities: Vec<f64> = pop.evaluate_all(&adapter).unwrap().iter().map(|r| r.intensity).collect();
    pop.assign_intensities(&intensities);
    let (_, expected) = pop.brightest().unwrap();

    assert!(res.info.history_best.is_empty());
    assert_eq!(res.info.best_iteration, 0);
    assert_eq!(res.best_x, expected.position);
    assert_eq!(res.best_value, expected.intensity);
    assert_eq!(res.info.evaluations, params.n);
}

#[test]
fn test_maximize_matches_negated_minimize() {
    let max = optimize(neg_sphere, FaParams { maximize: true, ..seeded(2, 60, 5) }).unwrap();
    let min = optimize(sphere, seeded(2, 60, 5)).unwrap();

    assert_eq!(max.best_x, min.best_x);
    assert_eq!(max.best_value, -min.best_value);
    for (a, b) in max.info.history_best.iter().zip(&min.info.history_best) {
        assert_eq!(*a, -*b);
    }
    for w in max.info.history_best.windows(2) {
        assert!(w[1] >= w[0], "maximized history must not decrease");
    }
}

#[test]
fn test_sphere_2d_converges() {
    let res = optimize(sphere, seeded(2, 200, 42)).unwrap();

    assert!(res.best_value < 1e-3, "best value {} too high", res.best_value);
    assert!(res.best_x.norm() < 0.1, "best_x {:?} too far from origin", res.best_x);
}

#[test]
fn test_sphere_5d_shape() {
    let res = optimize(sphere, seeded(5, 200, 42)).unwrap();

    assert_eq!(res.best_x.len(), 5);
    assert!(res.best_value >= 0.0);
    assert!((sphere(&res.best_x) - res.best_value).abs() < 1e-12);
    for w in res.info.history_best.windows(2) {
        assert!(w[1] <= w[0]);
    }
}

#[test]
fn test_history_lengths() {
    let tracked = optimize(sphere, FaParams { track_positions: true, ..seeded(2, 25, 3) }).unwrap();
    assert_eq!(tracked.info.history_best.len(), 25);
    assert_eq!(tracked.info.history_stats.len(), 25);
    let snaps = tracked.info.history_positions.as_ref().unwrap();
    assert_eq!(snaps.len(), 26, "initial population plus one per iteration");
    assert!(snaps.iter().all(|m| m.nrows() == 30 && m.ncols() == 2));

    let untracked = optimize(sphere, seeded(2, 25, 3)).unwrap();
    assert!(untracked.info.history_positions.is_none());

    let three_d = optimize(sphere, FaParams { track_positions: true, ..seeded(3, 25, 3) }).unwrap();
    assert!(three_d.info.history_positions.is_none(), "positions are only kept for d = 2");
}

#[test]
fn test_huge_iteration_budget_steps_lazily() {
    let mut solver = FireflyAlgorithm::new(sphere, FaParams { iters: usize::MAX, ..seeded(2, 0, 6) }).unwrap();
    assert_eq!(solver.state(), SolverState::Initialized);

    let stats = solver.step().unwrap().expect("budget not exhausted");
    assert_eq!(stats.iteration, 1);
    assert_eq!(solver.state(), SolverState::Running);

    let res = solver.into_result();
    assert_eq!(res.info.history_best.len(), 1);
    assert_eq!(res.info.history_stats.len(), 1);
}

#[test]
fn test_invalid_config_evaluates_nothing() {
    let calls = Cell::new(0usize);
    let counting = |x: &DVector<f64>| {
        calls.set(calls.get() + 1);
        sphere(x)
    };

    let params = FaParams {
        lower: vec![0.0, 1.0].into(),
        upper: vec![1.0, 1.0].into(),
        ..seeded(2, 10, 0)
    };
    let res = FireflyAlgorithm::new(&counting, params);
    assert!(matches!(res, Err(FaError::InvalidBounds { dim: 1, .. })));
    assert_eq!(calls.get(), 0);

    let res = optimize(&counting, FaParams { n: 0, ..Default::default() });
    assert!(matches!(res, Err(FaError::InvalidPopulation(0))));
    assert_eq!(calls.get(), 0);
}

#[test]
fn test_evaluation_count() {
    let calls = Cell::new(0usize);
    let counting = |x: &DVector<f64>| {
        calls.set(calls.get() + 1);
        sphere(x)
    };

    let res = optimize(&counting, FaParams { n: 12, ..seeded(2, 7, 0) }).unwrap();
    assert_eq!(calls.get(), 12 * 8);
    assert_eq!(res.info.evaluations, 12 * 8);
}

#[test]
fn test_non_finite_values_do_not_abort() {
    let half_nan = |x: &DVector<f64>| if x[0] > 0.0 { f64::NAN } else { x.norm_squared() };

    let res = optimize(half_nan, seeded(2, 30, 8)).unwrap();
    assert!(res.best_value.is_finite());
    assert!(res.best_x[0] <= 0.0);
    assert!(res.info.non_finite_evaluations > 0);
    assert_eq!(res.info.history_best.len(), 30);
}

#[test]
fn test_all_non_finite() {
    let res = optimize(|_: &DVector<f64>| f64::INFINITY, seeded(2, 5, 8)).unwrap();
    assert_eq!(res.best_value, f64::INFINITY);
    assert_eq!(res.info.non_finite_evaluations, 30 * 6);
    assert!(res.info.history_stats.iter().all(|s| s.current_mean.is_none()));
}

#[test]
fn test_objective_error_propagates() {
    let calls = Cell::new(0usize);
    let flaky = Fallible::new("flaky", |x: &DVector<f64>| {
        calls.set(calls.get() + 1);
        if calls.get() > 45 {
            Err(anyhow!("engine crashed"))
        } else {
            Ok(x.norm_squared())
        }
    });

    let res = optimize(flaky, seeded(2, 10, 1));
    match res {
        Err(FaError::Objective(e)) => assert!(e.to_string().contains("engine crashed")),
        other => panic!("expected objective error, got {:?}", other.map(|r| r.best_value)),
    }
    assert_eq!(calls.get(), 46, "run stops at the first failing evaluation");
}

#[test]
fn test_state_machine() {
    let mut solver = FireflyAlgorithm::new(sphere, seeded(2, 3, 0)).unwrap();
    assert_eq!(solver.state(), SolverState::Initialized);
    assert_eq!(solver.iteration(), 0);

    let stats = solver.step().unwrap().expect("first iteration");
    assert_eq!(stats.iteration, 1);
    assert_eq!(solver.state(), SolverState::Running);

    solver.step().unwrap();
    solver.step().unwrap();
    assert_eq!(solver.state(), SolverState::Done);
    assert!(solver.step().unwrap().is_none());
    assert_eq!(solver.iteration(), 3);

    let res = solver.into_result();
    assert_eq!(res.info.history_best.len(), 3);
}

#[test]
fn test_alpha_decays_geometrically() {
    let params = FaParams { alpha: 0.4, alpha_decay: 0.5, ..seeded(2, 3, 0) };
    let mut solver = FireflyAlgorithm::new(sphere, params).unwrap();

    let s1 = solver.step().unwrap().unwrap();
    let s2 = solver.step().unwrap().unwrap();
    assert_eq!(s1.alpha, 0.4);
    assert_eq!(s2.alpha, 0.2);
    assert_eq!(solver.alpha(), 0.1);
}

#[test]
fn test_diversity_shrinks_on_sphere() {
    let res = optimize(sphere, seeded(2, 150, 13)).unwrap();
    let first = res.info.history_stats.first().unwrap().diversity;
    let last = res.info.history_stats.last().unwrap().diversity;
    assert!(last < first, "swarm should contract: {} -> {}", first, last);
}
