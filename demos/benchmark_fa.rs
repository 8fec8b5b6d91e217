use std::time::Instant;

use anyhow::Result;
use firefly_opt::core::domain::FaParams;
use firefly_opt::engine::benchmarks::Benchmark;
use firefly_opt::solvers::fa::optimize;

fn main() -> Result<()> {
    let benchmarks = [Benchmark::Sphere, Benchmark::Rastrigin, Benchmark::Rosenbrock];

    for bench in benchmarks {
        for d in [2, 5, 10] {
            let params = FaParams {
                d,
                n: 40,
                iters: 300,
                seed: Some(42),
                ..Default::default()
            };

            let start = Instant::now();
            let res = optimize(bench, params)?;
            let duration = start.elapsed();

            let dist = (&res.best_x - bench.optimum(d)).norm();
            println!(
                "{:?} d={:<2} best={:>12.6e} dist_to_opt={:.4} found_at={:<3} took {:?}",
                bench, d, res.best_value, dist, res.info.best_iteration, duration
            );
        }
    }

    Ok(())
}
