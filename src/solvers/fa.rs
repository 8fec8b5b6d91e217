use log::{debug, info, trace, warn};
use nalgebra::DMatrix;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::analysis::diversity;
use crate::core::domain::{BestSolution, FaParams, SearchSpace};
use crate::core::population::Population;
use crate::engine::evaluator::{EvaluationResult, Objective, ObjectiveAdapter};
use crate::engine::operators::Movement;
use crate::error::{FaError, Result};
use crate::solvers::{IterationStats, OptimizationResult, RunInfo, SolverState};

/// Runs the Firefly Algorithm once with `params`.
///
/// ```
/// use firefly_opt::{optimize, FaParams};
/// use nalgebra::DVector;
///
/// let params = FaParams { d: 2, iters: 20, seed: Some(7), ..Default::default() };
/// let res = optimize(|x: &DVector<f64>| x.norm_squared(), params).unwrap();
/// assert_eq!(res.best_x.len(), 2);
/// assert_eq!(res.info.history_best.len(), 20);
/// ```
pub fn optimize<O: Objective>(objective: O, params: FaParams) -> Result<OptimizationResult> {
    FireflyAlgorithm::new(objective, params)?.run()
}

/// Owns one run: the population, its random source and everything recorded.
///
/// The generator is consumed in a fixed order (initial positions, then `d`
/// draws per firefly per iteration in index order), so a seeded run is
/// reproducible bit for bit.
pub struct FireflyAlgorithm<O: Objective> {
    adapter: ObjectiveAdapter<O>,
    params: FaParams,
    space: SearchSpace,
    population: Population,
    rng: ChaCha8Rng,

    state: SolverState,
    iteration: usize,
    alpha: f64,
    best: BestSolution,

    history_best: Vec<f64>,
    history_positions: Option<Vec<DMatrix<f64>>>,
    history_stats: Vec<IterationStats>,
    evaluations: usize,
    non_finite_evaluations: usize,
}

impl<O: Objective> FireflyAlgorithm<O> {
    /// Validates `params`, scatters the initial population and evaluates it.
    ///
    /// Nothing is evaluated if the configuration is invalid.
    pub fn new(objective: O, params: FaParams) -> Result<Self> {
        let space = params.validate()?;
        let adapter = ObjectiveAdapter::new(objective, params.maximize);

        let mut rng = match params.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };

        info!(
            "Initializing {} fireflies in {} dimensions for '{}' (seed: {:?}, {})",
            params.n,
            params.d,
            adapter.name(),
            params.seed,
            if params.maximize { "maximize" } else { "minimize" },
        );

        let mut population = Population::initialize(params.n, &space, &mut rng);
        let (intensities, non_finite) = split_results(&population.evaluate_all(&adapter)?);
        population.assign_intensities(&intensities);

        if non_finite > 0 {
            warn!("{} of {} initial fireflies evaluated to a non-finite value", non_finite, params.n);
        }

        let best = population
            .brightest()
            .map(|(_, f)| BestSolution::from_firefly(f, 0))
            .ok_or(FaError::InvalidPopulation(0))?;

        let history_positions = if params.records_positions() {
            Some(vec![population.snapshot()])
        } else {
            None
        };

        Ok(Self {
            alpha: params.alpha,
            history_best: Vec::new(),
            history_stats: Vec::new(),
            evaluations: params.n,
            non_finite_evaluations: non_finite,
            history_positions,
            adapter,
            params,
            space,
            population,
            rng,
            state: SolverState::Initialized,
            iteration: 0,
            best,
        })
    }

    /// Performs one iteration.
    ///
    /// Returns `Ok(None)` once all `iters` iterations have run; the run is
    /// then `Done` and further calls do nothing.
    pub fn step(&mut self) -> Result<Option<IterationStats>> {
        if self.iteration >= self.params.iters {
            self.state = SolverState::Done;
            return Ok(None);
        }
        self.state = SolverState::Running;
        self.iteration += 1;
        let alpha = self.alpha;

        // A. Move every firefly from the start-of-iteration snapshot
        let positions = Movement::new()
            .attract(self.params.beta0, self.params.gamma)
            .random_walk(alpha)
            .apply(&self.population, &self.space, &mut self.rng);
        self.population.relocate(positions);

        // B. Re-evaluate the whole swarm once
        let (intensities, non_finite) = split_results(&self.population.evaluate_all(&self.adapter)?);
        self.population.assign_intensities(&intensities);
        self.evaluations += intensities.len();

        if non_finite > 0 {
            warn!(
                "Iteration {}: {} fireflies evaluated to a non-finite value",
                self.iteration, non_finite
            );
            self.non_finite_evaluations += non_finite;
        }

        // C. Best tracking
        if let Some((idx, brightest)) = self.population.brightest() {
            if self.best.offer(brightest, self.iteration) {
                trace!(
                    "Iteration {}: new best {} from firefly {}",
                    self.iteration,
                    self.adapter.external(self.best.intensity),
                    idx
                );
            }
        }

        // D. History
        let best_value = self.adapter.external(self.best.intensity);
        self.history_best.push(best_value);
        if let Some(snapshots) = self.history_positions.as_mut() {
            snapshots.push(self.population.snapshot());
        }

        let stats = self.collect_stats(&intensities, non_finite, alpha);
        debug!("{:?}", stats);
        self.history_stats.push(stats.clone());

        self.alpha *= self.params.alpha_decay;
        if self.iteration == self.params.iters {
            self.state = SolverState::Done;
        }

        Ok(Some(stats))
    }

    /// Runs the remaining iterations and returns the result.
    pub fn run(mut self) -> Result<OptimizationResult> {
        while self.step()?.is_some() {}
        Ok(self.into_result())
    }

    /// Builds the result from the current state without running further.
    pub fn into_result(self) -> OptimizationResult {
        let best_value = self.adapter.external(self.best.intensity);
        info!(
            "Finished after {} iterations. Best value {} (iteration {}), {} evaluations",
            self.iteration, best_value, self.best.iteration, self.evaluations
        );

        OptimizationResult {
            best_x: self.best.position,
            best_value,
            info: RunInfo {
                history_best: self.history_best,
                history_positions: self.history_positions,
                history_stats: self.history_stats,
                best_iteration: self.best.iteration,
                evaluations: self.evaluations,
                non_finite_evaluations: self.non_finite_evaluations,
            },
        }
    }

    fn collect_stats(&self, intensities: &[f64], non_finite: usize, alpha: f64) -> IterationStats {
        let finite: Vec<f64> = intensities
            .iter()
            .copied()
            .filter(|v| v.is_finite())
            .collect();

        let (current_best, current_mean, current_worst) = if finite.is_empty() {
            (None, None, None)
        } else {
            let min = finite.iter().copied().fold(f64::INFINITY, f64::min);
            let max = finite.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            let mean = finite.iter().sum::<f64>() / finite.len() as f64;
            (
                Some(self.adapter.external(min)),
                Some(self.adapter.external(mean)),
                Some(self.adapter.external(max)),
            )
        };

        IterationStats {
            iteration: self.iteration,
            best_value: self.adapter.external(self.best.intensity),
            current_best,
            current_mean,
            current_worst,
            diversity: diversity::normalized_diversity(&self.population, &self.space),
            non_finite,
            alpha,
        }
    }

    // --- Accessors ---

    pub fn state(&self) -> SolverState {
        self.state
    }

    pub fn iteration(&self) -> usize {
        self.iteration
    }

    pub fn population(&self) -> &Population {
        &self.population
    }

    pub fn search_space(&self) -> &SearchSpace {
        &self.space
    }

    pub fn params(&self) -> &FaParams {
        &self.params
    }

    /// Random-walk scale the next iteration will use.
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Best solution so far, intensity in minimization convention.
    pub fn best(&self) -> &BestSolution {
        &self.best
    }

    /// Best value so far in the caller's sign convention.
    pub fn best_value(&self) -> f64 {
        self.adapter.external(self.best.intensity)
    }
}

/// Intensities in index order, plus how many raw values were not finite.
fn split_results(results: &[EvaluationResult]) -> (Vec<f64>, usize) {
    let intensities = results.iter().map(|r| r.intensity).collect();
    let non_finite = results.iter().filter(|r| !r.is_finite()).count();
    (intensities, non_finite)
}
