use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};

/// Statistics for a single iteration.
/// All values are in the caller's sign convention.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IterationStats {
    pub iteration: usize,
    /// Best value seen so far in the run.
    pub best_value: f64,
    /// Best, mean and worst of the current population, finite values only.
    /// `None` when every firefly evaluated to a non-finite value.
    pub current_best: Option<f64>,
    pub current_mean: Option<f64>,
    pub current_worst: Option<f64>,
    pub diversity: f64, // Mean distance to centroid / box diagonal
    pub non_finite: usize,

    /// Random-walk scale used for this iteration.
    pub alpha: f64,
}

/// Lifecycle of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SolverState {
    Initialized,
    Running,
    Done,
}

/// Everything recorded about a run besides the optimum itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunInfo {
    /// Best-ever value after each iteration. Exactly `iters` entries.
    pub history_best: Vec<f64>,
    /// `iters + 1` population snapshots (initial first), each `n x 2`.
    /// Only present when `d == 2` and position tracking was requested.
    pub history_positions: Option<Vec<DMatrix<f64>>>,
    pub history_stats: Vec<IterationStats>,

    /// Iteration that produced the best solution, 0 for the initial population.
    pub best_iteration: usize,
    pub evaluations: usize,
    pub non_finite_evaluations: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptimizationResult {
    pub best_x: DVector<f64>,
    pub best_value: f64,
    pub info: RunInfo,
}

pub mod fa;
