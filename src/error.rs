use thiserror::Error;

/// Errors reported by the optimizer.
///
/// Configuration errors are raised before any objective evaluation takes
/// place. `Objective` wraps an error returned by user code and terminates
/// the run.
#[derive(Debug, Error)]
pub enum FaError {
    #[error("dimensionality must be at least 1 (got {0})")]
    InvalidDimension(usize),

    #[error("population size must be at least 1 (got {0})")]
    InvalidPopulation(usize),

    #[error("{which} bound has {len} entries but the search space has {d} dimensions")]
    BoundsLength {
        which: &'static str,
        len: usize,
        d: usize,
    },

    #[error("dimension {dim}: lower bound {lower} must be finite and strictly below upper bound {upper}")]
    InvalidBounds { dim: usize, lower: f64, upper: f64 },

    #[error("parameter `{name}` has invalid value {value}")]
    InvalidParameter { name: &'static str, value: f64 },

    #[error("objective evaluation failed: {0}")]
    Objective(anyhow::Error),
}

pub type Result<T> = std::result::Result<T, FaError>;
