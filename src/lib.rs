//! Firefly Algorithm for continuous box-constrained optimization.
//!
//! A population of fireflies is moved towards brighter (better) neighbours
//! with an attractiveness that decays with distance, plus a decaying random
//! walk. See [`solvers::fa::optimize`] for the one-call entry point.

pub mod analysis;
pub mod core;
pub mod engine;
pub mod error;
pub mod interface;
pub mod solvers;

pub use crate::core::domain::{Bound, FaParams, SearchSpace};
pub use crate::engine::evaluator::Objective;
pub use crate::error::{FaError, Result};
pub use crate::solvers::fa::{optimize, FireflyAlgorithm};
pub use crate::solvers::{OptimizationResult, RunInfo};
