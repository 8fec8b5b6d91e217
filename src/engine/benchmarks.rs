//! Standard test functions. Each has a known global minimum.

use std::f64::consts::PI;

use anyhow::Result;
use nalgebra::DVector;
use serde::{Deserialize, Serialize};

use crate::engine::evaluator::Objective;

/// Sum of squares. Minimum 0 at the origin.
pub fn sphere(x: &DVector<f64>) -> f64 {
    x.norm_squared()
}

/// Highly multimodal. Minimum 0 at the origin.
pub fn rastrigin(x: &DVector<f64>) -> f64 {
    const A: f64 = 10.0;
    A * x.len() as f64
        + x.iter()
            .map(|v| v * v - A * (2.0 * PI * v).cos())
            .sum::<f64>()
}

/// Banana valley. Minimum 0 at `(1, ..., 1)`.
pub fn rosenbrock(x: &DVector<f64>) -> f64 {
    x.as_slice()
        .windows(2)
        .map(|w| 100.0 * (w[1] - w[0] * w[0]).powi(2) + (1.0 - w[0]).powi(2))
        .sum()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Benchmark {
    Sphere,
    Rastrigin,
    Rosenbrock,
}

impl Benchmark {
    /// Location of the global minimum in `d` dimensions.
    pub fn optimum(&self, d: usize) -> DVector<f64> {
        match self {
            Benchmark::Sphere | Benchmark::Rastrigin => DVector::zeros(d),
            Benchmark::Rosenbrock => DVector::from_element(d, 1.0),
        }
    }
}

impl Objective for Benchmark {
    fn evaluate(&self, x: &DVector<f64>) -> Result<f64> {
        Ok(match self {
            Benchmark::Sphere => sphere(x),
            Benchmark::Rastrigin => rastrigin(x),
            Benchmark::Rosenbrock => rosenbrock(x),
        })
    }

    fn name(&self) -> &str {
        match self {
            Benchmark::Sphere => "sphere",
            Benchmark::Rastrigin => "rastrigin",
            Benchmark::Rosenbrock => "rosenbrock",
        }
    }
}
