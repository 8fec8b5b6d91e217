use nalgebra::DVector;
use serde::{Deserialize, Serialize};

use crate::error::{FaError, Result};

// --- Search Space ---

/// A bound given either once for every dimension or per dimension.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Bound {
    Scalar(f64),
    Vector(Vec<f64>),
}

impl Bound {
    /// Expands the bound to `d` entries. Scalars are broadcast.
    pub fn broadcast(&self, which: &'static str, d: usize) -> Result<Vec<f64>> {
        match self {
            Bound::Scalar(v) => Ok(vec![*v; d]),
            Bound::Vector(v) if v.len() == d => Ok(v.clone()),
            Bound::Vector(v) => Err(FaError::BoundsLength {
                which,
                len: v.len(),
                d,
            }),
        }
    }
}

impl From<f64> for Bound {
    fn from(v: f64) -> Self {
        Bound::Scalar(v)
    }
}

impl From<Vec<f64>> for Bound {
    fn from(v: Vec<f64>) -> Self {
        Bound::Vector(v)
    }
}

/// The box `[lower, upper]^d` every firefly lives in.
///
/// **Invariant**: `lower[i] < upper[i]`, both finite, and `upper[i] - lower[i]`
/// finite, for every dimension.
/// Only constructible through `new`/`from_bounds`, which check it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchSpace {
    lower: DVector<f64>,
    upper: DVector<f64>,
}

impl SearchSpace {
    pub fn new(lower: Vec<f64>, upper: Vec<f64>) -> Result<Self> {
        let d = lower.len();
        if d == 0 {
            return Err(FaError::InvalidDimension(0));
        }
        if upper.len() != d {
            return Err(FaError::BoundsLength {
                which: "upper",
                len: upper.len(),
                d,
            });
        }
        for (dim, (&lo, &hi)) in lower.iter().zip(upper.iter()).enumerate() {
            // Rejects zero-volume dimensions, NaN/inf, and widths that overflow.
            if !(lo.is_finite() && hi.is_finite() && lo < hi && (hi - lo).is_finite()) {
                return Err(FaError::InvalidBounds {
                    dim,
                    lower: lo,
                    upper: hi,
                });
            }
        }

        Ok(Self {
            lower: DVector::from_vec(lower),
            upper: DVector::from_vec(upper),
        })
    }

    /// Builds a `d`-dimensional box, broadcasting scalar bounds.
    pub fn from_bounds(lower: &Bound, upper: &Bound, d: usize) -> Result<Self> {
        if d == 0 {
            return Err(FaError::InvalidDimension(d));
        }
        Self::new(lower.broadcast("lower", d)?, upper.broadcast("upper", d)?)
    }

    #[inline]
    pub fn dim(&self) -> usize {
        self.lower.len()
    }

    #[inline]
    pub fn lower(&self) -> &DVector<f64> {
        &self.lower
    }

    #[inline]
    pub fn upper(&self) -> &DVector<f64> {
        &self.upper
    }

    /// Per-dimension width `upper - lower`.
    pub fn range(&self) -> DVector<f64> {
        &self.upper - &self.lower
    }

    pub fn contains(&self, x: &DVector<f64>) -> bool {
        x.len() == self.dim()
            && x
                .iter()
                .zip(self.lower.iter().zip(self.upper.iter()))
                .all(|(v, (lo, hi))| *v >= *lo && *v <= *hi)
    }
}

// --- Population Members ---

/// One candidate solution.
///
/// `intensity` is always in minimization convention: lower is brighter.
/// Non-finite objective values are stored as `f64::INFINITY`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Firefly {
    pub position: DVector<f64>,
    pub intensity: f64,
}

impl Firefly {
    pub fn new(position: DVector<f64>) -> Self {
        Self {
            position,
            intensity: f64::INFINITY,
        }
    }

    /// True if `self` is strictly brighter than `other`.
    #[inline]
    pub fn outshines(&self, other: &Firefly) -> bool {
        self.intensity < other.intensity
    }
}

/// The best firefly seen so far. Only ever replaced by a strictly better one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BestSolution {
    pub position: DVector<f64>,
    pub intensity: f64,
    /// Iteration that produced it, 0 being the initial population.
    pub iteration: usize,
}

impl BestSolution {
    pub fn from_firefly(f: &Firefly, iteration: usize) -> Self {
        Self {
            position: f.position.clone(),
            intensity: f.intensity,
            iteration,
        }
    }

    /// Adopts `candidate` if it is strictly brighter. Returns whether it did.
    pub fn offer(&mut self, candidate: &Firefly, iteration: usize) -> bool {
        if candidate.intensity < self.intensity {
            self.position.copy_from(&candidate.position);
            self.intensity = candidate.intensity;
            self.iteration = iteration;
            true
        } else {
            false
        }
    }
}

// --- Configuration Types ---

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FaParams {
    pub d: usize,
    pub n: usize,
    pub iters: usize,

    // Movement
    pub alpha: f64,
    /// Geometric factor applied to `alpha` after every iteration. 1.0 keeps it fixed.
    pub alpha_decay: f64,
    pub beta0: f64,
    pub gamma: f64,

    // Search Space
    pub lower: Bound,
    pub upper: Bound,

    pub maximize: bool,
    pub seed: Option<u64>,

    /// Keep a copy of every population state. Only honoured when `d == 2`.
    pub track_positions: bool,
}

impl Default for FaParams {
    fn default() -> Self {
        Self {
            d: 2,
            n: 30,
            iters: 100,
            alpha: 0.2,
            alpha_decay: 0.97,
            beta0: 1.0,
            gamma: 1.0,
            lower: Bound::Scalar(-5.0),
            upper: Bound::Scalar(5.0),
            maximize: false,
            seed: None,
            track_positions: false,
        }
    }
}

impl FaParams {
    /// Checks the whole configuration and resolves the search space.
    pub fn validate(&self) -> Result<SearchSpace> {
        if self.d == 0 {
            return Err(FaError::InvalidDimension(self.d));
        }
        if self.n == 0 {
            return Err(FaError::InvalidPopulation(self.n));
        }

        let non_negative = [
            ("alpha", self.alpha),
            ("beta0", self.beta0),
            ("gamma", self.gamma),
        ];
        for (name, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(FaError::InvalidParameter { name, value });
            }
        }
        if !(self.alpha_decay > 0.0 && self.alpha_decay <= 1.0) {
            return Err(FaError::InvalidParameter {
                name: "alpha_decay",
                value: self.alpha_decay,
            });
        }

        SearchSpace::from_bounds(&self.lower, &self.upper, self.d)
    }

    /// Whether population snapshots will actually be recorded.
    pub fn records_positions(&self) -> bool {
        self.track_positions && self.d == 2
    }
}
