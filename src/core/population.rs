use nalgebra::{DMatrix, DVector};
use rand::Rng;

use crate::core::domain::{Firefly, SearchSpace};
use crate::engine::evaluator::{EvaluationResult, Objective, ObjectiveAdapter};
use crate::error::{FaError, Result};

/// The ordered set of fireflies. Size is fixed for the lifetime of a run.
#[derive(Debug, Clone)]
pub struct Population {
    fireflies: Vec<Firefly>,
}

impl Population {
    /// Draws `n` positions uniformly inside `space`.
    ///
    /// Draw order is firefly-major, dimension-minor, so a seeded `rng`
    /// always yields the same population.
    pub fn initialize<R: Rng + ?Sized>(n: usize, space: &SearchSpace, rng: &mut R) -> Self {
        let d = space.dim();
        let fireflies = (0..n)
            .map(|_| {
                let position = DVector::from_fn(d, |k, _| {
                    rng.gen_range(space.lower()[k]..space.upper()[k])
                });
                Firefly::new(position)
            })
            .collect();

        Self { fireflies }
    }

    pub fn from_positions(positions: Vec<DVector<f64>>) -> Self {
        Self {
            fireflies: positions.into_iter().map(Firefly::new).collect(),
        }
    }

    /// Evaluates every position. Positions are left untouched.
    ///
    /// Returns one result per firefly, in index order. The first
    /// objective error aborts the pass.
    pub fn evaluate_all<O: Objective>(
        &self,
        adapter: &ObjectiveAdapter<O>,
    ) -> Result<Vec<EvaluationResult>> {
        self.fireflies
            .iter()
            .map(|f| adapter.evaluate(&f.position).map_err(FaError::Objective))
            .collect()
    }

    /// Replaces all intensities at once.
    pub fn assign_intensities(&mut self, intensities: &[f64]) {
        debug_assert_eq!(intensities.len(), self.fireflies.len());
        for (f, &i) in self.fireflies.iter_mut().zip(intensities) {
            f.intensity = i;
        }
    }

    /// Moves every firefly to its new position. Intensities become stale
    /// until the next `assign_intensities`.
    pub fn relocate(&mut self, positions: Vec<DVector<f64>>) {
        debug_assert_eq!(positions.len(), self.fireflies.len());
        for (f, p) in self.fireflies.iter_mut().zip(positions) {
            f.position = p;
        }
    }

    /// Lowest index among the brightest fireflies.
    pub fn brightest(&self) -> Option<(usize, &Firefly)> {
        self.fireflies
            .iter()
            .enumerate()
            .fold(None, |acc: Option<(usize, &Firefly)>, (i, f)| match acc {
                Some((_, b)) if !f.outshines(b) => acc,
                _ => Some((i, f)),
            })
    }

    /// Copy of all positions as an `n x d` matrix, one firefly per row.
    pub fn snapshot(&self) -> DMatrix<f64> {
        let n = self.fireflies.len();
        let d = self.fireflies.first().map_or(0, |f| f.position.len());
        DMatrix::from_fn(n, d, |i, k| self.fireflies[i].position[k])
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.fireflies.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.fireflies.is_empty()
    }

    #[inline]
    pub fn fireflies(&self) -> &[Firefly] {
        &self.fireflies
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Firefly> {
        self.fireflies.iter()
    }
}
