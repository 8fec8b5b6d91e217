use nalgebra::DVector;
use rand::Rng;

use crate::core::domain::{Firefly, SearchSpace};
use crate::core::population::Population;
use crate::core::spatial;

/// Attractiveness `beta0 * exp(-gamma * r^2)`, taking `r^2` directly.
#[inline]
pub fn attractiveness(beta0: f64, gamma: f64, r_sq: f64) -> f64 {
    beta0 * (-gamma * r_sq).exp()
}

/// A composable movement builder.
///
/// Applying it moves a whole population by one iteration. Every new
/// position is computed from the population as passed in, never from a
/// position already moved in the same pass.
#[derive(Clone, Debug)]
pub struct Movement {
    attraction: Option<(f64, f64)>, // (beta0, gamma)
    random_walk: Option<f64>,       // alpha
}

impl Default for Movement {
    fn default() -> Self {
        Self::new()
    }
}

impl Movement {
    pub fn new() -> Self {
        Self {
            attraction: None,
            random_walk: None,
        }
    }

    pub fn attract(mut self, beta0: f64, gamma: f64) -> Self {
        self.attraction = Some((beta0, gamma));
        self
    }

    pub fn random_walk(mut self, alpha: f64) -> Self {
        self.random_walk = Some(alpha);
        self
    }

    /// Net pull on `fireflies[i]` from every strictly brighter firefly.
    ///
    /// Contributions `beta(r_ij) * (x_j - x_i)` are summed. A single
    /// brighter firefly gives exactly `beta(r) * (x_j - x_i)`, whatever
    /// `beta0` is. With two or more, a total attractiveness above 1 divides
    /// the sum, so the target is the attractiveness-weighted centroid of
    /// the brighter fireflies rather than a point beyond it.
    pub fn attraction(&self, i: usize, fireflies: &[Firefly]) -> DVector<f64> {
        let xi = &fireflies[i];
        let mut pull = DVector::zeros(xi.position.len());

        let Some((beta0, gamma)) = self.attraction else {
            return pull;
        };

        let mut total_beta = 0.0;
        let mut brighter = 0usize;
        for (j, xj) in fireflies.iter().enumerate() {
            if j == i || !xj.outshines(xi) {
                continue;
            }
            let r_sq = spatial::distance_sq(&xi.position, &xj.position);
            let beta = attractiveness(beta0, gamma, r_sq);
            pull.axpy(beta, &(&xj.position - &xi.position), 1.0);
            total_beta += beta;
            brighter += 1;
        }

        if brighter > 1 && total_beta > 1.0 {
            pull /= total_beta;
        }
        pull
    }

    /// Computes the next position of every firefly, clamped to `space`.
    ///
    /// Draws exactly `d` uniforms per firefly, in index order, when a random
    /// walk is configured. Each draw `u` lies in `[-0.5, 0.5)` and is scaled
    /// by `alpha * (upper - lower)` of its dimension.
    pub fn apply<R: Rng + ?Sized>(
        &self,
        population: &Population,
        space: &SearchSpace,
        rng: &mut R,
    ) -> Vec<DVector<f64>> {
        let fireflies = population.fireflies();
        let range = space.range();

        (0..fireflies.len())
            .map(|i| {
                let mut x = &fireflies[i].position + self.attraction(i, fireflies);

                if let Some(alpha) = self.random_walk {
                    for (v, width) in x.iter_mut().zip(range.iter()) {
                        let u = rng.gen::<f64>() - 0.5;
                        *v += alpha * width * u;
                    }
                }

                spatial::clamp_to_bounds(&mut x, space);
                x
            })
            .collect()
    }
}
