use crate::core::domain::SearchSpace;
use crate::core::population::Population;
use crate::core::spatial;

/// Mean Euclidean distance of the fireflies to their centroid.
pub fn mean_distance_to_centroid(population: &Population) -> f64 {
    let Some(center) = spatial::centroid(population.iter().map(|f| &f.position)) else {
        return 0.0;
    };
    let total: f64 = population
        .iter()
        .map(|f| spatial::distance_sq(&f.position, &center).sqrt())
        .sum();
    total / population.len() as f64
}

/// Spread of the swarm relative to the diagonal of the search box.
///
/// 0.0 means every firefly sits on the same point. Values stay well below
/// 1.0 for any population inside the box.
pub fn normalized_diversity(population: &Population, space: &SearchSpace) -> f64 {
    let diagonal = space.range().norm();
    if diagonal <= 0.0 {
        return 0.0;
    }
    mean_distance_to_centroid(population) / diagonal
}
