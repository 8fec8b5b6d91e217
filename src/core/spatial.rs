use nalgebra::DVector;

use crate::core::domain::SearchSpace;

/// Squared Euclidean distance between two positions.
#[inline]
pub fn distance_sq(a: &DVector<f64>, b: &DVector<f64>) -> f64 {
    a.iter().zip(b.iter()).map(|(x, y)| (x - y) * (x - y)).sum()
}

/// Pulls every coordinate back into `[lower, upper]`.
///
/// **Invariant**: modifies in place, leaves in-bounds coordinates untouched.
pub fn clamp_to_bounds(x: &mut DVector<f64>, space: &SearchSpace) {
    for ((v, lo), hi) in x
        .iter_mut()
        .zip(space.lower().iter())
        .zip(space.upper().iter())
    {
        *v = v.clamp(*lo, *hi);
    }
}

/// Arithmetic mean of a set of positions. `None` for an empty set.
pub fn centroid<'a, I>(positions: I) -> Option<DVector<f64>>
where
    I: IntoIterator<Item = &'a DVector<f64>>,
{
    let mut iter = positions.into_iter();
    let mut sum = iter.next()?.clone();
    let mut count = 1.0;
    for p in iter {
        sum += p;
        count += 1.0;
    }
    Some(sum / count)
}
