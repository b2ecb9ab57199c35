//! Euclidean neighbourhood queries over sensor positions.

/// Mark the candidates strictly closer than `radius` to `point` and find the
/// index of the closest candidate.
///
/// The closest index is chosen independently of the radius (first one wins on
/// ties). Returns `None` when there are no candidates, when a candidate's
/// dimensionality differs from `point`, or when a distance is not finite.
pub fn nearest_within_radius<P>(
    point: &[f64],
    candidates: &[P],
    radius: f64,
) -> Option<(Vec<bool>, usize)>
where
    P: AsRef<[f64]>,
{
    // ---
    if candidates.is_empty() {
        return None;
    }

    let mut distances = Vec::with_capacity(candidates.len());
    for candidate in candidates {
        let candidate = candidate.as_ref();
        if candidate.len() != point.len() {
            tracing::debug!(
                expected = point.len(),
                found = candidate.len(),
                "Candidate dimensionality mismatch"
            );
            return None;
        }
        let distance = euclidean(point, candidate);
        if !distance.is_finite() {
            return None;
        }
        distances.push(distance);
    }

    let closest = distances
        .iter()
        .enumerate()
        .fold(0, |best, (i, d)| if *d < distances[best] { i } else { best });
    let within = distances.iter().map(|d| *d < radius).collect();

    Some((within, closest))
}

/// Euclidean distance between two points of equal dimensionality.
pub fn euclidean(a: &[f64], b: &[f64]) -> f64 {
    // ---
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y).powi(2))
        .sum::<f64>()
        .sqrt()
}
