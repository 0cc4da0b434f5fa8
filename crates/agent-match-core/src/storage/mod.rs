//! Vector store implementations and the checks they share

mod memory;

pub use memory::InMemoryVectorStore;

use crate::data::CoreError;

/// Checks a vector against the configured dimension and returns its L2 norm.
///
/// Rejects wrong lengths with `DimensionMismatch`, and NaN/infinite entries or
/// an all-zero vector with `ValidationError`. Cosine distance is undefined for
/// a zero-norm vector, so it is refused rather than scored.
pub fn validate_vector(embedding: &[f32], dimension: usize) -> Result<f64, CoreError> {
    if embedding.len() != dimension {
        return Err(CoreError::dimension_mismatch(dimension, embedding.len()));
    }

    if let Some(position) = embedding.iter().position(|v| !v.is_finite()) {
        return Err(CoreError::ValidationError(format!(
            "vector contains a non-finite value at index {}",
            position
        )));
    }

    let norm = l2_norm(embedding);
    if norm == 0.0 {
        return Err(CoreError::ValidationError(
            "vector has zero norm; cosine distance is undefined".to_string(),
        ));
    }

    Ok(norm)
}

/// L2 norm accumulated in `f64`.
pub fn l2_norm(v: &[f32]) -> f64 {
    v.iter().map(|&x| (x as f64) * (x as f64)).sum::<f64>().sqrt()
}

/// Cosine distance `1 - (a·b)/(|a||b|)` with precomputed norms.
///
/// Both norms must be non-zero (see [`validate_vector`]). The result is clamped
/// to `[0, 2]` to absorb rounding on (anti)parallel vectors.
pub fn cosine_distance_with_norms(a: &[f32], a_norm: f64, b: &[f32], b_norm: f64) -> f64 {
    let dot: f64 = a
        .iter()
        .zip(b.iter())
        .map(|(&x, &y)| (x as f64) * (y as f64))
        .sum();
    (1.0 - dot / (a_norm * b_norm)).clamp(0.0, 2.0)
}

/// Cosine distance between two vectors of equal length.
pub fn cosine_distance(a: &[f32], b: &[f32]) -> f64 {
    cosine_distance_with_norms(a, l2_norm(a), b, l2_norm(b))
}
