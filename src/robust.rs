//! Huber reweighting of the data residual.
//!
//! Ring weights are added to the residual before the Huber response is
//! taken: a reconstruction loop scales each residual sample by
//! `min(1, threshold / |r + w|)`, where `r` is the residual and `w` its
//! ring weight. Samples whose corrected residual stays within the
//! threshold keep full influence.

use ndarray::{Array, ArrayView, Dimension, Zip};

use crate::error::{RingError, RingResult};

/// Huber multiplier of `residual + weights` for every sample.
///
/// `threshold` must be finite and strictly positive, and both arrays
/// must share one shape.
pub fn huber_multiplier<D: Dimension>(
    residual: ArrayView<f32, D>,
    weights: ArrayView<f32, D>,
    threshold: f32,
) -> RingResult<Array<f32, D>> {
    if !threshold.is_finite() || threshold <= 0.0 {
        return Err(RingError::InvalidParameter(format!(
            "huber threshold must be finite and positive, got {threshold}"
        )));
    }
    if residual.shape() != weights.shape() {
        return Err(RingError::InvalidDimension(format!(
            "weights shape {:?} does not match residual shape {:?}",
            weights.shape(),
            residual.shape()
        )));
    }

    let mut multiplier = Array::<f32, D>::ones(residual.raw_dim());
    Zip::from(&mut multiplier)
        .and(&residual)
        .and(&weights)
        .par_for_each(|m, &r, &w| {
            let magnitude = (r + w).abs();
            if magnitude > threshold {
                *m = threshold / magnitude;
            }
        });
    Ok(multiplier)
}
