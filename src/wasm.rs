//! WebAssembly exports for ring weight estimation.
//!
//! These functions are exposed to JavaScript via wasm-bindgen.
//!
//! ## Buffer Layout
//!
//! Buffers are flat `Float32Array`s in `(slice, angle, detector)`
//! row-major order, length `angles * detectors * slices`.

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsError;

use crate::geometry::{VolumeShape, WindowHalfSizes};
use crate::weights::ring_weights;

/// Estimate ring weights for a flat residual buffer.
///
/// # Arguments
/// * `data` - Flat residual (length = angles * detectors * slices)
/// * `angles` - Number of projection angles
/// * `detectors` - Number of detector columns
/// * `slices` - Number of slices, 1 for a single sinogram
/// * `detectors_halfsize` - Half window along detectors (0 = off)
/// * `angles_halfsize` - Half window along angles (0 = off)
/// * `projections_halfsize` - Half window along slices (0 = off)
///
/// # Returns
/// Flat weights buffer. Zero everywhere when no axis is selected for a stack.
#[wasm_bindgen]
pub fn ring_weights_wasm(
    data: &[f32],
    angles: usize,
    detectors: usize,
    slices: usize,
    detectors_halfsize: usize,
    angles_halfsize: usize,
    projections_halfsize: usize,
) -> Result<Vec<f32>, JsError> {
    let shape = VolumeShape::new(angles, detectors, slices).map_err(|e| JsError::new(&e.to_string()))?;
    let half = WindowHalfSizes::new(detectors_halfsize, angles_halfsize, projections_halfsize);

    let mut weights = vec![0.0f32; shape.len()];
    ring_weights(data, &mut weights, half, shape).map_err(|e| JsError::new(&e.to_string()))?;
    Ok(weights)
}
