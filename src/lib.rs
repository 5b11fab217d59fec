//! Ring Weights Rust Extensions
//!
//! Per-pixel weights for suppressing ring and stripe artifacts in
//! tomographic reconstructions, with Python bindings via PyO3 and WASM
//! bindings for JavaScript.
//!
//! ## Data Layout
//! Residuals are single precision and row-major:
//! - **Sinogram**: (angles, detectors)
//! - **Sinogram stack**: (slices, angles, detectors)
//!
//! ## Pipeline
//! 1. Median passes along each active axis (half window > 0) estimate a
//!    smooth background of the residual.
//! 2. The passes are merged elementwise into the weights, see
//!    [`weights`] for the full table.
//! 3. Downstream, [`robust::huber_multiplier`] adds the weights to the
//!    residual and turns the sum into Huber scale factors.
//!
//! Median windows replace out-of-range taps with the center sample and
//! select the sorted element one below the middle of the window; see
//! [`filters::axis_median`].

pub mod error;
pub mod filters;
pub mod geometry;
pub mod robust;
pub mod weights;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use error::{RingError, RingResult};
pub use filters::{axis_median_at, axis_median_filter, axis_median_filter_2d};
pub use geometry::{FilterAxis, VolumeShape, WindowExceedsAxis, WindowHalfSizes};
pub use robust::huber_multiplier;
pub use weights::{ring_weights, ring_weights_2d, ring_weights_3d, ring_weights_into, Combination};

// Python bindings (only when python feature is enabled)
#[cfg(feature = "python")]
mod python {
    use numpy::{IntoPyArray, PyArray2, PyArray3, PyArrayDyn, PyReadonlyArray2, PyReadonlyArray3, PyReadonlyArrayDyn};
    use pyo3::exceptions::PyValueError;
    use pyo3::prelude::*;

    use crate::error::RingError;
    use crate::geometry::WindowHalfSizes;

    impl From<RingError> for PyErr {
        fn from(err: RingError) -> PyErr {
            PyValueError::new_err(err.to_string())
        }
    }

    // ========================================================================
    // Ring Weights
    // ========================================================================

    /// Ring weights of a 2D sinogram (angles, detectors).
    ///
    /// # Arguments
    /// * `residual` - Residual sinogram as f32
    /// * `detectors_halfsize` - Half window along detectors (0 = off)
    /// * `angles_halfsize` - Half window along angles (0 = off)
    #[pyfunction]
    #[pyo3(signature = (residual, detectors_halfsize=9, angles_halfsize=7))]
    pub fn ring_weights_2d<'py>(
        py: Python<'py>,
        residual: PyReadonlyArray2<'py, f32>,
        detectors_halfsize: usize,
        angles_halfsize: usize,
    ) -> PyResult<Bound<'py, PyArray2<f32>>> {
        let half = WindowHalfSizes::new(detectors_halfsize, angles_halfsize, 0);
        let result = crate::weights::ring_weights_2d(residual.as_array(), half)?;
        Ok(result.into_pyarray(py))
    }

    /// Ring weights of a sinogram stack (slices, angles, detectors).
    ///
    /// Returns zeros when all half sizes select no branch.
    #[pyfunction]
    #[pyo3(signature = (residual, detectors_halfsize=9, angles_halfsize=7, projections_halfsize=0))]
    pub fn ring_weights_3d<'py>(
        py: Python<'py>,
        residual: PyReadonlyArray3<'py, f32>,
        detectors_halfsize: usize,
        angles_halfsize: usize,
        projections_halfsize: usize,
    ) -> PyResult<Bound<'py, PyArray3<f32>>> {
        let half = WindowHalfSizes::new(detectors_halfsize, angles_halfsize, projections_halfsize);
        let result = crate::weights::ring_weights_3d(residual.as_array(), half)?;
        Ok(result.into_pyarray(py))
    }

    /// Huber multiplier `min(1, threshold / |r + w|)` of a residual and its ring weights.
    #[pyfunction]
    pub fn huber_multiplier<'py>(
        py: Python<'py>,
        residual: PyReadonlyArrayDyn<'py, f32>,
        weights: PyReadonlyArrayDyn<'py, f32>,
        threshold: f32,
    ) -> PyResult<Bound<'py, PyArrayDyn<f32>>> {
        let result = crate::robust::huber_multiplier(residual.as_array(), weights.as_array(), threshold)?;
        Ok(result.into_pyarray(py))
    }

    /// Ring weights Rust extension module
    #[pymodule]
    pub fn ringweights_rust(m: &Bound<'_, PyModule>) -> PyResult<()> {
        m.add_function(wrap_pyfunction!(ring_weights_2d, m)?)?;
        m.add_function(wrap_pyfunction!(ring_weights_3d, m)?)?;
        m.add_function(wrap_pyfunction!(huber_multiplier, m)?)?;
        Ok(())
    }
}

#[cfg(feature = "python")]
pub use python::ringweights_rust;
