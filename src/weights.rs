//! Ring weights from per-axis median backgrounds.
//!
//! The active axes (non-zero half sizes) pick one [`Combination`] per
//! call. Each combination runs one to three median passes over the
//! residual and merges them elementwise:
//!
//! | Grid | angles | projections | detectors | Weights |
//! |------|--------|-------------|-----------|---------|
//! | 2D | 0 | - | any | `r - D` |
//! | 2D | >0 | - | any | `A - D` |
//! | 3D | 0 | >0 | 0 | `r - P` |
//! | 3D | 0 | 0 | >0 | `r - D` |
//! | 3D | >0 | >0 | >0 | `A - 0.5 * (P + D)` |
//! | 3D | >0 | >0 | 0 | `A - P` |
//! | 3D | >0 | 0 | >0 | `A - D` |
//! | 3D | 0 | >0 | >0 | `r - 0.5 * (P + D)` |
//! | 3D | any other | | | output left untouched |
//!
//! `r` is the residual and `A`, `P`, `D` its angle, projection and
//! detector medians. Output values are neither clamped nor rescaled.

use ndarray::{Array2, Array3, ArrayView2, ArrayView3, ArrayViewMut3, Axis, Zip};

use crate::error::{RingError, RingResult};
use crate::filters::{axis_median_filter, axis_median_filter_into};
use crate::geometry::{FilterAxis, VolumeShape, WindowHalfSizes};

/// How the median backgrounds are merged into weights.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Combination {
    /// `residual - detector median`
    ResidualMinusDetector,
    /// `residual - projection median`
    ResidualMinusProjection,
    /// `angle median - detector median`
    AngleMinusDetector,
    /// `angle median - projection median`
    AngleMinusProjection,
    /// `angle median - 0.5 * (projection median + detector median)`
    AngleMinusMeanProjectionDetector,
    /// `residual - 0.5 * (projection median + detector median)`
    ResidualMinusMeanProjectionDetector,
    /// No 3D branch matches; the output is not written.
    Untouched,
}

impl Combination {
    /// Pick the combination for a grid and its half sizes.
    pub fn resolve(half: &WindowHalfSizes, shape: &VolumeShape) -> Self {
        let angles = half.is_active(FilterAxis::Angle);
        let projections = half.is_active(FilterAxis::Projection);
        let detectors = half.is_active(FilterAxis::Detector);

        if shape.is_2d() {
            return if angles {
                Combination::AngleMinusDetector
            } else {
                Combination::ResidualMinusDetector
            };
        }

        match (angles, projections, detectors) {
            (false, true, false) => Combination::ResidualMinusProjection,
            (false, false, true) => Combination::ResidualMinusDetector,
            (true, true, true) => Combination::AngleMinusMeanProjectionDetector,
            (true, true, false) => Combination::AngleMinusProjection,
            (true, false, true) => Combination::AngleMinusDetector,
            (false, true, true) => Combination::ResidualMinusMeanProjectionDetector,
            (true, false, false) | (false, false, false) => Combination::Untouched,
        }
    }

    /// Whether this combination writes the output.
    pub fn writes_output(self) -> bool {
        self != Combination::Untouched
    }

    /// Run the passes and write `weights`.
    ///
    /// The last median of each formula is filtered straight into
    /// `weights` and then merged in place, so at most two scratch
    /// volumes are alive at once.
    fn apply(self, residual: ArrayView3<f32>, mut weights: ArrayViewMut3<f32>, half: &WindowHalfSizes) {
        let median = |axis: FilterAxis| axis_median_filter(residual, axis, half.half(axis));

        match self {
            Combination::ResidualMinusDetector => {
                median_into(residual, &mut weights, FilterAxis::Detector, half);
                subtract_from(residual, weights);
            }
            Combination::ResidualMinusProjection => {
                median_into(residual, &mut weights, FilterAxis::Projection, half);
                subtract_from(residual, weights);
            }
            Combination::AngleMinusDetector => {
                let angle = median(FilterAxis::Angle);
                median_into(residual, &mut weights, FilterAxis::Detector, half);
                subtract_from(angle.view(), weights);
            }
            Combination::AngleMinusProjection => {
                let angle = median(FilterAxis::Angle);
                median_into(residual, &mut weights, FilterAxis::Projection, half);
                subtract_from(angle.view(), weights);
            }
            Combination::AngleMinusMeanProjectionDetector => {
                let angle = median(FilterAxis::Angle);
                let projection = median(FilterAxis::Projection);
                median_into(residual, &mut weights, FilterAxis::Detector, half);
                subtract_mean_from(angle.view(), projection.view(), weights);
            }
            Combination::ResidualMinusMeanProjectionDetector => {
                let projection = median(FilterAxis::Projection);
                median_into(residual, &mut weights, FilterAxis::Detector, half);
                subtract_mean_from(residual, projection.view(), weights);
            }
            Combination::Untouched => {}
        }
    }
}

/// Filter `residual` along `axis` straight into `weights`.
fn median_into(
    residual: ArrayView3<f32>,
    weights: &mut ArrayViewMut3<'_, f32>,
    axis: FilterAxis,
    half: &WindowHalfSizes,
) {
    axis_median_filter_into(residual, weights.view_mut(), axis, half.half(axis));
}

/// `weights = minuend - weights`
fn subtract_from(minuend: ArrayView3<f32>, weights: ArrayViewMut3<f32>) {
    Zip::from(weights)
        .and(minuend)
        .par_for_each(|w, &m| *w = m - *w);
}

/// `weights = minuend - 0.5 * (other + weights)`
fn subtract_mean_from(minuend: ArrayView3<f32>, other: ArrayView3<f32>, weights: ArrayViewMut3<f32>) {
    Zip::from(weights)
        .and(minuend)
        .and(other)
        .par_for_each(|w, &m, &o| *w = m - 0.5 * (o + *w));
}

/// Estimate ring weights into a caller-owned volume.
///
/// `residual` and `weights` are `(slices, angles, detectors)` volumes of
/// the same shape. With a single slice the 2D rules apply and the
/// projection half size is ignored.
///
/// Returns the combination that ran. When it is
/// [`Combination::Untouched`] `weights` keeps whatever it held before
/// the call.
pub fn ring_weights_into(
    residual: ArrayView3<f32>,
    weights: ArrayViewMut3<f32>,
    half: WindowHalfSizes,
) -> RingResult<Combination> {
    let shape = VolumeShape::from_dim(residual.dim())?;
    if weights.dim() != residual.dim() {
        return Err(RingError::InvalidDimension(format!(
            "weights shape {:?} does not match residual shape {:?}",
            weights.dim(),
            residual.dim()
        )));
    }

    for warning in shape.window_warnings(&half) {
        log::warn!("{warning}; out-of-range taps fall back to the center value");
    }

    let combination = Combination::resolve(&half, &shape);
    log::debug!(
        "ring weights: {}x{}x{} (angles x detectors x slices), half sizes {:?}, {:?}",
        shape.angles,
        shape.detectors,
        shape.slices,
        half,
        combination
    );
    if !combination.writes_output() {
        log::warn!(
            "no combination matches half sizes {:?} for a 3D residual; weights left unchanged",
            half
        );
    } else if shape.is_2d() && !half.is_active(FilterAxis::Angle) && !half.is_active(FilterAxis::Detector) {
        log::debug!("all 2D half sizes are zero; weights will be zero");
    }

    combination.apply(residual, weights, &half);
    Ok(combination)
}

/// Estimate ring weights for a flat row-major buffer.
///
/// `residual` and `weights` both hold `shape.len()` values indexed as
/// `slice * (angles * detectors) + angle * detectors + detector`.
/// `weights` is overwritten unless the combination is
/// [`Combination::Untouched`], in which case it is left as is.
pub fn ring_weights(
    residual: &[f32],
    weights: &mut [f32],
    half: WindowHalfSizes,
    shape: VolumeShape,
) -> RingResult<Combination> {
    shape.validate()?;
    shape.check_len("residual", residual.len())?;
    shape.check_len("weights", weights.len())?;

    let residual = ArrayView3::from_shape(shape.dim(), residual)
        .map_err(|e| RingError::InvalidDimension(e.to_string()))?;
    let weights = ArrayViewMut3::from_shape(shape.dim(), weights)
        .map_err(|e| RingError::InvalidDimension(e.to_string()))?;

    ring_weights_into(residual, weights, half)
}

/// Ring weights of an `(angles, detectors)` sinogram.
///
/// The projection half size is ignored.
pub fn ring_weights_2d(residual: ArrayView2<f32>, half: WindowHalfSizes) -> RingResult<Array2<f32>> {
    let mut weights = Array2::<f32>::zeros(residual.raw_dim());
    ring_weights_into(
        residual.insert_axis(Axis(0)),
        weights.view_mut().insert_axis(Axis(0)),
        half,
    )?;
    Ok(weights)
}

/// Ring weights of a `(slices, angles, detectors)` stack.
///
/// The output starts zeroed, so a call that selects no axis returns
/// all zeros.
pub fn ring_weights_3d(residual: ArrayView3<f32>, half: WindowHalfSizes) -> RingResult<Array3<f32>> {
    let mut weights = Array3::<f32>::zeros(residual.raw_dim());
    ring_weights_into(residual, weights.view_mut(), half)?;
    Ok(weights)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn shape3() -> VolumeShape {
        VolumeShape::new(4, 5, 3).unwrap()
    }

    #[test]
    fn test_resolve_2d() {
        let shape = VolumeShape::new_2d(4, 5).unwrap();
        assert_eq!(
            Combination::resolve(&WindowHalfSizes::new(2, 0, 0), &shape),
            Combination::ResidualMinusDetector
        );
        assert_eq!(
            Combination::resolve(&WindowHalfSizes::new(2, 1, 5), &shape),
            Combination::AngleMinusDetector
        );
    }

    #[test]
    fn test_resolve_3d_table() {
        let shape = shape3();
        let cases = [
            ((0, 0, 1), Combination::ResidualMinusProjection),
            ((1, 0, 0), Combination::ResidualMinusDetector),
            ((1, 1, 1), Combination::AngleMinusMeanProjectionDetector),
            ((0, 1, 1), Combination::AngleMinusProjection),
            ((1, 1, 0), Combination::AngleMinusDetector),
            ((1, 0, 1), Combination::ResidualMinusMeanProjectionDetector),
            ((0, 1, 0), Combination::Untouched),
            ((0, 0, 0), Combination::Untouched),
        ];
        for (half, expected) in cases {
            assert_eq!(
                Combination::resolve(&WindowHalfSizes::from(half), &shape),
                expected,
                "half sizes {half:?}"
            );
        }
    }

    #[test]
    fn test_2d_constant_row_gives_zero() {
        let residual = array![[5.0f32, 5.0, 5.0, 5.0]];
        let weights = ring_weights_2d(residual.view(), WindowHalfSizes::new(1, 0, 0)).unwrap();
        assert!(weights.iter().all(|&w| w == 0.0));
    }

    #[test]
    fn test_2d_angle_branch() {
        let residual = array![[1.0f32, 4.0, 2.0], [7.0, 3.0, 9.0], [0.0, 5.0, 6.0]];
        let half = WindowHalfSizes::new(1, 1, 0);
        let weights = ring_weights_2d(residual.view(), half).unwrap();

        let angle = crate::filters::axis_median_filter_2d(residual.view(), FilterAxis::Angle, 1);
        let det = crate::filters::axis_median_filter_2d(residual.view(), FilterAxis::Detector, 1);
        assert_eq!(weights, &angle - &det);
    }

    #[test]
    fn test_2d_angles_without_detectors_is_angle_minus_residual() {
        let residual = array![[1.0f32, 4.0, 2.0], [7.0, 3.0, 9.0], [0.0, 5.0, 6.0]];
        let half = WindowHalfSizes::new(0, 1, 0);
        let shape = VolumeShape::new_2d(3, 3).unwrap();
        assert_eq!(Combination::resolve(&half, &shape), Combination::AngleMinusDetector);

        let weights = ring_weights_2d(residual.view(), half).unwrap();
        let angle = crate::filters::axis_median_filter_2d(residual.view(), FilterAxis::Angle, 1);
        assert_eq!(weights, &angle - &residual);
    }

    #[test]
    fn test_untouched_keeps_prefilled_weights() {
        let residual = Array3::<f32>::ones((2, 3, 3));
        let mut weights = Array3::<f32>::from_elem((2, 3, 3), -7.0);
        let combination =
            ring_weights_into(residual.view(), weights.view_mut(), WindowHalfSizes::default()).unwrap();
        assert_eq!(combination, Combination::Untouched);
        assert!(weights.iter().all(|&w| w == -7.0));
    }

    #[test]
    fn test_mismatched_weights_rejected() {
        let residual = Array3::<f32>::zeros((2, 3, 3));
        let mut weights = Array3::<f32>::from_elem((2, 3, 4), 1.0);
        let err = ring_weights_into(residual.view(), weights.view_mut(), WindowHalfSizes::new(1, 0, 0))
            .unwrap_err();
        assert!(matches!(err, RingError::InvalidDimension(ref msg) if msg.contains("(2, 3, 4)")));
        assert!(weights.iter().all(|&w| w == 1.0));
    }

    #[test]
    fn test_flat_buffer_length_checked() {
        let shape = VolumeShape::new(2, 2, 1).unwrap();
        let residual = [1.0f32; 4];
        let mut weights = [0.0f32; 3];
        let err = ring_weights(&residual, &mut weights, WindowHalfSizes::new(1, 0, 0), shape).unwrap_err();
        assert!(matches!(err, RingError::InvalidDimension(_)));
    }
}
