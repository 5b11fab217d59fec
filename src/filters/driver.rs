//! Whole-grid median passes.
//!
//! A pass filters every lane along one axis. Lanes are independent, so
//! they are spread over the rayon pool with one scratch window per
//! worker. Each call returns only after every lane is written, which is
//! the join later passes and the combiner rely on.

use ndarray::{Array2, Array3, ArrayView1, ArrayView2, ArrayView3, ArrayViewMut1, ArrayViewMut3, Axis};
use rayon::prelude::*;

use super::axis_median::{median_lane, window_capacity};
use crate::geometry::FilterAxis;

/// Median-filter `source` along `axis` into `dest`.
///
/// # Panics
/// Panics if `source` and `dest` differ in shape.
pub fn axis_median_filter_into(
    source: ArrayView3<f32>,
    mut dest: ArrayViewMut3<f32>,
    axis: FilterAxis,
    half: usize,
) {
    assert_eq!(source.dim(), dest.dim(), "source and destination shapes differ");
    let ax = axis.ndarray_axis();
    let window_len = window_capacity(half, source.len_of(ax));

    let src_lanes: Vec<ArrayView1<f32>> = source.lanes(ax).into_iter().collect();
    let dst_lanes: Vec<ArrayViewMut1<f32>> = dest.lanes_mut(ax).into_iter().collect();

    dst_lanes
        .into_par_iter()
        .zip(src_lanes.into_par_iter())
        .for_each_init(
            || Vec::with_capacity(window_len),
            |window, (out, lane)| median_lane(lane, out, half, window),
        );
}

/// Median-filter a `(slice, angle, detector)` volume along `axis`.
pub fn axis_median_filter(source: ArrayView3<f32>, axis: FilterAxis, half: usize) -> Array3<f32> {
    let mut dest = Array3::<f32>::zeros(source.raw_dim());
    axis_median_filter_into(source, dest.view_mut(), axis, half);
    dest
}

/// Median-filter an `(angle, detector)` sinogram along `axis`.
///
/// A 2D sinogram has a single slice, so [`FilterAxis::Projection`]
/// returns a copy of the input.
pub fn axis_median_filter_2d(source: ArrayView2<f32>, axis: FilterAxis, half: usize) -> Array2<f32> {
    axis_median_filter(source.insert_axis(Axis(0)), axis, half).index_axis_move(Axis(0), 0)
}
