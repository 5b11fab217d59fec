//! Sliding-window rank selection along a single axis.
//!
//! ## Window
//!
//! For a half size `h` the window at position `i` holds the `2h + 1`
//! samples `lane[i - h ..= i + h]`. Taps that fall outside the lane are
//! replaced by the center sample `lane[i]` itself, not by the nearest
//! edge sample and not by a reflection. Near the borders this pulls the
//! estimate towards the pixel's own value.
//!
//! ## Rank
//!
//! The selected value is the sorted element at index `h - 1`, one below
//! the middle of the window. Downstream weighting is tuned against this
//! rank, so it must stay as is. `h == 0` has a one-sample window and
//! returns the sample.

use ndarray::{s, ArrayView1, ArrayView3, ArrayViewMut1};

use crate::geometry::FilterAxis;

/// Sorted index picked from a window with half size `half`.
#[inline]
pub fn median_rank(half: usize) -> usize {
    half.saturating_sub(1)
}

/// Scratch capacity needed for a window of half size `half` on a lane of `len` samples.
#[inline]
pub fn window_capacity(half: usize, len: usize) -> usize {
    half.saturating_mul(2).saturating_add(1).min(len)
}

/// Collect the in-range taps around `center` into `window`.
///
/// Returns the center value and the number of taps that fell outside
/// the lane and stand in for it. At most `lane.len()` values are stored,
/// however large `half` is.
#[inline]
fn gather_window(
    lane: &ArrayView1<f32>,
    center: usize,
    half: usize,
    window: &mut Vec<f32>,
) -> (f32, usize) {
    window.clear();
    let last = lane.len() - 1;
    let first = center.saturating_sub(half);
    let end = center.saturating_add(half).min(last);
    window.extend(lane.slice(s![first..=end]).iter().copied());

    let substitutes = half
        .saturating_sub(center)
        .saturating_add(half.saturating_sub(last - center));
    (lane[center], substitutes)
}

/// Value at sorted index `rank` of `window`. Reorders `window`.
///
/// Uses a total order, so NaN samples sort above every number instead of
/// breaking the selection.
#[inline]
pub fn select_rank(window: &mut [f32], rank: usize) -> f32 {
    let (_, value, _) = window.select_nth_unstable_by(rank, |a, b| a.total_cmp(b));
    *value
}

/// Sorted index `rank` of `window` extended by `substitutes` copies of
/// `center_value`, without materializing the copies.
fn select_rank_with_center(
    window: &mut [f32],
    center_value: f32,
    substitutes: usize,
    rank: usize,
) -> f32 {
    if substitutes == 0 {
        return select_rank(window, rank);
    }
    let below = window
        .iter()
        .filter(|v| v.total_cmp(&center_value).is_lt())
        .count();
    if rank < below {
        select_rank(window, rank)
    } else if rank < below.saturating_add(substitutes) {
        center_value
    } else {
        select_rank(window, rank - substitutes)
    }
}

/// Filter a whole lane into `out`.
///
/// `window` is scratch space reused across positions; its previous
/// contents are ignored.
pub fn median_lane(
    lane: ArrayView1<f32>,
    mut out: ArrayViewMut1<f32>,
    half: usize,
    window: &mut Vec<f32>,
) {
    debug_assert_eq!(lane.len(), out.len());
    let rank = median_rank(half);
    for (center, value) in out.iter_mut().enumerate() {
        let (center_value, substitutes) = gather_window(&lane, center, half, window);
        *value = select_rank_with_center(window, center_value, substitutes, rank);
    }
}

/// Filtered value at a single coordinate of a `(slice, angle, detector)` volume.
///
/// # Panics
/// Panics if the coordinate is outside `source`.
pub fn axis_median_at(
    source: ArrayView3<f32>,
    axis: FilterAxis,
    half: usize,
    (slice, angle, detector): (usize, usize, usize),
) -> f32 {
    let (lane, center) = match axis {
        FilterAxis::Detector => (source.slice(s![slice, angle, ..]), detector),
        FilterAxis::Angle => (source.slice(s![slice, .., detector]), angle),
        FilterAxis::Projection => (source.slice(s![.., angle, detector]), slice),
    };
    let mut window = Vec::with_capacity(window_capacity(half, lane.len()));
    let (center_value, substitutes) = gather_window(&lane, center, half, &mut window);
    select_rank_with_center(&mut window, center_value, substitutes, median_rank(half))
}
