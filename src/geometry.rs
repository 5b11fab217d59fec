//! Grid shape, filter axes and window half sizes.
//!
//! ## Layout
//!
//! Volumes are stored row-major as `(slice, angle, detector)`:
//!
//! ```text
//! index(angle, detector, slice) = slice * (angles * detectors) + angle * detectors + detector
//! ```
//!
//! A 2D sinogram is the special case `slices == 1`.

use std::fmt;

use ndarray::Axis;

use crate::error::{RingError, RingResult};

/// One of the three sinogram axes a median pass can run along.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterAxis {
    /// Detector axis (innermost, stride 1)
    Detector,
    /// Projection angle axis
    Angle,
    /// Slice axis, only meaningful for 3D stacks
    Projection,
}

impl FilterAxis {
    /// ndarray axis of this filter axis in a `(slice, angle, detector)` volume.
    #[inline]
    pub fn ndarray_axis(self) -> Axis {
        match self {
            FilterAxis::Projection => Axis(0),
            FilterAxis::Angle => Axis(1),
            FilterAxis::Detector => Axis(2),
        }
    }

    fn name(self) -> &'static str {
        match self {
            FilterAxis::Detector => "detector",
            FilterAxis::Angle => "angle",
            FilterAxis::Projection => "projection",
        }
    }
}

impl fmt::Display for FilterAxis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Half window sizes per axis. A half size of 0 disables that axis.
///
/// Field order follows the `(detectors, angles, slices)` tuple used by
/// reconstruction front-ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WindowHalfSizes {
    /// Half window along detectors
    pub detectors: usize,
    /// Half window along angles
    pub angles: usize,
    /// Half window along slices (3D only)
    pub projections: usize,
}

impl WindowHalfSizes {
    /// Create from `(detectors, angles, projections)` half sizes.
    pub fn new(detectors: usize, angles: usize, projections: usize) -> Self {
        Self {
            detectors,
            angles,
            projections,
        }
    }

    /// Half size for `axis`.
    #[inline]
    pub fn half(&self, axis: FilterAxis) -> usize {
        match axis {
            FilterAxis::Detector => self.detectors,
            FilterAxis::Angle => self.angles,
            FilterAxis::Projection => self.projections,
        }
    }

    /// Full window length `2 * half + 1` for `axis`. Always odd and >= 1,
    /// saturating at `usize::MAX` for huge half sizes.
    #[inline]
    pub fn full_window(&self, axis: FilterAxis) -> usize {
        self.half(axis).saturating_mul(2).saturating_add(1)
    }

    /// Whether `axis` takes part in filtering.
    #[inline]
    pub fn is_active(&self, axis: FilterAxis) -> bool {
        self.half(axis) != 0
    }
}

impl From<(usize, usize, usize)> for WindowHalfSizes {
    fn from((detectors, angles, projections): (usize, usize, usize)) -> Self {
        Self::new(detectors, angles, projections)
    }
}

/// Extents of a sinogram volume.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VolumeShape {
    /// Number of projection angles
    pub angles: usize,
    /// Number of detector columns
    pub detectors: usize,
    /// Number of slices (1 for a 2D sinogram)
    pub slices: usize,
}

impl VolumeShape {
    /// Create a shape, rejecting zero extents.
    pub fn new(angles: usize, detectors: usize, slices: usize) -> RingResult<Self> {
        let shape = Self {
            angles,
            detectors,
            slices,
        };
        shape.validate()?;
        Ok(shape)
    }

    /// Shape of a 2D `(angles, detectors)` sinogram.
    pub fn new_2d(angles: usize, detectors: usize) -> RingResult<Self> {
        Self::new(angles, detectors, 1)
    }

    /// Shape of an ndarray volume laid out as `(slices, angles, detectors)`.
    pub fn from_dim((slices, angles, detectors): (usize, usize, usize)) -> RingResult<Self> {
        Self::new(angles, detectors, slices)
    }

    /// The `(slices, angles, detectors)` tuple ndarray uses for this shape.
    #[inline]
    pub fn dim(&self) -> (usize, usize, usize) {
        (self.slices, self.angles, self.detectors)
    }

    /// Check every extent is at least 1.
    pub fn validate(&self) -> RingResult<()> {
        for (name, extent) in [
            ("angles", self.angles),
            ("detectors", self.detectors),
            ("slices", self.slices),
        ] {
            if extent == 0 {
                return Err(RingError::InvalidDimension(format!(
                    "{name} extent must be at least 1"
                )));
            }
        }
        Ok(())
    }

    /// Total number of cells.
    #[inline]
    pub fn len(&self) -> usize {
        self.angles * self.detectors * self.slices
    }

    /// Always false for a validated shape.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// True when this is a single-slice sinogram.
    #[inline]
    pub fn is_2d(&self) -> bool {
        self.slices == 1
    }

    /// Extent along `axis`.
    #[inline]
    pub fn extent(&self, axis: FilterAxis) -> usize {
        match axis {
            FilterAxis::Detector => self.detectors,
            FilterAxis::Angle => self.angles,
            FilterAxis::Projection => self.slices,
        }
    }

    /// Row-major flat index of `(angle, detector, slice)`.
    #[inline]
    pub fn index(&self, angle: usize, detector: usize, slice: usize) -> usize {
        slice * (self.angles * self.detectors) + angle * self.detectors + detector
    }

    /// Check that a flat buffer of `len` values matches this shape.
    pub fn check_len(&self, what: &str, len: usize) -> RingResult<()> {
        if len != self.len() {
            return Err(RingError::InvalidDimension(format!(
                "{what} holds {len} values, shape {}x{}x{} needs {}",
                self.angles,
                self.detectors,
                self.slices,
                self.len()
            )));
        }
        Ok(())
    }

    /// Active axes whose full window is longer than the axis itself.
    ///
    /// Such windows are not an error: every out-of-range tap falls back
    /// to the center value, so filtering along that axis becomes weak or
    /// a no-op. The numeric result is unaffected by this check.
    pub fn window_warnings(&self, half: &WindowHalfSizes) -> Vec<WindowExceedsAxis> {
        let axes: &[FilterAxis] = if self.is_2d() {
            &[FilterAxis::Detector, FilterAxis::Angle]
        } else {
            &[FilterAxis::Detector, FilterAxis::Angle, FilterAxis::Projection]
        };
        axes.iter()
            .copied()
            .filter(|&axis| half.is_active(axis))
            .filter(|&axis| half.full_window(axis) > self.extent(axis))
            .map(|axis| WindowExceedsAxis {
                axis,
                full_window: half.full_window(axis),
                extent: self.extent(axis),
            })
            .collect()
    }
}

/// A window that does not fit inside its axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowExceedsAxis {
    /// Offending axis
    pub axis: FilterAxis,
    /// Full window length along the axis
    pub full_window: usize,
    /// Axis extent
    pub extent: usize,
}

impl fmt::Display for WindowExceedsAxis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} window of {} exceeds axis extent {}",
            self.axis, self.full_window, self.extent
        )
    }
}
