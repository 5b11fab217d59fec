//! Axis-aligned median filters for sinogram volumes.
//!
//! ## Layout
//!
//! | Input | Shape | Type |
//! |-------|-------|------|
//! | Sinogram | (angles, detectors) | f32 |
//! | Sinogram stack | (slices, angles, detectors) | f32 |
//!
//! ## Modules
//!
//! - **axis_median**: window gathering and rank selection along one lane
//! - **driver**: full-grid passes, parallel over lanes with rayon

pub mod axis_median;
pub mod driver;

pub use axis_median::{axis_median_at, median_rank};
pub use driver::{axis_median_filter, axis_median_filter_2d, axis_median_filter_into};
