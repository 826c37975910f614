//! Signal smoothing stages.
//!
//! - [`OneEuroFilter`] / [`OneEuroFilter2D`]: adaptive low-pass on raw
//!   measurements.
//! - [`MovingAverage`]: fixed-window mean, an optional noise-floor pass.
//! - [`ExponentialSmoother`]: coarse smoothing between output positions.

mod exponential;
mod moving_average;
mod one_euro;
mod preset;

pub use exponential::ExponentialSmoother;
pub use moving_average::MovingAverage;
pub use one_euro::{FALLBACK_DT, OneEuroFilter, OneEuroFilter2D, OneEuroParams, smoothing_factor};
pub use preset::FilterPreset;
