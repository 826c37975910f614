//! High-level entry crate for webcam gaze estimation.
//!
//! Turns per-frame detector measurements (eye ratios or gaze angles) into a
//! stable, calibrated screen coordinate:
//!
//! 1. adaptive One-Euro filtering of the raw signal,
//! 2. ridge-regularized degree-2 polynomial calibration against on-screen
//!    targets, with a heuristic fallback until a calibration exists,
//! 3. output smoothing and clamping to the screen.
//!
//! ```no_run
//! use gaze::prelude::*;
//!
//! # fn main() -> anyhow::Result<()> {
//! let mut mapper = GazeMapper::new(MapperConfig::default())?;
//! mapper.start_calibration();
//!
//! // Once per video frame:
//! let out = mapper.process(&RawMeasurement::new(0.016, Vec2::new(0.51, 0.48)));
//! if let Some(target) = mapper.current_target() {
//!     println!("look at {target:?}, estimate {:?}", out.position);
//! }
//! for event in mapper.drain_events() {
//!     println!("{event:?}");
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Organization
//!
//! - **[`core`]**: types, screen geometry, filters, synthetic data
//! - **[`linear`]**: polynomial calibrator and calibration blob
//! - **[`pipeline`]**: calibration session, mapper, configuration
//! - **[`prelude`]**: common re-exports
//!
//! The mapper is single-threaded and takes `&mut self` for every call; hosts
//! that drive it from several threads wrap it in a `Mutex`.

/// Core types, filters and synthetic data helpers.
pub mod core {
    pub use gaze_core::*;
}

/// Polynomial calibration and its JSON blob.
pub mod linear {
    pub use gaze_linear::*;
}

/// Calibration session, per-frame mapper and configuration.
pub mod pipeline {
    pub use gaze_pipeline::*;
}

/// Convenient re-exports for common use cases.
///
/// Import with `use gaze::prelude::*;`.
pub mod prelude {
    pub use crate::core::{
        FilterPreset, GazeOutput, MeasurementKind, OneEuroFilter, OneEuroFilter2D, OneEuroParams,
        Pt2, RawMeasurement, Real, ScreenGeometry, Vec2,
    };
    pub use crate::linear::{CalibrationError, PersistenceError, PolynomialCalibrator};
    pub use crate::pipeline::{
        CalibrationLayout, CalibrationSession, GazeEvent, GazeMapper, MapperConfig,
        SampleOutcome, SessionState,
    };
}
