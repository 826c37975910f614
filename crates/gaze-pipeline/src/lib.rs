//! Calibration session and per-frame gaze mapping.
//!
//! - [`session`]: the multi-point calibration protocol ([`CalibrationSession`]).
//! - [`mapper`]: [`GazeMapper`], which owns the filters, the calibrator and a
//!   session, and turns detector frames into clamped screen positions plus
//!   queued [`GazeEvent`]s.
//! - [`config`]: [`MapperConfig`], loaded from JSON.
//!
//! # Example
//!
//! ```
//! use gaze_core::{RawMeasurement, Vec2};
//! use gaze_pipeline::{GazeMapper, MapperConfig};
//!
//! let mut mapper = GazeMapper::new(MapperConfig::default()).unwrap();
//! let out = mapper.process(&RawMeasurement::new(0.0, Vec2::new(0.5, 0.5)));
//! assert!(out.valid);
//! assert!(mapper.is_tracking());
//!
//! mapper.start_calibration();
//! assert_eq!(mapper.progress().total_points, 9);
//! ```

pub mod config;
pub mod mapper;
pub mod session;

pub use config::MapperConfig;
pub use mapper::{AngleFallback, EyeRatioFallback, GazeEvent, GazeMapper};
pub use session::{
    CalibrationLayout, CalibrationReport, CalibrationSession, SampleOutcome, SessionConfig,
    SessionProgress, SessionState, calibration_quality,
};
