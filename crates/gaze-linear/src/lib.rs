//! Polynomial calibration from raw gaze measurements to screen coordinates.
//!
//! - [`features`]: degree-2 feature expansion and per-axis standardization.
//! - [`ridge`]: ridge normal equations and a partial-pivot Gaussian solver.
//! - [`PolynomialCalibrator`]: fit / predict / persistence.
//! - [`CalibrationBlob`]: the JSON form of a fitted model.
//!
//! # Example
//!
//! ```
//! use gaze_core::{Pt2, Vec2};
//! use gaze_linear::PolynomialCalibrator;
//!
//! let raw = vec![
//!     Vec2::new(0.3, 0.3),
//!     Vec2::new(0.7, 0.3),
//!     Vec2::new(0.3, 0.7),
//!     Vec2::new(0.7, 0.7),
//!     Vec2::new(0.5, 0.5),
//!     Vec2::new(0.5, 0.3),
//! ];
//! let targets: Vec<Pt2> = raw.iter().map(|r| Pt2::new(r.x * 1920.0, r.y * 1080.0)).collect();
//!
//! let mut cal = PolynomialCalibrator::default();
//! cal.fit(&raw, &targets).unwrap();
//! let p = cal.predict(&Vec2::new(0.5, 0.5));
//! assert!((p.x - 960.0).abs() < 50.0);
//! ```

mod blob;
pub mod features;
mod polynomial;
pub mod ridge;

pub use blob::{BLOB_TYPE, CalibrationBlob, POLYNOMIAL_DEGREE, PersistenceError};
pub use polynomial::{
    CalibrationError, CalibrationPair, DEFAULT_RIDGE_ALPHA, FitStats, MIN_CALIBRATION_PAIRS,
    PolynomialCalibrator, PolynomialModel,
};
