//! Deterministic synthetic data generation helpers.
//!
//! Small building blocks for tests and benchmarks:
//! - forward models from screen targets to eye ratios or gaze angles,
//! - fixation streams at a fixed frame rate,
//! - seeded detector noise: jitter, drift and blink dropouts.
//!
//! # Example
//!
//! ```
//! use gaze_core::synthetic::{DetectorNoise, EyeRatioModel, fixation_stream};
//! use gaze_core::Pt2;
//!
//! let model = EyeRatioModel::default();
//! let raw = model.raw_for_target(&Pt2::new(0.15, 0.85));
//! let frames = fixation_stream(raw, 0.0, 30.0, 45, &DetectorNoise::new(7, 0.005), 0);
//! assert_eq!(frames.len(), 45);
//! ```

mod eye;
mod noise;

pub use eye::{EyeRatioModel, GazeAngleModel, fixation_stream};
pub use noise::DetectorNoise;
