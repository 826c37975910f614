//! Core types, filters and synthetic data helpers for webcam gaze estimation.
//!
//! This crate provides the building blocks used by the other crates in the
//! workspace:
//!
//! - scalar and vector aliases (`Real`, `Vec2`, `Pt2`),
//! - per-frame measurement and output records, screen geometry,
//! - smoothing filters (One-Euro, moving average, exponential),
//! - deterministic synthetic measurement streams.
//!
//! # Modules
//!
//! - \[`math`\]: type aliases and small vector helpers.
//! - \[`types`\]: measurement, output and screen types.
//! - \[`filter`\]: adaptive and fixed smoothing stages.
//! - \[`synthetic`\]: forward models and deterministic noise (tests/examples).
//!
//! # Example
//!
//! ```
//! use gaze_core::{FilterPreset, OneEuroFilter2D, Vec2};
//!
//! let params = FilterPreset::Balanced.params().unwrap();
//! let mut filter = OneEuroFilter2D::new(params);
//! let first = filter.filter(Vec2::new(0.52, 0.47), 0.0);
//! assert_eq!(first, Vec2::new(0.52, 0.47));
//! ```

/// Scalar/vector aliases and helpers.
mod math;
/// Smoothing filters.
pub mod filter;
/// Deterministic synthetic data generation helpers.
pub mod synthetic;
/// Measurement, output and screen types.
mod types;

pub use filter::*;
pub use math::*;
pub use types::*;
