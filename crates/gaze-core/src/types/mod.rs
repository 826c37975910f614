//! Common types shared across the gaze workspace.
//!
//! This module provides the per-frame measurement and output records and the
//! screen geometry used to convert between normalized and pixel coordinates.

mod measurement;
mod screen;

pub use measurement::*;
pub use screen::*;
