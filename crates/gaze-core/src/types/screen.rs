//! Screen geometry: normalized ↔ pixel conversion and clamping.

use serde::{Deserialize, Serialize};

use crate::{Pt2, Real};

/// Pixel dimensions of the display the gaze is mapped onto.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScreenGeometry {
    pub width: Real,
    pub height: Real,
}

impl Default for ScreenGeometry {
    fn default() -> Self {
        Self {
            width: 1920.0,
            height: 1080.0,
        }
    }
}

impl ScreenGeometry {
    pub fn new(width: Real, height: Real) -> Self {
        Self { width, height }
    }

    /// Screen center in pixels.
    pub fn center(&self) -> Pt2 {
        Pt2::new(self.width * 0.5, self.height * 0.5)
    }

    /// Length of the screen diagonal in pixels.
    pub fn diagonal(&self) -> Real {
        self.width.hypot(self.height)
    }

    /// Map a normalized `[0, 1]²` position to pixels.
    pub fn to_pixels(&self, normalized: &Pt2) -> Pt2 {
        Pt2::new(normalized.x * self.width, normalized.y * self.height)
    }

    /// Map a pixel position to normalized coordinates.
    pub fn to_normalized(&self, pixels: &Pt2) -> Pt2 {
        Pt2::new(pixels.x / self.width, pixels.y / self.height)
    }

    /// Clamp a pixel position to `[0, width - 1] × [0, height - 1]`.
    ///
    /// Non-finite coordinates collapse to the screen center.
    pub fn clamp(&self, pixels: &Pt2) -> Pt2 {
        let max_x = (self.width - 1.0).max(0.0);
        let max_y = (self.height - 1.0).max(0.0);
        let x = if pixels.x.is_finite() {
            pixels.x.clamp(0.0, max_x)
        } else {
            self.center().x.min(max_x)
        };
        let y = if pixels.y.is_finite() {
            pixels.y.clamp(0.0, max_y)
        } else {
            self.center().y.min(max_y)
        };
        Pt2::new(x, y)
    }
}
