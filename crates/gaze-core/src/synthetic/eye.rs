//! Known forward models from screen targets to raw measurements.
//!
//! Calibration recovers the inverse of these models, so a noiseless stream
//! generated here gives a ground truth to check fits against.

use crate::{Pt2, RawMeasurement, Real, Vec2};

use super::noise::DetectorNoise;

/// Quadratic forward model from a normalized screen target to an eye ratio.
///
/// `raw = center + gain ⊙ d + curvature ⊙ d²` with `d = target - 0.5`, plus a
/// small cross term on the vertical axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EyeRatioModel {
    pub center: Vec2,
    pub gain: Vec2,
    pub curvature: Vec2,
    pub cross: Real,
}

impl Default for EyeRatioModel {
    fn default() -> Self {
        Self {
            center: Vec2::new(0.5, 0.48),
            gain: Vec2::new(0.3, 0.18),
            curvature: Vec2::new(0.02, 0.04),
            cross: 0.01,
        }
    }
}

impl EyeRatioModel {
    /// Eye ratio produced while fixating `target` (normalized screen coordinates).
    pub fn raw_for_target(&self, target: &Pt2) -> Vec2 {
        let dx = target.x - 0.5;
        let dy = target.y - 0.5;
        Vec2::new(
            self.center.x + self.gain.x * dx + self.curvature.x * dx * dx,
            self.center.y + self.gain.y * dy + self.curvature.y * dy * dy + self.cross * dx * dy,
        )
    }
}

/// Pinhole-style forward model from a screen target to `(pitch, yaw)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GazeAngleModel {
    /// Eye-to-screen distance (mm).
    pub distance_mm: Real,
    /// Physical screen width (mm).
    pub screen_width_mm: Real,
    /// Physical screen height (mm).
    pub screen_height_mm: Real,
    /// Constant detector bias `(pitch, yaw)` in radians.
    pub bias: Vec2,
}

impl Default for GazeAngleModel {
    fn default() -> Self {
        Self {
            distance_mm: 600.0,
            screen_width_mm: 520.0,
            screen_height_mm: 290.0,
            bias: Vec2::new(0.05, -0.03),
        }
    }
}

impl GazeAngleModel {
    /// Gaze angles `(pitch, yaw)` produced while fixating `target`.
    ///
    /// Looking right or down gives negative yaw or pitch respectively.
    pub fn raw_for_target(&self, target: &Pt2) -> Vec2 {
        let x_mm = (target.x - 0.5) * self.screen_width_mm;
        let y_mm = (target.y - 0.5) * self.screen_height_mm;
        let yaw = -(x_mm / self.distance_mm).atan();
        let pitch = -(y_mm / self.distance_mm).atan();
        Vec2::new(pitch, yaw) + self.bias
    }
}

/// Generate `count` measurements of a steady fixation at a fixed frame rate.
///
/// `stream` keys the noise so different fixations get different jitter and
/// drift. Dropped frames come out as invalid measurements.
pub fn fixation_stream(
    raw: Vec2,
    start_time: Real,
    frame_rate_hz: Real,
    count: usize,
    noise: &DetectorNoise,
    stream: usize,
) -> Vec<RawMeasurement> {
    let dt = 1.0 / frame_rate_hz;
    (0..count)
        .map(|i| {
            let elapsed = i as Real * dt;
            if noise.is_dropout(stream, i) {
                return RawMeasurement::invalid(start_time + elapsed);
            }
            let drifted = raw + noise.drift(stream, elapsed);
            RawMeasurement::new(start_time + elapsed, noise.apply(stream, i, drifted))
        })
        .collect()
}
