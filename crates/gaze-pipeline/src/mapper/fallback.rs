//! Uncalibrated raw → normalized screen mappings.
//!
//! Both are heuristics: the eye-ratio mapping rescales the iris position around
//! a resting center, the angle mapping projects the gaze ray onto a screen of
//! known physical size at a known distance.

use std::f64::consts::FRAC_PI_2;

use gaze_core::{MeasurementKind, Pt2, Real, Vec2};
use serde::{Deserialize, Serialize};

/// Largest angle magnitude accepted before taking the tangent.
const MAX_ANGLE: Real = FRAC_PI_2 - 1e-3;

/// `normalized = 0.5 + (raw - center) / range`, per axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EyeRatioFallback {
    pub center: Vec2,
    /// Raw span mapped onto the full screen, per axis.
    pub range: Vec2,
    /// Flip the horizontal axis (mirrored camera image).
    pub mirror_x: bool,
}

impl Default for EyeRatioFallback {
    fn default() -> Self {
        Self {
            center: Vec2::new(0.5, 0.5),
            range: Vec2::new(0.3, 0.2),
            mirror_x: false,
        }
    }
}

impl EyeRatioFallback {
    pub fn map(&self, raw: &Vec2) -> Pt2 {
        let mut x = 0.5 + (raw.x - self.center.x) / self.range.x;
        let y = 0.5 + (raw.y - self.center.y) / self.range.y;
        if self.mirror_x {
            x = 1.0 - x;
        }
        Pt2::new(x, y)
    }
}

/// Pinhole projection of `(pitch, yaw)` onto the screen plane.
///
/// Negative yaw looks right, negative pitch looks down.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AngleFallback {
    pub distance_mm: Real,
    pub screen_width_mm: Real,
    pub screen_height_mm: Real,
}

impl Default for AngleFallback {
    fn default() -> Self {
        Self {
            distance_mm: 600.0,
            screen_width_mm: 520.0,
            screen_height_mm: 290.0,
        }
    }
}

impl AngleFallback {
    pub fn map(&self, raw: &Vec2) -> Pt2 {
        let pitch = raw.x.clamp(-MAX_ANGLE, MAX_ANGLE);
        let yaw = raw.y.clamp(-MAX_ANGLE, MAX_ANGLE);
        let x_mm = -self.distance_mm * yaw.tan();
        let y_mm = -self.distance_mm * pitch.tan();
        Pt2::new(
            0.5 + x_mm / self.screen_width_mm,
            0.5 + y_mm / self.screen_height_mm,
        )
    }
}

/// Fallback selected by the measurement kind.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FallbackMapping {
    EyeRatio(EyeRatioFallback),
    GazeAngles(AngleFallback),
}

impl FallbackMapping {
    pub fn for_kind(kind: MeasurementKind, eye: EyeRatioFallback, angle: AngleFallback) -> Self {
        match kind {
            MeasurementKind::EyeRatio => Self::EyeRatio(eye),
            MeasurementKind::GazeAngles => Self::GazeAngles(angle),
        }
    }

    /// Normalized (unclamped) screen position.
    pub fn map(&self, raw: &Vec2) -> Pt2 {
        match self {
            Self::EyeRatio(m) => m.map(raw),
            Self::GazeAngles(m) => m.map(raw),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gaze_core::synthetic::GazeAngleModel;

    #[test]
    fn eye_ratio_center_maps_to_screen_center() {
        let fb = EyeRatioFallback::default();
        assert_eq!(fb.map(&Vec2::new(0.5, 0.5)), Pt2::new(0.5, 0.5));
        let right = fb.map(&Vec2::new(0.65, 0.5));
        assert!((right.x - 1.0).abs() < 1e-12);
    }

    #[test]
    fn eye_ratio_mirror() {
        let fb = EyeRatioFallback {
            mirror_x: true,
            ..Default::default()
        };
        let p = fb.map(&Vec2::new(0.65, 0.5));
        assert!(p.x.abs() < 1e-12);
    }

    #[test]
    fn angles_invert_pinhole_model() {
        let fb = AngleFallback::default();
        let model = GazeAngleModel {
            distance_mm: fb.distance_mm,
            screen_width_mm: fb.screen_width_mm,
            screen_height_mm: fb.screen_height_mm,
            bias: Vec2::zeros(),
        };
        for target in [Pt2::new(0.5, 0.5), Pt2::new(0.1, 0.8), Pt2::new(0.95, 0.05)] {
            let p = fb.map(&model.raw_for_target(&target));
            assert!((p - target).norm() < 1e-9, "target={target:?} p={p:?}");
        }
    }

    #[test]
    fn extreme_angles_stay_finite() {
        let p = AngleFallback::default().map(&Vec2::new(10.0, -10.0));
        assert!(p.x.is_finite() && p.y.is_finite());
    }

    #[test]
    fn kind_selects_mapping() {
        let m = FallbackMapping::for_kind(
            MeasurementKind::GazeAngles,
            EyeRatioFallback::default(),
            AngleFallback::default(),
        );
        assert!(matches!(m, FallbackMapping::GazeAngles(_)));
    }
}
