//! Per-frame measurement and output records.
//!
//! A [`RawMeasurement`] is what the external detector hands to the pipeline
//! once per processed video frame; a [`GazeOutput`] is what the pipeline hands
//! back to display and logging consumers.

use serde::{Deserialize, Serialize};

use crate::{Pt2, Real, Vec2};

/// Interpretation of the two raw measurement axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeasurementKind {
    /// Iris position relative to the eye corners, each axis nominally in
    /// `[0, 1]` with `0.5` centered.
    #[default]
    EyeRatio,
    /// Gaze angles `(pitch, yaw)` in radians.
    GazeAngles,
}

impl MeasurementKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::EyeRatio => "eye_ratio",
            Self::GazeAngles => "gaze_angles",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "eye_ratio" | "eye-ratio" => Some(Self::EyeRatio),
            "gaze_angles" | "gaze-angles" | "angles" => Some(Self::GazeAngles),
            _ => None,
        }
    }
}

/// Left/right eye measurements when the detector reports both eyes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PerEyeSample {
    pub left: Vec2,
    pub right: Vec2,
}

impl PerEyeSample {
    /// Euclidean distance between the two eyes' measurements.
    pub fn disagreement(&self) -> Real {
        (self.left - self.right).norm()
    }

    /// Mean of the two eyes.
    pub fn combined(&self) -> Vec2 {
        (self.left + self.right) * 0.5
    }
}

/// One raw per-frame measurement from the detector.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RawMeasurement {
    /// Capture timestamp in seconds (monotonic).
    pub timestamp: Real,
    /// Eye ratio `(x, y)` or gaze angles `(pitch, yaw)`.
    pub raw: Vec2,
    /// Whether the detector produced a usable measurement for this frame.
    pub valid: bool,
    /// Per-eye data, if available.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub per_eye: Option<PerEyeSample>,
}

impl RawMeasurement {
    /// A valid measurement without per-eye data.
    pub fn new(timestamp: Real, raw: Vec2) -> Self {
        Self {
            timestamp,
            raw,
            valid: true,
            per_eye: None,
        }
    }

    /// A valid measurement combined from both eyes.
    pub fn binocular(timestamp: Real, left: Vec2, right: Vec2) -> Self {
        let per_eye = PerEyeSample { left, right };
        Self {
            timestamp,
            raw: per_eye.combined(),
            valid: true,
            per_eye: Some(per_eye),
        }
    }

    /// A frame where the detector found nothing usable.
    pub fn invalid(timestamp: Real) -> Self {
        Self {
            timestamp,
            raw: Vec2::zeros(),
            valid: false,
            per_eye: None,
        }
    }

    /// Valid flag and finite values on both axes.
    pub fn is_usable(&self) -> bool {
        self.valid && crate::is_finite_vec2(&self.raw) && self.timestamp.is_finite()
    }
}

/// Per-frame result produced by the mapping pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GazeOutput {
    /// Timestamp of the measurement (or missing frame) that produced this output.
    pub timestamp: Real,
    /// Screen position in pixels, clamped to the screen.
    pub position: Pt2,
    /// Screen position normalized to `[0, 1]` on both axes.
    pub normalized: Pt2,
    /// `false` once tracking is considered lost.
    pub valid: bool,
    /// Confidence in `[0, 1]`; 0 for invalid outputs.
    pub confidence: Real,
}

impl GazeOutput {
    /// An invalid output carrying only a timestamp.
    pub fn invalid(timestamp: Real) -> Self {
        Self {
            timestamp,
            position: Pt2::origin(),
            normalized: Pt2::origin(),
            valid: false,
            confidence: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn measurement_kind_roundtrip() {
        assert_eq!(
            MeasurementKind::from_str("eye_ratio"),
            Some(MeasurementKind::EyeRatio)
        );
        assert_eq!(
            MeasurementKind::from_str("gaze-angles"),
            Some(MeasurementKind::GazeAngles)
        );
        assert_eq!(MeasurementKind::from_str("pupil"), None);
        assert_eq!(
            MeasurementKind::from_str(MeasurementKind::GazeAngles.as_str()),
            Some(MeasurementKind::GazeAngles)
        );
    }

    #[test]
    fn binocular_combines_eyes() {
        let m = RawMeasurement::binocular(0.0, Vec2::new(0.4, 0.5), Vec2::new(0.6, 0.5));
        assert!((m.raw.x - 0.5).abs() < 1e-12);
        let eyes = m.per_eye.unwrap();
        assert!((eyes.disagreement() - 0.2).abs() < 1e-12);
    }

    #[test]
    fn usable_requires_finite_values() {
        assert!(RawMeasurement::new(0.0, Vec2::new(0.5, 0.5)).is_usable());
        assert!(!RawMeasurement::invalid(0.0).is_usable());
        assert!(!RawMeasurement::new(0.0, Vec2::new(Real::NAN, 0.5)).is_usable());
    }

    #[test]
    fn measurement_json_shape() {
        let json = r#"{"timestamp": 1.5, "raw": [0.25, 0.75], "valid": true}"#;
        let m: RawMeasurement = serde_json::from_str(json).unwrap();
        assert_eq!(m.timestamp, 1.5);
        assert_eq!(m.raw, Vec2::new(0.25, 0.75));
        assert!(m.per_eye.is_none());
    }
}
