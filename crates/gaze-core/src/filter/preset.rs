//! Named One-Euro tunings.
//!
//! Values are tuned for normalized signals (eye ratios in `[0, 1]`, gaze
//! angles in radians) sampled at webcam rates.

use serde::{Deserialize, Serialize};

use super::OneEuroParams;

/// Named filter tuning selectable from configuration or the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterPreset {
    /// Heavy smoothing, noticeable lag on saccades.
    Smooth,
    #[default]
    Balanced,
    /// Light smoothing, little lag.
    Responsive,
    /// Tuned for young participants: frequent head and eye movement.
    Child,
    /// Adaptive filtering disabled.
    Off,
}

impl FilterPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Smooth => "smooth",
            Self::Balanced => "balanced",
            Self::Responsive => "responsive",
            Self::Child => "child",
            Self::Off => "off",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "smooth" => Some(Self::Smooth),
            "balanced" => Some(Self::Balanced),
            "responsive" => Some(Self::Responsive),
            "child" => Some(Self::Child),
            "off" => Some(Self::Off),
            _ => None,
        }
    }

    /// Filter parameters, or `None` for [`FilterPreset::Off`].
    pub fn params(&self) -> Option<OneEuroParams> {
        match self {
            Self::Smooth => Some(OneEuroParams::new(0.5, 0.3, 1.0)),
            Self::Balanced => Some(OneEuroParams::new(1.0, 0.7, 1.0)),
            Self::Responsive => Some(OneEuroParams::new(2.0, 1.5, 1.0)),
            Self::Child => Some(OneEuroParams::new(1.5, 1.0, 1.0)),
            Self::Off => None,
        }
    }
}
