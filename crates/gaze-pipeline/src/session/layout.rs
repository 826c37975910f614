//! On-screen target layouts for calibration.

use gaze_core::{Pt2, Real};
use serde::{Deserialize, Serialize};

/// Distance of the outer targets from the screen edges (normalized).
pub const DEFAULT_MARGIN: Real = 0.15;

/// Ordered set of normalized targets visited during calibration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CalibrationLayout {
    /// 3×3 grid, row-major from the top-left.
    NinePoint { margin: Real },
    /// Four corners and the center.
    FivePoint { margin: Real },
    /// Top-left, center, bottom-right.
    ThreePoint { margin: Real },
    /// Explicit normalized targets.
    Custom { points: Vec<[Real; 2]> },
}

impl Default for CalibrationLayout {
    fn default() -> Self {
        Self::NinePoint {
            margin: DEFAULT_MARGIN,
        }
    }
}

impl CalibrationLayout {
    pub fn name(&self) -> &'static str {
        match self {
            Self::NinePoint { .. } => "nine_point",
            Self::FivePoint { .. } => "five_point",
            Self::ThreePoint { .. } => "three_point",
            Self::Custom { .. } => "custom",
        }
    }

    /// Normalized targets in visiting order.
    pub fn targets(&self) -> Vec<Pt2> {
        match self {
            Self::NinePoint { margin } => {
                let axis = axis_stops(*margin);
                axis.iter()
                    .flat_map(|y| axis.iter().map(move |x| Pt2::new(*x, *y)))
                    .collect()
            }
            Self::FivePoint { margin } => {
                let [lo, mid, hi] = axis_stops(*margin);
                vec![
                    Pt2::new(lo, lo),
                    Pt2::new(hi, lo),
                    Pt2::new(mid, mid),
                    Pt2::new(lo, hi),
                    Pt2::new(hi, hi),
                ]
            }
            Self::ThreePoint { margin } => {
                let [lo, mid, hi] = axis_stops(*margin);
                vec![Pt2::new(lo, lo), Pt2::new(mid, mid), Pt2::new(hi, hi)]
            }
            Self::Custom { points } => points.iter().map(|p| Pt2::new(p[0], p[1])).collect(),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::NinePoint { .. } => 9,
            Self::FivePoint { .. } => 5,
            Self::ThreePoint { .. } => 3,
            Self::Custom { points } => points.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn axis_stops(margin: Real) -> [Real; 3] {
    let m = if margin.is_finite() {
        margin.clamp(0.0, 0.5)
    } else {
        DEFAULT_MARGIN
    };
    [m, 0.5, 1.0 - m]
}
