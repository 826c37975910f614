//! Quadratic feature expansion and per-axis input normalization.

use gaze_core::{Real, Vec2};
use nalgebra::SVector;

/// Number of terms in the degree-2 bivariate feature vector.
pub const NUM_FEATURES: usize = 6;

/// Floor applied to per-axis standard deviations.
pub const STD_EPSILON: Real = 1e-8;

/// Feature (and coefficient) vector `[1, p, q, p², pq, q²]`.
pub type Features = SVector<Real, NUM_FEATURES>;

/// Build the degree-2 feature vector for a normalized input `(p, q)`.
#[inline]
pub fn quadratic_features(v: &Vec2) -> Features {
    let (p, q) = (v.x, v.y);
    Features::from([1.0, p, q, p * p, p * q, q * q])
}

/// Per-axis standardization `(raw - mean) / std`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureNormalization {
    pub mean: Vec2,
    pub std: Vec2,
}

impl Default for FeatureNormalization {
    fn default() -> Self {
        Self {
            mean: Vec2::zeros(),
            std: Vec2::new(1.0, 1.0),
        }
    }
}

impl FeatureNormalization {
    /// Mean and population standard deviation of `samples`.
    ///
    /// The standard deviation is floored at [`STD_EPSILON`] so constant axes
    /// normalize to zero instead of dividing by zero. Returns `None` for an
    /// empty slice.
    pub fn from_samples(samples: &[Vec2]) -> Option<Self> {
        let mean = gaze_core::mean_vec2(samples)?;
        let n = samples.len() as Real;
        let var = samples.iter().fold(Vec2::zeros(), |acc, s| {
            let d = s - mean;
            acc + d.component_mul(&d)
        }) / n;
        let std = var.map(|v| v.sqrt().max(STD_EPSILON));
        Some(Self { mean, std })
    }

    /// Standardize one raw measurement.
    #[inline]
    pub fn apply(&self, raw: &Vec2) -> Vec2 {
        (raw - self.mean).component_div(&self.std)
    }
}
