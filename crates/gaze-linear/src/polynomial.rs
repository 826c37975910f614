//! Ridge-regularized degree-2 polynomial calibration.
//!
//! Maps a raw 2D measurement (eye ratio or gaze angles) to a screen position.
//! Inputs are standardized per axis, expanded to `[1, p, q, p², pq, q²]`, and
//! each output axis is fit independently by ridge regression. Targets are
//! unit-agnostic: whatever units the targets are given in (pixels in the
//! pipeline) are the units of [`PolynomialCalibrator::predict`].

use std::path::Path;

use gaze_core::{Pt2, Real, Vec2, is_finite_vec2};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::blob::{CalibrationBlob, PersistenceError};
use crate::features::{FeatureNormalization, Features, quadratic_features};
use crate::ridge::ridge_fit;

/// Minimum number of (raw, target) pairs accepted by [`PolynomialCalibrator::fit`].
pub const MIN_CALIBRATION_PAIRS: usize = 6;
/// Default ridge regularization strength.
pub const DEFAULT_RIDGE_ALPHA: Real = 0.1;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum CalibrationError {
    #[error("need at least {required} calibration pairs, got {got}")]
    InsufficientSamples { required: usize, got: usize },
    #[error("length mismatch: {raw} raw measurements vs {targets} targets")]
    LengthMismatch { raw: usize, targets: usize },
    #[error("non-finite value in calibration pair {0}")]
    NonFinite(usize),
    #[error("ridge alpha must be finite and non-negative, got {0}")]
    InvalidAlpha(Real),
}

/// One averaged training pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CalibrationPair {
    pub raw: Vec2,
    pub target: Pt2,
}

/// Training error of a fit, in target units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FitStats {
    pub mean: Real,
    pub rms: Real,
    pub max: Real,
    pub count: usize,
}

impl FitStats {
    fn from_errors(errors: &[Real]) -> Self {
        let count = errors.len();
        if count == 0 {
            return Self {
                mean: 0.0,
                rms: 0.0,
                max: 0.0,
                count,
            };
        }
        let n = count as Real;
        let mean = errors.iter().sum::<Real>() / n;
        let rms = (errors.iter().map(|e| e * e).sum::<Real>() / n).sqrt();
        let max = errors.iter().copied().fold(0.0, Real::max);
        Self {
            mean,
            rms,
            max,
            count,
        }
    }
}

/// Fitted polynomial mapping.
#[derive(Debug, Clone, PartialEq)]
pub struct PolynomialModel {
    pub normalization: FeatureNormalization,
    pub coef_x: Features,
    pub coef_y: Features,
    /// Constant offsets added after the polynomial. Zero for models fit here;
    /// kept so blobs that carry an explicit intercept predict identically.
    pub intercept: Vec2,
    pub alpha: Real,
}

impl PolynomialModel {
    pub fn predict(&self, raw: &Vec2) -> Pt2 {
        let f = quadratic_features(&self.normalization.apply(raw));
        Pt2::new(
            self.coef_x.dot(&f) + self.intercept.x,
            self.coef_y.dot(&f) + self.intercept.y,
        )
    }
}

/// Raw → screen calibrator with JSON persistence.
#[derive(Debug, Clone)]
pub struct PolynomialCalibrator {
    alpha: Real,
    fallback: Pt2,
    model: Option<PolynomialModel>,
    stats: Option<FitStats>,
}

impl Default for PolynomialCalibrator {
    fn default() -> Self {
        Self::new(DEFAULT_RIDGE_ALPHA)
    }
}

impl PolynomialCalibrator {
    pub fn new(alpha: Real) -> Self {
        Self {
            alpha,
            fallback: Pt2::origin(),
            model: None,
            stats: None,
        }
    }

    /// Point returned by [`predict`](Self::predict) while uncalibrated.
    pub fn with_fallback(mut self, fallback: Pt2) -> Self {
        self.fallback = fallback;
        self
    }

    pub fn alpha(&self) -> Real {
        self.alpha
    }

    /// Regularization used by the next fit.
    pub fn set_alpha(&mut self, alpha: Real) {
        self.alpha = alpha;
    }

    pub fn is_calibrated(&self) -> bool {
        self.model.is_some()
    }

    pub fn model(&self) -> Option<&PolynomialModel> {
        self.model.as_ref()
    }

    /// Statistics of the last successful fit. `None` after a load or reset.
    pub fn fit_stats(&self) -> Option<&FitStats> {
        self.stats.as_ref()
    }

    /// Fit the model from paired raw measurements and targets.
    ///
    /// On error the previous model (if any) is kept.
    pub fn fit(&mut self, raw: &[Vec2], targets: &[Pt2]) -> Result<FitStats, CalibrationError> {
        if raw.len() != targets.len() {
            return Err(CalibrationError::LengthMismatch {
                raw: raw.len(),
                targets: targets.len(),
            });
        }
        if raw.len() < MIN_CALIBRATION_PAIRS {
            return Err(CalibrationError::InsufficientSamples {
                required: MIN_CALIBRATION_PAIRS,
                got: raw.len(),
            });
        }
        let finite = |(r, t): (&Vec2, &Pt2)| is_finite_vec2(r) && is_finite_vec2(&t.coords);
        if let Some(i) = raw.iter().zip(targets).position(|pair| !finite(pair)) {
            return Err(CalibrationError::NonFinite(i));
        }
        if !self.alpha.is_finite() || self.alpha < 0.0 {
            return Err(CalibrationError::InvalidAlpha(self.alpha));
        }

        let normalization = FeatureNormalization::from_samples(raw).ok_or(
            CalibrationError::InsufficientSamples {
                required: MIN_CALIBRATION_PAIRS,
                got: 0,
            },
        )?;
        let rows: Vec<Features> = raw
            .iter()
            .map(|r| quadratic_features(&normalization.apply(r)))
            .collect();
        let tx: Vec<Real> = targets.iter().map(|t| t.x).collect();
        let ty: Vec<Real> = targets.iter().map(|t| t.y).collect();

        let sx = ridge_fit(&rows, &tx, self.alpha);
        let sy = ridge_fit(&rows, &ty, self.alpha);
        debug!(
            "polynomial fit: n={}, alpha={}, degenerate x={} y={}",
            raw.len(),
            self.alpha,
            sx.degenerate,
            sy.degenerate
        );

        let model = PolynomialModel {
            normalization,
            coef_x: sx.coef,
            coef_y: sy.coef,
            intercept: Vec2::zeros(),
            alpha: self.alpha,
        };
        let errors: Vec<Real> = raw
            .iter()
            .zip(targets.iter())
            .map(|(r, t)| (model.predict(r) - t).norm())
            .collect();
        let stats = FitStats::from_errors(&errors);
        info!(
            "calibration fit from {} pairs: mean error {:.3}, max {:.3}",
            stats.count, stats.mean, stats.max
        );

        self.model = Some(model);
        self.stats = Some(stats);
        Ok(stats)
    }

    /// Convenience wrapper over [`fit`](Self::fit) for paired records.
    pub fn fit_pairs(&mut self, pairs: &[CalibrationPair]) -> Result<FitStats, CalibrationError> {
        let raw: Vec<Vec2> = pairs.iter().map(|p| p.raw).collect();
        let targets: Vec<Pt2> = pairs.iter().map(|p| p.target).collect();
        self.fit(&raw, &targets)
    }

    /// Map a raw measurement; the fallback point while uncalibrated.
    pub fn predict(&self, raw: &Vec2) -> Pt2 {
        match &self.model {
            Some(model) => model.predict(raw),
            None => self.fallback,
        }
    }

    /// Drop the model and return to the uncalibrated state.
    pub fn reset(&mut self) {
        self.model = None;
        self.stats = None;
    }

    pub fn to_blob(&self) -> Option<CalibrationBlob> {
        self.model.as_ref().map(CalibrationBlob::from_model)
    }

    /// Install a model from a blob. Invalid blobs leave state untouched.
    pub fn load_blob(&mut self, blob: &CalibrationBlob) -> Result<(), PersistenceError> {
        let model = blob.to_model()?;
        self.alpha = model.alpha;
        self.model = Some(model);
        self.stats = None;
        Ok(())
    }

    pub fn save(&self, path: &Path) -> Result<(), PersistenceError> {
        let blob = self.to_blob().ok_or(PersistenceError::NotCalibrated)?;
        blob.write(path)?;
        info!("calibration saved to {}", path.display());
        Ok(())
    }

    /// Load a model from `path`. On any failure a warning is logged and the
    /// current model is kept.
    pub fn load(&mut self, path: &Path) -> Result<(), PersistenceError> {
        let result = CalibrationBlob::read(path).and_then(|blob| self.load_blob(&blob));
        match &result {
            Ok(()) => info!("calibration loaded from {}", path.display()),
            Err(e) => warn!("failed to load calibration from {}: {e}", path.display()),
        }
        result
    }
}
