//! JSON calibration blob.
//!
//! ```json
//! {
//!   "type": "polynomial",
//!   "degree": 2,
//!   "alpha": 0.1,
//!   "mean": [0.5, 0.5],
//!   "std": [0.1, 0.1],
//!   "coef_x": [0, 0, 0, 0, 0, 0],
//!   "intercept_x": 0.0,
//!   "coef_y": [0, 0, 0, 0, 0, 0],
//!   "intercept_y": 0.0
//! }
//! ```

use std::path::Path;

use gaze_core::{Real, Vec2};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::features::{FeatureNormalization, Features, NUM_FEATURES};
use crate::polynomial::PolynomialModel;

/// Type tag written to and required from every blob.
pub const BLOB_TYPE: &str = "polynomial";
/// Polynomial degree of the feature expansion.
pub const POLYNOMIAL_DEGREE: u32 = 2;

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("calibration file i/o failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("calibration blob is not valid json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid calibration blob: {0}")]
    Invalid(String),
    #[error("no fitted calibration model to save")]
    NotCalibrated,
}

/// Serialized form of a [`PolynomialModel`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalibrationBlob {
    #[serde(rename = "type")]
    pub kind: String,
    pub degree: u32,
    pub alpha: Real,
    pub mean: [Real; 2],
    pub std: [Real; 2],
    pub coef_x: [Real; NUM_FEATURES],
    #[serde(default)]
    pub intercept_x: Real,
    pub coef_y: [Real; NUM_FEATURES],
    #[serde(default)]
    pub intercept_y: Real,
}

impl CalibrationBlob {
    pub fn from_model(model: &PolynomialModel) -> Self {
        let mut coef_x = [0.0; NUM_FEATURES];
        let mut coef_y = [0.0; NUM_FEATURES];
        coef_x.copy_from_slice(model.coef_x.as_slice());
        coef_y.copy_from_slice(model.coef_y.as_slice());
        Self {
            kind: BLOB_TYPE.to_string(),
            degree: POLYNOMIAL_DEGREE,
            alpha: model.alpha,
            mean: [model.normalization.mean.x, model.normalization.mean.y],
            std: [model.normalization.std.x, model.normalization.std.y],
            coef_x,
            intercept_x: model.intercept.x,
            coef_y,
            intercept_y: model.intercept.y,
        }
    }

    /// Validate the blob and convert it into a model.
    pub fn to_model(&self) -> Result<PolynomialModel, PersistenceError> {
        if self.kind != BLOB_TYPE {
            return Err(PersistenceError::Invalid(format!(
                "unsupported model type {:?}, expected {BLOB_TYPE:?}",
                self.kind
            )));
        }
        if self.degree != POLYNOMIAL_DEGREE {
            return Err(PersistenceError::Invalid(format!(
                "unsupported degree {}, expected {POLYNOMIAL_DEGREE}",
                self.degree
            )));
        }
        let all_finite = [self.alpha, self.intercept_x, self.intercept_y]
            .iter()
            .chain(self.mean.iter())
            .chain(self.std.iter())
            .chain(self.coef_x.iter())
            .chain(self.coef_y.iter())
            .all(|v| v.is_finite());
        if !all_finite {
            return Err(PersistenceError::Invalid("non-finite value".to_string()));
        }
        if self.std.iter().any(|s| *s <= 0.0) {
            return Err(PersistenceError::Invalid(format!(
                "std must be positive, got {:?}",
                self.std
            )));
        }

        Ok(PolynomialModel {
            normalization: FeatureNormalization {
                mean: Vec2::new(self.mean[0], self.mean[1]),
                std: Vec2::new(self.std[0], self.std[1]),
            },
            coef_x: Features::from(self.coef_x),
            coef_y: Features::from(self.coef_y),
            intercept: Vec2::new(self.intercept_x, self.intercept_y),
            alpha: self.alpha,
        })
    }

    pub fn to_json(&self) -> Result<String, PersistenceError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, PersistenceError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn write(&self, path: &Path) -> Result<(), PersistenceError> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }

    pub fn read(path: &Path) -> Result<Self, PersistenceError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }
}
