//! Mapper configuration (JSON).
//!
//! Every field has a default, so `{}` is a valid configuration file.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, ensure};
use gaze_core::{FilterPreset, MeasurementKind, OneEuroParams, Real, ScreenGeometry};
use gaze_linear::DEFAULT_RIDGE_ALPHA;
use serde::{Deserialize, Serialize};

use crate::mapper::{AngleFallback, EyeRatioFallback};
use crate::session::SessionConfig;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapperConfig {
    pub measurement_kind: MeasurementKind,
    pub screen: ScreenGeometry,
    pub filter_preset: FilterPreset,
    /// Explicit One-Euro parameters; overrides the preset unless it is `off`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<OneEuroParams>,
    /// Window of the optional moving-average stage; 0 disables it.
    pub moving_average_window: usize,
    /// Exponential smoothing factor toward each new position (1 = none).
    pub output_smoothing: Real,
    /// Consecutive missing frames before tracking is reported lost.
    pub lost_frame_threshold: u32,
    /// Feed unfiltered measurements to the calibration session.
    pub feed_raw_to_session: bool,
    pub session: SessionConfig,
    pub ridge_alpha: Real,
    pub eye_ratio_fallback: EyeRatioFallback,
    pub angle_fallback: AngleFallback,
    /// Per-eye disagreement at which confidence reaches zero.
    pub disagreement_scale: Real,
    /// Quality below which [`needs_recalibration`](crate::GazeMapper::needs_recalibration) is set.
    pub min_quality: Real,
    /// Where successful calibrations are saved automatically.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calibration_path: Option<PathBuf>,
}

impl Default for MapperConfig {
    fn default() -> Self {
        Self {
            measurement_kind: MeasurementKind::default(),
            screen: ScreenGeometry::default(),
            filter_preset: FilterPreset::default(),
            filter: None,
            moving_average_window: 0,
            output_smoothing: 0.3,
            lost_frame_threshold: 10,
            feed_raw_to_session: false,
            session: SessionConfig::default(),
            ridge_alpha: DEFAULT_RIDGE_ALPHA,
            eye_ratio_fallback: EyeRatioFallback::default(),
            angle_fallback: AngleFallback::default(),
            disagreement_scale: 0.1,
            min_quality: 0.5,
            calibration_path: None,
        }
    }
}

fn positive(v: Real) -> bool {
    v.is_finite() && v > 0.0
}

impl MapperConfig {
    /// One-Euro parameters in effect, or `None` when filtering is off.
    pub fn effective_filter(&self) -> Option<OneEuroParams> {
        let preset = self.filter_preset.params()?;
        Some(self.filter.unwrap_or(preset))
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(
            positive(self.screen.width) && positive(self.screen.height),
            "screen size must be positive, got {}x{}",
            self.screen.width,
            self.screen.height
        );
        if let Some(p) = &self.filter {
            ensure!(
                positive(p.min_cutoff) && positive(p.d_cutoff),
                "filter cutoffs must be positive"
            );
            ensure!(
                p.beta.is_finite() && p.beta >= 0.0,
                "filter beta must be non-negative, got {}",
                p.beta
            );
        }
        ensure!(
            (0.0..=1.0).contains(&self.output_smoothing),
            "output_smoothing must be in [0, 1], got {}",
            self.output_smoothing
        );
        ensure!(
            self.lost_frame_threshold > 0,
            "lost_frame_threshold must be at least 1"
        );
        ensure!(
            self.session.samples_per_point > 0,
            "samples_per_point must be at least 1"
        );
        ensure!(
            self.session.settle_delay_s.is_finite() && self.session.settle_delay_s >= 0.0,
            "settle_delay_s must be non-negative, got {}",
            self.session.settle_delay_s
        );
        ensure!(
            self.ridge_alpha.is_finite() && self.ridge_alpha >= 0.0,
            "ridge_alpha must be non-negative, got {}",
            self.ridge_alpha
        );
        let range = self.eye_ratio_fallback.range;
        ensure!(
            positive(range.x) && positive(range.y),
            "eye_ratio_fallback.range must be positive"
        );
        let angle = &self.angle_fallback;
        ensure!(
            positive(angle.distance_mm)
                && positive(angle.screen_width_mm)
                && positive(angle.screen_height_mm),
            "angle_fallback distances must be positive"
        );
        ensure!(
            positive(self.disagreement_scale),
            "disagreement_scale must be positive"
        );
        ensure!(
            (0.0..=1.0).contains(&self.min_quality),
            "min_quality must be in [0, 1], got {}",
            self.min_quality
        );
        Ok(())
    }

    /// Read and validate a JSON configuration file.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config: Self = serde_json::from_str(&text)
            .with_context(|| format!("parsing config {}", path.display()))?;
        config
            .validate()
            .with_context(|| format!("invalid config {}", path.display()))?;
        Ok(config)
    }
}
