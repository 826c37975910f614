//! Per-frame gaze mapping pipeline.
//!
//! ```text
//! raw ─▶ One-Euro ─┬─▶ session (while collecting)
//!                  └─▶ predict | fallback ─▶ moving average ─▶ exponential ─▶ clamp
//! ```
//!
//! Missing frames go through a debounce: the last output is held until
//! `lost_frame_threshold` consecutive misses, then tracking is reported lost.

mod events;
mod fallback;
mod tracking;

pub use events::GazeEvent;
pub use fallback::{AngleFallback, EyeRatioFallback, FallbackMapping};
pub use tracking::{TrackingMonitor, TrackingTransition};

use std::collections::VecDeque;
use std::path::Path;

use anyhow::{Context, Result};
use gaze_core::{
    ExponentialSmoother, FilterPreset, GazeOutput, MovingAverage, OneEuroFilter2D, Pt2,
    RawMeasurement, Real, is_finite_vec2,
};
use gaze_linear::PolynomialCalibrator;
use log::{info, warn};

use crate::config::MapperConfig;
use crate::session::{CalibrationSession, SampleOutcome, SessionProgress, SessionState};

/// Owns the filters, calibrator and session for one gaze stream.
#[derive(Debug)]
pub struct GazeMapper {
    config: MapperConfig,
    filter: Option<OneEuroFilter2D>,
    moving_average: Option<MovingAverage>,
    smoother: ExponentialSmoother,
    fallback: FallbackMapping,
    calibrator: PolynomialCalibrator,
    session: CalibrationSession,
    tracking: TrackingMonitor,
    last_output: Option<GazeOutput>,
    quality: Option<Real>,
    events: VecDeque<GazeEvent>,
    /// Set once the host feeds the session through `add_calibration_sample`.
    manual_feed: bool,
}

impl GazeMapper {
    pub fn new(config: MapperConfig) -> Result<Self> {
        config.validate()?;
        let screen = config.screen;
        Ok(Self {
            filter: config.effective_filter().map(OneEuroFilter2D::new),
            moving_average: (config.moving_average_window > 0)
                .then(|| MovingAverage::new(config.moving_average_window)),
            smoother: ExponentialSmoother::new(config.output_smoothing),
            fallback: FallbackMapping::for_kind(
                config.measurement_kind,
                config.eye_ratio_fallback,
                config.angle_fallback,
            ),
            calibrator: PolynomialCalibrator::new(config.ridge_alpha)
                .with_fallback(screen.center()),
            session: CalibrationSession::new(config.session.clone(), screen),
            tracking: TrackingMonitor::new(config.lost_frame_threshold),
            last_output: None,
            quality: None,
            events: VecDeque::new(),
            manual_feed: false,
            config,
        })
    }

    pub fn config(&self) -> &MapperConfig {
        &self.config
    }

    pub fn calibrator(&self) -> &PolynomialCalibrator {
        &self.calibrator
    }

    pub fn session(&self) -> &CalibrationSession {
        &self.session
    }

    /// Switch the adaptive filter tuning. History is kept when only the
    /// parameters change.
    pub fn set_filter_preset(&mut self, preset: FilterPreset) {
        self.config.filter_preset = preset;
        match (self.config.effective_filter(), self.filter.as_mut()) {
            (Some(params), Some(filter)) => filter.set_params(params),
            (Some(params), None) => self.filter = Some(OneEuroFilter2D::new(params)),
            (None, _) => self.filter = None,
        }
        info!("filter preset set to {}", preset.as_str());
    }

    /// Process one detector frame.
    ///
    /// While a calibration is collecting, the filtered sample is also fed to
    /// the session unless the host has switched to
    /// [`add_calibration_sample`](Self::add_calibration_sample) for this run.
    pub fn process(&mut self, measurement: &RawMeasurement) -> GazeOutput {
        if !measurement.is_usable() {
            return self.process_missing(measurement.timestamp);
        }
        let timestamp = measurement.timestamp;

        if self.tracking.on_valid() == TrackingTransition::Started {
            self.reset_smoothing();
            self.events.push_back(GazeEvent::TrackingStarted { timestamp });
            info!("tracking started at t={timestamp:.3}");
        }

        let filtered = match self.filter.as_mut() {
            Some(filter) => filter.filter(measurement.raw, timestamp),
            None => measurement.raw,
        };

        if self.session.is_collecting() && !self.manual_feed {
            let sample = if self.config.feed_raw_to_session {
                *measurement
            } else {
                RawMeasurement {
                    raw: filtered,
                    ..*measurement
                }
            };
            let outcome = self.session.add_sample(&sample, &mut self.calibrator);
            self.handle_outcome(outcome);
        }

        let screen = self.config.screen;
        let mut position = if self.calibrator.is_calibrated() {
            self.calibrator.predict(&filtered)
        } else {
            screen.to_pixels(&self.fallback.map(&filtered))
        };
        if !is_finite_vec2(&position.coords) {
            position = self
                .last_output
                .map(|o| o.position)
                .unwrap_or_else(|| screen.center());
        }
        if let Some(ma) = self.moving_average.as_mut() {
            position = Pt2::from(ma.filter(position.coords));
        }
        let position = screen.clamp(&self.smoother.smooth(position));

        let output = GazeOutput {
            timestamp,
            position,
            normalized: screen.to_normalized(&position),
            valid: true,
            confidence: self.confidence(measurement),
        };
        self.last_output = Some(output);
        output
    }

    /// Process a frame in which the detector found nothing.
    pub fn process_missing(&mut self, timestamp: Real) -> GazeOutput {
        if self.tracking.on_missing() == TrackingTransition::Lost {
            self.events.push_back(GazeEvent::TrackingLost { timestamp });
            info!(
                "tracking lost after {} missing frames",
                self.tracking.consecutive_missing()
            );
        }
        match self.last_output {
            Some(last) if self.tracking.is_tracking() => GazeOutput { timestamp, ..last },
            _ => GazeOutput::invalid(timestamp),
        }
    }

    fn confidence(&self, measurement: &RawMeasurement) -> Real {
        match &measurement.per_eye {
            Some(eyes) => {
                let d = eyes.disagreement();
                if d.is_finite() {
                    (1.0 - d / self.config.disagreement_scale).clamp(0.0, 1.0)
                } else {
                    0.0
                }
            }
            None => 1.0,
        }
    }

    fn reset_smoothing(&mut self) {
        if let Some(filter) = self.filter.as_mut() {
            filter.reset();
        }
        if let Some(ma) = self.moving_average.as_mut() {
            ma.reset();
        }
        self.smoother.reset();
    }

    fn handle_outcome(&mut self, outcome: SampleOutcome) {
        match outcome {
            SampleOutcome::PointAdvanced { index, total } => {
                self.events.push_back(GazeEvent::CalibrationPointAdvanced { index, total });
            }
            SampleOutcome::Completed(Ok(report)) => {
                self.quality = Some(report.quality);
                self.events.push_back(GazeEvent::CalibrationCompleted {
                    success: true,
                    quality: report.quality,
                });
                if let Some(path) = self.config.calibration_path.as_deref() {
                    if let Err(e) = self.calibrator.save(path) {
                        warn!("automatic calibration save failed: {e}");
                    }
                }
            }
            SampleOutcome::Completed(Err(_)) => {
                self.events.push_back(GazeEvent::CalibrationCompleted {
                    success: false,
                    quality: 0.0,
                });
            }
            SampleOutcome::Ignored | SampleOutcome::Settling | SampleOutcome::Collected { .. } => {}
        }
    }

    /// Begin a calibration run. Returns `false` if one is already running.
    ///
    /// Smoothing state is cleared so the first targets are not dragged
    /// towards the pre-calibration gaze position.
    pub fn start_calibration(&mut self) -> bool {
        if !self.session.start() {
            return false;
        }
        self.manual_feed = false;
        self.reset_smoothing();
        self.events.push_back(GazeEvent::CalibrationStarted {
            total_points: self.session.total_points(),
        });
        if self.session.state() == SessionState::Failed {
            self.events.push_back(GazeEvent::CalibrationCompleted {
                success: false,
                quality: 0.0,
            });
        }
        true
    }

    /// Abort a running calibration; the current model is untouched.
    pub fn cancel_calibration(&mut self) -> bool {
        let cancelled = self.session.cancel();
        if cancelled {
            self.events.push_back(GazeEvent::CalibrationCancelled);
        }
        cancelled
    }

    /// Drop the model and return to the fallback mapping.
    pub fn reset_calibration(&mut self) {
        self.cancel_calibration();
        self.session.reset();
        self.calibrator.reset();
        self.quality = None;
        info!("calibration reset");
    }

    /// Feed a measurement straight to the session, bypassing the filters.
    ///
    /// The first call switches the running calibration to manual feeding:
    /// [`process`](Self::process) stops forwarding frames to the session
    /// until the next [`start_calibration`](Self::start_calibration), so a
    /// frame passed to both is counted once.
    pub fn add_calibration_sample(&mut self, measurement: &RawMeasurement) -> SampleOutcome {
        if self.session.is_collecting() {
            self.manual_feed = true;
        }
        let outcome = self.session.add_sample(measurement, &mut self.calibrator);
        self.handle_outcome(outcome.clone());
        outcome
    }

    pub fn save_calibration(&self, path: &Path) -> Result<()> {
        self.calibrator
            .save(path)
            .with_context(|| format!("saving calibration to {}", path.display()))
    }

    /// Load a model; on failure the current one is kept.
    pub fn load_calibration(&mut self, path: &Path) -> Result<()> {
        self.calibrator
            .load(path)
            .with_context(|| format!("loading calibration from {}", path.display()))?;
        self.quality = None;
        Ok(())
    }

    pub fn progress(&self) -> SessionProgress {
        self.session.progress()
    }

    /// Current target in pixels while a calibration is running.
    pub fn current_target(&self) -> Option<Pt2> {
        self.session.current_target_pixels()
    }

    pub fn is_calibrated(&self) -> bool {
        self.calibrator.is_calibrated()
    }

    /// Quality of the last calibration fit here. `None` when uncalibrated or
    /// when the model was loaded from disk.
    pub fn calibration_quality(&self) -> Option<Real> {
        self.quality.filter(|_| self.is_calibrated())
    }

    pub fn needs_recalibration(&self) -> bool {
        if !self.is_calibrated() {
            return true;
        }
        self.calibration_quality()
            .is_some_and(|q| q < self.config.min_quality)
    }

    pub fn is_tracking(&self) -> bool {
        self.tracking.is_tracking()
    }

    pub fn last_output(&self) -> Option<&GazeOutput> {
        self.last_output.as_ref()
    }

    /// Take every queued event, oldest first.
    pub fn drain_events(&mut self) -> Vec<GazeEvent> {
        self.events.drain(..).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::SessionConfig;
    use gaze_core::Vec2;

    fn mapper() -> GazeMapper {
        GazeMapper::new(MapperConfig {
            filter_preset: FilterPreset::Off,
            output_smoothing: 1.0,
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn rejects_invalid_config() {
        let config = MapperConfig {
            output_smoothing: -1.0,
            ..Default::default()
        };
        assert!(GazeMapper::new(config).is_err());
    }

    #[test]
    fn uncalibrated_eye_ratio_center_maps_to_screen_center() {
        let mut m = mapper();
        let out = m.process(&RawMeasurement::new(0.0, Vec2::new(0.5, 0.5)));
        assert!(out.valid);
        assert_eq!(out.position, Pt2::new(960.0, 540.0));
        assert_eq!(out.normalized, Pt2::new(0.5, 0.5));
        assert_eq!(out.confidence, 1.0);
        assert_eq!(
            m.drain_events(),
            vec![GazeEvent::TrackingStarted { timestamp: 0.0 }]
        );
        assert!(m.drain_events().is_empty());
    }

    #[test]
    fn output_is_clamped() {
        let mut m = mapper();
        let out = m.process(&RawMeasurement::new(0.0, Vec2::new(5.0, -5.0)));
        assert_eq!(out.position, Pt2::new(1919.0, 0.0));
    }

    #[test]
    fn confidence_from_eye_disagreement() {
        let mut m = mapper();
        let out = m.process(&RawMeasurement::binocular(
            0.0,
            Vec2::new(0.48, 0.5),
            Vec2::new(0.52, 0.5),
        ));
        assert!((out.confidence - 0.6).abs() < 1e-9, "{}", out.confidence);
    }

    #[test]
    fn held_position_below_threshold() {
        let mut m = mapper();
        let first = m.process(&RawMeasurement::new(0.0, Vec2::new(0.4, 0.6)));
        let held = m.process_missing(0.033);
        assert!(held.valid);
        assert_eq!(held.position, first.position);
        assert_eq!(held.timestamp, 0.033);
    }

    #[test]
    fn missing_before_any_valid_frame_is_invalid() {
        let mut m = mapper();
        let out = m.process_missing(0.0);
        assert!(!out.valid);
        assert_eq!(out.confidence, 0.0);
        assert!(m.drain_events().is_empty());
    }

    #[test]
    fn exponential_smoothing_moves_partway() {
        let mut m = GazeMapper::new(MapperConfig {
            filter_preset: FilterPreset::Off,
            output_smoothing: 0.5,
            ..Default::default()
        })
        .unwrap();
        m.process(&RawMeasurement::new(0.0, Vec2::new(0.5, 0.5)));
        let out = m.process(&RawMeasurement::new(0.033, Vec2::new(0.65, 0.5)));
        // Fallback puts 0.65 at the right edge; half way from the center.
        assert!((out.position.x - (960.0 + 1920.0) / 2.0).abs() < 1e-9);
    }

    #[test]
    fn needs_recalibration_until_calibrated() {
        let m = mapper();
        assert!(!m.is_calibrated());
        assert!(m.needs_recalibration());
        assert_eq!(m.calibration_quality(), None);
    }

    #[test]
    fn set_filter_preset_toggles_stage() {
        let mut m = mapper();
        m.set_filter_preset(FilterPreset::Smooth);
        assert_eq!(m.config().effective_filter(), FilterPreset::Smooth.params());
        m.process(&RawMeasurement::new(0.0, Vec2::new(0.5, 0.5)));
        let out = m.process(&RawMeasurement::new(1.0 / 30.0, Vec2::new(0.65, 0.5)));
        assert!(out.position.x < 1919.0);
        m.set_filter_preset(FilterPreset::Off);
        assert_eq!(m.config().effective_filter(), None);
    }
    #[test]
    fn start_calibration_clears_smoothing() {
        let mut m = GazeMapper::new(MapperConfig {
            filter_preset: FilterPreset::Off,
            output_smoothing: 0.5,
            ..Default::default()
        })
        .unwrap();
        m.process(&RawMeasurement::new(0.0, Vec2::new(0.5, 0.5)));
        assert!(m.start_calibration());
        let out = m.process(&RawMeasurement::new(0.033, Vec2::new(0.6, 0.45)));
        let screen = m.config().screen;
        let expected = screen.to_pixels(&Pt2::new(0.5 + 0.1 / 0.3, 0.25));
        assert!(
            (out.position - expected).norm() < 1e-9,
            "{:?}",
            out.position
        );
    }

    #[test]
    fn manual_samples_are_not_counted_twice() {
        let mut m = GazeMapper::new(MapperConfig {
            filter_preset: FilterPreset::Off,
            output_smoothing: 1.0,
            session: SessionConfig {
                samples_per_point: 5,
                settle_delay_s: 0.0,
                ..Default::default()
            },
            ..Default::default()
        })
        .unwrap();
        assert!(m.start_calibration());
        for i in 0..5 {
            let frame = RawMeasurement::new(i as Real * 0.033, Vec2::new(0.4, 0.45));
            m.add_calibration_sample(&frame);
            m.process(&frame);
        }

        let progress = m.progress();
        assert_eq!(progress.point_index, 1);
        assert_eq!(progress.point_fraction, 0.0);
        let advanced = m
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, GazeEvent::CalibrationPointAdvanced { .. }))
            .count();
        assert_eq!(advanced, 1);
    }
}
