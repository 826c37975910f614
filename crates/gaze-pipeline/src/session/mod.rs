//! Multi-point calibration protocol.
//!
//! A [`CalibrationSession`] walks through the targets of a
//! [`CalibrationLayout`]. For each target it waits for a settle delay (measured
//! from the first sample seen for that target), accumulates a fixed number of
//! valid samples, averages them into one `(raw, target)` pair and moves on.
//! After the last target it fits the [`PolynomialCalibrator`] it is handed.
//!
//! ```text
//! Idle ──start──▶ Collecting(0) ─▶ … ─▶ Collecting(n-1) ─▶ Fitting ─▶ Calibrated
//!                      │                                          └─▶ Failed
//!                      └──cancel──▶ Cancelled
//! ```

mod layout;

pub use layout::{CalibrationLayout, DEFAULT_MARGIN};

use gaze_core::{Pt2, RawMeasurement, Real, ScreenGeometry, Vec2, mean_vec2};
use gaze_linear::{CalibrationError, FitStats, MIN_CALIBRATION_PAIRS, PolynomialCalibrator};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

/// Mean training error, as a fraction of the screen diagonal, that maps to a
/// quality score of zero.
pub const QUALITY_ERROR_SCALE: Real = 0.1;

/// Quality score in `[0, 1]` for a fit in pixel units.
pub fn calibration_quality(stats: &FitStats, screen: &ScreenGeometry) -> Real {
    let diagonal = screen.diagonal();
    if !diagonal.is_finite() || diagonal <= 0.0 || !stats.mean.is_finite() {
        return 0.0;
    }
    (1.0 - (stats.mean / diagonal) / QUALITY_ERROR_SCALE).clamp(0.0, 1.0)
}

/// Collection protocol parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub layout: CalibrationLayout,
    /// Valid samples averaged per target.
    pub samples_per_point: usize,
    /// Seconds to ignore after the first sample of each target.
    pub settle_delay_s: Real,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            layout: CalibrationLayout::default(),
            samples_per_point: 30,
            settle_delay_s: 0.8,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SessionState {
    #[default]
    Idle,
    Collecting { point_index: usize },
    Fitting,
    Calibrated,
    Failed,
    Cancelled,
}

impl SessionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Collecting { .. } => "collecting",
            Self::Fitting => "fitting",
            Self::Calibrated => "calibrated",
            Self::Failed => "failed",
            Self::Cancelled => "cancelled",
        }
    }
}

/// Summary of a successful session.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CalibrationReport {
    /// Training error in pixels.
    pub stats: FitStats,
    /// Score in `[0, 1]`, see [`calibration_quality`].
    pub quality: Real,
}

/// Effect of one sample on the session.
#[derive(Debug, Clone, PartialEq)]
pub enum SampleOutcome {
    /// Not collecting, or the measurement was not usable.
    Ignored,
    /// Inside the settle delay of the current target.
    Settling,
    Collected { collected: usize, required: usize },
    /// The previous target finished; `index` is the new current target.
    PointAdvanced { index: usize, total: usize },
    /// The last target finished and the fit ran.
    Completed(Result<CalibrationReport, CalibrationError>),
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SessionProgress {
    pub point_index: usize,
    pub total_points: usize,
    /// Fraction of the current target's samples; 0 until the settle delay elapses.
    pub point_fraction: Real,
    pub overall: Real,
}

#[derive(Debug, Clone)]
pub struct CalibrationSession {
    config: SessionConfig,
    screen: ScreenGeometry,
    targets: Vec<Pt2>,
    state: SessionState,

    samples: Vec<Vec2>,
    point_started_at: Option<Real>,
    pairs_raw: Vec<Vec2>,
    pairs_target: Vec<Pt2>,
    last_report: Option<CalibrationReport>,
}

impl CalibrationSession {
    pub fn new(config: SessionConfig, screen: ScreenGeometry) -> Self {
        let targets = config.layout.targets();
        Self {
            config,
            screen,
            targets,
            state: SessionState::Idle,
            samples: Vec::new(),
            point_started_at: None,
            pairs_raw: Vec::new(),
            pairs_target: Vec::new(),
            last_report: None,
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn screen(&self) -> &ScreenGeometry {
        &self.screen
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_collecting(&self) -> bool {
        matches!(self.state, SessionState::Collecting { .. })
    }

    pub fn total_points(&self) -> usize {
        self.targets.len()
    }

    /// Number of averaged pairs collected so far in this run.
    pub fn pair_count(&self) -> usize {
        self.pairs_raw.len()
    }

    pub fn last_report(&self) -> Option<&CalibrationReport> {
        self.last_report.as_ref()
    }

    /// Current normalized target while collecting.
    pub fn current_target(&self) -> Option<Pt2> {
        match self.state {
            SessionState::Collecting { point_index } => self.targets.get(point_index).copied(),
            _ => None,
        }
    }

    /// Current target in pixels while collecting.
    pub fn current_target_pixels(&self) -> Option<Pt2> {
        self.current_target().map(|t| self.screen.to_pixels(&t))
    }

    /// Begin a new run. Refused (returns `false`) while already collecting.
    pub fn start(&mut self) -> bool {
        if self.is_collecting() {
            warn!("calibration already in progress; start ignored");
            return false;
        }
        self.clear_run();
        self.last_report = None;
        if self.targets.len() < MIN_CALIBRATION_PAIRS {
            warn!(
                "{} layout has {} targets; at least {} are needed for a fit",
                self.config.layout.name(),
                self.targets.len(),
                MIN_CALIBRATION_PAIRS
            );
        }
        if self.targets.is_empty() {
            self.state = SessionState::Failed;
            return true;
        }
        self.state = SessionState::Collecting { point_index: 0 };
        info!(
            "calibration started: {} targets, {} samples each",
            self.targets.len(),
            self.config.samples_per_point
        );
        true
    }

    /// Abort the run, discarding every collected pair. Returns `true` if a run
    /// was in progress.
    pub fn cancel(&mut self) -> bool {
        if !self.is_collecting() {
            return false;
        }
        let discarded = self.pairs_raw.len();
        self.clear_run();
        self.state = SessionState::Cancelled;
        info!("calibration cancelled, {discarded} pair(s) discarded");
        true
    }

    /// Return to `Idle`, dropping any partial run and the last report.
    pub fn reset(&mut self) {
        self.clear_run();
        self.last_report = None;
        self.state = SessionState::Idle;
    }

    /// Feed one measurement. The calibrator is only touched when the last
    /// target completes.
    pub fn add_sample(
        &mut self,
        measurement: &RawMeasurement,
        calibrator: &mut PolynomialCalibrator,
    ) -> SampleOutcome {
        let SessionState::Collecting { point_index } = self.state else {
            return SampleOutcome::Ignored;
        };
        if !measurement.is_usable() {
            return SampleOutcome::Ignored;
        }

        let started = *self.point_started_at.get_or_insert(measurement.timestamp);
        if measurement.timestamp - started < self.config.settle_delay_s {
            return SampleOutcome::Settling;
        }

        self.samples.push(measurement.raw);
        let required = self.config.samples_per_point.max(1);
        if self.samples.len() < required {
            return SampleOutcome::Collected {
                collected: self.samples.len(),
                required,
            };
        }

        let Some(raw) = mean_vec2(&self.samples) else {
            return SampleOutcome::Ignored;
        };
        let target = self.screen.to_pixels(&self.targets[point_index]);
        self.pairs_raw.push(raw);
        self.pairs_target.push(target);
        self.samples.clear();
        self.point_started_at = None;
        debug!(
            "calibration point {} done: raw=({:.4}, {:.4}) target=({:.1}, {:.1})",
            point_index, raw.x, raw.y, target.x, target.y
        );

        let next = point_index + 1;
        if next < self.targets.len() {
            self.state = SessionState::Collecting { point_index: next };
            return SampleOutcome::PointAdvanced {
                index: next,
                total: self.targets.len(),
            };
        }

        SampleOutcome::Completed(self.finish(calibrator))
    }

    fn finish(
        &mut self,
        calibrator: &mut PolynomialCalibrator,
    ) -> Result<CalibrationReport, CalibrationError> {
        self.state = SessionState::Fitting;
        let result = calibrator
            .fit(&self.pairs_raw, &self.pairs_target)
            .map(|stats| CalibrationReport {
                stats,
                quality: calibration_quality(&stats, &self.screen),
            });
        match &result {
            Ok(report) => {
                self.state = SessionState::Calibrated;
                self.last_report = Some(*report);
                info!(
                    "calibration complete: quality {:.2}, mean error {:.1}px",
                    report.quality, report.stats.mean
                );
            }
            Err(e) => {
                self.state = SessionState::Failed;
                warn!("calibration failed: {e}");
            }
        }
        result
    }

    pub fn progress(&self) -> SessionProgress {
        let total_points = self.targets.len();
        match self.state {
            SessionState::Collecting { point_index } => {
                let required = self.config.samples_per_point.max(1);
                let point_fraction = (self.samples.len() as Real / required as Real).min(1.0);
                SessionProgress {
                    point_index,
                    total_points,
                    point_fraction,
                    overall: (point_index as Real + point_fraction) / total_points as Real,
                }
            }
            SessionState::Fitting | SessionState::Calibrated | SessionState::Failed => {
                SessionProgress {
                    point_index: total_points,
                    total_points,
                    point_fraction: 1.0,
                    overall: 1.0,
                }
            }
            SessionState::Idle | SessionState::Cancelled => SessionProgress {
                point_index: 0,
                total_points,
                point_fraction: 0.0,
                overall: 0.0,
            },
        }
    }

    fn clear_run(&mut self) {
        self.samples.clear();
        self.point_started_at = None;
        self.pairs_raw.clear();
        self.pairs_target.clear();
    }
}
