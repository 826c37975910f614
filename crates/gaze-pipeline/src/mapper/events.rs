use gaze_core::Real;
use serde::{Deserialize, Serialize};

/// Edge-triggered notifications queued by the mapper.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum GazeEvent {
    TrackingStarted { timestamp: Real },
    TrackingLost { timestamp: Real },
    CalibrationStarted { total_points: usize },
    CalibrationPointAdvanced { index: usize, total: usize },
    CalibrationCompleted { success: bool, quality: Real },
    CalibrationCancelled,
}
