//! Reproducible detector imperfections for synthetic gaze streams.
//!
//! Three effects are modelled, each keyed by `(stream, frame)` so a stream can
//! be regenerated exactly from its seed:
//! - per-frame jitter, uniform in `[-jitter, +jitter]` per axis,
//! - slow linear drift of the resting eye position over elapsed time,
//! - dropouts, frames where the detector loses the eye (blinks).

use std::f64::consts::TAU;

use crate::{Real, Vec2};

const LANE_JITTER_X: u64 = 1;
const LANE_JITTER_Y: u64 = 2;
const LANE_DROPOUT: u64 = 3;
const LANE_DRIFT: u64 = 4;

/// Seeded noise model of an eye detector.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DetectorNoise {
    pub seed: u64,
    /// Maximum per-axis jitter, in measurement units.
    pub jitter: Real,
    /// Drift speed in measurement units per second. The direction is fixed
    /// per stream.
    pub drift_rate: Real,
    /// Probability that a frame is dropped.
    pub dropout: Real,
}

impl DetectorNoise {
    pub fn new(seed: u64, jitter: Real) -> Self {
        Self {
            seed,
            jitter,
            ..Default::default()
        }
    }

    pub fn with_drift(mut self, rate: Real) -> Self {
        self.drift_rate = rate;
        self
    }

    pub fn with_dropout(mut self, probability: Real) -> Self {
        self.dropout = probability.clamp(0.0, 1.0);
        self
    }

    /// Jitter offset for one frame.
    pub fn jitter(&self, stream: usize, index: usize) -> Vec2 {
        let amplitude = self.jitter.abs();
        if amplitude == 0.0 {
            return Vec2::zeros();
        }
        Vec2::new(
            amplitude * self.signed(stream, index, LANE_JITTER_X),
            amplitude * self.signed(stream, index, LANE_JITTER_Y),
        )
    }

    /// Accumulated drift after `elapsed` seconds of `stream`.
    pub fn drift(&self, stream: usize, elapsed: Real) -> Vec2 {
        if self.drift_rate == 0.0 {
            return Vec2::zeros();
        }
        let heading = TAU * self.unit(stream, 0, LANE_DRIFT);
        Vec2::new(heading.cos(), heading.sin()) * (self.drift_rate * elapsed)
    }

    /// Whether the detector misses this frame.
    pub fn is_dropout(&self, stream: usize, index: usize) -> bool {
        self.dropout > 0.0 && self.unit(stream, index, LANE_DROPOUT) < self.dropout
    }

    /// `value` plus this frame's jitter.
    pub fn apply(&self, stream: usize, index: usize, value: Vec2) -> Vec2 {
        value + self.jitter(stream, index)
    }

    fn unit(&self, stream: usize, index: usize, lane: u64) -> Real {
        let bits = hash(self.seed, stream as u64, index as u64, lane);
        (bits >> 11) as Real / (1u64 << 53) as Real
    }

    fn signed(&self, stream: usize, index: usize, lane: u64) -> Real {
        2.0 * self.unit(stream, index, lane) - 1.0
    }
}

/// Multiply-fold hash over the four key words.
fn hash(seed: u64, stream: u64, index: u64, lane: u64) -> u64 {
    const K0: u64 = 0xA076_1D64_78BD_642F;
    const K1: u64 = 0xE703_7ED1_A0B4_28DB;
    let mut h = fold(seed ^ K0, lane.wrapping_add(K1));
    h = fold(h ^ stream, K0.rotate_left(17));
    h = fold(h ^ index, K1.rotate_left(31));
    fold(h, h ^ K0)
}

fn fold(a: u64, b: u64) -> u64 {
    let wide = (a as u128).wrapping_mul(b as u128);
    (wide as u64) ^ ((wide >> 64) as u64)
}
