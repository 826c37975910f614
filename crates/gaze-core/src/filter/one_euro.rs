//! One-Euro filter: adaptive low-pass filter for jitter reduction.
//!
//! Smooth when the signal is slow (fixations), responsive when it moves fast
//! (saccades). The cutoff frequency grows with the filtered speed of the
//! signal:
//!
//! ```text
//! dx      = (x - x_prev) / dt
//! dx_hat  = lowpass(dx, d_cutoff)
//! cutoff  = min_cutoff + beta * |dx_hat|
//! x_hat   = lowpass(x, cutoff)
//! ```
//!
//! with `lowpass(x, fc) = a * x + (1 - a) * prev`, `a = 1 / (1 + tau / dt)`
//! and `tau = 1 / (2π fc)`.

use std::f64::consts::PI;

use log::trace;
use serde::{Deserialize, Serialize};

use crate::{Real, Vec2};

/// Time step used when timestamps do not advance (or a rate is not positive).
pub const FALLBACK_DT: Real = 1.0 / 60.0;

/// Cutoffs are floored to this value so `tau` stays finite.
const MIN_CUTOFF_HZ: Real = 1e-6;

/// One-Euro filter parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OneEuroParams {
    /// Minimum cutoff frequency (Hz). Lower is smoother at rest.
    pub min_cutoff: Real,
    /// Speed coefficient. Higher means less lag during fast motion.
    pub beta: Real,
    /// Cutoff frequency (Hz) of the derivative low-pass.
    pub d_cutoff: Real,
}

impl OneEuroParams {
    pub fn new(min_cutoff: Real, beta: Real, d_cutoff: Real) -> Self {
        Self {
            min_cutoff,
            beta,
            d_cutoff,
        }
    }
}

/// Smoothing factor of a first-order low-pass for the given step and cutoff.
///
/// Always in `[0, 1]`.
pub fn smoothing_factor(dt: Real, cutoff: Real) -> Real {
    let cutoff = if cutoff.is_finite() {
        cutoff.max(MIN_CUTOFF_HZ)
    } else {
        MIN_CUTOFF_HZ
    };
    let tau = 1.0 / (2.0 * PI * cutoff);
    let alpha = 1.0 / (1.0 + tau / dt);
    if alpha.is_finite() {
        alpha.clamp(0.0, 1.0)
    } else {
        1.0
    }
}

fn sanitize_dt(dt: Real) -> Real {
    if dt.is_finite() && dt > 0.0 {
        dt
    } else {
        FALLBACK_DT
    }
}

/// Scalar One-Euro filter.
#[derive(Debug, Clone)]
pub struct OneEuroFilter {
    params: OneEuroParams,

    // State
    x_prev: Real,
    dx_prev: Real,
    t_prev: Real,
    initialized: bool,
}

impl OneEuroFilter {
    pub fn new(params: OneEuroParams) -> Self {
        Self {
            params,
            x_prev: 0.0,
            dx_prev: 0.0,
            t_prev: 0.0,
            initialized: false,
        }
    }

    pub fn params(&self) -> &OneEuroParams {
        &self.params
    }

    /// Replace the parameters, keeping the current state.
    pub fn set_params(&mut self, params: OneEuroParams) {
        self.params = params;
    }

    /// Whether at least one sample has been filtered since the last reset.
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Filter one value captured at `timestamp` (seconds).
    ///
    /// A timestamp that does not advance uses [`FALLBACK_DT`].
    pub fn filter(&mut self, value: Real, timestamp: Real) -> Real {
        if !self.initialized {
            self.x_prev = value;
            self.dx_prev = 0.0;
            self.t_prev = timestamp;
            self.initialized = true;
            return value;
        }

        let dt = sanitize_dt(timestamp - self.t_prev);
        if timestamp.is_finite() && timestamp > self.t_prev {
            self.t_prev = timestamp;
        } else {
            trace!("timestamp {timestamp} does not advance, using fallback dt");
        }
        self.step(value, dt)
    }

    /// Filter one value assuming a fixed sample rate (Hz).
    pub fn filter_at_rate(&mut self, value: Real, rate_hz: Real) -> Real {
        let dt = if rate_hz.is_finite() && rate_hz > 0.0 {
            1.0 / rate_hz
        } else {
            FALLBACK_DT
        };
        if !self.initialized {
            self.x_prev = value;
            self.dx_prev = 0.0;
            self.initialized = true;
            return value;
        }
        self.t_prev += dt;
        self.step(value, dt)
    }

    fn step(&mut self, value: Real, dt: Real) -> Real {
        // 1. Smoothed derivative
        let dx = (value - self.x_prev) / dt;
        let a_d = smoothing_factor(dt, self.params.d_cutoff);
        let dx_hat = a_d * dx + (1.0 - a_d) * self.dx_prev;

        // 2. Adaptive cutoff
        let cutoff = self.params.min_cutoff + self.params.beta * dx_hat.abs();
        let a = smoothing_factor(dt, cutoff);

        // 3. Filtered value
        let x_hat = a * value + (1.0 - a) * self.x_prev;

        self.x_prev = x_hat;
        self.dx_prev = dx_hat;
        x_hat
    }

    /// Last filtered value, if any.
    pub fn last(&self) -> Option<Real> {
        self.initialized.then_some(self.x_prev)
    }

    /// Forget all history; the next sample passes through unchanged.
    pub fn reset(&mut self) {
        self.x_prev = 0.0;
        self.dx_prev = 0.0;
        self.t_prev = 0.0;
        self.initialized = false;
    }
}

/// Pair of independent One-Euro filters for a 2D signal.
#[derive(Debug, Clone)]
pub struct OneEuroFilter2D {
    pub x: OneEuroFilter,
    pub y: OneEuroFilter,
}

impl OneEuroFilter2D {
    pub fn new(params: OneEuroParams) -> Self {
        Self {
            x: OneEuroFilter::new(params),
            y: OneEuroFilter::new(params),
        }
    }

    pub fn filter(&mut self, value: Vec2, timestamp: Real) -> Vec2 {
        Vec2::new(
            self.x.filter(value.x, timestamp),
            self.y.filter(value.y, timestamp),
        )
    }

    pub fn filter_at_rate(&mut self, value: Vec2, rate_hz: Real) -> Vec2 {
        Vec2::new(
            self.x.filter_at_rate(value.x, rate_hz),
            self.y.filter_at_rate(value.y, rate_hz),
        )
    }

    pub fn set_params(&mut self, params: OneEuroParams) {
        self.x.set_params(params);
        self.y.set_params(params);
    }

    pub fn reset(&mut self) {
        self.x.reset();
        self.y.reset();
    }
}
