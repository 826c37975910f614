//! Exponential smoothing between consecutive output positions.

use crate::{Pt2, Real};

/// Exponential moving average of 2D positions.
///
/// `factor` is the weight of the new sample: 1 = no smoothing, 0 = frozen.
#[derive(Debug, Clone)]
pub struct ExponentialSmoother {
    factor: Real,
    last: Option<Pt2>,
}

impl ExponentialSmoother {
    /// The factor is clamped to `[0, 1]`; a non-finite factor disables smoothing.
    pub fn new(factor: Real) -> Self {
        let factor = if factor.is_finite() {
            factor.clamp(0.0, 1.0)
        } else {
            1.0
        };
        Self { factor, last: None }
    }

    pub fn factor(&self) -> Real {
        self.factor
    }

    /// Smooth a new position toward the previous output.
    pub fn smooth(&mut self, position: Pt2) -> Pt2 {
        let out = match self.last {
            Some(last) => last + (position - last) * self.factor,
            None => position,
        };
        self.last = Some(out);
        out
    }

    /// Last smoothed position, if any.
    pub fn last(&self) -> Option<Pt2> {
        self.last
    }

    pub fn reset(&mut self) {
        self.last = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_sample_passes_through() {
        let mut s = ExponentialSmoother::new(0.3);
        assert_eq!(s.smooth(Pt2::new(10.0, 20.0)), Pt2::new(10.0, 20.0));
    }

    #[test]
    fn moves_fraction_toward_target() {
        let mut s = ExponentialSmoother::new(0.25);
        s.smooth(Pt2::new(0.0, 0.0));
        let out = s.smooth(Pt2::new(100.0, -40.0));
        assert!((out.x - 25.0).abs() < 1e-12);
        assert!((out.y + 10.0).abs() < 1e-12);
    }

    #[test]
    fn converges_to_constant_target() {
        let mut s = ExponentialSmoother::new(0.3);
        s.smooth(Pt2::new(0.0, 0.0));
        let mut out = Pt2::origin();
        for _ in 0..60 {
            out = s.smooth(Pt2::new(1.0, 1.0));
        }
        assert!((out.x - 1.0).abs() < 1e-6);
    }

    #[test]
    fn factor_is_clamped() {
        assert_eq!(ExponentialSmoother::new(3.0).factor(), 1.0);
        assert_eq!(ExponentialSmoother::new(-1.0).factor(), 0.0);
        assert_eq!(ExponentialSmoother::new(Real::NAN).factor(), 1.0);
    }

    #[test]
    fn zero_factor_freezes_output() {
        let mut s = ExponentialSmoother::new(0.0);
        s.smooth(Pt2::new(5.0, 5.0));
        assert_eq!(s.smooth(Pt2::new(50.0, 50.0)), Pt2::new(5.0, 5.0));
        s.reset();
        assert!(s.last().is_none());
    }
}
