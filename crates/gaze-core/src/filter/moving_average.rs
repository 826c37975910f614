//! Fixed-window moving average over 2D samples.

use std::collections::VecDeque;

use crate::{Real, Vec2};

/// Mean of the last `window` samples.
///
/// During warm-up (fewer than `window` samples) the mean covers whatever is
/// buffered.
#[derive(Debug, Clone)]
pub struct MovingAverage {
    window: usize,
    buffer: VecDeque<Vec2>,
}

impl MovingAverage {
    /// Create a moving average; a window of 0 behaves like 1.
    pub fn new(window: usize) -> Self {
        let window = window.max(1);
        Self {
            window,
            buffer: VecDeque::with_capacity(window),
        }
    }

    pub fn window(&self) -> usize {
        self.window
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.buffer.len() == self.window
    }

    /// Push a sample and return the mean of the buffered samples.
    pub fn filter(&mut self, value: Vec2) -> Vec2 {
        if self.buffer.len() == self.window {
            self.buffer.pop_front();
        }
        self.buffer.push_back(value);
        let sum = self.buffer.iter().fold(Vec2::zeros(), |acc, v| acc + v);
        sum / self.buffer.len() as Real
    }

    pub fn reset(&mut self) {
        self.buffer.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn warm_up_averages_available_samples() {
        let mut ma = MovingAverage::new(4);
        assert_eq!(ma.filter(Vec2::new(1.0, 2.0)), Vec2::new(1.0, 2.0));
        assert_eq!(ma.filter(Vec2::new(3.0, 4.0)), Vec2::new(2.0, 3.0));
        assert_eq!(ma.len(), 2);
        assert!(!ma.is_full());
    }

    #[test]
    fn window_drops_oldest() {
        let mut ma = MovingAverage::new(2);
        ma.filter(Vec2::new(10.0, 0.0));
        ma.filter(Vec2::new(2.0, 0.0));
        let m = ma.filter(Vec2::new(4.0, 0.0));
        assert!((m.x - 3.0).abs() < 1e-12);
        assert!(ma.is_full());
    }

    #[test]
    fn zero_window_is_pass_through() {
        let mut ma = MovingAverage::new(0);
        assert_eq!(ma.window(), 1);
        ma.filter(Vec2::new(1.0, 1.0));
        assert_eq!(ma.filter(Vec2::new(5.0, 6.0)), Vec2::new(5.0, 6.0));
    }

    #[test]
    fn reset_empties_buffer() {
        let mut ma = MovingAverage::new(3);
        ma.filter(Vec2::new(1.0, 1.0));
        ma.reset();
        assert!(ma.is_empty());
        assert_eq!(ma.filter(Vec2::new(7.0, 8.0)), Vec2::new(7.0, 8.0));
    }
}
