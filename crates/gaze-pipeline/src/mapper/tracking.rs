//! Debounced tracking state.

/// Change reported by [`TrackingMonitor`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackingTransition {
    Unchanged,
    Started,
    Lost,
}

/// Counts consecutive missing frames and flips to "lost" at a threshold.
#[derive(Debug, Clone)]
pub struct TrackingMonitor {
    threshold: u32,
    consecutive_missing: u32,
    tracking: bool,
}

impl TrackingMonitor {
    pub fn new(threshold: u32) -> Self {
        Self {
            threshold: threshold.max(1),
            consecutive_missing: 0,
            tracking: false,
        }
    }

    pub fn is_tracking(&self) -> bool {
        self.tracking
    }

    pub fn consecutive_missing(&self) -> u32 {
        self.consecutive_missing
    }

    pub fn on_valid(&mut self) -> TrackingTransition {
        self.consecutive_missing = 0;
        if self.tracking {
            TrackingTransition::Unchanged
        } else {
            self.tracking = true;
            TrackingTransition::Started
        }
    }

    pub fn on_missing(&mut self) -> TrackingTransition {
        self.consecutive_missing = self.consecutive_missing.saturating_add(1);
        if self.tracking && self.consecutive_missing >= self.threshold {
            self.tracking = false;
            TrackingTransition::Lost
        } else {
            TrackingTransition::Unchanged
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lost_fires_once_at_threshold() {
        let mut monitor = TrackingMonitor::new(3);
        assert_eq!(monitor.on_valid(), TrackingTransition::Started);
        assert_eq!(monitor.on_missing(), TrackingTransition::Unchanged);
        assert_eq!(monitor.on_missing(), TrackingTransition::Unchanged);
        assert!(monitor.is_tracking());
        assert_eq!(monitor.on_missing(), TrackingTransition::Lost);
        assert_eq!(monitor.on_missing(), TrackingTransition::Unchanged);
        assert!(!monitor.is_tracking());
        assert_eq!(monitor.on_valid(), TrackingTransition::Started);
        assert_eq!(monitor.consecutive_missing(), 0);
    }

    #[test]
    fn missing_before_first_valid_is_silent() {
        let mut monitor = TrackingMonitor::new(1);
        for _ in 0..5 {
            assert_eq!(monitor.on_missing(), TrackingTransition::Unchanged);
        }
    }
}
