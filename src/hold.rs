//! Peak-hold tracking with timed decay
//!
//! The tracker keeps the highest recent peak. A new maximum is adopted
//! immediately and restarts the hold window; once `hold_time` elapses with
//! no higher sample the held value decays at `decay_rate` dB/s, floored at
//! the bottom of the meter range. Decay advances only when `update` is
//! called, so it is paced by incoming samples rather than a timer.

use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct PeakHold {
    value: f32,
    /// When the held value was last raised; None until the first peak
    raised_at: Option<Instant>,
    hold_time: Duration,
    /// dB/s once the hold window has expired
    decay_rate: f32,
    db_min: f32,
}

impl PeakHold {
    pub fn new(hold_time: Duration, decay_rate: f32, db_min: f32) -> Self {
        Self {
            value: f32::NEG_INFINITY,
            raised_at: None,
            hold_time,
            decay_rate,
            db_min,
        }
    }

    /// Currently held peak in dB (`-inf` until a peak arrives)
    pub fn value(&self) -> f32 {
        self.value
    }

    /// Feed one peak sample, advancing the hold/decay state machine.
    pub fn update(&mut self, peak_db: f32, now: Instant) {
        if peak_db > self.value {
            self.value = peak_db;
            self.raised_at = Some(now);
            return;
        }

        let Some(raised_at) = self.raised_at else {
            return;
        };

        let elapsed = now.saturating_duration_since(raised_at);
        if elapsed > self.hold_time {
            // Decay is measured from the end of the hold window, not from
            // the moment the peak was set
            let past_hold = (elapsed - self.hold_time).as_secs_f32();
            self.value = (self.value - past_hold * self.decay_rate).max(self.db_min);
        }
    }

    /// Override the held value from an external source (already clamped).
    pub fn set(&mut self, hold_db: f32, now: Instant) {
        self.value = hold_db;
        self.raised_at = Some(now);
    }

    /// Clear the hold state, e.g. from a user-driven clip reset.
    pub fn reset(&mut self) {
        self.value = f32::NEG_INFINITY;
        self.raised_at = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tracker() -> PeakHold {
        PeakHold::new(Duration::from_millis(1500), 20.0, -90.0)
    }

    #[test]
    fn test_new_peak_adopted_immediately() {
        let mut hold = tracker();
        let t0 = Instant::now();
        hold.update(-6.0, t0);
        assert_eq!(hold.value(), -6.0);
    }

    #[test]
    fn test_value_held_within_window() {
        let mut hold = tracker();
        let t0 = Instant::now();
        hold.update(-6.0, t0);
        // Quieter sample inside the hold window changes nothing
        hold.update(-30.0, t0 + Duration::from_millis(1000));
        assert_eq!(hold.value(), -6.0);
    }

    #[test]
    fn test_higher_peak_restarts_window() {
        let mut hold = tracker();
        let t0 = Instant::now();
        hold.update(-6.0, t0);
        hold.update(-3.0, t0 + Duration::from_millis(1400));
        // 1400ms after the restart is still inside the new window
        hold.update(-40.0, t0 + Duration::from_millis(2800));
        assert_eq!(hold.value(), -3.0);
    }

    #[test]
    fn test_decay_after_hold_window() {
        let mut hold = tracker();
        let t0 = Instant::now();
        hold.update(-6.0, t0);
        // 2000ms later: 500ms past the window at 20 dB/s = 10 dB of decay
        hold.update(-60.0, t0 + Duration::from_millis(2000));
        assert!((hold.value() + 16.0).abs() < 1e-3);
    }

    #[test]
    fn test_decay_floors_at_db_min() {
        let mut hold = tracker();
        let t0 = Instant::now();
        hold.update(-6.0, t0);
        hold.update(-90.0, t0 + Duration::from_secs(3600));
        assert_eq!(hold.value(), -90.0);
    }

    #[test]
    fn test_decay_is_monotonic() {
        let mut hold = tracker();
        let t0 = Instant::now();
        hold.update(-6.0, t0);
        let mut last = hold.value();
        for ms in [1600u64, 1800, 2200, 3000, 5000] {
            hold.update(-90.0, t0 + Duration::from_millis(ms));
            assert!(hold.value() <= last);
            assert!(hold.value() >= -90.0);
            last = hold.value();
        }
    }

    #[test]
    fn test_reset_clears_state() {
        let mut hold = tracker();
        let t0 = Instant::now();
        hold.update(-6.0, t0);
        hold.reset();
        assert_eq!(hold.value(), f32::NEG_INFINITY);
        // Any finite peak after a reset is adopted
        hold.update(-80.0, t0 + Duration::from_secs(10));
        assert_eq!(hold.value(), -80.0);
    }
}
