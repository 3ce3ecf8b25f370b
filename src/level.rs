//! Level model: current meter values in decibels

use std::time::Instant;

/// Clamp an incoming decibel sample to the displayable range.
///
/// NaN collapses to `db_min` rather than poisoning downstream arithmetic;
/// infinities clamp like any other out-of-range value (`-inf` to the floor,
/// `+inf` to the ceiling).
pub fn clamp_db(db: f32, db_min: f32, db_max: f32) -> f32 {
    if db.is_nan() {
        return db_min;
    }
    db.clamp(db_min, db_max)
}

/// Mutable per-meter level state.
///
/// All values are in dB; `f32::NEG_INFINITY` means "no signal yet".
/// Mutated only by `Meter::update` and `Meter::reset_hold`.
#[derive(Debug, Clone)]
pub struct LevelState {
    /// Displayed peak (post-ballistics when enabled)
    pub peak: f32,
    /// RMS level, pre-smoothed by the data source
    pub rms: f32,
    /// Loudness, stored unclamped (an independent external measurement)
    pub lufs: f32,
    /// Ballistics-filtered peak, carried between updates
    pub smoothed_peak: f32,
    /// Timestamp of the last update, for the ballistics delta
    pub last_update_time: Instant,
}

impl LevelState {
    pub fn new(now: Instant) -> Self {
        Self {
            peak: f32::NEG_INFINITY,
            rms: f32::NEG_INFINITY,
            lufs: f32::NEG_INFINITY,
            smoothed_peak: f32::NEG_INFINITY,
            last_update_time: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_db_in_range_passthrough() {
        assert_eq!(clamp_db(-42.5, -90.0, 6.0), -42.5);
        assert_eq!(clamp_db(0.0, -90.0, 6.0), 0.0);
    }

    #[test]
    fn test_clamp_db_out_of_range() {
        assert_eq!(clamp_db(-120.0, -90.0, 6.0), -90.0);
        assert_eq!(clamp_db(12.0, -90.0, 6.0), 6.0);
    }

    #[test]
    fn test_clamp_db_non_finite() {
        assert_eq!(clamp_db(f32::NAN, -90.0, 6.0), -90.0);
        assert_eq!(clamp_db(f32::NEG_INFINITY, -90.0, 6.0), -90.0);
        assert_eq!(clamp_db(f32::INFINITY, -90.0, 6.0), 6.0);
    }

    #[test]
    fn test_level_state_starts_silent() {
        let state = LevelState::new(Instant::now());
        assert_eq!(state.peak, f32::NEG_INFINITY);
        assert_eq!(state.rms, f32::NEG_INFINITY);
        assert_eq!(state.lufs, f32::NEG_INFINITY);
        assert_eq!(state.smoothed_peak, f32::NEG_INFINITY);
    }
}
