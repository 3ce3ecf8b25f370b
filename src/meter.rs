//! Meter core: owns the level state and produces per-frame snapshots
//!
//! `update` mutates state (ballistics, peak hold); `frame` is a pure read
//! producing the numbers any renderer needs. The two run on one cooperative
//! timeline, so no locking is involved at this layer.

use crate::ballistics::apply_ballistics;
use crate::config::{self, MeterConfig};
use crate::constants::db::LUFS_DISPLAY_FLOOR;
use crate::hold::PeakHold;
use crate::level::{LevelState, clamp_db};
use crate::scale::db_to_percent;
use std::time::{Duration, Instant};

/// One batch of incoming level readings, all fields optional.
#[derive(Debug, Clone, Copy, Default)]
pub struct LevelUpdate {
    /// Instantaneous peak in dB
    pub peak: Option<f32>,
    /// RMS in dB, pre-smoothed by the source
    pub rms: Option<f32>,
    /// Loudness in LUFS
    pub lufs: Option<f32>,
    /// Externally computed peak hold, overrides the internal tracker
    pub hold: Option<f32>,
}

/// Snapshot of everything a renderer needs for one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct MeterFrame {
    pub peak_percent: f32,
    pub rms_percent: f32,
    pub lufs_percent: f32,
    pub hold_percent: f32,
    /// Raw held peak in dB, for zone-colored readouts
    pub hold_db: f32,
    /// Hold marker at or above the clip threshold
    pub clipping: bool,
    /// Peak-hold readout, one decimal, or `---` with no signal
    pub numeric: String,
    /// LUFS readout, one decimal above -70 dB, or `---`
    pub lufs_label: String,
}

pub struct Meter {
    config: MeterConfig,
    state: LevelState,
    hold: PeakHold,
}

impl Meter {
    pub fn new(config: MeterConfig) -> Self {
        let hold = PeakHold::new(
            Duration::from_millis(config.hold_time_ms),
            config.decay_rate,
            config.db_min,
        );
        Self {
            config,
            state: LevelState::new(Instant::now()),
            hold,
        }
    }

    pub fn config(&self) -> &MeterConfig {
        &self.config
    }

    pub fn levels(&self) -> &LevelState {
        &self.state
    }

    pub fn hold_value(&self) -> f32 {
        self.hold.value()
    }

    /// Feed fresh readings; only the supplied fields are processed.
    pub fn update(&mut self, data: LevelUpdate) {
        self.update_at(data, Instant::now());
    }

    /// As `update`, with an explicit clock for deterministic callers.
    pub fn update_at(&mut self, data: LevelUpdate, now: Instant) {
        let delta_secs = now
            .saturating_duration_since(self.state.last_update_time)
            .as_secs_f32();
        self.state.last_update_time = now;

        if let Some(peak) = data.peak {
            let target = clamp_db(peak, self.config.db_min, self.config.db_max);
            if self.config.ballistics {
                self.state.smoothed_peak = apply_ballistics(
                    self.state.smoothed_peak,
                    target,
                    delta_secs,
                    self.config.release_rate,
                    self.config.db_min,
                );
                self.state.peak = self.state.smoothed_peak;
            } else {
                self.state.peak = target;
            }
            self.hold.update(self.state.peak, now);
        }
        if let Some(rms) = data.rms {
            self.state.rms = clamp_db(rms, self.config.db_min, self.config.db_max);
        }
        if let Some(lufs) = data.lufs {
            // An independent external measurement, stored as given
            self.state.lufs = lufs;
        }
        if let Some(hold) = data.hold {
            self.hold
                .set(clamp_db(hold, self.config.db_min, self.config.db_max), now);
        }
    }

    /// Merge a named preset over the current configuration.
    /// Unknown names are a silent no-op.
    pub fn set_preset(&mut self, name: &str) {
        if let Some(overlay) = config::preset(name) {
            overlay.apply(&mut self.config);
        }
    }

    /// Clear the peak-hold state, e.g. to acknowledge a clip.
    pub fn reset_hold(&mut self) {
        self.hold.reset();
    }

    /// Produce the per-frame snapshot. Pure read; tolerates the silent
    /// (`-inf`) state by rendering zero bars and placeholders.
    pub fn frame(&self) -> MeterFrame {
        let (db_min, db_max) = (self.config.db_min, self.config.db_max);
        let hold_value = self.hold.value();

        let numeric = if hold_value > db_min {
            format!("{:.1}", hold_value)
        } else {
            "---".to_string()
        };
        let lufs_label = if self.state.lufs > LUFS_DISPLAY_FLOOR {
            format!("{:.1}", self.state.lufs)
        } else {
            "---".to_string()
        };

        MeterFrame {
            peak_percent: db_to_percent(self.state.peak, db_min, db_max),
            rms_percent: db_to_percent(self.state.rms, db_min, db_max),
            lufs_percent: db_to_percent(self.state.lufs, db_min, db_max),
            hold_percent: db_to_percent(hold_value, db_min, db_max),
            hold_db: hold_value,
            clipping: hold_value >= self.config.db_clip,
            numeric,
            lufs_label,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{MeterConfig, MeterOptions};

    fn meter_with(options: MeterOptions) -> Meter {
        Meter::new(MeterConfig::resolve("standard", &options).unwrap())
    }

    fn meter() -> Meter {
        meter_with(MeterOptions::default())
    }

    #[test]
    fn test_empty_update_leaves_model_unchanged() {
        let mut m = meter();
        let before = m.levels().clone();
        let hold_before = m.hold_value();
        m.update(LevelUpdate::default());
        assert_eq!(m.levels().peak, before.peak);
        assert_eq!(m.levels().rms, before.rms);
        assert_eq!(m.levels().lufs, before.lufs);
        assert_eq!(m.hold_value(), hold_before);
    }

    #[test]
    fn test_peak_stored_raw_without_ballistics() {
        let mut m = meter_with(MeterOptions {
            ballistics: Some(false),
            ..Default::default()
        });
        m.update(LevelUpdate {
            peak: Some(-12.5),
            ..Default::default()
        });
        assert_eq!(m.levels().peak, -12.5);
        // Out-of-range samples clamp before storage
        m.update(LevelUpdate {
            peak: Some(40.0),
            ..Default::default()
        });
        assert_eq!(m.levels().peak, 6.0);
    }

    #[test]
    fn test_ballistics_instant_attack_then_timed_release() {
        let mut m = meter_with(MeterOptions {
            release_rate: Some(20.0),
            ..Default::default()
        });
        let t0 = Instant::now();
        m.update_at(
            LevelUpdate {
                peak: Some(-6.0),
                ..Default::default()
            },
            t0,
        );
        assert_eq!(m.levels().peak, -6.0);

        // One second of silence releases 20 dB, not all the way down
        m.update_at(
            LevelUpdate {
                peak: Some(-90.0),
                ..Default::default()
            },
            t0 + Duration::from_secs(1),
        );
        assert!((m.levels().peak + 26.0).abs() < 1e-3);
    }

    #[test]
    fn test_range_edges_map_to_bar_extremes() {
        let mut m = meter();
        let t0 = Instant::now();
        m.update_at(
            LevelUpdate {
                peak: Some(6.0),
                ..Default::default()
            },
            t0,
        );
        assert_eq!(m.frame().peak_percent, 100.0);

        // Force the release to complete, then the floor maps to zero
        m.update_at(
            LevelUpdate {
                peak: Some(-90.0),
                ..Default::default()
            },
            t0 + Duration::from_secs(3600),
        );
        assert_eq!(m.frame().peak_percent, 0.0);
    }

    #[test]
    fn test_lufs_stored_unclamped() {
        let mut m = meter();
        m.update(LevelUpdate {
            lufs: Some(-120.0),
            ..Default::default()
        });
        assert_eq!(m.levels().lufs, -120.0);
    }

    #[test]
    fn test_external_hold_overrides_tracker() {
        let mut m = meter();
        m.update(LevelUpdate {
            hold: Some(-4.0),
            ..Default::default()
        });
        assert_eq!(m.hold_value(), -4.0);
    }

    #[test]
    fn test_silent_state_renders_empty() {
        let m = meter();
        let frame = m.frame();
        assert_eq!(frame.peak_percent, 0.0);
        assert_eq!(frame.rms_percent, 0.0);
        assert_eq!(frame.lufs_percent, 0.0);
        assert_eq!(frame.hold_percent, 0.0);
        assert!(!frame.clipping);
        assert_eq!(frame.numeric, "---");
        assert_eq!(frame.lufs_label, "---");
    }

    #[test]
    fn test_clip_flag_follows_hold_value() {
        let mut m = meter();
        let t0 = Instant::now();
        m.update_at(
            LevelUpdate {
                peak: Some(2.0),
                ..Default::default()
            },
            t0,
        );
        let frame = m.frame();
        assert!(frame.clipping);
        assert_eq!(frame.numeric, "2.0");

        m.reset_hold();
        let frame = m.frame();
        assert!(!frame.clipping);
        assert_eq!(frame.numeric, "---");
    }

    #[test]
    fn test_lufs_label_floor_gate() {
        let mut m = meter();
        m.update(LevelUpdate {
            lufs: Some(-23.4),
            ..Default::default()
        });
        assert_eq!(m.frame().lufs_label, "-23.4");
        m.update(LevelUpdate {
            lufs: Some(-70.0),
            ..Default::default()
        });
        assert_eq!(m.frame().lufs_label, "---");
    }

    #[test]
    fn test_set_preset_unknown_is_noop() {
        let mut m = meter();
        let before = m.config().clone();
        m.set_preset("unknown");
        assert_eq!(*m.config(), before);
    }

    #[test]
    fn test_set_preset_merges_known_preset() {
        let mut m = meter();
        m.set_preset("compact");
        assert_eq!(m.config().orientation, crate::config::Orientation::Horizontal);
        assert!(!m.config().show_scale);
        // Fields no preset names survive the switch
        assert_eq!(m.config().db_min, -90.0);
        assert_eq!(m.config().release_rate, 11.8);
    }
}
