//! Meter configuration: presets, defaults and the resolution cascade

use crate::constants::{ballistics, db};
use crate::error::{AppError, AppResult};
use clap::{Parser, Subcommand, ValueEnum};
use ratatui::style::Color;

/// Command line arguments for the vumon application
#[derive(Parser)]
#[command(name = "vumon")]
#[command(about = "Terminal VU meter with professional ballistics")]
pub struct Args {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the live meter against an audio input device
    Monitor(MonitorArgs),
    /// List available audio input devices
    List(ListArgs),
}

#[derive(Parser)]
pub struct MonitorArgs {
    /// Meter preset: minimal, standard, broadcast or compact
    #[arg(long, default_value = "standard")]
    pub preset: String,

    /// Audio input device name (optional, uses default if not specified)
    #[arg(long)]
    pub device: Option<String>,

    /// Bottom of the dB range (e.g., -90)
    #[arg(long)]
    pub db_min: Option<f32>,

    /// Top of the dB range (e.g., 6)
    #[arg(long)]
    pub db_max: Option<f32>,

    /// Clip indicator threshold in dB
    #[arg(long)]
    pub db_clip: Option<f32>,

    /// Peak-hold duration in milliseconds
    #[arg(long)]
    pub hold_time: Option<u64>,

    /// Peak-hold decay rate in dB/s
    #[arg(long)]
    pub decay_rate: Option<f32>,

    /// Ballistics release rate in dB/s (11.8 = IEC Type I)
    #[arg(long)]
    pub release_rate: Option<f32>,

    /// Disable ballistics (show raw peak values)
    #[arg(long)]
    pub no_ballistics: bool,

    /// Meter orientation
    #[arg(long, value_enum)]
    pub orientation: Option<Orientation>,

    /// Hide the dB graduation scale
    #[arg(long)]
    pub no_scale: bool,

    /// Hide the numeric peak-hold readout
    #[arg(long)]
    pub no_numeric: bool,

    /// Hide the RMS bar
    #[arg(long)]
    pub no_rms: bool,

    /// Hide the peak-hold marker
    #[arg(long)]
    pub no_hold: bool,

    /// Show the LUFS bar and readout
    #[arg(long)]
    pub lufs: bool,
}

#[derive(Parser)]
pub struct ListArgs {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Orientation {
    Vertical,
    Horizontal,
}

/// Named color set for the meter surfaces
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeterColors {
    pub background: Color,
    pub peak: Color,
    pub rms: Color,
    pub hold: Color,
    pub warning: Color,
    pub danger: Color,
    pub scale: Color,
    pub text: Color,
}

impl Default for MeterColors {
    fn default() -> Self {
        Self {
            background: Color::Reset,
            peak: Color::Green,
            rms: Color::Rgb(0, 119, 0),
            hold: Color::White,
            warning: Color::Yellow,
            danger: Color::Red,
            scale: Color::DarkGray,
            text: Color::Gray,
        }
    }
}

/// Color-zone thresholds in dB (ITU-R style)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thresholds {
    /// Start of the yellow zone
    pub warning: f32,
    /// Start of the red zone
    pub danger: f32,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            warning: db::DEFAULT_WARNING_DB,
            danger: db::DEFAULT_DANGER_DB,
        }
    }
}

/// Fully resolved meter configuration, immutable between preset switches.
///
/// Callers are expected to keep `db_min <= warning <= danger <= db_max`;
/// only `db_min < db_max` is enforced.
#[derive(Debug, Clone, PartialEq)]
pub struct MeterConfig {
    pub orientation: Orientation,
    pub show_scale: bool,
    pub show_numeric: bool,
    pub show_rms: bool,
    pub show_hold: bool,
    pub show_lufs: bool,
    pub db_min: f32,
    pub db_max: f32,
    pub db_clip: f32,
    /// Preferred meter extent in cells, used as a layout hint
    pub width: u16,
    pub height: u16,
    pub hold_time_ms: u64,
    pub decay_rate: f32,
    pub ballistics: bool,
    pub release_rate: f32,
    pub colors: MeterColors,
    pub thresholds: Thresholds,
}

impl Default for MeterConfig {
    fn default() -> Self {
        Self {
            orientation: Orientation::Vertical,
            show_scale: true,
            show_numeric: true,
            show_rms: true,
            show_hold: true,
            show_lufs: false,
            db_min: db::DEFAULT_DB_MIN,
            db_max: db::DEFAULT_DB_MAX,
            db_clip: db::DEFAULT_DB_CLIP,
            width: 24,
            height: 200,
            hold_time_ms: ballistics::DEFAULT_HOLD_TIME_MS,
            decay_rate: ballistics::DEFAULT_DECAY_RATE,
            ballistics: true,
            release_rate: ballistics::DEFAULT_RELEASE_RATE,
            colors: MeterColors::default(),
            thresholds: Thresholds::default(),
        }
    }
}

/// Partial configuration overlay; `None` fields leave the base untouched.
#[derive(Debug, Clone, Default)]
pub struct MeterOptions {
    pub orientation: Option<Orientation>,
    pub show_scale: Option<bool>,
    pub show_numeric: Option<bool>,
    pub show_rms: Option<bool>,
    pub show_hold: Option<bool>,
    pub show_lufs: Option<bool>,
    pub db_min: Option<f32>,
    pub db_max: Option<f32>,
    pub db_clip: Option<f32>,
    pub width: Option<u16>,
    pub height: Option<u16>,
    pub hold_time_ms: Option<u64>,
    pub decay_rate: Option<f32>,
    pub ballistics: Option<bool>,
    pub release_rate: Option<f32>,
    pub warning_db: Option<f32>,
    pub danger_db: Option<f32>,
    pub colors: Option<MeterColors>,
}

impl MeterOptions {
    /// Merge this overlay onto a base configuration, field-wise.
    pub fn apply(&self, base: &mut MeterConfig) {
        if let Some(v) = self.orientation {
            base.orientation = v;
        }
        if let Some(v) = self.show_scale {
            base.show_scale = v;
        }
        if let Some(v) = self.show_numeric {
            base.show_numeric = v;
        }
        if let Some(v) = self.show_rms {
            base.show_rms = v;
        }
        if let Some(v) = self.show_hold {
            base.show_hold = v;
        }
        if let Some(v) = self.show_lufs {
            base.show_lufs = v;
        }
        if let Some(v) = self.db_min {
            base.db_min = v;
        }
        if let Some(v) = self.db_max {
            base.db_max = v;
        }
        if let Some(v) = self.db_clip {
            base.db_clip = v;
        }
        if let Some(v) = self.width {
            base.width = v;
        }
        if let Some(v) = self.height {
            base.height = v;
        }
        if let Some(v) = self.hold_time_ms {
            base.hold_time_ms = v;
        }
        if let Some(v) = self.decay_rate {
            base.decay_rate = v;
        }
        if let Some(v) = self.ballistics {
            base.ballistics = v;
        }
        if let Some(v) = self.release_rate {
            base.release_rate = v;
        }
        if let Some(v) = self.warning_db {
            base.thresholds.warning = v;
        }
        if let Some(v) = self.danger_db {
            base.thresholds.danger = v;
        }
        if let Some(v) = self.colors {
            base.colors = v;
        }
    }
}

/// Names of the built-in presets, in keybinding order
pub const PRESET_NAMES: [&str; 4] = ["minimal", "standard", "broadcast", "compact"];

/// Look up a built-in preset overlay by name.
pub fn preset(name: &str) -> Option<MeterOptions> {
    match name {
        // Simple bar without graduation
        "minimal" => Some(MeterOptions {
            orientation: Some(Orientation::Vertical),
            show_scale: Some(false),
            show_numeric: Some(false),
            show_rms: Some(true),
            show_hold: Some(false),
            width: Some(20),
            height: Some(120),
            ..Default::default()
        }),
        // Peak + RMS with graduation (default)
        "standard" => Some(MeterOptions {
            orientation: Some(Orientation::Vertical),
            show_scale: Some(true),
            show_numeric: Some(true),
            show_rms: Some(true),
            show_hold: Some(true),
            width: Some(44),
            height: Some(200),
            ..Default::default()
        }),
        // Full broadcast layout with LUFS
        "broadcast" => Some(MeterOptions {
            orientation: Some(Orientation::Vertical),
            show_scale: Some(true),
            show_numeric: Some(true),
            show_rms: Some(true),
            show_hold: Some(true),
            show_lufs: Some(true),
            width: Some(52),
            height: Some(300),
            ..Default::default()
        }),
        // Horizontal strip for track lists
        "compact" => Some(MeterOptions {
            orientation: Some(Orientation::Horizontal),
            show_scale: Some(false),
            show_numeric: Some(false),
            show_rms: Some(true),
            show_hold: Some(false),
            width: Some(120),
            height: Some(12),
            ..Default::default()
        }),
        _ => None,
    }
}

impl MeterConfig {
    /// Resolve a configuration from a preset name plus explicit overrides.
    ///
    /// Precedence: explicit options > named preset > built-in defaults.
    /// An unknown preset name falls back to `standard`.
    pub fn resolve(preset_name: &str, options: &MeterOptions) -> AppResult<Self> {
        let mut config = MeterConfig::default();
        let preset = preset(preset_name).or_else(|| preset("standard"));
        if let Some(overlay) = preset {
            overlay.apply(&mut config);
        }
        options.apply(&mut config);
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> AppResult<()> {
        if self.db_min >= self.db_max {
            return Err(AppError::Config(format!(
                "dB range is empty: min {} must be below max {}",
                self.db_min, self.db_max
            )));
        }
        if self.decay_rate < 0.0 || self.release_rate < 0.0 {
            return Err(AppError::Config(
                "Decay and release rates must be non-negative".to_string(),
            ));
        }
        Ok(())
    }
}

impl MonitorArgs {
    /// Collect explicit CLI overrides into a configuration overlay.
    pub fn meter_options(&self) -> MeterOptions {
        MeterOptions {
            orientation: self.orientation,
            show_scale: self.no_scale.then_some(false),
            show_numeric: self.no_numeric.then_some(false),
            show_rms: self.no_rms.then_some(false),
            show_hold: self.no_hold.then_some(false),
            show_lufs: self.lufs.then_some(true),
            db_min: self.db_min,
            db_max: self.db_max,
            db_clip: self.db_clip,
            hold_time_ms: self.hold_time,
            decay_rate: self.decay_rate,
            ballistics: self.no_ballistics.then_some(false),
            release_rate: self.release_rate,
            ..Default::default()
        }
    }
}
