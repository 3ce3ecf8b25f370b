//! Application constants and configuration values

/// Decibel range and threshold defaults
pub mod db {
    /// Bottom of the displayed dB range
    pub const DEFAULT_DB_MIN: f32 = -90.0;
    /// Top of the displayed dB range
    pub const DEFAULT_DB_MAX: f32 = 6.0;
    /// Level at or above which the clip indicator lights
    pub const DEFAULT_DB_CLIP: f32 = 0.0;
    /// Start of the yellow zone (ITU-R style)
    pub const DEFAULT_WARNING_DB: f32 = -20.0;
    /// Start of the red zone
    pub const DEFAULT_DANGER_DB: f32 = -10.0;
    /// LUFS readings at or below this are shown as a placeholder
    pub const LUFS_DISPLAY_FLOOR: f32 = -70.0;
}

/// Meter response defaults
pub mod ballistics {
    /// Time a peak is held before decaying, in milliseconds
    pub const DEFAULT_HOLD_TIME_MS: u64 = 1500;
    /// Peak-hold decay rate in dB/s once the hold window expires
    pub const DEFAULT_DECAY_RATE: f32 = 20.0;
    /// Release rate in dB/s:
    ///   4 = very slow, 6.3 = EBU slow, 8.6 = IEC Type II/EBU normal,
    ///   11.8 = IEC Type I, 20 = fast, 30 = faster, 50 = very fast
    pub const DEFAULT_RELEASE_RATE: f32 = 11.8;
}

/// Audio capture constants
pub mod audio {
    /// RMS exponential moving average window in seconds
    pub const RMS_EMA_SECONDS: f32 = 0.3;
    /// Buffer size for audio streams
    pub const BUFFER_SIZE: cpal::BufferSize = cpal::BufferSize::Default;
    /// Preferred channel count for input streams
    pub const DEFAULT_CHANNELS: u16 = 1;
}

/// UI display constants
pub mod ui {
    /// UI update interval in milliseconds
    pub const UPDATE_INTERVAL_MS: u64 = 16;
    /// Bar width calculation accounts for borders
    pub const BAR_BORDER_WIDTH: usize = 2;
}
