//! Audio device handling and level extraction

use crate::ballistics::amplitude_to_db;
use crate::constants::{audio, db};
use crate::error::{AppError, AppResult};
use cpal::traits::{DeviceTrait, HostTrait};
use std::sync::{Arc, Mutex};

/// Audio configuration and device information
pub struct AudioConfig {
    pub device_name: String,
    pub sample_rate: u32,
    pub channels: u16,
}

/// Find and configure an audio input device
pub fn setup_audio_device(device_name: Option<String>) -> AppResult<(cpal::Device, AudioConfig)> {
    let host = cpal::default_host();

    let device = if let Some(name) = device_name {
        host.input_devices()?
            .find(|d| d.name().map(|n| n == name).unwrap_or(false))
            .ok_or_else(|| AppError::AudioDevice("Specified device not found".to_string()))?
    } else {
        host.default_input_device()
            .ok_or_else(|| AppError::AudioDevice("No default input device available".to_string()))?
    };

    let device_name = device.name()?;

    // Get supported input configs and determine sample rate from device
    let mut supported_configs = device.supported_input_configs()?;
    let config_range = supported_configs
        .next()
        .ok_or_else(|| AppError::AudioDevice("No supported input configs found".to_string()))?;

    // Prefer 44.1kHz if supported, otherwise the minimum supported rate
    let sample_rate = if config_range.min_sample_rate().0 <= 44100
        && config_range.max_sample_rate().0 >= 44100
    {
        44100
    } else {
        config_range.min_sample_rate().0
    };

    let channels = if config_range.channels() >= audio::DEFAULT_CHANNELS {
        audio::DEFAULT_CHANNELS
    } else {
        config_range.channels()
    };

    let audio_config = AudioConfig {
        device_name,
        sample_rate,
        channels,
    };

    Ok((device, audio_config))
}

/// Build an audio input stream with the given callback
pub fn build_audio_stream<F>(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    data_callback: F,
) -> AppResult<cpal::Stream>
where
    F: FnMut(&[f32], &cpal::InputCallbackInfo) + Send + 'static,
{
    let stream = device.build_input_stream(
        config,
        data_callback,
        |err| eprintln!("Audio stream error: {}", err),
        None,
    )?;

    Ok(stream)
}

/// Per-buffer instantaneous peak: max absolute sample
pub fn buffer_peak(data: &[f32]) -> f32 {
    data.iter().map(|s| s.abs()).fold(0.0f32, f32::max)
}

/// Per-buffer root mean square
pub fn buffer_rms(data: &[f32]) -> f32 {
    if data.is_empty() {
        return 0.0;
    }
    let sum_sq: f32 = data.iter().map(|s| s * s).sum();
    (sum_sq / data.len() as f32).sqrt()
}

/// Audio processing callback that publishes peak and smoothed RMS levels.
///
/// Peak is instantaneous; the meter applies its own ballistics. RMS is
/// pre-smoothed here with a ~300ms EMA so the meter receives a stable
/// average, per its contract.
pub fn create_level_callback(
    peak_db: Arc<Mutex<f32>>,
    rms_db: Arc<Mutex<f32>>,
    sample_rate: u32,
) -> impl FnMut(&[f32], &cpal::InputCallbackInfo) + Send + 'static {
    let mut rms_ema: f32 = 0.0;

    move |data: &[f32], _: &cpal::InputCallbackInfo| {
        if data.is_empty() {
            return;
        }

        let peak = buffer_peak(data);
        *peak_db.lock().unwrap() = amplitude_to_db(peak, db::DEFAULT_DB_MIN);

        // EMA coefficient from the buffer duration against the window
        let buffer_secs = data.len() as f32 / sample_rate.max(1) as f32;
        let alpha = (buffer_secs / audio::RMS_EMA_SECONDS).clamp(0.0, 1.0);
        let rms = buffer_rms(data);
        rms_ema = rms_ema * (1.0 - alpha) + rms * alpha;
        *rms_db.lock().unwrap() = amplitude_to_db(rms_ema, db::DEFAULT_DB_MIN);
    }
}
