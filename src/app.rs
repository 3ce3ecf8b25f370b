//! Main application logic and orchestration

use crate::audio;
use crate::config::{MeterConfig, MonitorArgs, PRESET_NAMES};
use crate::error::{AppError, AppResult};
use crate::meter::{LevelUpdate, Meter};
use crate::state::SharedLevels;
use crate::ui;
use cpal::traits::StreamTrait;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io;
use std::time::Duration;

/// Exit codes for the application
#[derive(Debug, Clone, Copy)]
pub enum ExitCode {
    Success = 0,
    UserExit = 1, // User pressed Escape or Ctrl+C
    Error = 2,    // Actual application error
}

/// Extended result that tracks exit reason
pub struct RunResult {
    pub result: AppResult<()>,
    pub exit_code: ExitCode,
}

impl RunResult {
    fn error(err: AppError) -> Self {
        RunResult {
            result: Err(err),
            exit_code: ExitCode::Error,
        }
    }
}

/// Main application struct
pub struct App {
    meter: Meter,
    preset_name: String,
    device_name: Option<String>,
    terminal: Terminal<CrosstermBackend<std::io::Stdout>>,
}

impl App {
    /// Initialize the application from monitor arguments
    pub fn new(args: &MonitorArgs) -> AppResult<Self> {
        let config = MeterConfig::resolve(&args.preset, &args.meter_options())?;
        let meter = Meter::new(config);

        // Setup terminal
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;

        Ok(App {
            meter,
            preset_name: args.preset.clone(),
            device_name: args.device.clone(),
            terminal,
        })
    }

    /// Run the main application loop
    pub async fn run(mut self) -> RunResult {
        // Setup audio
        let (device, audio_config) = match audio::setup_audio_device(self.device_name.clone()) {
            Ok(result) => result,
            Err(e) => {
                let _ = self.cleanup();
                return RunResult::error(e);
            }
        };
        let device_name = audio_config.device_name.clone();

        // Shared handoff cell between the cpal thread and this loop
        let shared = SharedLevels::new();
        let (peak_db, rms_db) = shared.audio_refs();
        let callback = audio::create_level_callback(peak_db, rms_db, audio_config.sample_rate);

        let stream_config = cpal::StreamConfig {
            channels: audio_config.channels,
            sample_rate: cpal::SampleRate(audio_config.sample_rate),
            buffer_size: crate::constants::audio::BUFFER_SIZE,
        };

        let stream = match audio::build_audio_stream(&device, &stream_config, callback) {
            Ok(stream) => stream,
            Err(e) => {
                let _ = self.cleanup();
                return RunResult::error(e);
            }
        };

        if let Err(e) = stream.play() {
            let _ = self.cleanup();
            return RunResult::error(e.into());
        }

        // Main UI loop: drain the latest levels, update the meter, draw
        let mut interval = tokio::time::interval(Duration::from_millis(
            crate::constants::ui::UPDATE_INTERVAL_MS,
        ));
        let mut exit_reason = ExitCode::Success;

        loop {
            let (peak, rms) = shared.snapshot();
            self.meter.update(LevelUpdate {
                peak: Some(peak),
                rms: Some(rms),
                ..Default::default()
            });

            let frame = self.meter.frame();
            let config = self.meter.config().clone();
            let preset_name = self.preset_name.clone();
            if let Err(e) = self.terminal.draw(|f| {
                ui::render_ui(f, &frame, &config, &device_name, &preset_name);
            }) {
                drop(stream);
                let _ = self.cleanup();
                return RunResult::error(e.into());
            }

            // Check for Ctrl+C signal between frames
            let mut should_exit = false;
            tokio::select! {
                _ = tokio::signal::ctrl_c() => {
                    should_exit = true;
                    exit_reason = ExitCode::UserExit;
                }
                _ = tokio::time::sleep(Duration::from_millis(1)) => {
                    // Timeout - fall through to keyboard events
                }
            }

            // Keyboard events: quit, hold reset, preset switching
            if !should_exit
                && crossterm::event::poll(Duration::from_millis(0)).unwrap_or(false)
                && let Ok(Event::Key(key_event)) = crossterm::event::read()
            {
                match key_event.code {
                    KeyCode::Esc | KeyCode::Char('q') => {
                        should_exit = true;
                        exit_reason = ExitCode::UserExit;
                    }
                    KeyCode::Char('c') if key_event.modifiers.contains(KeyModifiers::CONTROL) => {
                        should_exit = true;
                        exit_reason = ExitCode::UserExit;
                    }
                    KeyCode::Char('r') => {
                        self.meter.reset_hold();
                    }
                    KeyCode::Char(c @ '1'..='4') => {
                        let index = (c as u8 - b'1') as usize;
                        let name = PRESET_NAMES[index];
                        self.meter.set_preset(name);
                        self.preset_name = name.to_string();
                    }
                    _ => {}
                }
            }

            if should_exit {
                break;
            }

            // Wait for next interval
            interval.tick().await;
        }

        // Teardown: stop the stream first, then restore the terminal.
        // Nothing reads the meter after this point.
        drop(stream);
        let _ = self.cleanup();

        RunResult {
            result: Ok(()),
            exit_code: exit_reason,
        }
    }

    /// Clean up terminal state
    fn cleanup(&mut self) -> AppResult<()> {
        disable_raw_mode()?;
        execute!(
            self.terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        self.terminal.show_cursor()?;
        Ok(())
    }
}
