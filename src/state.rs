//! Shared level handoff between the audio callback and the UI loop

use std::sync::{Arc, Mutex};

/// Type alias for the level references handed to the audio callback
pub type LevelRefs = (Arc<Mutex<f32>>, Arc<Mutex<f32>>);

/// Thread-safe handoff cell for the latest raw levels.
///
/// The cpal callback writes, the UI loop reads once per tick and feeds the
/// meter. Everything downstream of this cell is single-threaded.
pub struct SharedLevels {
    pub peak_db: Arc<Mutex<f32>>,
    pub rms_db: Arc<Mutex<f32>>,
}

impl SharedLevels {
    /// Create new shared state in the silent (no signal yet) position
    pub fn new() -> Self {
        Self {
            peak_db: Arc::new(Mutex::new(f32::NEG_INFINITY)),
            rms_db: Arc::new(Mutex::new(f32::NEG_INFINITY)),
        }
    }

    /// Get clones of the level references for the audio callback
    pub fn audio_refs(&self) -> LevelRefs {
        (Arc::clone(&self.peak_db), Arc::clone(&self.rms_db))
    }

    /// Read the latest (peak, rms) pair
    pub fn snapshot(&self) -> (f32, f32) {
        (
            *self.peak_db.lock().unwrap(),
            *self.rms_db.lock().unwrap(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_silent() {
        let levels = SharedLevels::new();
        let (peak, rms) = levels.snapshot();
        assert_eq!(peak, f32::NEG_INFINITY);
        assert_eq!(rms, f32::NEG_INFINITY);
    }

    #[test]
    fn test_audio_refs_alias_the_cells() {
        let levels = SharedLevels::new();
        let (peak, rms) = levels.audio_refs();
        *peak.lock().unwrap() = -6.0;
        *rms.lock().unwrap() = -18.0;
        assert_eq!(levels.snapshot(), (-6.0, -18.0));
    }
}
