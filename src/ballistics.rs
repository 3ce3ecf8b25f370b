//! Meter ballistics and level conversion utilities
//!
//! Peak-program-meter response: instant attack so transients are never
//! under-reported, linear release in dB/s so the fall-back speed is
//! independent of how often samples arrive.

/// Advance a displayed level toward a new target.
///
/// `current` and `target` are in dB, `delta_secs` is the wall-clock time
/// since the previous sample. A non-finite `current` (the pre-first-sample
/// state) is treated as `db_min`. Rising or equal targets are adopted
/// immediately; falling targets are approached at `release_rate` dB/s and
/// never overshot.
pub fn apply_ballistics(
    current: f32,
    target: f32,
    delta_secs: f32,
    release_rate: f32,
    db_min: f32,
) -> f32 {
    let current = if current.is_finite() { current } else { db_min };

    if target >= current {
        // Instant attack
        target
    } else {
        let decay = release_rate * delta_secs;
        (current - decay).max(target)
    }
}

/// Convert linear amplitude to decibels full scale
pub fn amplitude_to_db(amplitude: f32, db_min: f32) -> f32 {
    if amplitude > 0.0 {
        20.0 * amplitude.log10()
    } else {
        db_min
    }
}

/// Convert decibels to linear amplitude
pub fn db_to_amplitude(db: f32) -> f32 {
    10.0f32.powf(db / 20.0)
}
