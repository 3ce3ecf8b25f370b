//! Scale mapping: dB to bar position, color zones and tick generation

use crate::config::MeterConfig;
use ratatui::style::Color;

/// Map a decibel value onto the 0–100 bar scale, linear within the range.
pub fn db_to_percent(db: f32, db_min: f32, db_max: f32) -> f32 {
    if db <= db_min {
        return 0.0;
    }
    if db >= db_max {
        return 100.0;
    }
    (db - db_min) / (db_max - db_min) * 100.0
}

/// Zone color for an absolute level (not proportional to bar length)
pub fn color_for_level(db: f32, config: &MeterConfig) -> Color {
    if db >= config.thresholds.danger {
        config.colors.danger
    } else if db >= config.thresholds.warning {
        config.colors.warning
    } else {
        config.colors.peak
    }
}

/// Gradient zone boundaries as (warning_percent, danger_percent)
pub fn zone_boundaries(config: &MeterConfig) -> (f32, f32) {
    (
        db_to_percent(config.thresholds.warning, config.db_min, config.db_max),
        db_to_percent(config.thresholds.danger, config.db_min, config.db_max),
    )
}

/// One graduation mark on the meter scale
#[derive(Debug, Clone, PartialEq)]
pub struct Tick {
    pub db: i32,
    pub percent: f32,
    pub major: bool,
    /// Majors carry a printed label, minors do not
    pub label: Option<String>,
}

/// Generate the ITU-R style graduation pattern, restricted to
/// `[db_min, db_max]`: dense near unity, coarse at the extremes.
///
/// Majors: +6 (when in range), 0, every 4 dB down to -40, every 10 dB
/// below that. Minors: every 1 dB from +5 to -3, plus every 4 dB between
/// the majors further down.
pub fn ticks(db_min: f32, db_max: f32) -> Vec<Tick> {
    let mut majors: Vec<i32> = Vec::new();
    let mut minors: Vec<i32> = Vec::new();

    if db_max >= 6.0 {
        majors.push(6);
    }
    majors.push(0);
    let mut db = -4;
    while db >= -40 && db as f32 >= db_min {
        majors.push(db);
        db -= 4;
    }
    let mut db = -50;
    while db as f32 >= db_min {
        majors.push(db);
        db -= 10;
    }

    // Extra precision around 0 dB
    for db in (-3..=5).rev() {
        if (db as f32) <= db_max && (db as f32) >= db_min && !majors.contains(&db) {
            minors.push(db);
        }
    }
    let mut db = -2;
    while db >= -40 && db as f32 >= db_min {
        if !minors.contains(&db) {
            minors.push(db);
        }
        db -= 4;
    }

    let in_range = |db: i32| (db as f32) >= db_min && (db as f32) <= db_max;
    let mut out: Vec<Tick> = Vec::new();

    for db in majors.into_iter().filter(|&db| in_range(db)) {
        let label = if db > 0 {
            format!("+{}", db)
        } else {
            db.to_string()
        };
        out.push(Tick {
            db,
            percent: db_to_percent(db as f32, db_min, db_max),
            major: true,
            label: Some(label),
        });
    }
    for db in minors.into_iter().filter(|&db| in_range(db)) {
        out.push(Tick {
            db,
            percent: db_to_percent(db as f32, db_min, db_max),
            major: false,
            label: None,
        });
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MeterConfig;

    #[test]
    fn test_db_to_percent_endpoints() {
        assert_eq!(db_to_percent(-90.0, -90.0, 6.0), 0.0);
        assert_eq!(db_to_percent(6.0, -90.0, 6.0), 100.0);
    }

    #[test]
    fn test_db_to_percent_clamps_outside_range() {
        assert_eq!(db_to_percent(-120.0, -90.0, 6.0), 0.0);
        assert_eq!(db_to_percent(40.0, -90.0, 6.0), 100.0);
        assert_eq!(db_to_percent(f32::NEG_INFINITY, -90.0, 6.0), 0.0);
    }

    #[test]
    fn test_db_to_percent_linear_midpoint() {
        assert!((db_to_percent(-42.0, -90.0, 6.0) - 50.0).abs() < 1e-4);
    }

    #[test]
    fn test_db_to_percent_monotonic() {
        let mut last = -1.0f32;
        let mut db = -100.0f32;
        while db <= 16.0 {
            let p = db_to_percent(db, -90.0, 6.0);
            assert!(p >= last);
            last = p;
            db += 0.5;
        }
    }

    #[test]
    fn test_color_zones() {
        let config = MeterConfig::default();
        // Defaults: warning -20, danger -10
        assert_eq!(color_for_level(-30.0, &config), config.colors.peak);
        assert_eq!(color_for_level(-20.0, &config), config.colors.warning);
        assert_eq!(color_for_level(-15.0, &config), config.colors.warning);
        assert_eq!(color_for_level(-10.0, &config), config.colors.danger);
        assert_eq!(color_for_level(3.0, &config), config.colors.danger);
    }

    #[test]
    fn test_zone_boundaries_track_thresholds() {
        let config = MeterConfig::default();
        let (warn, danger) = zone_boundaries(&config);
        assert!(warn < danger);
        assert_eq!(warn, db_to_percent(-20.0, config.db_min, config.db_max));
    }

    #[test]
    fn test_ticks_majors_follow_itu_pattern() {
        let t = ticks(-90.0, 6.0);
        let majors: Vec<i32> = t.iter().filter(|t| t.major).map(|t| t.db).collect();
        assert_eq!(
            majors,
            vec![6, 0, -4, -8, -12, -16, -20, -24, -28, -32, -36, -40, -50, -60, -70, -80, -90]
        );
    }

    #[test]
    fn test_ticks_restricted_to_range() {
        let t = ticks(-40.0, 0.0);
        assert!(t.iter().all(|t| t.db >= -40 && t.db <= 0));
        // +6 omitted when the ceiling is below it
        assert!(!t.iter().any(|t| t.db == 6));
    }

    #[test]
    fn test_ticks_minors_dense_near_unity() {
        let t = ticks(-90.0, 6.0);
        let minors: Vec<i32> = t.iter().filter(|t| !t.major).map(|t| t.db).collect();
        // Every 1 dB from +5 to -3 except the majors (0)
        for db in [5, 4, 3, 2, 1, -1, -2, -3] {
            assert!(minors.contains(&db), "missing minor at {}", db);
        }
        assert!(!minors.contains(&0));
        // No duplicates between or within tick classes
        let mut all: Vec<i32> = t.iter().map(|t| t.db).collect();
        all.sort_unstable();
        let len = all.len();
        all.dedup();
        assert_eq!(all.len(), len);
    }

    #[test]
    fn test_ticks_labels_on_majors_only() {
        let t = ticks(-90.0, 6.0);
        for tick in &t {
            assert_eq!(tick.major, tick.label.is_some());
        }
        let six = t.iter().find(|t| t.db == 6).unwrap();
        assert_eq!(six.label.as_deref(), Some("+6"));
        let zero = t.iter().find(|t| t.db == 0).unwrap();
        assert_eq!(zero.label.as_deref(), Some("0"));
    }
}
