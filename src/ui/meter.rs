use ratatui::style::Color;

use crate::classifier::VolumeStatus;
use crate::sensor::MIN_DECIBELS;

/// Fraction of the meter filled for a level, `MIN_DECIBELS..=0` mapped to `0..=1`.
pub fn meter_ratio(db: f64) -> f64 {
    if db.is_nan() {
        return 0.0;
    }
    ((db - MIN_DECIBELS) / -MIN_DECIBELS).clamp(0.0, 1.0)
}

/// Column of a level inside a meter `width` cells wide.
pub fn meter_column(db: f64, width: u16) -> u16 {
    if width == 0 {
        return 0;
    }
    let last = (width - 1) as f64;
    (meter_ratio(db) * last).round() as u16
}

/// One row of tick marks under the meter. Later markers win on collisions.
pub fn marker_line(width: u16, markers: &[(f64, char)]) -> String {
    let mut row = vec![' '; width as usize];
    for &(db, glyph) in markers {
        if let Some(cell) = row.get_mut(meter_column(db, width) as usize) {
            *cell = glyph;
        }
    }
    row.into_iter().collect()
}

pub fn status_color(status: VolumeStatus) -> Color {
    match status {
        VolumeStatus::Idle => Color::Gray,
        VolumeStatus::Calibrating => Color::Cyan,
        VolumeStatus::Quiet => Color::Yellow,
        VolumeStatus::Good => Color::Green,
        VolumeStatus::Loud => Color::Red,
    }
}

pub fn status_text(status: VolumeStatus) -> &'static str {
    match status {
        VolumeStatus::Idle => "waiting",
        VolumeStatus::Calibrating => "measuring the room",
        VolumeStatus::Quiet => "a little louder",
        VolumeStatus::Good => "great voice",
        VolumeStatus::Loud => "too loud",
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeStage {
    Seed,
    Sprout,
    Sapling,
    Young,
    Grown,
}

impl TreeStage {
    pub fn from_growth(percentage: f64) -> Self {
        match percentage {
            p if p >= 80.0 => TreeStage::Grown,
            p if p >= 60.0 => TreeStage::Young,
            p if p >= 40.0 => TreeStage::Sapling,
            p if p >= 20.0 => TreeStage::Sprout,
            _ => TreeStage::Seed,
        }
    }

    /// Five rows of ascii art, bottom row is the ground.
    pub fn art(self) -> [&'static str; 5] {
        match self {
            TreeStage::Seed => ["", "", "", "o", "~~~~~~~~~"],
            TreeStage::Sprout => ["", "", "\\|/", "|", "~~~~~~~~~"],
            TreeStage::Sapling => ["", "\\ /", "-(*)-", "|", "~~~~~~~~~"],
            TreeStage::Young => ["", "(@@@)", "(@@@@@)", "||", "~~~~~~~~~"],
            TreeStage::Grown => ["(@@@@)", "(@@@@@@@)", "(@@@@@@@@@)", "||", "~~~~~~~~~"],
        }
    }
}

/// Row of planted trees, capped so a long session still fits.
pub fn forest_row(trees: u64, max: usize) -> String {
    let shown = (trees as usize).min(max);
    let mut row = "♣ ".repeat(shown).trim_end().to_string();
    if trees as usize > max {
        row.push_str(&format!(" +{}", trees as usize - max));
    }
    row
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_meter_ratio_bounds() {
        assert_eq!(meter_ratio(MIN_DECIBELS), 0.0);
        assert_eq!(meter_ratio(0.0), 1.0);
        assert_eq!(meter_ratio(-50.0), 0.5);
        assert_eq!(meter_ratio(-150.0), 0.0);
        assert_eq!(meter_ratio(12.0), 1.0);
        assert_eq!(meter_ratio(f64::NAN), 0.0);
    }

    #[test]
    fn test_meter_column() {
        assert_eq!(meter_column(-100.0, 11), 0);
        assert_eq!(meter_column(-50.0, 11), 5);
        assert_eq!(meter_column(0.0, 11), 10);
        assert_eq!(meter_column(0.0, 0), 0);
    }

    #[test]
    fn test_marker_line_places_glyphs() {
        let line = marker_line(11, &[(-60.0, 'F'), (-50.0, 'T'), (-10.0, '!')]);
        assert_eq!(line.chars().count(), 11);
        assert_eq!(line.chars().nth(4), Some('F'));
        assert_eq!(line.chars().nth(5), Some('T'));
        assert_eq!(line.chars().nth(9), Some('!'));
    }

    #[test]
    fn test_marker_line_zero_width() {
        assert_eq!(marker_line(0, &[(-60.0, 'F')]), "");
    }

    #[test]
    fn test_tree_stage_thresholds() {
        assert_eq!(TreeStage::from_growth(0.0), TreeStage::Seed);
        assert_eq!(TreeStage::from_growth(19.9), TreeStage::Seed);
        assert_eq!(TreeStage::from_growth(20.0), TreeStage::Sprout);
        assert_eq!(TreeStage::from_growth(45.0), TreeStage::Sapling);
        assert_eq!(TreeStage::from_growth(60.0), TreeStage::Young);
        assert_eq!(TreeStage::from_growth(99.0), TreeStage::Grown);
    }

    #[test]
    fn test_forest_row() {
        assert_eq!(forest_row(0, 10), "");
        assert_eq!(forest_row(3, 10), "♣ ♣ ♣");
        assert_eq!(forest_row(12, 2), "♣ ♣ +10");
    }

    #[test]
    fn test_every_status_has_text() {
        for status in [
            VolumeStatus::Idle,
            VolumeStatus::Calibrating,
            VolumeStatus::Quiet,
            VolumeStatus::Good,
            VolumeStatus::Loud,
        ] {
            assert!(!status_text(status).is_empty());
        }
        assert_eq!(status_color(VolumeStatus::Good), Color::Green);
    }
}
