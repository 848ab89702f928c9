/// X (seconds) bound for the level chart; at least one second
pub fn chart_duration(coords: &[(f64, f64)]) -> f64 {
    match coords.last() {
        Some(&(t, _)) if t > 1.0 => t,
        _ => 1.0,
    }
}

/// Flat line at `db` across the chart, used for the target and loud marks
pub fn threshold_line(db: f64, duration: f64) -> [(f64, f64); 2] {
    [(0.0, db), (duration, db)]
}

/// Format a simple numeric label consistently
pub fn format_label(val: f64) -> String {
    if (val - val.round()).abs() < f64::EPSILON {
        format!("{}", val.round())
    } else {
        format!("{val:.1}")
    }
}
