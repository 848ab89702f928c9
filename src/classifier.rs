/// Classification of one loudness sample against the calibrated thresholds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum_macros::Display)]
pub enum Verdict {
    TooQuiet,
    Good,
    TooLoud,
}

/// Meter state exposed to the presentation layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum_macros::Display)]
#[strum(serialize_all = "lowercase")]
pub enum VolumeStatus {
    Idle,
    Calibrating,
    Quiet,
    Good,
    Loud,
}

impl From<Verdict> for VolumeStatus {
    fn from(verdict: Verdict) -> Self {
        match verdict {
            Verdict::TooQuiet => VolumeStatus::Quiet,
            Verdict::Good => VolumeStatus::Good,
            Verdict::TooLoud => VolumeStatus::Loud,
        }
    }
}

/// Loud is checked first and is exclusive (`>`); the target is inclusive
/// (`>=`). Together the three regions cover every input exactly once.
pub fn classify(
    current_db: f64,
    noise_floor_db: f64,
    target_offset_db: f64,
    scream_threshold_db: f64,
) -> Verdict {
    if current_db > scream_threshold_db {
        Verdict::TooLoud
    } else if current_db >= noise_floor_db + target_offset_db {
        Verdict::Good
    } else {
        Verdict::TooQuiet
    }
}
