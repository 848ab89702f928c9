// Noise-floor calibration.
//
// A calibration run listens for a fixed window; when it expires the most
// recent raw reading becomes the noise floor, clamped into the usable meter
// range so silence or a full-scale spike cannot push the target threshold
// off the meter.

use std::time::{Duration, Instant};

/// Lowest noise floor a calibration can produce (dBFS)
pub const NOISE_FLOOR_MIN_DB: f64 = -80.0;
/// Highest noise floor a calibration can produce (dBFS)
pub const NOISE_FLOOR_MAX_DB: f64 = -30.0;
/// Noise floor used before any calibration has run
pub const DEFAULT_NOISE_FLOOR_DB: f64 = -60.0;

/// Calibrated ambient loudness baseline. Always within
/// `[NOISE_FLOOR_MIN_DB, NOISE_FLOOR_MAX_DB]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NoiseFloor(f64);

impl NoiseFloor {
    /// Clamp `db` into range. NaN maps to the lower bound.
    pub fn from_db(db: f64) -> Self {
        if db.is_nan() {
            return Self(NOISE_FLOOR_MIN_DB);
        }
        Self(db.clamp(NOISE_FLOOR_MIN_DB, NOISE_FLOOR_MAX_DB))
    }

    pub fn db(self) -> f64 {
        self.0
    }

    /// Minimum loudness counted as good speaking volume.
    pub fn target_threshold(self, target_offset_db: f64) -> f64 {
        self.0 + target_offset_db
    }
}

impl Default for NoiseFloor {
    fn default() -> Self {
        Self(DEFAULT_NOISE_FLOOR_DB)
    }
}

/// One in-progress listening window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CalibrationRun {
    pub started_at: Instant,
    pub duration_limit: Duration,
    last_sample_db: Option<f64>,
}

impl CalibrationRun {
    pub fn new(started_at: Instant, duration_limit: Duration) -> Self {
        Self {
            started_at,
            duration_limit,
            last_sample_db: None,
        }
    }

    /// Remember the latest raw reading; only the last one counts.
    pub fn observe(&mut self, raw_db: f64) {
        self.last_sample_db = Some(raw_db);
    }

    pub fn elapsed(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.started_at)
    }

    pub fn is_expired(&self, now: Instant) -> bool {
        self.elapsed(now) >= self.duration_limit
    }

    /// Fraction of the window elapsed, in `[0, 1]`.
    pub fn progress(&self, now: Instant) -> f64 {
        if self.duration_limit.is_zero() {
            return 1.0;
        }
        (self.elapsed(now).as_secs_f64() / self.duration_limit.as_secs_f64()).min(1.0)
    }

    /// Consume the run. With no observed sample the fallback floor is kept.
    pub fn finish(self, fallback: NoiseFloor) -> NoiseFloor {
        match self.last_sample_db {
            Some(db) => NoiseFloor::from_db(db),
            None => fallback,
        }
    }
}
