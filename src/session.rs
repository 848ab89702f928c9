use crate::calibration::{NoiseFloor, DEFAULT_NOISE_FLOOR_DB};
use crate::classifier::VolumeStatus;
use crate::stats::SessionStats;
use std::time::Duration;
use tracing::warn;

pub const DEFAULT_TICK_MS: u64 = 100;
pub const DEFAULT_CALIBRATION_MS: u64 = 3000;
pub const DEFAULT_TARGET_OFFSET_DB: f64 = 10.0;
pub const DEFAULT_SCREAM_THRESHOLD_DB: f64 = -15.0;
pub const DEFAULT_SMOOTHING_ALPHA: f64 = 0.3;
pub const DEFAULT_MAX_TREE_HEIGHT: f64 = 100.0;
pub const DEFAULT_POINTS_PER_SECOND: f64 = 10.0;

/// Overall mode of the engine. Only `Calibrating` and `Reading` tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum SessionState {
    Idle,
    Calibrating,
    Reading,
    /// Reserved; no action enters it. Behaves like `Idle`.
    Paused,
    Completed,
}

impl SessionState {
    pub fn is_ticking(self) -> bool {
        matches!(self, SessionState::Calibrating | SessionState::Reading)
    }

    /// Helper line shown under the meter.
    pub fn helper_text(self) -> &'static str {
        match self {
            SessionState::Idle => "Calibrate in a quiet room, then start reading aloud",
            SessionState::Calibrating => "Stay quiet while the room is measured...",
            SessionState::Reading => "Keep a steady, clear voice to grow your tree",
            SessionState::Paused => "Paused",
            SessionState::Completed => "Session complete! Press (n) for a new session",
        }
    }
}

/// Engine constants. Build one from the user config or use the defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionConfig {
    pub tick_ms: u64,
    pub calibration_ms: u64,
    pub target_offset_db: f64,
    pub scream_threshold_db: f64,
    pub smoothing_alpha: f64,
    pub max_tree_height: f64,
    pub points_per_second: f64,
    pub default_noise_floor_db: f64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            tick_ms: DEFAULT_TICK_MS,
            calibration_ms: DEFAULT_CALIBRATION_MS,
            target_offset_db: DEFAULT_TARGET_OFFSET_DB,
            scream_threshold_db: DEFAULT_SCREAM_THRESHOLD_DB,
            smoothing_alpha: DEFAULT_SMOOTHING_ALPHA,
            max_tree_height: DEFAULT_MAX_TREE_HEIGHT,
            points_per_second: DEFAULT_POINTS_PER_SECOND,
            default_noise_floor_db: DEFAULT_NOISE_FLOOR_DB,
        }
    }
}

impl SessionConfig {
    /// Replace values the engine cannot work with by their defaults.
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        if self.tick_ms == 0 {
            warn!(field = "tick_ms", "invalid config value, using default");
            self.tick_ms = defaults.tick_ms;
        }
        if !(self.smoothing_alpha > 0.0 && self.smoothing_alpha <= 1.0) {
            warn!(
                field = "smoothing_alpha",
                value = self.smoothing_alpha,
                "invalid config value, using default"
            );
            self.smoothing_alpha = defaults.smoothing_alpha;
        }
        if !(self.max_tree_height.is_finite() && self.max_tree_height > 0.0) {
            warn!(
                field = "max_tree_height",
                value = self.max_tree_height,
                "invalid config value, using default"
            );
            self.max_tree_height = defaults.max_tree_height;
        }
        if !(self.points_per_second.is_finite() && self.points_per_second > 0.0) {
            warn!(
                field = "points_per_second",
                value = self.points_per_second,
                "invalid config value, using default"
            );
            self.points_per_second = defaults.points_per_second;
        }
        if !self.target_offset_db.is_finite() {
            warn!(field = "target_offset_db", "invalid config value, using default");
            self.target_offset_db = defaults.target_offset_db;
        }
        if !self.scream_threshold_db.is_finite() {
            warn!(field = "scream_threshold_db", "invalid config value, using default");
            self.scream_threshold_db = defaults.scream_threshold_db;
        }
        if !self.default_noise_floor_db.is_finite() {
            warn!(field = "default_noise_floor_db", "invalid config value, using default");
            self.default_noise_floor_db = defaults.default_noise_floor_db;
        }
        self
    }

    pub fn tick_period(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }

    pub fn calibration_window(&self) -> Duration {
        Duration::from_millis(self.calibration_ms)
    }

    /// Good-volume time needed for one tree: `max_tree_height / points_per_second`.
    pub fn tree_cycle(&self) -> Duration {
        Duration::try_from_secs_f64(self.max_tree_height / self.points_per_second)
            .unwrap_or(Duration::ZERO)
    }

    pub fn default_noise_floor(&self) -> NoiseFloor {
        NoiseFloor::from_db(self.default_noise_floor_db)
    }
}

/// Read model handed to the presentation layer. Derived values are computed
/// when the snapshot is taken and never stored by the engine.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSnapshot {
    pub state: SessionState,
    pub smoothed_db: f64,
    pub noise_floor_db: f64,
    pub target_threshold_db: f64,
    pub scream_threshold_db: f64,
    pub stats: SessionStats,
    pub growth_percentage: f64,
    pub volume_status: VolumeStatus,
    pub calibration_progress: Option<f64>,
    pub last_error: Option<String>,
}
