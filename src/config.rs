use crate::app_dirs::AppDirs;
use crate::session::{
    SessionConfig, DEFAULT_CALIBRATION_MS, DEFAULT_MAX_TREE_HEIGHT, DEFAULT_POINTS_PER_SECOND,
    DEFAULT_SCREAM_THRESHOLD_DB, DEFAULT_SMOOTHING_ALPHA, DEFAULT_TARGET_OFFSET_DB,
    DEFAULT_TICK_MS,
};
use crate::calibration::DEFAULT_NOISE_FLOOR_DB;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// User-facing settings persisted between runs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub tick_ms: u64,
    pub calibration_ms: u64,
    pub target_offset_db: f64,
    pub scream_threshold_db: f64,
    pub smoothing_alpha: f64,
    pub max_tree_height: f64,
    pub points_per_second: f64,
    pub default_noise_floor_db: f64,
    pub simulate: bool,
}

impl Default for Config {
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
            simulate: !cfg!(feature = "microphone"),
        }
    }
}

impl From<&Config> for SessionConfig {
    fn from(cfg: &Config) -> Self {
        Self {
            tick_ms: cfg.tick_ms,
            calibration_ms: cfg.calibration_ms,
            target_offset_db: cfg.target_offset_db,
            scream_threshold_db: cfg.scream_threshold_db,
            smoothing_alpha: cfg.smoothing_alpha,
            max_tree_height: cfg.max_tree_height,
            points_per_second: cfg.points_per_second,
            default_noise_floor_db: cfg.default_noise_floor_db,
        }
        .sanitized()
    }
}

pub trait ConfigStore {
    fn load(&self) -> Config;
    fn save(&self, cfg: &Config) -> std::io::Result<()>;
}

#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        let path = AppDirs::config_path().unwrap_or_else(|| PathBuf::from("readgrove_config.json"));
        Self { path }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for FileConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore for FileConfigStore {
    fn load(&self) -> Config {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(err) => {
                debug!(path = %self.path.display(), "no config loaded: {}", err);
                return Config::default();
            }
        };
        match serde_json::from_slice::<Config>(&bytes) {
            Ok(cfg) => cfg,
            Err(err) => {
                warn!(path = %self.path.display(), "ignoring unreadable config: {}", err);
                Config::default()
            }
        }
    }

    fn save(&self, cfg: &Config) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(cfg)?;
        fs::write(&self.path, data)
    }
}
