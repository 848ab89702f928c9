use directories::ProjectDirs;
use std::path::PathBuf;

/// Centralized application directory resolution
pub struct AppDirs;

impl AppDirs {
    pub fn config_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "readgrove").map(|pd| pd.config_dir().join("config.json"))
    }

    /// Log file; the terminal belongs to the TUI so logs go to disk.
    pub fn log_path() -> Option<PathBuf> {
        if let Ok(home) = std::env::var("HOME") {
            let state_dir = PathBuf::from(home)
                .join(".local")
                .join("state")
                .join("readgrove");
            Some(state_dir.join("readgrove.log"))
        } else {
            ProjectDirs::from("", "", "readgrove")
                .map(|proj_dirs| proj_dirs.data_local_dir().join("readgrove.log"))
        }
    }
}
