//! Planner configuration parsed from environment variables.
use std::path::PathBuf;

use crate::store::{DEFAULT_AUTO_SAVE_SECS, clamp_interval};

/// File name of the local store inside the data directory.
pub const LOCAL_STORE_FILE: &str = "workplan-data.json";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: `{value}`")]
    Invalid { var: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannerConfig {
    pub data_dir: PathBuf,
    pub shell_file: Option<PathBuf>,
    pub export_dir: PathBuf,
    pub auto_save_secs: u64,
}

impl PlannerConfig {
    /// Build typed planner config from environment variables.
    ///
    /// Optional:
    /// - `PLANNER_DATA_DIR`: local store directory, default `$HOME/.local/share/quadrant-planner`
    /// - `PLANNER_SHELL_FILE`: tasks file shared with a host shell, unset means none
    /// - `PLANNER_EXPORT_DIR`: where exports are written, default the current directory
    /// - `PLANNER_AUTOSAVE_SECS`: default 30, clamped to 5..=600
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`PlannerConfig::from_env`] with an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let data_dir = non_empty("PLANNER_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| default_data_dir(non_empty("HOME")));
        let shell_file = non_empty("PLANNER_SHELL_FILE").map(PathBuf::from);
        let export_dir = non_empty("PLANNER_EXPORT_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."));
        let auto_save_secs = match non_empty("PLANNER_AUTOSAVE_SECS") {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .map(clamp_interval)
                .map_err(|_| ConfigError::Invalid {
                    var: "PLANNER_AUTOSAVE_SECS",
                    value: raw,
                })?,
            None => DEFAULT_AUTO_SAVE_SECS,
        };

        Ok(Self {
            data_dir,
            shell_file,
            export_dir,
            auto_save_secs,
        })
    }

    pub fn local_store_path(&self) -> PathBuf {
        self.data_dir.join(LOCAL_STORE_FILE)
    }
}

fn default_data_dir(home: Option<String>) -> PathBuf {
    match home {
        Some(home) => PathBuf::from(home).join(".local/share/quadrant-planner"),
        None => PathBuf::from(".quadrant-planner"),
    }
}
