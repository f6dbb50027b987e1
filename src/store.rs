//! Persistence of the task list.
//!
//! Two independent sinks are written: a local store that always exists, and an optional
//! shell-provided tasks file. Writes are best-effort and never retried; a failed read is
//! treated as "nothing saved".
use std::path::{Path, PathBuf};

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::Task;

/// Autosave interval used when nothing else is configured, in seconds.
pub const DEFAULT_AUTO_SAVE_SECS: u64 = 30;
/// Shortest accepted autosave interval, in seconds.
pub const MIN_AUTO_SAVE_SECS: u64 = 5;
/// Longest accepted autosave interval, in seconds.
pub const MAX_AUTO_SAVE_SECS: u64 = 600;

/// Everything that is persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedState {
    #[serde(default)]
    pub tasks: Vec<Task>,
    #[serde(default = "default_interval", deserialize_with = "lenient_interval")]
    pub auto_save_interval: u64,
}

fn default_interval() -> u64 {
    DEFAULT_AUTO_SAVE_SECS
}

/// Accepts whole or fractional numbers and numeric strings. Anything else, including
/// `null`, zero and negatives, reads as the default.
fn lenient_interval<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    let value = Option::<Value>::deserialize(deserializer)?;
    let secs = match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    Ok(match secs {
        Some(secs) if secs.is_finite() && secs >= 0.5 => secs.round() as u64,
        _ => DEFAULT_AUTO_SAVE_SECS,
    })
}

impl Default for SavedState {
    fn default() -> Self {
        Self {
            tasks: Vec::new(),
            auto_save_interval: DEFAULT_AUTO_SAVE_SECS,
        }
    }
}

/// Clamp an autosave interval into the accepted range. Zero means "default".
pub fn clamp_interval(secs: u64) -> u64 {
    if secs == 0 {
        DEFAULT_AUTO_SAVE_SECS
    } else {
        secs.clamp(MIN_AUTO_SAVE_SECS, MAX_AUTO_SAVE_SECS)
    }
}

/// On-disk shapes accepted when loading. Older shell files hold a bare task array.
#[derive(Deserialize)]
#[serde(untagged)]
enum StoredShape {
    State(SavedState),
    Bare(Vec<Task>),
}

impl From<StoredShape> for SavedState {
    fn from(shape: StoredShape) -> Self {
        match shape {
            StoredShape::State(state) => state,
            StoredShape::Bare(tasks) => SavedState {
                tasks,
                ..SavedState::default()
            },
        }
    }
}

/// Errors that can occur when reading or writing a store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("failed to access `{path}`: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("`{path}` holds malformed task data: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("failed to encode task data: {0}")]
    Encode(#[from] serde_json::Error),
}

/// A place the task list can be loaded from and saved to.
pub trait TaskStore {
    /// Short name used in logs.
    fn name(&self) -> &str;

    /// Load the saved state. `Ok(None)` means nothing has been saved yet.
    fn load(&self) -> Result<Option<SavedState>, StoreError>;

    fn save(&self, state: &SavedState) -> Result<(), StoreError>;
}

/// A store backed by a single pretty-printed JSON file.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    name: String,
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TaskStore for JsonFileStore {
    fn name(&self) -> &str {
        &self.name
    }

    fn load(&self) -> Result<Option<SavedState>, StoreError> {
        let raw = match std::fs::read(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(StoreError::Io {
                    path: self.path.clone(),
                    source,
                });
            }
        };
        let shape: StoredShape =
            serde_json::from_slice(&raw).map_err(|source| StoreError::Parse {
                path: self.path.clone(),
                source,
            })?;
        Ok(Some(shape.into()))
    }

    fn save(&self, state: &SavedState) -> Result<(), StoreError> {
        let body = serde_json::to_string_pretty(state)?;
        let io_err = |source| StoreError::Io {
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }
        std::fs::write(&self.path, body).map_err(io_err)
    }
}

/// The local store plus the optional shell file.
pub struct Persistence {
    local: Box<dyn TaskStore>,
    shell: Option<Box<dyn TaskStore>>,
}

impl std::fmt::Debug for Persistence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Persistence")
            .field("local", &self.local.name())
            .field("shell", &self.shell.as_ref().map(|s| s.name()))
            .finish()
    }
}

impl Persistence {
    pub fn new(local: Box<dyn TaskStore>, shell: Option<Box<dyn TaskStore>>) -> Self {
        Self { local, shell }
    }

    /// Load the state to start with.
    ///
    /// The shell file wins when it holds at least one task, then the local store. Failures
    /// are logged and skipped, so the result is at worst an empty default.
    pub fn load_initial(&self) -> SavedState {
        let from_shell = self.shell.as_deref().and_then(try_load);
        let state = from_shell
            .filter(|state| !state.tasks.is_empty())
            .or_else(|| try_load(self.local.as_ref()).filter(|state| !state.tasks.is_empty()))
            .unwrap_or_default();
        SavedState {
            auto_save_interval: clamp_interval(state.auto_save_interval),
            ..state
        }
    }

    /// Write `state` to every sink independently. Failures are logged and dropped.
    pub fn save_all(&self, state: &SavedState) {
        try_save(self.local.as_ref(), state);
        if let Some(shell) = self.shell.as_deref() {
            try_save(shell, state);
        }
    }
}

fn try_load(store: &dyn TaskStore) -> Option<SavedState> {
    match store.load() {
        Ok(state) => state,
        Err(e) => {
            tracing::warn!(store = store.name(), error = %e, "ignoring unreadable saved tasks");
            None
        }
    }
}

fn try_save(store: &dyn TaskStore, state: &SavedState) {
    match store.save(state) {
        Ok(()) => tracing::debug!(store = store.name(), count = state.tasks.len(), "saved tasks"),
        Err(e) => tracing::warn!(store = store.name(), error = %e, "failed to save tasks"),
    }
}
