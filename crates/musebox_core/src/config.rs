//! JSON-backed settings store.
//!
//! # Responsibility
//! - Load and persist user-facing settings (currently the reminder
//!   configuration) at a caller-provided path.
//!
//! # Invariants
//! - A missing or unreadable settings file degrades to defaults (logged),
//!   never to an error: settings are best-effort UX state.
//! - Writes are pretty-printed JSON so the file stays hand-inspectable.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::fs;
use std::path::{Path, PathBuf};

use log::warn;
use serde::{Deserialize, Serialize};

use crate::reminder::ReminderSettings;

/// Settings persistence error.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Json(serde_json::Error),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "settings io error: {err}"),
            Self::Json(err) => write!(f, "settings serialization error: {err}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Json(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

/// Persisted application settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppSettings {
    #[serde(default)]
    pub reminder: ReminderSettings,
}

/// File-backed store for [`AppSettings`].
pub struct SettingsStore {
    path: PathBuf,
    settings: AppSettings,
}

impl SettingsStore {
    /// Loads settings from `path`, falling back to defaults when the file
    /// is missing or cannot be parsed.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let settings = match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(settings) => settings,
                Err(err) => {
                    warn!(
                        "event=settings_load module=config status=degraded path={} error={err}",
                        path.display()
                    );
                    AppSettings::default()
                }
            },
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => AppSettings::default(),
            Err(err) => {
                warn!(
                    "event=settings_load module=config status=degraded path={} error={err}",
                    path.display()
                );
                AppSettings::default()
            }
        };

        Self { path, settings }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn reminder(&self) -> &ReminderSettings {
        &self.settings.reminder
    }

    /// Replaces the reminder settings and persists the whole file.
    pub fn set_reminder(&mut self, reminder: ReminderSettings) -> Result<(), ConfigError> {
        self.settings.reminder = reminder;
        self.persist()
    }

    fn persist(&self) -> Result<(), ConfigError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let serialized = serde_json::to_string_pretty(&self.settings)?;
        fs::write(&self.path, serialized)?;
        Ok(())
    }
}
