use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::SettingsError;

/// Persisted host settings stored on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HostSettings {
    /// Directories scanned for plugin subdirectories, in priority order.
    pub plugin_roots: Vec<PathBuf>,
    /// Catalog file for the JSON provider. `None` uses the bundled tables.
    pub catalog_path: Option<PathBuf>,
    /// Return graph errors from field events instead of logging them.
    pub strict_field_events: bool,
    /// Run computations on a background worker thread.
    pub background_compute: bool,
}

impl Default for HostSettings {
    fn default() -> Self {
        Self {
            plugin_roots: default_plugin_root().into_iter().collect(),
            catalog_path: None,
            strict_field_events: cfg!(debug_assertions),
            background_compute: false,
        }
    }
}

fn default_plugin_root() -> Option<PathBuf> {
    let mut base = dirs::data_dir()?;
    base.push("ConnDesign");
    base.push("plugins");
    Some(base)
}

/// `<config dir>/ConnDesign/host.json`, if the platform has a config dir.
pub fn settings_path() -> Option<PathBuf> {
    let mut base = dirs::config_dir()?;
    base.push("ConnDesign");
    base.push("host.json");
    Some(base)
}

impl HostSettings {
    /// Load settings from the default location. Returns defaults if loading
    /// fails.
    pub fn load() -> Self {
        let Some(path) = settings_path() else {
            return Self::default();
        };
        if !path.exists() {
            return Self::default();
        }
        match Self::load_from(&path) {
            Ok(settings) => settings,
            Err(err) => {
                tracing::warn!(%err, "failed to read host settings, using defaults");
                Self::default()
            }
        }
    }

    pub fn load_from(path: &Path) -> Result<Self, SettingsError> {
        let raw = fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Save settings to the default location.
    pub fn save(&self) -> Result<(), SettingsError> {
        let path = settings_path().ok_or(SettingsError::NoConfigDir)?;
        self.save_to(&path)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), SettingsError> {
        let io_error = |source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(io_error)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).map_err(io_error)
    }
}
