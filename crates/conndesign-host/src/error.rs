use std::path::PathBuf;

use conndesign_sdk::PanelError;
use thiserror::Error;

/// Errors surfaced by [`PluginRegistry`](crate::PluginRegistry) to the shell.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("no plugin named `{0}` was discovered")]
    UnknownPlugin(String),
    #[error("failed to load plugin `{name}`: {source}")]
    PluginLoad {
        name: String,
        #[source]
        source: LoadError,
    },
}

/// Why constructing a controller for a known plugin failed.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("no compiled-in panel provides entry `{0}`")]
    UnknownEntry(String),
    #[error(transparent)]
    Panel(#[from] PanelError),
    #[error("failed to start compute worker: {0}")]
    Worker(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to access settings at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse settings: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("no configuration directory on this platform")]
    NoConfigDir,
}
