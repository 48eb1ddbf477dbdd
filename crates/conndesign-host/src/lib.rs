//! Plugin lifecycle and panel control for ConnDesign.
//!
//! [`PluginRegistry`] discovers plugins, keeps them in load order and builds
//! one [`PanelController`] per plugin on first activation. A controller
//! routes field events into its panel's selection graph and keeps the most
//! recent rendered document, computing through a [`Dispatcher`].

mod controller;
mod dispatch;
mod error;
mod registry;
mod settings;

pub use controller::{ControllerStatus, PanelController, SharedController};
pub use dispatch::{Completed, Dispatcher, InlineDispatcher, WorkerDispatcher};
pub use error::{LoadError, RegistryError, SettingsError};
pub use registry::{ActivationOptions, PluginRegistry};
pub use settings::{settings_path, HostSettings};
