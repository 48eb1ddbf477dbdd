use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use conndesign_plugin_db::{
    arrange_descriptors, scan_plugins, ManifestProber, PluginDescriptor, ScanReport,
};
use conndesign_sdk::{ComputationProvider, PluginModule};
use once_cell::sync::OnceCell;
use parking_lot::Mutex;
use tracing::{debug, info};

use crate::controller::{PanelController, SharedController};
use crate::dispatch::{Dispatcher, InlineDispatcher, WorkerDispatcher};
use crate::{HostSettings, LoadError, RegistryError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActivationOptions {
    pub strict_field_events: bool,
    pub background_compute: bool,
}

impl Default for ActivationOptions {
    fn default() -> Self {
        Self {
            strict_field_events: cfg!(debug_assertions),
            background_compute: false,
        }
    }
}

impl From<&HostSettings> for ActivationOptions {
    fn from(settings: &HostSettings) -> Self {
        Self {
            strict_field_events: settings.strict_field_events,
            background_compute: settings.background_compute,
        }
    }
}

/// Discovered plugins, in load order, and their lazily built controllers.
///
/// Each name gets at most one controller for the life of the registry.
pub struct PluginRegistry {
    descriptors: Vec<PluginDescriptor>,
    slots: HashMap<String, OnceCell<SharedController>>,
    module: Arc<PluginModule>,
    provider: Arc<dyn ComputationProvider>,
    options: ActivationOptions,
}

impl PluginRegistry {
    /// Scan `roots` for plugin manifests.
    pub fn scan(
        roots: &[PathBuf],
        module: Arc<PluginModule>,
        provider: Arc<dyn ComputationProvider>,
    ) -> Self {
        let report = scan_plugins(roots, &ManifestProber);
        Self::from_report(report, module, provider)
    }

    pub fn from_report(
        report: ScanReport,
        module: Arc<PluginModule>,
        provider: Arc<dyn ComputationProvider>,
    ) -> Self {
        if !report.excluded.is_empty() {
            debug!(excluded = report.excluded.len(), "some plugin directories were skipped");
        }
        Self::build(report.into_descriptors(), module, provider)
    }

    /// Register an explicit descriptor list; order and duplicates are handled
    /// exactly as for a scan.
    pub fn from_descriptors(
        descriptors: Vec<PluginDescriptor>,
        module: Arc<PluginModule>,
        provider: Arc<dyn ComputationProvider>,
    ) -> Self {
        Self::build(arrange_descriptors(descriptors), module, provider)
    }

    fn build(
        descriptors: Vec<PluginDescriptor>,
        module: Arc<PluginModule>,
        provider: Arc<dyn ComputationProvider>,
    ) -> Self {
        let slots = descriptors
            .iter()
            .map(|descriptor| (descriptor.name.clone(), OnceCell::new()))
            .collect();
        Self {
            descriptors,
            slots,
            module,
            provider,
            options: ActivationOptions::default(),
        }
    }

    pub fn with_options(mut self, options: ActivationOptions) -> Self {
        self.options = options;
        self
    }

    pub fn descriptors(&self) -> &[PluginDescriptor] {
        &self.descriptors
    }

    pub fn descriptor(&self, name: &str) -> Option<&PluginDescriptor> {
        self.descriptors
            .iter()
            .find(|descriptor| descriptor.name == name)
    }

    pub fn is_active(&self, name: &str) -> bool {
        self.slots
            .get(name)
            .map_or(false, |slot| slot.get().is_some())
    }

    /// The controller for `name`, built on first use.
    ///
    /// Concurrent first calls for one name wait on a single construction. A
    /// failed construction leaves nothing cached, so a later call retries.
    pub fn activate(&self, name: &str) -> Result<SharedController, RegistryError> {
        let slot = self
            .slots
            .get(name)
            .ok_or_else(|| RegistryError::UnknownPlugin(name.to_string()))?;
        slot.get_or_try_init(|| {
            // Slots and descriptors are built from the same list.
            let descriptor = self
                .descriptor(name)
                .ok_or_else(|| RegistryError::UnknownPlugin(name.to_string()))?;
            self.construct(descriptor)
                .map_err(|source| RegistryError::PluginLoad {
                    name: name.to_string(),
                    source,
                })
        })
        .cloned()
    }

    fn construct(&self, descriptor: &PluginDescriptor) -> Result<SharedController, LoadError> {
        let entry = descriptor.source.entry.as_str();
        let factory = self
            .module
            .find(entry)
            .ok_or_else(|| LoadError::UnknownEntry(entry.to_string()))?;
        let panel = factory.create(self.provider.as_ref())?;
        let dispatcher: Box<dyn Dispatcher> = if self.options.background_compute {
            Box::new(WorkerDispatcher::spawn(
                &descriptor.name,
                Arc::clone(&self.provider),
            )?)
        } else {
            Box::new(InlineDispatcher::new(Arc::clone(&self.provider)))
        };
        info!(
            name = %descriptor.name,
            source = %descriptor.source,
            background = self.options.background_compute,
            "activated plugin"
        );
        let controller = PanelController::new(
            descriptor.name.clone(),
            panel,
            dispatcher,
            self.options.strict_field_events,
        );
        Ok(Arc::new(Mutex::new(controller)))
    }
}
