use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use conndesign_catalog::JsonCatalogProvider;
use conndesign_host::{
    settings_path, ActivationOptions, HostSettings, PanelController, PluginRegistry,
};
use conndesign_panels::stock_module;
use conndesign_plugin_db::{scan_plugins, stock_panels, ManifestProber};
use conndesign_sdk::ComputationProvider;

/// Host settings after command-line overrides.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellOptions {
    pub plugin_roots: Vec<PathBuf>,
    pub catalog: Option<PathBuf>,
    pub activation: ActivationOptions,
}

impl From<&HostSettings> for ShellOptions {
    fn from(settings: &HostSettings) -> Self {
        Self {
            plugin_roots: settings.plugin_roots.clone(),
            catalog: settings.catalog_path.clone(),
            activation: ActivationOptions::from(settings),
        }
    }
}

pub fn open_provider(catalog: Option<&Path>) -> Result<Arc<dyn ComputationProvider>> {
    let provider = match catalog {
        Some(path) => JsonCatalogProvider::open(path)
            .with_context(|| format!("failed to open catalog {}", path.display()))?,
        None => JsonCatalogProvider::bundled().context("bundled catalog is corrupt")?,
    };
    Ok(Arc::new(provider))
}

/// Build the registry from the configured plugin roots. When the roots hold
/// no usable manifests the stock panels are registered instead.
pub fn open_registry(options: &ShellOptions) -> Result<PluginRegistry> {
    let provider = open_provider(options.catalog.as_deref())?;
    let module = Arc::new(stock_module());
    let report = scan_plugins(&options.plugin_roots, &ManifestProber);
    let registry = if report.descriptors.is_empty() {
        tracing::info!(
            roots = options.plugin_roots.len(),
            "no plugin manifests found, using stock panels"
        );
        PluginRegistry::from_descriptors(stock_panels(), module, provider)
    } else {
        PluginRegistry::from_report(report, module, provider)
    };
    Ok(registry.with_options(options.activation))
}

/// Apply `field=value` assignments in order, then wait for the resulting
/// computation.
pub fn apply_assignments(
    controller: &mut PanelController,
    assignments: &[(String, String)],
) -> Result<()> {
    for (field, value) in assignments {
        controller
            .on_field_changed(field, value)
            .with_context(|| format!("cannot set {field} to `{value}`"))?;
    }
    controller.wait_idle();
    Ok(())
}

/// Write `settings` to `path`, or to the user configuration when `path` is
/// `None`. Returns the file written.
pub fn store_settings(settings: &HostSettings, path: Option<&Path>) -> Result<PathBuf> {
    match path {
        Some(path) => {
            settings
                .save_to(path)
                .with_context(|| format!("failed to save settings to {}", path.display()))?;
            Ok(path.to_path_buf())
        }
        None => {
            settings.save().context("failed to save settings")?;
            settings_path().context("no configuration directory")
        }
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use conndesign_render::DocumentBody;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    use super::*;

    fn options(roots: Vec<PathBuf>) -> ShellOptions {
        ShellOptions {
            plugin_roots: roots,
            catalog: None,
            activation: ActivationOptions {
                strict_field_events: true,
                background_compute: false,
            },
        }
    }

    #[test]
    fn empty_roots_fall_back_to_stock_panels() {
        let dir = tempdir().unwrap();
        let registry = open_registry(&options(vec![dir.path().to_path_buf()])).unwrap();
        let names: Vec<_> = registry
            .descriptors()
            .iter()
            .map(|descriptor| descriptor.name.as_str())
            .collect();
        assert_eq!(names, vec!["member_property", "hole_dimension"]);
    }

    #[test]
    fn manifests_replace_stock_list() {
        let dir = tempdir().unwrap();
        let plugin = dir.path().join("Holes");
        fs::create_dir_all(&plugin).unwrap();
        fs::write(
            plugin.join("manifest.json"),
            r#"{"description": "Holes", "category": "Steel", "load_order": 0, "entry": "hole_dimension"}"#,
        )
        .unwrap();
        let registry = open_registry(&options(vec![dir.path().to_path_buf()])).unwrap();
        assert_eq!(registry.descriptors().len(), 1);
        assert!(registry.activate("Holes").is_ok());
    }

    #[test]
    fn assignments_drive_the_controller() {
        let registry = open_registry(&options(Vec::new())).unwrap();
        let controller = registry.activate("hole_dimension").unwrap();
        let mut controller = controller.lock();
        apply_assignments(
            &mut controller,
            &[
                ("diameter".into(), "3/4 in.".into()),
                ("hole_type".into(), "Long Slot".into()),
            ],
        )
        .unwrap();
        let DocumentBody::Hole(summary) = &controller.current_document().body else {
            panic!("expected a hole summary");
        };
        assert_eq!(summary.dimension, "0.8125 x 1.875");

        let err = apply_assignments(&mut controller, &[("diameter".into(), "9 in.".into())])
            .unwrap_err();
        assert!(err.to_string().contains("diameter"));
    }

    #[test]
    fn stored_settings_load_back() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("conf/host.json");
        let settings = HostSettings {
            plugin_roots: vec![dir.path().join("plugins")],
            catalog_path: None,
            strict_field_events: false,
            background_compute: true,
        };
        let written = store_settings(&settings, Some(&path)).unwrap();
        assert_eq!(written, path);
        assert_eq!(HostSettings::load_from(&path).unwrap(), settings);
    }

    #[test]
    fn missing_catalog_file_is_an_error() {
        let dir = tempdir().unwrap();
        let mut options = options(Vec::new());
        options.catalog = Some(dir.path().join("absent.json"));
        assert!(open_registry(&options).is_err());
    }
}
