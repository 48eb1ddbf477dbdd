use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Where a plugin came from and which compiled-in factory builds it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct PluginSource {
    pub location: String,
    pub entry: String,
}

impl PluginSource {
    pub fn new(location: impl Into<String>, entry: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            entry: entry.into(),
        }
    }

    pub fn manifest(path: &Path, entry: impl Into<String>) -> Self {
        Self::new(path.display().to_string(), entry)
    }

    pub fn builtin(entry: &str) -> Self {
        Self::new(format!("builtin://{entry}"), entry)
    }
}

impl fmt::Display for PluginSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.location, self.entry)
    }
}

/// Immutable metadata of one installed panel.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PluginDescriptor {
    pub name: String,
    pub source: PluginSource,
    pub description: String,
    pub category: String,
    pub load_order: i64,
    pub author: Option<String>,
}

impl PluginDescriptor {
    pub fn new(
        name: impl Into<String>,
        source: PluginSource,
        description: impl Into<String>,
        category: impl Into<String>,
        load_order: i64,
    ) -> Self {
        Self {
            name: name.into(),
            source,
            description: description.into(),
            category: category.into(),
            load_order,
            author: None,
        }
    }

    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }
}

/// Raw `manifest.json` contents. Every field is optional on disk;
/// [`PluginManifest::into_descriptor`] decides whether the plugin is usable.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PluginManifest {
    pub description: Option<String>,
    pub category: Option<String>,
    pub load_order: Option<i64>,
    pub author: Option<String>,
    pub entry: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("manifest is missing {}", missing.join(", "))]
pub struct IncompleteManifest {
    pub missing: Vec<&'static str>,
}

impl PluginManifest {
    /// Promote a complete manifest found at `path` into a descriptor named
    /// `name`. A manifest without `entry` selects the factory of the same
    /// name as the plugin.
    pub fn into_descriptor(
        self,
        name: &str,
        path: &Path,
    ) -> Result<PluginDescriptor, IncompleteManifest> {
        match (self.description, self.category, self.load_order) {
            (Some(description), Some(category), Some(load_order)) => {
                let entry = self.entry.unwrap_or_else(|| name.to_string());
                Ok(PluginDescriptor {
                    name: name.to_string(),
                    source: PluginSource::manifest(path, entry),
                    description,
                    category,
                    load_order,
                    author: self.author,
                })
            }
            (description, category, load_order) => {
                let missing = [
                    ("description", description.is_none()),
                    ("category", category.is_none()),
                    ("load_order", load_order.is_none()),
                ]
                .into_iter()
                .filter_map(|(field, absent)| absent.then_some(field))
                .collect();
                Err(IncompleteManifest { missing })
            }
        }
    }
}
