use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::{IncompleteManifest, PluginDescriptor, PluginManifest};

pub const MANIFEST_FILE: &str = "manifest.json";

#[derive(Debug, thiserror::Error)]
pub enum ProbeError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid manifest {path}: {source}")]
    Manifest {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error(transparent)]
    Incomplete(#[from] IncompleteManifest),
}

pub trait PluginProber {
    /// Inspect one plugin directory. `Ok(None)` means the directory is not a
    /// plugin at all.
    fn probe(&self, dir: &Path) -> Result<Option<PluginDescriptor>, ProbeError>;
}

/// Reads `<dir>/manifest.json` and names the plugin after `dir`.
#[derive(Debug, Default)]
pub struct ManifestProber;

impl PluginProber for ManifestProber {
    fn probe(&self, dir: &Path) -> Result<Option<PluginDescriptor>, ProbeError> {
        let path = dir.join(MANIFEST_FILE);
        if !path.is_file() {
            return Ok(None);
        }
        let raw = fs::read_to_string(&path).map_err(|source| ProbeError::Io {
            path: path.clone(),
            source,
        })?;
        let manifest: PluginManifest =
            serde_json::from_str(&raw).map_err(|source| ProbeError::Manifest {
                path: path.clone(),
                source,
            })?;
        let name = dir
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| dir.display().to_string());
        Ok(Some(manifest.into_descriptor(&name, &path)?))
    }
}

/// A plugin directory that was found but left out of the result.
#[derive(Debug)]
pub struct Exclusion {
    pub dir: PathBuf,
    pub error: ProbeError,
}

#[derive(Debug, Default)]
pub struct ScanReport {
    pub descriptors: Vec<PluginDescriptor>,
    pub excluded: Vec<Exclusion>,
}

impl ScanReport {
    pub fn into_descriptors(self) -> Vec<PluginDescriptor> {
        self.descriptors
    }
}

/// Probe every immediate subdirectory of each root.
///
/// Roots are visited in the order given and subdirectories in file-name
/// order, which fixes the discovery order that ties in `load_order` fall
/// back to. Missing roots are skipped.
pub fn scan_plugins<P: PluginProber>(roots: &[PathBuf], prober: &P) -> ScanReport {
    let mut found = Vec::new();
    let mut excluded = Vec::new();

    for root in roots {
        if !root.exists() {
            debug!(root = %root.display(), "plugin root does not exist");
            continue;
        }
        let walker = WalkDir::new(root)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter();
        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    if let Some(io) = err.io_error() {
                        debug!("skipping entry while scanning {}: {}", root.display(), io);
                    }
                    continue;
                }
            };
            if !entry.file_type().is_dir() {
                continue;
            }
            match prober.probe(entry.path()) {
                Ok(Some(descriptor)) => found.push(descriptor),
                Ok(None) => {}
                Err(error @ ProbeError::Incomplete(_)) => {
                    debug!(dir = %entry.path().display(), %error, "excluding plugin");
                    excluded.push(Exclusion {
                        dir: entry.path().to_path_buf(),
                        error,
                    });
                }
                Err(error) => {
                    warn!(dir = %entry.path().display(), %error, "excluding plugin");
                    excluded.push(Exclusion {
                        dir: entry.path().to_path_buf(),
                        error,
                    });
                }
            }
        }
    }

    ScanReport {
        descriptors: arrange_descriptors(found),
        excluded,
    }
}

/// Drop repeated names (the first one discovered wins) and stable-sort by
/// `load_order`.
pub fn arrange_descriptors(descriptors: Vec<PluginDescriptor>) -> Vec<PluginDescriptor> {
    let mut seen = HashSet::new();
    let mut arranged: Vec<PluginDescriptor> = descriptors
        .into_iter()
        .filter(|descriptor| {
            let fresh = seen.insert(descriptor.name.clone());
            if !fresh {
                warn!(
                    name = %descriptor.name,
                    source = %descriptor.source,
                    "duplicate plugin name ignored"
                );
            }
            fresh
        })
        .collect();
    arranged.sort_by_key(|descriptor| descriptor.load_order);
    arranged
}
