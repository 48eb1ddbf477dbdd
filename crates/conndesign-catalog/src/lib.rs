//! A [`ComputationProvider`] answered from tables in a JSON document.
//!
//! The document has three tables:
//!
//! * `catalogs`: design code, then category, then the ordered item names;
//! * `sections`: design code, then category, then item, then the property
//!   row;
//! * `holes`: a list of rows matching design codes, unit system, nominal
//!   diameter and hole type to a result map.
//!
//! A copy covering the stock panels is compiled in, see
//! [`JsonCatalogProvider::bundled`].

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use conndesign_sdk::{
    Catalog, CellValue, ComputationProvider, DerivedResult, ProviderError, ResultEntry,
    UnitSystem,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

const BUNDLED: &str = include_str!("../data/aisc.json");

/// Nominal diameters closer than this are the same size.
const DIAMETER_TOLERANCE: f64 = 1e-6;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse catalog: {0}")]
    Parse(#[from] serde_json::Error),
}

type SectionTable = BTreeMap<String, BTreeMap<String, BTreeMap<String, Vec<CellValue>>>>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HoleRow {
    pub design_codes: Vec<String>,
    pub unit: UnitSystem,
    pub diameter: f64,
    pub hole_type: String,
    pub results: BTreeMap<String, String>,
}

impl HoleRow {
    fn matches(&self, design_code: &str, unit: UnitSystem, diameter: f64, hole_type: &str) -> bool {
        self.unit == unit
            && self.hole_type == hole_type
            && (self.diameter - diameter).abs() < DIAMETER_TOLERANCE
            && self.design_codes.iter().any(|code| code == design_code)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JsonCatalogProvider {
    #[serde(default)]
    catalogs: BTreeMap<String, Catalog>,
    #[serde(default)]
    sections: SectionTable,
    #[serde(default)]
    holes: Vec<HoleRow>,
}

impl JsonCatalogProvider {
    pub fn from_json(raw: &str) -> Result<Self, CatalogError> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn open(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| CatalogError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let provider = Self::from_json(&raw)?;
        debug!(
            path = %path.display(),
            design_codes = provider.catalogs.len(),
            holes = provider.holes.len(),
            "loaded catalog"
        );
        Ok(provider)
    }

    /// The compiled-in AISC tables.
    pub fn bundled() -> Result<Self, CatalogError> {
        Self::from_json(BUNDLED)
    }

    pub fn design_codes(&self) -> impl Iterator<Item = &str> {
        self.catalogs.keys().map(String::as_str)
    }
}

impl ComputationProvider for JsonCatalogProvider {
    fn list_catalog_names(&self, design_code: &str) -> Result<Catalog, ProviderError> {
        self.catalogs
            .get(design_code)
            .cloned()
            .ok_or_else(|| ProviderError::UnknownDesignCode(design_code.to_string()))
    }

    fn compute_section_values(
        &self,
        design_code: &str,
        category: &str,
        item: &str,
    ) -> Result<Vec<CellValue>, ProviderError> {
        let categories = self
            .sections
            .get(design_code)
            .ok_or_else(|| ProviderError::UnknownDesignCode(design_code.to_string()))?;
        let items = categories
            .get(category)
            .ok_or_else(|| ProviderError::UnknownCategory {
                design_code: design_code.to_string(),
                category: category.to_string(),
            })?;
        items
            .get(item)
            .cloned()
            .ok_or_else(|| ProviderError::UnknownItem {
                design_code: design_code.to_string(),
                category: category.to_string(),
                item: item.to_string(),
            })
    }

    fn compute_hole_info(
        &self,
        design_code: &str,
        unit_system: UnitSystem,
        diameter: f64,
        hole_type: &str,
    ) -> Result<DerivedResult, ProviderError> {
        let row = self
            .holes
            .iter()
            .find(|row| row.matches(design_code, unit_system, diameter, hole_type))
            .ok_or_else(|| {
                ProviderError::NoMatch(format!(
                    "{hole_type} hole for {diameter} ({unit_system}, {design_code})"
                ))
            })?;
        Ok(row
            .results
            .iter()
            .map(|(name, content)| (name.clone(), ResultEntry::new(content.as_str())))
            .collect())
    }
}
