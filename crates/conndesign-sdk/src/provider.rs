use std::collections::BTreeMap;
use std::fmt;

use conndesign_render::DisplayUnit;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Category (e.g. `"W-Shapes"`) to the ordered item names it contains.
pub type Catalog = BTreeMap<String, Vec<String>>;

/// Result items keyed by their semantic name, e.g. `"Hole diameter"`.
pub type DerivedResult = BTreeMap<String, ResultEntry>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultEntry {
    pub content: String,
}

impl ResultEntry {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
        }
    }
}

/// One value of a section property row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Number(f64),
    Text(String),
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Number(value) => write!(f, "{value}"),
            CellValue::Text(value) => f.write_str(value),
        }
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Number(value)
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnitSystem {
    #[serde(rename = "Imperial Units")]
    Imperial,
    #[serde(rename = "Metric Units")]
    Metric,
}

impl UnitSystem {
    pub const ALL: [UnitSystem; 2] = [UnitSystem::Imperial, UnitSystem::Metric];

    pub fn label(self) -> &'static str {
        match self {
            UnitSystem::Imperial => "Imperial Units",
            UnitSystem::Metric => "Metric Units",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|unit| unit.label() == label)
    }

    pub fn display_unit(self) -> DisplayUnit {
        match self {
            UnitSystem::Imperial => DisplayUnit::Inch,
            UnitSystem::Metric => DisplayUnit::Millimetre,
        }
    }
}

impl fmt::Display for UnitSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProviderError {
    #[error("unknown design code `{0}`")]
    UnknownDesignCode(String),
    #[error("design code `{design_code}` has no category `{category}`")]
    UnknownCategory {
        design_code: String,
        category: String,
    },
    #[error("`{item}` is not listed under {category} for {design_code}")]
    UnknownItem {
        design_code: String,
        category: String,
        item: String,
    },
    #[error("no result for {0}")]
    NoMatch(String),
    #[error("malformed provider data: {0}")]
    Malformed(String),
}

/// The external engineering engine.
///
/// Calls are synchronous and side-effect free, and may fail for
/// combinations the engine does not recognise. Implementations are shared
/// with background compute workers, hence `Send + Sync`.
pub trait ComputationProvider: Send + Sync {
    fn list_catalog_names(&self, design_code: &str) -> Result<Catalog, ProviderError>;

    fn compute_section_values(
        &self,
        design_code: &str,
        category: &str,
        item: &str,
    ) -> Result<Vec<CellValue>, ProviderError>;

    fn compute_hole_info(
        &self,
        design_code: &str,
        unit_system: UnitSystem,
        diameter: f64,
        hole_type: &str,
    ) -> Result<DerivedResult, ProviderError>;
}
