//! Stock ConnDesign panels.

pub mod dimensions;
pub mod hole_dimension;
pub mod member_property;

pub use dimensions::{parse_diameter, slot_dimensions, DimensionError};
pub use hole_dimension::{HoleDimensionFactory, HoleDimensionPanel};
pub use member_property::{MemberPropertyFactory, MemberPropertyPanel};

use conndesign_sdk::{panel_module, DesignCodeAliases, PluginModule};

/// Supported design codes, oldest first.
pub const DESIGN_CODES: [&str; 3] = ["AISC 13th", "AISC 14th", "AISC 15th"];
pub const DEFAULT_DESIGN_CODE: &str = "AISC 14th";

/// The 13th edition ships no catalog of its own and reuses the 14th's.
pub fn design_code_aliases() -> DesignCodeAliases {
    DesignCodeAliases::new().with_alias("AISC 13th", "AISC 14th")
}

/// Every panel compiled into this crate.
pub fn stock_module() -> PluginModule {
    panel_module!(MemberPropertyFactory, HoleDimensionFactory)
}

#[cfg(test)]
pub(crate) mod testing {
    use conndesign_sdk::{
        Catalog, CellValue, ComputationProvider, DerivedResult, ProviderError, ResultEntry,
        UnitSystem,
    };

    /// Small in-memory provider with one W-shape catalog per non-alias code.
    pub struct TableProvider;

    impl ComputationProvider for TableProvider {
        fn list_catalog_names(&self, design_code: &str) -> Result<Catalog, ProviderError> {
            let w_shapes = match design_code {
                "AISC 14th" => vec!["W44X335", "W44X290"],
                "AISC 15th" => vec!["W40X655", "W44X335"],
                other => return Err(ProviderError::UnknownDesignCode(other.into())),
            };
            Ok(Catalog::from([
                (
                    "W-Shapes".to_string(),
                    w_shapes.into_iter().map(String::from).collect(),
                ),
                ("Angles".to_string(), vec!["L8X8X1-1/8".to_string()]),
                ("Rectangular HSS".to_string(), vec!["HSS20X12X5/8".to_string()]),
            ]))
        }

        fn compute_section_values(
            &self,
            design_code: &str,
            category: &str,
            item: &str,
        ) -> Result<Vec<CellValue>, ProviderError> {
            match item {
                "W44X335" => Ok(vec![98.5.into(), 44.0.into(), "44".into()]),
                "W40X655" => Err(ProviderError::Malformed("row truncated".into())),
                _ => Err(ProviderError::UnknownItem {
                    design_code: design_code.into(),
                    category: category.into(),
                    item: item.into(),
                }),
            }
        }

        fn compute_hole_info(
            &self,
            _design_code: &str,
            unit_system: UnitSystem,
            diameter: f64,
            hole_type: &str,
        ) -> Result<DerivedResult, ProviderError> {
            let content = match (unit_system, hole_type) {
                (UnitSystem::Imperial, "Standard") => format!("{:.4}", diameter + 0.0625),
                (UnitSystem::Imperial, "Short Slot") => {
                    format!("{:.4} x {:.4}", diameter + 0.0625, diameter + 0.25)
                }
                (UnitSystem::Metric, "Long Slot") => {
                    format!("{} x {}", diameter + 2.0, diameter * 2.5)
                }
                (UnitSystem::Imperial, "Long Slot") => "0.6875 x 1.5625 x 2".to_string(),
                _ => return Err(ProviderError::NoMatch(hole_type.into())),
            };
            Ok(DerivedResult::from([
                ("Hole diameter".to_string(), ResultEntry::new(content)),
                (
                    "Hole diameter reference".to_string(),
                    ResultEntry::new("AISC Table J3.3"),
                ),
            ]))
        }
    }
}
