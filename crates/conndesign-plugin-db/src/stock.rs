use crate::{PluginDescriptor, PluginSource};

struct StockPanel {
    entry: &'static str,
    description: &'static str,
    category: &'static str,
    load_order: i64,
}

const STOCK_PANELS: &[StockPanel] = &[
    StockPanel {
        entry: "member_property",
        description: "Member Property",
        category: "Steel",
        load_order: 1,
    },
    StockPanel {
        entry: "hole_dimension",
        description: "Nominal Hole Dimension",
        category: "Steel",
        load_order: 2,
    },
];

pub const STOCK_AUTHOR: &str = "CivilEngrTools.com";

/// Descriptors for the panels that ship with ConnDesign, usable without any
/// manifest on disk.
pub fn stock_panels() -> Vec<PluginDescriptor> {
    STOCK_PANELS
        .iter()
        .map(|panel| {
            PluginDescriptor::new(
                panel.entry,
                PluginSource::builtin(panel.entry),
                panel.description,
                panel.category,
                panel.load_order,
            )
            .with_author(STOCK_AUTHOR)
        })
        .collect()
}
