//! ConnDesign Panel SDK
//! ====================
//!
//! Building blocks for ConnDesign tool panels. A panel is a
//! [`SelectionGraph`] of dependent dropdown fields plus a compute step that
//! turns a complete selection into a rendered
//! [`Document`](conndesign_render::Document) with the help of a
//! [`ComputationProvider`].
//!
//! Panels are compiled in and registered through a [`PluginModule`] of
//! [`PanelFactory`] implementations; plugin manifests only select a factory by
//! its entry key.

mod catalog;
mod fields;
mod graph;
mod provider;
mod registry;

pub use catalog::{CatalogValues, DesignCodeAliases};
pub use fields::{FieldDefinition, FieldId, KeyedValues, Selection, StaticValues, ValueSource};
pub use graph::{Field, FieldChange, GraphError, SelectionGraph, SelectionGraphBuilder};
pub use provider::{
    Catalog, CellValue, ComputationProvider, DerivedResult, ProviderError, ResultEntry,
    UnitSystem,
};
pub use registry::{ComputeError, ComputeJob, Panel, PanelError, PanelFactory, PluginModule};

/// Common imports for panel authors.
pub mod prelude {
    pub use crate::{
        CatalogValues, ComputationProvider, ComputeError, ComputeJob, DesignCodeAliases,
        FieldDefinition, KeyedValues, Panel, PanelError, PanelFactory, PluginModule, Selection,
        SelectionGraph, StaticValues, UnitSystem,
    };
    pub use conndesign_render::Document;
}

/// Build a [`PluginModule`] from one or more [`PanelFactory`] expressions.
///
/// ```ignore
/// let module = conndesign_sdk::panel_module!(MemberPropertyFactory, HoleDimensionFactory);
/// ```
#[macro_export]
macro_rules! panel_module {
    ($($factory:expr),+ $(,)?) => {{
        let mut module = $crate::PluginModule::new();
        $(module.register_factory(Box::new($factory));)+
        module
    }};
}
