use conndesign_render::Document;
use thiserror::Error;

use crate::graph::{FieldChange, GraphError, SelectionGraph};
use crate::provider::{ComputationProvider, ProviderError};

/// Failure while turning a complete selection into a document.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ComputeError {
    #[error(transparent)]
    Provider(#[from] ProviderError),
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("provider result is missing `{0}`")]
    MissingResult(String),
}

/// Failure while constructing a panel.
#[derive(Debug, Error)]
pub enum PanelError {
    #[error("failed to load panel data: {0}")]
    Provider(#[from] ProviderError),
    #[error("invalid field layout: {0}")]
    Graph(#[from] GraphError),
}

/// A unit of work captured from a complete selection.
///
/// Jobs own everything they need, so they can run on a worker thread while
/// the panel keeps accepting field events.
pub trait ComputeJob: Send {
    fn run(self: Box<Self>, provider: &dyn ComputationProvider) -> Result<Document, ComputeError>;
}

/// A tool panel: a graph of dependent fields and a compute step.
pub trait Panel: Send {
    fn title(&self) -> &str;
    fn graph(&self) -> &SelectionGraph;
    fn graph_mut(&mut self) -> &mut SelectionGraph;

    /// Capture the current selection as a job. Only called while
    /// [`SelectionGraph::is_complete`] holds.
    fn compute_job(&self) -> Box<dyn ComputeJob>;

    fn set_field(&mut self, name: &str, value: &str) -> Result<FieldChange, GraphError> {
        self.graph_mut().set_field(name, value)
    }
}

pub trait PanelFactory: Send + Sync {
    /// Key that plugin manifests use to select this factory.
    fn entry(&self) -> &'static str;

    /// Build a fresh panel, performing any one-time setup such as loading
    /// catalogs from `provider`.
    fn create(&self, provider: &dyn ComputationProvider) -> Result<Box<dyn Panel>, PanelError>;
}

#[derive(Default)]
pub struct PluginModule {
    factories: Vec<Box<dyn PanelFactory>>,
}

impl PluginModule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_factory(&mut self, factory: Box<dyn PanelFactory>) -> &mut Self {
        self.factories.push(factory);
        self
    }

    pub fn find(&self, entry: &str) -> Option<&dyn PanelFactory> {
        self.iter().find(|factory| factory.entry() == entry)
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn PanelFactory> {
        self.factories.iter().map(|factory| factory.as_ref())
    }

    pub fn entries(&self) -> Vec<&'static str> {
        self.iter().map(|factory| factory.entry()).collect()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::provider::{Catalog, CellValue, DerivedResult, UnitSystem};
    use crate::{FieldDefinition, StaticValues};

    struct NullProvider;

    impl ComputationProvider for NullProvider {
        fn list_catalog_names(&self, code: &str) -> Result<Catalog, ProviderError> {
            Err(ProviderError::UnknownDesignCode(code.into()))
        }

        fn compute_section_values(
            &self,
            _: &str,
            _: &str,
            _: &str,
        ) -> Result<Vec<CellValue>, ProviderError> {
            Ok(Vec::new())
        }

        fn compute_hole_info(
            &self,
            _: &str,
            _: UnitSystem,
            _: f64,
            _: &str,
        ) -> Result<DerivedResult, ProviderError> {
            Ok(DerivedResult::new())
        }
    }

    struct EchoJob(String);

    impl ComputeJob for EchoJob {
        fn run(
            self: Box<Self>,
            _provider: &dyn ComputationProvider,
        ) -> Result<Document, ComputeError> {
            Ok(Document::initial(self.0))
        }
    }

    struct EchoPanel {
        graph: SelectionGraph,
    }

    impl Panel for EchoPanel {
        fn title(&self) -> &str {
            "Echo"
        }

        fn graph(&self) -> &SelectionGraph {
            &self.graph
        }

        fn graph_mut(&mut self) -> &mut SelectionGraph {
            &mut self.graph
        }

        fn compute_job(&self) -> Box<dyn ComputeJob> {
            let value = self.graph.current_value("word").ok().flatten().unwrap_or_default();
            Box::new(EchoJob(value.to_string()))
        }
    }

    struct EchoFactory;

    impl PanelFactory for EchoFactory {
        fn entry(&self) -> &'static str {
            "echo"
        }

        fn create(
            &self,
            _provider: &dyn ComputationProvider,
        ) -> Result<Box<dyn Panel>, PanelError> {
            let graph = SelectionGraph::builder()
                .field(FieldDefinition::new("word", "Word", StaticValues::new(["hi", "yo"])))
                .build()?;
            Ok(Box::new(EchoPanel { graph }))
        }
    }

    #[test]
    fn module_finds_factories_by_entry() {
        let module = crate::panel_module!(EchoFactory);
        assert_eq!(module.entries(), vec!["echo"]);
        assert!(module.find("missing").is_none());

        let mut panel = module.find("echo").unwrap().create(&NullProvider).unwrap();
        panel.set_field("word", "yo").unwrap();
        let document = panel.compute_job().run(&NullProvider).unwrap();
        assert_eq!(document.title, "yo");
    }
}
