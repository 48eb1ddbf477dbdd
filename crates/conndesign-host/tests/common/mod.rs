#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use conndesign_host::{Completed, Dispatcher};
use conndesign_render::{tabulate, Document};
use conndesign_sdk::prelude::*;
use conndesign_sdk::{Catalog, CellValue, DerivedResult, ProviderError};
use parking_lot::Mutex;

pub const REGION: &str = "region";
pub const CITY: &str = "city";
pub const STREET: &str = "street";

/// Provider that knows nothing; the chain panel never calls it.
pub struct NullProvider;

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
        Err(ProviderError::NoMatch("sections".into()))
    }

    fn compute_hole_info(
        &self,
        _: &str,
        _: UnitSystem,
        _: f64,
        _: &str,
    ) -> Result<DerivedResult, ProviderError> {
        Err(ProviderError::NoMatch("holes".into()))
    }
}

/// Three-level cascade: region, then city, then street.
pub struct ChainPanel {
    graph: SelectionGraph,
}

impl ChainPanel {
    pub fn new() -> Self {
        let cities = KeyedValues::new(REGION)
            .with_entry("north", ["Oslo", "Bergen"])
            .with_entry("south", ["Rome", "Milan"]);
        let streets = KeyedValues::new(CITY)
            .with_entry("Oslo", ["Main"])
            .with_entry("Bergen", ["Harbour"])
            .with_entry("Rome", ["Via"])
            .with_entry("Milan", ["Corso"]);
        let graph = SelectionGraph::builder()
            .field(FieldDefinition::new(
                REGION,
                "Region",
                StaticValues::new(["north", "south"]),
            ))
            .field(FieldDefinition::new(CITY, "City", cities).depends_on(REGION))
            .field(FieldDefinition::new(STREET, "Street", streets).depends_on(CITY))
            .build()
            .unwrap();
        Self { graph }
    }
}

impl Panel for ChainPanel {
    fn title(&self) -> &str {
        "Chain"
    }

    fn graph(&self) -> &SelectionGraph {
        &self.graph
    }

    fn graph_mut(&mut self) -> &mut SelectionGraph {
        &mut self.graph
    }

    fn compute_job(&self) -> Box<dyn ComputeJob> {
        let selection = self.graph.selection();
        let path = [REGION, CITY, STREET]
            .map(|field| selection.get(field).unwrap_or_default().to_string())
            .join("/");
        Box::new(ChainJob(path))
    }
}

pub struct ChainJob(pub String);

impl ComputeJob for ChainJob {
    fn run(self: Box<Self>, _: &dyn ComputationProvider) -> Result<Document, ComputeError> {
        if self.0.ends_with("Corso") {
            return Err(ProviderError::NoMatch(self.0).into());
        }
        Ok(Document::table("Chain", tabulate(&["path"], &[self.0])))
    }
}

/// The `path` cell of a chain document.
pub fn chain_path(document: &Document) -> Option<String> {
    match &document.body {
        conndesign_render::DocumentBody::Table(table) => {
            table.rows.first().map(|row| row.left_value.clone())
        }
        _ => None,
    }
}

/// Factory that counts constructions and can fail or stall on demand.
#[derive(Clone, Default)]
pub struct CountingFactory {
    pub creates: Arc<AtomicUsize>,
    pub fail_next: Arc<AtomicBool>,
    pub delay: Option<Duration>,
}

impl CountingFactory {
    pub fn creates(&self) -> usize {
        self.creates.load(Ordering::SeqCst)
    }
}

impl PanelFactory for CountingFactory {
    fn entry(&self) -> &'static str {
        "chain"
    }

    fn create(&self, _provider: &dyn ComputationProvider) -> Result<Box<dyn Panel>, PanelError> {
        self.creates.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            thread::sleep(delay);
        }
        if self.fail_next.swap(false, Ordering::SeqCst) {
            return Err(ProviderError::Malformed("catalog unavailable".into()).into());
        }
        Ok(Box::new(ChainPanel::new()))
    }
}

type Queue = Arc<Mutex<Vec<(u64, Box<dyn ComputeJob>)>>>;

/// Dispatcher whose jobs only run when the test says so.
pub struct ManualDispatcher {
    queued: Queue,
    finished: Arc<Mutex<VecDeque<Completed>>>,
}

#[derive(Clone)]
pub struct ManualHandle {
    queued: Queue,
    finished: Arc<Mutex<VecDeque<Completed>>>,
}

pub fn manual_dispatcher() -> (ManualDispatcher, ManualHandle) {
    let queued: Queue = Arc::default();
    let finished = Arc::new(Mutex::new(VecDeque::new()));
    (
        ManualDispatcher {
            queued: Arc::clone(&queued),
            finished: Arc::clone(&finished),
        },
        ManualHandle { queued, finished },
    )
}

impl ManualHandle {
    pub fn queued_generations(&self) -> Vec<u64> {
        self.queued.lock().iter().map(|(generation, _)| *generation).collect()
    }

    /// Run the job dispatched as `generation` and queue its result.
    pub fn finish(&self, generation: u64) {
        let job = {
            let mut queued = self.queued.lock();
            let index = queued
                .iter()
                .position(|(queued, _)| *queued == generation)
                .unwrap();
            queued.remove(index).1
        };
        let outcome = job.run(&NullProvider);
        self.finished.lock().push_back(Completed {
            generation,
            outcome,
        });
    }
}

impl Dispatcher for ManualDispatcher {
    fn dispatch(&mut self, generation: u64, job: Box<dyn ComputeJob>) {
        self.queued.lock().push((generation, job));
    }

    fn try_recv(&mut self) -> Option<Completed> {
        self.finished.lock().pop_front()
    }

    fn recv(&mut self) -> Option<Completed> {
        self.finished.lock().pop_front()
    }
}
