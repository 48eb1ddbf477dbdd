use std::sync::Arc;

use conndesign_render::Document;
use conndesign_sdk::{FieldChange, GraphError, Panel, SelectionGraph};
use parking_lot::Mutex;
use tracing::{debug, trace, warn};

use crate::dispatch::{Completed, Dispatcher};

/// Controller handle shared between the registry and the shell.
pub type SharedController = Arc<Mutex<PanelController>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerStatus {
    /// The cached document reflects the latest dispatched job, or nothing was
    /// dispatched yet.
    Ready,
    /// A job is in flight. The cached document is either from an older
    /// selection or a pending placeholder.
    Pending,
}

/// Owns one panel and the document last rendered for it.
pub struct PanelController {
    name: String,
    panel: Box<dyn Panel>,
    dispatcher: Box<dyn Dispatcher>,
    document: Document,
    status: ControllerStatus,
    generation: u64,
    strict: bool,
}

impl PanelController {
    /// Wrap `panel`, computing right away when its default selection is
    /// already complete.
    pub fn new(
        name: impl Into<String>,
        panel: Box<dyn Panel>,
        dispatcher: Box<dyn Dispatcher>,
        strict: bool,
    ) -> Self {
        let document = Document::initial(panel.title());
        let mut controller = Self {
            name: name.into(),
            panel,
            dispatcher,
            document,
            status: ControllerStatus::Ready,
            generation: 0,
            strict,
        };
        if controller.panel.graph().is_complete() {
            controller.recompute();
        }
        controller
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn title(&self) -> &str {
        self.panel.title()
    }

    pub fn graph(&self) -> &SelectionGraph {
        self.panel.graph()
    }

    pub fn current_document(&self) -> &Document {
        &self.document
    }

    pub fn status(&self) -> ControllerStatus {
        self.status
    }

    /// Generation of the most recently dispatched job.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Apply a field event and, when the selection is complete afterwards,
    /// dispatch a recomputation.
    ///
    /// In lenient mode graph errors are logged and reported as an empty
    /// change.
    pub fn on_field_changed(&mut self, name: &str, value: &str) -> Result<FieldChange, GraphError> {
        let change = match self.panel.set_field(name, value) {
            Ok(change) => change,
            Err(err) if self.strict => return Err(err),
            Err(err) => {
                warn!(panel = %self.name, %err, "ignoring field event");
                return Ok(FieldChange::default());
            }
        };
        if change.is_noop() {
            trace!(panel = %self.name, field = name, "field unchanged");
            return Ok(change);
        }
        debug!(
            panel = %self.name,
            field = name,
            recomputed = change.recomputed.len(),
            cleared = change.cleared.len(),
            "field changed"
        );
        if self.panel.graph().is_complete() {
            self.recompute();
        }
        Ok(change)
    }

    /// Apply every result that is already available. Returns true when the
    /// cached document changed.
    pub fn poll(&mut self) -> bool {
        let mut updated = false;
        while let Some(completed) = self.dispatcher.try_recv() {
            updated |= self.apply(completed);
        }
        updated
    }

    /// Block until the latest dispatched job has been applied.
    pub fn wait_idle(&mut self) {
        while self.status == ControllerStatus::Pending {
            match self.dispatcher.recv() {
                Some(completed) => {
                    self.apply(completed);
                }
                None => {
                    warn!(panel = %self.name, "compute dispatcher closed while pending");
                    self.status = ControllerStatus::Ready;
                }
            }
        }
    }

    fn recompute(&mut self) {
        self.generation += 1;
        self.status = ControllerStatus::Pending;
        if self.document.placeholder_kind().is_some() {
            self.document = Document::pending(self.panel.title());
        }
        let job = self.panel.compute_job();
        self.dispatcher.dispatch(self.generation, job);
        self.poll();
    }

    fn apply(&mut self, completed: Completed) -> bool {
        if completed.generation != self.generation {
            debug!(
                panel = %self.name,
                stale = completed.generation,
                latest = self.generation,
                "discarding stale result"
            );
            return false;
        }
        self.document = match completed.outcome {
            Ok(document) => document,
            Err(err) => {
                warn!(panel = %self.name, %err, "computation unavailable");
                Document::unavailable(self.panel.title(), err.to_string())
            }
        };
        self.status = ControllerStatus::Ready;
        true
    }
}
