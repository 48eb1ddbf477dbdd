//! Where compute jobs run.
//!
//! A dispatcher accepts jobs tagged with a generation and hands back
//! [`Completed`] results. It makes no ordering promises beyond "every job it
//! runs reports exactly once"; the controller decides which results are
//! current.

use std::collections::VecDeque;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use conndesign_render::Document;
use conndesign_sdk::{ComputationProvider, ComputeError, ComputeJob};
use crossbeam_channel::{unbounded, Receiver, Sender};
use tracing::trace;

/// Outcome of one dispatched job.
#[derive(Debug)]
pub struct Completed {
    pub generation: u64,
    pub outcome: Result<Document, ComputeError>,
}

pub trait Dispatcher: Send {
    fn dispatch(&mut self, generation: u64, job: Box<dyn ComputeJob>);

    /// Next finished result, if one is ready.
    fn try_recv(&mut self) -> Option<Completed>;

    /// Block until a result is ready. `None` once nothing can arrive.
    fn recv(&mut self) -> Option<Completed>;
}

/// Runs each job on the calling thread before `dispatch` returns.
pub struct InlineDispatcher {
    provider: Arc<dyn ComputationProvider>,
    finished: VecDeque<Completed>,
}

impl InlineDispatcher {
    pub fn new(provider: Arc<dyn ComputationProvider>) -> Self {
        Self {
            provider,
            finished: VecDeque::new(),
        }
    }
}

impl Dispatcher for InlineDispatcher {
    fn dispatch(&mut self, generation: u64, job: Box<dyn ComputeJob>) {
        let outcome = job.run(self.provider.as_ref());
        self.finished.push_back(Completed {
            generation,
            outcome,
        });
    }

    fn try_recv(&mut self) -> Option<Completed> {
        self.finished.pop_front()
    }

    fn recv(&mut self) -> Option<Completed> {
        self.finished.pop_front()
    }
}

type Queued = (u64, Box<dyn ComputeJob>);

/// Runs jobs on a dedicated background thread.
///
/// When several jobs are queued by the time the worker is free, only the
/// newest runs; the ones it replaces never report.
pub struct WorkerDispatcher {
    jobs: Option<Sender<Queued>>,
    results: Receiver<Completed>,
    worker: Option<JoinHandle<()>>,
}

impl WorkerDispatcher {
    pub fn spawn(
        name: &str,
        provider: Arc<dyn ComputationProvider>,
    ) -> Result<Self, std::io::Error> {
        let (job_tx, job_rx) = unbounded::<Queued>();
        let (result_tx, result_rx) = unbounded();
        let worker = thread::Builder::new()
            .name(format!("conndesign-compute-{name}"))
            .spawn(move || run_worker(job_rx, result_tx, provider))?;
        Ok(Self {
            jobs: Some(job_tx),
            results: result_rx,
            worker: Some(worker),
        })
    }
}

fn run_worker(
    jobs: Receiver<Queued>,
    results: Sender<Completed>,
    provider: Arc<dyn ComputationProvider>,
) {
    while let Ok(mut queued) = jobs.recv() {
        while let Ok(newer) = jobs.try_recv() {
            trace!(superseded = queued.0, by = newer.0, "skipping superseded job");
            queued = newer;
        }
        let (generation, job) = queued;
        let outcome = job.run(provider.as_ref());
        if results
            .send(Completed {
                generation,
                outcome,
            })
            .is_err()
        {
            break;
        }
    }
}

impl Dispatcher for WorkerDispatcher {
    fn dispatch(&mut self, generation: u64, job: Box<dyn ComputeJob>) {
        if let Some(jobs) = &self.jobs {
            if jobs.send((generation, job)).is_err() {
                tracing::warn!(generation, "compute worker has stopped, job dropped");
            }
        }
    }

    fn try_recv(&mut self) -> Option<Completed> {
        self.results.try_recv().ok()
    }

    fn recv(&mut self) -> Option<Completed> {
        self.results.recv().ok()
    }
}

impl Drop for WorkerDispatcher {
    fn drop(&mut self) {
        self.jobs.take();
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}
