//! Bounded worker pool: one thread per in-flight job, at most `concurrency_limit` at a time.
//!
//! Jobs are launched in order. When the pool is full the dispatcher blocks on the progress
//! state's finished queue, reclaims that worker's slot, then launches the next job. After the
//! last launch every remaining worker is joined and the tally is read from the progress state.

use log::{debug, warn};
use std::collections::HashMap;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crate::engine::invoker::Converter;
use crate::engine::progress::{ProgressSink, ProgressState};
use crate::error::ConversionError;
use crate::{Job, Summary, WorkerId};

/// Message recorded for a worker whose converter panicked.
pub const UNHANDLED_MESSAGE: &str = "Unhandled exception.";

pub struct Dispatcher {
    converter: Arc<dyn Converter>,
    sink: Arc<dyn ProgressSink>,
    concurrency_limit: usize,
}

impl Dispatcher {
    /// `concurrency_limit` is clamped to at least 1.
    pub fn new(
        converter: Arc<dyn Converter>,
        sink: Arc<dyn ProgressSink>,
        concurrency_limit: usize,
    ) -> Self {
        Self {
            converter,
            sink,
            concurrency_limit: concurrency_limit.max(1),
        }
    }

    pub fn concurrency_limit(&self) -> usize {
        self.concurrency_limit
    }

    /// Run every job exactly once and return the final tally.
    pub fn run(&self, jobs: Vec<Job>) -> Summary {
        let state = Arc::new(ProgressState::new(jobs.len(), Arc::clone(&self.sink)));
        let mut live: HashMap<WorkerId, JoinHandle<()>> =
            HashMap::with_capacity(self.concurrency_limit);

        for (id, job) in jobs.into_iter().enumerate() {
            if live.len() >= self.concurrency_limit {
                reclaim_one(&state, &mut live);
            }
            let source = job.source_path.clone();
            match self.spawn_worker(id, job, &state) {
                Ok(handle) => {
                    live.insert(id, handle);
                }
                Err(e) => {
                    // No thread, so nobody will push `id`; account for the job here.
                    warn!("could not start worker {id}: {e}");
                    state.record_error(&source, &format!("could not start worker: {e}"));
                    state.record_completion();
                }
            }
        }

        debug!("All jobs launched; draining {} worker(s)", live.len());
        for (id, handle) in live.drain() {
            join_worker(id, handle);
        }

        state.summary()
    }

    fn spawn_worker(
        &self,
        id: WorkerId,
        job: Job,
        state: &Arc<ProgressState>,
    ) -> std::io::Result<JoinHandle<()>> {
        let converter = Arc::clone(&self.converter);
        let state = Arc::clone(state);
        debug!("worker {id}: {}", job.source_path.display());
        thread::Builder::new()
            .name(format!("convert-{id}"))
            .spawn(move || run_worker(id, &job, converter.as_ref(), &state))
    }
}

/// Worker body. Nothing escapes: converter errors and panics are both recorded as failures,
/// the job is always counted as completed, and the id is always pushed last.
fn run_worker(id: WorkerId, job: &Job, converter: &dyn Converter, state: &ProgressState) {
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| converter.convert(job)))
        .unwrap_or_else(|_| Err(ConversionError::new(&job.source_path, UNHANDLED_MESSAGE)));
    if let Err(e) = outcome {
        state.record_error(&e.path, &e.message);
    }
    state.record_completion();
    state.push_finished(id);
}

/// Block until a worker finishes and release its slot.
fn reclaim_one(state: &ProgressState, live: &mut HashMap<WorkerId, JoinHandle<()>>) {
    loop {
        let id = state.wait_finished();
        match live.remove(&id) {
            Some(handle) => {
                join_worker(id, handle);
                return;
            }
            None => warn!("finished worker {id} is not in the live set"),
        }
    }
}

/// The worker has already recorded its result, so this only reaps the thread.
fn join_worker(id: WorkerId, handle: JoinHandle<()>) {
    if handle.join().is_err() {
        warn!("worker {id} panicked after recording its result");
    } else {
        debug!("reclaimed worker {id}");
    }
}
