//! Shared progress state for the worker pool, and where progress gets reported.
//!
//! Every mutation goes through one [`Mutex`]; the paired [`Condvar`] wakes the dispatcher when a
//! worker pushes its id onto the finished queue. The lock is held only for the duration of each
//! operation, never across a converter run.

use colored::Colorize;
use log::error;
use std::collections::VecDeque;
use std::io::Write;
use std::path::Path;
use std::sync::{Arc, Condvar, Mutex, MutexGuard};

use crate::engine::tools::percent_complete;
use crate::{Failure, Summary, WorkerId};

/// Receives progress events. Called while the progress lock is held, so events from different
/// workers never interleave; keep implementations fast.
pub trait ProgressSink: Send + Sync {
    fn on_progress(&self, completed: usize, total: usize);
    fn on_error(&self, path: &Path, message: &str);
}

/// Single rewritten line on stdout (`Completed X of Y (Z%)`), errors on their own lines via `log`.
#[derive(Default)]
pub struct ConsoleProgress;

impl ProgressSink for ConsoleProgress {
    fn on_progress(&self, completed: usize, total: usize) {
        let mut out = std::io::stdout().lock();
        let _ = write!(
            out,
            "\rCompleted {} of {} ({}%).      ",
            completed,
            total,
            percent_complete(completed, total)
        );
        let _ = out.flush();
    }

    fn on_error(&self, path: &Path, message: &str) {
        // Step off the progress line first.
        println!();
        error!(
            "{} \"{}\": {}",
            "Error converting".red(),
            path.display(),
            message
        );
    }
}

/// Sink that drops everything. For library callers that only want the [`Summary`].
pub struct SilentProgress;

impl ProgressSink for SilentProgress {
    fn on_progress(&self, _completed: usize, _total: usize) {}
    fn on_error(&self, _path: &Path, _message: &str) {}
}

#[derive(Default)]
struct Counters {
    completed: usize,
    errors: usize,
    finished: VecDeque<WorkerId>,
    failures: Vec<Failure>,
}

/// Completed/error counts and the queue of finished-but-not-reclaimed workers.
pub struct ProgressState {
    total: usize,
    inner: Mutex<Counters>,
    finished_cv: Condvar,
    sink: Arc<dyn ProgressSink>,
}

impl ProgressState {
    pub fn new(total: usize, sink: Arc<dyn ProgressSink>) -> Self {
        Self {
            total,
            inner: Mutex::new(Counters::default()),
            finished_cv: Condvar::new(),
            sink,
        }
    }

    /// A worker that panicked while holding the lock leaves the counters consistent (every
    /// update is a single step), so recover from poisoning instead of wedging the pool.
    fn lock(&self) -> MutexGuard<'_, Counters> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Count a failed job and report it. Does not count the job as completed.
    pub fn record_error(&self, path: &Path, message: &str) {
        let mut c = self.lock();
        c.errors += 1;
        c.failures.push(Failure {
            path: path.to_path_buf(),
            message: message.to_string(),
        });
        self.sink.on_error(path, message);
    }

    /// Count a job as completed (whatever its outcome) and report progress. Returns the new count.
    pub fn record_completion(&self) -> usize {
        let mut c = self.lock();
        c.completed += 1;
        self.sink.on_progress(c.completed, self.total);
        c.completed
    }

    /// Mark `id` as finished and ready to be reclaimed.
    pub fn push_finished(&self, id: WorkerId) {
        let mut c = self.lock();
        debug_assert!(!c.finished.contains(&id), "worker {id} finished twice");
        c.finished.push_back(id);
        self.finished_cv.notify_one();
    }

    /// Oldest finished worker, if any.
    pub fn pop_finished(&self) -> Option<WorkerId> {
        self.lock().finished.pop_front()
    }

    /// Block until some worker has finished, then pop it.
    pub fn wait_finished(&self) -> WorkerId {
        let mut c = self
            .finished_cv
            .wait_while(self.lock(), |c| c.finished.is_empty())
            .unwrap_or_else(|e| e.into_inner());
        c.finished
            .pop_front()
            .unwrap_or_else(|| unreachable!("wait_while returned with an empty queue"))
    }

    pub fn completed(&self) -> usize {
        self.lock().completed
    }

    pub fn errors(&self) -> usize {
        self.lock().errors
    }

    pub fn summary(&self) -> Summary {
        let c = self.lock();
        Summary {
            total: self.total,
            completed: c.completed,
            errors: c.errors,
            failures: c.failures.clone(),
        }
    }
}
