//! Core orchestration: discover jobs, size the pool, dispatch, tally.

use log::{debug, info};
use std::fs;
use std::sync::Arc;

use crate::error::SetupError;
use crate::utils::config::WorkerThreadLimits;
use crate::{Opts, Summary};

use super::discover::discover;
use super::dispatcher::Dispatcher;
use super::invoker::Converter;
use super::progress::ProgressSink;

/// Convert every supported image under `opts.input_dir` into `opts.output_dir` with `converter`.
///
/// Setup errors (missing input folder, nothing to convert, unreadable tree, output folder cannot
/// be created) abort before any conversion starts. Per-job failures are only counted.
pub fn run_conversion(
    opts: &Opts,
    converter: Arc<dyn Converter>,
    sink: Arc<dyn ProgressSink>,
) -> Result<Summary, SetupError> {
    let jobs = discover(&opts.input_dir, &opts.output_dir, &opts.target_extension)?;

    fs::create_dir_all(&opts.output_dir).map_err(|source| SetupError::OutputDirectory {
        path: opts.output_dir.clone(),
        source,
    })?;

    let limits = WorkerThreadLimits::current();
    let concurrency_limit = limits.resolve(opts.threads);
    debug!(
        "{} available thread(s), pool size {}",
        limits.all_threads, concurrency_limit
    );
    info!(
        "Starting the conversion of {} file(s) using {} thread(s).",
        jobs.len(),
        concurrency_limit
    );

    let summary = Dispatcher::new(converter, sink, concurrency_limit).run(jobs);
    debug!(
        "completed {} of {}, {} error(s)",
        summary.completed, summary.total, summary.errors
    );
    Ok(summary)
}
