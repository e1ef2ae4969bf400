//! Public and internal types for the webpbatch API and worker pool.

use serde::Serialize;
use std::path::PathBuf;

/// One source-file-to-target-file conversion. Immutable once discovered.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Job {
    pub source_path: PathBuf,
    pub target_path: PathBuf,
}

impl Job {
    pub fn new(source_path: impl Into<PathBuf>, target_path: impl Into<PathBuf>) -> Self {
        Self {
            source_path: source_path.into(),
            target_path: target_path.into(),
        }
    }
}

/// Identifier the dispatcher hands to each worker, in launch order.
pub type WorkerId = usize;

/// A conversion that failed, as recorded in the shared progress state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Failure {
    pub path: PathBuf,
    pub message: String,
}

/// Final tally of a run.
///
/// `completed` counts every job that reached a terminal state (success or failure);
/// `errors` counts the failed subset, so `errors <= completed` always holds.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub total: usize,
    pub completed: usize,
    pub errors: usize,
    pub failures: Vec<Failure>,
}

impl Summary {
    pub fn succeeded(&self) -> usize {
        self.completed.saturating_sub(self.errors)
    }
}

/// Full options for a run (CLI and lib). Built from defaults, then `webpbatch.toml`, then argv.
#[derive(Clone, Debug)]
pub struct Opts {
    /// Root of the tree to convert.
    pub input_dir: PathBuf,
    /// Root the converted tree is mirrored into. Created when absent.
    pub output_dir: PathBuf,
    /// Extension (without dot) given to every output file.
    pub target_extension: String,
    /// Flag placed before the output path on the converter command line.
    pub output_flag: String,
    /// Converter executable. When None, resolved next to this executable, then on PATH.
    pub converter: Option<PathBuf>,
    /// Override the worker count. When None, half the available threads (at least 1).
    pub threads: Option<usize>,
    /// Kill a conversion that runs longer than this. When None, wait indefinitely.
    pub timeout_secs: Option<u64>,
    /// Treat a non-zero converter exit status as a failed conversion.
    pub check_exit_status: bool,
    /// Debug logging.
    pub verbose: bool,
    /// Wait for Enter before exiting (CLI only).
    pub pause_on_exit: bool,
    /// Write the run summary as JSON here.
    pub report_path: Option<PathBuf>,
    /// Tokens passed verbatim to the converter ahead of the input/output paths.
    pub extra_args: Vec<String>,
}

impl Default for Opts {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from(crate::utils::config::DEFAULT_INPUT_DIR),
            output_dir: PathBuf::from(crate::utils::config::DEFAULT_OUTPUT_DIR),
            target_extension: crate::utils::config::DEFAULT_TARGET_EXTENSION.to_string(),
            output_flag: crate::utils::config::DEFAULT_OUTPUT_FLAG.to_string(),
            converter: None,
            threads: None,
            timeout_secs: None,
            check_exit_status: false,
            verbose: false,
            pause_on_exit: true,
            report_path: None,
            extra_args: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn succeeded_excludes_errors() {
        let summary = Summary {
            total: 5,
            completed: 5,
            errors: 2,
            ..Default::default()
        };
        assert_eq!(summary.succeeded(), 3);
    }

    #[test]
    fn succeeded_never_underflows() {
        let summary = Summary {
            completed: 1,
            errors: 3,
            ..Default::default()
        };
        assert_eq!(summary.succeeded(), 0);
    }
}
