//! Error types: fatal setup errors and per-job conversion errors.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort a run before the worker pool starts.
#[derive(Debug, Error)]
pub enum SetupError {
    #[error(
        "Input folder \"{}\" was not found. Create it and place the image files you want to convert \
         within it. Subfolders are replicated in the output folder.",
        .0.display()
    )]
    NoInputDirectory(PathBuf),

    #[error(
        "No supported image files (PNG, JPG/JPEG, TIF/TIFF) were found within \"{}\".",
        .0.display()
    )]
    NoMatchingFiles(PathBuf),

    #[error("failed to read input tree: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("failed to create output folder \"{}\": {source}", .path.display())]
    OutputDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A single job's failure. Recorded and counted; never stops the pool.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("Error converting \"{}\": {message}", .path.display())]
pub struct ConversionError {
    pub path: PathBuf,
    pub message: String,
}

impl ConversionError {
    pub fn new(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}
