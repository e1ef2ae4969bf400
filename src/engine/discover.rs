//! Job discovery: walk the input tree and turn every supported image into a [`Job`].

use log::debug;
use std::path::Path;
use walkdir::WalkDir;

use crate::Job;
use crate::error::SetupError;

use super::tools::{is_supported_image, target_path_for};

/// Walk `input_root` (sorted by file name, so the order is stable across runs) and return one job
/// per supported image, its target mirrored under `output_root` with `extension`.
///
/// Pure discovery: nothing is created on disk. An unreadable entry aborts the walk.
pub fn discover(
    input_root: &Path,
    output_root: &Path,
    extension: &str,
) -> Result<Vec<Job>, SetupError> {
    if !input_root.is_dir() {
        return Err(SetupError::NoInputDirectory(input_root.to_path_buf()));
    }

    let mut jobs = Vec::new();
    for entry in WalkDir::new(input_root).sort_by_file_name() {
        let entry = entry?;
        // Links to files count; links to directories are listed but not descended into.
        let is_file = entry.file_type().is_file()
            || (entry.path_is_symlink() && entry.path().is_file());
        if !is_file || !is_supported_image(entry.path()) {
            continue;
        }
        let source = entry.into_path();
        let target = target_path_for(&source, input_root, output_root, extension);
        jobs.push(Job::new(source, target));
    }
    debug!(
        "Discovered {} image(s) under {}",
        jobs.len(),
        input_root.display()
    );

    if jobs.is_empty() {
        return Err(SetupError::NoMatchingFiles(input_root.to_path_buf()));
    }
    Ok(jobs)
}
