//! Load `webpbatch.toml` from the working directory (CLI only). Lib callers build [`Opts`] directly.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::Opts;
use crate::utils::config::PackagePaths;

#[derive(Debug, Default, Deserialize)]
pub(crate) struct SettingsToml {
    #[serde(default)]
    settings: SettingsSection,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct SettingsSection {
    input_dir: Option<String>,
    output_dir: Option<String>,
    target_extension: Option<String>,
    output_flag: Option<String>,
    converter: Option<String>,
    threads: Option<usize>,
    timeout_secs: Option<u64>,
    check_exit_status: Option<bool>,
    verbose: Option<bool>,
    pause_on_exit: Option<bool>,
    report: Option<bool>,
    report_path: Option<String>,
}

/// Load the settings file from `dir`. `Ok(None)` when there is no file; a malformed file is an
/// error naming the path, which the caller reports once logging is up.
pub(crate) fn load_settings_toml(dir: &Path) -> Result<Option<SettingsToml>> {
    let path = dir.join(PackagePaths::get().settings_filename());
    let Ok(s) = std::fs::read_to_string(&path) else {
        return Ok(None);
    };
    parse_settings(&s)
        .map(Some)
        .with_context(|| format!("ignoring {}", path.display()))
}

pub(crate) fn parse_settings(s: &str) -> Result<SettingsToml, toml::de::Error> {
    toml::from_str(s)
}

/// Overwrite opts field from file when present.
macro_rules! apply_file_opt {
    ($sec:expr, $opts:expr, $field:ident) => {
        if let Some(v) = $sec.$field.clone() {
            $opts.$field = v.into();
        }
    };
}

/// Apply file settings to opts (only fields present in the file). Call before applying argv.
pub(crate) fn apply_file_to_opts(file: &SettingsToml, opts: &mut Opts) {
    let sec = &file.settings;
    apply_file_opt!(sec, opts, input_dir);
    apply_file_opt!(sec, opts, output_dir);
    if let Some(ref ext) = sec.target_extension {
        opts.target_extension = ext.trim_start_matches('.').to_string();
    }
    apply_file_opt!(sec, opts, output_flag);
    if let Some(ref p) = sec.converter {
        opts.converter = Some(PathBuf::from(p));
    }
    if sec.threads.is_some() {
        opts.threads = sec.threads;
    }
    if sec.timeout_secs.is_some() {
        opts.timeout_secs = sec.timeout_secs;
    }
    apply_file_opt!(sec, opts, check_exit_status);
    apply_file_opt!(sec, opts, verbose);
    apply_file_opt!(sec, opts, pause_on_exit);
    match (&sec.report_path, sec.report) {
        (Some(p), _) => opts.report_path = Some(PathBuf::from(p)),
        (None, Some(true)) => {
            opts.report_path = Some(PathBuf::from(PackagePaths::get().report_filename()))
        }
        _ => {}
    }
}
