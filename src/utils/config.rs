//! Application configuration constants.
//! Defaults and tuning in one place.

use std::sync::OnceLock;

// ---- Package / paths (from CARGO_PKG_NAME, cached) ----

/// Package-derived names: built once from `CARGO_PKG_NAME`, then cached.
pub struct PackagePaths {
    settings_filename: String,
    report_filename: String,
}

static PACKAGE_PATHS: OnceLock<PackagePaths> = OnceLock::new();

impl PackagePaths {
    /// Build and cache names from `CARGO_PKG_NAME`. Called once on first use.
    pub fn get() -> &'static PackagePaths {
        PACKAGE_PATHS.get_or_init(|| {
            let pkg = env!("CARGO_PKG_NAME");
            PackagePaths {
                settings_filename: format!("{pkg}.toml"),
                report_filename: format!("{pkg}.results.json"),
            }
        })
    }

    /// Settings file looked up in the working directory.
    pub fn settings_filename(&self) -> &str {
        &self.settings_filename
    }

    /// Report filename used when the settings file enables the report without naming a path.
    pub fn report_filename(&self) -> &str {
        &self.report_filename
    }
}

// ---- Folders and converter ----

pub const DEFAULT_INPUT_DIR: &str = "Input";
pub const DEFAULT_OUTPUT_DIR: &str = "Output";
pub const DEFAULT_TARGET_EXTENSION: &str = "webp";
pub const DEFAULT_OUTPUT_FLAG: &str = "-o";

/// Converter binary name, without the platform executable suffix.
pub const CONVERTER_NAME: &str = "cwebp";

/// Extensions (upper-case, no dot) accepted by discovery. Compared case-insensitively.
pub const SUPPORTED_EXTENSIONS: [&str; 5] = ["PNG", "JPG", "JPEG", "TIF", "TIFF"];

// ---- Worker threads ----

/// Thread limits for sizing the conversion pool.
/// Use [`WorkerThreadLimits::current()`] to fill `all_threads` from rayon; the rest are const.
#[derive(Clone, Copy, Debug)]
pub struct WorkerThreadLimits {
    /// Available threads (from rayon); set by [`WorkerThreadLimits::current()`].
    pub all_threads: usize,
    /// Minimum pool size.
    pub floor: usize,
}

impl Default for WorkerThreadLimits {
    fn default() -> Self {
        Self {
            all_threads: 0, // use current() to set from rayon
            floor: Self::FLOOR_THREADS,
        }
    }
}

impl WorkerThreadLimits {
    pub const FLOOR_THREADS: usize = 1;

    /// Build limits with `all_threads` set from `rayon::current_num_threads()`
    /// (hardware parallelism unless `RAYON_NUM_THREADS` says otherwise).
    /// Side effect: starts rayon's global pool. Conversions never run on it.
    pub fn current() -> Self {
        Self {
            all_threads: rayon::current_num_threads(),
            ..Self::default()
        }
    }

    /// Half the available threads, never below the floor. Each worker mostly waits on a
    /// converter process that is itself multi-threaded.
    pub fn concurrency_limit(&self) -> usize {
        (self.all_threads / 2).max(self.floor)
    }

    /// Pool size for a run: explicit override (clamped to the floor) or [`Self::concurrency_limit`].
    pub fn resolve(&self, requested: Option<usize>) -> usize {
        requested
            .map(|n| n.max(self.floor))
            .unwrap_or_else(|| self.concurrency_limit())
    }
}

// ---- Converter process ----

/// Converter process tuning.
pub struct ProcessConsts;

impl ProcessConsts {
    /// Poll interval while waiting on a converter with a timeout (milliseconds).
    pub const TIMEOUT_POLL_MS: u64 = 10;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn concurrency_limit_is_half_with_floor() {
        let limits = |all_threads| WorkerThreadLimits {
            all_threads,
            ..WorkerThreadLimits::default()
        };
        assert_eq!(limits(16).concurrency_limit(), 8);
        assert_eq!(limits(3).concurrency_limit(), 1);
        assert_eq!(limits(1).concurrency_limit(), 1);
        assert_eq!(limits(0).concurrency_limit(), 1);
    }

    #[test]
    fn resolve_prefers_override_but_keeps_floor() {
        let limits = WorkerThreadLimits {
            all_threads: 8,
            ..WorkerThreadLimits::default()
        };
        assert_eq!(limits.resolve(None), 4);
        assert_eq!(limits.resolve(Some(6)), 6);
        assert_eq!(limits.resolve(Some(0)), 1);
    }

    #[test]
    fn package_names_follow_crate_name() {
        let paths = PackagePaths::get();
        assert_eq!(paths.report_filename(), "webpbatch.results.json");
        assert_eq!(paths.settings_filename(), "webpbatch.toml");
    }
}
