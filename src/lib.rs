//! Webpbatch: convert a tree of PNG/JPEG/TIFF images with an external converter, in parallel

pub mod engine;
pub mod error;
pub mod types;
pub mod utils;

/// Re-export types for API
pub use types::*;

pub use error::{ConversionError, SetupError};

use std::sync::Arc;

use engine::{ExternalConverter, SilentProgress};

/// Convert `opts.input_dir` into `opts.output_dir` with the external converter described by
/// `opts`, reporting nothing. Use [`engine::run_conversion`] to supply your own converter or
/// progress sink.
///
/// ```ignore
/// let opts = webpbatch::Opts { input_dir: "photos".into(), output_dir: "webp".into(), ..Default::default() };
/// let summary = webpbatch::convert_dir(&opts)?;
/// println!("{} converted, {} failed", summary.succeeded(), summary.errors);
/// ```
pub fn convert_dir(opts: &Opts) -> Result<Summary, SetupError> {
    engine::run_conversion(
        opts,
        Arc::new(ExternalConverter::from_opts(opts)),
        Arc::new(SilentProgress),
    )
}
