pub mod config;
pub mod logger;
pub mod report;
pub(crate) mod settings_toml;

pub use config::*;
pub use logger::setup_logging;
pub use report::write_report;
