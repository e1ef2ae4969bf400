//! Engine module: discovery, conversion, progress and the worker pool

pub mod arg_parser;
pub mod cli;
pub mod core;
pub mod discover;
pub mod dispatcher;
pub mod invoker;
pub mod progress;
pub mod tools;

// Re-export commonly used functions
pub use arg_parser::Cli;
pub use cli::handle_run;
pub use core::run_conversion;
pub use discover::discover;
pub use dispatcher::{Dispatcher, UNHANDLED_MESSAGE};
pub use invoker::{Converter, ExternalConverter, resolve_converter};
pub use progress::{ConsoleProgress, ProgressSink, ProgressState, SilentProgress};
pub use tools::{is_supported_image, path_relative_to, percent_complete, target_path_for};
