//! Webpbatch CLI: every argument goes to cwebp; settings come from webpbatch.toml.

use clap::Parser;
use std::process::ExitCode;
use std::time::Instant;
use webpbatch::engine::{Cli, handle_run};

fn main() -> ExitCode {
    let start_time = Instant::now();
    let cli = Cli::parse();
    let code = handle_run(&cli);
    log::debug!("Total time: {:?}", start_time.elapsed());
    code
}
