//! CLI command handler: banner, settings, run, summary, exit prompt.

use anyhow::Result;
use colored::Colorize;
use log::{debug, warn};
use std::io::{BufRead, IsTerminal, Write};
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;

use crate::engine::arg_parser::Cli;
use crate::engine::core::run_conversion;
use crate::engine::invoker::ExternalConverter;
use crate::engine::progress::ConsoleProgress;
use crate::utils::settings_toml::{apply_file_to_opts, load_settings_toml};
use crate::utils::{setup_logging, write_report};
use crate::{Opts, Summary};

/// Defaults, then `webpbatch.toml` from `dir`, then argv. A settings file that could not be
/// used comes back as the second value so it can be logged after [`setup_logging`].
pub fn build_opts(cli: &Cli, dir: &Path) -> (Opts, Option<anyhow::Error>) {
    let mut opts = Opts::default();
    let problem = match load_settings_toml(dir) {
        Ok(Some(file)) => {
            apply_file_to_opts(&file, &mut opts);
            None
        }
        Ok(None) => None,
        Err(e) => Some(e),
    };
    opts.extra_args = cli.converter_args.clone();
    (opts, problem)
}

fn log_settings_problem(problem: Option<anyhow::Error>) {
    if let Some(e) = problem {
        warn!("{:#}", e);
    }
}

fn print_banner(cli: &Cli) {
    println!(
        "{} {}\nLicensed under {}\n\n---",
        env!("CARGO_PKG_NAME").cyan().bold(),
        env!("CARGO_PKG_VERSION"),
        env!("CARGO_PKG_LICENSE")
    );
    if cli.converter_args.is_empty() {
        println!(
            "\nNo arguments specified. To pass arguments to cwebp, run {} <cwebp arguments>.",
            env!("CARGO_PKG_NAME")
        );
    } else {
        println!("\nArguments: {}", cli.joined_args());
    }
}

fn print_summary(summary: &Summary) {
    let errors = format!("{} error(s)", summary.errors);
    let errors = if summary.errors == 0 {
        errors.green()
    } else {
        errors.red()
    };
    println!("\nFinished with {}.", errors);
}

/// Wait for Enter so a double-clicked console window stays open. Skipped without a terminal.
fn pause(opts: &Opts) {
    println!("\n---\n");
    if !opts.pause_on_exit || !std::io::stdin().is_terminal() {
        return;
    }
    print!("Press Enter to exit...");
    let _ = std::io::stdout().flush();
    let mut line = String::new();
    let _ = std::io::stdin().lock().read_line(&mut line);
}

fn run(opts: &Opts) -> Result<Summary> {
    let converter = ExternalConverter::from_opts(opts);
    debug!("Converter: {}", converter.program().display());
    let summary = run_conversion(opts, Arc::new(converter), Arc::new(ConsoleProgress))?;
    if let Some(ref path) = opts.report_path
        && let Err(e) = write_report(path, &summary)
    {
        warn!("{:#}", e);
    }
    Ok(summary)
}

/// Run a conversion with settings from the working directory. Setup errors are printed and
/// turned into a failure exit code; per-job errors are not.
pub fn handle_run(cli: &Cli) -> ExitCode {
    let (opts, settings_problem) = build_opts(cli, Path::new("."));
    setup_logging(opts.verbose);
    log_settings_problem(settings_problem);
    debug!("{} CONFIG:{:#?}", env!("CARGO_PKG_NAME").to_uppercase(), opts);
    print_banner(cli);

    let code = match run(&opts) {
        Ok(summary) => {
            print_summary(&summary);
            ExitCode::SUCCESS
        }
        Err(e) => {
            println!("\n{} {:#}", "Fatal Error:".red().bold(), e);
            ExitCode::FAILURE
        }
    };
    pause(&opts);
    code
}
