//! The sqltest command-line interface.
//!
//! This module is the main entry point for all CLI commands and orchestrates
//! the core library functions.

use std::{fs, path::Path, process};

use clap::Parser;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use crate::cli::args::{Command, SqlTestArgs};
use crate::cli::config::CliConfig;
use crate::discovery::FixtureDiscoverer;
use crate::engine::ParseConfig;
use crate::errors::{BuildError, SetError};
use crate::fixture::Test;

pub mod args;
pub mod config;
pub mod output;

/// Environment variable holding the log filter, e.g. `sqltest::build=debug`.
pub const LOG_ENV: &str = "SQLTEST_LOG";

/// The main entry point for the CLI.
pub fn run() {
    init_logging();
    let args = SqlTestArgs::parse();

    let config = match CliConfig::load(args.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            output::print_report(e);
            process::exit(1);
        }
    };

    // Dispatch to the appropriate subcommand handler.
    let ok = match args.command {
        Command::Check { pattern, limit } => {
            handle_check(config.pattern(pattern.as_deref()), &config.parse_config(limit))
        }
        Command::Show { file, json, limit } => {
            handle_show(&file, json, &config.parse_config(limit))
        }
    };

    if !ok {
        process::exit(1);
    }
}

/// Installs a stderr subscriber filtered by `SQLTEST_LOG` (default `warn`).
pub fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Handles the `check` subcommand. Every fixture is built even after a
/// failure so all problems are reported in one pass.
fn handle_check(pattern: &str, config: &ParseConfig) -> bool {
    let files = match FixtureDiscoverer::discover(pattern) {
        Ok(files) => files,
        Err(e) => {
            output::print_report(e);
            return false;
        }
    };
    if files.is_empty() {
        output::print_report(SetError::Empty);
        return false;
    }
    info!(target: "sqltest::set", pattern, files = files.len(), "checking fixtures");

    let (mut passed, mut failed) = (0, 0);
    for path in &files {
        match build_file(path, config) {
            Ok(test) => {
                output::print_fixture_status(test.name(), Some(test.statements().len()));
                passed += 1;
            }
            Err(e) => {
                output::print_fixture_status(&path.display().to_string(), None);
                output::print_report(e);
                failed += 1;
            }
        }
    }
    output::print_summary(passed, failed);
    failed == 0
}

/// Handles the `show` subcommand.
fn handle_show(path: &Path, json: bool, config: &ParseConfig) -> bool {
    let test = match build_file(path, config) {
        Ok(test) => test,
        Err(e) => {
            output::print_report(e);
            return false;
        }
    };
    let printed = if json {
        output::print_statements_json(&test).map_err(|e| e.to_string())
    } else {
        output::print_statements(&test).map_err(|e| e.to_string())
    };
    if let Err(e) = printed {
        eprintln!("Error: {}", e);
        return false;
    }
    true
}

fn build_file(path: &Path, config: &ParseConfig) -> Result<Test, BuildError> {
    let name = path.display().to_string();
    debug!(target: "sqltest::build", file = %name, "building fixture");
    let file = fs::File::open(path).map_err(|source| BuildError::Io {
        name: name.clone(),
        source,
    })?;
    Test::from_named_reader(name, file, config)
}
