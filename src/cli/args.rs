//! Defines the command-line arguments and subcommands for the sqltest CLI.
//!
//! This module uses the `clap` crate with its "derive" feature to create a
//! declarative and type-safe argument parsing structure.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// The main CLI argument structure.
#[derive(Debug, Parser)]
#[command(
    name = "sqltest",
    version,
    about = "Declarative SQL fixture tests: split, interpret and validate fixture files."
)]
pub struct SqlTestArgs {
    /// YAML file with default settings (falls back to ./sqltest.yaml if present).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// An enumeration of all available CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Build every fixture matched by a glob pattern and report errors.
    Check {
        /// Glob pattern selecting fixture files (default: testdata/*.sql).
        pattern: Option<String>,
        /// Maximum parse loop iterations per fixture.
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Print the statements a fixture builds into.
    Show {
        /// The fixture file to show.
        #[arg(required = true)]
        file: PathBuf,
        /// Emit JSON instead of a listing.
        #[arg(long)]
        json: bool,
        /// Maximum parse loop iterations.
        #[arg(long)]
        limit: Option<usize>,
    },
}
