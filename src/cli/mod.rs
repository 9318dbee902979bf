//! Command-line parsing for the gap filler.
//!
//! The goal of this module is to keep **argument parsing** separate from the
//! pipeline; `app` turns the parsed arguments into a `RunConfig`.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::domain::{Dialect, Method};

pub mod picker;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(
    name = "gapfill",
    version,
    about = "Detect calendar gaps in GRDC station series and fill them by interpolation"
)]
pub struct Cli {
    /// Log debug diagnostics to stderr (RUST_LOG overrides).
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Align, fill and write data files, charts, a run log and `summary.json`.
    Run(RunArgs),
    /// Print the per-file gap summary only. Nothing is written.
    Gaps(InputArgs),
}

/// Input selection shared by every command.
#[derive(Debug, Args, Clone)]
pub struct InputArgs {
    /// A station file or a directory of station files. Prompted for when omitted.
    pub path: Option<PathBuf>,

    /// Built-in input format.
    #[arg(short, long, value_enum, default_value_t = Dialect::Daily)]
    pub dialect: Dialect,

    /// Override the number of header lines to skip.
    #[arg(long, value_name = "N")]
    pub header_lines: Option<usize>,

    /// Read the full input format from a JSON file (replaces --dialect).
    #[arg(long, value_name = "JSON")]
    pub dialect_file: Option<PathBuf>,
}

/// Options for a full run.
#[derive(Debug, Args, Clone)]
pub struct RunArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Interpolation method; repeat for several. Defaults to
    /// linear-spline, quadratic-spline and piecewise-polynomial.
    #[arg(short, long = "method", value_enum, value_name = "METHOD")]
    pub methods: Vec<Method>,

    /// Directory the run folder is created in (default: next to the input directory).
    #[arg(short, long, value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Skip the SVG charts.
    #[arg(long)]
    pub no_plot: bool,
}
