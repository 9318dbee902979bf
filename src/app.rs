//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - resolves the input files and dialect
//! - runs the per-file pipeline
//! - writes data files, charts, the run log and `summary.json`

use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use clap::Parser;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use crate::cli::{Command, InputArgs, RunArgs};
use crate::domain::{DialectSpec, Method, RunConfig};
use crate::error::AppError;
use crate::io::{collect_inputs, read_dialect_json, read_input, write_series_txt, write_summary_json};
use crate::plot::{ChartData, render_svg};
use crate::report::{FileSummary, RunSummary, format_file_summary, format_gap_table};

pub mod context;
pub mod pipeline;

use context::{RunContext, default_output_root};
use pipeline::{FileRun, process_content};

/// Entry point for the `gapfill` binary.
pub fn run() -> Result<(), AppError> {
    // `gapfill <PATH>` is shorthand for `gapfill run <PATH>`. Clap requires a
    // subcommand name, so argv is rewritten before parsing.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    init_tracing(cli.verbose);

    match cli.command {
        Command::Run(args) => handle_run(args),
        Command::Gaps(args) => handle_gaps(args),
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn handle_run(args: RunArgs) -> Result<(), AppError> {
    let config = run_config_from_args(&args)?;
    let root = config
        .output_root
        .clone()
        .unwrap_or_else(|| default_output_root(&config.input));
    run_batch(&config, &root, Local::now())
}

/// Process every input file into a new run folder under `root`.
///
/// A failing file never stops the batch. Returns exit code 3 when every file failed.
fn run_batch(config: &RunConfig, root: &Path, started: DateTime<Local>) -> Result<(), AppError> {
    let files = collect_inputs(&config.input)?;
    let mut ctx = RunContext::create(root, &config.input, started)?;
    info!("Writing run outputs to {}", ctx.dir.display());

    let mut summaries = Vec::with_capacity(files.len());
    for (i, path) in files.iter().enumerate() {
        info!(
            "Currently processing file {}... {} of {}",
            display_name(path),
            i + 1,
            files.len()
        );
        summaries.push(process_file(&mut ctx, config, path));
    }

    let failed = summaries.iter().filter(|s| s.failed()).count();
    println!("{}", format_gap_table(&summaries));

    let summary = RunSummary {
        tool: "gapfill".to_string(),
        started: started.to_rfc3339(),
        input: config.input.display().to_string(),
        methods: config.methods.clone(),
        files: summaries,
    };
    match write_summary_json(&ctx.summary_path(), &summary) {
        Ok(()) => info!("Wrote summary: {}", ctx.summary_path().display()),
        Err(err) => {
            warn!("{err}");
            if let Err(log_err) = ctx.log.write(&format!("Output not written: {err}")) {
                warn!("{log_err}");
            }
        }
    }

    let log_path = ctx.log.path().to_path_buf();
    if let Err(err) = ctx.log.finish(summary.files.len(), failed) {
        warn!("{err}");
    }
    info!("Wrote run log: {}", log_path.display());

    if failed == summary.files.len() {
        return Err(AppError::new(
            3,
            format!(
                "All {failed} input file(s) failed. See {}",
                log_path.display()
            ),
        ));
    }
    Ok(())
}

fn handle_gaps(args: InputArgs) -> Result<(), AppError> {
    let dialect = dialect_from_args(&args)?;
    let input = resolve_input(&args)?;
    let files = collect_inputs(&input)?;

    let summaries: Vec<FileSummary> = files
        .iter()
        .map(|path| {
            let name = display_name(path);
            match read_input(path) {
                // No methods: alignment only.
                Ok(content) => FileSummary::from_run(name, &process_content(&content, &dialect, &[])),
                Err(err) => FileSummary::unreadable(name, err.to_string()),
            }
        })
        .collect();

    for s in &summaries {
        println!("{}", format_file_summary(s));
    }
    println!("{}", format_gap_table(&summaries));

    let failed = summaries.iter().filter(|s| s.failed()).count();
    if failed == summaries.len() {
        return Err(AppError::new(3, format!("All {failed} input file(s) failed.")));
    }
    Ok(())
}

/// Parse, fill and write everything for one file. Never fails: problems end up
/// in the returned summary and the run log.
fn process_file(ctx: &mut RunContext, config: &RunConfig, path: &Path) -> FileSummary {
    let name = display_name(path);
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(&name)
        .to_string();

    let mut summary = match read_input(path) {
        Ok(content) => {
            let run = process_content(&content, &config.dialect, &config.methods);
            let mut summary = FileSummary::from_run(name.clone(), &run);
            summary.output_errors = write_outputs(ctx, config, &stem, &run);
            summary
        }
        Err(err) => FileSummary::unreadable(name.clone(), err.to_string()),
    };

    if let Some(t) = &summary.truncation {
        warn!("{name}: stopped reading at line {}: {}", t.line, t.reason);
    }
    if let Some(e) = &summary.error {
        warn!("{name}: {e}");
    }
    for m in summary.methods.iter().filter(|m| m.error.is_some()) {
        debug!("{name}: {} skipped", m.method);
    }

    if let Err(err) = ctx.log.write(&format_file_summary(&summary)) {
        warn!("{err}");
        summary.output_errors.push(err.to_string());
    }
    summary
}

/// Write data files and the chart for one file; returns what could not be written.
fn write_outputs(ctx: &RunContext, config: &RunConfig, stem: &str, run: &FileRun) -> Vec<String> {
    let Ok(filled) = &run.core else {
        return Vec::new();
    };
    let mut errors = Vec::new();
    let mut record = |result: Result<(), AppError>| {
        if let Err(err) = result {
            warn!("{err}");
            errors.push(err.to_string());
        }
    };

    let results: Vec<_> = filled.fills.iter().filter_map(|f| f.result.as_ref().ok()).collect();

    match &filled.monthly {
        None => {
            for r in &results {
                let path = ctx.data_path(stem, r.method, None);
                record(write_series_txt(&path, r.series.points()));
            }
        }
        Some(samples) => {
            for r in &results {
                let path = ctx.data_path(stem, r.method, Some("daily"));
                record(write_series_txt(&path, r.series.points()));
            }
            for s in samples {
                let path = ctx.data_path(stem, s.method, Some("monthly"));
                record(write_series_txt(&path, s.points.iter().copied()));
            }
        }
    }

    if config.plot {
        match ChartData::build(stem, &run.series, &filled.alignment.calendar, &results) {
            Some(data) => record(render_svg(&ctx.plot_path(stem), &data)),
            None => debug!("{stem}: no values to plot"),
        }
    }

    errors
}

/// Build the effective run configuration from CLI arguments.
pub fn run_config_from_args(args: &RunArgs) -> Result<RunConfig, AppError> {
    let dialect = dialect_from_args(&args.input)?;
    let input = resolve_input(&args.input)?;

    let mut methods: Vec<Method> = Vec::new();
    let requested = if args.methods.is_empty() {
        Method::DEFAULTS.as_slice()
    } else {
        args.methods.as_slice()
    };
    for m in requested {
        if !methods.contains(m) {
            methods.push(*m);
        }
    }

    Ok(RunConfig {
        input,
        dialect,
        methods,
        output_root: args.output.clone(),
        plot: !args.no_plot,
    })
}

/// Built-in dialect or JSON override, then the header-line override.
pub fn dialect_from_args(args: &InputArgs) -> Result<DialectSpec, AppError> {
    let mut spec = match &args.dialect_file {
        Some(path) => read_dialect_json(path)?,
        None => DialectSpec::builtin(args.dialect),
    };
    if let Some(n) = args.header_lines {
        spec.header_lines = n;
    }
    spec.validate()
        .map_err(|e| AppError::new(2, format!("Invalid dialect: {e}")))?;
    Ok(spec)
}

fn resolve_input(args: &InputArgs) -> Result<PathBuf, AppError> {
    match &args.path {
        Some(p) => crate::cli::picker::validate_input_path(p),
        None => crate::cli::picker::prompt_for_input_path(),
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Rewrite argv so a bare path (or no argument) means `run`.
///
/// Rules:
/// - `gapfill`                       -> `gapfill run` (prompts for a path)
/// - `gapfill <PATH> ...`            -> `gapfill run <PATH> ...`
/// - `gapfill -m cubic-spline ...`   -> `gapfill run -m cubic-spline ...`
/// - `gapfill -v gaps <PATH>`        -> unchanged
/// - `gapfill --help/--version/-h`   -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("run".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    // Global flags may come before the subcommand name.
    let first_word = argv.iter().skip(1).find(|a| !a.starts_with('-'));
    let is_subcommand = matches!(first_word.map(String::as_str), Some("run" | "gaps"));
    if is_subcommand {
        return argv;
    }

    argv.insert(1, "run".to_string());
    argv
}
