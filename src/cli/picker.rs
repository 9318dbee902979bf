//! Interactive input picker.
//!
//! This is intentionally kept separate from clap parsing:
//! - clap handles structured flags/subcommands
//! - the picker covers running `gapfill` without a path
//!
//! The picker lists station files found under the current working directory and
//! also accepts any typed file or directory path.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::error::AppError;

/// Default directory recursion depth for finding station files.
const DEFAULT_SEARCH_DEPTH: usize = 3;

/// Extensions GRDC exports are commonly saved with.
const STATION_EXTENSIONS: [&str; 4] = ["txt", "day", "mon", "cmd"];

/// Prompt for an input file or directory.
///
/// Behavior:
/// - list discovered station files (if any)
/// - accept either a number (from the list) or an explicit path
/// - `q` cancels
pub fn prompt_for_input_path() -> Result<PathBuf, AppError> {
    let files = discover_station_files();
    if !files.is_empty() {
        println!("Found {} station file(s):", files.len());
        for (idx, path) in files.iter().enumerate() {
            println!("{:>3}) {}", idx + 1, pretty_path(path));
        }
    }

    loop {
        if files.is_empty() {
            print!("Enter a station file or directory (q to quit): ");
        } else {
            print!(
                "Select a file by number (1-{}) or type a file/directory path (q to quit): ",
                files.len()
            );
        }
        io::stdout()
            .flush()
            .map_err(|e| AppError::new(2, format!("Failed to write prompt: {e}")))?;

        let mut input = String::new();
        let bytes = io::stdin()
            .read_line(&mut input)
            .map_err(|e| AppError::new(2, format!("Failed to read input: {e}")))?;

        if bytes == 0 {
            return Err(AppError::new(
                2,
                "No input received. Provide a path with `gapfill run <PATH>`.",
            ));
        }

        let input = input.trim();
        if input.eq_ignore_ascii_case("q") {
            return Err(AppError::new(2, "Canceled."));
        }

        if let Ok(choice) = input.parse::<usize>() {
            if (1..=files.len()).contains(&choice) {
                return validate_input_path(&files[choice - 1]);
            }
            if !files.is_empty() {
                println!("Invalid choice: {choice}. Enter a number between 1 and {}.", files.len());
                continue;
            }
        }

        match validate_input_path(Path::new(input)) {
            Ok(path) => return Ok(path),
            Err(err) => {
                println!("{err}");
                continue;
            }
        }
    }
}

/// Validate that the path names an existing file or directory.
pub fn validate_input_path(path: &Path) -> Result<PathBuf, AppError> {
    if !path.exists() {
        return Err(AppError::new(2, format!("Input not found: {}", path.display())));
    }
    if !(path.is_file() || path.is_dir()) {
        return Err(AppError::new(
            2,
            format!("Expected a file or directory: {}", path.display()),
        ));
    }
    Ok(path.to_path_buf())
}

/// Discover station files under the current directory (deterministic order).
pub fn discover_station_files() -> Vec<PathBuf> {
    find_station_files(Path::new("."), DEFAULT_SEARCH_DEPTH)
}

/// Walk at most `max_depth` directory levels below `root`.
fn find_station_files(root: &Path, max_depth: usize) -> Vec<PathBuf> {
    let mut out = Vec::new();
    let mut pending = vec![(root.to_path_buf(), 0)];

    while let Some((dir, depth)) = pending.pop() {
        let Ok(entries) = fs::read_dir(&dir) else {
            continue;
        };
        for entry in entries.flatten() {
            let path = entry.path();
            let Ok(file_type) = entry.file_type() else {
                continue;
            };
            if file_type.is_dir() && depth < max_depth && !should_skip_dir(&path) {
                pending.push((path, depth + 1));
            } else if file_type.is_file() && has_station_extension(&path) {
                out.push(path);
            }
        }
    }

    out.sort_by_key(|p| pretty_path(p));
    out
}

fn has_station_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| STATION_EXTENSIONS.iter().any(|s| ext.eq_ignore_ascii_case(s)))
        == Some(true)
}

/// Skip VCS/build folders and previous run folders (their `data/` would be picked up).
fn should_skip_dir(path: &Path) -> bool {
    let name = path.file_name().and_then(|s| s.to_str()).unwrap_or("");
    matches!(name, ".git" | "target" | "node_modules") || name.starts_with("time_series_")
}

fn pretty_path(path: &Path) -> String {
    let stripped = path.strip_prefix("./").unwrap_or(path);
    stripped.display().to_string()
}
