//! Per-run output layout.
//!
//! ```text
//! <root>/time_series_<YYYYmmddHHMM>/
//!     <YYYYmmddHHMM>.log
//!     summary.json
//!     data/<stem>_<method>[_daily|_monthly].txt
//!     plots/<stem>.svg
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};

use crate::domain::Method;
use crate::error::AppError;
use crate::report::RunLog;

/// Output paths and the run log, passed explicitly to every file's processing.
pub struct RunContext {
    pub stamp: String,
    pub dir: PathBuf,
    pub data_dir: PathBuf,
    pub plots_dir: PathBuf,
    pub log: RunLog,
}

impl RunContext {
    /// Create the run folder (and its `data/` and `plots/` subfolders) under `root`.
    pub fn create(root: &Path, input: &Path, now: DateTime<Local>) -> Result<Self, AppError> {
        let stamp = now.format("%Y%m%d%H%M").to_string();
        let dir = root.join(format!("time_series_{stamp}"));
        let data_dir = dir.join("data");
        let plots_dir = dir.join("plots");

        for d in [&data_dir, &plots_dir] {
            fs::create_dir_all(d).map_err(|e| {
                AppError::new(2, format!("Failed to create output folder '{}': {e}", d.display()))
            })?;
        }

        let log = RunLog::create(&dir.join(format!("{stamp}.log")), &stamp, input)?;

        Ok(Self {
            stamp,
            dir,
            data_dir,
            plots_dir,
            log,
        })
    }

    /// `data/<stem>_<method>.txt`, or `data/<stem>_<method>_<suffix>.txt`.
    pub fn data_path(&self, stem: &str, method: Method, suffix: Option<&str>) -> PathBuf {
        let name = match suffix {
            Some(s) => format!("{stem}_{}_{s}.txt", method.id()),
            None => format!("{stem}_{}.txt", method.id()),
        };
        self.data_dir.join(name)
    }

    pub fn plot_path(&self, stem: &str) -> PathBuf {
        self.plots_dir.join(format!("{stem}.svg"))
    }

    pub fn summary_path(&self) -> PathBuf {
        self.dir.join("summary.json")
    }
}

/// Where the run folder goes when `--output` is not given: next to the input
/// directory (for a single file, next to the directory containing it).
pub fn default_output_root(input: &Path) -> PathBuf {
    let input_dir = if input.is_file() {
        input.parent().unwrap_or(Path::new(""))
    } else {
        input
    };
    match input_dir.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn creates_layout_and_names_outputs() {
        let root = std::env::temp_dir().join(format!("gapfill-ctx-{}", std::process::id()));
        let now = Local.with_ymd_and_hms(2024, 3, 9, 14, 5, 0).unwrap();
        let ctx = RunContext::create(&root, Path::new("in"), now).unwrap();

        assert_eq!(ctx.stamp, "202403091405");
        assert!(ctx.data_dir.is_dir());
        assert!(ctx.plots_dir.is_dir());
        assert!(ctx.log.path().ends_with("time_series_202403091405/202403091405.log"));
        assert!(
            ctx.data_path("6335020", Method::LinearSpline, Some("monthly"))
                .ends_with("data/6335020_linear-spline_monthly.txt")
        );
        assert!(ctx.plot_path("6335020").ends_with("plots/6335020.svg"));

        drop(ctx);
        std::fs::remove_dir_all(&root).unwrap();
    }

    #[test]
    fn default_root_is_beside_the_input_directory() {
        assert_eq!(default_output_root(Path::new("/data/grdc/daily")), PathBuf::from("/data/grdc"));
        assert_eq!(default_output_root(Path::new("daily")), PathBuf::from("."));
    }
}
