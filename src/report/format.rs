//! Formatted text output.
//!
//! We keep formatting code in one place so:
//! - the pipeline stays free of presentation concerns
//! - the run log and the `gaps` command print the same wording

use chrono::NaiveDate;

use super::FileSummary;

/// Multi-line block describing one file, as written to the run log.
pub fn format_file_summary(summary: &FileSummary) -> String {
    let mut out = String::new();

    out.push_str(&format!("=== {} ===\n", summary.file));
    out.push_str(&format!("Data lines read: {}\n", summary.lines_read));

    if let Some(t) = &summary.truncation {
        out.push_str(&format!(
            "Stopped reading at line {}: {}\n  > {}\n",
            t.line, t.reason, t.content
        ));
    }
    if !summary.duplicates.is_empty() {
        out.push_str(&format!(
            "Repeated dates (first record kept): {}\n",
            fmt_dates(&summary.duplicates)
        ));
    }

    if let Some(cal) = &summary.calendar {
        out.push_str(&format!("Start date: {}\n", cal.start));
        out.push_str(&format!("End date: {}\n", cal.end));
        out.push_str(&format!("Length: {} days\n", cal.stats.span_days));
        out.push_str(&format!("Data points: {}\n", cal.stats.observed));
        out.push_str(&format!("Missing dates (gaps): {}\n", cal.gaps.len()));
        if !cal.gaps.is_empty() {
            out.push_str(&format!("  {}\n", fmt_dates(&cal.gaps)));
        }
        out.push_str(&format!(
            "Missing values before reindexing: {}\n",
            cal.stats.nulls_before
        ));
        out.push_str(&format!(
            "Missing values after reindexing: {}\n",
            cal.stats.nulls_after
        ));
    }

    for m in &summary.methods {
        match (&m.filled, &m.error) {
            (Some(n), _) => out.push_str(&format!("{:<22} filled {n}\n", m.method.id())),
            (None, Some(e)) => out.push_str(&format!("{:<22} FAILED: {e}\n", m.method.id())),
            (None, None) => {}
        }
    }

    if let Some(e) = &summary.error {
        out.push_str(&format!("FAILED: {e}\n"));
    }
    for e in &summary.output_errors {
        out.push_str(&format!("Output not written: {e}\n"));
    }

    out
}

/// One row per file, for the `gaps` command.
pub fn format_gap_table(summaries: &[FileSummary]) -> String {
    let mut out = String::new();
    out.push_str(
        format!(
            "{:<28} {:>10} {:>10} {:>8} {:>8} {:>6} {:>8}\n",
            "file", "start", "end", "days", "points", "gaps", "missing"
        )
        .trim_end(),
    );
    out.push('\n');
    out.push_str(
        format!(
            "{:-<28} {:-<10} {:-<10} {:-<8} {:-<8} {:-<6} {:-<8}\n",
            "", "", "", "", "", "", ""
        )
        .trim_end(),
    );
    out.push('\n');

    for s in summaries {
        let row = match &s.calendar {
            Some(cal) => format!(
                "{:<28} {:>10} {:>10} {:>8} {:>8} {:>6} {:>8}",
                truncate(&s.file, 28),
                cal.start,
                cal.end,
                cal.length,
                cal.stats.observed,
                cal.gaps.len(),
                cal.stats.nulls_after,
            ),
            None => format!(
                "{:<28} {}",
                truncate(&s.file, 28),
                s.error.as_deref().unwrap_or("failed")
            ),
        };
        out.push_str(row.trim_end());
        out.push('\n');
    }

    out
}

fn fmt_dates(dates: &[NaiveDate]) -> String {
    let parts: Vec<String> = dates.iter().map(|d| d.to_string()).collect();
    parts.join(", ")
}

/// Cut `s` to `max` characters, marking the cut with a trailing `.`.
fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max.saturating_sub(1)).collect();
    out.push('.');
    out
}
