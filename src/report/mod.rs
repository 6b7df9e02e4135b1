//! Formatted terminal output.
//!
//! We keep formatting code in one place so:
//! - the fetch/load/chart code stays clean and testable
//! - output changes are localized

use std::path::Path;

use crate::domain::{CaseDelta, DailyTable, StateSeries};

/// Thousands-separated count, e.g. `1234567` becomes `1,234,567`.
pub fn format_count(n: i64) -> String {
    let digits = n.unsigned_abs().to_string();
    let grouped = digits
        .as_bytes()
        .rchunks(3)
        .rev()
        .map(|chunk| std::str::from_utf8(chunk).unwrap_or_default())
        .collect::<Vec<_>>()
        .join(",");
    if n < 0 { format!("-{grouped}") } else { grouped }
}

/// Like `format_count`, but non-negative values carry an explicit `+`.
pub fn format_count_signed(n: i64) -> String {
    if n >= 0 {
        format!("+{}", format_count(n))
    } else {
        format_count(n)
    }
}

/// One-line confirmation after a snapshot download.
pub fn format_fetch_notice(path: &Path, bytes: usize) -> String {
    format!(
        "Saved {} ({} bytes)",
        path.display(),
        format_count(bytes as i64)
    )
}

/// Summary of a loaded table for `ctp info`.
pub fn format_table_summary(table: &DailyTable) -> String {
    let mut out = String::new();
    out.push_str(&format!("Loaded {}\n", table.source.display()));
    out.push_str(&format!("- rows: {}\n", format_count(table.len() as i64)));
    out.push_str(&format!(
        "- states: {}\n",
        format_count(table.state_count() as i64)
    ));
    match table.date_range() {
        Some((first, last)) => out.push_str(&format!("- dates: {first} to {last}\n")),
        None => out.push_str("- dates: none\n"),
    }
    out
}

/// Summary printed alongside the rendered chart for `ctp show`.
pub fn format_show_summary(series: &StateSeries, delta: &CaseDelta, chart: &Path) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{} {} as of {}:\n",
        series.state, series.metric, delta.as_of
    ));
    out.push_str(&format!("- total: {}\n", format_count(delta.total)));
    out.push_str(&format!(
        "- new since previous report: {}\n",
        format_count_signed(delta.new)
    ));
    out.push_str(&format!("- chart: {}\n", chart.display()));
    out
}
