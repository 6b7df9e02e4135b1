//! CSV ingest and normalization.
//!
//! This module turns one raw snapshot file into a `DailyTable` that is safe
//! to filter and chart.
//!
//! Design goals:
//! - **Strict schema**: `date`, `state`, `positive`, `death` must all exist
//!   (clear errors + exit code 3); every other column is dropped
//! - **Strict dates**: `date` must parse as `YYYYMMDD`, anything else aborts
//!   the load with the offending line number
//! - **Sparse counts**: an empty count cell is a gap in the series, a
//!   non-numeric one aborts the load
//! - **No caching**: every call re-reads the snapshot from disk

use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

use chrono::NaiveDate;
use csv::StringRecord;
use log::info;

use crate::domain::{CaseRecord, DailyTable};
use crate::error::AppError;
use crate::io::store::SnapshotStore;

/// The columns kept from the upstream CSV, which carries a few dozen more.
pub const REQUIRED_COLUMNS: [&str; 4] = ["date", "state", "positive", "death"];

/// Date format used by the upstream `date` column.
const DATE_FORMAT: &str = "%Y%m%d";

/// Load the most recent snapshot in the store.
pub fn load_latest(store: &SnapshotStore) -> Result<DailyTable, AppError> {
    let path = store.latest()?;
    load_table(&path)
}

/// Parse one snapshot file into a `DailyTable`, keeping file row order.
pub fn load_table(path: &Path) -> Result<DailyTable, AppError> {
    let file = File::open(path).map_err(|e| {
        AppError::io(format!("Failed to open snapshot '{}': {e}", path.display()))
    })?;

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(file);

    let headers = reader
        .headers()
        .map_err(|e| {
            AppError::data(format!(
                "Failed to read CSV headers from '{}': {e}",
                path.display()
            ))
        })?
        .clone();

    let header_map = build_header_map(&headers);
    ensure_required_columns_exist(&header_map, path)?;

    let mut rows = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        // +2 because:
        // - records() starts at line 1 after headers
        // - CSV is 1-based line numbers
        let line = idx + 2;

        let record = result.map_err(|e| {
            AppError::data(format!(
                "Snapshot '{}' line {line}: CSV parse error: {e}",
                path.display()
            ))
        })?;

        let row = parse_record(&record, &header_map).map_err(|msg| {
            AppError::data(format!("Snapshot '{}' line {line}: {msg}", path.display()))
        })?;
        rows.push(row);
    }

    if rows.is_empty() {
        return Err(AppError::data(format!(
            "Snapshot '{}' has a header but no data rows",
            path.display()
        )));
    }

    info!("loaded {} rows from {}", rows.len(), path.display());
    Ok(DailyTable {
        rows,
        source: path.to_path_buf(),
    })
}

fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (normalize_header_name(name), idx))
        .collect()
}

fn normalize_header_name(name: &str) -> String {
    // Spreadsheet round-trips can leave a BOM prefix on the first header.
    // Strip it so schema validation does not report `date` as missing.
    let name = name.trim().trim_start_matches('\u{feff}');
    name.to_ascii_lowercase()
}

fn ensure_required_columns_exist(
    header_map: &HashMap<String, usize>,
    path: &Path,
) -> Result<(), AppError> {
    for column in REQUIRED_COLUMNS {
        if !header_map.contains_key(column) {
            return Err(AppError::data(format!(
                "Snapshot '{}' is missing required column `{column}`",
                path.display()
            )));
        }
    }
    Ok(())
}

fn parse_record(
    record: &StringRecord,
    header_map: &HashMap<String, usize>,
) -> Result<CaseRecord, String> {
    let date = parse_date(get_required(record, header_map, "date")?)?;
    let state = get_required(record, header_map, "state")?.to_string();
    let positive = parse_count(get_optional(record, header_map, "positive"), "positive")?;
    let death = parse_count(get_optional(record, header_map, "death"), "death")?;

    Ok(CaseRecord {
        date,
        state,
        positive,
        death,
    })
}

fn get_required<'a>(
    record: &'a StringRecord,
    header_map: &HashMap<String, usize>,
    name: &str,
) -> Result<&'a str, String> {
    let idx = header_map
        .get(name)
        .ok_or_else(|| format!("Missing required column: `{name}`"))?;
    record
        .get(*idx)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| format!("Missing required value: `{name}`"))
}

fn get_optional<'a>(
    record: &'a StringRecord,
    header_map: &HashMap<String, usize>,
    name: &str,
) -> Option<&'a str> {
    let idx = header_map.get(name)?;
    record.get(*idx).map(str::trim).filter(|s| !s.is_empty())
}

fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s, DATE_FORMAT)
        .map_err(|_| format!("Invalid date '{s}'. Expected YYYYMMDD."))
}

fn parse_count(s: Option<&str>, name: &str) -> Result<Option<i64>, String> {
    let Some(s) = s else { return Ok(None) };
    s.parse::<i64>()
        .map(Some)
        .map_err(|_| format!("Invalid `{name}` count '{s}'. Expected an integer."))
}
