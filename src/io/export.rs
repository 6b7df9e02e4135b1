//! Export a filtered series to CSV.
//!
//! The export is meant to be easy to consume in spreadsheets or downstream scripts.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::domain::StateSeries;
use crate::error::AppError;

/// Write a state series to a CSV file as `date,<metric>` rows.
///
/// Dates are ISO formatted and missing counts export as empty cells, so the
/// gaps stay visible after a round trip through a spreadsheet.
pub fn write_series_csv(path: &Path, series: &StateSeries) -> Result<(), AppError> {
    let mut file = File::create(path).map_err(|e| {
        AppError::io(format!(
            "Failed to create export CSV '{}': {e}",
            path.display()
        ))
    })?;

    writeln!(file, "date,{}", series.metric.column_name())
        .map_err(|e| AppError::io(format!("Failed to write export CSV header: {e}")))?;

    for (date, value) in &series.points {
        writeln!(
            file,
            "{date},{}",
            value.map(|v| v.to_string()).unwrap_or_default()
        )
        .map_err(|e| AppError::io(format!("Failed to write export CSV row: {e}")))?;
    }

    Ok(())
}
