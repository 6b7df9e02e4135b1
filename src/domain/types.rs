//! Shared domain types.
//!
//! These types are intentionally lightweight so they can be:
//!
//! - built row by row during CSV ingest
//! - filtered and summarized in memory
//! - handed to the chart renderer and the CSV exporter unchanged

use std::collections::BTreeSet;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use chrono::NaiveDate;
use clap::ValueEnum;

use crate::error::AppError;

/// Which cumulative series to select from a snapshot.
///
/// This is a closed enum on purpose: every label, title, and column lookup
/// matches exhaustively, and an unrecognized metric string is rejected at
/// parse time instead of silently falling back to one of the variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Metric {
    Positive,
    Death,
}

impl Metric {
    /// Column name in the source CSV.
    pub fn column_name(self) -> &'static str {
        match self {
            Metric::Positive => "positive",
            Metric::Death => "death",
        }
    }

    /// Y-axis label for the rendered chart.
    pub fn axis_label(self) -> &'static str {
        match self {
            Metric::Positive => "Positive Cases",
            Metric::Death => "Deaths",
        }
    }

    /// Chart title interpolating the state code.
    pub fn chart_title(self, state: &str) -> String {
        match self {
            Metric::Positive => format!("Covid-19 positive cases in {state}"),
            Metric::Death => format!("Covid-19 related deaths in {state}"),
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column_name())
    }
}

impl FromStr for Metric {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "positive" => Ok(Metric::Positive),
            "death" => Ok(Metric::Death),
            other => Err(AppError::io(format!(
                "Unknown metric '{other}' (expected 'positive' or 'death')"
            ))),
        }
    }
}

/// One loaded snapshot row: a (date, state) pair with its cumulative counts.
///
/// Counts are `Option` because the source leaves cells empty before a state
/// started reporting a series; a missing count is data, not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseRecord {
    pub date: NaiveDate,
    pub state: String,
    pub positive: Option<i64>,
    pub death: Option<i64>,
}

impl CaseRecord {
    /// The count for the chosen metric.
    pub fn value(&self, metric: Metric) -> Option<i64> {
        match metric {
            Metric::Positive => self.positive,
            Metric::Death => self.death,
        }
    }
}

/// The filtered table loaded from one snapshot, keyed by parsed date.
///
/// Row order is preserved from the file. The source publishes rows
/// most-recent-first per state; the delta computation relies on that order
/// and nothing here re-sorts it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyTable {
    pub rows: Vec<CaseRecord>,
    /// Snapshot file the rows were parsed from.
    pub source: PathBuf,
}

impl DailyTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Earliest and latest dates present, or `None` for an empty table.
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        let mut dates = self.rows.iter().map(|r| r.date);
        let first = dates.next()?;
        Some(dates.fold((first, first), |(lo, hi), d| (lo.min(d), hi.max(d))))
    }

    /// Number of distinct state codes in the table.
    pub fn state_count(&self) -> usize {
        self.rows
            .iter()
            .map(|r| r.state.as_str())
            .collect::<BTreeSet<_>>()
            .len()
    }

    /// Filter to one state and select one metric, preserving row order.
    ///
    /// An unknown state fails here, at filter time, so the caller gets a
    /// lookup error instead of an index error later inside the delta math.
    pub fn state_series(&self, state: &str, metric: Metric) -> Result<StateSeries, AppError> {
        let points: Vec<(NaiveDate, Option<i64>)> = self
            .rows
            .iter()
            .filter(|r| r.state == state)
            .map(|r| (r.date, r.value(metric)))
            .collect();

        if points.is_empty() {
            return Err(AppError::data(format!(
                "No rows for state '{state}' in {}",
                self.source.display()
            )));
        }

        Ok(StateSeries {
            state: state.to_string(),
            metric,
            points,
        })
    }
}

/// One state's time series for one metric, in snapshot row order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateSeries {
    pub state: String,
    pub metric: Metric,
    pub points: Vec<(NaiveDate, Option<i64>)>,
}

impl StateSeries {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Earliest and latest dates covered by the series.
    pub fn date_bounds(&self) -> Option<(NaiveDate, NaiveDate)> {
        let mut dates = self.points.iter().map(|(d, _)| *d);
        let first = dates.next()?;
        Some(dates.fold((first, first), |(lo, hi), d| (lo.min(d), hi.max(d))))
    }

    /// Smallest and largest observed counts, ignoring missing cells.
    pub fn value_bounds(&self) -> Option<(i64, i64)> {
        let mut values = self.points.iter().filter_map(|(_, v)| *v);
        let first = values.next()?;
        Some(values.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v))))
    }

    /// Contiguous runs of observed points, split wherever a count is missing.
    ///
    /// The chart draws each run as its own polyline so gaps in the source
    /// show up as gaps in the line rather than interpolated segments.
    pub fn segments(&self) -> Vec<Vec<(NaiveDate, i64)>> {
        let mut segments = Vec::new();
        let mut current = Vec::new();
        for (date, value) in &self.points {
            match value {
                Some(v) => current.push((*date, *v)),
                None => {
                    if !current.is_empty() {
                        segments.push(std::mem::take(&mut current));
                    }
                }
            }
        }
        if !current.is_empty() {
            segments.push(current);
        }
        segments
    }
}

/// Latest total and latest-vs-previous delta for a state series.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaseDelta {
    /// Date of the newest row the delta was computed from.
    pub as_of: NaiveDate,
    /// Cumulative count on `as_of`.
    pub total: i64,
    /// `total` minus the previous row's count. Negative when the source
    /// revised a cumulative count downward.
    pub new: i64,
}

impl CaseDelta {
    /// Compute the delta from the first two rows of the series.
    ///
    /// The series is in file order, newest first, so row 0 is "latest" and
    /// row 1 is "previous". Needs both rows present and both counts
    /// reported.
    pub fn from_series(series: &StateSeries) -> Result<CaseDelta, AppError> {
        let (latest_date, latest) = series.points.first().copied().ok_or_else(|| {
            AppError::data(format!(
                "State '{}' has no rows to compute a delta from",
                series.state
            ))
        })?;
        let (previous_date, previous) = series.points.get(1).copied().ok_or_else(|| {
            AppError::data(format!(
                "State '{}' has a single {} observation; two are needed for the new-case delta",
                series.state, series.metric
            ))
        })?;

        let total = latest.ok_or_else(|| {
            AppError::data(format!(
                "Latest {} count for '{}' ({latest_date}) is missing",
                series.metric, series.state
            ))
        })?;
        let previous = previous.ok_or_else(|| {
            AppError::data(format!(
                "Previous {} count for '{}' ({previous_date}) is missing",
                series.metric, series.state
            ))
        })?;

        Ok(CaseDelta {
            as_of: latest_date,
            total,
            new: total - previous,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn record(d: &str, state: &str, positive: Option<i64>, death: Option<i64>) -> CaseRecord {
        CaseRecord {
            date: date(d),
            state: state.to_string(),
            positive,
            death,
        }
    }

    fn table(rows: Vec<CaseRecord>) -> DailyTable {
        DailyTable {
            rows,
            source: PathBuf::from("test.csv"),
        }
    }

    #[test]
    fn metric_parses_both_known_values() {
        assert_eq!("positive".parse::<Metric>().unwrap(), Metric::Positive);
        assert_eq!("DEATH".parse::<Metric>().unwrap(), Metric::Death);
    }

    #[test]
    fn metric_rejects_unknown_values() {
        let err = "deaths".parse::<Metric>().unwrap_err();
        assert!(err.to_string().contains("Unknown metric 'deaths'"));
    }

    #[test]
    fn metric_labels_are_exhaustive_and_distinct() {
        assert_eq!(Metric::Positive.axis_label(), "Positive Cases");
        assert_eq!(Metric::Death.axis_label(), "Deaths");
        assert_eq!(
            Metric::Death.chart_title("NY"),
            "Covid-19 related deaths in NY"
        );
        assert_eq!(
            Metric::Positive.chart_title("NY"),
            "Covid-19 positive cases in NY"
        );
    }

    #[test]
    fn state_series_preserves_row_order_and_metric() {
        let t = table(vec![
            record("2020-05-02", "CA", Some(100), Some(9)),
            record("2020-05-02", "NY", Some(500), Some(40)),
            record("2020-05-01", "CA", Some(80), Some(7)),
        ]);

        let series = t.state_series("CA", Metric::Positive).unwrap();
        assert_eq!(series.points.len(), 2);
        assert_eq!(series.points[0], (date("2020-05-02"), Some(100)));
        assert_eq!(series.points[1], (date("2020-05-01"), Some(80)));
    }

    #[test]
    fn state_series_fails_for_unknown_state() {
        let t = table(vec![record("2020-05-02", "CA", Some(100), Some(9))]);
        let err = t.state_series("ZZ", Metric::Positive).unwrap_err();
        assert!(err.to_string().contains("No rows for state 'ZZ'"));
        assert_eq!(err.exit_code(), crate::error::EXIT_DATA);
    }

    #[test]
    fn delta_is_latest_minus_previous() {
        let t = table(vec![
            record("2020-05-02", "CA", Some(100), Some(9)),
            record("2020-05-01", "CA", Some(80), Some(7)),
        ]);
        let series = t.state_series("CA", Metric::Positive).unwrap();
        let delta = CaseDelta::from_series(&series).unwrap();
        assert_eq!(delta.total, 100);
        assert_eq!(delta.new, 20);
        assert_eq!(delta.as_of, date("2020-05-02"));
    }

    #[test]
    fn delta_needs_two_rows() {
        let t = table(vec![record("2020-05-02", "CA", Some(100), Some(9))]);
        let series = t.state_series("CA", Metric::Death).unwrap();
        let err = CaseDelta::from_series(&series).unwrap_err();
        assert!(err.to_string().contains("two are needed"));
    }

    #[test]
    fn delta_needs_reported_counts() {
        let t = table(vec![
            record("2020-05-02", "CA", None, Some(9)),
            record("2020-05-01", "CA", Some(80), Some(7)),
        ]);
        let series = t.state_series("CA", Metric::Positive).unwrap();
        let err = CaseDelta::from_series(&series).unwrap_err();
        assert!(err.to_string().contains("is missing"));
    }

    #[test]
    fn segments_split_on_missing_counts() {
        let series = StateSeries {
            state: "CA".to_string(),
            metric: Metric::Positive,
            points: vec![
                (date("2020-05-04"), Some(120)),
                (date("2020-05-03"), Some(110)),
                (date("2020-05-02"), None),
                (date("2020-05-01"), Some(80)),
            ],
        };
        let segments = series.segments();
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].len(), 2);
        assert_eq!(segments[1], vec![(date("2020-05-01"), 80)]);
    }

    #[test]
    fn table_summary_helpers() {
        let t = table(vec![
            record("2020-05-02", "CA", Some(100), Some(9)),
            record("2020-05-02", "NY", Some(500), Some(40)),
            record("2020-05-01", "CA", Some(80), Some(7)),
        ]);
        assert_eq!(t.len(), 3);
        assert_eq!(t.state_count(), 2);
        assert_eq!(
            t.date_range(),
            Some((date("2020-05-01"), date("2020-05-02")))
        );
    }
}
