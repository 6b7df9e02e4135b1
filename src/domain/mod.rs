//! Domain types shared across the crate.
//!
//! This module defines:
//!
//! - the selectable metric (`Metric`)
//! - loaded snapshot rows and the date-keyed table (`CaseRecord`, `DailyTable`)
//! - the per-state series and its latest/new delta (`StateSeries`, `CaseDelta`)

pub mod types;

pub use types::*;
