//! `ctp-charts` library crate.
//!
//! The binary (`ctp`) is a thin wrapper around this library so that:
//!
//! - fetch/load/chart logic is testable without spawning processes
//! - the snapshot store and ingest modules stay reusable from other tools
//! - code stays easy to navigate as the project grows

pub mod app;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod io;
pub mod plot;
pub mod report;
