//! Command-line parsing.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the download/ingest/chart code.

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};

use crate::domain::Metric;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(
    name = "ctp",
    version,
    about = "Covid Tracking Project snapshot fetcher and chart tool"
)]
pub struct Cli {
    /// Increase log verbosity (repeatable).
    #[arg(short = 'v', long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Download the current daily-cases CSV into the snapshot store.
    Fetch(StoreArgs),
    /// Summarize the most recent snapshot (rows, states, date range).
    Info(InfoArgs),
    /// Chart one state's cumulative series from the most recent snapshot.
    Show(ShowArgs),
}

/// Options shared by every command that touches the snapshot store.
#[derive(Debug, Parser, Clone)]
pub struct StoreArgs {
    /// Snapshot directory (defaults to $CTP_DATA_DIR, then ./data).
    #[arg(long, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,
}

/// Options for `ctp info`.
#[derive(Debug, Parser)]
pub struct InfoArgs {
    #[command(flatten)]
    pub store: StoreArgs,

    /// Download a fresh snapshot before loading.
    #[arg(short = 'u', long)]
    pub update: bool,
}

/// Options for `ctp show`.
#[derive(Debug, Parser)]
pub struct ShowArgs {
    /// State or territory code as written in the data (e.g. CA).
    pub state: String,

    #[command(flatten)]
    pub store: StoreArgs,

    /// Which cumulative series to chart.
    #[arg(short = 'm', long, value_enum, ignore_case = true, default_value_t = Metric::Positive)]
    pub metric: Metric,

    /// Download a fresh snapshot before loading.
    #[arg(short = 'u', long)]
    pub update: bool,

    /// Output SVG path (defaults to <state>_<metric>.svg).
    #[arg(short = 'o', long, value_name = "SVG")]
    pub out: Option<PathBuf>,

    /// Also export the filtered series to CSV.
    #[arg(long, value_name = "CSV")]
    pub export: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn show_defaults_to_the_positive_metric() {
        let cli = Cli::try_parse_from(["ctp", "show", "CA"]).unwrap();
        match cli.command {
            Command::Show(args) => {
                assert_eq!(args.state, "CA");
                assert_eq!(args.metric, Metric::Positive);
                assert!(!args.update);
                assert!(args.out.is_none());
            }
            _ => panic!("expected show"),
        }
    }

    #[test]
    fn metric_values_parse_case_insensitively() {
        let cli = Cli::try_parse_from(["ctp", "show", "NY", "--metric", "Death"]).unwrap();
        match cli.command {
            Command::Show(args) => assert_eq!(args.metric, Metric::Death),
            _ => panic!("expected show"),
        }
    }

    #[test]
    fn unknown_metric_values_are_rejected() {
        assert!(Cli::try_parse_from(["ctp", "show", "NY", "--metric", "deaths"]).is_err());
    }

    #[test]
    fn verbose_is_global_and_repeatable() {
        let cli = Cli::try_parse_from(["ctp", "fetch", "-vv"]).unwrap();
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn data_dir_overrides_apply_per_command() {
        let cli = Cli::try_parse_from(["ctp", "info", "--update", "--data-dir", "/tmp/snaps"])
            .unwrap();
        match cli.command {
            Command::Info(args) => {
                assert!(args.update);
                assert_eq!(args.store.data_dir.as_deref(), Some(Path::new("/tmp/snaps")));
            }
            _ => panic!("expected info"),
        }
    }
}
