//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments and initializes logging
//! - downloads snapshots into the store
//! - loads + filters the most recent snapshot
//! - renders charts and prints summaries

use std::path::PathBuf;

use clap::Parser;
use env_logger::Env;
use log::debug;

use crate::cli::{Cli, Command, InfoArgs, ShowArgs, StoreArgs};
use crate::data::CtpClient;
use crate::domain::{CaseDelta, DailyTable, Metric};
use crate::error::AppError;
use crate::io::store::SnapshotStore;

/// Entry point for the `ctp` binary.
pub fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Fetch(args) => handle_fetch(args),
        Command::Info(args) => handle_info(args),
        Command::Show(args) => handle_show(args),
    }
}

/// Load the most recent snapshot, optionally downloading a fresh one first.
///
/// The download runs before the load, so with `update` set the caller always
/// sees the data it just fetched.
pub fn update_and_load(store: &SnapshotStore, update: bool) -> Result<DailyTable, AppError> {
    if update {
        let body = CtpClient::new().fetch_daily()?;
        let path = store.save(&body)?;
        debug!("refreshed store with {}", path.display());
    }
    crate::io::ingest::load_latest(store)
}

/// Stderr logging via `env_logger`: warn by default, info at `-v`, debug at
/// `-vv`. `RUST_LOG` still wins when set.
fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(Env::default().default_filter_or(default_level))
        .try_init()
        .ok();
}

fn handle_fetch(args: StoreArgs) -> Result<(), AppError> {
    let store = SnapshotStore::resolve(args.data_dir);
    let body = CtpClient::new().fetch_daily()?;
    let path = store.save(&body)?;
    println!("{}", crate::report::format_fetch_notice(&path, body.len()));
    Ok(())
}

fn handle_info(args: InfoArgs) -> Result<(), AppError> {
    let store = SnapshotStore::resolve(args.store.data_dir);
    let table = update_and_load(&store, args.update)?;
    print!("{}", crate::report::format_table_summary(&table));
    Ok(())
}

fn handle_show(args: ShowArgs) -> Result<(), AppError> {
    let store = SnapshotStore::resolve(args.store.data_dir);
    let table = update_and_load(&store, args.update)?;

    let series = table.state_series(&args.state, args.metric)?;
    let delta = CaseDelta::from_series(&series)?;

    let chart_path = args
        .out
        .unwrap_or_else(|| default_chart_path(&args.state, args.metric));
    crate::plot::render_chart(&chart_path, &series, &delta)?;

    if let Some(path) = &args.export {
        crate::io::export::write_series_csv(path, &series)?;
    }

    print!(
        "{}",
        crate::report::format_show_summary(&series, &delta, &chart_path)
    );
    Ok(())
}

fn default_chart_path(state: &str, metric: Metric) -> PathBuf {
    PathBuf::from(format!("{}_{metric}.svg", state.to_ascii_lowercase()))
}
