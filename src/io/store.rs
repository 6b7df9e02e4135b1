//! Append-only snapshot store.
//!
//! Every fetch lands as a new `ctp_<UTC timestamp>.csv` file inside one local
//! directory; nothing here mutates or deletes existing snapshots. "Most
//! recent" is simply the lexicographically last matching file name, which is
//! correct because the timestamp fields are zero-padded and ISO-ordered.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use log::info;

use crate::error::AppError;

/// File-name prefix shared by every snapshot.
pub const SNAPSHOT_PREFIX: &str = "ctp_";
/// File-name suffix shared by every snapshot.
pub const SNAPSHOT_SUFFIX: &str = ".csv";
/// Store directory used when neither the CLI flag nor the environment says
/// otherwise.
pub const DEFAULT_DATA_DIR: &str = "data";
/// Environment variable overriding the store directory (`.env` is honored).
pub const DATA_DIR_ENV: &str = "CTP_DATA_DIR";

/// Fractional seconds keep names strictly increasing across rapid fetches;
/// two fetches inside the same microsecond would tie and the later write
/// would win, which the caller accepts.
const STAMP_FORMAT: &str = "%Y-%m-%d_%H-%M-%S%.6f";

pub struct SnapshotStore {
    dir: PathBuf,
}

impl SnapshotStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Resolve the store directory: explicit flag, then `$CTP_DATA_DIR`,
    /// then `./data`.
    pub fn resolve(explicit: Option<PathBuf>) -> Self {
        if let Some(dir) = explicit {
            return Self::new(dir);
        }
        dotenvy::dotenv().ok();
        match std::env::var(DATA_DIR_ENV) {
            Ok(dir) if !dir.is_empty() => Self::new(dir),
            _ => Self::new(DEFAULT_DATA_DIR),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Create the store directory if it does not exist yet. Idempotent.
    pub fn ensure_dir(&self) -> Result<(), AppError> {
        fs::create_dir_all(&self.dir).map_err(|e| {
            AppError::io(format!(
                "Failed to create store directory '{}': {e}",
                self.dir.display()
            ))
        })
    }

    /// Write `bytes` verbatim as a new timestamped snapshot and return its
    /// path. There is no partial-write protection: a crash mid-write leaves a
    /// truncated snapshot indistinguishable from a complete one.
    pub fn save(&self, bytes: &[u8]) -> Result<PathBuf, AppError> {
        self.ensure_dir()?;
        let path = self.dir.join(snapshot_name(Utc::now()));
        fs::write(&path, bytes).map_err(|e| {
            AppError::io(format!(
                "Failed to write snapshot '{}': {e}",
                path.display()
            ))
        })?;
        info!("saved snapshot {} ({} bytes)", path.display(), bytes.len());
        Ok(path)
    }

    /// All snapshot paths in the store, sorted so the last entry is the most
    /// recent. A store directory that does not exist yet lists as empty.
    pub fn list(&self) -> Result<Vec<PathBuf>, AppError> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(AppError::io(format!(
                    "Failed to read store directory '{}': {e}",
                    self.dir.display()
                )));
            }
        };

        let mut snapshots = Vec::new();
        for entry in entries.flatten() {
            let file_type = match entry.file_type() {
                Ok(ft) => ft,
                Err(_) => continue,
            };
            if !file_type.is_file() {
                continue;
            }
            let path = entry.path();
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            if name.starts_with(SNAPSHOT_PREFIX) && name.ends_with(SNAPSHOT_SUFFIX) {
                snapshots.push(path);
            }
        }
        snapshots.sort();
        Ok(snapshots)
    }

    /// Path of the most recent snapshot.
    ///
    /// An empty store (including a directory that was never created) is an
    /// error, not an empty table further down the line.
    pub fn latest(&self) -> Result<PathBuf, AppError> {
        let mut snapshots = self.list()?;
        snapshots.pop().ok_or_else(|| {
            AppError::data(format!(
                "No snapshots under '{}'; run `ctp fetch` first",
                self.dir.display()
            ))
        })
    }
}

fn snapshot_name(stamp: DateTime<Utc>) -> String {
    format!(
        "{SNAPSHOT_PREFIX}{}{SNAPSHOT_SUFFIX}",
        stamp.format(STAMP_FORMAT)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn stamp(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, s).unwrap()
    }

    #[test]
    fn snapshot_names_are_prefixed_and_iso_ordered() {
        let earlier = snapshot_name(stamp(2020, 5, 1, 23, 59, 59));
        let later = snapshot_name(stamp(2020, 5, 2, 0, 0, 0));
        assert!(earlier.starts_with(SNAPSHOT_PREFIX));
        assert!(earlier.ends_with(SNAPSHOT_SUFFIX));
        assert!(earlier < later, "{earlier} should sort before {later}");
    }

    #[test]
    fn snapshot_names_zero_pad_every_field() {
        let name = snapshot_name(stamp(2020, 5, 1, 2, 3, 4));
        assert_eq!(name, "ctp_2020-05-01_02-03-04.000000.csv");
    }

    #[test]
    fn save_then_latest_roundtrip() {
        let tmp = tempfile::tempdir().unwrap();
        let store = SnapshotStore::new(tmp.path().join("data"));
        let path = store.save(b"date,state\n20200501,NY\n").unwrap();
        assert_eq!(store.latest().unwrap(), path);
        assert_eq!(fs::read(&path).unwrap(), b"date,state\n20200501,NY\n");
    }

    #[test]
    fn repeated_saves_keep_the_newest_last() {
        let tmp = tempfile::tempdir().unwrap();
        let store = SnapshotStore::new(tmp.path());
        let first = store.save(b"a").unwrap();
        // Force distinct timestamps even on coarse clocks.
        std::thread::sleep(std::time::Duration::from_millis(5));
        let second = store.save(b"b").unwrap();
        assert_ne!(first, second);
        assert_eq!(store.list().unwrap(), vec![first, second.clone()]);
        assert_eq!(store.latest().unwrap(), second);
    }

    #[test]
    fn list_ignores_foreign_files() {
        let tmp = tempfile::tempdir().unwrap();
        let store = SnapshotStore::new(tmp.path());
        store.ensure_dir().unwrap();
        fs::write(tmp.path().join("ctp_2020-05-01_00-00-00.000000.csv"), b"x").unwrap();
        fs::write(tmp.path().join("notes.txt"), b"x").unwrap();
        fs::write(tmp.path().join("other_2020.csv"), b"x").unwrap();
        let listed = store.list().unwrap();
        assert_eq!(listed.len(), 1);
    }

    #[test]
    fn latest_fails_on_empty_store() {
        let tmp = tempfile::tempdir().unwrap();
        let store = SnapshotStore::new(tmp.path());
        let err = store.latest().unwrap_err();
        assert!(err.to_string().contains("No snapshots"));
        assert_eq!(err.exit_code(), crate::error::EXIT_DATA);
    }

    #[test]
    fn latest_fails_when_directory_was_never_created() {
        let tmp = tempfile::tempdir().unwrap();
        let store = SnapshotStore::new(tmp.path().join("never-fetched"));
        assert!(store.latest().is_err());
    }

    #[test]
    fn ensure_dir_is_idempotent() {
        let tmp = tempfile::tempdir().unwrap();
        let store = SnapshotStore::new(tmp.path().join("data"));
        store.ensure_dir().unwrap();
        store.ensure_dir().unwrap();
        assert!(store.dir().is_dir());
    }

    #[test]
    fn resolve_prefers_the_explicit_directory() {
        let store = SnapshotStore::resolve(Some(PathBuf::from("elsewhere")));
        assert_eq!(store.dir(), Path::new("elsewhere"));
    }
}
