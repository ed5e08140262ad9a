// src/snapshot.rs
//
// Flat-file layout of the data directory. Every artifact is a single JSON
// array written in one go:
//
//   <data_dir>/elements.json            current players (raw)
//   <data_dir>/teams.json               current teams (raw)
//   <data_dir>/history/<cat>_<d>_<m>_<HH><MM>.json   timestamped copies
//   <data_dir>/elements_prepped.json    enriched players

use crate::error::SnapshotError;
use chrono::{DateTime, Datelike, Timelike, Utc};
use log::debug;
use serde::{de::DeserializeOwned, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const PLAYERS_FILE: &str = "elements.json";
pub const TEAMS_FILE: &str = "teams.json";
pub const ENRICHED_FILE: &str = "elements_prepped.json";
pub const HISTORY_DIR: &str = "history";

/// Collections kept as snapshots.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Category {
    Players,
    Teams,
}

impl Category {
    /// Prefix used in historical file names.
    pub fn prefix(&self) -> &'static str {
        match self {
            Category::Players => "elements",
            Category::Teams => "teams",
        }
    }
}

/// Handle on the data directory.
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    data_dir: PathBuf,
}

impl SnapshotStore {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn players_path(&self) -> PathBuf {
        self.data_dir.join(PLAYERS_FILE)
    }

    pub fn teams_path(&self) -> PathBuf {
        self.data_dir.join(TEAMS_FILE)
    }

    pub fn enriched_path(&self) -> PathBuf {
        self.data_dir.join(ENRICHED_FILE)
    }

    pub fn current_path(&self, category: Category) -> PathBuf {
        match category {
            Category::Players => self.players_path(),
            Category::Teams => self.teams_path(),
        }
    }

    /// Historical copy name: day, zero-based month, hour and minute, unpadded.
    /// Two fetches in the same minute share a file.
    pub fn history_path(&self, category: Category, at: DateTime<Utc>) -> PathBuf {
        let name = format!(
            "{}_{}_{}_{}{}.json",
            category.prefix(),
            at.day(),
            at.month0(),
            at.hour(),
            at.minute()
        );
        self.data_dir.join(HISTORY_DIR).join(name)
    }

    /// Serializes `value` as compact JSON and overwrites `path`.
    pub fn write_json<T: Serialize + ?Sized>(&self, path: &Path, value: &T) -> Result<(), SnapshotError> {
        write_json(path, value)
    }

    /// Reads and deserializes a JSON snapshot.
    pub fn read_json<T: DeserializeOwned>(&self, path: &Path) -> Result<T, SnapshotError> {
        read_json(path)
    }
}

/// Serializes `value` as compact JSON and overwrites `path`.
/// Parent directories are created as needed.
pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), SnapshotError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|source| SnapshotError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    let bytes = serde_json::to_vec(value).map_err(|source| SnapshotError::Json {
        path: path.to_path_buf(),
        source,
    })?;

    fs::write(path, &bytes).map_err(|source| SnapshotError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    debug!("Snapshot: Wrote {} bytes to {}", bytes.len(), path.display());
    Ok(())
}

pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, SnapshotError> {
    let bytes = fs::read(path).map_err(|source| SnapshotError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    serde_json::from_slice(&bytes).map_err(|source| SnapshotError::Json {
        path: path.to_path_buf(),
        source,
    })
}

// =============================================================================
// Tests
// =============================================================================
