// src/error.rs

use std::path::PathBuf;
use thiserror::Error;

/// Failure reading or writing a snapshot file.
#[derive(Error, Debug)]
pub enum SnapshotError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Failure during a fetch cycle. Nothing is retried.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Source responded with status {0}")]
    Status(u16),

    #[error("Failed to decode source payload: {0}")]
    Decode(String),

    #[error(transparent)]
    Snapshot(#[from] SnapshotError),
}

/// Data-integrity failure that halts the enrichment pass.
#[derive(Error, Debug)]
pub enum EnrichError {
    #[error("Player {player_id}: field `{field}` is missing")]
    MissingMetric { player_id: i64, field: &'static str },

    #[error("Player {player_id}: field `{field}` is not numeric: {value:?}")]
    NonNumeric {
        player_id: i64,
        field: &'static str,
        value: String,
    },

    #[error("Player {player_id}: now_cost is {now_cost}, per-cost metrics are undefined")]
    NonPositiveCost { player_id: i64, now_cost: i64 },

    #[error("Player {player_id}: no team with code {team_code}")]
    UnknownTeam { player_id: i64, team_code: i64 },

    #[error("Team code {0} appears more than once")]
    DuplicateTeam(i64),

    #[error("Player {player_id}: element_type {element_type} is not a known position")]
    UnknownPosition { player_id: i64, element_type: i64 },

    #[error(transparent)]
    Snapshot(#[from] SnapshotError),
}

/// Caller error in a query. Reported back as a request error.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    #[error("Unknown sort field: {0}")]
    UnknownSortField(String),

    #[error("Sort field is not numeric: {0}")]
    NonNumericSortField(String),

    #[error("Invalid price range: minPrice ({min}) must be below maxPrice ({max})")]
    InvalidPriceRange { min: i64, max: i64 },
}
