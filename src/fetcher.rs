// src/fetcher.rs
//
// Pulls one snapshot of players and teams from the external source and
// persists it untouched. Each successful run writes four files: a
// timestamped historical copy and the canonical current file for both
// collections. A failed run writes nothing.

use crate::error::FetchError;
use crate::snapshot::{Category, SnapshotStore};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::{error, info};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_SOURCE_URL: &str = "https://fantasy.premierleague.com/api/bootstrap-static/";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// The part of the source payload we keep. Records stay as raw JSON so the
/// snapshot files carry every field the source sent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Bootstrap {
    pub elements: Vec<serde_json::Value>,
    pub teams: Vec<serde_json::Value>,
}

/// Something that can produce a bootstrap payload.
#[async_trait]
pub trait SnapshotSource: Send + Sync {
    async fn fetch(&self) -> Result<Bootstrap, FetchError>;
}

/// The real HTTP source.
pub struct HttpSource {
    http_client: reqwest::Client,
    url: String,
}

impl HttpSource {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, FetchError> {
        let http_client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http_client,
            url: url.into(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl SnapshotSource for HttpSource {
    async fn fetch(&self) -> Result<Bootstrap, FetchError> {
        let response = self.http_client.get(&self.url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let body = response.bytes().await?;
        serde_json::from_slice(&body).map_err(|e| FetchError::Decode(e.to_string()))
    }
}

/// What a successful fetch wrote.
#[derive(Debug, Clone)]
pub struct FetchSummary {
    pub players: usize,
    pub teams: usize,
    pub written: Vec<PathBuf>,
}

/// Runs one fetch and writes the snapshot files stamped with `at`.
///
/// The payload is fully received and decoded before the first write, so a
/// transport failure leaves the existing files alone. The four writes are
/// not atomic as a group.
pub async fn fetch_snapshots(
    source: &dyn SnapshotSource,
    store: &SnapshotStore,
    at: DateTime<Utc>,
) -> Result<FetchSummary, FetchError> {
    let bootstrap = match source.fetch().await {
        Ok(b) => b,
        Err(e) => {
            error!("Fetcher: Fetch failed, keeping existing snapshots: {}", e);
            return Err(e);
        }
    };

    info!(
        "Fetcher: Received {} players and {} teams",
        bootstrap.elements.len(),
        bootstrap.teams.len()
    );

    let mut written = Vec::with_capacity(4);
    for (category, records) in [
        (Category::Players, &bootstrap.elements),
        (Category::Teams, &bootstrap.teams),
    ] {
        let history = store.history_path(category, at);
        store.write_json(&history, records)?;
        written.push(history);

        let current = store.current_path(category);
        store.write_json(&current, records)?;
        written.push(current);
    }

    info!("Fetcher: Wrote {} snapshot files", written.len());

    Ok(FetchSummary {
        players: bootstrap.elements.len(),
        teams: bootstrap.teams.len(),
        written,
    })
}

// =============================================================================
// Tests
// =============================================================================
