//! Mock BART feed for running without API access.
//!
//! Loads raw upstream JSON from a directory and serves it through the
//! same normalizer as the live client. Files are named
//! `etd_{STATION}_{dir}.json` (e.g. `etd_PHIL_s.json`) and
//! `sched_{ORIG}_{DEST}.json` (e.g. `sched_PHIL_EMBR.json`).

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use serde_json::Value;
use tokio::sync::RwLock;
use tracing::info;

use crate::domain::{Direction, StationCode};

use super::error::BartError;
use super::normalize::{EtdBoard, TripCandidate, normalize_etd, normalize_schedule};
use super::source::FeedSource;

/// Mock BART client that serves fixture files.
#[derive(Clone)]
pub struct MockBartClient {
    /// Raw documents keyed by file stem.
    documents: Arc<RwLock<HashMap<String, Value>>>,
    requests: Arc<AtomicUsize>,
}

impl MockBartClient {
    /// Create a mock client by loading every `.json` file in `data_dir`.
    pub fn new(data_dir: impl AsRef<Path>) -> Result<Self, BartError> {
        let documents = load_documents(data_dir.as_ref())?;
        info!(
            files = documents.len(),
            dir = %data_dir.as_ref().display(),
            "loaded mock feed"
        );

        Ok(Self {
            documents: Arc::new(RwLock::new(documents)),
            requests: Arc::new(AtomicUsize::new(0)),
        })
    }

    /// Number of feed requests served so far.
    pub fn request_count(&self) -> usize {
        self.requests.load(Ordering::Relaxed)
    }

    /// Reload fixtures from disk.
    pub async fn reload(&self, data_dir: impl AsRef<Path>) -> Result<(), BartError> {
        let fresh = load_documents(data_dir.as_ref())?;
        *self.documents.write().await = fresh;
        Ok(())
    }

    async fn document(&self, key: &str) -> Result<Value, BartError> {
        self.requests.fetch_add(1, Ordering::Relaxed);
        let documents = self.documents.read().await;
        documents.get(key).cloned().ok_or_else(|| BartError::Api {
            status: 404,
            message: format!("no mock data for {key}"),
        })
    }
}

impl FeedSource for MockBartClient {
    async fn departures(
        &self,
        station: StationCode,
        direction: Direction,
    ) -> Result<EtdBoard, BartError> {
        let doc = self
            .document(&format!("etd_{}_{}", station, direction.as_query()))
            .await?;
        Ok(normalize_etd(&doc)?)
    }

    async fn trips(
        &self,
        origin: StationCode,
        destination: StationCode,
    ) -> Result<Vec<TripCandidate>, BartError> {
        let doc = self
            .document(&format!("sched_{origin}_{destination}"))
            .await?;
        Ok(normalize_schedule(&doc)?)
    }
}

fn load_documents(data_dir: &Path) -> Result<HashMap<String, Value>, BartError> {
    let entries = std::fs::read_dir(data_dir).map_err(|e| {
        BartError::NotConfigured(format!("failed to read mock data directory: {e}"))
    })?;

    let mut documents = HashMap::new();
    for entry in entries {
        let path = entry
            .map_err(|e| BartError::NotConfigured(format!("failed to read directory entry: {e}")))?
            .path();

        if !path.is_file() || path.extension().and_then(|s| s.to_str()) != Some("json") {
            continue;
        }

        let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };

        let json = std::fs::read_to_string(&path)
            .map_err(|e| BartError::NotConfigured(format!("failed to read {path:?}: {e}")))?;
        let doc: Value = serde_json::from_str(&json).map_err(|e| BartError::Json {
            message: format!("{path:?}: {e}"),
            body: None,
        })?;

        documents.insert(stem.to_string(), doc);
    }

    if documents.is_empty() {
        return Err(BartError::NotConfigured(format!(
            "no mock feed files found in {data_dir:?}"
        )));
    }

    Ok(documents)
}
