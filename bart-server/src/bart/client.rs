//! BART legacy API HTTP client.
//!
//! Provides async methods for the real-time departure (`etd.aspx`) and
//! trip schedule (`sched.aspx`) endpoints. Responses are normalized before
//! they leave this module, so callers never see the raw JSON.

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tokio::sync::Semaphore;
use tracing::{debug, warn};

use crate::domain::{Direction, StationCode};

use super::error::BartError;
use super::normalize::{EtdBoard, TripCandidate, normalize_etd, normalize_schedule};

/// Default base URL for the BART API.
const DEFAULT_BASE_URL: &str = "https://api.bart.gov/api";

/// Default maximum concurrent requests.
const DEFAULT_MAX_CONCURRENT: usize = 5;

/// How much of an unparseable body to keep for diagnostics.
const BODY_SNIPPET_CHARS: usize = 500;

/// Configuration for the BART client.
#[derive(Debug, Clone)]
pub struct BartConfig {
    /// API key, sent as the `key` query parameter
    pub api_key: String,
    /// Base URL for the API (defaults to production)
    pub base_url: String,
    /// Maximum concurrent requests
    pub max_concurrent: usize,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl BartConfig {
    /// Create a new config with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            max_concurrent: DEFAULT_MAX_CONCURRENT,
            timeout_secs: 30,
        }
    }

    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set maximum concurrent requests.
    pub fn with_max_concurrent(mut self, n: usize) -> Self {
        self.max_concurrent = n;
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// BART API client.
///
/// Uses a semaphore to limit concurrent requests.
#[derive(Debug, Clone)]
pub struct BartClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    semaphore: Arc<Semaphore>,
}

impl BartClient {
    /// Create a new BART client with the given configuration.
    pub fn new(config: BartConfig) -> Result<Self, BartError> {
        if config.api_key.trim().is_empty() {
            return Err(BartError::NotConfigured("empty API key".to_string()));
        }

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key,
            semaphore: Arc::new(Semaphore::new(config.max_concurrent.max(1))),
        })
    }

    /// Real-time departures from `station` in `direction`.
    pub async fn get_departures(
        &self,
        station: &StationCode,
        direction: Direction,
    ) -> Result<EtdBoard, BartError> {
        let doc = self
            .get_json(
                "etd.aspx",
                &[
                    ("cmd", "etd"),
                    ("orig", station.as_str()),
                    ("dir", direction.as_query()),
                ],
            )
            .await?;

        let board = normalize_etd(&doc)?;
        debug!(
            %station,
            %direction,
            groups = board.groups.len(),
            "fetched departures"
        );
        Ok(board)
    }

    /// Scheduled trips departing now from `origin` to `destination`.
    ///
    /// Asks for the next two departures (`b=0&a=2`) so that the caller
    /// has more than one itinerary to choose a duration from.
    pub async fn get_trips(
        &self,
        origin: &StationCode,
        destination: &StationCode,
    ) -> Result<Vec<TripCandidate>, BartError> {
        let doc = self
            .get_json(
                "sched.aspx",
                &[
                    ("cmd", "depart"),
                    ("orig", origin.as_str()),
                    ("dest", destination.as_str()),
                    ("date", "now"),
                    ("time", "now"),
                    ("b", "0"),
                    ("a", "2"),
                    ("l", "1"),
                ],
            )
            .await?;

        let trips = normalize_schedule(&doc)?;
        debug!(%origin, %destination, trips = trips.len(), "fetched schedule");
        Ok(trips)
    }

    async fn get_json(&self, endpoint: &str, params: &[(&str, &str)]) -> Result<Value, BartError> {
        let _permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|_| BartError::NotConfigured("semaphore closed".to_string()))?;

        let url = format!("{}/{}", self.base_url, endpoint);

        let response = self
            .http
            .get(&url)
            .query(params)
            .query(&[("key", self.api_key.as_str()), ("json", "y")])
            .send()
            .await?;

        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(%endpoint, status = status.as_u16(), "BART request failed");
            return Err(BartError::Api {
                status: status.as_u16(),
                message: body.chars().take(BODY_SNIPPET_CHARS).collect(),
            });
        }

        let body = response.text().await?;

        serde_json::from_str(&body).map_err(|e| BartError::Json {
            message: e.to_string(),
            body: Some(body.chars().take(BODY_SNIPPET_CHARS).collect()),
        })
    }
}
