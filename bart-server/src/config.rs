//! Process configuration.
//!
//! Read once at startup from environment variables. Lookups go through a
//! function so tests can supply values without touching the process
//! environment.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::bart::{BartClient, BartConfig, BartError, Feed, MockBartClient};
use crate::cache::{CacheConfig, CachedBartClient};
use crate::domain::{Direction, StationCode};
use crate::poll::{PollConfig, Selection};

const DEFAULT_BASE_URL: &str = "https://api.bart.gov/api";
const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("BART_API_KEY is not set")]
    MissingApiKey,

    #[error("invalid {var}: {reason}")]
    Invalid { var: &'static str, reason: String },

    #[error("could not set up feed: {0}")]
    Feed(#[from] BartError),
}

/// Everything the server reads from its environment.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    /// Serve fixtures from here instead of calling the live API.
    pub mock_dir: Option<PathBuf>,
    pub bind_addr: SocketAddr,
    pub refresh_interval: Duration,
    pub board_rows: usize,
    /// Selection the poller starts with.
    pub default_selection: Selection,
}

impl AppConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Read configuration through `lookup`. Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |var: &str| {
            lookup(var)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let bind_addr = parse_var("BIND_ADDR", get("BIND_ADDR"), DEFAULT_BIND_ADDR)?;
        let refresh_secs: u64 = parse_var("REFRESH_SECS", get("REFRESH_SECS"), "30")?;
        if refresh_secs == 0 {
            return Err(invalid("REFRESH_SECS", "must be at least 1"));
        }
        let board_rows: usize = parse_var("BOARD_ROWS", get("BOARD_ROWS"), "6")?;
        if board_rows == 0 {
            return Err(invalid("BOARD_ROWS", "must be at least 1"));
        }

        let station = station_var("DEFAULT_STATION", get("DEFAULT_STATION"), "PHIL")?;
        let destination = station_var("DEFAULT_DEST", get("DEFAULT_DEST"), "EMBR")?;
        let direction = Direction::parse(get("DEFAULT_DIR").as_deref().unwrap_or("s"))
            .map_err(|e| invalid("DEFAULT_DIR", e))?;
        let default_selection = Selection::new(station, direction, destination)
            .map_err(|e| invalid("DEFAULT_DEST", e))?;

        Ok(Self {
            api_key: get("BART_API_KEY"),
            base_url: get("BART_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            mock_dir: get("BART_MOCK_DIR").map(PathBuf::from),
            bind_addr,
            refresh_interval: Duration::from_secs(refresh_secs),
            board_rows,
            default_selection,
        })
    }

    /// Client configuration for the live API.
    pub fn bart_config(&self) -> Result<BartConfig, ConfigError> {
        let key = self.api_key.as_deref().ok_or(ConfigError::MissingApiKey)?;
        Ok(BartConfig::new(key).with_base_url(&self.base_url))
    }

    pub fn poll_config(&self) -> PollConfig {
        PollConfig::default()
            .with_interval(self.refresh_interval)
            .with_max_rows(self.board_rows)
    }

    /// The feed to serve: fixtures when a mock directory is set,
    /// otherwise the cached live client.
    pub fn feed(&self) -> Result<Feed, ConfigError> {
        if let Some(dir) = &self.mock_dir {
            return Ok(Feed::Mock(MockBartClient::new(dir)?));
        }
        let client = BartClient::new(self.bart_config()?)?;
        Ok(Feed::Live(CachedBartClient::new(
            client,
            &CacheConfig::default(),
        )))
    }
}

fn invalid(var: &'static str, reason: impl ToString) -> ConfigError {
    ConfigError::Invalid {
        var,
        reason: reason.to_string(),
    }
}

fn parse_var<T>(var: &'static str, value: Option<String>, default: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value
        .as_deref()
        .unwrap_or(default)
        .parse()
        .map_err(|e| invalid(var, e))
}

fn station_var(
    var: &'static str,
    value: Option<String>,
    default: &str,
) -> Result<StationCode, ConfigError> {
    StationCode::parse_normalized(value.as_deref().unwrap_or(default)).map_err(|e| invalid(var, e))
}
