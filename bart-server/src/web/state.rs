//! Application state for the web layer.

use std::sync::Arc;

use crate::bart::Feed;
use crate::poll::{PollerHandle, Selection};

use super::routes::AppError;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Upstream feed, if one could be configured
    feed: Option<Arc<Feed>>,

    /// Background board refresh for the current selection
    poller: Option<PollerHandle>,

    /// Why there is no feed
    setup_error: Option<Arc<str>>,

    /// Station and direction `/departures` falls back to
    pub defaults: Selection,

    /// Seconds between board refreshes, for the page's own reload
    pub refresh_secs: u64,
}

impl AppState {
    /// Create a new app state.
    pub fn new(feed: Arc<Feed>, poller: PollerHandle, refresh_secs: u64) -> Self {
        let defaults = poller.selection();
        Self {
            feed: Some(feed),
            poller: Some(poller),
            setup_error: None,
            defaults,
            refresh_secs,
        }
    }

    /// State for a server with no usable feed. Feed endpoints answer 500
    /// with `reason`.
    pub fn unconfigured(reason: impl Into<String>, defaults: Selection) -> Self {
        let reason: String = reason.into();
        Self {
            feed: None,
            poller: None,
            setup_error: Some(reason.into()),
            defaults,
            refresh_secs: 30,
        }
    }

    pub fn feed(&self) -> Result<&Feed, AppError> {
        self.feed.as_deref().ok_or_else(|| self.not_configured())
    }

    pub fn poller(&self) -> Result<&PollerHandle, AppError> {
        self.poller.as_ref().ok_or_else(|| self.not_configured())
    }

    fn not_configured(&self) -> AppError {
        AppError::Config {
            message: self
                .setup_error
                .as_deref()
                .unwrap_or("feed not configured")
                .to_string(),
        }
    }
}
