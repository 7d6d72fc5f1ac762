//! The seam between feed consumers and feed implementations.

use std::future::Future;

use crate::cache::CachedBartClient;
use crate::domain::{Direction, StationCode};

use super::client::BartClient;
use super::error::BartError;
use super::mock::MockBartClient;
use super::normalize::{EtdBoard, TripCandidate};

/// Anything that can answer the two feed queries.
///
/// The scheduler and the HTTP handlers depend on this rather than on the
/// concrete client, so tests can script responses.
pub trait FeedSource: Send + Sync + 'static {
    /// Normalized real-time board for a station and direction.
    fn departures(
        &self,
        station: StationCode,
        direction: Direction,
    ) -> impl Future<Output = Result<EtdBoard, BartError>> + Send;

    /// Like [`departures`](Self::departures), but never served from a
    /// cache. Countdowns in the result are relative to the moment of the
    /// call.
    fn fresh_departures(
        &self,
        station: StationCode,
        direction: Direction,
    ) -> impl Future<Output = Result<EtdBoard, BartError>> + Send {
        self.departures(station, direction)
    }

    /// Normalized trip candidates for an origin/destination pair.
    fn trips(
        &self,
        origin: StationCode,
        destination: StationCode,
    ) -> impl Future<Output = Result<Vec<TripCandidate>, BartError>> + Send;
}

impl FeedSource for BartClient {
    async fn departures(
        &self,
        station: StationCode,
        direction: Direction,
    ) -> Result<EtdBoard, BartError> {
        self.get_departures(&station, direction).await
    }

    async fn trips(
        &self,
        origin: StationCode,
        destination: StationCode,
    ) -> Result<Vec<TripCandidate>, BartError> {
        self.get_trips(&origin, &destination).await
    }
}

/// The feed the running server uses: live (behind the cache) or fixtures.
pub enum Feed {
    Live(CachedBartClient),
    Mock(MockBartClient),
}

impl FeedSource for Feed {
    async fn departures(
        &self,
        station: StationCode,
        direction: Direction,
    ) -> Result<EtdBoard, BartError> {
        match self {
            Feed::Live(client) => client.departures(station, direction).await,
            Feed::Mock(client) => client.departures(station, direction).await,
        }
    }

    async fn fresh_departures(
        &self,
        station: StationCode,
        direction: Direction,
    ) -> Result<EtdBoard, BartError> {
        match self {
            Feed::Live(client) => client.fresh_departures(station, direction).await,
            Feed::Mock(client) => client.fresh_departures(station, direction).await,
        }
    }

    async fn trips(
        &self,
        origin: StationCode,
        destination: StationCode,
    ) -> Result<Vec<TripCandidate>, BartError> {
        match self {
            Feed::Live(client) => client.trips(origin, destination).await,
            Feed::Mock(client) => client.trips(origin, destination).await,
        }
    }
}
