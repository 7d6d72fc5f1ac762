//! Caching layer for BART API responses.
//!
//! Normalized responses are cached briefly so HTTP requests share upstream
//! calls. The poller always fetches a fresh board, which also refreshes
//! the cached one.
//! Real-time boards go stale quickly and get a short TTL; trip schedules
//! change rarely and are kept longer. Only successful responses are
//! cached.

use std::time::Duration;

use moka::future::Cache as MokaCache;
use tracing::trace;

use crate::bart::{BartClient, BartError, EtdBoard, FeedSource, TripCandidate};
use crate::domain::{Direction, StationCode};

/// Cache key for real-time boards.
type BoardKey = (StationCode, Direction);

/// Cache key for trip lists.
type TripsKey = (StationCode, StationCode);

/// Configuration for the cache.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// TTL for real-time boards.
    pub board_ttl: Duration,

    /// TTL for scheduled trip lists.
    pub trips_ttl: Duration,

    /// Maximum number of entries per cache.
    pub max_capacity: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            board_ttl: Duration::from_secs(15),
            trips_ttl: Duration::from_secs(10 * 60),
            max_capacity: 1000,
        }
    }
}

/// Cache for BART API responses.
pub struct BartCache {
    boards: MokaCache<BoardKey, EtdBoard>,
    trips: MokaCache<TripsKey, Vec<TripCandidate>>,
}

impl BartCache {
    /// Create a new cache with the given configuration.
    pub fn new(config: &CacheConfig) -> Self {
        Self {
            boards: MokaCache::builder()
                .time_to_live(config.board_ttl)
                .max_capacity(config.max_capacity)
                .build(),
            trips: MokaCache::builder()
                .time_to_live(config.trips_ttl)
                .max_capacity(config.max_capacity)
                .build(),
        }
    }

    pub async fn get_board(&self, key: &BoardKey) -> Option<EtdBoard> {
        self.boards.get(key).await
    }

    pub async fn insert_board(&self, key: BoardKey, board: EtdBoard) {
        self.boards.insert(key, board).await;
    }

    pub async fn get_trips(&self, key: &TripsKey) -> Option<Vec<TripCandidate>> {
        self.trips.get(key).await
    }

    pub async fn insert_trips(&self, key: TripsKey, trips: Vec<TripCandidate>) {
        self.trips.insert(key, trips).await;
    }

    /// Invalidate all cached entries.
    pub fn invalidate_all(&self) {
        self.boards.invalidate_all();
        self.trips.invalidate_all();
    }
}

/// Feed with caching. Wraps the live client in the running server.
pub struct CachedBartClient<S = BartClient> {
    client: S,
    cache: BartCache,
}

impl<S: FeedSource> CachedBartClient<S> {
    /// Create a new cached client.
    pub fn new(client: S, cache_config: &CacheConfig) -> Self {
        Self {
            client,
            cache: BartCache::new(cache_config),
        }
    }

    /// The wrapped feed.
    pub fn inner(&self) -> &S {
        &self.client
    }
}

impl<S: FeedSource> FeedSource for CachedBartClient<S> {
    async fn departures(
        &self,
        station: StationCode,
        direction: Direction,
    ) -> Result<EtdBoard, BartError> {
        let key = (station, direction);
        if let Some(board) = self.cache.get_board(&key).await {
            trace!(%station, %direction, "board cache hit");
            return Ok(board);
        }

        self.fresh_departures(station, direction).await
    }

    /// Always goes upstream; a success replaces the cached board.
    async fn fresh_departures(
        &self,
        station: StationCode,
        direction: Direction,
    ) -> Result<EtdBoard, BartError> {
        let board = self.client.departures(station, direction).await?;
        self.cache.insert_board((station, direction), board.clone()).await;
        Ok(board)
    }

    async fn trips(
        &self,
        origin: StationCode,
        destination: StationCode,
    ) -> Result<Vec<TripCandidate>, BartError> {
        let key = (origin, destination);
        if let Some(trips) = self.cache.get_trips(&key).await {
            trace!(%origin, %destination, "trips cache hit");
            return Ok(trips);
        }

        let trips = self.client.trips(origin, destination).await?;
        self.cache.insert_trips(key, trips.clone()).await;
        Ok(trips)
    }
}
