//! Poll state for one selection.
//!
//! A `PollState` belongs to exactly one [`Selection`]. Changing the
//! selection replaces the whole state with a fresh, idle one. Within a
//! selection the state moves `Idle → Fetching → Settled → Fetching → …`,
//! and a cycle's results are only accepted while the state is fetching
//! for that cycle's token.

use std::fmt;

use chrono::NaiveDateTime;
use serde::Serialize;
use tracing::debug;

use crate::bart::EtdBoard;
use crate::board::{
    BoardRow, DestinationMatch, extract_departures, filter_for_destination, project_rows,
};
use crate::domain::{DepartureEstimate, Direction, ResolvedDuration, StationCode};

/// Error returned when a selection names the same station twice.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("origin and destination are both {0}")]
pub struct SameStation(pub StationCode);

/// What the rider is looking at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Selection {
    pub station: StationCode,
    #[serde(rename = "dir")]
    pub direction: Direction,
    #[serde(rename = "dest")]
    pub destination: StationCode,
}

impl Selection {
    pub fn new(
        station: StationCode,
        direction: Direction,
        destination: StationCode,
    ) -> Result<Self, SameStation> {
        if station == destination {
            return Err(SameStation(station));
        }
        Ok(Self {
            station,
            direction,
            destination,
        })
    }
}

/// Identifies one refresh cycle. Tokens are never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CycleToken(pub u64);

impl fmt::Display for CycleToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Which upstream feed a failure came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedKind {
    Departures,
    Schedule,
}

/// Record of a failed fetch, kept until that feed next succeeds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedFailure {
    pub feed: FeedKind,
    pub message: String,
    pub at: NaiveDateTime,
}

/// How a cycle ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Success,
    PartialFailure,
    TotalFailure,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Fetching(CycleToken),
    Settled(Outcome),
}

/// Departures extracted from one successful real-time fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepartureFeed {
    pub station_name: Option<String>,
    pub generated_at: Option<String>,
    pub estimates: Vec<DepartureEstimate>,
}

impl DepartureFeed {
    pub fn from_board(board: &EtdBoard) -> Self {
        Self {
            station_name: board.station_name.clone(),
            generated_at: board.generated_at.clone(),
            estimates: extract_departures(board),
        }
    }
}

/// Both feed outcomes of one cycle.
#[derive(Debug, Clone)]
pub struct CycleReport {
    pub token: CycleToken,
    pub departures: Result<DepartureFeed, String>,
    pub duration: Result<ResolvedDuration, String>,
}

/// A report arrived for a cycle that is no longer current.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("cycle {0} is not the active cycle")]
pub struct StaleCycle(pub CycleToken);

/// Latest known good data for a selection.
#[derive(Debug, Clone)]
pub struct PollState {
    selection: Selection,
    phase: Phase,
    cycles: u64,
    departures: Option<DepartureFeed>,
    duration: Option<ResolvedDuration>,
    departures_error: Option<FeedFailure>,
    duration_error: Option<FeedFailure>,
    updated_at: Option<NaiveDateTime>,
}

impl PollState {
    /// A fresh, idle state with no data.
    pub fn new(selection: Selection) -> Self {
        Self {
            selection,
            phase: Phase::Idle,
            cycles: 0,
            departures: None,
            duration: None,
            departures_error: None,
            duration_error: None,
            updated_at: None,
        }
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn duration(&self) -> Option<ResolvedDuration> {
        self.duration
    }

    pub fn departures(&self) -> Option<&DepartureFeed> {
        self.departures.as_ref()
    }

    /// Mark `token` as the cycle in flight.
    pub fn begin_cycle(&mut self, token: CycleToken) {
        self.phase = Phase::Fetching(token);
    }

    /// Apply a finished cycle.
    ///
    /// Each feed is committed on its own: success replaces that field
    /// and clears its error, failure keeps the previous value and
    /// records the error. Reports for any cycle other than the one in
    /// flight are rejected without touching the state.
    pub fn commit(
        &mut self,
        report: CycleReport,
        now: NaiveDateTime,
    ) -> Result<Outcome, StaleCycle> {
        if self.phase != Phase::Fetching(report.token) {
            return Err(StaleCycle(report.token));
        }

        let departures_ok = match report.departures {
            Ok(feed) => {
                self.departures = Some(feed);
                self.departures_error = None;
                true
            }
            Err(message) => {
                debug!(%message, "departures fetch failed; keeping previous board");
                self.departures_error = Some(FeedFailure {
                    feed: FeedKind::Departures,
                    message,
                    at: now,
                });
                false
            }
        };

        let duration_ok = match report.duration {
            Ok(duration) => {
                self.duration = Some(duration);
                self.duration_error = None;
                true
            }
            Err(message) => {
                debug!(%message, "schedule fetch failed; keeping previous duration");
                self.duration_error = Some(FeedFailure {
                    feed: FeedKind::Schedule,
                    message,
                    at: now,
                });
                false
            }
        };

        if departures_ok || duration_ok {
            self.updated_at = Some(now);
        }

        let outcome = match (departures_ok, duration_ok) {
            (true, true) => Outcome::Success,
            (false, false) => Outcome::TotalFailure,
            _ => Outcome::PartialFailure,
        };

        self.cycles += 1;
        self.phase = Phase::Settled(outcome);
        Ok(outcome)
    }

    /// The merged view handed to the presentation layer.
    pub fn snapshot(&self, now: NaiveDateTime, max_rows: usize) -> BoardSnapshot {
        let (rows, destination_match) = match &self.departures {
            Some(feed) => {
                let (estimates, how) =
                    filter_for_destination(feed.estimates.clone(), &self.selection.destination);
                (project_rows(&estimates, self.duration, now, max_rows), Some(how))
            }
            None => (Vec::new(), None),
        };

        BoardSnapshot {
            selection: self.selection,
            phase: self.phase,
            cycles: self.cycles,
            station_name: self
                .departures
                .as_ref()
                .and_then(|f| f.station_name.clone()),
            feed_time: self
                .departures
                .as_ref()
                .and_then(|f| f.generated_at.clone()),
            rows,
            destination_match,
            duration: self.duration,
            departures_error: self.departures_error.clone(),
            duration_error: self.duration_error.clone(),
            updated_at: self.updated_at,
        }
    }
}

/// Published board for one selection at one moment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardSnapshot {
    pub selection: Selection,
    pub phase: Phase,
    /// Cycles committed for this selection.
    pub cycles: u64,
    pub station_name: Option<String>,
    pub feed_time: Option<String>,
    pub rows: Vec<BoardRow>,
    /// `None` until the first successful departures fetch.
    pub destination_match: Option<DestinationMatch>,
    pub duration: Option<ResolvedDuration>,
    pub departures_error: Option<FeedFailure>,
    pub duration_error: Option<FeedFailure>,
    pub updated_at: Option<NaiveDateTime>,
}
