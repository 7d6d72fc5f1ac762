//! Data transfer objects for web requests and responses.

use serde::{Deserialize, Serialize};

use crate::board::{BoardRow, DestinationMatch};
use crate::domain::{DepartureEstimate, Direction, Station};
use crate::poll::{BoardSnapshot, Outcome, Phase, Selection};

/// Query for `/departures`.
#[derive(Debug, Deserialize)]
pub struct DeparturesRequest {
    /// Station code (defaults to the configured station)
    pub station: Option<String>,

    /// `s` or `n` (defaults to the configured direction)
    pub dir: Option<String>,
}

/// Live departures for one station and direction.
#[derive(Debug, Serialize)]
pub struct DeparturesResponse {
    /// Upstream station name, or the requested code
    pub station: String,

    pub dir: Direction,

    pub items: Vec<DepartureItem>,

    /// The feed's own timestamp; `null` when it sent none
    pub timestamp: Option<String>,
}

/// One departure in `/departures`.
#[derive(Debug, Serialize)]
pub struct DepartureItem {
    /// `"Leaving"` or whole minutes
    pub minutes: String,

    pub destination: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub hexcolor: Option<String>,
}

impl DepartureItem {
    pub fn from_estimate(est: &DepartureEstimate) -> Self {
        Self {
            minutes: est.minutes.to_string(),
            destination: est.destination.clone(),
            platform: est.platform.clone(),
            hexcolor: est.line_color.clone(),
        }
    }
}

/// Query for `/trip-time`.
#[derive(Debug, Deserialize)]
pub struct TripTimeRequest {
    pub orig: Option<String>,
    pub dest: Option<String>,
}

/// Fastest scheduled trip between two stations.
#[derive(Debug, Serialize)]
pub struct TripTimeResponse {
    #[serde(rename = "durationMin")]
    pub duration_min: u32,
}

/// Body of `PUT /api/selection`; also the query of `/`.
#[derive(Debug, Default, Deserialize)]
pub struct SelectionRequest {
    pub station: Option<String>,
    pub dir: Option<String>,
    pub dest: Option<String>,
}

impl SelectionRequest {
    pub fn is_empty(&self) -> bool {
        self.station.is_none() && self.dir.is_none() && self.dest.is_none()
    }
}

/// Acknowledgement of a selection change.
#[derive(Debug, Serialize)]
pub struct SelectionResponse {
    pub selection: Selection,
    /// `false` when the selection was already current
    pub changed: bool,
}

/// The published board as JSON.
#[derive(Debug, Serialize)]
pub struct BoardResponse {
    pub selection: Selection,

    /// Cycles committed for this selection
    pub cycle: u64,

    /// `null` until the first cycle settles
    pub outcome: Option<Outcome>,

    pub station_name: Option<String>,

    pub rows: Vec<BoardRow>,

    pub duration_min: Option<u32>,

    pub destination_match: Option<DestinationMatch>,

    pub departures_error: Option<String>,

    pub duration_error: Option<String>,

    pub feed_time: Option<String>,

    /// Local time of the last successful refresh
    pub updated_at: Option<String>,
}

impl BoardResponse {
    pub fn from_snapshot(snap: &BoardSnapshot) -> Self {
        let outcome = match snap.phase {
            Phase::Settled(outcome) => Some(outcome),
            Phase::Idle | Phase::Fetching(_) => None,
        };

        Self {
            selection: snap.selection,
            cycle: snap.cycles,
            outcome,
            station_name: snap.station_name.clone(),
            rows: snap.rows.clone(),
            duration_min: snap.duration.map(|d| d.minutes()),
            destination_match: snap.destination_match,
            departures_error: snap.departures_error.as_ref().map(|e| e.message.clone()),
            duration_error: snap.duration_error.as_ref().map(|e| e.message.clone()),
            feed_time: snap.feed_time.clone(),
            updated_at: snap
                .updated_at
                .map(|t| t.format("%Y-%m-%dT%H:%M:%S").to_string()),
        }
    }
}

/// Station list.
#[derive(Debug, Serialize)]
pub struct StationsResponse {
    pub stations: Vec<StationResult>,
}

#[derive(Debug, Serialize)]
pub struct StationResult {
    pub code: String,
    pub name: String,
}

impl From<Station> for StationResult {
    fn from(station: Station) -> Self {
        Self {
            code: station.code.to_string(),
            name: station.name.to_string(),
        }
    }
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Minutes, StationCode};
    use serde_json::json;

    #[test]
    fn departure_item_omits_missing_optionals() {
        let est = DepartureEstimate {
            minutes: Minutes::Leaving,
            destination: "Millbrae".to_string(),
            abbreviation: Some("MLBR".to_string()),
            platform: None,
            line_color: Some("#ff0000".to_string()),
        };

        let value = serde_json::to_value(DepartureItem::from_estimate(&est)).unwrap();
        assert_eq!(
            value,
            json!({"minutes": "Leaving", "destination": "Millbrae", "hexcolor": "#ff0000"})
        );
    }

    #[test]
    fn trip_time_uses_camel_case_key() {
        let value = serde_json::to_value(TripTimeResponse { duration_min: 24 }).unwrap();
        assert_eq!(value, json!({"durationMin": 24}));
    }

    #[test]
    fn departures_timestamp_is_null_when_absent() {
        let response = DeparturesResponse {
            station: "PHIL".to_string(),
            dir: Direction::South,
            items: Vec::new(),
            timestamp: None,
        };

        let value = serde_json::to_value(response).unwrap();
        assert_eq!(value["dir"], "s");
        assert!(value["timestamp"].is_null());
    }

    #[test]
    fn idle_board_has_no_outcome() {
        let selection = Selection::new(
            StationCode::parse("PHIL").unwrap(),
            Direction::South,
            StationCode::parse("EMBR").unwrap(),
        )
        .unwrap();
        let snap = crate::poll::PollState::new(selection).snapshot(
            chrono::NaiveDate::from_ymd_opt(2026, 10, 19)
                .unwrap()
                .and_hms_opt(9, 0, 0)
                .unwrap(),
            6,
        );

        let value = serde_json::to_value(BoardResponse::from_snapshot(&snap)).unwrap();
        assert!(value["outcome"].is_null());
        assert_eq!(value["cycle"], 0);
        assert_eq!(value["selection"], json!({"station": "PHIL", "dir": "s", "dest": "EMBR"}));
        assert_eq!(value["rows"], json!([]));
    }
}
