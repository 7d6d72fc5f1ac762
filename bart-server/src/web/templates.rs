//! Askama templates for the web frontend.

use askama::Template;

use crate::board::{BoardRow, DestinationMatch};
use crate::domain::catalog::stations;
use crate::domain::{Direction, LEAVING, StationCode, station_name};
use crate::poll::BoardSnapshot;

/// Shown in place of an arrival time when no trip duration is known.
pub const UNKNOWN_ARRIVAL: &str = "—";

/// The departure board page.
#[derive(Template)]
#[template(path = "board.html")]
pub struct BoardTemplate {
    pub origin_name: String,
    pub direction: &'static str,
    pub destination_name: String,
    pub rows: Vec<RowView>,
    pub notices: Vec<String>,
    /// No cycle has completed for this selection yet
    pub loading: bool,
    pub updated_at: Option<String>,
    pub refresh_secs: u64,
    pub stations: Vec<StationOption>,
    pub directions: Vec<DirectionOption>,
}

impl BoardTemplate {
    pub fn from_snapshot(snap: &BoardSnapshot, refresh_secs: u64) -> Self {
        let sel = snap.selection;
        let destination_name = display_name(&sel.destination);

        let mut notices = Vec::new();
        if snap.destination_match == Some(DestinationMatch::Unfiltered) && !snap.rows.is_empty() {
            notices.push(format!(
                "No train terminates at {destination_name}; showing all {} trains.",
                sel.direction.label().to_lowercase()
            ));
        }
        if let Some(err) = &snap.departures_error {
            notices.push(match snap.destination_match {
                Some(_) => format!(
                    "Live departures could not be refreshed ({}); showing the last known board.",
                    err.message
                ),
                None => format!("Live departures unavailable: {}", err.message),
            });
        }
        if let Some(err) = &snap.duration_error {
            notices.push(match snap.duration {
                Some(d) => format!(
                    "Trip time could not be refreshed ({}); using {d}.",
                    err.message
                ),
                None => format!("Trip time unavailable: {}", err.message),
            });
        }

        Self {
            origin_name: snap
                .station_name
                .clone()
                .unwrap_or_else(|| display_name(&sel.station)),
            direction: sel.direction.label(),
            destination_name,
            rows: snap.rows.iter().map(RowView::from_row).collect(),
            notices,
            loading: snap.cycles == 0,
            updated_at: snap.updated_at.map(|t| t.format("%H:%M:%S").to_string()),
            refresh_secs,
            stations: stations()
                .map(|s| StationOption {
                    code: s.code.to_string(),
                    name: s.name,
                    is_origin: s.code == sel.station,
                    is_destination: s.code == sel.destination,
                })
                .collect(),
            directions: [Direction::South, Direction::North]
                .into_iter()
                .map(|d| DirectionOption {
                    value: d.as_query(),
                    label: d.label(),
                    selected: d == sel.direction,
                })
                .collect(),
        }
    }
}

fn display_name(code: &StationCode) -> String {
    station_name(code).map_or_else(|| code.to_string(), str::to_string)
}

/// One board row for display.
#[derive(Debug, Clone)]
pub struct RowView {
    pub minutes: String,
    pub destination: String,
    pub platform: String,
    pub color: String,
    pub departs_at: String,
    pub arrives_at: String,
    pub arrives_in: String,
}

impl RowView {
    pub fn from_row(row: &BoardRow) -> Self {
        let minutes = if row.minutes == LEAVING {
            row.minutes.clone()
        } else {
            format!("{} min", row.departs_in_mins)
        };

        Self {
            minutes,
            destination: row.destination.clone(),
            platform: row.platform.clone().unwrap_or_default(),
            color: row.line_color.clone().unwrap_or_else(|| "#888888".to_string()),
            departs_at: row.departs_at.clone(),
            arrives_at: row
                .arrives_at
                .clone()
                .unwrap_or_else(|| UNKNOWN_ARRIVAL.to_string()),
            arrives_in: row
                .arrives_in_mins
                .map(|n| format!("in {n} min"))
                .unwrap_or_default(),
        }
    }
}

/// Entry in the station selectors.
#[derive(Debug, Clone)]
pub struct StationOption {
    pub code: String,
    pub name: &'static str,
    pub is_origin: bool,
    pub is_destination: bool,
}

#[derive(Debug, Clone)]
pub struct DirectionOption {
    pub value: &'static str,
    pub label: &'static str,
    pub selected: bool,
}
