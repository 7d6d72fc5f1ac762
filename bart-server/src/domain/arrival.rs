//! Projected departure and arrival times.

use chrono::NaiveDateTime;

/// When a train is expected at the rider's destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arrival {
    /// Departure offset plus the resolved trip duration.
    At { in_mins: u32, clock: NaiveDateTime },
    /// No trip duration is known, so no arrival is claimed.
    Unknown,
}

impl Arrival {
    pub fn clock(&self) -> Option<NaiveDateTime> {
        match self {
            Arrival::At { clock, .. } => Some(*clock),
            Arrival::Unknown => None,
        }
    }

    pub fn in_mins(&self) -> Option<u32> {
        match self {
            Arrival::At { in_mins, .. } => Some(*in_mins),
            Arrival::Unknown => None,
        }
    }
}

/// Wall-clock projection of one departure estimate.
///
/// Derived every cycle from an estimate and the current duration;
/// never stored beyond the snapshot it was computed for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProjectedArrival {
    pub departs_in_mins: u32,
    pub departs_at: NaiveDateTime,
    pub arrival: Arrival,
}

/// Format a wall-clock time the way the board shows it (24-hour `HH:MM`).
pub fn clock_label(t: NaiveDateTime) -> String {
    t.format("%H:%M").to_string()
}
