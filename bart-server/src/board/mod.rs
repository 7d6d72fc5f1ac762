//! Turning normalized feeds into board rows.
//!
//! Everything here is synchronous and deterministic given its inputs:
//! extraction of departures, resolution of the trip duration, filtering
//! by destination and projection onto the wall clock.

mod extract;
mod filter;
mod project;
mod resolve;

pub use extract::extract_departures;
pub use filter::{DestinationMatch, filter_for_destination};
pub use project::{BoardRow, project, project_rows};
pub use resolve::{
    DurationUnavailable, fastest, parse_trip_minutes, resolve_duration, scheduled_trips,
};
