//! Domain types for the departure board.
//!
//! All types enforce their invariants at construction time, so code
//! that receives them can trust their validity. Validation of rider
//! input (station codes, direction) happens here, before any upstream
//! call is made.

mod arrival;
pub mod catalog;
mod departure;
mod direction;
mod station;
mod trip;

pub use arrival::{Arrival, ProjectedArrival, clock_label};
pub use catalog::{Station, station_name};
pub use departure::{DepartureEstimate, LEAVING, Minutes};
pub use direction::{Direction, InvalidDirection};
pub use station::{InvalidStationCode, StationCode};
pub use trip::{ResolvedDuration, ScheduledTrip};
