//! Choosing departures relevant to the rider's destination.
//!
//! The real-time feed labels trains by terminal, not by every stop, so a
//! rider going to an intermediate station (Embarcadero, say) will rarely
//! see a train labelled with it. A terminal match is used when there is
//! one; otherwise every departure in the chosen direction is returned and
//! the result says so.

use serde::Serialize;

use crate::domain::{DepartureEstimate, StationCode, station_name};

/// How the departure list relates to the selected destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DestinationMatch {
    /// Only trains terminating at the destination are listed.
    Terminal,
    /// No train terminates there; all trains in the direction are listed.
    Unfiltered,
}

/// Keep trains that terminate at `destination`, or all of them if none do.
pub fn filter_for_destination(
    estimates: Vec<DepartureEstimate>,
    destination: &StationCode,
) -> (Vec<DepartureEstimate>, DestinationMatch) {
    let name = station_name(destination);

    let terminates_there = |est: &DepartureEstimate| match est.abbreviation.as_deref() {
        Some(abbr) => abbr.eq_ignore_ascii_case(destination.as_str()),
        None => name.is_some_and(|name| est.destination.eq_ignore_ascii_case(name)),
    };

    if estimates.iter().any(terminates_there) {
        let kept = estimates.into_iter().filter(|e| terminates_there(e)).collect();
        (kept, DestinationMatch::Terminal)
    } else {
        (estimates, DestinationMatch::Unfiltered)
    }
}
