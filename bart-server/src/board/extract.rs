//! Departure extraction from a normalized real-time board.

use tracing::debug;

use crate::bart::EtdBoard;
use crate::domain::{DepartureEstimate, Minutes};

/// Flatten a board's per-terminal groups into one list of estimates.
///
/// Upstream order is kept: groups in feed order, estimates within each
/// group in feed order. Nothing is re-sorted. Estimates whose minutes
/// are neither `Leaving` nor a whole number are dropped.
pub fn extract_departures(board: &EtdBoard) -> Vec<DepartureEstimate> {
    board
        .groups
        .iter()
        .flat_map(|group| {
            group.estimates.iter().filter_map(move |est| {
                let Some(minutes) = Minutes::parse(&est.minutes) else {
                    debug!(raw = %est.minutes, destination = %group.destination, "dropping estimate with unreadable minutes");
                    return None;
                };

                Some(DepartureEstimate {
                    minutes,
                    destination: group.destination.clone(),
                    abbreviation: group.abbreviation.clone(),
                    platform: est.platform.clone(),
                    line_color: est.hexcolor.clone(),
                })
            })
        })
        .collect()
}
