//! Scheduled trips and the duration chosen from them.

use std::fmt;

use serde::Serialize;

use super::StationCode;

/// One itinerary candidate from the schedule feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduledTrip {
    pub origin: StationCode,
    pub destination: StationCode,
    pub duration_mins: u32,
}

/// The single trip duration used for arrival projection.
///
/// Always derived from at least one parsed candidate; there is no
/// default value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct ResolvedDuration(u32);

impl ResolvedDuration {
    pub fn from_minutes(minutes: u32) -> Self {
        Self(minutes)
    }

    pub fn minutes(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for ResolvedDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} min", self.0)
    }
}
