//! Trip duration resolution.
//!
//! The schedule feed returns several itineraries for a station pair (the
//! next few departures). The board needs one number, and uses the
//! fastest: the minimum duration among the parseable candidates.

use tracing::debug;

use crate::bart::TripCandidate;
use crate::domain::{ResolvedDuration, ScheduledTrip, StationCode};

/// Why no duration could be resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum DurationUnavailable {
    #[error("no trips returned")]
    NoTrips,

    #[error("no trip had a usable duration")]
    NoUsableDuration,
}

/// Parse a trip duration field.
///
/// Accepts numeric text such as `"19"` or `"19.0"`. Non-finite, negative
/// and fractional values are rejected.
///
/// ```
/// use bart_server::board::parse_trip_minutes;
///
/// assert_eq!(parse_trip_minutes("19"), Some(19));
/// assert_eq!(parse_trip_minutes("NaN"), None);
/// assert_eq!(parse_trip_minutes("-4"), None);
/// ```
pub fn parse_trip_minutes(raw: &str) -> Option<u32> {
    let n: f64 = raw.trim().parse().ok()?;
    if !n.is_finite() || n < 0.0 || n.fract() != 0.0 || n > f64::from(u32::MAX) {
        return None;
    }
    Some(n as u32)
}

/// Turn raw candidates into typed trips for `origin` → `destination`.
///
/// Candidates that name a different origin or destination, or whose
/// duration does not parse, are skipped.
pub fn scheduled_trips(
    origin: StationCode,
    destination: StationCode,
    candidates: &[TripCandidate],
) -> Vec<ScheduledTrip> {
    candidates
        .iter()
        .filter(|c| names_station(c.origin.as_deref(), &origin))
        .filter(|c| names_station(c.destination.as_deref(), &destination))
        .filter_map(|c| {
            let parsed = parse_trip_minutes(&c.trip_time);
            if parsed.is_none() {
                debug!(raw = %c.trip_time, "skipping trip with unusable duration");
            }
            parsed
        })
        .map(|duration_mins| ScheduledTrip {
            origin,
            destination,
            duration_mins,
        })
        .collect()
}

/// The minimum duration among `trips`.
pub fn fastest(trips: &[ScheduledTrip]) -> Option<ResolvedDuration> {
    trips
        .iter()
        .map(|t| t.duration_mins)
        .min()
        .map(ResolvedDuration::from_minutes)
}

/// Resolve the representative duration for a station pair.
///
/// Never invents a value: with no candidates, or none usable, the result
/// is [`DurationUnavailable`].
pub fn resolve_duration(
    origin: StationCode,
    destination: StationCode,
    candidates: &[TripCandidate],
) -> Result<ResolvedDuration, DurationUnavailable> {
    if candidates.is_empty() {
        return Err(DurationUnavailable::NoTrips);
    }
    fastest(&scheduled_trips(origin, destination, candidates))
        .ok_or(DurationUnavailable::NoUsableDuration)
}

/// A candidate with no station attribute is assumed to be for the
/// requested pair.
fn names_station(raw: Option<&str>, expected: &StationCode) -> bool {
    match raw {
        None => true,
        Some(raw) => StationCode::parse_normalized(raw).is_ok_and(|code| code == *expected),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn code(s: &str) -> StationCode {
        StationCode::parse(s).unwrap()
    }

    fn candidate(trip_time: &str) -> TripCandidate {
        TripCandidate {
            origin: Some("PHIL".to_string()),
            destination: Some("EMBR".to_string()),
            trip_time: trip_time.to_string(),
        }
    }

    fn resolve(times: &[&str]) -> Result<ResolvedDuration, DurationUnavailable> {
        let candidates: Vec<_> = times.iter().map(|t| candidate(t)).collect();
        resolve_duration(code("PHIL"), code("EMBR"), &candidates)
    }

    #[test]
    fn picks_the_minimum() {
        assert_eq!(resolve(&["12", "9", "15"]), Ok(ResolvedDuration::from_minutes(9)));
    }

    #[test]
    fn empty_is_unavailable_not_zero() {
        assert_eq!(resolve(&[]), Err(DurationUnavailable::NoTrips));
    }

    #[test]
    fn unparseable_values_are_ignored() {
        assert_eq!(
            resolve(&["abc", "22", "NaN", "-5", "inf", "19"]),
            Ok(ResolvedDuration::from_minutes(19))
        );
        assert_eq!(
            resolve(&["abc", "", "Infinity"]),
            Err(DurationUnavailable::NoUsableDuration)
        );
    }

    #[test]
    fn numeric_text_forms() {
        assert_eq!(parse_trip_minutes(" 36 "), Some(36));
        assert_eq!(parse_trip_minutes("36.0"), Some(36));
        assert_eq!(parse_trip_minutes("0"), Some(0));
        assert_eq!(parse_trip_minutes("36.5"), None);
        assert_eq!(parse_trip_minutes("1e12"), None);
    }

    #[test]
    fn candidates_for_other_pairs_are_skipped() {
        let mut other = candidate("3");
        other.destination = Some("MONT".to_string());

        let unlabeled = TripCandidate {
            origin: None,
            destination: None,
            trip_time: "40".to_string(),
        };

        let candidates = vec![other, candidate("36"), unlabeled];
        let trips = scheduled_trips(code("PHIL"), code("EMBR"), &candidates);

        assert_eq!(trips.len(), 2);
        assert_eq!(fastest(&trips), Some(ResolvedDuration::from_minutes(36)));
    }

    #[test]
    fn error_display() {
        assert_eq!(DurationUnavailable::NoTrips.to_string(), "no trips returned");
        assert_eq!(
            DurationUnavailable::NoUsableDuration.to_string(),
            "no trip had a usable duration"
        );
    }
}
