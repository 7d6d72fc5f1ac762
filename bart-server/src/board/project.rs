//! Arrival projection.
//!
//! Combines the live countdown with the scheduled trip duration:
//!
//! ```text
//! departs_at = now + minutes until departure   (Leaving counts as 0)
//! arrives_at = departs_at + trip duration      (only if a duration is known)
//! ```

use chrono::{Duration, NaiveDateTime};
use serde::Serialize;

use crate::domain::{
    Arrival, DepartureEstimate, ProjectedArrival, ResolvedDuration, clock_label,
};

/// Project one estimate onto the wall clock.
pub fn project(
    estimate: &DepartureEstimate,
    duration: Option<ResolvedDuration>,
    now: NaiveDateTime,
) -> ProjectedArrival {
    let departs_in_mins = estimate.minutes.as_offset();

    let arrival = match duration {
        Some(duration) => {
            let in_mins = departs_in_mins.saturating_add(duration.minutes());
            Arrival::At {
                in_mins,
                clock: now + Duration::minutes(i64::from(in_mins)),
            }
        }
        None => Arrival::Unknown,
    };

    ProjectedArrival {
        departs_in_mins,
        departs_at: now + Duration::minutes(i64::from(departs_in_mins)),
        arrival,
    }
}

/// One display-ready line of the board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BoardRow {
    /// `"Leaving"` or the minute count, as the feed sent it.
    pub minutes: String,
    pub destination: String,
    pub platform: Option<String>,
    pub line_color: Option<String>,
    pub departs_in_mins: u32,
    /// `HH:MM`
    pub departs_at: String,
    /// `None` when no trip duration is known.
    pub arrives_in_mins: Option<u32>,
    /// `HH:MM`, or `None` when no trip duration is known.
    pub arrives_at: Option<String>,
}

impl BoardRow {
    pub fn new(estimate: &DepartureEstimate, projection: &ProjectedArrival) -> Self {
        Self {
            minutes: estimate.minutes.to_string(),
            destination: estimate.destination.clone(),
            platform: estimate.platform.clone(),
            line_color: estimate.line_color.clone(),
            departs_in_mins: projection.departs_in_mins,
            departs_at: clock_label(projection.departs_at),
            arrives_in_mins: projection.arrival.in_mins(),
            arrives_at: projection.arrival.clock().map(clock_label),
        }
    }
}

/// Project the first `limit` estimates into board rows.
pub fn project_rows(
    estimates: &[DepartureEstimate],
    duration: Option<ResolvedDuration>,
    now: NaiveDateTime,
    limit: usize,
) -> Vec<BoardRow> {
    estimates
        .iter()
        .take(limit)
        .map(|est| BoardRow::new(est, &project(est, duration, now)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Minutes;
    use chrono::NaiveDate;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 10, 19)
            .unwrap()
            .and_hms_opt(17, 30, 0)
            .unwrap()
    }

    fn estimate(minutes: Minutes) -> DepartureEstimate {
        DepartureEstimate {
            minutes,
            destination: "Daly City".to_string(),
            abbreviation: Some("DALY".to_string()),
            platform: Some("2".to_string()),
            line_color: Some("#ffff33".to_string()),
        }
    }

    fn ten() -> Option<ResolvedDuration> {
        Some(ResolvedDuration::from_minutes(10))
    }

    #[test]
    fn leaving_plus_duration() {
        let p = project(&estimate(Minutes::Leaving), ten(), now());
        assert_eq!(p.departs_in_mins, 0);
        assert_eq!(p.departs_at, now());
        assert_eq!(p.arrival.clock(), Some(now() + Duration::minutes(10)));
    }

    #[test]
    fn minutes_plus_duration() {
        let p = project(&estimate(Minutes::In(7)), ten(), now());
        assert_eq!(p.departs_at, now() + Duration::minutes(7));
        assert_eq!(p.arrival.in_mins(), Some(17));
        assert_eq!(p.arrival.clock(), Some(now() + Duration::minutes(17)));
    }

    #[test]
    fn unknown_duration_gives_unknown_arrival() {
        let p = project(&estimate(Minutes::In(7)), None, now());
        assert_eq!(p.arrival, Arrival::Unknown);
        assert_eq!(p.departs_in_mins, 7);
    }

    #[test]
    fn rows_crossing_midnight() {
        let late = NaiveDate::from_ymd_opt(2026, 10, 19)
            .unwrap()
            .and_hms_opt(23, 55, 0)
            .unwrap();
        let rows = project_rows(&[estimate(Minutes::In(3))], ten(), late, 6);

        assert_eq!(rows[0].departs_at, "23:58");
        assert_eq!(rows[0].arrives_at.as_deref(), Some("00:08"));
    }

    #[test]
    fn rows_respect_limit_and_label_leaving() {
        let estimates: Vec<_> = [Minutes::Leaving, Minutes::In(4), Minutes::In(9)]
            .into_iter()
            .map(estimate)
            .collect();

        let rows = project_rows(&estimates, None, now(), 2);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].minutes, "Leaving");
        assert_eq!(rows[0].departs_at, "17:30");
        assert_eq!(rows[1].arrives_at, None);
        assert_eq!(rows[1].arrives_in_mins, None);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use crate::domain::Minutes;
    use chrono::NaiveDate;
    use proptest::prelude::*;

    proptest! {
        /// Arrival offset is always departure offset plus duration
        #[test]
        fn arrival_is_departure_plus_duration(mins in 0u32..120, duration in 0u32..180) {
            let now = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap().and_hms_opt(8, 0, 0).unwrap();
            let est = DepartureEstimate {
                minutes: Minutes::In(mins),
                destination: "Richmond".to_string(),
                abbreviation: None,
                platform: None,
                line_color: None,
            };

            let p = project(&est, Some(ResolvedDuration::from_minutes(duration)), now);
            prop_assert_eq!(p.arrival.in_mins(), Some(mins + duration));
            prop_assert_eq!(
                p.arrival.clock().unwrap() - p.departs_at,
                Duration::minutes(i64::from(duration))
            );
        }
    }
}
