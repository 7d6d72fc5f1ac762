//! Shape normalization for BART feed responses.
//!
//! The BART API's JSON is translated from XML, so its shape depends on
//! the data: a node holding one result may arrive as a bare object or as
//! a one-element array, and XML attributes surface as `@`-prefixed keys
//! (`@tripTime`) where other responses use plain keys (`tripTime`).
//!
//! Everything here is a pure function from a `serde_json::Value` to the
//! canonical records below. Fields are looked up by their plain spelling
//! first and their `@` spelling second. A record missing a required field
//! is dropped, never filled with a default. A missing container is a
//! [`ShapeError`], which is distinct from a container holding no items.

use serde_json::{Map, Value};
use tracing::debug;

type Record = Map<String, Value>;

/// The upstream document did not have the expected structure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ShapeError {
    /// A container node that must exist was absent.
    #[error("feed response has no `{0}` node")]
    MissingContainer(&'static str),

    /// The feed replaced its payload with an error message.
    #[error("feed reported an error: {0}")]
    Upstream(String),
}

/// How a JSON node is shaped.
#[derive(Debug, Clone, Copy)]
pub enum Shape<'a> {
    /// Missing or `null`.
    Absent,
    Scalar(&'a Value),
    Record(&'a Record),
    Sequence(&'a [Value]),
}

impl<'a> Shape<'a> {
    pub fn of(value: Option<&'a Value>) -> Self {
        match value {
            None | Some(Value::Null) => Shape::Absent,
            Some(Value::Object(map)) => Shape::Record(map),
            Some(Value::Array(items)) => Shape::Sequence(items),
            Some(other) => Shape::Scalar(other),
        }
    }

    /// All records at this node, in document order. A bare object is a
    /// sequence of one; non-object elements are skipped.
    pub fn records(self) -> Vec<&'a Record> {
        match self {
            Shape::Record(map) => vec![map],
            Shape::Sequence(items) => items.iter().filter_map(Value::as_object).collect(),
            Shape::Absent | Shape::Scalar(_) => Vec::new(),
        }
    }

    /// The first record at this node.
    pub fn first_record(self) -> Option<&'a Record> {
        match self {
            Shape::Record(map) => Some(map),
            Shape::Sequence(items) => items.iter().find_map(Value::as_object),
            Shape::Absent | Shape::Scalar(_) => None,
        }
    }

    /// Scalar text at this node. A one-element sequence is unwrapped;
    /// blank strings count as absent.
    pub fn text(self) -> Option<String> {
        match self {
            Shape::Scalar(Value::String(s)) => {
                let s = s.trim();
                (!s.is_empty()).then(|| s.to_string())
            }
            Shape::Scalar(Value::Number(n)) => Some(n.to_string()),
            Shape::Scalar(Value::Bool(b)) => Some(b.to_string()),
            Shape::Sequence([single]) => Shape::of(Some(single)).text(),
            _ => None,
        }
    }

    fn is_absent(&self) -> bool {
        matches!(self, Shape::Absent)
    }
}

/// Look up a field by its plain key, then by its `@`-prefixed key.
pub fn field<'a>(record: &'a Record, name: &str) -> Shape<'a> {
    let plain = Shape::of(record.get(name));
    if !plain.is_absent() {
        return plain;
    }
    Shape::of(record.get(&format!("@{name}")))
}

/// Scalar text of a field under either spelling. A plain spelling with
/// no usable text falls through to the `@` spelling.
pub fn field_text(record: &Record, name: &str) -> Option<String> {
    Shape::of(record.get(name))
        .text()
        .or_else(|| Shape::of(record.get(&format!("@{name}"))).text())
}

/// Canonical real-time board for one station and direction.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EtdBoard {
    pub station_name: Option<String>,
    /// The feed's own "date time" stamp, when it sent one.
    pub generated_at: Option<String>,
    pub groups: Vec<EtdGroup>,
}

/// Estimates for trains bound for one terminal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EtdGroup {
    pub destination: String,
    pub abbreviation: Option<String>,
    pub estimates: Vec<EstimateRecord>,
}

/// One raw countdown entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EstimateRecord {
    /// `"Leaving"` or a whole number of minutes, as sent.
    pub minutes: String,
    pub platform: Option<String>,
    pub hexcolor: Option<String>,
}

/// One raw itinerary from the schedule feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TripCandidate {
    pub origin: Option<String>,
    pub destination: Option<String>,
    /// Trip duration in minutes, as sent.
    pub trip_time: String,
}

/// Normalize an `etd.aspx?cmd=etd` response.
///
/// Path: `root` → `station` (first) → `etd` (all) → `estimate` (all).
/// A station node with no `etd` is a valid, empty board.
pub fn normalize_etd(doc: &Value) -> Result<EtdBoard, ShapeError> {
    let root = root_record(doc)?;
    let station = field(root, "station")
        .first_record()
        .ok_or(ShapeError::MissingContainer("root.station"))?;

    let groups = field(station, "etd")
        .records()
        .into_iter()
        .filter_map(etd_group)
        .collect();

    let generated_at = match (field_text(root, "date"), field_text(root, "time")) {
        (Some(date), Some(time)) => Some(format!("{date} {time}")),
        (None, time) => time,
        (Some(_), None) => None,
    };

    Ok(EtdBoard {
        station_name: field_text(station, "name"),
        generated_at,
        groups,
    })
}

/// Normalize a `sched.aspx?cmd=depart` response.
///
/// Path: `root` → `schedule` (first) → `request` (first) → `trip` (all).
/// A request node without trips yields an empty list.
pub fn normalize_schedule(doc: &Value) -> Result<Vec<TripCandidate>, ShapeError> {
    let root = root_record(doc)?;
    let schedule = field(root, "schedule")
        .first_record()
        .ok_or(ShapeError::MissingContainer("root.schedule"))?;
    let request = field(schedule, "request")
        .first_record()
        .ok_or(ShapeError::MissingContainer("root.schedule.request"))?;

    Ok(field(request, "trip")
        .records()
        .into_iter()
        .filter_map(trip_candidate)
        .collect())
}

fn root_record(doc: &Value) -> Result<&Record, ShapeError> {
    let root = Shape::of(Some(doc))
        .first_record()
        .and_then(|top| field(top, "root").first_record())
        .ok_or(ShapeError::MissingContainer("root"))?;

    if let Some(message) = upstream_error(root) {
        return Err(ShapeError::Upstream(message));
    }
    Ok(root)
}

/// `root.message.error.{text,details}`, which BART sends instead of data
/// for bad keys and unknown stations.
fn upstream_error(root: &Record) -> Option<String> {
    let error = field(root, "message")
        .first_record()
        .and_then(|m| field(m, "error").first_record())?;

    match (field_text(error, "text"), field_text(error, "details")) {
        (Some(text), Some(details)) => Some(format!("{text}: {details}")),
        (Some(text), None) => Some(text),
        (None, Some(details)) => Some(details),
        (None, None) => Some("unspecified error".to_string()),
    }
}

fn etd_group(record: &Record) -> Option<EtdGroup> {
    let Some(destination) = field_text(record, "destination") else {
        debug!("dropping etd group without destination");
        return None;
    };

    let estimates = field(record, "estimate")
        .records()
        .into_iter()
        .filter_map(estimate_record)
        .collect();

    Some(EtdGroup {
        destination,
        abbreviation: field_text(record, "abbreviation"),
        estimates,
    })
}

fn estimate_record(record: &Record) -> Option<EstimateRecord> {
    let Some(minutes) = field_text(record, "minutes") else {
        debug!("dropping estimate without minutes");
        return None;
    };

    Some(EstimateRecord {
        minutes,
        platform: field_text(record, "platform"),
        hexcolor: field_text(record, "hexcolor"),
    })
}

fn trip_candidate(record: &Record) -> Option<TripCandidate> {
    let Some(trip_time) = field_text(record, "tripTime") else {
        debug!("dropping trip without tripTime");
        return None;
    };

    Some(TripCandidate {
        origin: field_text(record, "origin"),
        destination: field_text(record, "destination"),
        trip_time,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn etd_doc() -> Value {
        json!({
            "root": {
                "@id": "1",
                "date": "10/19/2026",
                "time": "05:31:07 PM PDT",
                "station": [{
                    "name": "Pleasant Hill/Contra Costa Centre",
                    "abbr": "PHIL",
                    "etd": [
                        {
                            "destination": "Daly City",
                            "abbreviation": "DALY",
                            "estimate": [
                                {"minutes": "Leaving", "platform": "2", "color": "YELLOW", "hexcolor": "#ffff33"},
                                {"minutes": "12", "platform": "2", "color": "YELLOW", "hexcolor": "#ffff33"}
                            ]
                        },
                        {
                            "destination": "SF Airport",
                            "abbreviation": "SFIA",
                            "estimate": {"minutes": "5", "platform": "2", "hexcolor": "#ffff33"}
                        }
                    ]
                }]
            }
        })
    }

    #[test]
    fn etd_board_is_flattened_in_order() {
        let board = normalize_etd(&etd_doc()).unwrap();

        assert_eq!(
            board.station_name.as_deref(),
            Some("Pleasant Hill/Contra Costa Centre")
        );
        assert_eq!(board.generated_at.as_deref(), Some("10/19/2026 05:31:07 PM PDT"));
        assert_eq!(board.groups.len(), 2);
        assert_eq!(board.groups[0].destination, "Daly City");
        assert_eq!(board.groups[0].estimates.len(), 2);
        assert_eq!(board.groups[0].estimates[0].minutes, "Leaving");
        assert_eq!(board.groups[1].abbreviation.as_deref(), Some("SFIA"));
        assert_eq!(board.groups[1].estimates[0].minutes, "5");
    }

    #[test]
    fn station_object_equals_station_array() {
        let mut doc = etd_doc();
        let station = doc["root"]["station"][0].clone();
        doc["root"]["station"] = station;

        assert_eq!(normalize_etd(&doc), normalize_etd(&etd_doc()));
    }

    #[test]
    fn station_without_etd_is_empty_not_missing() {
        let doc = json!({
            "root": {
                "station": {"name": "Antioch", "abbr": "ANTC"},
                "message": {"warning": "No data matched your criteria."}
            }
        });

        let board = normalize_etd(&doc).unwrap();
        assert!(board.groups.is_empty());
        assert_eq!(board.generated_at, None);
    }

    #[test]
    fn missing_containers_are_errors() {
        assert_eq!(
            normalize_etd(&json!({})),
            Err(ShapeError::MissingContainer("root"))
        );
        assert_eq!(
            normalize_etd(&json!({"root": {"date": "10/19/2026"}})),
            Err(ShapeError::MissingContainer("root.station"))
        );
        assert_eq!(
            normalize_etd(&json!({"root": {"station": []}})),
            Err(ShapeError::MissingContainer("root.station"))
        );
        assert_eq!(
            normalize_etd(&json!(null)),
            Err(ShapeError::MissingContainer("root"))
        );
    }

    #[test]
    fn upstream_error_message_is_reported() {
        let doc = json!({
            "root": {
                "message": {"error": {"text": "Invalid key", "details": "The api key was missing or invalid."}}
            }
        });

        assert_eq!(
            normalize_schedule(&doc),
            Err(ShapeError::Upstream(
                "Invalid key: The api key was missing or invalid.".to_string()
            ))
        );
    }

    #[test]
    fn records_missing_required_fields_are_dropped() {
        let doc = json!({
            "root": {"station": {"etd": [
                {"abbreviation": "DALY", "estimate": {"minutes": "3"}},
                {"destination": "Richmond", "estimate": [
                    {"platform": "1"},
                    {"minutes": "", "platform": "1"},
                    {"minutes": "9", "platform": "1"}
                ]}
            ]}}
        });

        let board = normalize_etd(&doc).unwrap();
        assert_eq!(board.groups.len(), 1);
        assert_eq!(board.groups[0].destination, "Richmond");
        assert_eq!(board.groups[0].estimates.len(), 1);
        assert_eq!(board.groups[0].estimates[0].minutes, "9");
    }

    #[test]
    fn schedule_reads_attribute_prefixed_trip_time() {
        let doc = json!({
            "root": {"schedule": {"request": {"trip": [
                {"@origin": "PHIL", "@destination": "EMBR", "@tripTime": "36"},
                {"@origin": "PHIL", "@destination": "EMBR", "@tripTime": "34"}
            ]}}}
        });

        let trips = normalize_schedule(&doc).unwrap();
        assert_eq!(trips.len(), 2);
        assert_eq!(trips[0].origin.as_deref(), Some("PHIL"));
        assert_eq!(trips[1].trip_time, "34");
    }

    #[test]
    fn schedule_with_arrays_at_every_level() {
        let doc = json!({
            "root": {"schedule": [{"request": [{"trip": {"tripTime": 19}}]}]}
        });

        let trips = normalize_schedule(&doc).unwrap();
        assert_eq!(trips.len(), 1);
        assert_eq!(trips[0].trip_time, "19");
    }

    #[test]
    fn plain_key_wins_over_attribute_key() {
        let doc = json!({
            "root": {"schedule": {"request": {"trip": {"tripTime": "19", "@tripTime": "99"}}}}
        });

        assert_eq!(normalize_schedule(&doc).unwrap()[0].trip_time, "19");
    }

    #[test]
    fn blank_plain_key_falls_through_to_attribute_key() {
        let doc = json!({
            "root": {"schedule": {"request": {"trip": {"tripTime": "", "@tripTime": "19"}}}}
        });
        let trips = normalize_schedule(&doc).unwrap();
        assert_eq!(trips.len(), 1);
        assert_eq!(trips[0].trip_time, "19");

        let doc = json!({
            "root": {"station": {"etd": {
                "destination": "Richmond",
                "estimate": {"minutes": [], "@minutes": "7"}
            }}}
        });
        let board = normalize_etd(&doc).unwrap();
        assert_eq!(board.groups[0].estimates.len(), 1);
        assert_eq!(board.groups[0].estimates[0].minutes, "7");
    }

    #[test]
    fn schedule_request_without_trips_is_empty() {
        let doc = json!({"root": {"schedule": {"request": {}}}});
        assert_eq!(normalize_schedule(&doc), Ok(Vec::new()));

        let doc = json!({"root": {"schedule": {}}});
        assert_eq!(
            normalize_schedule(&doc),
            Err(ShapeError::MissingContainer("root.schedule.request"))
        );
    }

    #[test]
    fn one_element_array_scalar_is_unwrapped() {
        let record = json!({"minutes": ["7"]});
        let record = record.as_object().unwrap();
        assert_eq!(field_text(record, "minutes").as_deref(), Some("7"));

        let record = json!({"minutes": ["7", "8"]});
        let record = record.as_object().unwrap();
        assert_eq!(field_text(record, "minutes"), None);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    /// Wrap a single record either bare or as a one-element array.
    fn wrap(value: Value, as_array: bool) -> Value {
        if as_array { json!([value]) } else { value }
    }

    fn arb_estimate() -> impl Strategy<Value = (String, String)> {
        (
            prop_oneof![Just("Leaving".to_string()), (0u32..90).prop_map(|n| n.to_string())],
            "[1-4]",
        )
    }

    proptest! {
        /// A singleton object and the equivalent one-element array
        /// normalize to the same board, at every nesting level.
        #[test]
        fn etd_shape_invariance(
            (minutes, platform) in arb_estimate(),
            station_arr in any::<bool>(),
            etd_arr in any::<bool>(),
            est_arr in any::<bool>(),
            attr_keys in any::<bool>(),
        ) {
            let key = |k: &str| if attr_keys { format!("@{k}") } else { k.to_string() };
            let mut estimate = Map::new();
            estimate.insert(key("minutes"), json!(minutes));
            estimate.insert(key("platform"), json!(platform));

            let canonical = json!({"root": {"station": [{"abbr": "PHIL", "etd": [{
                "destination": "Daly City",
                "estimate": [{"minutes": minutes, "platform": platform}]
            }]}]}});

            let etd = json!({"destination": "Daly City", "estimate": wrap(Value::Object(estimate), est_arr)});
            let station = json!({"abbr": "PHIL", "etd": wrap(etd, etd_arr)});
            let doc = json!({"root": {"station": wrap(station, station_arr)}});

            prop_assert_eq!(normalize_etd(&doc), normalize_etd(&canonical));
        }

        /// Trip lists normalize identically whatever the envelope shape.
        #[test]
        fn schedule_shape_invariance(
            minutes in 0u32..240,
            schedule_arr in any::<bool>(),
            request_arr in any::<bool>(),
            trip_arr in any::<bool>(),
            attr_key in any::<bool>(),
        ) {
            let mut trip = Map::new();
            let key = if attr_key { "@tripTime" } else { "tripTime" };
            trip.insert(key.to_string(), json!(minutes.to_string()));

            let request = json!({"trip": wrap(Value::Object(trip), trip_arr)});
            let schedule = json!({"request": wrap(request, request_arr)});
            let doc = json!({"root": {"schedule": wrap(schedule, schedule_arr)}});

            let trips = normalize_schedule(&doc).unwrap();
            prop_assert_eq!(trips.len(), 1);
            prop_assert_eq!(&trips[0].trip_time, &minutes.to_string());
        }
    }
}
