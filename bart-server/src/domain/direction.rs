//! Travel direction on the real-time feed.

use std::fmt;

use serde::{Serialize, Serializer};

/// Error returned when a direction is neither `s` nor `n`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid direction {input:?}: use 's' or 'n'")]
pub struct InvalidDirection {
    input: String,
}

/// Platform direction accepted by the ETD feed.
///
/// # Examples
///
/// ```
/// use bart_server::domain::Direction;
///
/// assert_eq!(Direction::parse("s").unwrap(), Direction::South);
/// assert_eq!(Direction::parse("N").unwrap(), Direction::North);
/// assert!(Direction::parse("south").is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    South,
    North,
}

impl Direction {
    /// Parse the single-letter query form. Case is ignored; anything
    /// other than one of the two letters is rejected.
    pub fn parse(s: &str) -> Result<Self, InvalidDirection> {
        match s.to_ascii_lowercase().as_str() {
            "s" => Ok(Direction::South),
            "n" => Ok(Direction::North),
            _ => Err(InvalidDirection {
                input: s.to_string(),
            }),
        }
    }

    /// The letter the upstream API expects.
    pub fn as_query(&self) -> &'static str {
        match self {
            Direction::South => "s",
            Direction::North => "n",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Direction::South => "South",
            Direction::North => "North",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_query())
    }
}

impl Serialize for Direction {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_query())
    }
}
