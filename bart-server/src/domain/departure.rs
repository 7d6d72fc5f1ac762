//! Real-time departure estimates.

use std::fmt;

use serde::{Serialize, Serializer};

/// The textual marker the ETD feed uses for a train at the platform.
pub const LEAVING: &str = "Leaving";

/// Countdown until a train departs.
///
/// The feed sends either a whole number of minutes or the word
/// `Leaving`. The two are kept apart so the board can say "Leaving"
/// while arithmetic treats it as zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Minutes {
    /// Departing now.
    Leaving,
    /// Departing in this many minutes.
    In(u32),
}

impl Minutes {
    /// Parse the feed's `minutes` field.
    ///
    /// Returns `None` for anything that is neither the sentinel nor a
    /// non-negative integer.
    ///
    /// ```
    /// use bart_server::domain::Minutes;
    ///
    /// assert_eq!(Minutes::parse("Leaving"), Some(Minutes::Leaving));
    /// assert_eq!(Minutes::parse("12"), Some(Minutes::In(12)));
    /// assert_eq!(Minutes::parse("-3"), None);
    /// ```
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        if s.eq_ignore_ascii_case(LEAVING) {
            return Some(Minutes::Leaving);
        }
        s.parse::<u32>().ok().map(Minutes::In)
    }

    /// Minutes used for arithmetic; the sentinel counts as zero.
    pub fn as_offset(&self) -> u32 {
        match self {
            Minutes::Leaving => 0,
            Minutes::In(n) => *n,
        }
    }
}

impl fmt::Display for Minutes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Minutes::Leaving => f.write_str(LEAVING),
            Minutes::In(n) => write!(f, "{n}"),
        }
    }
}

impl Serialize for Minutes {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// One countdown entry on the real-time board.
///
/// Built fresh every poll cycle and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DepartureEstimate {
    pub minutes: Minutes,
    /// Terminal name as printed by the feed (e.g. "Daly City").
    pub destination: String,
    /// Terminal station abbreviation, when the feed supplies one.
    pub abbreviation: Option<String>,
    pub platform: Option<String>,
    /// Line colour as `#rrggbb`.
    pub line_color: Option<String>,
}
