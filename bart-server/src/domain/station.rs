//! Station code types.

use std::fmt;

use serde::{Serialize, Serializer};

/// Error returned when parsing an invalid station code.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid station code: {reason}")]
pub struct InvalidStationCode {
    reason: &'static str,
}

/// A valid 4-character BART station abbreviation.
///
/// Codes are uppercase ASCII letters and digits (`PHIL`, `EMBR`, `16TH`).
/// Any `StationCode` value is valid by construction.
///
/// # Examples
///
/// ```
/// use bart_server::domain::StationCode;
///
/// let phil = StationCode::parse("PHIL").unwrap();
/// assert_eq!(phil.as_str(), "PHIL");
///
/// // Digits are part of the alphabet
/// assert!(StationCode::parse("16TH").is_ok());
///
/// // Lowercase is rejected by `parse` but accepted by `parse_normalized`
/// assert!(StationCode::parse("phil").is_err());
/// assert!(StationCode::parse_normalized(" phil ").is_ok());
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StationCode([u8; 4]);

impl StationCode {
    /// Parse a station code that is already in canonical form.
    pub fn parse(s: &str) -> Result<Self, InvalidStationCode> {
        let bytes = s.as_bytes();

        if bytes.len() != 4 {
            return Err(InvalidStationCode {
                reason: "must be exactly 4 characters",
            });
        }

        for &b in bytes {
            if !(b.is_ascii_uppercase() || b.is_ascii_digit()) {
                return Err(InvalidStationCode {
                    reason: "must be uppercase ASCII letters or digits",
                });
            }
        }

        Ok(StationCode([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    /// Parse user input: surrounding whitespace is trimmed and letters
    /// are uppercased before validation.
    pub fn parse_normalized(s: &str) -> Result<Self, InvalidStationCode> {
        Self::parse(&s.trim().to_ascii_uppercase())
    }

    /// Returns the code as a string slice.
    pub fn as_str(&self) -> &str {
        // Only ASCII alphanumerics are ever stored.
        std::str::from_utf8(&self.0).unwrap_or_default()
    }
}

impl fmt::Debug for StationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StationCode({})", self.as_str())
    }
}

impl fmt::Display for StationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for StationCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Roundtrip: parse then as_str returns the original
        #[test]
        fn roundtrip(s in "[A-Z0-9]{4}") {
            let code = StationCode::parse(&s).unwrap();
            prop_assert_eq!(code.as_str(), s.as_str());
        }

        /// Lowercase input normalizes to the uppercase code
        #[test]
        fn normalized_matches_uppercase(s in "[a-z0-9]{4}") {
            let code = StationCode::parse_normalized(&s).unwrap();
            prop_assert_eq!(code.as_str(), s.to_ascii_uppercase());
        }

        /// Wrong-length strings are always rejected
        #[test]
        fn wrong_length_rejected(s in "[A-Z]{0,3}|[A-Z]{5,10}") {
            prop_assert!(StationCode::parse(&s).is_err());
        }
    }
}
