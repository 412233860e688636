//! Date-time values.
//!
//! TOML v0.4.0 date-time literals come in three shapes, all captured by
//! the scanner's single DATETIME token:
//!
//! - offset date-time: `1979-05-27T07:32:00Z`, `1979-05-27T00:32:00-07:00`
//! - local date-time: `1979-05-27T07:32:00`, with optional fraction
//! - local date: `1979-05-27`
//!
//! [`Datetime`] keeps the shape as a discriminant so the literal can be
//! round-tripped; the underlying calendar arithmetic is `chrono`'s.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, Utc};
use std::fmt;

/// A TOML date-time value.
///
/// # Examples
///
/// ```rust
/// use toml_scribe::Datetime;
///
/// let dt = Datetime::from_literal("1979-05-27T07:32:00Z").unwrap();
/// assert!(dt.as_offset().is_some());
/// assert_eq!(dt.to_string(), "1979-05-27T07:32:00Z");
///
/// let d = Datetime::from_literal("1979-05-27").unwrap();
/// assert!(d.as_date().is_some());
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Datetime {
    /// A date-time with a UTC offset (`Z` or `±HH:MM`).
    Offset(DateTime<FixedOffset>),
    /// A date-time without offset information.
    Local(NaiveDateTime),
    /// A date without a time of day.
    Date(NaiveDate),
}

impl Datetime {
    /// Parses a DATETIME lexeme as produced by the scanner.
    ///
    /// Returns `None` when the lexeme names an impossible instant
    /// (month 13, February 30, hour 25).
    ///
    /// # Examples
    ///
    /// ```rust
    /// use toml_scribe::Datetime;
    ///
    /// assert!(Datetime::from_literal("1987-07-05T17:45:00Z").is_some());
    /// assert!(Datetime::from_literal("1987-07-05T17:45:00").is_some());
    /// assert!(Datetime::from_literal("1987-07-05").is_some());
    /// assert!(Datetime::from_literal("1987-02-30").is_none());
    /// ```
    #[must_use]
    pub fn from_literal(lexeme: &str) -> Option<Self> {
        if !lexeme.contains('T') {
            return NaiveDate::parse_from_str(lexeme, "%Y-%m-%d")
                .ok()
                .map(Datetime::Date);
        }
        if lexeme.ends_with('Z') || has_numeric_offset(lexeme) {
            return DateTime::parse_from_rfc3339(lexeme)
                .ok()
                .map(Datetime::Offset);
        }
        NaiveDateTime::parse_from_str(lexeme, "%Y-%m-%dT%H:%M:%S%.f")
            .ok()
            .map(Datetime::Local)
    }

    /// If this is an offset date-time, returns it. Otherwise `None`.
    #[inline]
    #[must_use]
    pub fn as_offset(&self) -> Option<&DateTime<FixedOffset>> {
        match self {
            Datetime::Offset(dt) => Some(dt),
            _ => None,
        }
    }

    /// If this is a local date-time, returns it. Otherwise `None`.
    #[inline]
    #[must_use]
    pub fn as_local(&self) -> Option<&NaiveDateTime> {
        match self {
            Datetime::Local(dt) => Some(dt),
            _ => None,
        }
    }

    /// If this is a local date, returns it. Otherwise `None`.
    #[inline]
    #[must_use]
    pub fn as_date(&self) -> Option<&NaiveDate> {
        match self {
            Datetime::Date(d) => Some(d),
            _ => None,
        }
    }

    /// Renders the UTC "Zulu" form used by the builder:
    /// `YYYY-MM-DDTHH:MM:SSZ`.
    ///
    /// Local date-times are taken as already being UTC; dates gain a
    /// midnight time.
    #[must_use]
    pub fn to_zulu_string(&self) -> String {
        match self {
            Datetime::Offset(dt) => dt
                .with_timezone(&Utc)
                .format("%Y-%m-%dT%H:%M:%SZ")
                .to_string(),
            Datetime::Local(dt) => dt.format("%Y-%m-%dT%H:%M:%SZ").to_string(),
            Datetime::Date(d) => d.format("%Y-%m-%dT00:00:00Z").to_string(),
        }
    }
}

/// True when the lexeme carries a trailing `±HH:MM` offset.
fn has_numeric_offset(lexeme: &str) -> bool {
    let bytes = lexeme.as_bytes();
    bytes.len() > 6 && (bytes[bytes.len() - 6] == b'+' || bytes[bytes.len() - 6] == b'-')
        && bytes[bytes.len() - 3] == b':'
}

impl fmt::Display for Datetime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Datetime::Offset(dt) => {
                if dt.offset().local_minus_utc() == 0 {
                    write!(f, "{}", dt.format("%Y-%m-%dT%H:%M:%S%.fZ"))
                } else {
                    write!(f, "{}", dt.format("%Y-%m-%dT%H:%M:%S%.f%:z"))
                }
            }
            Datetime::Local(dt) => write!(f, "{}", dt.format("%Y-%m-%dT%H:%M:%S%.f")),
            Datetime::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
        }
    }
}
