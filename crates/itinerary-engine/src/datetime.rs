//! ISO-8601 minute timestamps
//!
//! Date/time tokens carry `YYYY-MM-DDThh:mm` followed by either `Z` or a
//! numeric `±hh:mm` offset. The wall-clock time is rendered as written; the
//! offset is rendered separately in parentheses.

use chrono::NaiveDateTime;
use regex::Regex;
use std::sync::LazyLock;

/// Offset text rendered for the `Z` designator.
///
/// An explicit `+00:00` still renders as `(+00:00)`. This one starts with a
/// minus sign, so it is styled as a negative offset.
pub const UTC_OFFSET_TEXT: &str = "(-07:00)";

/// Minus-sign look-alikes that rich text editors substitute for `-`
const MINUS_SIGNS: [char; 3] = ['\u{2212}', '\u{FE63}', '\u{FF0D}'];

/// Largest accepted offset fields; `+24:00` and `+05:60` are both valid
const MAX_OFFSET_HOURS: i32 = 24;
const MAX_OFFSET_MINUTES: i32 = 60;

static TIMESTAMP_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^([0-9]{4}-[0-9]{2}-[0-9]{2}T[0-9]{2}:[0-9]{2})(?:(Z)|([+-])([0-9]{2}):([0-9]{2}))$",
    )
    .unwrap()
});

/// Offset carried by a timestamp
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Offset {
    /// The `Z` designator
    Utc,
    /// An explicit `±hh:mm` offset in minutes east of UTC, `+00:00` included
    Fixed(i32),
}

impl Offset {
    /// Parenthesized offset text, e.g. `(+05:30)`
    pub fn text(&self) -> String {
        match self {
            Self::Utc => UTC_OFFSET_TEXT.to_string(),
            Self::Fixed(minutes) => {
                let sign = if *minutes < 0 { '-' } else { '+' };
                let minutes = minutes.unsigned_abs();
                format!("({}{:02}:{:02})", sign, minutes / 60, minutes % 60)
            }
        }
    }
}

/// A parsed date/time token payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timestamp {
    /// Wall-clock date and time as written
    pub local: NaiveDateTime,
    pub offset: Offset,
}

impl Timestamp {
    /// Parse a token payload.
    ///
    /// Unicode minus signs are read as ASCII hyphens first, so
    /// `10:00−05:00` and `10:00-05:00` parse identically.
    pub fn parse(payload: &str) -> Result<Self, DateTimeError> {
        let value = normalize_minus(payload);

        let caps = TIMESTAMP_RE
            .captures(&value)
            .ok_or_else(|| DateTimeError::Malformed(value.clone()))?;

        let local = NaiveDateTime::parse_from_str(&caps[1], "%Y-%m-%dT%H:%M").map_err(|e| {
            DateTimeError::OutOfRange {
                value: value.clone(),
                reason: e.to_string(),
            }
        })?;

        if caps.get(2).is_some() {
            return Ok(Self {
                local,
                offset: Offset::Utc,
            });
        }

        let malformed = || DateTimeError::Malformed(value.clone());
        let hours: i32 = caps[4].parse().map_err(|_| malformed())?;
        let minutes: i32 = caps[5].parse().map_err(|_| malformed())?;
        if hours > MAX_OFFSET_HOURS || minutes > MAX_OFFSET_MINUTES {
            return Err(DateTimeError::InvalidOffset(value.clone()));
        }

        let total = hours * 60 + minutes;
        let total = if &caps[3] == "-" { -total } else { total };

        Ok(Self {
            local,
            offset: Offset::Fixed(total),
        })
    }

    /// `05 Mar 2024`
    pub fn date_text(&self) -> String {
        self.local.format("%d %b %Y").to_string()
    }

    /// `03:04PM`
    pub fn clock12_text(&self) -> String {
        self.local.format("%I:%M%p").to_string()
    }

    /// `15:04`
    pub fn clock24_text(&self) -> String {
        self.local.format("%H:%M").to_string()
    }

    pub fn offset_text(&self) -> String {
        self.offset.text()
    }
}

/// Replace minus-sign look-alikes with an ASCII hyphen
pub fn normalize_minus(payload: &str) -> String {
    payload.replace(MINUS_SIGNS, "-")
}

/// Why a date/time payload was rejected
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DateTimeError {
    #[error("{0:?} is not in YYYY-MM-DDThh:mmZ or YYYY-MM-DDThh:mm±hh:mm form")]
    Malformed(String),

    #[error("{value:?}: {reason}")]
    OutOfRange { value: String, reason: String },

    #[error("{0:?}: time zone offset out of range")]
    InvalidOffset(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_utc() {
        let ts = Timestamp::parse("2024-03-05T10:00Z").unwrap();
        assert_eq!(ts.offset, Offset::Utc);
        assert_eq!(ts.date_text(), "05 Mar 2024");
        assert_eq!(ts.clock24_text(), "10:00");
        assert_eq!(ts.clock12_text(), "10:00AM");
    }

    #[test]
    fn utc_renders_fixed_literal() {
        // `Z` renders as "(-07:00)", not "(+00:00)"
        let ts = Timestamp::parse("2024-03-05T10:00Z").unwrap();
        assert_eq!(ts.offset_text(), "(-07:00)");

        let explicit = Timestamp::parse("2024-03-05T10:00+00:00").unwrap();
        assert_eq!(explicit.offset_text(), "(+00:00)");
    }

    #[test]
    fn parses_numeric_offsets() {
        let ts = Timestamp::parse("2024-12-31T23:59-05:00").unwrap();
        assert_eq!(ts.offset_text(), "(-05:00)");
        assert_eq!(ts.clock12_text(), "11:59PM");
        assert_eq!(ts.clock24_text(), "23:59");

        let ts = Timestamp::parse("2024-01-01T00:05+05:30").unwrap();
        assert_eq!(ts.offset_text(), "(+05:30)");
        assert_eq!(ts.clock12_text(), "12:05AM");
    }

    #[test]
    fn wall_clock_is_not_shifted_by_offset() {
        let ts = Timestamp::parse("2024-03-05T01:00+09:00").unwrap();
        assert_eq!(ts.date_text(), "05 Mar 2024");
        assert_eq!(ts.clock24_text(), "01:00");
    }

    #[test]
    fn unicode_minus_matches_ascii_hyphen() {
        let unicode = Timestamp::parse("2024-03-05T10:00\u{2212}05:00").unwrap();
        let ascii = Timestamp::parse("2024-03-05T10:00-05:00").unwrap();
        assert_eq!(unicode, ascii);

        let all_unicode =
            Timestamp::parse("2024\u{2212}03\u{2212}05T10:00\u{2212}05:00").unwrap();
        assert_eq!(all_unicode, ascii);
    }

    #[test]
    fn rejects_malformed_shapes() {
        for payload in [
            "2024-03-05",
            "2024-03-05T10:00",
            "2024-03-05T10:00:00Z",
            "2024-03-05 10:00Z",
            "2024-03-05T10:00z",
            "2024-3-5T10:00Z",
            "yesterday",
        ] {
            let err = Timestamp::parse(payload).unwrap_err();
            assert!(matches!(err, DateTimeError::Malformed(_)), "{payload}: {err:?}");
        }
    }

    #[test]
    fn rejects_impossible_dates() {
        for payload in [
            "2024-13-05T10:00Z",
            "2023-02-29T10:00Z",
            "2024-03-05T24:00Z",
            "2024-03-05T10:60Z",
        ] {
            let err = Timestamp::parse(payload).unwrap_err();
            assert!(matches!(err, DateTimeError::OutOfRange { .. }), "{payload}: {err:?}");
        }
    }

    #[test]
    fn offset_fields_reach_their_upper_bounds() {
        let ts = Timestamp::parse("2024-03-05T10:00+24:00").unwrap();
        assert_eq!(ts.offset_text(), "(+24:00)");

        // 60 minutes carry into the hour
        let ts = Timestamp::parse("2024-03-05T10:00-05:60").unwrap();
        assert_eq!(ts.offset_text(), "(-06:00)");
    }

    #[test]
    fn rejects_out_of_range_offsets() {
        for payload in [
            "2024-03-05T10:00+25:00",
            "2024-03-05T10:00+05:61",
            "2024-03-05T10:00-05:75",
        ] {
            assert!(
                matches!(Timestamp::parse(payload), Err(DateTimeError::InvalidOffset(_))),
                "{payload}"
            );
        }
    }

    #[test]
    fn error_message_names_value() {
        let err = Timestamp::parse("soon").unwrap_err();
        assert!(err.to_string().contains("\"soon\""));
    }
}
