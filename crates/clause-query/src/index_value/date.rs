//! Date literal conversion.
//!
//! ## Supported literals
//!
//! ### Absolute dates (a whole day)
//! - `YYYY-MM-DD`, `YYYY/MM/DD`, `YYYY.MM.DD`
//! - `DD-MM-YYYY`, `DD/MM/YYYY`, `DD.MM.YYYY`
//! - `MM-DD-YYYY`, `MM/DD/YYYY`, `MM.DD.YYYY`
//!
//! ### Absolute date-times (a single minute)
//! - any of the above followed by ` HH:MM`
//! - numbers, read as epoch milliseconds
//!
//! ### Relative offsets from now
//! - `-1d`, `+2w`, `-4h 30m`
//!
//! Values are indexed in UTC at minute resolution as `YYYYMMDDHHMM`, which
//! sorts lexicographically.

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime, Utc};

use crate::clause::QueryLiteral;

use super::number::{parse_duration_seconds, DurationUnits};
use super::resolver::{IndexValueConverter, RangeBounds, RangeValueConverter};

const INDEX_FORMAT: &str = "%Y%m%d%H%M";

#[derive(Debug, Clone, Copy, Default)]
pub struct DateIndexValueConverter {
    now: Option<DateTime<Utc>>,
}

/// A parsed date literal: a whole day or one instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DateValue {
    Day(NaiveDate),
    Instant(NaiveDateTime),
}

impl DateIndexValueConverter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pins "now" for relative offsets instead of reading the clock.
    pub fn with_now(now: DateTime<Utc>) -> Self {
        Self { now: Some(now) }
    }

    fn parse(&self, literal: &QueryLiteral) -> Option<DateValue> {
        match literal {
            QueryLiteral::Long(millis) => {
                DateTime::from_timestamp_millis(*millis).map(|dt| DateValue::Instant(dt.naive_utc()))
            }
            QueryLiteral::Str(raw) => self.parse_text(raw),
            QueryLiteral::Empty => None,
        }
    }

    fn parse_text(&self, raw: &str) -> Option<DateValue> {
        let trimmed = raw.trim();
        if is_relative_offset(trimmed) {
            return self.parse_relative(trimmed);
        }

        match trimmed.split_once(' ') {
            Some((date_part, time_part)) => {
                let date = parse_absolute_date(date_part)?;
                let time = NaiveTime::parse_from_str(time_part.trim(), "%H:%M").ok()?;
                Some(DateValue::Instant(date.and_time(time)))
            }
            None => parse_absolute_date(trimmed).map(DateValue::Day),
        }
    }

    fn parse_relative(&self, raw: &str) -> Option<DateValue> {
        let (negative, magnitude) = match raw.as_bytes().first() {
            Some(b'-') => (true, &raw[1..]),
            Some(b'+') => (false, &raw[1..]),
            _ => (false, raw),
        };
        let seconds = parse_duration_seconds(magnitude, DurationUnits::CALENDAR)?;
        let offset = Duration::try_seconds(seconds)?;
        let now = self.now.unwrap_or_else(Utc::now);
        let instant = if negative {
            now.checked_sub_signed(offset)?
        } else {
            now.checked_add_signed(offset)?
        };
        Some(DateValue::Instant(instant.naive_utc()))
    }
}

impl IndexValueConverter for DateIndexValueConverter {
    fn convert(&self, literal: &QueryLiteral) -> Option<String> {
        match self.parse(literal)? {
            DateValue::Day(date) => Some(encode(date.and_hms_opt(0, 0, 0)?)),
            DateValue::Instant(instant) => Some(encode(instant)),
        }
    }
}

impl RangeValueConverter for DateIndexValueConverter {
    fn range_bounds(&self, literal: &QueryLiteral) -> Option<RangeBounds> {
        match self.parse(literal)? {
            DateValue::Day(date) => Some(RangeBounds {
                lower: encode(date.and_hms_opt(0, 0, 0)?),
                upper: encode(date.and_hms_opt(23, 59, 0)?),
            }),
            DateValue::Instant(instant) => Some(RangeBounds::exact(encode(instant))),
        }
    }
}

fn encode(instant: NaiveDateTime) -> String {
    instant.format(INDEX_FORMAT).to_string()
}

/// Offsets carry an explicit sign or end in a unit letter.
fn is_relative_offset(raw: &str) -> bool {
    raw.starts_with(['-', '+']) || raw.ends_with(|ch: char| ch.is_ascii_alphabetic())
}

/// Parses an absolute date from various formats.
fn parse_absolute_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    let sep = trimmed.chars().find(|ch| matches!(ch, '-' | '/' | '.'))?;
    let year_first = trimmed
        .get(..4)
        .is_some_and(|prefix| prefix.bytes().all(|b| b.is_ascii_digit()));

    let formats: &[&str] = match (sep, year_first) {
        ('-', true) => &["%Y-%m-%d"],
        ('-', false) => &["%d-%m-%Y", "%m-%d-%Y"],
        ('/', true) => &["%Y/%m/%d"],
        ('/', false) => &["%m/%d/%Y", "%d/%m/%Y"],
        ('.', true) => &["%Y.%m.%d"],
        ('.', false) => &["%d.%m.%Y", "%m.%d.%Y"],
        _ => &[],
    };

    formats
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(trimmed, format).ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn converter() -> DateIndexValueConverter {
        let now = Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap();
        DateIndexValueConverter::with_now(now)
    }

    #[test]
    fn converts_absolute_dates_to_start_of_day() {
        let converter = converter();
        for raw in ["2024-01-15", "2024/01/15", "2024.01.15", "15.01.2024", "01/15/2024"] {
            assert_eq!(
                converter.convert(&QueryLiteral::string(raw)),
                Some("202401150000".to_string()),
                "{raw}"
            );
        }
    }

    #[test]
    fn converts_date_times_to_the_minute() {
        assert_eq!(
            converter().convert(&QueryLiteral::string("2024-01-15 09:45")),
            Some("202401150945".to_string())
        );
    }

    #[test]
    fn converts_epoch_millis() {
        let millis = Utc
            .with_ymd_and_hms(2023, 12, 31, 23, 30, 0)
            .unwrap()
            .timestamp_millis();
        assert_eq!(
            converter().convert(&QueryLiteral::Long(millis)),
            Some("202312312330".to_string())
        );
    }

    #[test]
    fn converts_relative_offsets_from_now() {
        let converter = converter();
        assert_eq!(
            converter.convert(&QueryLiteral::string("-1d")),
            Some("202406141200".to_string())
        );
        assert_eq!(
            converter.convert(&QueryLiteral::string("+1w")),
            Some("202406221200".to_string())
        );
        assert_eq!(
            converter.convert(&QueryLiteral::string("-4h 30m")),
            Some("202406150730".to_string())
        );
    }

    #[test]
    fn day_bounds_cover_the_whole_day() {
        assert_eq!(
            converter().range_bounds(&QueryLiteral::string("2024-02-29")),
            Some(RangeBounds {
                lower: "202402290000".to_string(),
                upper: "202402292359".to_string(),
            })
        );
        assert_eq!(
            converter().range_bounds(&QueryLiteral::string("2024-02-29 10:00")),
            Some(RangeBounds::exact("202402291000".to_string()))
        );
    }

    #[test]
    fn invalid_dates_do_not_resolve() {
        let converter = converter();
        assert_eq!(converter.convert(&QueryLiteral::string("2024-13-45")), None);
        assert_eq!(converter.convert(&QueryLiteral::string("yesterdayish")), None);
        assert_eq!(converter.convert(&QueryLiteral::string("")), None);
        assert_eq!(converter.convert(&QueryLiteral::Empty), None);
    }

    #[test]
    fn multi_byte_literals_do_not_resolve() {
        let converter = converter();
        for raw in ["aaa€-1", "€-01-15", "2024-01-1€", "日本-01-15"] {
            assert_eq!(converter.convert(&QueryLiteral::string(raw)), None, "{raw:?}");
            assert_eq!(converter.range_bounds(&QueryLiteral::string(raw)), None, "{raw:?}");
        }
    }
}
