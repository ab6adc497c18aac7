use crate::clause::QueryLiteral;

use super::resolver::{IndexValueConverter, RangeBounds, RangeValueConverter};

const MINUTE: i64 = 60;
const HOUR: i64 = 60 * MINUTE;

/// Fixed-width, lexicographically sortable encoding of a signed integer.
pub fn encode_sortable_long(value: i64) -> String {
    format!("{:016x}", (value as u64) ^ (1 << 63))
}

/// Indexes integers, optionally scaled and/or in the sortable encoding.
#[derive(Debug, Clone, Copy)]
pub struct LongIndexValueConverter {
    multiplier: i64,
    sortable: bool,
}

impl Default for LongIndexValueConverter {
    fn default() -> Self {
        Self {
            multiplier: 1,
            sortable: false,
        }
    }
}

impl LongIndexValueConverter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_multiplier(mut self, multiplier: i64) -> Self {
        self.multiplier = multiplier;
        self
    }

    pub fn sortable(mut self) -> Self {
        self.sortable = true;
        self
    }

    fn value(&self, literal: &QueryLiteral) -> Option<i64> {
        let raw = match literal {
            QueryLiteral::Long(value) => *value,
            QueryLiteral::Str(value) => value.trim().parse().ok()?,
            QueryLiteral::Empty => return None,
        };
        raw.checked_mul(self.multiplier)
    }

    fn encode(&self, value: i64) -> String {
        if self.sortable {
            encode_sortable_long(value)
        } else {
            value.to_string()
        }
    }
}

impl IndexValueConverter for LongIndexValueConverter {
    fn convert(&self, literal: &QueryLiteral) -> Option<String> {
        self.value(literal).map(|value| self.encode(value))
    }
}

impl RangeValueConverter for LongIndexValueConverter {
    fn range_bounds(&self, literal: &QueryLiteral) -> Option<RangeBounds> {
        self.convert(literal).map(RangeBounds::exact)
    }
}

/// Day and week lengths used when reading durations, in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct DurationUnits {
    pub day: i64,
    pub week: i64,
}

impl DurationUnits {
    pub(crate) const CALENDAR: Self = Self {
        day: 24 * HOUR,
        week: 7 * 24 * HOUR,
    };
}

/// Indexes durations as seconds.
///
/// Numbers are minutes; text may combine units (`"1w 2d"`, `"1h 30m"`,
/// `"1.5h"`). Day and week lengths default to calendar time and can be set
/// to working time.
#[derive(Debug, Clone, Copy)]
pub struct DurationIndexValueConverter {
    units: DurationUnits,
    sortable: bool,
}

impl Default for DurationIndexValueConverter {
    fn default() -> Self {
        Self {
            units: DurationUnits::CALENDAR,
            sortable: false,
        }
    }
}

impl DurationIndexValueConverter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_working_time(mut self, hours_per_day: i64, days_per_week: i64) -> Self {
        let day = hours_per_day * HOUR;
        self.units = DurationUnits {
            day,
            week: day * days_per_week,
        };
        self
    }

    pub fn sortable(mut self) -> Self {
        self.sortable = true;
        self
    }

    fn seconds(&self, literal: &QueryLiteral) -> Option<i64> {
        match literal {
            QueryLiteral::Long(minutes) => minutes.checked_mul(MINUTE),
            QueryLiteral::Str(value) => parse_duration_seconds(value, self.units),
            QueryLiteral::Empty => None,
        }
    }
}

impl IndexValueConverter for DurationIndexValueConverter {
    fn convert(&self, literal: &QueryLiteral) -> Option<String> {
        let seconds = self.seconds(literal)?;
        Some(if self.sortable {
            encode_sortable_long(seconds)
        } else {
            seconds.to_string()
        })
    }
}

impl RangeValueConverter for DurationIndexValueConverter {
    fn range_bounds(&self, literal: &QueryLiteral) -> Option<RangeBounds> {
        self.convert(literal).map(RangeBounds::exact)
    }
}

/// Parses `"<number><unit> ..."` into seconds. A bare number is minutes.
pub(crate) fn parse_duration_seconds(raw: &str, units: DurationUnits) -> Option<i64> {
    let mut rest = raw.trim();
    if rest.is_empty() {
        return None;
    }

    let mut total = 0f64;
    while !rest.is_empty() {
        let split = rest
            .find(|ch: char| !(ch.is_ascii_digit() || ch == '.'))
            .unwrap_or(rest.len());
        let (number_part, tail) = rest.split_at(split);
        if number_part.is_empty() {
            return None;
        }
        let value: f64 = number_part.parse().ok()?;

        let unit_end = tail
            .find(|ch: char| !ch.is_ascii_alphabetic())
            .unwrap_or(tail.len());
        let (unit, tail) = tail.split_at(unit_end);
        total += value * unit_seconds(unit, units)? as f64;
        rest = tail.trim_start();
    }

    let seconds = total.round();
    if !seconds.is_finite() || seconds > i64::MAX as f64 {
        return None;
    }
    Some(seconds as i64)
}

fn unit_seconds(unit: &str, units: DurationUnits) -> Option<i64> {
    match unit.to_ascii_lowercase().as_str() {
        "" | "m" | "min" | "mins" | "minute" | "minutes" => Some(MINUTE),
        "h" | "hr" | "hrs" | "hour" | "hours" => Some(HOUR),
        "d" | "day" | "days" => Some(units.day),
        "w" | "wk" | "week" | "weeks" => Some(units.week),
        _ => None,
    }
}
