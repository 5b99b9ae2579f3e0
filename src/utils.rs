//! Timestamp parsing and response sanitizing utilities
use crate::domain::{Timestamp, Value};
use crate::errors::ParseError;
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone};
use chrono_tz::Asia::Singapore;
use chrono_tz::Tz;
use std::borrow::Cow;

pub const DATE_FORMAT: &str = "%Y-%m-%d";
/// Date-time layout sent as a query parameter (Singapore local time, no offset)
pub const WIRE_DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Recognised layouts, tried in order. Order matters: several are prefixes of others.
enum Layout {
    Date,
    Naive(&'static str),
    Offset(&'static str),
}

const LAYOUTS: [Layout; 9] = [
    Layout::Date,
    Layout::Naive("%Y-%m-%d %H:%M:%S"),
    Layout::Naive("%Y-%m-%dT%H:%M:%S"),
    Layout::Offset("%Y-%m-%d %H:%M:%S%z"),
    Layout::Offset("%Y-%m-%dT%H:%M:%S%z"),
    Layout::Naive("%Y-%m-%d %H:%M:%S%.f"),
    Layout::Naive("%Y-%m-%dT%H:%M:%S%.f"),
    Layout::Offset("%Y-%m-%d %H:%M:%S%.f%z"),
    Layout::Offset("%Y-%m-%dT%H:%M:%S%.f%z"),
];

/// Convert any zoned date-time to Singapore time
pub fn datetime_as_sgt<Z: TimeZone>(dt: &DateTime<Z>) -> DateTime<Tz> {
    dt.with_timezone(&Singapore)
}

/// Interpret a naive date-time as Singapore local time
pub fn localize_sgt(naive: &NaiveDateTime) -> Option<DateTime<Tz>> {
    Singapore.from_local_datetime(naive).earliest()
}

/// Parse a date or date-time string.
///
/// Date-only input yields `Timestamp::Date` with no zone conversion. Any
/// date-time is returned in Singapore time; input without an offset is
/// assumed to already be Singapore local time.
pub fn datetime_from_string(val: &str) -> Result<Timestamp, ParseError> {
    // every layout starts with a 4-digit year and is at least YYYY-MM-DD long
    if val.len() < 10 || !val.as_bytes()[0].is_ascii_digit() {
        return Err(ParseError::new(val));
    }

    let input = zulu_as_offset(val);
    for layout in &LAYOUTS {
        let parsed = match layout {
            Layout::Date => NaiveDate::parse_from_str(&input, DATE_FORMAT)
                .ok()
                .map(Timestamp::Date),
            Layout::Naive(fmt) => NaiveDateTime::parse_from_str(&input, fmt)
                .ok()
                .and_then(|naive| localize_sgt(&naive))
                .map(Timestamp::DateTime),
            Layout::Offset(fmt) => DateTime::parse_from_str(&input, fmt)
                .ok()
                .map(|dt| Timestamp::DateTime(datetime_as_sgt(&dt))),
        };
        if let Some(ts) = parsed {
            return Ok(ts);
        }
    }

    Err(ParseError::new(val))
}

/// A trailing `Z` designator is the same as `+00:00`
fn zulu_as_offset(val: &str) -> Cow<'_, str> {
    match val.strip_suffix('Z').or_else(|| val.strip_suffix('z')) {
        Some(rest) => Cow::Owned(format!("{rest}+00:00")),
        None => Cow::Borrowed(val),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SanitizeOptions {
    /// Recurse into arrays and objects
    pub iterate: bool,
    /// Turn number-like strings into integers or floats
    pub sanitize_numbers: bool,
}

impl Default for SanitizeOptions {
    fn default() -> Self {
        Self {
            iterate: true,
            sanitize_numbers: false,
        }
    }
}

/// Return a sanitized copy of `value`; the input is left untouched.
///
/// Timestamp-shaped strings become `Date`/`DateTime`. With `sanitize_numbers`,
/// other strings are tried as an integer, then as a float. Everything else is
/// returned unchanged. The tree is owned and therefore acyclic.
pub fn sanitize_data(value: &Value, options: SanitizeOptions) -> Value {
    sanitize_owned(value.clone(), options)
}

/// Consuming variant of `sanitize_data`
pub fn sanitize_owned(value: Value, options: SanitizeOptions) -> Value {
    match value {
        Value::Array(items) if options.iterate => Value::Array(
            items
                .into_iter()
                .map(|v| sanitize_owned(v, options))
                .collect(),
        ),
        Value::Object(map) if options.iterate => Value::Object(
            map.into_iter()
                .map(|(k, v)| (k, sanitize_owned(v, options)))
                .collect(),
        ),
        Value::String(s) => sanitize_string(s, options.sanitize_numbers),
        other => other,
    }
}

fn sanitize_string(s: String, sanitize_numbers: bool) -> Value {
    if let Ok(ts) = datetime_from_string(&s) {
        return ts.into();
    }
    if sanitize_numbers {
        if let Ok(i) = s.parse::<i64>() {
            return Value::Number(i.into());
        }
        if let Ok(u) = s.parse::<u64>() {
            return Value::Number(u.into());
        }
        // integers wider than 64 bits stay text rather than lose digits as floats
        let digits = s.strip_prefix(|c| c == '-' || c == '+').unwrap_or(&s);
        if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
            return Value::String(s);
        }
        if let Some(n) = s
            .parse::<f64>()
            .ok()
            .and_then(serde_json::Number::from_f64)
        {
            return Value::Number(n);
        }
    }
    Value::String(s)
}
