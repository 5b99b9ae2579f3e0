//! Domain models: the normalized value tree and request parameters
use crate::errors::{ApiError, ApiResult};
use crate::utils::{datetime_as_sgt, localize_sgt, WIRE_DATETIME_FORMAT};
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use indexmap::IndexMap;
use serde::{Serialize, Serializer};
use std::fmt;
use std::ops::Index;
use std::str::FromStr;

/// Object fields, kept in upstream order
pub type Map = IndexMap<String, Value>;

/// Caller-facing response tree.
///
/// Mirrors the decoded JSON, except that timestamp-shaped strings become
/// `Date` or `DateTime` (in Singapore time) once sanitized.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Number(serde_json::Number),
    String(String),
    Date(NaiveDate),
    DateTime(DateTime<Tz>),
    Array(Vec<Value>),
    Object(Map),
}

static NULL: Value = Value::Null;

impl Value {
    pub fn empty_object() -> Self {
        Value::Object(Map::new())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            Value::Object(map) => map.get(key),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Number(n) => n.as_i64(),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => n.as_f64(),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            Value::Date(d) => Some(*d),
            _ => None,
        }
    }

    pub fn as_datetime(&self) -> Option<&DateTime<Tz>> {
        match self {
            Value::DateTime(dt) => Some(dt),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&Vec<Value>> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&Map> {
        match self {
            Value::Object(map) => Some(map),
            _ => None,
        }
    }
}

impl Index<&str> for Value {
    type Output = Value;

    fn index(&self, key: &str) -> &Value {
        self.get(key).unwrap_or(&NULL)
    }
}

impl Index<usize> for Value {
    type Output = Value;

    fn index(&self, idx: usize) -> &Value {
        self.as_array().and_then(|a| a.get(idx)).unwrap_or(&NULL)
    }
}

impl From<serde_json::Value> for Value {
    fn from(raw: serde_json::Value) -> Self {
        match raw {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => Value::Number(n),
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::Array(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(map) => {
                Value::Object(map.into_iter().map(|(k, v)| (k, Value::from(v))).collect())
            }
        }
    }
}

impl From<Timestamp> for Value {
    fn from(ts: Timestamp) -> Self {
        match ts {
            Timestamp::Date(d) => Value::Date(d),
            Timestamp::DateTime(dt) => Value::DateTime(dt),
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Number(n) => n.serialize(serializer),
            Value::String(s) => serializer.serialize_str(s),
            Value::Date(d) => serializer.collect_str(&d.format("%Y-%m-%d")),
            Value::DateTime(dt) => serializer.serialize_str(&dt.to_rfc3339()),
            Value::Array(items) => serializer.collect_seq(items),
            Value::Object(map) => serializer.collect_map(map),
        }
    }
}

/// Result of parsing a timestamp-shaped string
#[derive(Debug, Clone, PartialEq)]
pub enum Timestamp {
    Date(NaiveDate),
    DateTime(DateTime<Tz>),
}

/// Scalar value of a query parameter
#[derive(Debug, Clone, PartialEq)]
pub enum QueryValue {
    Text(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Date(NaiveDate),
    DateTime(DateTime<FixedOffset>),
}

impl QueryValue {
    /// Textual form sent on the wire; date-times are rendered in Singapore time
    pub fn to_wire(&self) -> String {
        match self {
            QueryValue::Text(s) => s.clone(),
            QueryValue::Integer(i) => i.to_string(),
            QueryValue::Float(f) => f.to_string(),
            QueryValue::Bool(b) => b.to_string(),
            QueryValue::Date(d) => d.format("%Y-%m-%d").to_string(),
            QueryValue::DateTime(dt) => datetime_as_sgt(dt)
                .format(WIRE_DATETIME_FORMAT)
                .to_string(),
        }
    }
}

impl From<&str> for QueryValue {
    fn from(s: &str) -> Self {
        QueryValue::Text(s.to_string())
    }
}

impl From<String> for QueryValue {
    fn from(s: String) -> Self {
        QueryValue::Text(s)
    }
}

impl From<i64> for QueryValue {
    fn from(i: i64) -> Self {
        QueryValue::Integer(i)
    }
}

impl From<i32> for QueryValue {
    fn from(i: i32) -> Self {
        QueryValue::Integer(i64::from(i))
    }
}

impl From<u32> for QueryValue {
    fn from(i: u32) -> Self {
        QueryValue::Integer(i64::from(i))
    }
}

impl From<f64> for QueryValue {
    fn from(f: f64) -> Self {
        QueryValue::Float(f)
    }
}

impl From<bool> for QueryValue {
    fn from(b: bool) -> Self {
        QueryValue::Bool(b)
    }
}

impl From<NaiveDate> for QueryValue {
    fn from(d: NaiveDate) -> Self {
        QueryValue::Date(d)
    }
}

impl From<DateTime<FixedOffset>> for QueryValue {
    fn from(dt: DateTime<FixedOffset>) -> Self {
        QueryValue::DateTime(dt)
    }
}

impl From<DateTime<Utc>> for QueryValue {
    fn from(dt: DateTime<Utc>) -> Self {
        QueryValue::DateTime(dt.fixed_offset())
    }
}

impl From<DateTime<Tz>> for QueryValue {
    fn from(dt: DateTime<Tz>) -> Self {
        QueryValue::DateTime(dt.fixed_offset())
    }
}

/// Naive date-times are taken to be Singapore local time
impl From<NaiveDateTime> for QueryValue {
    fn from(naive: NaiveDateTime) -> Self {
        match localize_sgt(&naive) {
            Some(dt) => QueryValue::DateTime(dt.fixed_offset()),
            None => QueryValue::Text(naive.format(WIRE_DATETIME_FORMAT).to_string()),
        }
    }
}

/// Ordered query parameters. A `None` value is "not set" and never sent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Params {
    entries: Vec<(String, Option<QueryValue>)>,
}

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(mut self, key: &str, value: impl Into<QueryValue>) -> Self {
        self.insert(key, Some(value.into()));
        self
    }

    pub fn set_opt<V: Into<QueryValue>>(mut self, key: &str, value: Option<V>) -> Self {
        self.insert(key, value.map(Into::into));
        self
    }

    /// Insert or replace `key`; a replaced key keeps its position
    pub fn insert(&mut self, key: &str, value: Option<QueryValue>) {
        match self.entries.iter_mut().find(|(k, _)| k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key.to_string(), value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&QueryValue> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .and_then(|(_, v)| v.as_ref())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == key)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Defaults first, caller values override in place, new caller keys appended
    pub fn with_defaults(&self, defaults: &Params) -> Params {
        let mut merged = defaults.clone();
        for (key, value) in &self.entries {
            merged.insert(key, value.clone());
        }
        merged
    }

    /// Wire-ready pairs, unset entries dropped
    pub fn to_query_pairs(&self) -> Vec<(String, String)> {
        self.entries
            .iter()
            .filter_map(|(k, v)| v.as_ref().map(|v| (k.clone(), v.to_wire())))
            .collect()
    }
}

/// Open set of named arguments accepted by every category method.
///
/// `date` asks for all readings on that calendar day, `date_time` for the
/// reading at that instant. When both are given `date_time` wins.
#[derive(Debug, Clone, Default)]
pub struct QueryArgs {
    pub date: Option<NaiveDate>,
    pub date_time: Option<DateTime<FixedOffset>>,
    pub extra: Params,
}

impl QueryArgs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    pub fn date_time<Z: TimeZone>(mut self, date_time: DateTime<Z>) -> Self {
        self.date_time = Some(date_time.fixed_offset());
        self
    }

    pub fn param(mut self, key: &str, value: impl Into<QueryValue>) -> Self {
        self.extra.insert(key, Some(value.into()));
        self
    }

    /// The effective point-in-time filter, `date` dropped in favour of `date_time`
    pub fn point_in_time(&self) -> Option<QueryValue> {
        self.date_time
            .map(QueryValue::DateTime)
            .or(self.date.map(QueryValue::Date))
    }
}

/// Record representation for the CKAN datastore search
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RecordsFormat {
    /// Keyed mappings, as returned by the API
    #[default]
    Objects,
    /// Positional value lists
    Lists,
    /// One comma-separated string per record, no header
    Csv,
    /// One tab-separated string per record, no header
    Tsv,
}

impl RecordsFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordsFormat::Objects => "objects",
            RecordsFormat::Lists => "lists",
            RecordsFormat::Csv => "csv",
            RecordsFormat::Tsv => "tsv",
        }
    }

    pub fn delimiter(&self) -> Option<&'static str> {
        match self {
            RecordsFormat::Csv => Some(","),
            RecordsFormat::Tsv => Some("\t"),
            _ => None,
        }
    }
}

impl FromStr for RecordsFormat {
    type Err = ApiError;

    fn from_str(s: &str) -> ApiResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "objects" => Ok(RecordsFormat::Objects),
            "lists" => Ok(RecordsFormat::Lists),
            "csv" => Ok(RecordsFormat::Csv),
            "tsv" => Ok(RecordsFormat::Tsv),
            other => Err(ApiError::validation(format!(
                "unknown records format {other:?} (expected objects, lists, csv or tsv)"
            ))),
        }
    }
}

impl fmt::Display for RecordsFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
