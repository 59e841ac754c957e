use std::cmp::Ordering;
use std::collections::{BTreeMap, HashSet};
use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde_json::Value;

pub const ID_FIELD: &str = "id";
const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RecordId(pub i64);

impl From<i64> for RecordId {
    fn from(value: i64) -> Self {
        RecordId(value)
    }
}

impl From<RecordId> for i64 {
    fn from(value: RecordId) -> Self {
        value.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single typed cell of a record.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Number(f64),
    Date(NaiveDateTime),
}

impl FieldValue {
    /// Types a raw cell from a spreadsheet or CSV file: numbers first, then
    /// timestamps, then plain text. Blank cells carry no value.
    pub fn infer(raw: &str) -> Option<FieldValue> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }
        if let Some(number) = parse_number(trimmed) {
            return Some(FieldValue::Number(number));
        }
        if let Some(timestamp) = parse_timestamp(trimmed) {
            return Some(FieldValue::Date(timestamp));
        }
        Some(FieldValue::Text(raw.to_string()))
    }

    pub fn kind(&self) -> &'static str {
        match self {
            FieldValue::Text(_) => "text",
            FieldValue::Number(_) => "number",
            FieldValue::Date(_) => "date",
        }
    }

    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            FieldValue::Date(timestamp) => Some(timestamp.date()),
            _ => None,
        }
    }

    /// Equality against a filter value typed into the UI.
    pub fn matches(&self, expected: &str) -> bool {
        match self {
            FieldValue::Text(text) => text == expected,
            FieldValue::Number(number) => parse_number(expected.trim()) == Some(*number),
            FieldValue::Date(timestamp) => parse_timestamp(expected.trim()) == Some(*timestamp),
        }
    }

    /// Numbers and dates order by magnitude, text by bytes. Mixed kinds
    /// fall back to a fixed kind order so the comparison stays total.
    pub fn compare(&self, other: &FieldValue) -> Ordering {
        match (self, other) {
            (FieldValue::Number(a), FieldValue::Number(b)) => a.total_cmp(b),
            (FieldValue::Date(a), FieldValue::Date(b)) => a.cmp(b),
            (FieldValue::Text(a), FieldValue::Text(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }

    fn rank(&self) -> u8 {
        match self {
            FieldValue::Number(_) => 0,
            FieldValue::Date(_) => 1,
            FieldValue::Text(_) => 2,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Text(text) => write!(f, "{text}"),
            FieldValue::Number(number) => {
                if number.fract() == 0.0 && number.abs() < 1e15 {
                    write!(f, "{}", *number as i64)
                } else {
                    write!(f, "{number}")
                }
            }
            FieldValue::Date(timestamp) => write!(f, "{}", timestamp.format(TIMESTAMP_FORMAT)),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Number(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Number(value as f64)
    }
}

impl From<NaiveDateTime> for FieldValue {
    fn from(value: NaiveDateTime) -> Self {
        FieldValue::Date(value)
    }
}

impl From<NaiveDate> for FieldValue {
    fn from(value: NaiveDate) -> Self {
        FieldValue::Date(start_of_day(value))
    }
}

fn parse_number(value: &str) -> Option<f64> {
    let looks_numeric = value
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '-' | '+' | '.' | 'e' | 'E'));
    if !looks_numeric {
        return None;
    }
    value.parse::<f64>().ok().filter(|number| number.is_finite())
}

/// Accepts RFC 3339, naive ISO timestamps (as emitted by Python's
/// `isoformat()`), `YYYY-MM-DD HH:MM:SS`, and bare dates.
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Some(parsed.naive_utc());
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(value, format) {
            return Some(parsed);
        }
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .map(start_of_day)
}

pub fn start_of_day(date: NaiveDate) -> NaiveDateTime {
    date.and_hms_opt(0, 0, 0).unwrap_or_default()
}

/// One row of a list screen. The id is also exposed as the `id` field so it
/// can be sorted, searched and exported like any other column.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    id: RecordId,
    fields: BTreeMap<String, FieldValue>,
}

impl Record {
    pub fn new(id: impl Into<RecordId>) -> Self {
        let id = id.into();
        let mut fields = BTreeMap::new();
        fields.insert(ID_FIELD.to_string(), FieldValue::Number(id.0 as f64));
        Self { id, fields }
    }

    pub fn with(mut self, field: &str, value: impl Into<FieldValue>) -> Self {
        self.set(field, value);
        self
    }

    pub fn id(&self) -> RecordId {
        self.id
    }

    pub fn set(&mut self, field: &str, value: impl Into<FieldValue>) {
        if field == ID_FIELD {
            return;
        }
        self.fields.insert(field.to_string(), value.into());
    }

    pub fn remove(&mut self, field: &str) -> Option<FieldValue> {
        if field == ID_FIELD {
            return None;
        }
        self.fields.remove(field)
    }

    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.fields.get(field)
    }

    pub fn text(&self, field: &str) -> Option<String> {
        self.get(field).map(|value| value.to_string())
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Builds a record from one JSON object. Nested objects are flattened
    /// into dotted names; nulls are dropped; arrays of scalars are joined
    /// with commas. Returns `None` without an integer `id`.
    pub fn from_json(value: &Value) -> Option<Record> {
        let object = value.as_object()?;
        let id = match object.get(ID_FIELD)? {
            Value::Number(number) => number.as_i64()?,
            Value::String(text) => text.trim().parse::<i64>().ok()?,
            _ => return None,
        };

        let mut record = Record::new(id);
        for (key, item) in object {
            if key == ID_FIELD {
                continue;
            }
            flatten_json(&mut record, key, item);
        }
        Some(record)
    }
}

/// Keeps the first record of each id, in order. Returns the survivors and
/// the number of duplicates dropped.
pub fn dedupe_by_id(records: Vec<Record>) -> (Vec<Record>, usize) {
    let mut seen = HashSet::new();
    let before = records.len();
    let kept: Vec<Record> = records
        .into_iter()
        .filter(|record| seen.insert(record.id()))
        .collect();
    let dropped = before - kept.len();
    (kept, dropped)
}

fn flatten_json(record: &mut Record, path: &str, value: &Value) {
    match value {
        Value::Null => {}
        Value::Bool(flag) => record.set(path, flag.to_string()),
        Value::Number(number) => {
            if let Some(number) = number.as_f64() {
                record.set(path, number);
            }
        }
        Value::String(text) => match parse_timestamp(text.trim()) {
            Some(timestamp) => record.set(path, timestamp),
            None => record.set(path, text.as_str()),
        },
        Value::Array(items) => {
            let joined = items
                .iter()
                .filter_map(|item| match item {
                    Value::String(text) => Some(text.clone()),
                    Value::Number(number) => Some(number.to_string()),
                    Value::Bool(flag) => Some(flag.to_string()),
                    _ => None,
                })
                .collect::<Vec<_>>()
                .join(",");
            record.set(path, joined);
        }
        Value::Object(children) => {
            for (key, child) in children {
                flatten_json(record, &format!("{path}.{key}"), child);
            }
        }
    }
}
