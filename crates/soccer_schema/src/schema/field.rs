use std::fmt;

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Column types understood by the validator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    Integer,
    Float,
    Text,
    Boolean,
    /// `YYYY-MM-DD` or an RFC 3339 datetime string
    Date,
    /// Seconds as a number, or `[N days ]HH:MM:SS[.fff]`
    Duration,
}

impl FieldType {
    /// Whether `value` (non-null) is an acceptable encoding of this type.
    pub fn accepts(&self, value: &Value) -> bool {
        match self {
            FieldType::Integer => value.as_i64().is_some(),
            FieldType::Float => value.is_number(),
            FieldType::Text => value.is_string(),
            FieldType::Boolean => value.is_boolean(),
            FieldType::Date => value.as_str().is_some_and(|s| parse_date(s).is_some()),
            FieldType::Duration => parse_duration_value(value).is_some(),
        }
    }

    /// Best-effort conversion of a raw text cell (e.g. a CSV field) into a typed value.
    ///
    /// Returns `None` when the cell cannot be read as this type; the caller keeps the
    /// raw string so validation reports a type mismatch.
    pub fn coerce_str(&self, raw: &str) -> Option<Value> {
        let raw = raw.trim();
        match self {
            FieldType::Integer => raw.parse::<i64>().ok().map(Value::from),
            FieldType::Float => raw
                .parse::<f64>()
                .ok()
                .and_then(serde_json::Number::from_f64)
                .map(Value::Number),
            FieldType::Text | FieldType::Date => Some(Value::String(raw.to_string())),
            FieldType::Boolean => match raw.to_ascii_lowercase().as_str() {
                "true" | "t" | "1" => Some(Value::Bool(true)),
                "false" | "f" | "0" => Some(Value::Bool(false)),
                _ => None,
            },
            FieldType::Duration => match raw.parse::<f64>() {
                Ok(secs) => serde_json::Number::from_f64(secs).map(Value::Number),
                Err(_) => Some(Value::String(raw.to_string())),
            },
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FieldType::Integer => "integer",
            FieldType::Float => "float",
            FieldType::Text => "text",
            FieldType::Boolean => "boolean",
            FieldType::Date => "date",
            FieldType::Duration => "duration",
        };
        f.write_str(name)
    }
}

/// JSON kind name used in type-mismatch reports.
pub fn describe_value(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(_) => "boolean".to_string(),
        Value::Number(n) if n.is_i64() || n.is_u64() => "integer".to_string(),
        Value::Number(_) => "float".to_string(),
        Value::String(s) => format!("text \"{}\"", s),
        Value::Array(_) => "array".to_string(),
        Value::Object(_) => "object".to_string(),
    }
}

pub fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.date_naive()))
}

/// Duration in milliseconds.
pub fn parse_duration_value(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => {
            let ms = n.as_f64()? * 1000.0;
            if ms.is_finite() && ms >= 0.0 && ms < i64::MAX as f64 {
                Some(ms.round() as i64)
            } else {
                None
            }
        }
        Value::String(s) => parse_duration_str(s),
        _ => None,
    }
}

/// Digits only: no sign, no whitespace.
fn parse_unsigned(s: &str) -> Option<i64> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

/// Parses `HH:MM:SS[.fff]` with an optional `N days ` prefix (pandas timedelta text).
///
/// `None` for signed components or totals that don't fit in `i64` milliseconds.
pub fn parse_duration_str(s: &str) -> Option<i64> {
    let s = s.trim();
    let (days, clock) = match s.split_once(" days ").or_else(|| s.split_once(" day ")) {
        Some((d, rest)) => (parse_unsigned(d.trim())?, rest.trim()),
        None => (0, s),
    };

    let mut parts = clock.split(':');
    let hours = parse_unsigned(parts.next()?)?;
    let minutes = parse_unsigned(parts.next()?)?;
    let seconds_text = parts.next()?;
    if parts.next().is_some() || minutes >= 60 {
        return None;
    }
    if seconds_text.is_empty() || !seconds_text.bytes().all(|b| b.is_ascii_digit() || b == b'.') {
        return None;
    }
    let seconds = seconds_text.parse::<f64>().ok()?;
    if !(0.0..60.0).contains(&seconds) {
        return None;
    }

    let whole_secs = days
        .checked_mul(24)?
        .checked_add(hours)?
        .checked_mul(60)?
        .checked_add(minutes)?
        .checked_mul(60)?;
    whole_secs
        .checked_mul(1000)?
        .checked_add((seconds * 1000.0).round() as i64)
}

/// One column of an entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSpec {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    /// Required fields must be present and non-null
    pub required: bool,
    /// Closed set of accepted text values
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allowed_values: Option<Vec<String>>,
    /// Pitch coordinate, subject to configured bounds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub axis: Option<Axis>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    X,
    Y,
}

impl FieldSpec {
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            required: true,
            allowed_values: None,
            axis: None,
        }
    }

    pub fn integer(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::Integer)
    }

    pub fn float(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::Float)
    }

    pub fn text(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::Text)
    }

    pub fn boolean(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::Boolean)
    }

    pub fn date(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::Date)
    }

    pub fn duration(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::Duration)
    }

    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    pub fn one_of<S: AsRef<str>>(mut self, values: &[S]) -> Self {
        self.allowed_values = Some(values.iter().map(|v| v.as_ref().to_string()).collect());
        self
    }

    pub fn coordinate(mut self, axis: Axis) -> Self {
        self.axis = Some(axis);
        self
    }

    /// Whether a text value belongs to the allowed set (always true without one).
    pub fn allows(&self, value: &str) -> bool {
        self.allowed_values
            .as_ref()
            .map_or(true, |allowed| allowed.iter().any(|a| a == value))
    }
}
