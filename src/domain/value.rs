//! Attribute value types and coercion rules.
//!
//! Every attribute value is persisted as a plain string; the typed
//! in-memory form is derived on read from the attribute's declared
//! type. The conversion table lives here so both the write path
//! (`to_stored`) and the read path (`from_stored`) stay in one place.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::errors::{AppError, AppResult};

/// Storage format for date and datetime values
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Date-only format accepted on read for date attributes
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Closed set of supported attribute types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttributeType {
    String,
    Integer,
    Decimal,
    Boolean,
    Date,
    DateTime,
    Text,
    Json,
}

impl AttributeType {
    /// Parse a raw type name into the closed enum.
    ///
    /// Anything outside the closed set is a validation error, raised
    /// before any persistence happens.
    pub fn parse(raw: &str) -> AppResult<Self> {
        match raw {
            "string" => Ok(AttributeType::String),
            "integer" => Ok(AttributeType::Integer),
            "decimal" => Ok(AttributeType::Decimal),
            "boolean" => Ok(AttributeType::Boolean),
            "date" => Ok(AttributeType::Date),
            "datetime" => Ok(AttributeType::DateTime),
            "text" => Ok(AttributeType::Text),
            "json" => Ok(AttributeType::Json),
            other => Err(AppError::validation(format!(
                "invalid attribute type: {other}"
            ))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AttributeType::String => "string",
            AttributeType::Integer => "integer",
            AttributeType::Decimal => "decimal",
            AttributeType::Boolean => "boolean",
            AttributeType::Date => "date",
            AttributeType::DateTime => "datetime",
            AttributeType::Text => "text",
            AttributeType::Json => "json",
        }
    }
}

impl std::fmt::Display for AttributeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Typed attribute value.
///
/// One variant per supported attribute type, so the coercion table is
/// exhaustive and checked by the compiler. `String` serves both the
/// `string` and `text` declared types.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TypedValue {
    String(String),
    Integer(i64),
    Decimal(f64),
    Boolean(bool),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
    Json(serde_json::Value),
}

impl TypedValue {
    /// Plain string form of the value, independent of any declared type.
    pub fn render(&self) -> String {
        match self {
            TypedValue::String(s) => s.clone(),
            TypedValue::Integer(i) => i.to_string(),
            TypedValue::Decimal(d) => d.to_string(),
            TypedValue::Boolean(b) => if *b { "1" } else { "0" }.to_string(),
            TypedValue::Date(d) => d
                .and_hms_opt(0, 0, 0)
                .unwrap_or_default()
                .format(DATETIME_FORMAT)
                .to_string(),
            TypedValue::DateTime(dt) => dt.format(DATETIME_FORMAT).to_string(),
            TypedValue::Json(v) => v.to_string(),
        }
    }

    /// Truthiness used when coercing into a boolean attribute.
    ///
    /// Empty strings and the literal "0" are false; everything else
    /// carrying content is true.
    pub fn is_truthy(&self) -> bool {
        match self {
            TypedValue::Boolean(b) => *b,
            TypedValue::Integer(i) => *i != 0,
            TypedValue::Decimal(d) => *d != 0.0,
            TypedValue::String(s) => !s.is_empty() && s != "0",
            TypedValue::Date(_) | TypedValue::DateTime(_) => true,
            TypedValue::Json(v) => !matches!(
                v,
                serde_json::Value::Null | serde_json::Value::Bool(false)
            ),
        }
    }

    /// Generic JSON form, used when coercing into a json attribute.
    pub fn to_json_value(&self) -> serde_json::Value {
        match self {
            TypedValue::String(s) => serde_json::Value::String(s.clone()),
            TypedValue::Integer(i) => serde_json::Value::from(*i),
            TypedValue::Decimal(d) => serde_json::Value::from(*d),
            TypedValue::Boolean(b) => serde_json::Value::Bool(*b),
            TypedValue::Date(_) | TypedValue::DateTime(_) => {
                serde_json::Value::String(self.render())
            }
            TypedValue::Json(v) => v.clone(),
        }
    }

    /// Write path: coerce the value into its stored string form,
    /// driven by the attribute's declared type.
    pub fn to_stored(&self, declared: AttributeType) -> String {
        match declared {
            AttributeType::String
            | AttributeType::Text
            | AttributeType::Integer
            | AttributeType::Decimal => self.render(),
            AttributeType::Boolean => if self.is_truthy() { "1" } else { "0" }.to_string(),
            AttributeType::Date | AttributeType::DateTime => self.render(),
            AttributeType::Json => self.to_json_value().to_string(),
        }
    }

    /// Read path: interpret a stored string as the attribute's
    /// declared type. Unparsable text fails with a coercion error
    /// rather than being silently defaulted.
    pub fn from_stored(raw: &str, declared: AttributeType) -> AppResult<Self> {
        match declared {
            AttributeType::String | AttributeType::Text => {
                Ok(TypedValue::String(raw.to_string()))
            }
            AttributeType::Integer => raw
                .trim()
                .parse::<i64>()
                .map(TypedValue::Integer)
                .map_err(|_| AppError::coercion(declared, raw)),
            AttributeType::Decimal => raw
                .trim()
                .parse::<f64>()
                .map(TypedValue::Decimal)
                .map_err(|_| AppError::coercion(declared, raw)),
            AttributeType::Boolean => Ok(TypedValue::Boolean(raw == "1")),
            AttributeType::Date => parse_date(raw)
                .map(TypedValue::Date)
                .ok_or_else(|| AppError::coercion(declared, raw)),
            AttributeType::DateTime => parse_datetime(raw)
                .map(TypedValue::DateTime)
                .ok_or_else(|| AppError::coercion(declared, raw)),
            AttributeType::Json => serde_json::from_str(raw)
                .map(TypedValue::Json)
                .map_err(|_| AppError::coercion(declared, raw)),
        }
    }
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw, DATE_FORMAT)
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(raw, DATETIME_FORMAT)
                .ok()
                .map(|dt| dt.date())
        })
}

fn parse_datetime(raw: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(raw, DATETIME_FORMAT)
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(raw, DATE_FORMAT)
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

impl From<&str> for TypedValue {
    fn from(s: &str) -> Self {
        TypedValue::String(s.to_string())
    }
}

impl From<String> for TypedValue {
    fn from(s: String) -> Self {
        TypedValue::String(s)
    }
}

impl From<i64> for TypedValue {
    fn from(i: i64) -> Self {
        TypedValue::Integer(i)
    }
}

impl From<f64> for TypedValue {
    fn from(d: f64) -> Self {
        TypedValue::Decimal(d)
    }
}

impl From<bool> for TypedValue {
    fn from(b: bool) -> Self {
        TypedValue::Boolean(b)
    }
}

impl From<NaiveDate> for TypedValue {
    fn from(d: NaiveDate) -> Self {
        TypedValue::Date(d)
    }
}

impl From<NaiveDateTime> for TypedValue {
    fn from(dt: NaiveDateTime) -> Self {
        TypedValue::DateTime(dt)
    }
}

impl From<serde_json::Value> for TypedValue {
    fn from(v: serde_json::Value) -> Self {
        TypedValue::Json(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_rejects_unknown_type() {
        let err = AttributeType::parse("currency").unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn parse_accepts_closed_set() {
        for name in [
            "string", "integer", "decimal", "boolean", "date", "datetime", "text", "json",
        ] {
            let ty = AttributeType::parse(name).unwrap();
            assert_eq!(ty.as_str(), name);
        }
    }

    #[test]
    fn string_round_trip() {
        let stored = TypedValue::from("O+").to_stored(AttributeType::String);
        assert_eq!(stored, "O+");
        let typed = TypedValue::from_stored(&stored, AttributeType::String).unwrap();
        assert_eq!(typed, TypedValue::from("O+"));
    }

    #[test]
    fn integer_round_trip() {
        let stored = TypedValue::from(42i64).to_stored(AttributeType::Integer);
        assert_eq!(stored, "42");
        let typed = TypedValue::from_stored(&stored, AttributeType::Integer).unwrap();
        assert_eq!(typed, TypedValue::Integer(42));
    }

    #[test]
    fn integer_read_fails_on_garbage() {
        let err = TypedValue::from_stored("not-a-number", AttributeType::Integer).unwrap_err();
        assert!(matches!(err, AppError::TypeCoercion { .. }));
    }

    #[test]
    fn decimal_round_trip() {
        let stored = TypedValue::from(36.6).to_stored(AttributeType::Decimal);
        let typed = TypedValue::from_stored(&stored, AttributeType::Decimal).unwrap();
        assert_eq!(typed, TypedValue::Decimal(36.6));
    }

    #[test]
    fn boolean_stores_one_or_zero() {
        assert_eq!(TypedValue::from(true).to_stored(AttributeType::Boolean), "1");
        assert_eq!(TypedValue::from(false).to_stored(AttributeType::Boolean), "0");
        // Non-boolean inputs coerce through truthiness
        assert_eq!(TypedValue::from(3i64).to_stored(AttributeType::Boolean), "1");
        assert_eq!(TypedValue::from("").to_stored(AttributeType::Boolean), "0");
    }

    #[test]
    fn boolean_reads_one_as_true_everything_else_as_false() {
        for (raw, expected) in [("1", true), ("0", false), ("", false), ("false", false)] {
            let typed = TypedValue::from_stored(raw, AttributeType::Boolean).unwrap();
            assert_eq!(typed, TypedValue::Boolean(expected), "raw={raw:?}");
        }
    }

    #[test]
    fn date_written_in_storage_format() {
        let date = NaiveDate::from_ymd_opt(1990, 5, 1).unwrap();
        let stored = TypedValue::from(date).to_stored(AttributeType::Date);
        assert_eq!(stored, "1990-05-01 00:00:00");
    }

    #[test]
    fn date_reads_both_date_and_datetime_text() {
        let expected = TypedValue::Date(NaiveDate::from_ymd_opt(1990, 5, 1).unwrap());
        assert_eq!(
            TypedValue::from_stored("1990-05-01", AttributeType::Date).unwrap(),
            expected
        );
        assert_eq!(
            TypedValue::from_stored("1990-05-01 00:00:00", AttributeType::Date).unwrap(),
            expected
        );
    }

    #[test]
    fn date_read_fails_on_unparsable_text() {
        let err = TypedValue::from_stored("next tuesday", AttributeType::Date).unwrap_err();
        assert!(matches!(err, AppError::TypeCoercion { .. }));
    }

    #[test]
    fn datetime_round_trip() {
        let dt = NaiveDate::from_ymd_opt(2024, 3, 15)
            .unwrap()
            .and_hms_opt(13, 30, 5)
            .unwrap();
        let stored = TypedValue::from(dt).to_stored(AttributeType::DateTime);
        assert_eq!(stored, "2024-03-15 13:30:05");
        let typed = TypedValue::from_stored(&stored, AttributeType::DateTime).unwrap();
        assert_eq!(typed, TypedValue::DateTime(dt));
    }

    #[test]
    fn json_round_trip() {
        let value = serde_json::json!({"allergies": ["penicillin"], "severity": 2});
        let stored = TypedValue::from(value.clone()).to_stored(AttributeType::Json);
        let typed = TypedValue::from_stored(&stored, AttributeType::Json).unwrap();
        assert_eq!(typed, TypedValue::Json(value));
    }

    #[test]
    fn json_wraps_scalar_inputs() {
        let stored = TypedValue::from(5i64).to_stored(AttributeType::Json);
        assert_eq!(stored, "5");
        let stored = TypedValue::from("a").to_stored(AttributeType::Json);
        assert_eq!(stored, "\"a\"");
    }

    #[test]
    fn json_read_fails_on_invalid_text() {
        let err = TypedValue::from_stored("{not json", AttributeType::Json).unwrap_err();
        assert!(matches!(err, AppError::TypeCoercion { .. }));
    }
}
