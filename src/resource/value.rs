//! Scalar property values
//!
//! Values mirror the declared scalar types and render to the lexical forms
//! used by the RDF/XML serializer.

use super::types::ScalarType;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A scalar property value on a resource
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ScalarValue {
    String(String),
    Int16(i16),
    Int32(i32),
    Int64(i64),
    Decimal(f64),
    Boolean(bool),
    DateTime(DateTime<Utc>),
    Null,
}

impl ScalarValue {
    pub fn is_null(&self) -> bool {
        matches!(self, ScalarValue::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ScalarValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            ScalarValue::Int16(v) => Some(*v as i64),
            ScalarValue::Int32(v) => Some(*v as i64),
            ScalarValue::Int64(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_boolean(&self) -> Option<bool> {
        match self {
            ScalarValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_datetime(&self) -> Option<DateTime<Utc>> {
        match self {
            ScalarValue::DateTime(dt) => Some(*dt),
            _ => None,
        }
    }

    /// Declared type of this value, if it carries one
    pub fn scalar_type(&self) -> Option<ScalarType> {
        match self {
            ScalarValue::String(_) => Some(ScalarType::String),
            ScalarValue::Int16(_) => Some(ScalarType::Int16),
            ScalarValue::Int32(_) => Some(ScalarType::Int32),
            ScalarValue::Int64(_) => Some(ScalarType::Int64),
            ScalarValue::Decimal(_) => Some(ScalarType::Decimal),
            ScalarValue::Boolean(_) => Some(ScalarType::Boolean),
            ScalarValue::DateTime(_) => Some(ScalarType::DateTime),
            ScalarValue::Null => None,
        }
    }

    /// Lexical form used for RDF literals
    pub fn render(&self) -> String {
        match self {
            ScalarValue::String(s) => s.clone(),
            ScalarValue::Int16(v) => v.to_string(),
            ScalarValue::Int32(v) => v.to_string(),
            ScalarValue::Int64(v) => v.to_string(),
            ScalarValue::Decimal(v) => v.to_string(),
            ScalarValue::Boolean(b) => b.to_string(),
            ScalarValue::DateTime(dt) => dt.to_rfc3339_opts(SecondsFormat::Secs, true),
            ScalarValue::Null => String::new(),
        }
    }
}

impl fmt::Display for ScalarValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.render())
    }
}

impl From<String> for ScalarValue {
    fn from(s: String) -> Self {
        ScalarValue::String(s)
    }
}

impl From<&str> for ScalarValue {
    fn from(s: &str) -> Self {
        ScalarValue::String(s.to_string())
    }
}

impl From<i16> for ScalarValue {
    fn from(v: i16) -> Self {
        ScalarValue::Int16(v)
    }
}

impl From<i32> for ScalarValue {
    fn from(v: i32) -> Self {
        ScalarValue::Int32(v)
    }
}

impl From<i64> for ScalarValue {
    fn from(v: i64) -> Self {
        ScalarValue::Int64(v)
    }
}

impl From<f64> for ScalarValue {
    fn from(v: f64) -> Self {
        ScalarValue::Decimal(v)
    }
}

impl From<bool> for ScalarValue {
    fn from(b: bool) -> Self {
        ScalarValue::Boolean(b)
    }
}

impl From<DateTime<Utc>> for ScalarValue {
    fn from(dt: DateTime<Utc>) -> Self {
        ScalarValue::DateTime(dt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_scalar_type_mapping() {
        assert_eq!(
            ScalarValue::from(42i32).scalar_type(),
            Some(ScalarType::Int32)
        );
        assert_eq!(
            ScalarValue::from(true).scalar_type(),
            Some(ScalarType::Boolean)
        );
        assert_eq!(ScalarValue::Null.scalar_type(), None);
    }

    #[test]
    fn test_render_lexical_forms() {
        let dt = Utc.with_ymd_and_hms(2024, 3, 9, 12, 30, 0).unwrap();
        assert_eq!(
            ScalarValue::from(dt).render(),
            "2024-03-09T12:30:00Z"
        );
        assert_eq!(ScalarValue::from(false).render(), "false");
        assert_eq!(ScalarValue::from(7i16).render(), "7");
    }

    #[test]
    fn test_accessors() {
        assert_eq!(ScalarValue::from("x").as_str(), Some("x"));
        assert_eq!(ScalarValue::from(9i64).as_i64(), Some(9));
        assert_eq!(ScalarValue::from(9i16).as_i64(), Some(9));
        assert!(ScalarValue::Null.is_null());
    }
}
