//! Typed cells for tabular columns.
//!
//! The parsing layer is expected to deliver list-like and numeric columns
//! already coerced. A cell still keeps whatever shape actually arrived, so
//! a malformed value decodes successfully and is reported by validation
//! instead of aborting the whole load.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Number, Value};
use std::fmt;

/// A numeric column value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Numeric {
    /// A JSON number.
    Number(Number),
    /// Any non-number value (text, boolean, list, object).
    Invalid(Value),
}

impl Numeric {
    /// Creates a numeric cell from a float. Non-finite input becomes invalid.
    pub fn from_f64(value: f64) -> Self {
        match Number::from_f64(value) {
            Some(n) => Self::Number(n),
            None => Self::Invalid(Value::String(value.to_string())),
        }
    }

    /// The value if this cell holds an actual JSON number.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => n.as_f64(),
            Self::Invalid(_) => None,
        }
    }

    /// The numeric reading of this cell, accepting numeric text.
    ///
    /// Used for range checks and comparisons, where `"3"` reads as 3.
    pub fn value(&self) -> Option<f64> {
        match self {
            Self::Number(n) => n.as_f64(),
            Self::Invalid(Value::String(s)) => {
                s.trim().parse::<f64>().ok().filter(|v| v.is_finite())
            }
            Self::Invalid(_) => None,
        }
    }

    /// Whether this cell is an actual JSON number.
    pub fn is_number(&self) -> bool {
        matches!(self, Self::Number(_))
    }

    /// The raw JSON form of this cell.
    pub fn to_value(&self) -> Value {
        match self {
            Self::Number(n) => Value::Number(n.clone()),
            Self::Invalid(v) => v.clone(),
        }
    }
}

impl From<i64> for Numeric {
    fn from(value: i64) -> Self {
        Self::Number(value.into())
    }
}

impl From<i32> for Numeric {
    fn from(value: i32) -> Self {
        Self::Number(value.into())
    }
}

impl From<f64> for Numeric {
    fn from(value: f64) -> Self {
        Self::from_f64(value)
    }
}

impl From<&str> for Numeric {
    fn from(value: &str) -> Self {
        Self::Invalid(Value::String(value.to_string()))
    }
}

impl fmt::Display for Numeric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Invalid(Value::String(s)) => f.write_str(s),
            Self::Invalid(v) => write!(f, "{v}"),
        }
    }
}

/// A list-typed column value.
///
/// `Malformed` keeps anything that did not decode as a list of `T`:
/// comma-joined text that was never split, a scalar, or an array whose
/// elements have the wrong type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Sequence<T> {
    /// A proper ordered sequence.
    Items(Vec<T>),
    /// The raw value that is not a sequence of `T`.
    Malformed(Value),
}

impl<T> Sequence<T> {
    /// The elements, if this is a proper sequence.
    pub fn items(&self) -> Option<&[T]> {
        match self {
            Self::Items(items) => Some(items),
            Self::Malformed(_) => None,
        }
    }

    /// Whether the raw value is blank (empty text, `false`, or `0`).
    ///
    /// Blank cells are treated as "nothing entered" and are not reported.
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Items(_) => false,
            Self::Malformed(v) => is_blank(v),
        }
    }
}

impl Sequence<String> {
    /// Whether the sequence holds the given label.
    pub fn contains(&self, label: &str) -> bool {
        self.items()
            .is_some_and(|items| items.iter().any(|i| i == label))
    }
}

impl<T> From<Vec<T>> for Sequence<T> {
    fn from(items: Vec<T>) -> Self {
        Self::Items(items)
    }
}

/// The `AttributesJSON` column.
///
/// Usually JSON text; a parser may already have decoded it into an object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributesJson {
    /// Already-decoded object, accepted as-is.
    Object(Map<String, Value>),
    /// JSON text, to be parsed.
    Text(String),
    /// Any other value, accepted as-is.
    Other(Value),
}

impl AttributesJson {
    /// Whether the cell holds nothing worth checking.
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Object(_) => false,
            Self::Text(s) => s.is_empty(),
            Self::Other(v) => is_blank(v),
        }
    }

    /// Checks JSON well-formedness. Only text cells can fail.
    pub fn check_syntax(&self) -> Result<(), serde_json::Error> {
        match self {
            Self::Text(s) if !s.is_empty() => serde_json::from_str::<Value>(s).map(|_| ()),
            _ => Ok(()),
        }
    }

    /// The decoded attribute value, or `None` if the text is broken JSON.
    pub fn parsed(&self) -> Option<Value> {
        match self {
            Self::Object(map) => Some(Value::Object(map.clone())),
            Self::Text(s) => serde_json::from_str(s).ok(),
            Self::Other(v) => Some(v.clone()),
        }
    }
}

impl From<&str> for AttributesJson {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

/// Falsy values in the tabular sense: nothing was entered.
pub(crate) fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::String(s) => s.is_empty(),
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::Array(_) | Value::Object(_) => false,
    }
}

/// Decodes a text column, rendering non-text scalars as text.
///
/// Identifier columns sometimes arrive as numbers (`101` instead of `"101"`).
pub(crate) fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s),
        Some(other) => Some(other.to_string()),
    })
}
