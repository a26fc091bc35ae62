//! Decoded call-argument values.
//!
//! Every JSON number decodes as `f64`; there is no separate integer
//! variant. `Null` is kept distinct so the parser can treat it as absent.

use crate::error::{CoreError, CoreResult};
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// A single decoded argument value
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ArgValue {
    /// Explicit null, treated as absent by the parser
    #[default]
    Null,
    /// Boolean
    Bool(bool),
    /// Any JSON number
    Number(f64),
    /// String
    String(String),
    /// Ordered sequence
    Array(Vec<ArgValue>),
    /// Nested mapping, insertion ordered
    Object(IndexMap<String, ArgValue>),
}

impl ArgValue {
    /// Name of the JSON type this value carries
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "boolean",
            Self::Number(_) => "number",
            Self::String(_) => "string",
            Self::Array(_) => "array",
            Self::Object(_) => "object",
        }
    }

    /// Check for null
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Borrow as a string
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Read as a number
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Read as a boolean
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Borrow as an array
    #[must_use]
    pub fn as_array(&self) -> Option<&[ArgValue]> {
        match self {
            Self::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Borrow as an object
    #[must_use]
    pub fn as_object(&self) -> Option<&IndexMap<String, ArgValue>> {
        match self {
            Self::Object(map) => Some(map),
            _ => None,
        }
    }

    /// Convert back into a `serde_json` value
    ///
    /// Non-finite numbers cannot be represented and become `null`.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Self::Null => serde_json::Value::Null,
            Self::Bool(b) => serde_json::Value::Bool(*b),
            Self::Number(n) => serde_json::Number::from_f64(*n)
                .map_or(serde_json::Value::Null, serde_json::Value::Number),
            Self::String(s) => serde_json::Value::String(s.clone()),
            Self::Array(items) => {
                serde_json::Value::Array(items.iter().map(Self::to_json).collect())
            }
            Self::Object(map) => serde_json::Value::Object(
                map.iter().map(|(k, v)| (k.clone(), v.to_json())).collect(),
            ),
        }
    }

    fn fmt_nested(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(s) => write!(f, "{}", serde_json::Value::String(s.clone())),
            other => write!(f, "{}", other),
        }
    }
}

/// Plain literal form used in error messages
///
/// Top-level strings render without quotes so `"3"` reads as `3`;
/// nested strings are quoted so containers stay unambiguous.
impl fmt::Display for ArgValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "null"),
            Self::Bool(b) => write!(f, "{}", b),
            Self::Number(n) => write!(f, "{}", n),
            Self::String(s) => write!(f, "{}", s),
            Self::Array(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    item.fmt_nested(f)?;
                }
                write!(f, "]")
            }
            Self::Object(map) => {
                write!(f, "{{")?;
                for (i, (key, value)) in map.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "{}:", serde_json::Value::String(key.clone()))?;
                    value.fmt_nested(f)?;
                }
                write!(f, "}}")
            }
        }
    }
}

impl From<serde_json::Value> for ArgValue {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(b) => Self::Bool(b),
            serde_json::Value::Number(n) => Self::Number(n.as_f64().unwrap_or(f64::NAN)),
            serde_json::Value::String(s) => Self::String(s),
            serde_json::Value::Array(items) => {
                Self::Array(items.into_iter().map(Self::from).collect())
            }
            serde_json::Value::Object(map) => {
                Self::Object(map.into_iter().map(|(k, v)| (k, Self::from(v))).collect())
            }
        }
    }
}

impl From<&str> for ArgValue {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for ArgValue {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<f64> for ArgValue {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<i64> for ArgValue {
    fn from(n: i64) -> Self {
        Self::Number(n as f64)
    }
}

impl From<bool> for ArgValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<Vec<ArgValue>> for ArgValue {
    fn from(items: Vec<ArgValue>) -> Self {
        Self::Array(items)
    }
}

impl Serialize for ArgValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for ArgValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        serde_json::Value::deserialize(deserializer).map(Self::from)
    }
}

/// The untyped, per-call argument bag
///
/// Owned by exactly one call and dropped once parsing finishes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CallArguments {
    values: IndexMap<String, ArgValue>,
}

impl CallArguments {
    /// Create an empty bag
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a decoded JSON value
    ///
    /// A missing argument object (`null`) is an empty bag.
    ///
    /// # Errors
    ///
    /// Returns error if the value is neither an object nor null
    pub fn from_json(value: serde_json::Value) -> CoreResult<Self> {
        match ArgValue::from(value) {
            ArgValue::Object(values) => Ok(Self { values }),
            ArgValue::Null => Ok(Self::new()),
            other => Err(CoreError::InvalidArguments {
                reason: format!("expected an object, got {}", other.type_name()),
            }),
        }
    }

    /// Decode from JSON text
    ///
    /// # Errors
    ///
    /// Returns error if the text is not JSON or not an object
    pub fn from_json_str(text: &str) -> CoreResult<Self> {
        let value: serde_json::Value = serde_json::from_str(text)?;
        Self::from_json(value)
    }

    /// Add a value, builder style
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<ArgValue>) -> Self {
        self.values.insert(name.into(), value.into());
        self
    }

    /// Raw lookup, null included
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ArgValue> {
        self.values.get(name)
    }

    /// Number of entries
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if the bag is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate entries in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&String, &ArgValue)> {
        self.values.iter()
    }
}

impl FromIterator<(String, ArgValue)> for CallArguments {
    fn from_iter<I: IntoIterator<Item = (String, ArgValue)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}
