//! Per-call parameter extraction.
//!
//! A [`ParameterParser`] borrows one call's [`CallArguments`] and hands out
//! typed values. Every failure names the parameter and states a single cause,
//! so an automated caller can repair the request and retry.

use harbor_core::{ArgValue, CallArguments};
use indexmap::IndexMap;

/// Argument validation failure
///
/// Returned as a failed-call result, never raised as a process fault.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ArgumentError {
    /// Required parameter absent or null
    #[error("{name} is required")]
    Missing { name: String },

    /// Present with the wrong JSON type
    #[error("{name} must be {expected}")]
    WrongType { name: String, expected: &'static str },

    /// An array element is not a number
    #[error("{name} must be an array of numbers: failed to parse '{value}' as integer")]
    InvalidElement { name: String, value: String },

    /// String outside its allowed set
    #[error("{name} must be one of [{}], got '{value}'", .allowed.join(", "))]
    NotInEnum {
        name: String,
        value: String,
        allowed: Vec<String>,
    },

    /// Access map entry is not an object
    #[error("invalid access entry: {0}")]
    InvalidAccessEntry(String),

    /// Access map entry without a numeric id
    #[error("invalid ID: {0}")]
    InvalidId(String),

    /// Access map entry without a string access
    #[error("invalid access: {0}")]
    InvalidAccess(String),

    /// Access string outside the access-level enumeration
    #[error("invalid access level: {0}")]
    InvalidAccessLevel(String),

    /// Key/value entry is not an object
    #[error("invalid key-value entry: {0}")]
    InvalidKeyValueEntry(String),

    /// Key/value entry without a string key
    #[error("invalid key: {0}")]
    InvalidKey(String),

    /// Key/value entry with a non-string value
    #[error("invalid value: {0}")]
    InvalidValue(String),

    /// Segment of a comma-separated list is not an integer
    #[error("invalid integer: '{0}'")]
    InvalidInteger(String),

    /// Method outside the proxy method set
    #[error("invalid HTTP method: {0}")]
    InvalidHttpMethod(String),
}

/// Which rule an argument broke
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArgumentErrorKind {
    /// Value absent
    Presence,
    /// Value or element has the wrong type
    Type,
    /// Composite entry has the wrong shape
    Shape,
    /// Value outside a closed set
    Enum,
    /// Text does not parse
    Format,
}

impl ArgumentError {
    /// Classify the failure
    #[must_use]
    pub fn kind(&self) -> ArgumentErrorKind {
        match self {
            Self::Missing { .. } => ArgumentErrorKind::Presence,
            Self::WrongType { .. } | Self::InvalidElement { .. } => ArgumentErrorKind::Type,
            Self::InvalidAccessEntry(_)
            | Self::InvalidId(_)
            | Self::InvalidAccess(_)
            | Self::InvalidKeyValueEntry(_)
            | Self::InvalidKey(_)
            | Self::InvalidValue(_) => ArgumentErrorKind::Shape,
            Self::NotInEnum { .. } | Self::InvalidAccessLevel(_) | Self::InvalidHttpMethod(_) => {
                ArgumentErrorKind::Enum
            }
            Self::InvalidInteger(_) => ArgumentErrorKind::Format,
        }
    }

    /// Parameter name, when the failure is tied to one
    #[must_use]
    pub fn parameter(&self) -> Option<&str> {
        match self {
            Self::Missing { name }
            | Self::WrongType { name, .. }
            | Self::InvalidElement { name, .. }
            | Self::NotInEnum { name, .. } => Some(name),
            _ => None,
        }
    }
}

/// Stateless extractor over one call's arguments
#[derive(Debug, Clone, Copy)]
pub struct ParameterParser<'a> {
    args: &'a CallArguments,
}

impl<'a> ParameterParser<'a> {
    /// Create a parser for a single call
    #[must_use]
    pub fn new(args: &'a CallArguments) -> Self {
        Self { args }
    }

    /// Null counts as absent
    fn lookup(&self, name: &str) -> Option<&'a ArgValue> {
        self.args.get(name).filter(|value| !value.is_null())
    }

    /// Whether a non-null value was supplied
    #[must_use]
    pub fn is_present(&self, name: &str) -> bool {
        self.lookup(name).is_some()
    }

    fn extract<T>(
        &self,
        name: &str,
        required: bool,
        expected: &'static str,
        convert: impl FnOnce(&'a ArgValue) -> Option<T>,
    ) -> Result<Option<T>, ArgumentError> {
        match self.lookup(name) {
            None if required => Err(ArgumentError::Missing {
                name: name.to_string(),
            }),
            None => Ok(None),
            Some(value) => convert(value)
                .map(Some)
                .ok_or_else(|| ArgumentError::WrongType {
                    name: name.to_string(),
                    expected,
                }),
        }
    }

    /// Get a string; absent and optional yields `""`
    ///
    /// # Errors
    ///
    /// Returns error if required and absent, or not a string
    pub fn get_string(&self, name: &str, required: bool) -> Result<String, ArgumentError> {
        Ok(self.get_optional_string_inner(name, required)?.unwrap_or_default())
    }

    /// Get a string, keeping absence distinct from `""`
    ///
    /// # Errors
    ///
    /// Returns error if present but not a string
    pub fn get_optional_string(&self, name: &str) -> Result<Option<String>, ArgumentError> {
        self.get_optional_string_inner(name, false)
    }

    fn get_optional_string_inner(
        &self,
        name: &str,
        required: bool,
    ) -> Result<Option<String>, ArgumentError> {
        self.extract(name, required, "a string", |value| {
            value.as_str().map(str::to_string)
        })
    }

    /// Get a number; absent and optional yields `0.0`
    ///
    /// # Errors
    ///
    /// Returns error if required and absent, or not a number
    pub fn get_number(&self, name: &str, required: bool) -> Result<f64, ArgumentError> {
        Ok(self
            .extract(name, required, "a number", ArgValue::as_f64)?
            .unwrap_or_default())
    }

    /// Get a number truncated toward zero; absent and optional yields `0`
    ///
    /// # Errors
    ///
    /// Returns error if required and absent, or not a number
    pub fn get_int(&self, name: &str, required: bool) -> Result<i64, ArgumentError> {
        self.get_number(name, required).map(truncate)
    }

    /// Get a boolean; absent and optional yields `false`
    ///
    /// # Errors
    ///
    /// Returns error if required and absent, or not a boolean
    pub fn get_boolean(&self, name: &str, required: bool) -> Result<bool, ArgumentError> {
        Ok(self
            .extract(name, required, "a boolean", ArgValue::as_bool)?
            .unwrap_or_default())
    }

    /// Get an array of integers; absent and optional yields an empty vector
    ///
    /// # Errors
    ///
    /// Returns error if required and absent, not an array, or any element
    /// is not a number
    pub fn get_array_of_integers(
        &self,
        name: &str,
        required: bool,
    ) -> Result<Vec<i64>, ArgumentError> {
        let Some(items) = self.extract(name, required, "an array", ArgValue::as_array)? else {
            return Ok(Vec::new());
        };

        items
            .iter()
            .map(|item| {
                item.as_f64()
                    .map(truncate)
                    .ok_or_else(|| ArgumentError::InvalidElement {
                        name: name.to_string(),
                        value: item.to_string(),
                    })
            })
            .collect()
    }

    /// Get an array with unvalidated elements; absent and optional yields an
    /// empty vector
    ///
    /// # Errors
    ///
    /// Returns error if required and absent, or not an array
    pub fn get_array_of_objects(
        &self,
        name: &str,
        required: bool,
    ) -> Result<Vec<ArgValue>, ArgumentError> {
        Ok(self
            .extract(name, required, "an array", ArgValue::as_array)?
            .map(<[ArgValue]>::to_vec)
            .unwrap_or_default())
    }

    /// Get a nested object; absent and optional yields an empty map
    ///
    /// # Errors
    ///
    /// Returns error if required and absent, or not an object
    pub fn get_object(
        &self,
        name: &str,
        required: bool,
    ) -> Result<IndexMap<String, ArgValue>, ArgumentError> {
        Ok(self
            .extract(name, required, "an object", ArgValue::as_object)?
            .cloned()
            .unwrap_or_default())
    }
}

/// Truncate toward zero; `as` saturates out-of-range values
pub(crate) fn truncate(n: f64) -> i64 {
    n.trunc() as i64
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    fn args(value: serde_json::Value) -> CallArguments {
        CallArguments::from_json(value).unwrap()
    }

    #[test]
    fn test_get_string() {
        let bag = args(json!({"name": "web", "count": 3}));
        let parser = ParameterParser::new(&bag);

        assert_eq!(parser.get_string("name", true).unwrap(), "web");
        assert_eq!(parser.get_string("absent", false).unwrap(), "");

        let err = parser.get_string("absent", true).unwrap_err();
        assert_eq!(err.to_string(), "absent is required");
        assert_eq!(err.kind(), ArgumentErrorKind::Presence);

        let err = parser.get_string("count", true).unwrap_err();
        assert_eq!(err.to_string(), "count must be a string");
        assert_eq!(err.kind(), ArgumentErrorKind::Type);
    }

    #[test]
    fn test_get_optional_string() {
        let bag = args(json!({"name": "", "bad": false}));
        let parser = ParameterParser::new(&bag);

        assert_eq!(parser.get_optional_string("name").unwrap(), Some(String::new()));
        assert_eq!(parser.get_optional_string("absent").unwrap(), None);
        assert!(parser.get_optional_string("bad").is_err());
    }

    #[test]
    fn test_null_is_absent() {
        let bag = args(json!({"name": null, "id": null, "flag": null}));
        let parser = ParameterParser::new(&bag);

        assert!(!parser.is_present("name"));
        assert_eq!(parser.get_string("name", false).unwrap(), "");
        assert_eq!(parser.get_int("id", false).unwrap(), 0);
        assert!(!parser.get_boolean("flag", false).unwrap());
        assert_eq!(
            parser.get_int("id", true).unwrap_err(),
            ArgumentError::Missing {
                name: "id".to_string()
            }
        );
    }

    #[test]
    fn test_get_int_missing() {
        let bag = CallArguments::new();
        let parser = ParameterParser::new(&bag);

        let msg = parser.get_int("id", true).unwrap_err().to_string();
        assert!(msg.contains("id"));
        assert!(msg.contains("required"));
        assert_eq!(parser.get_int("id", false).unwrap(), 0);
    }

    #[test]
    fn test_get_int_wrong_type() {
        let bag = args(json!({"id": "5"}));
        let parser = ParameterParser::new(&bag);

        let err = parser.get_int("id", true).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("id"));
        assert!(msg.contains("number"));
        assert!(!msg.contains("required"));
        assert_eq!(err.parameter(), Some("id"));
    }

    #[test]
    fn test_get_int_truncates_toward_zero() {
        let bag = args(json!({"a": 3.9, "b": -3.9, "c": 7}));
        let parser = ParameterParser::new(&bag);

        assert_eq!(parser.get_int("a", true).unwrap(), 3);
        assert_eq!(parser.get_int("b", true).unwrap(), -3);
        assert_eq!(parser.get_int("c", true).unwrap(), 7);
        assert!((parser.get_number("a", true).unwrap() - 3.9).abs() < f64::EPSILON);
    }

    #[test]
    fn test_get_boolean() {
        let bag = args(json!({"on": true, "text": "true"}));
        let parser = ParameterParser::new(&bag);

        assert!(parser.get_boolean("on", true).unwrap());
        assert!(!parser.get_boolean("off", false).unwrap());
        assert_eq!(
            parser.get_boolean("text", true).unwrap_err().to_string(),
            "text must be a boolean"
        );
    }

    #[test]
    fn test_get_array_of_integers() {
        let bag = args(json!({"tagIds": [1, 2, 3.5], "empty": []}));
        let parser = ParameterParser::new(&bag);

        assert_eq!(parser.get_array_of_integers("tagIds", true).unwrap(), vec![1, 2, 3]);
        assert!(parser.get_array_of_integers("empty", true).unwrap().is_empty());
        assert!(parser.get_array_of_integers("absent", false).unwrap().is_empty());
        assert!(parser.get_array_of_integers("absent", true).is_err());
    }

    #[test]
    fn test_get_array_of_integers_bad_element() {
        let bag = args(json!({"tagIds": [1, 2, "3"]}));
        let parser = ParameterParser::new(&bag);

        let err = parser.get_array_of_integers("tagIds", true).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("tagIds"));
        assert!(msg.contains('3'));
        assert_eq!(
            err,
            ArgumentError::InvalidElement {
                name: "tagIds".to_string(),
                value: "3".to_string()
            }
        );
    }

    #[test]
    fn test_get_array_of_integers_rejects_null_and_bool_elements() {
        let bag = args(json!({"a": [1, null], "b": [true], "c": "1,2"}));
        let parser = ParameterParser::new(&bag);

        assert!(parser
            .get_array_of_integers("a", true)
            .unwrap_err()
            .to_string()
            .contains("'null'"));
        assert!(parser
            .get_array_of_integers("b", true)
            .unwrap_err()
            .to_string()
            .contains("'true'"));
        assert_eq!(
            parser.get_array_of_integers("c", true).unwrap_err().to_string(),
            "c must be an array"
        );
    }

    #[test]
    fn test_get_array_of_objects() {
        let bag = args(json!({"entries": [{"id": 1}, "loose", 2], "scalar": 1}));
        let parser = ParameterParser::new(&bag);

        let entries = parser.get_array_of_objects("entries", true).unwrap();
        assert_eq!(entries.len(), 3);
        assert!(parser.get_array_of_objects("absent", false).unwrap().is_empty());
        assert!(parser.get_array_of_objects("absent", true).is_err());
        assert!(parser.get_array_of_objects("scalar", true).is_err());
    }

    #[test]
    fn test_get_object() {
        let bag = args(json!({"labels": {"env": "prod"}, "list": []}));
        let parser = ParameterParser::new(&bag);

        let labels = parser.get_object("labels", true).unwrap();
        assert_eq!(labels.get("env"), Some(&ArgValue::from("prod")));
        assert!(parser.get_object("absent", false).unwrap().is_empty());
        assert_eq!(
            parser.get_object("list", true).unwrap_err().to_string(),
            "list must be an object"
        );
    }

    proptest! {
        #[test]
        fn prop_int_matches_truncation(n in -1.0e12f64..1.0e12f64) {
            let bag = CallArguments::new().with("n", n);
            let parser = ParameterParser::new(&bag);
            prop_assert_eq!(parser.get_int("n", true).unwrap(), n.trunc() as i64);
        }

        #[test]
        fn prop_string_never_satisfies_number(s in ".*") {
            let bag = CallArguments::new().with("n", s);
            let parser = ParameterParser::new(&bag);
            let err = parser.get_number("n", true).unwrap_err();
            prop_assert_eq!(err.kind(), ArgumentErrorKind::Type);
        }
    }
}
