//! Composite validators built on the parameter parser.
//!
//! Each takes the raw array returned by
//! [`ParameterParser::get_array_of_objects`](crate::params::ParameterParser::get_array_of_objects)
//! (or a raw string) and applies shape and enum rules. Duplicate keys are
//! not an error: the last entry wins.

use crate::params::{truncate, ArgumentError};
use harbor_core::{AccessLevel, ArgValue};
use std::collections::BTreeMap;
use std::str::FromStr;

/// Parsed `{id, access}` entries
pub type AccessMap = BTreeMap<i64, AccessLevel>;

/// Parse `[{id: number, access: string}]` into an access map
///
/// # Errors
///
/// Returns error naming the first entry, id, or access value that is invalid
pub fn parse_access_map(entries: &[ArgValue]) -> Result<AccessMap, ArgumentError> {
    let mut access_map = AccessMap::new();

    for entry in entries {
        let fields = entry
            .as_object()
            .ok_or_else(|| ArgumentError::InvalidAccessEntry(entry.to_string()))?;

        let id = field(fields, "id");
        let id = id
            .as_f64()
            .map(truncate)
            .ok_or_else(|| ArgumentError::InvalidId(id.to_string()))?;

        let access = field(fields, "access");
        let access = access
            .as_str()
            .ok_or_else(|| ArgumentError::InvalidAccess(access.to_string()))?;
        let level = AccessLevel::from_str(access)
            .map_err(|_| ArgumentError::InvalidAccessLevel(access.to_string()))?;

        access_map.insert(id, level);
    }

    Ok(access_map)
}

/// Parse `[{key: string, value: string}]` into a string map
///
/// # Errors
///
/// Returns error naming the first entry, key, or value that is invalid
pub fn parse_key_value_map(
    entries: &[ArgValue],
) -> Result<BTreeMap<String, String>, ArgumentError> {
    let mut map = BTreeMap::new();

    for entry in entries {
        let fields = entry
            .as_object()
            .ok_or_else(|| ArgumentError::InvalidKeyValueEntry(entry.to_string()))?;

        let key = field(fields, "key");
        let key = key
            .as_str()
            .ok_or_else(|| ArgumentError::InvalidKey(key.to_string()))?;

        let value = field(fields, "value");
        let value = value
            .as_str()
            .ok_or_else(|| ArgumentError::InvalidValue(value.to_string()))?;

        map.insert(key.to_string(), value.to_string());
    }

    Ok(map)
}

/// Missing fields read as null so the error shows `null`
fn field<'a>(fields: &'a indexmap::IndexMap<String, ArgValue>, name: &str) -> &'a ArgValue {
    const NULL: &ArgValue = &ArgValue::Null;
    fields.get(name).unwrap_or(NULL)
}

/// Parse `"1,2,3"` into integers
///
/// Segments are not trimmed. An empty string yields an empty vector.
///
/// # Errors
///
/// Returns error naming the first segment that is not a base-10 integer
pub fn parse_comma_separated_ints(input: &str) -> Result<Vec<i64>, ArgumentError> {
    if input.is_empty() {
        return Ok(Vec::new());
    }

    input
        .split(',')
        .map(|segment| {
            segment
                .parse::<i64>()
                .map_err(|_| ArgumentError::InvalidInteger(segment.to_string()))
        })
        .collect()
}

/// Check a string against an allowed set
///
/// # Errors
///
/// Returns error listing the allowed values
pub fn ensure_enum(name: &str, value: &str, allowed: &[String]) -> Result<(), ArgumentError> {
    if allowed.iter().any(|candidate| candidate == value) {
        return Ok(());
    }
    Err(ArgumentError::NotInEnum {
        name: name.to_string(),
        value: value.to_string(),
        allowed: allowed.to_vec(),
    })
}

/// Methods accepted by proxy-style tools
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    /// GET
    Get,
    /// POST
    Post,
    /// PUT
    Put,
    /// DELETE
    Delete,
    /// HEAD
    Head,
}

impl HttpMethod {
    /// Method name as sent on the wire
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
            Self::Head => "HEAD",
        }
    }
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parse a case-sensitive HTTP method name
///
/// # Errors
///
/// Returns error if the method is not GET, POST, PUT, DELETE, or HEAD
pub fn parse_http_method(method: &str) -> Result<HttpMethod, ArgumentError> {
    match method {
        "GET" => Ok(HttpMethod::Get),
        "POST" => Ok(HttpMethod::Post),
        "PUT" => Ok(HttpMethod::Put),
        "DELETE" => Ok(HttpMethod::Delete),
        "HEAD" => Ok(HttpMethod::Head),
        other => Err(ArgumentError::InvalidHttpMethod(other.to_string())),
    }
}
