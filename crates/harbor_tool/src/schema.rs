//! Declarative tool definitions as written in the tool document.

use harbor_core::{SchemaVersion, VersionError};
use serde::{Deserialize, Deserializer, Serialize};

/// Top-level tool document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ToolDocument {
    /// Declared document version, checked by the loader
    #[serde(default, deserialize_with = "scalar_string")]
    pub version: Option<String>,
    /// Tool definitions in document order
    #[serde(default)]
    pub tools: Vec<ToolDefinition>,
}

impl ToolDocument {
    /// Create a document with a version and no tools
    #[must_use]
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            version: Some(version.into()),
            tools: Vec::new(),
        }
    }

    /// Add a tool definition
    #[must_use]
    pub fn with_tool(mut self, tool: ToolDefinition) -> Self {
        self.tools.push(tool);
        self
    }

    /// Parse the declared version, `None` when the document declares none
    #[must_use]
    pub fn schema_version(&self) -> Option<Result<SchemaVersion, VersionError>> {
        self.version.as_deref().map(SchemaVersion::parse)
    }
}

/// Accept any YAML scalar for the version so that `version: 1.0` reaches the
/// version check instead of failing the decode.
fn scalar_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(serde_json::Value::Null) => None,
        Some(serde_json::Value::String(s)) => Some(s),
        Some(other) => Some(other.to_string()),
    })
}

/// YAML null reads as missing, so `name: ~` compiles like an absent name
fn nullable_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// A single tool entry
///
/// Name and description default to empty so that one malformed entry is
/// rejected by the compiler rather than failing the whole document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Tool name
    #[serde(default, deserialize_with = "nullable_string")]
    pub name: String,
    /// Tool description shown to callers
    #[serde(default, deserialize_with = "nullable_string")]
    pub description: String,
    /// Parameters in declaration order
    #[serde(default)]
    pub parameters: Vec<ParameterDefinition>,
    /// Behavioural hints
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annotations: Option<ToolAnnotations>,
}

impl ToolDefinition {
    /// Create a definition with no parameters
    #[must_use]
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters: Vec::new(),
            annotations: None,
        }
    }

    /// Add a parameter
    #[must_use]
    pub fn with_parameter(mut self, parameter: ParameterDefinition) -> Self {
        self.parameters.push(parameter);
        self
    }

    /// Set annotations
    #[must_use]
    pub fn with_annotations(mut self, annotations: ToolAnnotations) -> Self {
        self.annotations = Some(annotations);
        self
    }
}

/// Behavioural hints for a tool
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolAnnotations {
    /// Human-readable title
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Tool does not modify its environment
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub read_only_hint: Option<bool>,
    /// Tool may perform destructive updates
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destructive_hint: Option<bool>,
    /// Repeating a call with the same arguments has no extra effect
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub idempotent_hint: Option<bool>,
    /// Tool interacts with external entities
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub open_world_hint: Option<bool>,
}

impl ToolAnnotations {
    /// Annotations for a read-only tool
    #[must_use]
    pub fn read_only(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            read_only_hint: Some(true),
            destructive_hint: Some(false),
            idempotent_hint: Some(true),
            open_world_hint: Some(false),
        }
    }

    /// Annotations for a mutating tool
    #[must_use]
    pub fn mutating(title: impl Into<String>, destructive: bool) -> Self {
        Self {
            title: Some(title.into()),
            read_only_hint: Some(false),
            destructive_hint: Some(destructive),
            idempotent_hint: Some(false),
            open_world_hint: Some(false),
        }
    }

    /// Only an explicit `readOnlyHint: true` counts
    #[must_use]
    pub fn is_read_only(&self) -> bool {
        self.read_only_hint == Some(true)
    }
}

/// Declared parameter type
///
/// Unknown tags decode as `String`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterType {
    /// String value
    #[default]
    String,
    /// Any JSON number
    Number,
    /// Boolean value
    Boolean,
    /// Ordered sequence
    Array,
    /// Nested mapping
    Object,
}

impl ParameterType {
    /// Map a type tag to a parameter type, falling back to `String`
    #[must_use]
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "string" => Self::String,
            "number" => Self::Number,
            "boolean" => Self::Boolean,
            "array" => Self::Array,
            "object" => Self::Object,
            _ => Self::String,
        }
    }

    /// Type tag as written in documents and JSON Schema
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Array => "array",
            Self::Object => "object",
        }
    }
}

impl std::fmt::Display for ParameterType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ParameterType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let tag = String::deserialize(deserializer)?;
        Ok(Self::from_tag(&tag))
    }
}

/// Nested shape descriptor for array elements
pub type ItemsShape = serde_json::Map<String, serde_json::Value>;

/// A single parameter description
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParameterDefinition {
    /// Parameter name, empty entries are rejected by the compiler
    #[serde(default, deserialize_with = "nullable_string")]
    pub name: String,
    /// Declared type
    #[serde(rename = "type", default)]
    pub kind: ParameterType,
    /// Whether callers must supply it
    #[serde(default)]
    pub required: bool,
    /// Description shown to callers
    #[serde(default, deserialize_with = "nullable_string")]
    pub description: String,
    /// Allowed values, string parameters only
    #[serde(rename = "enum", default, skip_serializing_if = "Option::is_none")]
    pub allowed: Option<Vec<String>>,
    /// Element shape, array parameters only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<ItemsShape>,
}

impl ParameterDefinition {
    /// Create an optional parameter
    #[must_use]
    pub fn new(name: impl Into<String>, kind: ParameterType) -> Self {
        Self {
            name: name.into(),
            kind,
            ..Self::default()
        }
    }

    /// Mark as required
    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Set description
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set allowed values
    #[must_use]
    pub fn with_enum<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed = Some(values.into_iter().map(Into::into).collect());
        self
    }

    /// Set element shape
    #[must_use]
    pub fn with_items(mut self, items: ItemsShape) -> Self {
        self.items = Some(items);
        self
    }
}
