//! Compiler from declarative tool definitions to callable tool schemas.

use crate::params::{ArgumentError, ParameterParser};
use crate::schema::{
    ItemsShape, ParameterDefinition, ParameterType, ToolAnnotations, ToolDefinition,
};
use crate::validate::ensure_enum;
use harbor_core::{ArgValue, CallArguments};
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::{json, Value};

/// Per-definition compile failure
///
/// Recovered by [`compile_all`]: the tool is skipped and loading continues.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CompileError {
    /// Empty or missing name
    #[error("tool name is required")]
    MissingName,

    /// Empty or missing description
    #[error("tool description is required for {tool}")]
    MissingDescription { tool: String },

    /// A parameter entry without a name
    #[error("parameter {index} of {tool} has no name")]
    MissingParameterName { tool: String, index: usize },
}

/// Type-shaped options of a compiled parameter
#[derive(Debug, Clone, PartialEq)]
pub enum ParameterKind {
    /// String, optionally restricted to a set
    String { allowed: Option<Vec<String>> },
    /// Any JSON number
    Number,
    /// Boolean
    Boolean,
    /// Array with an optional element shape
    Array { items: Option<ItemsShape> },
    /// Nested object
    Object,
}

impl ParameterKind {
    /// The declared type this kind was compiled from
    #[must_use]
    pub fn parameter_type(&self) -> ParameterType {
        match self {
            Self::String { .. } => ParameterType::String,
            Self::Number => ParameterType::Number,
            Self::Boolean => ParameterType::Boolean,
            Self::Array { .. } => ParameterType::Array,
            Self::Object => ParameterType::Object,
        }
    }

    /// Whether array elements are declared as numbers
    #[must_use]
    pub fn has_numeric_items(&self) -> bool {
        match self {
            Self::Array { items: Some(items) } => {
                items.get("type").and_then(Value::as_str) == Some("number")
            }
            _ => false,
        }
    }
}

/// A compiled parameter
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterSchema {
    /// Parameter name
    pub name: String,
    /// Description shown to callers
    pub description: String,
    /// Whether callers must supply it
    pub required: bool,
    /// Type-specific options
    pub kind: ParameterKind,
}

impl ParameterSchema {
    /// JSON Schema property for this parameter
    #[must_use]
    pub fn to_json_schema(&self) -> Value {
        let mut property = json!({
            "type": self.kind.parameter_type().as_str(),
            "description": self.description,
        });
        match &self.kind {
            ParameterKind::String {
                allowed: Some(allowed),
            } => {
                property["enum"] = json!(allowed);
            }
            ParameterKind::Array { items: Some(items) } => {
                property["items"] = Value::Object(items.clone());
            }
            _ => {}
        }
        property
    }
}

/// A tool ready to be exposed
///
/// Built once at startup and never mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledTool {
    /// Tool name
    pub name: String,
    /// Description shown to callers
    pub description: String,
    /// Behavioural hints
    pub annotations: ToolAnnotations,
    /// Parameters in declaration order
    pub parameters: Vec<ParameterSchema>,
}

/// A value that passed its parameter's checks
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CheckedValue {
    /// String parameter
    String(String),
    /// Number parameter
    Number(f64),
    /// Boolean parameter
    Boolean(bool),
    /// Array parameter with numeric items
    Integers(Vec<i64>),
    /// Array parameter, elements unvalidated
    Array(Vec<ArgValue>),
    /// Object parameter
    Object(IndexMap<String, ArgValue>),
}

/// Checked values by parameter name, absent optionals omitted
pub type CheckedArguments = IndexMap<String, CheckedValue>;

impl CompiledTool {
    /// Look up a parameter by name
    #[must_use]
    pub fn parameter(&self, name: &str) -> Option<&ParameterSchema> {
        self.parameters.iter().find(|p| p.name == name)
    }

    /// Whether the tool declares itself read-only
    #[must_use]
    pub fn is_read_only(&self) -> bool {
        self.annotations.is_read_only()
    }

    /// Render the caller-facing JSON Schema for this tool's input
    #[must_use]
    pub fn input_schema(&self) -> Value {
        let properties: serde_json::Map<String, Value> = self
            .parameters
            .iter()
            .map(|p| (p.name.clone(), p.to_json_schema()))
            .collect();
        let required: Vec<&str> = self
            .parameters
            .iter()
            .filter(|p| p.required)
            .map(|p| p.name.as_str())
            .collect();

        json!({
            "type": "object",
            "properties": properties,
            "required": required,
        })
    }

    /// Check a call's arguments against every declared parameter
    ///
    /// Stops at the first failing parameter, in declaration order.
    ///
    /// # Errors
    ///
    /// Returns the first presence, type, or enum failure
    pub fn check_arguments(&self, args: &CallArguments) -> Result<CheckedArguments, ArgumentError> {
        let parser = ParameterParser::new(args);
        let mut checked = CheckedArguments::new();

        for param in &self.parameters {
            let name = param.name.as_str();
            if !param.required && !parser.is_present(name) {
                continue;
            }

            let value = match &param.kind {
                ParameterKind::String { allowed } => {
                    let value = parser.get_string(name, true)?;
                    if let Some(allowed) = allowed {
                        ensure_enum(name, &value, allowed)?;
                    }
                    CheckedValue::String(value)
                }
                ParameterKind::Number => CheckedValue::Number(parser.get_number(name, true)?),
                ParameterKind::Boolean => CheckedValue::Boolean(parser.get_boolean(name, true)?),
                kind @ ParameterKind::Array { .. } if kind.has_numeric_items() => {
                    CheckedValue::Integers(parser.get_array_of_integers(name, true)?)
                }
                ParameterKind::Array { .. } => {
                    CheckedValue::Array(parser.get_array_of_objects(name, true)?)
                }
                ParameterKind::Object => CheckedValue::Object(parser.get_object(name, true)?),
            };
            checked.insert(param.name.clone(), value);
        }

        Ok(checked)
    }
}

/// Compile one parameter
///
/// `enum` survives only on strings and `items` only on arrays.
#[must_use]
pub fn compile_parameter(param: &ParameterDefinition) -> ParameterSchema {
    let kind = match param.kind {
        ParameterType::String => ParameterKind::String {
            allowed: param.allowed.clone(),
        },
        ParameterType::Number => ParameterKind::Number,
        ParameterType::Boolean => ParameterKind::Boolean,
        ParameterType::Array => ParameterKind::Array {
            items: param.items.clone(),
        },
        ParameterType::Object => ParameterKind::Object,
    };

    ParameterSchema {
        name: param.name.clone(),
        description: param.description.clone(),
        required: param.required,
        kind,
    }
}

/// Compile one tool definition
///
/// # Errors
///
/// Returns error if the name or description is empty
pub fn compile(definition: &ToolDefinition) -> Result<CompiledTool, CompileError> {
    if definition.name.is_empty() {
        return Err(CompileError::MissingName);
    }
    if definition.description.is_empty() {
        return Err(CompileError::MissingDescription {
            tool: definition.name.clone(),
        });
    }
    if let Some(index) = definition.parameters.iter().position(|p| p.name.is_empty()) {
        return Err(CompileError::MissingParameterName {
            tool: definition.name.clone(),
            index,
        });
    }

    Ok(CompiledTool {
        name: definition.name.clone(),
        description: definition.description.clone(),
        annotations: definition.annotations.clone().unwrap_or_default(),
        parameters: definition.parameters.iter().map(compile_parameter).collect(),
    })
}

/// Compile every definition, skipping the ones that fail
///
/// Later definitions with a duplicate name overwrite earlier ones but keep
/// the earlier position.
#[must_use]
pub fn compile_all(definitions: &[ToolDefinition]) -> IndexMap<String, CompiledTool> {
    let mut tools = IndexMap::with_capacity(definitions.len());

    for (index, definition) in definitions.iter().enumerate() {
        match compile(definition) {
            Ok(tool) => {
                if tools.contains_key(&tool.name) {
                    tracing::debug!(
                        tool = %tool.name,
                        index,
                        "duplicate tool definition overwrites earlier entry"
                    );
                }
                tools.insert(tool.name.clone(), tool);
            }
            Err(err) => {
                tracing::warn!(index, error = %err, "skipping invalid tool definition");
            }
        }
    }

    tools
}
