//! Immutable registry of compiled tools.
//!
//! Built once from a tool document, then shared read-only across request
//! handlers.

use crate::compiler::{compile_all, CompiledTool};
use crate::schema::{ToolDefinition, ToolDocument};
use indexmap::IndexMap;
use std::sync::Arc;

/// Error from registry lookups
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// Tool not found
    NotFound { name: String },
}

impl std::fmt::Display for RegistryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound { name } => write!(f, "Tool not found: {}", name),
        }
    }
}

impl std::error::Error for RegistryError {}

/// Registry of compiled tools keyed by name
///
/// Iteration follows first appearance in the source document.
#[derive(Debug, Clone, Default)]
pub struct ToolRegistry {
    tools: IndexMap<String, CompiledTool>,
}

/// Registry handle shared between handlers
pub type SharedRegistry = Arc<ToolRegistry>;

impl ToolRegistry {
    /// Create an empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Compile definitions into a registry, skipping invalid ones
    #[must_use]
    pub fn from_definitions(definitions: &[ToolDefinition]) -> Self {
        let tools = compile_all(definitions);
        tracing::debug!(
            compiled = tools.len(),
            declared = definitions.len(),
            "built tool registry"
        );
        Self { tools }
    }

    /// Compile a loaded document into a registry
    #[must_use]
    pub fn from_document(document: &ToolDocument) -> Self {
        Self::from_definitions(&document.tools)
    }

    /// Wrap for sharing
    #[must_use]
    pub fn into_shared(self) -> SharedRegistry {
        Arc::new(self)
    }

    /// Check if a tool is registered
    #[must_use]
    pub fn exists(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    /// Get a tool by name
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&CompiledTool> {
        self.tools.get(name)
    }

    /// Get a tool by name
    ///
    /// # Errors
    ///
    /// Returns error if tool not found
    pub fn require(&self, name: &str) -> Result<&CompiledTool, RegistryError> {
        self.tools.get(name).ok_or_else(|| RegistryError::NotFound {
            name: name.to_string(),
        })
    }

    /// Registered names in registration order
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.tools.keys().map(String::as_str).collect()
    }

    /// Iterate tools in registration order
    pub fn iter(&self) -> impl Iterator<Item = &CompiledTool> {
        self.tools.values()
    }

    /// Number of registered tools
    #[must_use]
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Check if registry is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

impl From<IndexMap<String, CompiledTool>> for ToolRegistry {
    fn from(tools: IndexMap<String, CompiledTool>) -> Self {
        Self { tools }
    }
}

impl<'a> IntoIterator for &'a ToolRegistry {
    type Item = &'a CompiledTool;
    type IntoIter = indexmap::map::Values<'a, String, CompiledTool>;

    fn into_iter(self) -> Self::IntoIter {
        self.tools.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::{load_str, MINIMUM_TOOLS_VERSION};
    use crate::params::ArgumentErrorKind;
    use crate::schema::{ParameterDefinition, ParameterType, ToolAnnotations};
    use harbor_core::CallArguments;

    fn definitions() -> Vec<ToolDefinition> {
        vec![
            ToolDefinition::new("listStacks", "List stacks")
                .with_annotations(ToolAnnotations::read_only("List Stacks")),
            ToolDefinition::new("", "nameless"),
            ToolDefinition::new("deleteStack", "Delete a stack").with_parameter(
                ParameterDefinition::new("id", ParameterType::Number).required(),
            ),
            ToolDefinition::new("listStacks", "List stacks again"),
        ]
    }

    #[test]
    fn test_registry_new() {
        let registry = ToolRegistry::new();
        assert!(registry.is_empty());
        assert_eq!(registry.len(), 0);
        assert!(registry.names().is_empty());
    }

    #[test]
    fn test_registry_from_definitions() {
        let registry = ToolRegistry::from_definitions(&definitions());
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.names(), vec!["listStacks", "deleteStack"]);
        assert!(registry.exists("deleteStack"));
        assert!(!registry.exists(""));
    }

    #[test]
    fn test_registry_duplicate_last_wins() {
        let registry = ToolRegistry::from_definitions(&definitions());
        let tool = registry.get("listStacks").unwrap();
        assert_eq!(tool.description, "List stacks again");
        assert!(!tool.is_read_only());
    }

    #[test]
    fn test_registry_get_not_found() {
        let registry = ToolRegistry::from_definitions(&definitions());
        assert!(registry.get("nonexistent").is_none());
        let err = registry.require("nonexistent").unwrap_err();
        assert_eq!(err.to_string(), "Tool not found: nonexistent");
    }

    #[test]
    fn test_registry_skips_null_name_or_description() {
        for broken in ["name: ~\n    description: x", "name: null\n    description: ~"] {
            let text = format!(
                "version: v1.0.0\ntools:\n  - {broken}\n  - name: ok\n    description: fine\n"
            );
            let doc = load_str(&text, MINIMUM_TOOLS_VERSION).unwrap();
            let registry = ToolRegistry::from_document(&doc);
            assert_eq!(registry.names(), vec!["ok"]);
        }
    }

    #[test]
    fn test_registry_skips_tool_with_unnamed_parameter() {
        let doc = load_str(
            r#"
version: v1.0.0
tools:
  - name: broken
    description: has an unnamed parameter
    parameters:
      - type: string
  - name: ok
    description: fine
"#,
            MINIMUM_TOOLS_VERSION,
        )
        .unwrap();
        let registry = ToolRegistry::from_document(&doc);
        assert_eq!(registry.names(), vec!["ok"]);
    }

    #[test]
    fn test_registry_end_to_end() {
        let doc = load_str(
            r#"
version: v1.0.0
tools:
  - name: t
    description: d
    parameters:
      - name: n
        type: number
        required: true
        description: a number
"#,
            MINIMUM_TOOLS_VERSION,
        )
        .unwrap();
        let registry = ToolRegistry::from_document(&doc);
        let tool = registry.require("t").unwrap();

        let args = CallArguments::from_json_str(r#"{"n": 3.0}"#).unwrap();
        let parser = crate::params::ParameterParser::new(&args);
        assert_eq!(parser.get_int("n", true).unwrap(), 3);
        assert!(tool.check_arguments(&args).is_ok());

        let err = tool.check_arguments(&CallArguments::new()).unwrap_err();
        assert_eq!(err.kind(), ArgumentErrorKind::Presence);
        assert_eq!(err.parameter(), Some("n"));
    }

    #[test]
    fn test_registry_shared_across_threads() {
        let shared = ToolRegistry::from_definitions(&definitions()).into_shared();

        std::thread::scope(|scope| {
            for _ in 0..4 {
                let registry = Arc::clone(&shared);
                scope.spawn(move || {
                    assert!(registry.exists("deleteStack"));
                    assert_eq!(registry.iter().count(), 2);
                });
            }
        });
    }

    #[test]
    fn test_registry_iteration_order() {
        let registry = ToolRegistry::from_definitions(&definitions());
        let names: Vec<&str> = (&registry).into_iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, registry.names());
    }
}
