//! Capability gating over the registry.

use crate::compiler::CompiledTool;
use crate::registry::ToolRegistry;
use serde::{Deserialize, Serialize};

/// Decides which registered tools are exposed to callers
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapabilityGate {
    /// Expose only tools annotated `readOnlyHint: true`
    pub read_only: bool,
}

/// Outcome of registering a set of implemented tools
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GateReport {
    /// Declared and admitted
    pub exposed: Vec<String>,
    /// Declared but blocked by read-only mode
    pub suppressed: Vec<String>,
    /// Implemented but not declared in the document
    pub missing: Vec<String>,
}

impl GateReport {
    /// Total names considered
    #[must_use]
    pub fn total(&self) -> usize {
        self.exposed.len() + self.suppressed.len() + self.missing.len()
    }
}

impl CapabilityGate {
    /// Create a gate
    #[must_use]
    pub const fn new(read_only: bool) -> Self {
        Self { read_only }
    }

    /// Whether a compiled tool passes this gate
    #[must_use]
    pub fn allows(&self, tool: &CompiledTool) -> bool {
        !self.read_only || tool.is_read_only()
    }

    /// Look up a tool and admit it
    ///
    /// Undeclared tools are never admitted.
    #[must_use]
    pub fn admit<'r>(&self, registry: &'r ToolRegistry, name: &str) -> Option<&'r CompiledTool> {
        registry.get(name).filter(|tool| self.allows(tool))
    }

    /// Every admitted tool in registry order
    #[must_use]
    pub fn exposed<'r>(&self, registry: &'r ToolRegistry) -> Vec<&'r CompiledTool> {
        registry.iter().filter(|tool| self.allows(tool)).collect()
    }

    /// Partition implemented tool names against the registry
    #[must_use]
    pub fn register_supported<'a, I>(&self, registry: &ToolRegistry, supported: I) -> GateReport
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut report = GateReport::default();

        for name in supported {
            match registry.get(name) {
                Some(tool) if self.allows(tool) => report.exposed.push(name.to_string()),
                Some(_) => report.suppressed.push(name.to_string()),
                None => report.missing.push(name.to_string()),
            }
        }

        tracing::info!(
            read_only = self.read_only,
            exposed = report.exposed.len(),
            suppressed = report.suppressed.len(),
            missing = report.missing.len(),
            "capability gate applied"
        );
        if !report.missing.is_empty() {
            tracing::debug!(missing = ?report.missing, "implemented tools absent from document");
        }

        report
    }
}
