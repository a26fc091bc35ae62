//! Subcommand implementations.
//!
//! Each command returns its stdout text so it can be tested without a
//! process.

use crate::config::HarborConfig;
use crate::source::{write_default, FileSource};
use color_eyre::eyre::{eyre, Result, WrapErr};
use harbor_core::CallArguments;
use harbor_tool::{
    load_from, parse_access_map, parse_http_method, parse_key_value_map, ArgumentError,
    CapabilityGate, ParameterParser, ToolRegistry,
};
use serde_json::{json, Value};

/// Tools this binary has handlers for
pub const SUPPORTED_TOOLS: &[&str] = &[
    "listEnvironments",
    "updateEnvironmentTags",
    "updateEnvironmentUserAccesses",
    "listEnvironmentGroups",
    "createEnvironmentGroup",
    "listStacks",
    "getStackFile",
    "createStack",
    "deleteStack",
    "listUsers",
    "updateUserRole",
    "updateSettings",
    "dockerProxy",
    "kubernetesProxy",
];

/// Structured checks applied after schema validation, by parameter name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Composite {
    AccessMap,
    KeyValue,
    HttpMethod,
}

const COMPOSITE_RULES: &[(&str, Composite)] = &[
    ("userAccesses", Composite::AccessMap),
    ("teamAccesses", Composite::AccessMap),
    ("env", Composite::KeyValue),
    ("queryParams", Composite::KeyValue),
    ("headers", Composite::KeyValue),
    ("method", Composite::HttpMethod),
];

/// Composite check failure, prefixed with the parameter it concerns
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CompositeError {
    /// Failure whose message already names the parameter
    #[error(transparent)]
    Named(ArgumentError),

    /// Entry-level failure inside a named parameter
    #[error("{parameter}: {source}")]
    Entry {
        parameter: &'static str,
        #[source]
        source: ArgumentError,
    },
}

impl CompositeError {
    fn within(parameter: &'static str) -> impl Fn(ArgumentError) -> Self {
        move |source| match source.parameter() {
            Some(_) => Self::Named(source),
            None => Self::Entry { parameter, source },
        }
    }
}

/// Result of a dry-run call
#[derive(Debug, Clone, PartialEq)]
pub struct CheckOutcome {
    /// JSON printed to stdout
    pub body: Value,
    /// Whether the arguments were accepted
    pub passed: bool,
}

impl CheckOutcome {
    fn failure(message: impl std::fmt::Display) -> Self {
        Self {
            body: json!({ "isError": true, "message": message.to_string() }),
            passed: false,
        }
    }
}

/// Load, compile, and build the registry named by the config
pub fn load_registry(config: &HarborConfig) -> Result<ToolRegistry> {
    let source = FileSource::new(&config.tools_path);
    let document = load_from(&source, &config.minimum_version.to_string())
        .wrap_err_with(|| format!("failed to load tools from {}", config.tools_path.display()))?;
    Ok(ToolRegistry::from_document(&document))
}

/// `init`
pub fn init(config: &HarborConfig, force: bool) -> Result<String> {
    write_default(&config.tools_path, force)
        .wrap_err_with(|| format!("cannot write {}", config.tools_path.display()))?;
    Ok(format!("wrote {}", config.tools_path.display()))
}

/// `list`
pub fn list(config: &HarborConfig, registry: &ToolRegistry) -> String {
    let gate = CapabilityGate::new(config.read_only);
    gate.exposed(registry)
        .iter()
        .map(|tool| {
            let marker = if tool.is_read_only() { "ro" } else { "rw" };
            format!("{:<32} {} {}", tool.name, marker, tool.description)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// `schema <TOOL>`
pub fn schema(config: &HarborConfig, registry: &ToolRegistry, name: &str) -> Result<String> {
    let gate = CapabilityGate::new(config.read_only);
    let tool = registry.require(name)?;
    if gate.admit(registry, name).is_none() {
        return Err(eyre!("tool {} is not exposed in read-only mode", name));
    }

    let rendered = json!({
        "name": tool.name,
        "description": tool.description,
        "inputSchema": tool.input_schema(),
        "annotations": tool.annotations,
    });
    Ok(serde_json::to_string_pretty(&rendered)?)
}

/// `check <TOOL> --args <JSON>`
pub fn check(
    config: &HarborConfig,
    registry: &ToolRegistry,
    name: &str,
    raw_args: &str,
) -> CheckOutcome {
    let gate = CapabilityGate::new(config.read_only);
    let tool = match registry.require(name) {
        Ok(tool) => tool,
        Err(err) => return CheckOutcome::failure(err),
    };
    if gate.admit(registry, name).is_none() {
        return CheckOutcome::failure(format!("tool {} is not exposed in read-only mode", name));
    }

    let args = match CallArguments::from_json_str(raw_args) {
        Ok(args) => args,
        Err(err) => return CheckOutcome::failure(err),
    };

    let checked = match tool.check_arguments(&args) {
        Ok(checked) => checked,
        Err(err) => return CheckOutcome::failure(err),
    };

    if let Err(err) = check_composites(&args) {
        return CheckOutcome::failure(err);
    }

    CheckOutcome {
        body: json!({ "isError": false, "tool": tool.name, "arguments": checked }),
        passed: true,
    }
}

fn check_composites(args: &CallArguments) -> Result<(), CompositeError> {
    let parser = ParameterParser::new(args);

    for &(name, rule) in COMPOSITE_RULES {
        if !parser.is_present(name) {
            continue;
        }
        let checked = match rule {
            Composite::AccessMap => parser
                .get_array_of_objects(name, true)
                .and_then(|entries| parse_access_map(&entries).map(drop)),
            Composite::KeyValue => parser
                .get_array_of_objects(name, true)
                .and_then(|entries| parse_key_value_map(&entries).map(drop)),
            Composite::HttpMethod => parser
                .get_string(name, true)
                .and_then(|method| parse_http_method(&method).map(drop)),
        };
        checked.map_err(CompositeError::within(name))?;
    }

    Ok(())
}

/// `gate`
pub fn gate(config: &HarborConfig, registry: &ToolRegistry) -> Result<String> {
    let gate = CapabilityGate::new(config.read_only);
    let report = gate.register_supported(registry, SUPPORTED_TOOLS.iter().copied());
    Ok(serde_json::to_string_pretty(&report)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::DEFAULT_TOOLS;
    use harbor_tool::MINIMUM_TOOLS_VERSION;
    use std::path::Path;

    fn config(path: &Path, read_only: bool) -> HarborConfig {
        HarborConfig::new(path.to_path_buf(), MINIMUM_TOOLS_VERSION, read_only).unwrap()
    }

    fn default_registry() -> ToolRegistry {
        let doc = harbor_tool::load_str(DEFAULT_TOOLS, MINIMUM_TOOLS_VERSION).unwrap();
        ToolRegistry::from_document(&doc)
    }

    #[test]
    fn test_load_registry_bootstraps() {
        let dir = tempfile::tempdir().unwrap();
        let registry = load_registry(&config(&dir.path().join("tools.yaml"), false)).unwrap();
        assert!(registry.exists("listEnvironments"));
    }

    #[test]
    fn test_load_registry_rejects_old_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tools.yaml");
        std::fs::write(&path, "version: v0.9.0\ntools: []\n").unwrap();

        let err = load_registry(&config(&path, false)).unwrap_err();
        let load_err = err.downcast_ref::<harbor_tool::LoadError>().unwrap();
        assert!(load_err.is_incompatible_version());
    }

    #[test]
    fn test_init_refuses_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tools.yaml");
        let config = config(&path, false);

        assert!(init(&config, false).is_ok());
        assert!(init(&config, false).is_err());
        assert!(init(&config, true).is_ok());
    }

    #[test]
    fn test_list_read_only() {
        let registry = default_registry();
        let all = list(&config(Path::new("tools.yaml"), false), &registry);
        let read_only = list(&config(Path::new("tools.yaml"), true), &registry);

        assert!(all.contains("deleteStack"));
        assert!(!read_only.contains("deleteStack"));
        assert!(read_only.lines().all(|line| line.contains(" ro ")));
    }

    #[test]
    fn test_schema_output() {
        let registry = default_registry();
        let cfg = config(Path::new("tools.yaml"), false);
        let text = schema(&cfg, &registry, "getStackFile").unwrap();
        let value: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["inputSchema"]["properties"]["id"]["type"], "number");
        assert_eq!(value["inputSchema"]["required"][0], "id");
        assert_eq!(value["annotations"]["readOnlyHint"], true);

        assert!(schema(&config(Path::new("tools.yaml"), true), &registry, "deleteStack").is_err());
        assert!(schema(&config(Path::new("tools.yaml"), false), &registry, "nope").is_err());
    }

    #[test]
    fn test_check_success() {
        let registry = default_registry();
        let outcome = check(
            &config(Path::new("tools.yaml"), false),
            &registry,
            "updateEnvironmentTags",
            r#"{"id": 4, "tagIds": [1, 2.0]}"#,
        );
        assert!(outcome.passed);
        assert_eq!(outcome.body["isError"], false);
        assert_eq!(outcome.body["arguments"]["tagIds"], json!([1, 2]));
    }

    #[test]
    fn test_check_failures_are_tool_errors() {
        let registry = default_registry();
        let cfg = config(Path::new("tools.yaml"), false);

        let outcome = check(&cfg, &registry, "updateEnvironmentTags", r#"{"tagIds": [1]}"#);
        assert!(!outcome.passed);
        assert_eq!(outcome.body, json!({"isError": true, "message": "id is required"}));

        let outcome = check(&cfg, &registry, "updateUserRole", r#"{"id": 1, "role": "root"}"#);
        assert_eq!(
            outcome.body["message"],
            "role must be one of [admin, user, edge_admin], got 'root'"
        );

        let outcome = check(&cfg, &registry, "missingTool", "{}");
        assert_eq!(outcome.body["message"], "Tool not found: missingTool");

        let outcome = check(&cfg, &registry, "listStacks", "[1]");
        assert!(!outcome.passed);
    }

    #[test]
    fn test_check_composites() {
        let registry = default_registry();
        let cfg = config(Path::new("tools.yaml"), false);

        let outcome = check(
            &cfg,
            &registry,
            "updateEnvironmentUserAccesses",
            r#"{"id": 1, "userAccesses": [{"id": 2, "access": "superuser"}]}"#,
        );
        assert_eq!(
            outcome.body["message"],
            "userAccesses: invalid access level: superuser"
        );

        let outcome = check(
            &cfg,
            &registry,
            "dockerProxy",
            r#"{"environmentId": 1, "method": "GET", "dockerAPIPath": "/info",
                "headers": [{"key": "X"}]}"#,
        );
        assert_eq!(outcome.body["message"], "headers: invalid value: null");

        let outcome = check(
            &cfg,
            &registry,
            "dockerProxy",
            r#"{"environmentId": 1, "method": "GET", "dockerAPIPath": "/info",
                "headers": [{"key": "X", "value": "y"}], "queryParams": [5]}"#,
        );
        assert_eq!(outcome.body["message"], "queryParams: invalid key-value entry: 5");

        let outcome = check(
            &cfg,
            &registry,
            "createStack",
            r#"{"name": "web", "file": "services: {}", "environmentGroupIds": [1],
                "env": [{"key": "A", "value": "b"}]}"#,
        );
        assert!(outcome.passed, "{}", outcome.body);
    }

    #[test]
    fn test_check_read_only_blocks_mutating() {
        let registry = default_registry();
        let cfg = config(Path::new("tools.yaml"), true);
        let outcome = check(&cfg, &registry, "deleteStack", r#"{"id": 1}"#);
        assert!(!outcome.passed);
        assert_eq!(
            outcome.body["message"],
            "tool deleteStack is not exposed in read-only mode"
        );
    }

    #[test]
    fn test_gate_report() {
        let registry = default_registry();
        let text = gate(&config(Path::new("tools.yaml"), true), &registry).unwrap();
        let report: harbor_tool::GateReport = serde_json::from_str(&text).unwrap();
        assert!(report.exposed.contains(&"listStacks".to_string()));
        assert!(report.suppressed.contains(&"dockerProxy".to_string()));
        assert_eq!(report.missing, vec!["kubernetesProxy".to_string()]);
    }
}
