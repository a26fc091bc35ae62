//! HARBOR tool system
//!
//! Declarative tool documents are loaded, version-checked, and compiled into
//! an immutable registry. Call arguments are checked against the compiled
//! schemas before a handler runs.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod schema;
pub mod loader;
pub mod compiler;
pub mod registry;
pub mod gate;
pub mod params;
pub mod validate;

pub use schema::{
    ItemsShape, ParameterDefinition, ParameterType, ToolAnnotations, ToolDefinition, ToolDocument,
};
pub use loader::{
    check_version, load, load_from, load_str, DocumentSource, LoadError, SourceError, StaticSource,
    VersionMismatch, MINIMUM_TOOLS_VERSION,
};
pub use compiler::{
    compile, compile_all, compile_parameter, CheckedArguments, CheckedValue, CompileError,
    CompiledTool, ParameterKind, ParameterSchema,
};
pub use registry::{RegistryError, SharedRegistry, ToolRegistry};
pub use gate::{CapabilityGate, GateReport};
pub use params::{ArgumentError, ArgumentErrorKind, ParameterParser};
pub use validate::{
    ensure_enum, parse_access_map, parse_comma_separated_ints, parse_http_method,
    parse_key_value_map, AccessMap, HttpMethod,
};
