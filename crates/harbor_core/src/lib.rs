//! HARBOR Core Types
//!
//! Pure value types with no I/O: the decoded call-argument model,
//! tool-document versions, and the closed set of access levels.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod access;
pub mod error;
pub mod value;
pub mod version;

// Re-exports
pub use access::{is_valid_access_level, AccessLevel};
pub use error::{CoreError, CoreResult};
pub use value::{ArgValue, CallArguments};
pub use version::{SchemaVersion, VersionError};
