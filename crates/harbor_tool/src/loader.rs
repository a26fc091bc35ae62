//! Tool document loading and compatibility gating.
//!
//! The loader never performs I/O itself. Callers hand it bytes directly or
//! through a [`DocumentSource`].

use crate::schema::ToolDocument;
use harbor_core::{SchemaVersion, VersionError};
use std::fmt;

/// Oldest tool document version this crate understands
pub const MINIMUM_TOOLS_VERSION: &str = "v1.0.0";

/// Why a document version was refused
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionMismatch {
    /// No version declared
    Missing,
    /// Declared version does not parse
    Malformed { found: String, reason: String },
    /// Declared version is older than the minimum
    TooOld { found: String, minimum: String },
}

impl fmt::Display for VersionMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing => write!(f, "document declares no version"),
            Self::Malformed { found, reason } => {
                write!(f, "cannot parse version '{}': {}", found, reason)
            }
            Self::TooOld { found, minimum } => {
                write!(f, "{} is below the minimum required version {}", found, minimum)
            }
        }
    }
}

/// Fatal configuration error from loading a tool document
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoadError {
    /// Document is not valid YAML for the expected shape
    #[error("failed to decode tool document: {0}")]
    Decode(String),

    /// Document version is absent, malformed, or too old
    #[error("incompatible tool document version: {0}")]
    IncompatibleVersion(VersionMismatch),

    /// The caller's minimum version is itself malformed
    #[error("invalid minimum version '{minimum}': {source}")]
    InvalidMinimum {
        minimum: String,
        #[source]
        source: VersionError,
    },

    /// The document could not be read
    #[error(transparent)]
    Source(#[from] SourceError),
}

impl LoadError {
    /// Whether this is a version compatibility failure
    #[must_use]
    pub fn is_incompatible_version(&self) -> bool {
        matches!(self, Self::IncompatibleVersion(_))
    }
}

/// Failure reading document bytes
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("cannot read tool document from {origin}: {reason}")]
pub struct SourceError {
    /// Where the bytes were expected to come from
    pub origin: String,
    /// Underlying cause
    pub reason: String,
}

impl SourceError {
    /// Create a source error
    #[must_use]
    pub fn new(origin: impl Into<String>, reason: impl fmt::Display) -> Self {
        Self {
            origin: origin.into(),
            reason: reason.to_string(),
        }
    }
}

/// Provider of tool document bytes
///
/// Injected by the loader's caller; file access, embedded defaults, and
/// bootstrapping live behind this trait.
pub trait DocumentSource {
    /// Human-readable origin for logs and errors
    fn describe(&self) -> String;

    /// Read the full document
    ///
    /// # Errors
    ///
    /// Returns error if the bytes cannot be obtained
    fn read(&self) -> Result<Vec<u8>, SourceError>;
}

/// In-memory document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticSource {
    label: String,
    bytes: Vec<u8>,
}

impl StaticSource {
    /// Wrap bytes under a label
    #[must_use]
    pub fn new(label: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            label: label.into(),
            bytes: bytes.into(),
        }
    }
}

impl DocumentSource for StaticSource {
    fn describe(&self) -> String {
        self.label.clone()
    }

    fn read(&self) -> Result<Vec<u8>, SourceError> {
        Ok(self.bytes.clone())
    }
}

/// Check a declared version against the minimum
///
/// # Errors
///
/// Returns `IncompatibleVersion` if the version is missing, malformed, or
/// older than `minimum`
pub fn check_version(
    declared: Option<&str>,
    minimum: &SchemaVersion,
) -> Result<SchemaVersion, LoadError> {
    let found = match declared {
        None => return Err(LoadError::IncompatibleVersion(VersionMismatch::Missing)),
        Some(v) if v.trim().is_empty() => {
            return Err(LoadError::IncompatibleVersion(VersionMismatch::Missing))
        }
        Some(v) => v,
    };

    let version = SchemaVersion::parse(found).map_err(|err| {
        LoadError::IncompatibleVersion(VersionMismatch::Malformed {
            found: found.to_string(),
            reason: err.to_string(),
        })
    })?;

    if !version.satisfies(minimum) {
        return Err(LoadError::IncompatibleVersion(VersionMismatch::TooOld {
            found: found.to_string(),
            minimum: minimum.to_string(),
        }));
    }

    Ok(version)
}

/// Decode and version-check a tool document
///
/// Either the whole document is returned or nothing is.
///
/// # Errors
///
/// Returns error if the minimum is malformed, the bytes do not decode, or
/// the document version is incompatible
pub fn load(bytes: &[u8], minimum_version: &str) -> Result<ToolDocument, LoadError> {
    let minimum =
        SchemaVersion::parse(minimum_version).map_err(|source| LoadError::InvalidMinimum {
            minimum: minimum_version.to_string(),
            source,
        })?;

    let document: ToolDocument =
        serde_yaml::from_slice(bytes).map_err(|err| LoadError::Decode(err.to_string()))?;

    let version = check_version(document.version.as_deref(), &minimum)?;

    tracing::debug!(
        version = %version,
        minimum = %minimum,
        tools = document.tools.len(),
        "loaded tool document"
    );

    Ok(document)
}

/// [`load`] over text
///
/// # Errors
///
/// See [`load`]
pub fn load_str(text: &str, minimum_version: &str) -> Result<ToolDocument, LoadError> {
    load(text.as_bytes(), minimum_version)
}

/// Read from a source, then [`load`]
///
/// # Errors
///
/// Returns the source error or any [`load`] error
pub fn load_from(
    source: &dyn DocumentSource,
    minimum_version: &str,
) -> Result<ToolDocument, LoadError> {
    let bytes = source.read()?;
    tracing::debug!(origin = %source.describe(), bytes = bytes.len(), "read tool document");
    load(&bytes, minimum_version)
}
