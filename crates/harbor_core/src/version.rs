//! Version types for tool documents.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Semantic version of a tool document, always written with a leading `v`
///
/// Shorthand forms (`v1`, `v1.2`) are padded with zeros. Build metadata is
/// dropped at parse time so ordering and equality follow semver precedence.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SchemaVersion {
    inner: semver::Version,
}

impl SchemaVersion {
    /// Create a new release version
    #[must_use]
    pub const fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self {
            inner: semver::Version::new(major, minor, patch),
        }
    }

    /// Parse from string
    ///
    /// # Errors
    ///
    /// Returns error if the `v` prefix is missing or the rest is not semver
    pub fn parse(s: &str) -> Result<Self, VersionError> {
        let rest = s
            .strip_prefix('v')
            .ok_or_else(|| VersionError::MissingPrefix(s.to_string()))?;
        if rest.is_empty() {
            return Err(VersionError::InvalidFormat(s.to_string()));
        }

        let (without_build, has_build) = match rest.split_once('+') {
            Some((head, _)) => (head, true),
            None => (rest, false),
        };
        let (core, pre) = match without_build.split_once('-') {
            Some((core, pre)) => (core, Some(pre)),
            None => (without_build, None),
        };

        let components = core.split('.').count();
        let normalized = match components {
            3 => without_build.to_string(),
            // shorthand is only valid without pre-release or build suffixes
            1 | 2 if pre.is_none() && !has_build => {
                format!("{}{}", core, ".0".repeat(3 - components))
            }
            _ => return Err(VersionError::InvalidFormat(s.to_string())),
        };

        let inner = semver::Version::parse(&normalized).map_err(|err| {
            VersionError::InvalidComponent {
                version: s.to_string(),
                reason: err.to_string(),
            }
        })?;

        Ok(Self { inner })
    }

    /// Major component
    #[must_use]
    pub fn major(&self) -> u64 {
        self.inner.major
    }

    /// Minor component
    #[must_use]
    pub fn minor(&self) -> u64 {
        self.inner.minor
    }

    /// Patch component
    #[must_use]
    pub fn patch(&self) -> u64 {
        self.inner.patch
    }

    /// Whether this is a pre-release version
    #[must_use]
    pub fn is_prerelease(&self) -> bool {
        !self.inner.pre.is_empty()
    }

    /// Check that this version is at least `minimum`
    ///
    /// Newer versions always satisfy an older minimum.
    #[must_use]
    pub fn satisfies(&self, minimum: &SchemaVersion) -> bool {
        self >= minimum
    }
}

impl fmt::Display for SchemaVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.inner)
    }
}

impl FromStr for SchemaVersion {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for SchemaVersion {
    type Error = VersionError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<SchemaVersion> for String {
    fn from(version: SchemaVersion) -> Self {
        version.to_string()
    }
}

/// Version-related errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VersionError {
    /// No leading `v`
    #[error("Version must start with 'v': {0}")]
    MissingPrefix(String),

    /// Wrong number of components or misplaced suffix
    #[error("Invalid version format: {0}")]
    InvalidFormat(String),

    /// A component failed to parse
    #[error("Invalid version component in {version}: {reason}")]
    InvalidComponent { version: String, reason: String },
}
