//! Access levels for identity-to-permission mappings.

use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Closed set of role strings accepted in access maps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessLevel {
    /// Full control of an environment
    EnvironmentAdministrator,
    /// Read access plus support actions
    HelpdeskUser,
    /// Regular user
    StandardUser,
    /// Read only
    ReadonlyUser,
    /// Operational actions without configuration changes
    OperatorUser,
}

impl AccessLevel {
    /// Every access level, in declaration order
    pub const ALL: [AccessLevel; 5] = [
        Self::EnvironmentAdministrator,
        Self::HelpdeskUser,
        Self::StandardUser,
        Self::ReadonlyUser,
        Self::OperatorUser,
    ];

    /// Wire string for this level
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::EnvironmentAdministrator => "environment_administrator",
            Self::HelpdeskUser => "helpdesk_user",
            Self::StandardUser => "standard_user",
            Self::ReadonlyUser => "readonly_user",
            Self::OperatorUser => "operator_user",
        }
    }
}

impl std::fmt::Display for AccessLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccessLevel {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|level| level.as_str() == s)
            .ok_or_else(|| CoreError::InvalidAccessLevel {
                value: s.to_string(),
            })
    }
}

/// Check whether `s` names a known access level
#[must_use]
pub fn is_valid_access_level(s: &str) -> bool {
    AccessLevel::from_str(s).is_ok()
}
