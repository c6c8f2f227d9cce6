//! Admin roles.

use serde::{Deserialize, Serialize};

/// Error returned when a role name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid admin role: {0} (expected admin or editor)")]
pub struct RoleParseError(pub String);

/// Role of an admin-area user.
///
/// `Admin` implicitly satisfies every role check; `Editor` manages content
/// but not users, settings or the audit log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdminRole {
    /// Full access to the admin area.
    Admin,
    /// Content management only.
    Editor,
}

impl AdminRole {
    /// Every role, in display order.
    pub const ALL: [Self; 2] = [Self::Admin, Self::Editor];

    /// Canonical lowercase name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Editor => "editor",
        }
    }
}

impl std::fmt::Display for AdminRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for AdminRole {
    type Err = RoleParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "admin" => Ok(Self::Admin),
            "editor" => Ok(Self::Editor),
            _ => Err(RoleParseError(s.to_owned())),
        }
    }
}
