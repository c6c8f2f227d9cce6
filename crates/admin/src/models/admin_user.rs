//! Admin user domain type.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use homacuk_core::{AdminRole, AdminUserId, Email};

/// A user of the admin area.
///
/// Identity is the (normalized) email address. Serialized in camelCase to
/// match what the admin front end expects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminUser {
    /// Stable numeric ID.
    pub id: AdminUserId,
    /// Sign-in email address.
    pub email: Email,
    /// Name shown in the admin UI.
    pub display_name: String,
    /// Permission level.
    pub role: AdminRole,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
    /// Last successful sign-in, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_login: Option<DateTime<Utc>>,
}
