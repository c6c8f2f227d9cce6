//! Session record stored for a signed-in admin.

use chrono::{DateTime, Utc};
use homacuk_core::AdminRole;
use serde::{Deserialize, Serialize};

use super::admin_user::AdminUser;

/// A time-bounded proof of authentication for one [`AdminUser`].
///
/// Lives in the server-side session store only. Callers must check
/// [`AdminSession::is_expired_at`] before trusting `user.role`; the session
/// store and permission evaluator both do.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminSession {
    /// The signed-in user.
    pub user: AdminUser,
    /// Opaque random token identifying this sign-in.
    pub token: String,
    /// Absolute expiry; the session is invalid once `now > expires_at`.
    pub expires_at: DateTime<Utc>,
}

impl AdminSession {
    /// Create a session record.
    #[must_use]
    pub const fn new(user: AdminUser, token: String, expires_at: DateTime<Utc>) -> Self {
        Self {
            user,
            token,
            expires_at,
        }
    }

    /// Whether the session has expired at `now`.
    #[must_use]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }

    /// Role of the signed-in user.
    #[must_use]
    pub const fn role(&self) -> AdminRole {
        self.user.role
    }
}

impl std::fmt::Debug for AdminSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminSession")
            .field("user", &self.user)
            .field("token", &"[REDACTED]")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Session keys for admin authentication data.
pub mod keys {
    /// Key for storing the signed-in admin's session record.
    pub const ADMIN_SESSION: &str = "admin_session";
}
