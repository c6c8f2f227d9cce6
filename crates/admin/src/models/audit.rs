//! Audit event record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use super::admin_user::AdminUser;

/// An immutable record of a security-relevant action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditEvent {
    /// Unique event ID.
    pub id: Uuid,
    /// When the event was recorded.
    pub timestamp: DateTime<Utc>,
    /// Free-form action name, e.g. `login_success`.
    pub action: String,
    /// Caller-supplied details, stored verbatim.
    #[serde(default)]
    pub details: Map<String, Value>,
    /// Acting user, if known.
    #[serde(default)]
    pub user: Option<AdminUser>,
}

impl AuditEvent {
    /// Create a new event stamped with a fresh ID and the current time.
    ///
    /// Non-object `details` are wrapped as `{"value": ...}`; `null` becomes
    /// an empty map.
    #[must_use]
    pub fn new(action: impl Into<String>, details: Value, user: Option<AdminUser>) -> Self {
        let details = match details {
            Value::Object(map) => map,
            Value::Null => Map::new(),
            other => {
                let mut map = Map::new();
                map.insert("value".to_string(), other);
                map
            }
        };

        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            action: action.into(),
            details,
            user,
        }
    }
}

/// Well-known audit action names.
pub mod actions {
    pub const LOGIN_SUCCESS: &str = "login_success";
    pub const LOGIN_FAILED: &str = "login_failed";
    pub const LOGOUT: &str = "logout";
    pub const PERMISSION_DENIED: &str = "permission_denied";
}
