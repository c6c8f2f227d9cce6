//! Session middleware configuration for admin.
//!
//! Sets up in-memory sessions using tower-sessions with strict cookie
//! settings (SameSite=Strict, `HttpOnly`, Secure behind HTTPS).

use chrono::TimeDelta;
use tower_sessions::cookie::time::Duration;
use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer};

use crate::config::AdminConfig;

/// Session cookie name for admin.
pub const SESSION_COOKIE_NAME: &str = "homacuk_admin_session";

/// How long a stored record outlives the sign-in it belongs to.
const RECORD_GRACE_SECS: i64 = 300;

/// Inactivity expiry for stored session records.
///
/// Always later than the sign-in expiry, so signed-in state ends through
/// [`AdminSessionStore`](crate::services::AdminSessionStore) and the
/// record is cleared there.
#[must_use]
pub fn record_expiry(session_ttl: TimeDelta) -> Duration {
    Duration::seconds(session_ttl.num_seconds().saturating_add(RECORD_GRACE_SECS))
}

/// Create the session layer with an in-memory store.
#[must_use]
pub fn create_session_layer(config: &AdminConfig) -> SessionManagerLayer<MemoryStore> {
    SessionManagerLayer::new(MemoryStore::default())
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(record_expiry(config.session_ttl)))
        .with_secure(config.is_secure())
        .with_same_site(tower_sessions::cookie::SameSite::Strict)
        .with_http_only(true)
        .with_path("/")
}
