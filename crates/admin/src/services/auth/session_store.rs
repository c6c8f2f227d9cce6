//! Server-side storage of the signed-in admin's session record.
//!
//! Wraps the per-request `tower_sessions::Session`. The record is keyed by the
//! opaque session id in the admin's cookie; expiry is enforced lazily at read
//! time and a record that fails to deserialize is discarded.

use chrono::{DateTime, Utc};
use tower_sessions::Session;

use crate::models::{AdminSession, session_keys};

/// Get/set/clear access to the [`AdminSession`] of one browser session.
#[derive(Clone)]
pub struct AdminSessionStore {
    session: Session,
}

impl AdminSessionStore {
    /// Wrap a request's session.
    #[must_use]
    pub const fn new(session: Session) -> Self {
        Self { session }
    }

    /// The current, unexpired session record.
    ///
    /// Expired or unreadable records are cleared and reported as `None`.
    pub async fn get(&self) -> Option<AdminSession> {
        self.get_at(Utc::now()).await
    }

    /// Like [`Self::get`], with an explicit clock.
    pub async fn get_at(&self, now: DateTime<Utc>) -> Option<AdminSession> {
        match self
            .session
            .get::<AdminSession>(session_keys::ADMIN_SESSION)
            .await
        {
            Ok(Some(admin)) if !admin.is_expired_at(now) => Some(admin),
            Ok(Some(admin)) => {
                tracing::debug!(
                    email = %admin.user.email,
                    expired_at = %admin.expires_at,
                    "Admin session expired"
                );
                self.discard().await;
                None
            }
            Ok(None) => None,
            Err(e) => {
                tracing::warn!(error = %e, "Unreadable admin session record, clearing");
                self.discard().await;
                None
            }
        }
    }

    /// Store a freshly issued session record.
    ///
    /// Rotates the session id first so a pre-login id cannot be reused.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be modified.
    pub async fn set(&self, admin: &AdminSession) -> Result<(), tower_sessions::session::Error> {
        self.session.cycle_id().await?;
        self.session.insert(session_keys::ADMIN_SESSION, admin).await
    }

    /// Remove the session record (sign-out).
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be modified.
    pub async fn clear(&self) -> Result<(), tower_sessions::session::Error> {
        self.session
            .remove_value(session_keys::ADMIN_SESSION)
            .await?;
        Ok(())
    }

    async fn discard(&self) {
        if let Err(e) = self.clear().await {
            tracing::warn!(error = %e, "Failed to clear admin session record");
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use chrono::TimeDelta;
    use homacuk_core::{AdminRole, AdminUserId, Email};
    use tower_sessions::MemoryStore;

    use super::*;
    use crate::models::AdminUser;

    fn store() -> AdminSessionStore {
        let session = Session::new(None, Arc::new(MemoryStore::default()), None);
        AdminSessionStore::new(session)
    }

    fn admin_session(expires_at: DateTime<Utc>) -> AdminSession {
        let user = AdminUser {
            id: AdminUserId::new(1),
            email: Email::parse("admin@homacuk.com").unwrap(),
            display_name: "Admin User".to_string(),
            role: AdminRole::Admin,
            created_at: Utc::now(),
            last_login: None,
        };
        AdminSession::new(user, "token".to_string(), expires_at)
    }

    #[tokio::test]
    async fn test_set_then_get() {
        let store = store();
        let session = admin_session(Utc::now() + TimeDelta::hours(8));
        store.set(&session).await.unwrap();
        assert_eq!(store.get().await, Some(session));
    }

    #[tokio::test]
    async fn test_empty_store_returns_none() {
        assert_eq!(store().get().await, None);
    }

    #[tokio::test]
    async fn test_expired_session_is_cleared() {
        let store = store();
        store
            .set(&admin_session(Utc::now() - TimeDelta::minutes(1)))
            .await
            .unwrap();

        assert_eq!(store.get().await, None);
        // Idempotent, and the record is gone from the underlying session.
        assert_eq!(store.get().await, None);
        let raw = store
            .session
            .get_value(session_keys::ADMIN_SESSION)
            .await
            .unwrap();
        assert!(raw.is_none());
    }

    #[tokio::test]
    async fn test_expiry_uses_supplied_clock() {
        let store = store();
        let expires_at = Utc::now() + TimeDelta::hours(8);
        store.set(&admin_session(expires_at)).await.unwrap();

        assert!(store.get_at(expires_at).await.is_some());
        assert!(store.get_at(expires_at + TimeDelta::seconds(1)).await.is_none());
        // The expired read removed the record for good.
        assert!(store.get_at(expires_at - TimeDelta::hours(1)).await.is_none());
    }

    #[tokio::test]
    async fn test_corrupt_record_is_cleared() {
        let store = store();
        store
            .session
            .insert(session_keys::ADMIN_SESSION, "definitely not a session")
            .await
            .unwrap();

        assert_eq!(store.get().await, None);
        let raw = store
            .session
            .get_value(session_keys::ADMIN_SESSION)
            .await
            .unwrap();
        assert!(raw.is_none());
    }

    #[tokio::test]
    async fn test_clear() {
        let store = store();
        store
            .set(&admin_session(Utc::now() + TimeDelta::hours(1)))
            .await
            .unwrap();
        store.clear().await.unwrap();
        assert_eq!(store.get().await, None);
        // Clearing twice is fine.
        store.clear().await.unwrap();
    }
}
