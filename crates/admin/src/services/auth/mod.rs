//! Admin authentication service.
//!
//! Email/password sign-in against the configured account table, server-side
//! session records and role-based permission checks. Every sign-in attempt
//! and sign-out is written to the audit log.

pub mod credentials;
mod error;
pub mod permissions;
pub mod session_store;

pub use credentials::CredentialVerifier;
pub use error::AdminAuthError;
pub use permissions::{PermissionDenied, PermissionEvaluator, PermissionTable};
pub use session_store::AdminSessionStore;

use std::time::Duration;

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use chrono::{TimeDelta, Utc};
use rand::RngCore;
use serde_json::json;

use crate::models::{AdminSession, actions};
use crate::services::audit::AuditLog;

/// Generate an opaque session token: 32 random bytes, base64url.
#[must_use]
pub fn generate_session_token() -> String {
    let mut bytes = [0u8; 32];
    rand::rng().fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Admin authentication service.
///
/// Borrows the long-lived pieces from application state for the duration of
/// one request.
pub struct AdminAuthService<'a> {
    verifier: &'a CredentialVerifier,
    audit: &'a AuditLog,
    session_ttl: TimeDelta,
    sign_in_delay: Duration,
}

impl<'a> AdminAuthService<'a> {
    /// Create a new admin authentication service.
    #[must_use]
    pub const fn new(
        verifier: &'a CredentialVerifier,
        audit: &'a AuditLog,
        session_ttl: TimeDelta,
        sign_in_delay: Duration,
    ) -> Self {
        Self {
            verifier,
            audit,
            session_ttl,
            sign_in_delay,
        }
    }

    /// Sign in with email and password.
    ///
    /// On success the new session record is stored (rotating the session id)
    /// and a `login_success` event is logged. On failure a `login_failed`
    /// event is logged with the attempted email only.
    ///
    /// # Errors
    ///
    /// Returns `AdminAuthError::InvalidCredentials` if the email is unknown or
    /// the password is wrong, or `AdminAuthError::Session` if the session
    /// record cannot be stored.
    pub async fn sign_in(
        &self,
        store: &AdminSessionStore,
        email: &str,
        password: &str,
    ) -> Result<AdminSession, AdminAuthError> {
        if !self.sign_in_delay.is_zero() {
            tokio::time::sleep(self.sign_in_delay).await;
        }

        let mut user = match self.verifier.verify(email, password) {
            Ok(user) => user,
            Err(e) => {
                tracing::info!(email = %email.trim(), "Admin sign-in failed");
                self.audit
                    .log(actions::LOGIN_FAILED, json!({ "email": email }), None)
                    .await;
                return Err(e);
            }
        };

        let now = Utc::now();
        user.last_login = Some(now);
        let session = AdminSession::new(user, generate_session_token(), now + self.session_ttl);

        store.set(&session).await?;

        tracing::info!(
            user_id = %session.user.id,
            email = %session.user.email,
            role = %session.user.role,
            expires_at = %session.expires_at,
            "Admin signed in"
        );
        self.audit
            .log(
                actions::LOGIN_SUCCESS,
                json!({ "email": session.user.email }),
                Some(&session.user),
            )
            .await;

        Ok(session)
    }

    /// Sign out, removing the session record.
    ///
    /// Logs `logout` when a live session was present. Signing out without a
    /// session is a no-op.
    ///
    /// # Errors
    ///
    /// Returns `AdminAuthError::Session` if the record cannot be removed.
    pub async fn sign_out(
        &self,
        store: &AdminSessionStore,
    ) -> Result<Option<AdminSession>, AdminAuthError> {
        let session = store.get().await;
        store.clear().await?;

        if let Some(session) = &session {
            tracing::info!(email = %session.user.email, "Admin signed out");
            self.audit
                .log(
                    actions::LOGOUT,
                    json!({ "email": session.user.email }),
                    Some(&session.user),
                )
                .await;
        }

        Ok(session)
    }
}
