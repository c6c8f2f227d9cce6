//! Application state shared across handlers.

use std::sync::Arc;

use chrono::Utc;
use thiserror::Error;

use crate::config::{AdminConfig, ConfigError};
use crate::models::AdminSession;
use crate::services::audit::{AuditError, AuditLog};
use crate::services::auth::{
    AdminAuthError, AdminAuthService, CredentialVerifier, PermissionEvaluator, PermissionTable,
};

/// Errors building application state at startup.
#[derive(Debug, Error)]
pub enum StateError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Auth(#[from] AdminAuthError),
    #[error(transparent)]
    Audit(#[from] AuditError),
}

/// Application state shared across all handlers.
///
/// Cheap to clone; everything lives behind one `Arc`.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: AdminConfig,
    credentials: CredentialVerifier,
    permissions: PermissionTable,
    audit: AuditLog,
}

impl AppState {
    /// Build state from configuration: load and hash the account table and
    /// open the audit log.
    ///
    /// # Errors
    ///
    /// Returns `StateError` if the account table cannot be loaded or hashed,
    /// or the audit file cannot be written.
    pub async fn new(config: AdminConfig) -> Result<Self, StateError> {
        let seeds = config.accounts.load()?;
        let credentials = CredentialVerifier::new(&seeds, Utc::now())?;
        tracing::info!(accounts = credentials.len(), "Admin accounts loaded");

        let audit = match &config.audit.path {
            Some(path) => AuditLog::open(path, config.audit.capacity).await?,
            None => AuditLog::in_memory(config.audit.capacity),
        };

        Ok(Self::from_parts(
            config,
            credentials,
            PermissionTable::default(),
            audit,
        ))
    }

    /// Assemble state from already-built parts.
    #[must_use]
    pub fn from_parts(
        config: AdminConfig,
        credentials: CredentialVerifier,
        permissions: PermissionTable,
        audit: AuditLog,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                credentials,
                permissions,
                audit,
            }),
        }
    }

    #[must_use]
    pub fn config(&self) -> &AdminConfig {
        &self.inner.config
    }

    #[must_use]
    pub fn credentials(&self) -> &CredentialVerifier {
        &self.inner.credentials
    }

    #[must_use]
    pub fn permissions(&self) -> &PermissionTable {
        &self.inner.permissions
    }

    #[must_use]
    pub fn audit(&self) -> &AuditLog {
        &self.inner.audit
    }

    /// Authentication service borrowing this state.
    #[must_use]
    pub fn auth_service(&self) -> AdminAuthService<'_> {
        AdminAuthService::new(
            self.credentials(),
            &self.inner.audit,
            self.inner.config.session_ttl,
            self.inner.config.sign_in_delay,
        )
    }

    /// Permission evaluator for `session` at the current time.
    #[must_use]
    pub fn evaluator<'a>(&'a self, session: Option<&'a AdminSession>) -> PermissionEvaluator<'a> {
        self.permissions().evaluate(session, Utc::now())
    }
}
