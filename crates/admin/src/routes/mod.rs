//! HTTP route handlers for admin.
//!
//! # Route Structure
//!
//! ```text
//! # Auth
//! GET  /admin/login                      - Login page
//! POST /admin/login                      - Sign in (form or JSON)
//! POST /admin/logout                     - Sign out
//!
//! # Dashboard
//! GET  /admin                            - Session and allowed features/actions
//!
//! # API (401 instead of redirect when signed out)
//! GET  /admin/api/session                - Current session
//! GET  /admin/api/permissions/{feature}  - Feature check
//! GET  /admin/api/actions/{action}       - Action check
//! GET  /admin/api/audit                  - Audit log (requires view_audit_log)
//! ```

use axum::{
    Router,
    routing::{get, post},
};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::{AdminSession, AdminUser};
use crate::state::AppState;

pub mod audit;
pub mod auth;
pub mod dashboard;

/// Client-facing view of a session. The token stays on the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    pub user: AdminUser,
    pub expires_at: DateTime<Utc>,
}

impl From<&AdminSession> for SessionSummary {
    fn from(session: &AdminSession) -> Self {
        Self {
            user: session.user.clone(),
            expires_at: session.expires_at,
        }
    }
}

/// Build the admin router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/admin", get(dashboard::index))
        .route("/admin/login", get(auth::login_page).post(auth::login))
        .route("/admin/logout", post(auth::logout))
        .route("/admin/api/session", get(dashboard::current_session))
        .route(
            "/admin/api/permissions/{feature}",
            get(dashboard::check_permission),
        )
        .route("/admin/api/actions/{action}", get(dashboard::check_action))
        .route("/admin/api/audit", get(audit::list))
}
