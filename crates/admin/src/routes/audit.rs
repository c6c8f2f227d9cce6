//! Audit log viewer.

use axum::{
    Json,
    extract::{Query, State},
    http::Uri,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::error::AppError;
use crate::middleware::RequireAdminAuth;
use crate::models::{AuditEvent, actions};
use crate::state::AppState;

/// Feature gating the audit log.
pub const VIEW_AUDIT_LOG: &str = "view_audit_log";

#[derive(Debug, Default, Deserialize)]
pub struct AuditQuery {
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct AuditListing {
    pub events: Vec<AuditEvent>,
    pub capacity: usize,
}

/// GET /admin/api/audit
///
/// Newest first. Refusals are themselves audited as `permission_denied`.
pub async fn list(
    State(state): State<AppState>,
    RequireAdminAuth(admin): RequireAdminAuth,
    uri: Uri,
    Query(query): Query<AuditQuery>,
) -> Result<Json<AuditListing>, AppError> {
    if let Err(denied) = state.evaluator(Some(&admin)).require_permission(VIEW_AUDIT_LOG) {
        tracing::warn!(
            email = %admin.user.email,
            role = %admin.user.role,
            feature = VIEW_AUDIT_LOG,
            "Permission denied"
        );
        state
            .audit()
            .log(
                actions::PERMISSION_DENIED,
                json!({ "feature": VIEW_AUDIT_LOG, "path": uri.path() }),
                Some(&admin.user),
            )
            .await;
        return Err(denied.into());
    }

    let mut events = state.audit().events().await;
    if let Some(limit) = query.limit {
        events.truncate(limit);
    }

    Ok(Json(AuditListing {
        events,
        capacity: state.audit().capacity(),
    }))
}
