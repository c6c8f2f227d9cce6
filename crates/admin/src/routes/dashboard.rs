//! Dashboard and session/permission query handlers.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Serialize;

use super::SessionSummary;
use crate::middleware::RequireAdminAuth;
use crate::state::AppState;

/// Dashboard summary for the signed-in admin.
#[derive(Debug, Serialize)]
pub struct DashboardView {
    pub session: SessionSummary,
    pub features: Vec<String>,
    pub actions: Vec<String>,
}

/// Result of a single permission check.
#[derive(Debug, Serialize)]
pub struct PermissionCheck {
    pub feature: String,
    pub allowed: bool,
}

/// Result of a single action check.
#[derive(Debug, Serialize)]
pub struct ActionCheck {
    pub action: String,
    pub allowed: bool,
}

/// GET /admin
pub async fn index(
    State(state): State<AppState>,
    RequireAdminAuth(admin): RequireAdminAuth,
) -> Json<DashboardView> {
    let eval = state.evaluator(Some(&admin));

    Json(DashboardView {
        session: SessionSummary::from(&admin),
        features: eval.allowed_features().into_iter().map(String::from).collect(),
        actions: eval.allowed_actions().into_iter().map(String::from).collect(),
    })
}

/// GET /admin/api/session
pub async fn current_session(RequireAdminAuth(admin): RequireAdminAuth) -> Json<SessionSummary> {
    Json(SessionSummary::from(&admin))
}

/// GET /admin/api/permissions/{feature}
pub async fn check_permission(
    State(state): State<AppState>,
    RequireAdminAuth(admin): RequireAdminAuth,
    Path(feature): Path<String>,
) -> Json<PermissionCheck> {
    let allowed = state.evaluator(Some(&admin)).has_permission(&feature);
    Json(PermissionCheck { feature, allowed })
}

/// GET /admin/api/actions/{action}
pub async fn check_action(
    State(state): State<AppState>,
    RequireAdminAuth(admin): RequireAdminAuth,
    Path(action): Path<String>,
) -> Json<ActionCheck> {
    let allowed = state.evaluator(Some(&admin)).can_perform_action(&action);
    Json(ActionCheck { action, allowed })
}
