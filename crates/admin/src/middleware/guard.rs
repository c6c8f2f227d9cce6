//! Route guard for the admin area.
//!
//! Every request under `/admin` must carry a live, server-side session
//! record. Page requests without one are redirected to the login page with
//! the original path as `redirect`; API requests get `401`. The login page
//! itself always passes.

use axum::{
    Json,
    extract::Request,
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use chrono::TimeDelta;
use serde_json::json;
use tower_sessions::Session;
use tower_sessions::cookie::{Cookie, SameSite, time::Duration as CookieDuration};

use crate::services::auth::AdminSessionStore;

/// Root of the admin area.
pub const ADMIN_PREFIX: &str = "/admin";

/// Login page, exempt from the guard.
pub const LOGIN_PATH: &str = "/admin/login";

/// JSON endpoints, answered with `401` instead of a redirect.
pub const API_PREFIX: &str = "/admin/api/";

/// Client-readable cookie reflecting signed-in state. Grants nothing.
pub const UI_FLAG_COOKIE: &str = "admin-auth";

/// Outcome of the guard for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    /// Let the request through.
    Allow,
    /// Send the browser to this login URL.
    RedirectTo(String),
    /// Reject an API request.
    Unauthorized,
}

/// Whether `path` is inside the admin area.
#[must_use]
pub fn is_admin_path(path: &str) -> bool {
    path == ADMIN_PREFIX
        || path
            .strip_prefix(ADMIN_PREFIX)
            .is_some_and(|rest| rest.starts_with('/'))
}

/// Decide what to do with a request for `path`.
#[must_use]
pub fn guard(path: &str, authenticated: bool) -> GuardDecision {
    if authenticated || !is_admin_path(path) || path == LOGIN_PATH {
        GuardDecision::Allow
    } else if path.starts_with(API_PREFIX) {
        GuardDecision::Unauthorized
    } else {
        GuardDecision::RedirectTo(login_url(path))
    }
}

/// Login page URL that returns to `path` after sign-in.
#[must_use]
pub fn login_url(path: &str) -> String {
    format!("{LOGIN_PATH}?redirect={}", urlencoding::encode(path))
}

/// Validate a post-login redirect target.
///
/// Only local paths inside the admin area are honoured; anything else,
/// including protocol-relative URLs, targets with control characters and the
/// login page itself, falls back to `/admin`.
#[must_use]
pub fn sanitize_redirect(target: Option<&str>) -> String {
    target
        .map(str::trim)
        .filter(|t| {
            !t.starts_with("//") && !t.contains('\\') && !t.chars().any(char::is_control)
        })
        .filter(|t| {
            let path = t.split(['?', '#']).next().unwrap_or_default();
            is_admin_path(path) && path != LOGIN_PATH
        })
        .map_or_else(|| ADMIN_PREFIX.to_string(), str::to_string)
}

/// Middleware enforcing [`guard`] with the server-side session record.
///
/// On success the [`AdminSession`](crate::models::AdminSession) is inserted
/// into request extensions for extractors downstream.
pub async fn admin_route_guard(session: Session, mut request: Request, next: Next) -> Response {
    let path = request.uri().path().to_owned();
    if !is_admin_path(&path) || path == LOGIN_PATH {
        return next.run(request).await;
    }

    let admin = AdminSessionStore::new(session).get().await;

    match guard(&path, admin.is_some()) {
        GuardDecision::Allow => {
            if let Some(admin) = admin {
                request.extensions_mut().insert(admin);
            }
            next.run(request).await
        }
        GuardDecision::RedirectTo(url) => {
            tracing::debug!(path = %path, "Unauthenticated admin request, redirecting to login");
            Redirect::to(&url).into_response()
        }
        GuardDecision::Unauthorized => (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "success": false, "error": "not signed in" })),
        )
            .into_response(),
    }
}

/// The UI flag cookie set on sign-in.
#[must_use]
pub fn ui_flag_cookie(ttl: TimeDelta) -> Cookie<'static> {
    Cookie::build((UI_FLAG_COOKIE, "true"))
        .path(ADMIN_PREFIX)
        .max_age(CookieDuration::seconds(ttl.num_seconds()))
        .same_site(SameSite::Strict)
        .build()
}

/// The UI flag cookie, already expired, set on sign-out.
#[must_use]
pub fn expired_ui_flag_cookie() -> Cookie<'static> {
    Cookie::build((UI_FLAG_COOKIE, ""))
        .path(ADMIN_PREFIX)
        .max_age(CookieDuration::ZERO)
        .same_site(SameSite::Strict)
        .build()
}
