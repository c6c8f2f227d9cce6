//! Authentication extractors for admin route handlers.
//!
//! The route guard normally resolves the session and places it in request
//! extensions; these extractors reuse it and fall back to reading the session
//! store themselves for routes outside the guard.

use axum::{
    Json,
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Redirect, Response},
};
use serde_json::json;
use tower_sessions::Session;

use super::guard::{API_PREFIX, login_url};
use crate::models::AdminSession;
use crate::services::auth::AdminSessionStore;

/// Extractor that requires a live admin session.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireAdminAuth(admin): RequireAdminAuth,
/// ) -> impl IntoResponse {
///     format!("Hello, {}!", admin.user.display_name)
/// }
/// ```
pub struct RequireAdminAuth(pub AdminSession);

/// Error returned when admin authentication is required but missing.
pub enum AdminAuthRejection {
    /// Redirect to the login page, returning to this path afterwards.
    RedirectToLogin(String),
    /// Unauthorized response (for API requests).
    Unauthorized,
}

impl IntoResponse for AdminAuthRejection {
    fn into_response(self) -> Response {
        match self {
            Self::RedirectToLogin(path) => Redirect::to(&login_url(&path)).into_response(),
            Self::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "success": false, "error": "not signed in" })),
            )
                .into_response(),
        }
    }
}

impl<S> FromRequestParts<S> for RequireAdminAuth
where
    S: Send + Sync,
{
    type Rejection = AdminAuthRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Ok(OptionalAdminAuth(admin)) =
            OptionalAdminAuth::from_request_parts(parts, state).await;

        admin.map(Self).ok_or_else(|| {
            let path = parts.uri.path();
            if path.starts_with(API_PREFIX) {
                AdminAuthRejection::Unauthorized
            } else {
                AdminAuthRejection::RedirectToLogin(path.to_owned())
            }
        })
    }
}

/// Extractor that optionally gets the current admin session.
///
/// Unlike `RequireAdminAuth`, this does not reject the request if the admin
/// is not signed in.
pub struct OptionalAdminAuth(pub Option<AdminSession>);

impl<S> FromRequestParts<S> for OptionalAdminAuth
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        if let Some(admin) = parts.extensions.get::<AdminSession>() {
            return Ok(Self(Some(admin.clone())));
        }

        let admin = match parts.extensions.get::<Session>() {
            Some(session) => AdminSessionStore::new(session.clone()).get().await,
            None => None,
        };

        Ok(Self(admin))
    }
}
