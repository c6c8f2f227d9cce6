//! Authentication route handlers for admin.
//!
//! Email/password sign-in from either the login page form or a JSON client,
//! and sign-out.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form, Json,
    extract::{FromRequest, Query, Request, State},
    http::{StatusCode, header::CONTENT_TYPE, header::SET_COOKIE},
    response::{AppendHeaders, IntoResponse, Redirect, Response},
};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;

use super::SessionSummary;
use crate::error::{AppError, clear_sentry_user, set_sentry_user};
use crate::filters;
use crate::middleware::guard::{LOGIN_PATH, expired_ui_flag_cookie, sanitize_redirect, ui_flag_cookie};
use crate::services::auth::{AdminAuthError, AdminSessionStore};
use crate::state::AppState;

// =============================================================================
// Request/Response Types
// =============================================================================

/// Sign-in credentials, from a form post or a JSON body.
#[derive(Deserialize)]
pub struct SignInForm {
    pub email: String,
    pub password: String,
    /// Where to go after signing in.
    #[serde(default)]
    pub redirect: Option<String>,
}

impl std::fmt::Debug for SignInForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignInForm")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .field("redirect", &self.redirect)
            .finish()
    }
}

/// A sign-in request, remembering how it was submitted.
///
/// JSON clients get a JSON answer; browser form posts get redirects.
#[derive(Debug)]
pub enum SignInRequest {
    Json(SignInForm),
    Form(SignInForm),
}

impl<S> FromRequest<S> for SignInRequest
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_json = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.starts_with("application/json"));

        if is_json {
            let Json(form) = Json::<SignInForm>::from_request(req, state)
                .await
                .map_err(|e| AppError::BadRequest(e.body_text()))?;
            Ok(Self::Json(form))
        } else {
            let Form(form) = Form::<SignInForm>::from_request(req, state)
                .await
                .map_err(|e| AppError::BadRequest(e.body_text()))?;
            Ok(Self::Form(form))
        }
    }
}

/// Answer to a JSON sign-in.
#[derive(Debug, Serialize)]
pub struct SignInResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session: Option<SessionSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect_to: Option<String>,
}

/// Query parameters of the login page.
#[derive(Debug, Default, Deserialize)]
pub struct LoginQuery {
    pub redirect: Option<String>,
    pub error: Option<String>,
}

// =============================================================================
// Templates
// =============================================================================

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub error: Option<&'static str>,
    pub redirect: String,
}

/// Fixed messages for the `error` codes the login page understands.
fn login_error_message(code: &str) -> Option<&'static str> {
    match code {
        "credentials" => Some("Invalid email or password."),
        "session" => Some("Your session could not be started. Please try again."),
        _ => None,
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// Display the login page.
///
/// GET /admin/login
pub async fn login_page(Query(query): Query<LoginQuery>) -> impl IntoResponse {
    LoginTemplate {
        error: query.error.as_deref().and_then(login_error_message),
        redirect: sanitize_redirect(query.redirect.as_deref()),
    }
}

/// Handle a sign-in attempt.
///
/// POST /admin/login
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    request: SignInRequest,
) -> Result<Response, AppError> {
    let (form, is_json) = match request {
        SignInRequest::Json(form) => (form, true),
        SignInRequest::Form(form) => (form, false),
    };
    let redirect_to = sanitize_redirect(form.redirect.as_deref());
    let store = AdminSessionStore::new(session);

    match state
        .auth_service()
        .sign_in(&store, &form.email, &form.password)
        .await
    {
        Ok(admin) => {
            set_sentry_user(admin.user.id.into(), Some(admin.user.email.as_str()));
            let cookie = AppendHeaders([(
                SET_COOKIE,
                ui_flag_cookie(state.config().session_ttl).to_string(),
            )]);

            if is_json {
                let body = SignInResponse {
                    success: true,
                    session: Some(SessionSummary::from(&admin)),
                    error: None,
                    redirect_to: Some(redirect_to),
                };
                Ok((cookie, Json(body)).into_response())
            } else {
                Ok((cookie, Redirect::to(&redirect_to)).into_response())
            }
        }
        Err(AdminAuthError::InvalidCredentials) => {
            if is_json {
                let body = SignInResponse {
                    success: false,
                    session: None,
                    error: Some(AdminAuthError::InvalidCredentials.to_string()),
                    redirect_to: None,
                };
                Ok((StatusCode::UNAUTHORIZED, Json(body)).into_response())
            } else {
                let url = format!(
                    "{LOGIN_PATH}?error=credentials&redirect={}",
                    urlencoding::encode(&redirect_to)
                );
                Ok(Redirect::to(&url).into_response())
            }
        }
        Err(e) => Err(e.into()),
    }
}

/// Sign out and clear the session record.
///
/// POST /admin/logout
pub async fn logout(State(state): State<AppState>, session: Session) -> Result<Response, AppError> {
    let store = AdminSessionStore::new(session);
    state.auth_service().sign_out(&store).await?;
    clear_sentry_user();

    Ok((
        AppendHeaders([(SET_COOKIE, expired_ui_flag_cookie().to_string())]),
        Redirect::to(LOGIN_PATH),
    )
        .into_response())
}
