//! HTTP middleware stack for admin.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (binary only)
//! 2. `TraceLayer` (request span with status and latency)
//! 3. Security headers
//! 4. Request ID
//! 5. Session layer (tower-sessions, in-memory store)
//! 6. Admin route guard (server-verified session for `/admin/*`)

pub mod auth;
pub mod guard;
pub mod request_id;
pub mod security_headers;
pub mod session;

pub use auth::{AdminAuthRejection, OptionalAdminAuth, RequireAdminAuth};
pub use guard::{
    GuardDecision, admin_route_guard, expired_ui_flag_cookie, guard, login_url,
    sanitize_redirect, ui_flag_cookie,
};
pub use request_id::{REQUEST_ID_HEADER, request_id_middleware};
pub use security_headers::security_headers_middleware;
pub use session::{SESSION_COOKIE_NAME, create_session_layer};
