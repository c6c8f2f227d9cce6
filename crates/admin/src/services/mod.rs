//! Business logic services for admin.
//!
//! # Services
//!
//! - `audit` - Bounded audit log with optional JSON Lines mirror
//! - `auth` - Password sign-in, session records and permission evaluation

pub mod audit;
pub mod auth;

pub use audit::{AuditError, AuditLog};
pub use auth::{
    AdminAuthError, AdminAuthService, AdminSessionStore, CredentialVerifier, PermissionDenied,
    PermissionEvaluator, PermissionTable,
};
