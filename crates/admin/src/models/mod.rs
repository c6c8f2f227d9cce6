//! Domain models for the admin backend.

pub mod admin_user;
pub mod audit;
pub mod session;

pub use admin_user::AdminUser;
pub use audit::{AuditEvent, actions};
pub use session::{AdminSession, keys as session_keys};
