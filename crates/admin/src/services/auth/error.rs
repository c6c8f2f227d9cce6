//! Admin authentication error types.

use homacuk_core::Email;
use thiserror::Error;

/// Errors that can occur during admin authentication operations.
#[derive(Debug, Error)]
pub enum AdminAuthError {
    /// Unknown email or wrong password. Deliberately does not say which.
    #[error("invalid email or password")]
    InvalidCredentials,

    /// The account table lists the same email twice.
    #[error("duplicate admin account: {0}")]
    DuplicateAccount(Email),

    /// Password hashing failed while building the account table.
    #[error("password hashing error")]
    PasswordHash,

    /// The session store could not be read or written.
    #[error("session store error: {0}")]
    Session(#[from] tower_sessions::session::Error),
}
