//! Credential verification against the configured account table.

use std::collections::HashMap;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use chrono::{DateTime, Utc};
use homacuk_core::{AdminUserId, Email};
use secrecy::ExposeSecret;

use super::AdminAuthError;
use crate::config::AccountSeed;
use crate::models::AdminUser;

/// Verifies email/password pairs against a fixed account table.
///
/// Passwords are hashed with Argon2id when the table is built, so the
/// plaintext from configuration is not retained.
pub struct CredentialVerifier {
    accounts: HashMap<Email, Account>,
    /// Verified against when the email is unknown, to keep timing uniform.
    dummy_hash: String,
}

struct Account {
    password_hash: String,
    user: AdminUser,
}

impl CredentialVerifier {
    /// Build the account table.
    ///
    /// IDs are assigned in seed order starting at 1.
    ///
    /// # Errors
    ///
    /// Returns `AdminAuthError::DuplicateAccount` if two seeds share an email,
    /// or `AdminAuthError::PasswordHash` if hashing fails.
    pub fn new(seeds: &[AccountSeed], created_at: DateTime<Utc>) -> Result<Self, AdminAuthError> {
        let mut accounts = HashMap::with_capacity(seeds.len());

        for (index, seed) in (1..).zip(seeds) {
            if accounts.contains_key(&seed.email) {
                return Err(AdminAuthError::DuplicateAccount(seed.email.clone()));
            }

            let user = AdminUser {
                id: AdminUserId::new(index),
                email: seed.email.clone(),
                display_name: seed.display_name.clone(),
                role: seed.role,
                created_at,
                last_login: None,
            };
            let password_hash = hash_password(seed.password.expose_secret())?;
            accounts.insert(
                seed.email.clone(),
                Account {
                    password_hash,
                    user,
                },
            );
        }

        Ok(Self {
            accounts,
            dummy_hash: hash_password("not-a-real-account")?,
        })
    }

    /// Check an email/password pair.
    ///
    /// The email is matched case-insensitively; the password exactly.
    ///
    /// # Errors
    ///
    /// Returns `AdminAuthError::InvalidCredentials` if the email is malformed
    /// or unknown, or the password does not match.
    pub fn verify(&self, email: &str, password: &str) -> Result<AdminUser, AdminAuthError> {
        let account = Email::parse(email)
            .ok()
            .and_then(|email| self.accounts.get(&email));

        let Some(account) = account else {
            let _ = verify_password(password, &self.dummy_hash);
            return Err(AdminAuthError::InvalidCredentials);
        };

        if verify_password(password, &account.password_hash) {
            Ok(account.user.clone())
        } else {
            Err(AdminAuthError::InvalidCredentials)
        }
    }

    /// Look up a user by email without checking a password.
    #[must_use]
    pub fn user(&self, email: &Email) -> Option<&AdminUser> {
        self.accounts.get(email).map(|account| &account.user)
    }

    /// Number of accounts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    /// Whether the table is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }
}

/// Hash a password using Argon2id.
fn hash_password(password: &str) -> Result<String, AdminAuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AdminAuthError::PasswordHash)
}

/// Verify a password against a hash.
fn verify_password(password: &str, hash: &str) -> bool {
    PasswordHash::new(hash).is_ok_and(|parsed| {
        Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok()
    })
}
