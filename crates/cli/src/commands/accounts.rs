//! Validate an admin account file.
//!
//! # Usage
//!
//! ```bash
//! homacuk-cli accounts check --file accounts.yaml
//! ```
//!
//! The file format is the one read by the server via `ADMIN_ACCOUNTS_FILE`:
//!
//! ```yaml
//! accounts:
//!   - email: admin@homacuk.com
//!     display_name: Admin User
//!     role: admin
//!     password: "..."
//! ```

use std::path::Path;

use chrono::Utc;
use homacuk_admin::config::{
    AccountSeed, AccountsSource, ConfigError, validate_password_strength,
};
use homacuk_admin::services::{AdminAuthError, CredentialVerifier};
use secrecy::ExposeSecret;
use thiserror::Error;

/// Errors that make an account file unusable.
#[derive(Debug, Error)]
pub enum AccountsError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Auth(#[from] AdminAuthError),

    #[error("no accounts defined")]
    NoAccounts,
}

/// Summary of a checked account file.
#[derive(Debug, Default)]
pub struct AccountsReport {
    /// `(email, role)` of every account, in file order.
    pub accounts: Vec<(String, String)>,
    /// One message per weak password.
    pub warnings: Vec<String>,
}

/// Load, hash and report on the account file at `path`.
///
/// # Errors
///
/// Returns `AccountsError` if the file cannot be read or parsed, lists no
/// accounts, or lists an email twice.
pub fn check(path: &Path) -> Result<(), AccountsError> {
    let seeds = AccountsSource::File(path.to_path_buf()).load()?;
    let report = inspect(&seeds)?;

    #[allow(clippy::print_stdout)]
    {
        println!("{} account(s) in {}", report.accounts.len(), path.display());
        for (email, role) in &report.accounts {
            println!("  {email} ({role})");
        }
        for warning in &report.warnings {
            println!("warning: {warning}");
        }
    }
    Ok(())
}

/// Check seeds the way the server does at startup.
///
/// # Errors
///
/// Returns `AccountsError::Auth` for duplicate emails and
/// `AccountsError::NoAccounts` for an empty table.
pub fn inspect(seeds: &[AccountSeed]) -> Result<AccountsReport, AccountsError> {
    let verifier = CredentialVerifier::new(seeds, Utc::now())?;
    if verifier.is_empty() {
        return Err(AccountsError::NoAccounts);
    }

    Ok(AccountsReport {
        accounts: seeds
            .iter()
            .filter_map(|seed| verifier.user(&seed.email))
            .map(|user| (user.email.to_string(), user.role.to_string()))
            .collect(),
        warnings: seeds
            .iter()
            .filter_map(|seed| {
                validate_password_strength(seed.password.expose_secret(), seed.email.as_str())
                    .err()
                    .map(|e| e.to_string())
            })
            .collect(),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use homacuk_admin::config::{demo_accounts, parse_accounts_yaml};

    use super::*;

    #[test]
    fn test_demo_accounts_warn() {
        let report = inspect(&demo_accounts()).unwrap();
        assert_eq!(report.accounts.len(), 2);
        assert_eq!(report.accounts[0], ("admin@homacuk.com".to_string(), "admin".to_string()));
        assert_eq!(report.warnings.len(), 2);
    }

    #[test]
    fn test_empty_table_fails() {
        assert!(matches!(inspect(&[]), Err(AccountsError::NoAccounts)));
    }

    #[test]
    fn test_duplicate_email_fails() {
        let yaml = r#"
accounts:
  - email: a@homacuk.com
    display_name: A
    role: admin
    password: "vQ7#mZ2!rT9@kL4$"
  - email: A@HOMACUK.COM
    display_name: A again
    role: editor
    password: "pW3^nB8&cX1*hJ6%"
"#;
        let seeds = parse_accounts_yaml(yaml).unwrap();
        assert!(matches!(
            inspect(&seeds),
            Err(AccountsError::Auth(AdminAuthError::DuplicateAccount(_)))
        ));
    }

    #[test]
    fn test_check_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("accounts.yaml");
        std::fs::write(
            &path,
            "accounts:\n  - email: ed@homacuk.com\n    display_name: Ed\n    role: editor\n    password: \"pW3^nB8&cX1*hJ6%\"\n",
        )
        .unwrap();

        check(&path).unwrap();
        assert!(matches!(
            check(&dir.path().join("missing.yaml")),
            Err(AccountsError::Config(ConfigError::AccountsFileRead(_, _)))
        ));
    }
}
