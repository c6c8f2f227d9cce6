//! Admin configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `ADMIN_HOST` - Bind address (default: 127.0.0.1)
//! - `ADMIN_PORT` - Listen port (default: 3001)
//! - `ADMIN_BASE_URL` - Public URL for the admin area (default: <http://127.0.0.1:3001>)
//! - `ADMIN_SESSION_TTL_HOURS` - Session lifetime in hours (default: 8)
//! - `ADMIN_SIGN_IN_DELAY_MS` - Artificial delay before answering a sign-in (default: 0)
//! - `ADMIN_AUDIT_CAPACITY` - Number of audit events retained (default: 1000)
//! - `ADMIN_AUDIT_LOG_PATH` - JSON Lines file mirroring the audit log
//! - `ADMIN_ACCOUNTS_FILE` - YAML account table (built-in demo accounts otherwise)
//! - `ADMIN_LOG_FORMAT` - `json` or `text` (default: text, json on Fly.io)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT`, `SENTRY_SAMPLE_RATE`, `SENTRY_TRACES_SAMPLE_RATE`
//!
//! ## Optional (TLS)
//! - `ADMIN_TLS_CERT` - PEM-encoded certificate chain
//! - `ADMIN_TLS_KEY` - PEM-encoded private key

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use chrono::TimeDelta;
use homacuk_core::{AdminRole, Email};
use secrecy::SecretString;
use serde::Deserialize;
use thiserror::Error;

const DEFAULT_SESSION_TTL_HOURS: i64 = 8;
const DEFAULT_AUDIT_CAPACITY: usize = 1000;
const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;
const MIN_PASSWORD_LENGTH: usize = 12;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "secret",
    "password",
    "admin",
    "xxx",
    "todo",
    "fixme",
    "123",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
    #[error("Failed to read accounts file {0}: {1}")]
    AccountsFileRead(String, std::io::Error),
    #[error("Invalid accounts file: {0}")]
    AccountsFileParse(#[from] serde_yaml::Error),
    #[error("Accounts file defines no accounts")]
    NoAccounts,
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Admin application configuration.
#[derive(Debug, Clone)]
pub struct AdminConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the admin area
    pub base_url: String,
    /// Lifetime of a session from sign-in
    pub session_ttl: TimeDelta,
    /// Delay applied before answering a sign-in attempt
    pub sign_in_delay: Duration,
    /// Audit log settings
    pub audit: AuditConfig,
    /// Where the credential table comes from
    pub accounts: AccountsSource,
    /// Log output format
    pub log_format: LogFormat,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g., "development", "production")
    pub sentry_environment: Option<String>,
    /// Sentry error sample rate (0.0 to 1.0)
    pub sentry_sample_rate: f32,
    /// Sentry traces sample rate for performance monitoring (0.0 to 1.0)
    pub sentry_traces_sample_rate: f32,
    /// TLS configuration for HTTPS (optional)
    pub tls: Option<TlsConfig>,
}

/// Audit log settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditConfig {
    /// Maximum number of events retained.
    pub capacity: usize,
    /// Optional JSON Lines file the log is mirrored to.
    pub path: Option<PathBuf>,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_AUDIT_CAPACITY,
            path: None,
        }
    }
}

/// Source of the admin account table.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AccountsSource {
    /// Built-in demo accounts. Never use in production.
    #[default]
    Demo,
    /// YAML file with an `accounts` list.
    File(PathBuf),
}

/// One entry of the account table, before password hashing.
///
/// Implements `Debug` manually to redact the password.
#[derive(Clone)]
pub struct AccountSeed {
    pub email: Email,
    pub display_name: String,
    pub role: AdminRole,
    pub password: SecretString,
}

impl std::fmt::Debug for AccountSeed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccountSeed")
            .field("email", &self.email)
            .field("display_name", &self.display_name)
            .field("role", &self.role)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// TLS configuration for HTTPS.
#[derive(Clone)]
pub struct TlsConfig {
    /// PEM-encoded certificate chain
    pub cert_pem: String,
    /// PEM-encoded private key
    pub key_pem: SecretString,
}

impl std::fmt::Debug for TlsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TlsConfig")
            .field("cert_pem", &"[CERTIFICATE]")
            .field("key_pem", &"[REDACTED]")
            .finish()
    }
}

impl TlsConfig {
    fn from_env() -> Result<Option<Self>, ConfigError> {
        let cert_pem = get_optional_env("ADMIN_TLS_CERT");
        let key_pem = get_optional_env("ADMIN_TLS_KEY");

        match (cert_pem, key_pem) {
            (Some(cert), Some(key)) => Ok(Some(Self {
                cert_pem: cert,
                key_pem: SecretString::from(key),
            })),
            (None, None) => Ok(None),
            _ => Err(ConfigError::InvalidEnvVar(
                "ADMIN_TLS_*".to_string(),
                "Both ADMIN_TLS_CERT and ADMIN_TLS_KEY must be set together".to_string(),
            )),
        }
    }
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::from([127, 0, 0, 1]),
            port: 3001,
            base_url: "http://127.0.0.1:3001".to_string(),
            session_ttl: TimeDelta::hours(DEFAULT_SESSION_TTL_HOURS),
            sign_in_delay: Duration::ZERO,
            audit: AuditConfig::default(),
            accounts: AccountsSource::Demo,
            log_format: LogFormat::Text,
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 1.0,
            tls: None,
        }
    }
}

impl AdminConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = get_env_or_default("ADMIN_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("ADMIN_HOST".to_string(), e.to_string()))?;
        let port = get_env_or_default("ADMIN_PORT", "3001")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("ADMIN_PORT".to_string(), e.to_string()))?;
        let base_url = get_env_or_default("ADMIN_BASE_URL", "http://127.0.0.1:3001");

        let ttl_hours = get_parsed_env::<i64>("ADMIN_SESSION_TTL_HOURS")?
            .unwrap_or(DEFAULT_SESSION_TTL_HOURS);
        let session_ttl = TimeDelta::try_hours(ttl_hours)
            .filter(|ttl| *ttl > TimeDelta::zero())
            .ok_or_else(|| {
                ConfigError::InvalidEnvVar(
                    "ADMIN_SESSION_TTL_HOURS".to_string(),
                    format!("must be a positive number of hours (got {ttl_hours})"),
                )
            })?;

        let sign_in_delay =
            Duration::from_millis(get_parsed_env::<u64>("ADMIN_SIGN_IN_DELAY_MS")?.unwrap_or(0));

        let capacity =
            get_parsed_env::<usize>("ADMIN_AUDIT_CAPACITY")?.unwrap_or(DEFAULT_AUDIT_CAPACITY);
        if capacity == 0 {
            return Err(ConfigError::InvalidEnvVar(
                "ADMIN_AUDIT_CAPACITY".to_string(),
                "must be greater than zero".to_string(),
            ));
        }
        let audit = AuditConfig {
            capacity,
            path: get_optional_env("ADMIN_AUDIT_LOG_PATH").map(PathBuf::from),
        };

        let accounts = get_optional_env("ADMIN_ACCOUNTS_FILE")
            .map_or(AccountsSource::Demo, |path| AccountsSource::File(path.into()));

        let log_format = match get_optional_env("ADMIN_LOG_FORMAT").as_deref() {
            Some("json") => LogFormat::Json,
            Some("text") => LogFormat::Text,
            Some(other) => {
                return Err(ConfigError::InvalidEnvVar(
                    "ADMIN_LOG_FORMAT".to_string(),
                    format!("expected json or text, got {other}"),
                ));
            }
            // Use JSON format on Fly.io for structured log parsing
            None if std::env::var("FLY_APP_NAME").is_ok() => LogFormat::Json,
            None => LogFormat::Text,
        };

        let sentry_dsn = get_optional_env("SENTRY_DSN");
        let sentry_environment = get_optional_env("SENTRY_ENVIRONMENT");
        let sentry_sample_rate = get_optional_env("SENTRY_SAMPLE_RATE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(1.0);
        let sentry_traces_sample_rate = get_optional_env("SENTRY_TRACES_SAMPLE_RATE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(1.0);
        let tls = TlsConfig::from_env()?;

        Ok(Self {
            host,
            port,
            base_url,
            session_ttl,
            sign_in_delay,
            audit,
            accounts,
            log_format,
            sentry_dsn,
            sentry_environment,
            sentry_sample_rate,
            sentry_traces_sample_rate,
            tls,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether cookies should carry the `Secure` attribute.
    #[must_use]
    pub fn is_secure(&self) -> bool {
        self.base_url.starts_with("https://")
    }
}

// =============================================================================
// Account Table
// =============================================================================

#[derive(Debug, Deserialize)]
struct AccountsFile {
    accounts: Vec<AccountEntry>,
}

#[derive(Debug, Deserialize)]
struct AccountEntry {
    email: Email,
    display_name: String,
    role: AdminRole,
    password: String,
}

impl AccountsSource {
    /// Load the account table.
    ///
    /// The demo table is returned with a loud warning. Accounts read from a
    /// file have their passwords checked for placeholder patterns and
    /// entropy; weak passwords are reported but not rejected.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file cannot be read or parsed, or lists
    /// no accounts.
    pub fn load(&self) -> Result<Vec<AccountSeed>, ConfigError> {
        match self {
            Self::Demo => {
                tracing::warn!(
                    "Using built-in demo admin accounts with well-known passwords; \
                     set ADMIN_ACCOUNTS_FILE before exposing this server"
                );
                Ok(demo_accounts())
            }
            Self::File(path) => {
                let yaml = std::fs::read_to_string(path).map_err(|e| {
                    ConfigError::AccountsFileRead(path.display().to_string(), e)
                })?;
                parse_accounts_yaml(&yaml)
            }
        }
    }
}

/// Parse a YAML account table.
///
/// # Errors
///
/// Returns `ConfigError::AccountsFileParse` for malformed YAML, invalid
/// emails or unknown roles, and `ConfigError::NoAccounts` for an empty list.
pub fn parse_accounts_yaml(yaml: &str) -> Result<Vec<AccountSeed>, ConfigError> {
    let file: AccountsFile = serde_yaml::from_str(yaml)?;
    if file.accounts.is_empty() {
        return Err(ConfigError::NoAccounts);
    }

    Ok(file
        .accounts
        .into_iter()
        .map(|entry| {
            if let Err(e) = validate_password_strength(&entry.password, entry.email.as_str()) {
                tracing::warn!("Weak admin password: {e}");
            }
            AccountSeed {
                email: entry.email,
                display_name: entry.display_name,
                role: entry.role,
                password: SecretString::from(entry.password),
            }
        })
        .collect())
}

/// The built-in demo account table.
///
/// Plaintext demo passwords: acceptable for a local demo only.
#[must_use]
pub fn demo_accounts() -> Vec<AccountSeed> {
    let seed = |email: &str, display_name: &str, role, password: &str| AccountSeed {
        email: Email::parse(email).unwrap_or_else(|_| unreachable!("demo email is valid")),
        display_name: display_name.to_string(),
        role,
        password: SecretString::from(password),
    };

    vec![
        seed("admin@homacuk.com", "Admin User", AdminRole::Admin, "admin123"),
        seed("editor@homacuk.com", "Content Editor", AdminRole::Editor, "editor123"),
    ]
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse an optional environment variable.
fn get_parsed_env<T>(key: &str) -> Result<Option<T>, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    get_optional_env(key)
        .map(|raw| {
            raw.trim()
                .parse::<T>()
                .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
        })
        .transpose()
}

/// Calculate Shannon entropy in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut freq: HashMap<char, usize> = HashMap::new();
    for c in s.chars() {
        *freq.entry(c).or_insert(0) += 1;
    }

    #[allow(clippy::cast_precision_loss)] // String length will never exceed f64 precision
    let len = s.chars().count() as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)] // Character count will never exceed f64 precision
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Check that a password is long enough, not a placeholder, and has
/// sufficient entropy.
///
/// # Errors
///
/// Returns `ConfigError::InsecureSecret` naming `account` and the reason.
pub fn validate_password_strength(password: &str, account: &str) -> Result<(), ConfigError> {
    let insecure = |reason: String| ConfigError::InsecureSecret(account.to_string(), reason);

    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(insecure(format!(
            "must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }

    let lower = password.to_lowercase();
    if let Some(pattern) = PLACEHOLDER_PATTERNS.iter().find(|p| lower.contains(*p)) {
        return Err(insecure(format!(
            "appears to be a placeholder (contains '{pattern}')"
        )));
    }

    let entropy = shannon_entropy(password);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(insecure(format!(
            "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1})"
        )));
    }

    Ok(())
}
