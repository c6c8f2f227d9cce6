//! Inspect a persisted audit log.
//!
//! # Usage
//!
//! ```bash
//! homacuk-cli audit --file /var/lib/homacuk/audit.jsonl --limit 20
//! ```

use std::fmt::Write as _;
use std::path::Path;

use homacuk_admin::models::AuditEvent;
use homacuk_admin::services::AuditError;
use homacuk_admin::services::audit::load_from_file;

/// Print the newest `limit` events from the JSON Lines file at `path`.
///
/// # Errors
///
/// Returns `AuditError::Io` if the file exists but cannot be read.
pub async fn show(path: &Path, limit: usize) -> Result<(), AuditError> {
    let events = newest(load_from_file(path).await?, limit);
    tracing::debug!(path = %path.display(), shown = events.len(), "Loaded audit events");

    let mut out = String::new();
    for event in &events {
        let _ = writeln!(out, "{}", format_event(event));
    }
    if events.is_empty() {
        out.push_str("No audit events.\n");
    }

    #[allow(clippy::print_stdout)]
    {
        print!("{out}");
    }
    Ok(())
}

/// Newest `limit` events, newest first, from an oldest-first list.
pub fn newest(mut events: Vec<AuditEvent>, limit: usize) -> Vec<AuditEvent> {
    events.reverse();
    events.truncate(limit);
    events
}

/// One line per event: time, action, acting user (or `-`), details.
pub fn format_event(event: &AuditEvent) -> String {
    let user = event
        .user
        .as_ref()
        .map_or("-", |user| user.email.as_str());
    let details = serde_json::Value::Object(event.details.clone());
    format!(
        "{}  {:<18}  {:<24}  {}",
        event.timestamp.format("%Y-%m-%d %H:%M:%S"),
        event.action,
        user,
        details
    )
}
