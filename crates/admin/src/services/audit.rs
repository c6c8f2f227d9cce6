//! Bounded audit log.
//!
//! Events are kept newest-first in memory, capped at a fixed capacity with
//! the oldest dropped first. When a file path is configured, each event is
//! also appended to a JSON Lines file (oldest-first on disk). On startup the
//! file is reloaded, unparsable lines are skipped, and the file is compacted
//! to the retained events. The file is compacted again whenever it grows to
//! twice the capacity.

use std::collections::VecDeque;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde_json::Value;
use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use crate::models::{AdminUser, AuditEvent};

/// Errors from audit log persistence.
#[derive(Debug, Error)]
pub enum AuditError {
    /// Reading or writing the audit file failed.
    #[error("audit log I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// An event could not be serialized.
    #[error("audit event serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl AuditError {
    fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.display().to_string(),
            source,
        }
    }
}

/// Append-only, bounded audit log.
pub struct AuditLog {
    capacity: usize,
    inner: Mutex<AuditInner>,
}

struct AuditInner {
    /// Newest first.
    events: VecDeque<AuditEvent>,
    file: Option<AuditFile>,
}

struct AuditFile {
    path: PathBuf,
    /// Lines currently on disk, used to trigger compaction.
    lines: usize,
}

impl AuditLog {
    /// Create an in-memory audit log.
    ///
    /// A capacity of zero is treated as one.
    #[must_use]
    pub fn in_memory(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            inner: Mutex::new(AuditInner {
                events: VecDeque::with_capacity(capacity),
                file: None,
            }),
        }
    }

    /// Open an audit log mirrored to a JSON Lines file.
    ///
    /// Existing events are loaded (corrupt lines skipped) and the file is
    /// rewritten with the newest `capacity` of them.
    ///
    /// # Errors
    ///
    /// Returns `AuditError::Io` if the compacted file cannot be written.
    pub async fn open(path: impl Into<PathBuf>, capacity: usize) -> Result<Self, AuditError> {
        let path = path.into();
        let log = Self::in_memory(capacity);

        let mut loaded = match load_from_file(&path).await {
            Ok(events) => events,
            Err(e) => {
                tracing::warn!(error = %e, "Audit log unreadable, starting empty");
                Vec::new()
            }
        };
        let excess = loaded.len().saturating_sub(log.capacity);
        loaded.drain(..excess);

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| AuditError::io(parent, e))?;
        }
        write_all(&path, loaded.iter()).await?;

        tracing::info!(
            path = %path.display(),
            events = loaded.len(),
            capacity = log.capacity,
            "Audit log opened"
        );

        {
            let mut inner = log.inner.lock().await;
            inner.file = Some(AuditFile {
                path,
                lines: loaded.len(),
            });
            inner.events = loaded.into_iter().rev().collect();
        }

        Ok(log)
    }

    /// Maximum number of retained events.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Record an event.
    ///
    /// `details` are stored verbatim; callers must not pass secrets. Failing
    /// to mirror the event to disk is logged and does not fail the call.
    pub async fn log(
        &self,
        action: &str,
        details: Value,
        user: Option<&AdminUser>,
    ) -> AuditEvent {
        let event = AuditEvent::new(action, details, user.cloned());

        tracing::info!(
            target: "audit",
            event_id = %event.id,
            action = %event.action,
            user = event.user.as_ref().map(|u| u.email.as_str()),
            "audit event"
        );

        let mut inner = self.inner.lock().await;
        inner.events.push_front(event.clone());
        inner.events.truncate(self.capacity);

        if let Err(e) = inner.persist(&event, self.capacity).await {
            tracing::warn!(error = %e, "Failed to persist audit event");
        }

        event
    }

    /// All retained events, most recent first.
    pub async fn events(&self) -> Vec<AuditEvent> {
        self.inner.lock().await.events.iter().cloned().collect()
    }

    /// Number of retained events.
    pub async fn len(&self) -> usize {
        self.inner.lock().await.events.len()
    }

    /// Whether no events are retained.
    pub async fn is_empty(&self) -> bool {
        self.inner.lock().await.events.is_empty()
    }
}

impl AuditInner {
    async fn persist(&mut self, event: &AuditEvent, capacity: usize) -> Result<(), AuditError> {
        let Some(file) = self.file.as_mut() else {
            return Ok(());
        };

        if file.lines + 1 > capacity.saturating_mul(2) {
            write_all(&file.path, self.events.iter().rev()).await?;
            file.lines = self.events.len();
            return Ok(());
        }

        let mut line = serde_json::to_vec(event)?;
        line.push(b'\n');

        let mut handle = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&file.path)
            .await
            .map_err(|e| AuditError::io(&file.path, e))?;
        handle
            .write_all(&line)
            .await
            .map_err(|e| AuditError::io(&file.path, e))?;
        handle
            .flush()
            .await
            .map_err(|e| AuditError::io(&file.path, e))?;

        file.lines += 1;
        Ok(())
    }
}

/// Read events from a JSON Lines audit file, oldest first.
///
/// A missing file yields no events. Lines that fail to parse, including
/// lines that are not valid UTF-8, are skipped with a warning.
///
/// # Errors
///
/// Returns `AuditError::Io` if the file exists but cannot be read.
pub async fn load_from_file(path: &Path) -> Result<Vec<AuditEvent>, AuditError> {
    let contents = match tokio::fs::read(path).await {
        Ok(contents) => contents,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(AuditError::io(path, e)),
    };

    let mut skipped = 0usize;
    let events = contents
        .split(|&b| b == b'\n')
        .filter(|line| !line.trim_ascii().is_empty())
        .filter_map(|line| {
            serde_json::from_slice::<AuditEvent>(line)
                .inspect_err(|_| skipped += 1)
                .ok()
        })
        .collect();

    if skipped > 0 {
        tracing::warn!(path = %path.display(), skipped, "Skipped corrupt audit log lines");
    }

    Ok(events)
}

/// Replace the file contents with `events` (oldest first).
async fn write_all<'a>(
    path: &Path,
    events: impl Iterator<Item = &'a AuditEvent>,
) -> Result<(), AuditError> {
    let mut buf = Vec::new();
    for event in events {
        serde_json::to_writer(&mut buf, event)?;
        buf.push(b'\n');
    }

    let tmp = path.with_extension("jsonl.tmp");
    tokio::fs::write(&tmp, &buf)
        .await
        .map_err(|e| AuditError::io(&tmp, e))?;
    tokio::fs::rename(&tmp, path)
        .await
        .map_err(|e| AuditError::io(path, e))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::Utc;
    use homacuk_core::{AdminRole, AdminUserId, Email};
    use serde_json::json;

    use super::*;

    fn editor() -> AdminUser {
        AdminUser {
            id: AdminUserId::new(2),
            email: Email::parse("editor@homacuk.com").unwrap(),
            display_name: "Content Editor".to_string(),
            role: AdminRole::Editor,
            created_at: Utc::now(),
            last_login: None,
        }
    }

    #[tokio::test]
    async fn test_newest_event_first() {
        let log = AuditLog::in_memory(10);
        log.log("first", json!({}), None).await;
        log.log("second", json!({}), Some(&editor())).await;

        let events = log.events().await;
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].action, "second");
        assert_eq!(events[0].user.as_ref().unwrap().role, AdminRole::Editor);
        assert_eq!(events[1].action, "first");
        assert!(events[1].user.is_none());
    }

    #[tokio::test]
    async fn test_never_exceeds_capacity() {
        let log = AuditLog::in_memory(1000);
        for i in 0..1005 {
            log.log("edit_course", json!({ "n": i }), None).await;
        }

        let events = log.events().await;
        assert_eq!(events.len(), 1000);
        assert_eq!(events[0].details["n"], json!(1004));
        assert_eq!(events[999].details["n"], json!(5));
    }

    #[tokio::test]
    async fn test_file_roundtrip_keeps_newest() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("audit.jsonl");

        {
            let log = AuditLog::open(&path, 3).await.unwrap();
            for i in 0..5 {
                log.log("publish_course", json!({ "n": i }), None).await;
            }
        }

        let reopened = AuditLog::open(&path, 3).await.unwrap();
        let events = reopened.events().await;
        let ns: Vec<_> = events.iter().map(|e| e.details["n"].clone()).collect();
        assert_eq!(ns, vec![json!(4), json!(3), json!(2)]);

        // Compacted on open.
        assert_eq!(load_from_file(&path).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_file_stays_bounded_between_restarts() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("audit.jsonl");

        let log = AuditLog::open(&path, 2).await.unwrap();
        for i in 0..20 {
            log.log("reply_enquiry", json!({ "n": i }), None).await;
        }

        let on_disk = load_from_file(&path).await.unwrap();
        assert!(on_disk.len() <= 4);
        assert_eq!(on_disk.last().unwrap().details["n"], json!(19));
    }

    #[tokio::test]
    async fn test_corrupt_lines_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("audit.jsonl");

        let good = AuditEvent::new("logout", json!({}), None);
        let contents = format!(
            "not json at all\n{}\n{{\"id\": 5}}\n",
            serde_json::to_string(&good).unwrap()
        );
        tokio::fs::write(&path, contents).await.unwrap();

        let log = AuditLog::open(&path, 10).await.unwrap();
        let events = log.events().await;
        assert_eq!(events, vec![good]);
    }

    #[tokio::test]
    async fn test_invalid_utf8_line_keeps_surrounding_events() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("audit.jsonl");

        let first = AuditEvent::new("login_success", json!({}), None);
        let second = AuditEvent::new("logout", json!({}), None);
        let mut contents = serde_json::to_vec(&first).unwrap();
        contents.extend_from_slice(b"\n\xff\xfe garbage\n");
        contents.extend_from_slice(&serde_json::to_vec(&second).unwrap());
        contents.push(b'\n');
        tokio::fs::write(&path, contents).await.unwrap();

        let log = AuditLog::open(&path, 10).await.unwrap();
        assert_eq!(log.events().await, vec![second.clone(), first.clone()]);

        let on_disk = load_from_file(&path).await.unwrap();
        assert_eq!(on_disk, vec![first, second]);
    }

    #[tokio::test]
    async fn test_missing_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("audit.jsonl");

        let log = AuditLog::open(&path, 10).await.unwrap();
        assert!(log.is_empty().await);
        assert!(path.exists());
    }
}
