//! Session lifetime and audit persistence across restarts.

#![allow(clippy::unwrap_used)]

use std::time::Duration;

use chrono::TimeDelta;
use homacuk_admin::config::{AdminConfig, AuditConfig};
use homacuk_admin::services::audit::load_from_file;
use homacuk_core::AdminRole;
use homacuk_integration_tests::{ADMIN_EMAIL, ADMIN_PASSWORD, TestApp};
use reqwest::StatusCode;
use serde_json::Value;

#[tokio::test]
async fn test_expired_sign_in_is_treated_as_signed_out() {
    let config = AdminConfig {
        session_ttl: TimeDelta::seconds(1),
        ..AdminConfig::default()
    };
    let app = TestApp::spawn_with(config).await;

    let resp = app.sign_in(ADMIN_EMAIL, ADMIN_PASSWORD).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(app.get("/admin/api/session").await.status(), StatusCode::OK);

    // The stored record is still live here; only the sign-in has expired.
    tokio::time::sleep(Duration::from_millis(1500)).await;

    assert_eq!(
        app.get("/admin/api/session").await.status(),
        StatusCode::UNAUTHORIZED
    );
    assert_eq!(app.get("/admin").await.status(), StatusCode::SEE_OTHER);

    let resp = app.sign_in(ADMIN_EMAIL, ADMIN_PASSWORD).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(app.get("/admin/api/session").await.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_session_expiry_matches_ttl() {
    let app = TestApp::spawn().await;
    let before = chrono::Utc::now();
    let body: Value = app
        .sign_in(ADMIN_EMAIL, ADMIN_PASSWORD)
        .await
        .json()
        .await
        .unwrap();

    let expires_at: chrono::DateTime<chrono::Utc> =
        serde_json::from_value(body["session"]["expiresAt"].clone()).unwrap();
    assert!(expires_at >= before + TimeDelta::hours(8));
    assert!(expires_at <= chrono::Utc::now() + TimeDelta::hours(8));
}

#[tokio::test]
async fn test_audit_log_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("audit.jsonl");
    let config = AdminConfig {
        audit: AuditConfig {
            capacity: 10,
            path: Some(path.clone()),
        },
        ..AdminConfig::default()
    };

    {
        let app = TestApp::spawn_with(config.clone()).await;
        app.sign_in(ADMIN_EMAIL, ADMIN_PASSWORD).await;
        app.sign_out().await;
    }

    let on_disk = load_from_file(&path).await.unwrap();
    let actions: Vec<_> = on_disk.iter().map(|e| e.action.as_str()).collect();
    assert_eq!(actions, vec!["login_success", "logout"]);
    assert_eq!(
        on_disk[0].user.as_ref().unwrap().role,
        AdminRole::Admin
    );

    let app = TestApp::spawn_with(config).await;
    let events = app.state.audit().events().await;
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].action, "logout");
}
