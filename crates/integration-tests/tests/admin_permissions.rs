//! Permission enforcement over HTTP.

#![allow(clippy::unwrap_used)]

use homacuk_integration_tests::{
    ADMIN_EMAIL, ADMIN_PASSWORD, EDITOR_EMAIL, EDITOR_PASSWORD, TestApp,
};
use reqwest::StatusCode;
use serde_json::Value;

async fn json(app: &TestApp, path: &str) -> (StatusCode, Value) {
    let resp = app.get(path).await;
    let status = resp.status();
    (status, resp.json().await.unwrap())
}

#[tokio::test]
async fn test_editor_feature_checks() {
    let app = TestApp::spawn().await;
    app.sign_in(EDITOR_EMAIL, EDITOR_PASSWORD).await;

    let (status, body) = json(&app, "/admin/api/permissions/publish_course").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["feature"], "publish_course");
    assert_eq!(body["allowed"], true);

    let (_, body) = json(&app, "/admin/api/permissions/delete_course").await;
    assert_eq!(body["allowed"], false);

    let (_, body) = json(&app, "/admin/api/permissions/launch_rockets").await;
    assert_eq!(body["allowed"], false);
}

#[tokio::test]
async fn test_action_checks_default_deny() {
    let app = TestApp::spawn().await;
    app.sign_in(ADMIN_EMAIL, ADMIN_PASSWORD).await;

    let (_, body) = json(&app, "/admin/api/actions/delete_user").await;
    assert_eq!(body["allowed"], true);

    let (_, body) = json(&app, "/admin/api/actions/launch_rockets").await;
    assert_eq!(body["action"], "launch_rockets");
    assert_eq!(body["allowed"], false);
}

#[tokio::test]
async fn test_dashboard_lists_allowed_features() {
    let app = TestApp::spawn().await;
    app.sign_in(EDITOR_EMAIL, EDITOR_PASSWORD).await;

    let (status, body) = json(&app, "/admin").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["session"]["user"]["role"], "editor");

    let features: Vec<&str> = body["features"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(Value::as_str)
        .collect();
    assert!(features.contains(&"view_dashboard"));
    assert!(!features.contains(&"view_audit_log"));

    let actions: Vec<&str> = body["actions"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(Value::as_str)
        .collect();
    assert!(actions.contains(&"edit_page"));
    assert!(!actions.contains(&"delete_user"));
}

#[tokio::test]
async fn test_editor_cannot_read_audit_log() {
    let app = TestApp::spawn().await;
    app.sign_in(EDITOR_EMAIL, EDITOR_PASSWORD).await;

    let (status, body) = json(&app, "/admin/api/audit").await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["success"], false);

    let events = app.state.audit().events().await;
    assert_eq!(events[0].action, "permission_denied");
    assert_eq!(events[0].details["feature"], "view_audit_log");
    assert_eq!(
        events[0].user.as_ref().unwrap().email.as_str(),
        EDITOR_EMAIL
    );
}

#[tokio::test]
async fn test_admin_reads_audit_log_newest_first() {
    let app = TestApp::spawn().await;
    app.sign_in(ADMIN_EMAIL, "wrong").await;
    app.sign_in(ADMIN_EMAIL, ADMIN_PASSWORD).await;

    let (status, body) = json(&app, "/admin/api/audit").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["capacity"], 1000);

    let events = body["events"].as_array().unwrap();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0]["action"], "login_success");
    assert_eq!(events[1]["action"], "login_failed");
    assert!(events[1]["user"].is_null());

    let (_, body) = json(&app, "/admin/api/audit?limit=1").await;
    assert_eq!(body["events"].as_array().unwrap().len(), 1);
}
