//! Sign-in, sign-out and route guard behaviour over HTTP.

#![allow(clippy::unwrap_used)]

use homacuk_integration_tests::{
    ADMIN_EMAIL, ADMIN_PASSWORD, EDITOR_EMAIL, EDITOR_PASSWORD, TestApp, location, new_client,
    set_cookies,
};
use reqwest::StatusCode;
use serde_json::Value;

#[tokio::test]
async fn test_health() {
    let app = TestApp::spawn().await;
    let resp = app.get("/health").await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.text().await.unwrap(), "ok");
}

#[tokio::test]
async fn test_guard_redirects_to_login_with_return_path() {
    let app = TestApp::spawn().await;
    let resp = app.get("/admin/settings").await;

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        location(&resp),
        Some("/admin/login?redirect=%2Fadmin%2Fsettings")
    );
}

#[tokio::test]
async fn test_login_page_always_passes() {
    let app = TestApp::spawn().await;
    let resp = app.get("/admin/login?redirect=%2Fadmin%2Fcourses").await;

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers()["x-frame-options"], "DENY");
    assert!(resp.headers().contains_key("x-request-id"));
    let html = resp.text().await.unwrap();
    assert!(html.contains("<form"));
    assert!(html.contains("courses"));
}

#[tokio::test]
async fn test_api_requires_session() {
    let app = TestApp::spawn().await;
    let resp = app.get("/admin/api/session").await;

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_json_sign_in_creates_session() {
    let app = TestApp::spawn().await;
    let resp = app.sign_in(ADMIN_EMAIL, ADMIN_PASSWORD).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let cookies = set_cookies(&resp);
    assert!(
        cookies
            .iter()
            .any(|c| c.starts_with("homacuk_admin_session=") && c.contains("HttpOnly"))
    );
    assert!(cookies.iter().any(|c| c.starts_with("admin-auth=true")));

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["success"], true);
    assert_eq!(body["session"]["user"]["role"], "admin");
    assert_eq!(body["session"]["user"]["email"], ADMIN_EMAIL);
    assert!(body["session"].get("token").is_none());
    assert_eq!(body["redirect_to"], "/admin");

    let resp = app.get("/admin/api/session").await;
    assert_eq!(resp.status(), StatusCode::OK);
    let session: Value = resp.json().await.unwrap();
    assert_eq!(session["user"]["displayName"], "Admin User");

    let events = app.state.audit().events().await;
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].action, "login_success");
    assert_eq!(events[0].user.as_ref().unwrap().email.as_str(), ADMIN_EMAIL);
}

#[tokio::test]
async fn test_wrong_password_is_rejected_and_audited() {
    let app = TestApp::spawn().await;
    let resp = app.sign_in(ADMIN_EMAIL, "not-the-password").await;

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "invalid email or password");

    let events = app.state.audit().events().await;
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].action, "login_failed");
    assert_eq!(events[0].details["email"], ADMIN_EMAIL);
    assert!(events[0].user.is_none());

    assert_eq!(
        app.get("/admin/api/session").await.status(),
        StatusCode::UNAUTHORIZED
    );
}

#[tokio::test]
async fn test_form_sign_in_redirects() {
    let app = TestApp::spawn().await;

    let resp = app
        .client
        .post(app.url("/admin/login"))
        .form(&[
            ("email", EDITOR_EMAIL),
            ("password", "wrong"),
            ("redirect", "/admin/courses"),
        ])
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        location(&resp),
        Some("/admin/login?error=credentials&redirect=%2Fadmin%2Fcourses")
    );

    let resp = app
        .client
        .post(app.url("/admin/login"))
        .form(&[
            ("email", EDITOR_EMAIL),
            ("password", EDITOR_PASSWORD),
            ("redirect", "/admin/courses"),
        ])
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), Some("/admin/courses"));
}

#[tokio::test]
async fn test_open_redirect_is_refused() {
    let app = TestApp::spawn().await;
    let resp = app
        .client
        .post(app.url("/admin/login"))
        .form(&[
            ("email", ADMIN_EMAIL),
            ("password", ADMIN_PASSWORD),
            ("redirect", "https://evil.example/admin"),
        ])
        .send()
        .await
        .unwrap();

    assert_eq!(location(&resp), Some("/admin"));
}

#[tokio::test]
async fn test_redirect_with_control_characters_falls_back() {
    let app = TestApp::spawn().await;
    let resp = app
        .client
        .post(app.url("/admin/login"))
        .form(&[
            ("email", ADMIN_EMAIL),
            ("password", ADMIN_PASSWORD),
            ("redirect", "/admin/a\u{1}b"),
        ])
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), Some("/admin"));
}

#[tokio::test]
async fn test_sign_out_revokes_session() {
    let app = TestApp::spawn().await;
    app.sign_in(EDITOR_EMAIL, EDITOR_PASSWORD).await;
    assert_eq!(app.get("/admin").await.status(), StatusCode::OK);

    let resp = app.sign_out().await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), Some("/admin/login"));
    assert!(
        set_cookies(&resp)
            .iter()
            .any(|c| c.starts_with("admin-auth=") && c.contains("Max-Age=0"))
    );

    assert_eq!(app.get("/admin").await.status(), StatusCode::SEE_OTHER);
    assert_eq!(app.state.audit().events().await[0].action, "logout");
}

#[tokio::test]
async fn test_ui_flag_cookie_grants_nothing() {
    let app = TestApp::spawn().await;
    let resp = new_client()
        .get(app.url("/admin/api/session"))
        .header(reqwest::header::COOKIE, "admin-auth=true")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let resp = new_client()
        .get(app.url("/admin"))
        .header(
            reqwest::header::COOKIE,
            "admin-auth=true; homacuk_admin_session=forged",
        )
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
}

#[tokio::test]
async fn test_sessions_are_per_client() {
    let app = TestApp::spawn().await;
    app.sign_in(ADMIN_EMAIL, ADMIN_PASSWORD).await;

    let other = new_client()
        .get(app.url("/admin/api/session"))
        .send()
        .await
        .unwrap();
    assert_eq!(other.status(), StatusCode::UNAUTHORIZED);
}
