//! Integration tests for the Homacuk admin server.
//!
//! Each test spawns the full router on an ephemeral local port and talks to
//! it over HTTP with a cookie-keeping client, so the session cookie, the
//! route guard and every middleware layer are exercised as in production.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p homacuk-integration-tests
//! ```

use std::net::SocketAddr;

use homacuk_admin::app;
use homacuk_admin::config::AdminConfig;
use homacuk_admin::state::AppState;
use reqwest::{Client, Response, redirect::Policy};
use serde_json::json;

/// Demo administrator credentials.
pub const ADMIN_EMAIL: &str = "admin@homacuk.com";
pub const ADMIN_PASSWORD: &str = "admin123";

/// Demo editor credentials.
pub const EDITOR_EMAIL: &str = "editor@homacuk.com";
pub const EDITOR_PASSWORD: &str = "editor123";

/// A running admin server plus a client with its own cookie jar.
pub struct TestApp {
    pub addr: SocketAddr,
    pub state: AppState,
    pub client: Client,
}

impl TestApp {
    /// Spawn a server with default configuration and the demo accounts.
    ///
    /// # Panics
    ///
    /// Panics if the server cannot be started.
    pub async fn spawn() -> Self {
        Self::spawn_with(AdminConfig::default()).await
    }

    /// Spawn a server with `config`.
    ///
    /// # Panics
    ///
    /// Panics if the server cannot be started.
    pub async fn spawn_with(config: AdminConfig) -> Self {
        let state = AppState::new(config)
            .await
            .expect("Failed to create application state");

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("Failed to read local address");

        let router = app::router(state.clone());
        tokio::spawn(async move {
            axum::serve(listener, router)
                .await
                .expect("Test server error");
        });

        Self {
            addr,
            state,
            client: new_client(),
        }
    }

    /// Absolute URL for `path` on this server.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{path}", self.addr)
    }

    /// GET `path` with this app's client.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be sent.
    pub async fn get(&self, path: &str) -> Response {
        self.client
            .get(self.url(path))
            .send()
            .await
            .expect("Failed to send request")
    }

    /// Sign in with a JSON body.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be sent.
    pub async fn sign_in(&self, email: &str, password: &str) -> Response {
        self.client
            .post(self.url("/admin/login"))
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await
            .expect("Failed to send sign-in request")
    }

    /// POST to `/admin/logout`.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be sent.
    pub async fn sign_out(&self) -> Response {
        self.client
            .post(self.url("/admin/logout"))
            .send()
            .await
            .expect("Failed to send sign-out request")
    }
}

/// A client that keeps cookies and does not follow redirects.
///
/// # Panics
///
/// Panics if the client cannot be built.
#[must_use]
pub fn new_client() -> Client {
    Client::builder()
        .cookie_store(true)
        .redirect(Policy::none())
        .build()
        .expect("Failed to create HTTP client")
}

/// The `Location` header of a response, if any.
#[must_use]
pub fn location(response: &Response) -> Option<&str> {
    response
        .headers()
        .get(reqwest::header::LOCATION)
        .and_then(|v| v.to_str().ok())
}

/// All `Set-Cookie` header values of a response.
#[must_use]
pub fn set_cookies(response: &Response) -> Vec<String> {
    response
        .headers()
        .get_all(reqwest::header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok().map(String::from))
        .collect()
}
