//! Homacuk Admin library.
//!
//! Authentication and authorization for the admin area of the Homacuk
//! tutoring site: password sign-in against a fixed account table,
//! server-side sessions, role-based permissions, a bounded audit log and the
//! route guard in front of `/admin`.
//!
//! The binary in `main.rs` only wires configuration, tracing and the server
//! around [`app::router`].

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod app;
pub mod config;
pub mod error;
pub mod filters;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
