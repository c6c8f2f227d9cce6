//! Homacuk Core - Shared types library.
//!
//! This crate provides the domain types used across the Homacuk admin components:
//! - `admin` - Admin backend (sign-in, sessions, permissions, audit log)
//! - `cli` - Command-line tools for inspecting permissions and audit logs
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP, no clocks.
//! This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for admin user IDs, emails, and roles

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
