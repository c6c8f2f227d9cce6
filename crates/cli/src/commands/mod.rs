//! CLI command implementations.

pub mod accounts;
pub mod audit;
pub mod permissions;
