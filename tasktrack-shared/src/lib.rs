//! # TaskTrack Shared Library
//!
//! The authorization-scoped data-access core of TaskTrack, shared by the API
//! server and its tests.
//!
//! ## Module Organization
//!
//! - `auth`: password hashing, session tokens, request authentication
//! - `access`: the [`OwnedProject`](access::OwnedProject) capability
//! - `store`: owner-scoped project and task operations
//! - `stats`: task status distribution
//! - `quota`: per-user project limit
//! - `policy`: configurable completion-stamp and delete behavior
//! - `db`: storage traits and the PostgreSQL and in-memory backends
//! - `models`: users, projects, tasks
//! - `error`: core and storage error types

pub mod access;
pub mod auth;
pub mod db;
pub mod error;
pub mod models;
pub mod policy;
pub mod quota;
pub mod stats;
pub mod store;

/// Current version of the TaskTrack shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
