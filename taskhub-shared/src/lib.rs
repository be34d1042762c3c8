//! # TaskHub Shared Library
//!
//! Domain models, persistence, authentication and the authorization engine
//! used by the TaskHub API server.
//!
//! ## Module Organization
//!
//! - `models`: Database models and their queries
//! - `auth`: Passwords, tokens, request authentication and authorization
//! - `db`: Connection pool and migrations

pub mod auth;
pub mod db;
pub mod models;

/// Current version of the TaskHub shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
