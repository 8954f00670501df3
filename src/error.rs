//! Error types for uri-gate
//!
//! The authorization core itself is total and never fails; errors only arise
//! in the layers around it (configuration loading, serving, and callers that
//! want a denial surfaced as an error). We use `thiserror` for library-style
//! errors and `anyhow` at the binary boundary.

use thiserror::Error;

/// Configuration-related errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(String),

    #[error("Invalid configuration: {message}")]
    Invalid { message: String },

    #[error("Missing required configuration: {field}")]
    Missing { field: String },

    #[error("Invalid glob pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Raised by [`UriAuthorizer::require`](crate::access_control::UriAuthorizer::require)
/// when a path is not granted to any of the caller's groups.
#[derive(Error, Debug)]
#[error("Access denied for path '{path}': {reason}")]
pub struct AccessDeniedError {
    pub path: String,
    pub reason: String,
}

impl AccessDeniedError {
    pub fn denied_by_rule(path: impl Into<String>, rule: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            reason: format!("denied by rule '{}'", rule.into()),
        }
    }

    pub fn no_base_entry(path: impl Into<String>, base: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            reason: format!("no rules configured for base '{}'", base.into()),
        }
    }

    pub fn no_pattern_matched(path: impl Into<String>, base: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            reason: format!("no pattern under base '{}' matches", base.into()),
        }
    }

    pub fn no_group_intersection(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            reason: "none of the caller's groups is granted by a matching rule".into(),
        }
    }
}

/// Transport layer errors
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid bind address '{address}': {reason}")]
    Bind { address: String, reason: String },
}
