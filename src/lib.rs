//! uri-gate
//!
//! Path-based authorization: decides whether a caller's groups grant access to
//! a resource path, and which groups justify the grant.
//!
//! ## Features
//!
//! - **Per-base rule sets** of glob patterns, evaluated in declaration order
//! - **Negated patterns** (`!`) that deny for their trigger groups
//! - **Dotfile-safe globs**: wildcards never match a `.`-prefixed segment
//! - **Single-group bases** that hand a whole prefix to one group
//! - **HTTP endpoint** for reverse-proxy sub-request authorization
//! - **Flexible configuration** via TOML files and environment variables
//!
//! ## Resolution Model
//!
//! ```text
//! path → base (first base_depth + 1 segments) → rule entry → matched rules → first rule sharing a caller group
//! ```
//!
//! ## Example Configuration
//!
//! ```toml
//! [authorizer]
//! base_depth = 2
//!
//! [rules]
//! "/login" = "public"
//! "/a/b" = [
//!   { pattern = "!/**/index.html", groups = ["special-group"] },
//!   { pattern = "/**/*", groups = ["normal"] },
//! ]
//! ```

pub mod access_control;
pub mod config;
pub mod error;
pub mod server;
pub mod transport;

// Re-export main types
pub use access_control::{AccessDecision, AuthorizeOptions, UriAuthorizer};
pub use config::{AppConfig, load_config};
pub use error::{AccessDeniedError, ConfigError};
