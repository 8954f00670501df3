//! HTTP server module
//!
//! Axum routes wrapping the authorizer.

pub mod handler;

pub use handler::{AuthorizeResponse, AuthorizerState, GROUPS_HEADER, parse_groups, router};
