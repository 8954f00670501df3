//! Transport module
//!
//! Runs the authorization service over the network.

pub mod http;

pub use http::{DEFAULT_HTTP_PORT, HttpConfig, run_http, run_http_blocking};
