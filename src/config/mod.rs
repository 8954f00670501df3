//! Configuration module
//!
//! Loads the server settings, authorizer options, and rule table from TOML
//! files and environment variables. The rule table is built once here and
//! never changes afterwards.

pub mod loader;
pub mod types;

pub use loader::{load_config, load_config_from_str};
pub use types::*;
