//! Configuration loader with layered sources
//!
//! Loads configuration from multiple sources with the following precedence
//! (highest to lowest):
//! 1. Environment variables (URI_GATE_*)
//! 2. Configuration file (TOML)
//! 3. Default values

use crate::config::types::{AppConfig, RuleEntryConfig};
use crate::error::ConfigError;
use config::{Config, Environment, File, FileFormat};
use std::path::Path;

/// Default configuration file paths to check (in order)
const DEFAULT_CONFIG_PATHS: &[&str] = &[
    "uri-gate.toml",
    ".uri-gate.toml",
    "~/.config/uri-gate/config.toml",
    "/etc/uri-gate/config.toml",
];

/// Environment variable prefix, e.g. `URI_GATE_AUTHORIZER__BASE_DEPTH`
const ENV_PREFIX: &str = "URI_GATE";

/// Load configuration from a TOML string (useful for testing)
pub fn load_config_from_str(toml_str: &str) -> Result<AppConfig, ConfigError> {
    let config = Config::builder()
        .add_source(File::from_str(toml_str, FileFormat::Toml))
        .build()
        .map_err(|e| ConfigError::Load(e.to_string()))?;

    let app_config: AppConfig = config
        .try_deserialize()
        .map_err(|e| ConfigError::Load(e.to_string()))?;

    validate_config(&app_config)?;

    Ok(app_config)
}

/// Load configuration from files and environment
pub fn load_config(config_path: Option<&str>) -> Result<AppConfig, ConfigError> {
    let mut builder = Config::builder();

    // 1. Start with defaults (handled by serde defaults on AppConfig)

    // 2. Add configuration file
    if let Some(path) = config_path {
        // Explicit path provided - must exist
        if !Path::new(path).exists() {
            return Err(ConfigError::Load(format!(
                "Configuration file not found: {}",
                path
            )));
        }
        builder = builder.add_source(File::new(path, FileFormat::Toml));
    } else {
        // Try default paths (first existing one wins)
        for path in DEFAULT_CONFIG_PATHS {
            let expanded = shellexpand::tilde(path);
            if Path::new(expanded.as_ref()).exists() {
                builder = builder.add_source(File::new(&expanded, FileFormat::Toml));
                break;
            }
        }
    }

    // 3. Add environment variables with URI_GATE_ prefix
    // Double underscore (__) maps to nested keys (server.port)
    builder = builder.add_source(
        Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true),
    );

    let config = builder
        .build()
        .map_err(|e| ConfigError::Load(e.to_string()))?;

    let app_config: AppConfig = config
        .try_deserialize()
        .map_err(|e| ConfigError::Load(e.to_string()))?;

    validate_config(&app_config)?;

    Ok(app_config)
}

/// Validate configuration values
fn validate_config(config: &AppConfig) -> Result<(), ConfigError> {
    if config.server.host.is_empty() {
        return Err(ConfigError::Missing {
            field: "server.host".to_string(),
        });
    }

    if config.server.port == 0 {
        return Err(ConfigError::Invalid {
            message: "server.port must be greater than 0".to_string(),
        });
    }

    validate_rules(config)?;

    Ok(())
}

/// Validate that every rule pattern is valid glob syntax
///
/// Errors name the offending rule's position in the table.
fn validate_rules(config: &AppConfig) -> Result<(), ConfigError> {
    for (base, entry) in &config.rules {
        let RuleEntryConfig::Patterns(patterns) = entry else {
            continue;
        };

        for (index, pattern) in patterns.iter().enumerate() {
            if let Err(ConfigError::InvalidPattern { reason, .. }) = pattern.to_rule() {
                return Err(ConfigError::InvalidPattern {
                    pattern: pattern.pattern.clone(),
                    reason: format!("in rules.\"{}\"[{}]: {}", base, index, reason),
                });
            }
        }
    }
    Ok(())
}
