//! Configuration types for uri-gate
//!
//! This module defines the configuration structure that can be loaded from
//! TOML files and/or environment variables.

use crate::access_control::{
    DEFAULT_BASE_DEPTH, PatternRule, RuleEntry, RuleSet, RuleTable, Trigger,
};
use crate::error::ConfigError;
use crate::transport::DEFAULT_HTTP_PORT;
use serde::Deserialize;
use std::collections::HashMap;

/// Root configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// HTTP server settings
    pub server: ServerConfig,

    /// Query options applied to every authorization
    pub authorizer: AuthorizerConfig,

    /// Rule table keyed by base
    pub rules: HashMap<String, RuleEntryConfig>,

    /// Logging configuration
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Build the immutable rule table from the configured entries,
    /// compiling every rule glob
    pub fn rule_table(&self) -> Result<RuleTable, ConfigError> {
        let mut table = RuleTable::new();
        for (base, entry) in &self.rules {
            table.insert(base.clone(), entry.to_entry()?);
        }
        Ok(table)
    }
}

/// Server configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// HTTP host
    pub host: String,

    /// HTTP port
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: DEFAULT_HTTP_PORT,
        }
    }
}

/// Authorizer options
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AuthorizerConfig {
    /// Path segments (after the leading empty one) forming the rule-table key
    pub base_depth: usize,
}

impl Default for AuthorizerConfig {
    fn default() -> Self {
        Self {
            base_depth: DEFAULT_BASE_DEPTH,
        }
    }
}

/// A rule-table entry as written in configuration
///
/// ```toml
/// [rules]
/// "/login" = "public"
/// "/a/b" = [{ pattern = "/**/*", groups = ["normal"] }]
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum RuleEntryConfig {
    /// Whole base granted to one group
    Group(String),
    /// Ordered pattern rules, first declared wins
    Patterns(Vec<PatternRuleConfig>),
}

impl RuleEntryConfig {
    pub fn to_entry(&self) -> Result<RuleEntry, ConfigError> {
        match self {
            RuleEntryConfig::Group(group) => Ok(RuleEntry::SingleGroup(group.clone())),
            RuleEntryConfig::Patterns(patterns) => patterns
                .iter()
                .map(PatternRuleConfig::to_rule)
                .collect::<Result<RuleSet, _>>()
                .map(RuleEntry::Rules),
        }
    }
}

/// A single pattern rule; prefix the pattern with `!` to deny
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PatternRuleConfig {
    /// Glob pattern matched against the path below the base
    pub pattern: String,

    /// Groups that trigger this rule
    #[serde(default)]
    pub groups: Vec<String>,
}

impl PatternRuleConfig {
    pub fn to_rule(&self) -> Result<PatternRule, ConfigError> {
        PatternRule::new(self.pattern.clone(), Trigger::new(self.groups.iter().cloned()))
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Output format (pretty, json)
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable output
    #[default]
    Pretty,
    /// JSON structured output
    Json,
}
