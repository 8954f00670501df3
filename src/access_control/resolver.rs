//! Access control resolver
//!
//! Resolves a path against the rule table in four steps:
//! 1. Derive the base from the path's leading segments
//! 2. Look the base up in the rule table (exact key only)
//! 3. Match the path below the base against the base's rules, in declared order
//! 4. Select the first matched rule sharing a group with the caller
//!
//! Only one base is ever consulted. If the rules for a path were authored under
//! a shorter or longer prefix than the configured depth produces, the lookup
//! misses and no access is granted.

use crate::access_control::base::{DEFAULT_BASE_DEPTH, resolve_base, strip_base};
use crate::access_control::patterns::{GlobMatcher, Matcher};
use crate::access_control::types::{MatchedRule, RuleEntry, RuleSet, RuleTable};
use crate::config::{AppConfig, AuthorizerConfig};
use crate::error::{AccessDeniedError, ConfigError};
use serde::Serialize;
use std::fmt;
use tracing::{debug, trace};

/// Options for a single authorization query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthorizeOptions {
    /// Segments after the leading empty one that form the base
    pub base_depth: usize,
}

impl Default for AuthorizeOptions {
    fn default() -> Self {
        Self {
            base_depth: DEFAULT_BASE_DEPTH,
        }
    }
}

impl From<&AuthorizerConfig> for AuthorizeOptions {
    fn from(config: &AuthorizerConfig) -> Self {
        Self {
            base_depth: config.base_depth,
        }
    }
}

/// Match `stripped_path` against every rule of `rules`.
///
/// All matching rules are returned, in declaration order.
pub fn match_rules<'a, M>(
    rules: &'a RuleSet,
    stripped_path: &str,
    matcher: &M,
) -> Vec<MatchedRule<'a>>
where
    M: Matcher + ?Sized,
{
    rules
        .iter()
        .filter(|rule| matcher.matches(stripped_path, rule))
        .map(|rule| {
            trace!(rule = rule.rule(), polarity = %rule.polarity(), "Rule matched");
            MatchedRule {
                allow: rule.polarity().is_allow(),
                rule: rule.rule(),
                triggers: rule.triggers(),
            }
        })
        .collect()
}

/// Pick the first matched rule whose triggers share a group with the caller.
///
/// Polarity plays no part: an earlier deny beats a later allow for a shared
/// group, and vice versa.
pub fn select_decision<'a, G: AsRef<str>>(
    matched: &[MatchedRule<'a>],
    caller_groups: &[G],
) -> Option<MatchedRule<'a>> {
    matched
        .iter()
        .find(|m| m.triggers.intersects(caller_groups))
        .copied()
}

/// Why no rule decided a query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoDecisionReason {
    /// The derived base has no entry in the rule table
    NoBaseEntry,
    /// The base has rules but none matches the path
    NoPatternMatched,
    /// Rules matched (or the base has a single group) but the caller is in none of their groups
    NoGroupIntersection,
}

impl NoDecisionReason {
    pub const fn as_str(&self) -> &'static str {
        match self {
            NoDecisionReason::NoBaseEntry => "no_base_entry",
            NoDecisionReason::NoPatternMatched => "no_pattern_matched",
            NoDecisionReason::NoGroupIntersection => "no_group_intersection",
        }
    }
}

impl fmt::Display for NoDecisionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Outcome of evaluating a path for a caller
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessDecision {
    /// Access granted to `groups`; `rule` is `None` for a single-group base
    Allowed {
        groups: Vec<String>,
        rule: Option<String>,
    },
    /// A deny rule matched first for one of the caller's `groups`
    Denied { rule: String, groups: Vec<String> },
    /// Nothing decided; callers treat this as denied
    NoDecision(NoDecisionReason),
}

impl AccessDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, AccessDecision::Allowed { .. })
    }

    /// True only for an explicit deny rule; [`AccessDecision::NoDecision`] is not a denial
    pub fn is_denied(&self) -> bool {
        matches!(self, AccessDecision::Denied { .. })
    }

    /// The deciding rule, if any
    pub fn rule(&self) -> Option<&str> {
        match self {
            AccessDecision::Allowed { rule, .. } => rule.as_deref(),
            AccessDecision::Denied { rule, .. } => Some(rule.as_str()),
            AccessDecision::NoDecision(_) => None,
        }
    }

    /// Short machine-readable label for the outcome
    pub fn outcome(&self) -> &'static str {
        match self {
            AccessDecision::Allowed { .. } => "allowed",
            AccessDecision::Denied { .. } => "denied",
            AccessDecision::NoDecision(reason) => reason.as_str(),
        }
    }

    /// Groups responsible for an allow; empty for anything else
    pub fn into_groups(self) -> Vec<String> {
        match self {
            AccessDecision::Allowed { groups, .. } => groups,
            AccessDecision::Denied { .. } | AccessDecision::NoDecision(_) => Vec::new(),
        }
    }
}

/// Path authorizer over an immutable rule table
///
/// Holds no per-query state and can be shared between threads.
#[derive(Debug, Clone)]
pub struct UriAuthorizer<M = GlobMatcher> {
    table: RuleTable,
    options: AuthorizeOptions,
    matcher: M,
}

impl UriAuthorizer<GlobMatcher> {
    /// Create an authorizer with the default glob matcher and options
    pub fn new(table: RuleTable) -> Self {
        Self::with_matcher(table, GlobMatcher::new())
    }

    /// Create an authorizer from loaded configuration
    pub fn from_config(config: &AppConfig) -> Result<Self, ConfigError> {
        Ok(Self::new(config.rule_table()?)
            .with_options(AuthorizeOptions::from(&config.authorizer)))
    }
}

impl<M: Matcher> UriAuthorizer<M> {
    /// Create an authorizer with a custom matcher
    pub fn with_matcher(table: RuleTable, matcher: M) -> Self {
        Self {
            table,
            options: AuthorizeOptions::default(),
            matcher,
        }
    }

    /// Replace the default query options
    pub fn with_options(mut self, options: AuthorizeOptions) -> Self {
        self.options = options;
        self
    }

    pub fn table(&self) -> &RuleTable {
        &self.table
    }

    pub fn options(&self) -> AuthorizeOptions {
        self.options
    }

    /// Groups granting `path` to the caller, or empty when access is not granted
    pub fn authorize<G: AsRef<str>>(&self, path: &str, caller_groups: &[G]) -> Vec<String> {
        self.authorize_with(path, caller_groups, &self.options)
    }

    /// [`authorize`](Self::authorize) with per-query options
    pub fn authorize_with<G: AsRef<str>>(
        &self,
        path: &str,
        caller_groups: &[G],
        options: &AuthorizeOptions,
    ) -> Vec<String> {
        self.evaluate_with(path, caller_groups, options).into_groups()
    }

    /// Evaluate `path` and report how the decision was reached
    pub fn evaluate<G: AsRef<str>>(&self, path: &str, caller_groups: &[G]) -> AccessDecision {
        self.evaluate_with(path, caller_groups, &self.options)
    }

    /// [`evaluate`](Self::evaluate) with per-query options
    pub fn evaluate_with<G: AsRef<str>>(
        &self,
        path: &str,
        caller_groups: &[G],
        options: &AuthorizeOptions,
    ) -> AccessDecision {
        let base = resolve_base(path, options.base_depth);
        debug!(
            path,
            base = %base,
            groups = caller_groups.len(),
            "Evaluating access"
        );

        let Some(entry) = self.table.get_rules(&base) else {
            trace!("No rules for base");
            return AccessDecision::NoDecision(NoDecisionReason::NoBaseEntry);
        };

        let rules = match entry {
            RuleEntry::SingleGroup(group) => {
                return if caller_groups.iter().any(|g| g.as_ref() == group) {
                    trace!(group = %group, "Single-group base granted");
                    AccessDecision::Allowed {
                        groups: vec![group.clone()],
                        rule: None,
                    }
                } else {
                    AccessDecision::NoDecision(NoDecisionReason::NoGroupIntersection)
                };
            }
            RuleEntry::Rules(rules) => rules,
        };

        let stripped = strip_base(&base, path);
        let matched = match_rules(rules, &stripped, &self.matcher);
        if matched.is_empty() {
            return AccessDecision::NoDecision(NoDecisionReason::NoPatternMatched);
        }

        match select_decision(&matched, caller_groups) {
            Some(decision) if decision.allow => AccessDecision::Allowed {
                groups: decision.triggers.intersection(caller_groups),
                rule: Some(decision.rule.to_string()),
            },
            Some(decision) => AccessDecision::Denied {
                rule: decision.rule.to_string(),
                groups: decision.triggers.intersection(caller_groups),
            },
            None => AccessDecision::NoDecision(NoDecisionReason::NoGroupIntersection),
        }
    }

    /// Check access, turning anything but an allow into an error
    pub fn require<G: AsRef<str>>(
        &self,
        path: &str,
        caller_groups: &[G],
    ) -> Result<Vec<String>, AccessDeniedError> {
        let base = || resolve_base(path, self.options.base_depth);
        match self.evaluate(path, caller_groups) {
            AccessDecision::Allowed { groups, .. } => Ok(groups),
            AccessDecision::Denied { rule, .. } => Err(AccessDeniedError::denied_by_rule(path, rule)),
            AccessDecision::NoDecision(NoDecisionReason::NoBaseEntry) => {
                Err(AccessDeniedError::no_base_entry(path, base()))
            }
            AccessDecision::NoDecision(NoDecisionReason::NoPatternMatched) => {
                Err(AccessDeniedError::no_pattern_matched(path, base()))
            }
            AccessDecision::NoDecision(NoDecisionReason::NoGroupIntersection) => {
                Err(AccessDeniedError::no_group_intersection(path))
            }
        }
    }
}
