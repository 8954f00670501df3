//! Access control types
//!
//! The rule table and the values produced while evaluating it.

use crate::access_control::patterns::CompiledGlob;
use crate::error::ConfigError;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

/// Polarity of a pattern rule, taken from a leading `!`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Polarity {
    Allow,
    Deny,
}

impl Polarity {
    pub const fn is_allow(&self) -> bool {
        matches!(self, Polarity::Allow)
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            Polarity::Allow => "allow",
            Polarity::Deny => "deny",
        }
    }
}

impl fmt::Display for Polarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Groups that activate a pattern's decision
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Trigger {
    pub groups: Vec<String>,
}

impl Trigger {
    pub fn new<I, S>(groups: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            groups: groups.into_iter().map(Into::into).collect(),
        }
    }

    /// True if at least one caller group is a trigger group
    pub fn intersects<G: AsRef<str>>(&self, caller_groups: &[G]) -> bool {
        caller_groups
            .iter()
            .any(|g| self.groups.iter().any(|t| t == g.as_ref()))
    }

    /// Trigger groups the caller belongs to, in trigger order
    pub fn intersection<G: AsRef<str>>(&self, caller_groups: &[G]) -> Vec<String> {
        self.groups
            .iter()
            .filter(|t| caller_groups.iter().any(|g| g.as_ref() == t.as_str()))
            .cloned()
            .collect()
    }
}

/// A single glob rule as declared in a rule set
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternRule {
    rule: String,
    polarity: Polarity,
    glob: CompiledGlob,
    triggers: Trigger,
}

impl PatternRule {
    /// Create a rule from its declared form; a leading `!` makes it a deny rule.
    ///
    /// The glob is compiled here, so invalid syntax is reported once, up front.
    pub fn new(rule: impl Into<String>, triggers: Trigger) -> Result<Self, ConfigError> {
        let rule = rule.into();
        let (polarity, glob) = match rule.strip_prefix('!') {
            Some(glob) => (Polarity::Deny, glob),
            None => (Polarity::Allow, rule.as_str()),
        };
        let glob = CompiledGlob::new(glob)?;
        Ok(Self {
            rule,
            polarity,
            glob,
            triggers,
        })
    }

    /// The rule exactly as declared, including any `!`
    pub fn rule(&self) -> &str {
        &self.rule
    }

    /// The glob to match against (declared rule without the `!`)
    pub fn glob(&self) -> &str {
        self.glob.as_str()
    }

    pub fn compiled(&self) -> &CompiledGlob {
        &self.glob
    }

    pub fn polarity(&self) -> Polarity {
        self.polarity
    }

    pub fn triggers(&self) -> &Trigger {
        &self.triggers
    }
}

/// Ordered pattern rules for one base; earlier rules take precedence
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleSet {
    rules: Vec<PatternRule>,
}

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a rule at the lowest precedence
    pub fn push(&mut self, rule: PatternRule) {
        self.rules.push(rule);
    }

    /// Builder-style variant of [`RuleSet::push`]
    pub fn with_rule<I, S>(
        mut self,
        rule: impl Into<String>,
        groups: I,
    ) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.push(PatternRule::new(rule, Trigger::new(groups))?);
        Ok(self)
    }

    pub fn iter(&self) -> impl Iterator<Item = &PatternRule> {
        self.rules.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }
}

impl FromIterator<PatternRule> for RuleSet {
    fn from_iter<T: IntoIterator<Item = PatternRule>>(iter: T) -> Self {
        Self {
            rules: iter.into_iter().collect(),
        }
    }
}

/// What a base maps to in the rule table
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleEntry {
    /// The whole base is granted to exactly this group
    SingleGroup(String),
    /// Ordered pattern rules evaluated against the path below the base
    Rules(RuleSet),
}

/// Immutable mapping from base to rule entry
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleTable {
    entries: HashMap<String, RuleEntry>,
}

impl RuleTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, base: impl Into<String>, entry: RuleEntry) {
        self.entries.insert(base.into(), entry);
    }

    /// Builder-style insert of a single-group base
    pub fn with_group(mut self, base: impl Into<String>, group: impl Into<String>) -> Self {
        self.insert(base, RuleEntry::SingleGroup(group.into()));
        self
    }

    /// Builder-style insert of a rule-set base
    pub fn with_rules(mut self, base: impl Into<String>, rules: RuleSet) -> Self {
        self.insert(base, RuleEntry::Rules(rules));
        self
    }

    /// Exact-key lookup; no prefix search and no fallback to shorter bases
    pub fn has_rules(&self, base: &str) -> bool {
        self.entries.contains_key(base)
    }

    pub fn get_rules(&self, base: &str) -> Option<&RuleEntry> {
        self.entries.get(base)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

/// A rule whose pattern matched the queried path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MatchedRule<'a> {
    pub allow: bool,
    pub rule: &'a str,
    pub triggers: &'a Trigger,
}
