//! Pattern matching for access control
//!
//! Rule globs are compiled once, when the rule set is built. Negation is
//! handled by the caller; a compiled glob only ever holds positive syntax.
//!
//! Matching follows the usual shell-style defaults:
//! - `*` stays within a segment, `**` crosses segments
//! - a segment starting with `.` is only matched by a pattern segment that
//!   itself starts with `.`
//! - a trailing `/**` also matches the directory itself (`/master/**` matches
//!   `/master`)
//! - the empty path matches nothing

use crate::access_control::base::DELIMITER;
use crate::access_control::types::PatternRule;
use crate::error::ConfigError;
use globset::{GlobBuilder, GlobMatcher as SegmentMatcher};
use std::fmt;

/// Glob matching capability used by the rule matcher
pub trait Matcher: Send + Sync {
    /// Check if `path` matches the glob of `rule`
    fn matches(&self, path: &str, rule: &PatternRule) -> bool;
}

/// Default matcher, using the glob compiled into each rule
#[derive(Debug, Clone, Copy, Default)]
pub struct GlobMatcher;

impl GlobMatcher {
    pub fn new() -> Self {
        Self
    }
}

impl Matcher for GlobMatcher {
    fn matches(&self, path: &str, rule: &PatternRule) -> bool {
        rule.compiled().is_match(path)
    }
}

/// A rule glob compiled for repeated matching
#[derive(Debug, Clone)]
pub struct CompiledGlob {
    source: String,
    glob: SegmentMatcher,
    /// `/dir` for a pattern ending in `/dir/**`
    parent: Option<SegmentMatcher>,
    /// Pattern segments that start with a literal `.`
    dot_segments: Vec<SegmentMatcher>,
}

impl CompiledGlob {
    /// Compile `pattern`, failing with [`ConfigError::InvalidPattern`] on bad syntax
    pub fn new(pattern: &str) -> Result<Self, ConfigError> {
        let glob = build(pattern)?;
        let parent = pattern
            .strip_suffix("/**")
            .filter(|parent| !parent.is_empty())
            .map(build)
            .transpose()?;
        // A segment that does not compile on its own (e.g. split alternation)
        // never admits a dot segment
        let dot_segments = pattern
            .split(DELIMITER)
            .filter(|segment| segment.starts_with('.'))
            .filter_map(|segment| build(segment).ok())
            .collect();

        Ok(Self {
            source: pattern.to_string(),
            glob,
            parent,
            dot_segments,
        })
    }

    /// The glob as written
    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn is_match(&self, path: &str) -> bool {
        if path.is_empty() || !self.admits_dot_segments(path) {
            return false;
        }
        self.glob.is_match(path) || self.parent.as_ref().is_some_and(|p| p.is_match(path))
    }

    fn admits_dot_segments(&self, path: &str) -> bool {
        path.split(DELIMITER)
            .filter(|segment| segment.starts_with('.'))
            .all(|segment| self.dot_segments.iter().any(|g| g.is_match(segment)))
    }
}

impl PartialEq for CompiledGlob {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

impl Eq for CompiledGlob {}

impl fmt::Display for CompiledGlob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

fn build(pattern: &str) -> Result<SegmentMatcher, ConfigError> {
    GlobBuilder::new(pattern)
        .literal_separator(true)
        .build()
        .map(|glob| glob.compile_matcher())
        .map_err(|e| ConfigError::InvalidPattern {
            pattern: pattern.to_string(),
            reason: e.kind().to_string(),
        })
}
