//! Access control module
//!
//! Path-based authorization over a table of per-base glob rules.
//!
//! ## Resolution Model
//!
//! A query is a path plus the caller's groups:
//!
//! 1. **Base** - the first `base_depth + 1` segments of the path
//!    (`/a/b/c/d` with the default depth of 2 gives `/a/b`)
//! 2. **Lookup** - the base is looked up verbatim in the rule table
//! 3. **Entry** - either a single group owning the whole base, or an ordered
//!    list of glob rules evaluated against the rest of the path
//! 4. **Selection** - the first matching rule whose groups include one of the
//!    caller's groups decides; a leading `!` makes that decision a deny
//!
//! Declaration order is the only precedence signal. When nothing decides, the
//! result is empty and callers treat it as denied.
//!
//! ## Example Configuration
//!
//! ```toml
//! [rules]
//! "/login" = "public"
//! "/a/b" = [
//!   { pattern = "!/**/index.html", groups = ["special-group"] },
//!   { pattern = "/**/*", groups = ["normal"] },
//! ]
//! ```

pub mod base;
pub mod patterns;
pub mod resolver;
pub mod types;

pub use base::{DEFAULT_BASE_DEPTH, resolve_base, strip_base};
pub use patterns::{CompiledGlob, GlobMatcher, Matcher};
pub use resolver::{
    AccessDecision, AuthorizeOptions, NoDecisionReason, UriAuthorizer, match_rules,
    select_decision,
};
pub use types::{MatchedRule, PatternRule, Polarity, RuleEntry, RuleSet, RuleTable, Trigger};
