//! Access control integration tests
//!
//! Covers the full resolution pipeline against the reference rule table:
//! - Base derivation at default and custom depths
//! - Rule matching order and negation
//! - First-match selection across caller groups
//! - Single-group bases
//! - The single-base lookup (no fallback to other prefixes)
//! - Glob edges: dot segments, `dir/**` at `dir`, a path equal to its base

use rstest::rstest;
use uri_gate::access_control::{
    AccessDecision, AuthorizeOptions, GlobMatcher, NoDecisionReason, RuleEntry, RuleSet,
    RuleTable, UriAuthorizer, match_rules, resolve_base, select_decision, strip_base,
};

// =============================================================================
// Test Helpers
// =============================================================================

fn reference_table() -> RuleTable {
    RuleTable::new().with_group("/login", "public").with_rules(
        "/a/b",
        RuleSet::new()
            .with_rule("!/**/index.html", ["special-group"])
            .and_then(|r| r.with_rule("/*/resources/js/**/*.private.js", ["dev"]))
            .and_then(|r| r.with_rule("/*/resources/js/**", ["public"]))
            .and_then(|r| r.with_rule("/master/**", ["just-master"]))
            .and_then(|r| r.with_rule("/**/*", ["normal"]))
            .unwrap(),
    )
}

fn authorizer() -> UriAuthorizer {
    UriAuthorizer::new(reference_table())
}

// =============================================================================
// 1. Pipeline stages
// =============================================================================

mod pipeline {
    use super::*;

    #[test]
    fn test_stages_compose() {
        let table = reference_table();
        let path = "/a/b/c/d";

        let base = resolve_base(path, 2);
        assert_eq!(base, "/a/b");
        assert!(table.has_rules(&base));

        let stripped = strip_base(&base, path);
        assert_eq!(stripped, "/c/d");

        let Some(RuleEntry::Rules(rules)) = table.get_rules(&base) else {
            panic!("expected a rule set for {base}");
        };
        let matched = match_rules(rules, &stripped, &GlobMatcher::new());
        assert_eq!(matched.len(), 1);
        assert!(matched[0].allow);
        assert_eq!(matched[0].rule, "/**/*");
        assert_eq!(matched[0].triggers.groups, vec!["normal"]);
    }

    #[test]
    fn test_index_matches_deny_then_catch_all() {
        let table = reference_table();
        let Some(RuleEntry::Rules(rules)) = table.get_rules("/a/b") else {
            panic!("expected a rule set");
        };
        let matched = match_rules(rules, "/c/d/index.html", &GlobMatcher::new());

        let summary: Vec<_> = matched
            .iter()
            .map(|m| (m.allow, m.rule, m.triggers.groups.clone()))
            .collect();
        assert_eq!(
            summary,
            vec![
                (false, "!/**/index.html", vec!["special-group".to_string()]),
                (true, "/**/*", vec!["normal".to_string()]),
            ]
        );
    }

    #[rstest]
    #[case(&["just-master"], None)]
    #[case(&["normal"], Some((true, "/**/*")))]
    #[case(&["special-group"], Some((false, "!/**/index.html")))]
    #[case(&["normal", "special-group"], Some((false, "!/**/index.html")))]
    #[case(&["special-group", "normal"], Some((false, "!/**/index.html")))]
    fn test_first_matching_rule_for_index(
        #[case] groups: &[&str],
        #[case] expected: Option<(bool, &str)>,
    ) {
        let table = reference_table();
        let Some(RuleEntry::Rules(rules)) = table.get_rules("/a/b") else {
            panic!("expected a rule set");
        };
        let matched = match_rules(rules, "/c/d/index.html", &GlobMatcher::new());
        let decision = select_decision(&matched, groups).map(|m| (m.allow, m.rule));
        assert_eq!(decision, expected);
    }
}

// =============================================================================
// 2. End-to-end authorization
// =============================================================================

mod authorize {
    use super::*;

    #[test]
    fn test_catch_all_allows_normal() {
        assert_eq!(authorizer().authorize("/a/b/c/d", &["normal"]), vec!["normal"]);
    }

    #[test]
    fn test_earlier_deny_wins_over_later_allow() {
        let groups = authorizer().authorize("/a/b/c/d/index.html", &["normal", "special-group"]);
        assert!(groups.is_empty());
    }

    #[test]
    fn test_index_allowed_for_normal_only() {
        assert_eq!(
            authorizer().authorize("/a/b/c/d/index.html", &["normal"]),
            vec!["normal"]
        );
    }

    #[test]
    fn test_private_js_goes_to_dev() {
        let authorizer = authorizer();
        let path = "/a/b/app/resources/js/lib/keys.private.js";
        assert_eq!(authorizer.authorize(path, &["dev"]), vec!["dev"]);
        // Public also matches the broader js rule, declared after the private one
        assert_eq!(authorizer.authorize(path, &["public"]), vec!["public"]);
        assert_eq!(authorizer.authorize(path, &["public", "dev"]), vec!["dev"]);
    }

    #[test]
    fn test_master_rule() {
        let authorizer = authorizer();
        assert_eq!(
            authorizer.authorize("/a/b/master/report.pdf", &["just-master"]),
            vec!["just-master"]
        );
        assert!(authorizer.authorize("/a/b/other/report.pdf", &["just-master"]).is_empty());
    }

    #[test]
    fn test_master_rule_covers_directory_itself() {
        let authorizer = authorizer();
        assert_eq!(
            authorizer.authorize("/a/b/master", &["just-master"]),
            vec!["just-master"]
        );
        assert_eq!(authorizer.authorize("/a/b/master", &["normal"]), vec!["normal"]);
        assert_eq!(
            authorizer.authorize("/a/b/app/resources/js", &["public"]),
            vec!["public"]
        );
    }

    #[rstest]
    #[case("/a/b/.env")]
    #[case("/a/b/.git/config")]
    #[case("/a/b/c/.git/HEAD")]
    #[case("/a/b/master/.secret")]
    #[case("/a/b/app/resources/js/.cache/app.js")]
    fn test_dot_segments_not_granted_by_wildcards(#[case] path: &str) {
        let groups = ["normal", "just-master", "public", "dev"];
        let authorizer = authorizer();
        assert!(authorizer.authorize(path, &groups).is_empty());
        assert_eq!(
            authorizer.evaluate(path, &groups),
            AccessDecision::NoDecision(NoDecisionReason::NoPatternMatched)
        );
    }

    #[test]
    fn test_dot_segment_granted_by_literal_rule() {
        let table = RuleTable::new().with_rules(
            "/a/b",
            RuleSet::new()
                .with_rule("/.well-known/**", ["public"])
                .and_then(|r| r.with_rule("/**/*", ["normal"]))
                .unwrap(),
        );
        let authorizer = UriAuthorizer::new(table);

        assert_eq!(
            authorizer.authorize("/a/b/.well-known/security.txt", &["public", "normal"]),
            vec!["public"]
        );
        assert!(authorizer.authorize("/a/b/.env", &["public", "normal"]).is_empty());
    }

    #[test]
    fn test_no_groups_never_granted() {
        let authorizer = authorizer();
        assert!(authorizer.authorize::<&str>("/a/b/c/d", &[]).is_empty());
        assert!(authorizer.authorize::<&str>("/login", &[]).is_empty());
    }

    #[test]
    fn test_owned_group_names() {
        let groups = vec!["normal".to_string()];
        assert_eq!(authorizer().authorize("/a/b/c", &groups), vec!["normal"]);
    }
}

// =============================================================================
// 3. Single-group bases and the single-base lookup
// =============================================================================

mod bases {
    use super::*;

    #[test]
    fn test_login_is_public() {
        let authorizer = authorizer();
        assert_eq!(authorizer.authorize("/login", &["public"]), vec!["public"]);
        assert!(authorizer.authorize("/login", &["other"]).is_empty());
    }

    #[test]
    fn test_deeper_path_misses_shallow_base() {
        let authorizer = authorizer();
        assert_eq!(resolve_base("/login/a/b.html", 2), "/login/a");
        assert!(authorizer.authorize("/login/a/b.html", &["public"]).is_empty());
        assert_eq!(
            authorizer.evaluate("/login/a/b.html", &["public"]),
            AccessDecision::NoDecision(NoDecisionReason::NoBaseEntry)
        );
    }

    #[test]
    fn test_shallow_path_misses_deeper_base() {
        assert!(authorizer().authorize("/a", &["normal"]).is_empty());
    }

    #[test]
    fn test_depth_must_match_table_authoring() {
        let table = RuleTable::new().with_rules(
            "/a/b/c",
            RuleSet::new().with_rule("/**/*", ["normal"]).unwrap(),
        );
        let authorizer = UriAuthorizer::new(table);

        assert!(authorizer.authorize("/a/b/c/d", &["normal"]).is_empty());
        assert_eq!(
            authorizer.authorize_with("/a/b/c/d", &["normal"], &AuthorizeOptions { base_depth: 3 }),
            vec!["normal"]
        );
    }

    #[test]
    fn test_path_equal_to_base() {
        let authorizer = authorizer();
        assert_eq!(strip_base("/a/b", "/a/b"), "");
        assert!(authorizer.authorize("/a/b", &["normal"]).is_empty());
        assert_eq!(
            authorizer.evaluate("/a/b", &["normal", "just-master"]),
            AccessDecision::NoDecision(NoDecisionReason::NoPatternMatched)
        );
    }

    #[test]
    fn test_unknown_base() {
        assert_eq!(
            authorizer().evaluate("/x/y/z", &["normal"]),
            AccessDecision::NoDecision(NoDecisionReason::NoBaseEntry)
        );
    }
}

// =============================================================================
// 4. Concurrency
// =============================================================================

mod concurrency {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_shared_authorizer_across_threads() {
        let authorizer = Arc::new(authorizer());

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let authorizer = Arc::clone(&authorizer);
                thread::spawn(move || {
                    let path = format!("/a/b/dir{i}/file.txt");
                    authorizer.authorize(&path, &["normal"])
                })
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.join().unwrap(), vec!["normal"]);
        }
    }
}
