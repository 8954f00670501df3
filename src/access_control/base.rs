//! Base derivation
//!
//! A base is the rule-table key for a path: its first `depth + 1` segments.

/// Path delimiter
pub const DELIMITER: char = '/';

/// Default number of segments after the leading empty one
pub const DEFAULT_BASE_DEPTH: usize = 2;

/// Derive the base of `path` by keeping its first `depth + 1` segments.
///
/// Paths with fewer segments yield all of them. With the default depth a path
/// like `/one/two/three` has base `/one/two` (the empty segment before the
/// leading slash counts as one).
pub fn resolve_base(path: &str, depth: usize) -> String {
    path.split(DELIMITER)
        .take(depth.saturating_add(1))
        .collect::<Vec<_>>()
        .join("/")
}

/// Remove the first occurrence of `base` from `path`.
///
/// This is a plain substring removal, not segment aware: when the base string
/// does not start the path but appears later, that later occurrence is removed.
pub fn strip_base(base: &str, path: &str) -> String {
    path.replacen(base, "", 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("/one/two/three", 2, "/one/two")]
    #[case("/a/b/c/d", 3, "/a/b/c")]
    #[case("/a", 2, "/a")]
    #[case("/a/b", 2, "/a/b")]
    #[case("/a/b/", 2, "/a/b")]
    #[case("/a/b/c", 0, "")]
    #[case("/a/b/c", 1, "/a")]
    #[case("", 2, "")]
    #[case("a/b/c", 2, "a/b/c")]
    fn test_resolve_base(#[case] path: &str, #[case] depth: usize, #[case] expected: &str) {
        assert_eq!(resolve_base(path, depth), expected);
    }

    #[test]
    fn test_resolve_base_is_idempotent() {
        let base = resolve_base("/one/two/three/four", 2);
        let again = resolve_base(&format!("{base}/five/six"), 2);
        assert_eq!(again, base);
        assert_eq!(resolve_base(&base, 2), base);
    }

    #[test]
    fn test_resolve_base_segment_bound() {
        for depth in 0..5 {
            let base = resolve_base("/a/b/c/d/e/f", depth);
            assert!(base.split(DELIMITER).count() <= depth + 1);
            assert!("/a/b/c/d/e/f".starts_with(&base));
        }
    }

    #[rstest]
    #[case("/a/b", "/a/b/c", "/c")]
    #[case("/a/b", "/a/b/c/d", "/c/d")]
    #[case("/a/b", "/a/b", "")]
    #[case("/a/b", "/x/y", "/x/y")]
    fn test_strip_base(#[case] base: &str, #[case] path: &str, #[case] expected: &str) {
        assert_eq!(strip_base(base, path), expected);
    }

    #[test]
    fn test_strip_base_recovers_suffix() {
        let path = "/a/b/c/d/index.html";
        let base = resolve_base(path, DEFAULT_BASE_DEPTH);
        assert_eq!(format!("{base}{}", strip_base(&base, path)), path);
    }

    #[test]
    fn test_strip_base_removes_only_first_occurrence() {
        assert_eq!(strip_base("/a/b", "/a/b/a/b"), "/a/b");
    }

    #[test]
    fn test_strip_base_is_not_segment_aware() {
        // Base string found inside the path rather than at its start
        assert_eq!(strip_base("/a/b", "/x/a/bc"), "/xc");
    }
}
