//! Issue key parsing and natural ordering.

use once_cell::sync::Lazy;
use regex::Regex;
use std::cmp::Ordering;

static ISSUE_KEY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([A-Z][A-Z0-9_]*)-([0-9]+)$").expect("valid issue key regex"));

static PROJECT_KEY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Z][A-Z0-9_]*$").expect("valid project key regex"));

/// Returns `true` for project keys such as `SWG` or `KWG2`.
pub fn is_project_key(candidate: &str) -> bool {
    PROJECT_KEY.is_match(candidate)
}

/// Returns `true` for keys shaped like `SWG-123`.
pub fn is_issue_key(candidate: &str) -> bool {
    ISSUE_KEY.is_match(candidate)
}

/// Split a key into its project prefix and numeric suffix.
pub fn split_key(key: &str) -> Option<(&str, u64)> {
    let caps = ISSUE_KEY.captures(key)?;
    let project = caps.get(1)?.as_str();
    let number = caps.get(2)?.as_str().parse().ok()?;
    Some((project, number))
}

/// Natural key order: project prefix lexically, then the numeric suffix
/// numerically, so `SWG-9` sorts before `SWG-10`. Keys that do not parse
/// fall back to plain string comparison after all well-formed keys.
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    match (split_key(a), split_key(b)) {
        (Some((pa, na)), Some((pb, nb))) => pa.cmp(pb).then(na.cmp(&nb)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.cmp(b),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognises_project_keys() {
        assert!(is_project_key("SWG"));
        assert!(is_project_key("KWG2"));
        assert!(!is_project_key("swg"));
        assert!(!is_project_key("SWG-1"));
        assert!(!is_project_key(""));
    }

    #[test]
    fn recognises_well_formed_keys() {
        assert!(is_issue_key("SWG-123"));
        assert!(is_issue_key("LITE2-7"));
        assert!(!is_issue_key("swg-1"));
        assert!(!is_issue_key("SWG"));
        assert!(!is_issue_key("SWG-12a"));
    }

    #[test]
    fn natural_order_compares_numbers_numerically() {
        let mut keys = vec!["SWG-10", "SWG-9", "KWG-200", "SWG-100"];
        keys.sort_by(|a, b| natural_cmp(a, b));
        assert_eq!(keys, vec!["KWG-200", "SWG-9", "SWG-10", "SWG-100"]);
    }

    #[test]
    fn malformed_keys_sort_last() {
        assert_eq!(natural_cmp("SWG-1", "weird"), Ordering::Less);
        assert_eq!(natural_cmp("abc", "abd"), Ordering::Less);
    }
}
