// src/version/mod.rs

//! Version ordering for resolved npm package versions
//!
//! Versions found in `package-lock.json` are almost always semver, but the
//! lockfile can also carry tags, git refs or tarball URLs. Semver strings are
//! ordered by semver precedence; anything that fails to parse falls back to
//! plain string comparison so that sorting never fails.

use semver::Version;
use std::cmp::Ordering;

/// Parse a version the way npm's loose mode accepts it
///
/// Surrounding whitespace and a leading `=` or `v` are tolerated.
fn parse_loose(s: &str) -> Option<Version> {
    let trimmed = s.trim();
    let trimmed = trimmed.strip_prefix('=').unwrap_or(trimmed).trim_start();
    let trimmed = trimmed
        .strip_prefix('v')
        .or_else(|| trimmed.strip_prefix('V'))
        .unwrap_or(trimmed);
    Version::parse(trimmed).ok()
}

/// Semver precedence, ignoring build metadata
fn precedence(a: &Version, b: &Version) -> Ordering {
    a.major
        .cmp(&b.major)
        .then(a.minor.cmp(&b.minor))
        .then(a.patch.cmp(&b.patch))
        .then_with(|| match (a.pre.is_empty(), b.pre.is_empty()) {
            (true, true) => Ordering::Equal,
            // A release outranks any of its prereleases
            (true, false) => Ordering::Greater,
            (false, true) => Ordering::Less,
            (false, false) => a.pre.cmp(&b.pre),
        })
}

/// Compare two version strings
///
/// Uses semver precedence when both sides parse, raw string order otherwise.
pub fn compare_versions(a: &str, b: &str) -> Ordering {
    match (parse_loose(a), parse_loose(b)) {
        (Some(va), Some(vb)) => precedence(&va, &vb),
        _ => a.cmp(b),
    }
}

/// Check if version `a` is strictly older than version `b`
pub fn is_older(a: &str, b: &str) -> bool {
    compare_versions(a, b) == Ordering::Less
}

/// Check whether a string parses as a (loose) semver version
pub fn is_valid(version: &str) -> bool {
    parse_loose(version).is_some()
}

/// Pick the extreme element, preferring versions that parse as semver
fn find_extreme<S: AsRef<str>>(versions: &[S], wanted: Ordering) -> Option<&str> {
    fn pick<'a>(iter: impl Iterator<Item = &'a str>, wanted: Ordering) -> Option<&'a str> {
        iter.reduce(|best, v| {
            if compare_versions(v, best) == wanted {
                v
            } else {
                best
            }
        })
    }

    let valid = versions.iter().map(|v| v.as_ref()).filter(|v| is_valid(v));
    pick(valid, wanted).or_else(|| pick(versions.iter().map(|v| v.as_ref()), wanted))
}

/// Find the minimum version in a list, `None` when the list is empty
pub fn find_min<S: AsRef<str>>(versions: &[S]) -> Option<&str> {
    find_extreme(versions, Ordering::Less)
}

/// Find the maximum version in a list, `None` when the list is empty
pub fn find_max<S: AsRef<str>>(versions: &[S]) -> Option<&str> {
    find_extreme(versions, Ordering::Greater)
}

/// Versions from `versions` that are strictly older than `reference`
pub fn older_versions_than<'a, S: AsRef<str>>(versions: &'a [S], reference: &str) -> Vec<&'a str> {
    versions
        .iter()
        .map(|v| v.as_ref())
        .filter(|v| is_older(v, reference))
        .collect()
}

/// Check if the `after` set contains anything older than the minimum of `before`
///
/// Returns false when either side is empty: there is nothing to compare.
pub fn would_introduce_older_versions<S: AsRef<str>, T: AsRef<str>>(
    before: &[S],
    after: &[T],
) -> bool {
    if before.is_empty() || after.is_empty() {
        return false;
    }

    let Some(floor) = find_min(before) else {
        return false;
    };

    after.iter().any(|v| is_older(v.as_ref(), floor))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compare_basic_fields() {
        assert_eq!(compare_versions("1.2.3", "1.2.4"), Ordering::Less);
        assert_eq!(compare_versions("1.3.0", "1.2.9"), Ordering::Greater);
        assert_eq!(compare_versions("2.0.0", "10.0.0"), Ordering::Less);
        assert_eq!(compare_versions("1.2.3", "1.2.3"), Ordering::Equal);
    }

    #[test]
    fn test_compare_prerelease_below_release() {
        assert_eq!(compare_versions("1.0.0-rc.1", "1.0.0"), Ordering::Less);
        assert_eq!(compare_versions("1.0.0", "1.0.0-rc.1"), Ordering::Greater);
        assert_eq!(compare_versions("1.0.0-rc.1", "0.9.9"), Ordering::Greater);
    }

    #[test]
    fn test_compare_prerelease_numeric_segments() {
        assert_eq!(compare_versions("1.0.0-alpha.2", "1.0.0-alpha.10"), Ordering::Less);
        assert_eq!(compare_versions("1.0.0-beta.11", "1.0.0-beta.2"), Ordering::Greater);
    }

    #[test]
    fn test_compare_prerelease_lexical_and_prefix() {
        assert_eq!(compare_versions("1.0.0-alpha", "1.0.0-beta"), Ordering::Less);
        assert_eq!(compare_versions("1.0.0-alpha", "1.0.0-alpha.1"), Ordering::Less);
        assert_eq!(compare_versions("1.0.0-alpha.1", "1.0.0-alpha.beta"), Ordering::Less);
    }

    #[test]
    fn test_compare_ignores_build_metadata() {
        assert_eq!(compare_versions("1.0.0+b1", "1.0.0+b2"), Ordering::Equal);
        assert_eq!(compare_versions("1.0.0+build.5", "1.0.0"), Ordering::Equal);
    }

    #[test]
    fn test_compare_tolerates_v_prefix() {
        assert_eq!(compare_versions("v1.2.3", "1.2.3"), Ordering::Equal);
        assert_eq!(compare_versions("v1.2.3", "v1.10.0"), Ordering::Less);
    }

    #[test]
    fn test_compare_invalid_falls_back_to_string_order() {
        assert_eq!(compare_versions("latest", "next"), Ordering::Less);
        assert_eq!(compare_versions("next", "latest"), Ordering::Greater);
        assert_eq!(compare_versions("latest", "latest"), Ordering::Equal);
    }

    #[test]
    fn test_compare_is_reflexive_and_transitive() {
        let versions = [
            "0.1.0",
            "1.0.0-alpha",
            "1.0.0-alpha.1",
            "1.0.0-alpha.beta",
            "1.0.0-beta.2",
            "1.0.0-beta.11",
            "1.0.0-rc.1",
            "1.0.0",
            "1.0.1",
            "2.0.0",
        ];
        for v in versions {
            assert_eq!(compare_versions(v, v), Ordering::Equal);
        }
        for (i, a) in versions.iter().enumerate() {
            for b in &versions[i + 1..] {
                assert_eq!(compare_versions(a, b), Ordering::Less, "{} < {}", a, b);
                assert_eq!(compare_versions(b, a), Ordering::Greater, "{} > {}", b, a);
            }
        }
    }

    #[test]
    fn test_find_min_and_max() {
        let empty: [&str; 0] = [];
        assert_eq!(find_min(&empty), None);
        assert_eq!(find_max(&empty), None);
        assert_eq!(find_min(&["1.0.0"]), Some("1.0.0"));

        let versions = ["1.37.0", "1.28.0", "1.30.0"];
        assert_eq!(find_min(&versions), Some("1.28.0"));
        assert_eq!(find_max(&versions), Some("1.37.0"));
    }

    #[test]
    fn test_find_min_prefers_semver_entries() {
        let versions = ["latest", "2.0.0", "1.5.0"];
        assert_eq!(find_min(&versions), Some("1.5.0"));

        let only_tags = ["next", "latest"];
        assert_eq!(find_min(&only_tags), Some("latest"));
    }

    #[test]
    fn test_older_versions_than() {
        let versions = ["1.37.0", "1.28.0", "1.30.0"];
        assert_eq!(older_versions_than(&versions, "1.37.0"), vec!["1.28.0", "1.30.0"]);
        assert!(older_versions_than(&versions, "1.0.0").is_empty());
    }

    #[test]
    fn test_would_introduce_older_versions() {
        assert!(would_introduce_older_versions(
            &["1.37.0"],
            &["1.37.0", "1.28.0", "1.30.0"]
        ));
        assert!(!would_introduce_older_versions(&["1.0.0"], &["1.0.0", "2.0.0"]));

        let empty: [&str; 0] = [];
        assert!(!would_introduce_older_versions(&empty, &["1.0.0"]));
        assert!(!would_introduce_older_versions(&["1.0.0"], &empty));
        assert!(!would_introduce_older_versions(&empty, &empty));
    }
}
