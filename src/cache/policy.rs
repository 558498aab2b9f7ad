//! TTL classification by key prefix.
//!
//! Keys are classified by an exact match on the segment before the first `:`.
//! More volatile data gets a shorter lifetime; anything unrecognised falls back
//! to [`DEFAULT_TTL`].

use crate::cache::key::key_prefix;

const HOUR: u64 = 60 * 60;
const DAY: u64 = 24 * HOUR;

/// Fallback lifetime for keys whose prefix is not classified.
pub const DEFAULT_TTL: u64 = DAY;

/// Lifetime callers pass explicitly for AI implementation guides.
pub const IMPLEMENTATION_GUIDE_TTL: u64 = 2 * HOUR;

/// Lifetime callers pass explicitly for search results.
pub const SEARCH_RESULTS_TTL: u64 = 30 * 60;

/// Volatility class of a cached entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyClass {
    /// `repo`, `search`, `api`: slow-changing aggregate and summary data.
    Aggregate,
    /// `issues`, `issue`: issue lists and content.
    Issue,
    /// `user`, `profile`.
    Profile,
    /// `implementation`: AI output tied to one issue snapshot.
    ImplementationGuide,
    /// Anything else.
    Default,
}

impl KeyClass {
    /// Classify a key prefix. Matching is exact and case-sensitive.
    pub fn from_prefix(prefix: &str) -> Self {
        match prefix {
            "repo" | "search" | "api" => KeyClass::Aggregate,
            "issues" | "issue" => KeyClass::Issue,
            "user" | "profile" => KeyClass::Profile,
            "implementation" => KeyClass::ImplementationGuide,
            _ => KeyClass::Default,
        }
    }

    /// Classify a full key by its prefix.
    pub fn of_key(key: &str) -> Self {
        Self::from_prefix(key_prefix(key))
    }

    /// Lifetime in seconds for entries of this class.
    pub const fn ttl_seconds(self) -> u64 {
        match self {
            KeyClass::Aggregate => 7 * DAY,
            KeyClass::Profile => 3 * DAY,
            KeyClass::Issue => 2 * DAY,
            KeyClass::Default => DEFAULT_TTL,
            KeyClass::ImplementationGuide => IMPLEMENTATION_GUIDE_TTL,
        }
    }
}

/// Lifetime in seconds derived from the key's prefix.
pub fn ttl_for_key(key: &str) -> u64 {
    KeyClass::of_key(key).ttl_seconds()
}

/// Effective lifetime: the explicit value when given, else the key's class.
pub fn resolve_ttl(key: &str, explicit: Option<u64>) -> u64 {
    explicit.unwrap_or_else(|| ttl_for_key(key))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ttl_for_classified_prefixes() {
        assert_eq!(ttl_for_key("issues:42"), 2 * 24 * 3600);
        assert_eq!(ttl_for_key("issue:octocat:hello:7"), 2 * 24 * 3600);
        assert_eq!(ttl_for_key("repo:a:b"), 7 * 24 * 3600);
        assert_eq!(ttl_for_key("search:svelte"), 7 * 24 * 3600);
        assert_eq!(ttl_for_key("api:repo-overview:a/b"), 7 * 24 * 3600);
        assert_eq!(ttl_for_key("user:42"), 3 * 24 * 3600);
        assert_eq!(ttl_for_key("profile:octocat"), 3 * 24 * 3600);
        assert_eq!(ttl_for_key("implementation:a/b:1"), 2 * 3600);
    }

    #[test]
    fn test_ttl_for_unknown_prefix_uses_default() {
        assert_eq!(ttl_for_key("unknown-prefix:x"), 24 * 3600);
        assert_eq!(ttl_for_key("no-separator"), 24 * 3600);
        assert_eq!(ttl_for_key(""), 24 * 3600);
    }

    #[test]
    fn test_prefix_match_is_exact() {
        assert_eq!(KeyClass::of_key("repos:a"), KeyClass::Default);
        assert_eq!(KeyClass::of_key("Repo:a"), KeyClass::Default);
        assert_eq!(KeyClass::of_key("rep:a"), KeyClass::Default);
        // Only the first segment counts.
        assert_eq!(KeyClass::of_key("misc:repo:a"), KeyClass::Default);
    }

    #[test]
    fn test_explicit_ttl_wins() {
        assert_eq!(resolve_ttl("search:svelte", Some(SEARCH_RESULTS_TTL)), 1800);
        assert_eq!(resolve_ttl("search:svelte", None), 7 * 24 * 3600);
    }

    #[test]
    fn test_classes_are_ordered_by_volatility() {
        assert!(KeyClass::ImplementationGuide.ttl_seconds() < KeyClass::Default.ttl_seconds());
        assert!(KeyClass::Default.ttl_seconds() < KeyClass::Issue.ttl_seconds());
        assert!(KeyClass::Issue.ttl_seconds() < KeyClass::Profile.ttl_seconds());
        assert!(KeyClass::Profile.ttl_seconds() < KeyClass::Aggregate.ttl_seconds());
    }
}
