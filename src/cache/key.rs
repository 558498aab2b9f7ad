//! Cache key construction.
//!
//! Keys have the form `<prefix>:<part>[:<part>...]`. The prefix selects the
//! TTL class (see [`policy`](super::policy)).

/// Separator between key segments.
pub const KEY_SEPARATOR: char = ':';

/// Join `prefix` and every non-empty part with `:`.
///
/// Empty parts are dropped before joining, so `build_key("repo", ["octocat", ""])`
/// yields `"repo:octocat"`.
pub fn build_key<I, S>(prefix: &str, parts: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut key = String::from(prefix);
    for part in parts {
        let part = part.as_ref();
        if part.is_empty() {
            continue;
        }
        key.push(KEY_SEPARATOR);
        key.push_str(part);
    }
    key
}

/// The substring before the first `:`, or the whole key when there is none.
pub fn key_prefix(key: &str) -> &str {
    key.split_once(KEY_SEPARATOR)
        .map(|(prefix, _)| prefix)
        .unwrap_or(key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_build_key_joins_parts() {
        assert_eq!(
            build_key("repo", ["octocat", "Hello-World"]),
            "repo:octocat:Hello-World"
        );
    }

    #[test]
    fn test_build_key_drops_empty_parts() {
        assert_eq!(build_key("search", ["", "svelte"]), "search:svelte");
        assert_eq!(build_key("repo", ["octocat", ""]), "repo:octocat");
    }

    #[test]
    fn test_build_key_without_parts() {
        assert_eq!(build_key("repo", Vec::<String>::new()), "repo");
        assert_eq!(build_key("repo", [""]), "repo");
    }

    #[test]
    fn test_cache_key_macro_accepts_display_parts() {
        let owner = String::from("octocat");
        assert_eq!(
            crate::cache_key!("implementation", owner, "", 42u64),
            "implementation:octocat:42"
        );
    }

    #[test]
    fn test_key_prefix() {
        assert_eq!(key_prefix("issues:42"), "issues");
        assert_eq!(key_prefix("repo:a:b"), "repo");
        assert_eq!(key_prefix("bare"), "bare");
        assert_eq!(key_prefix(":x"), "");
    }

    proptest! {
        #[test]
        fn prop_prefix_of_built_key_is_prefix(
            prefix in "[a-z]{1,12}",
            parts in prop::collection::vec("[a-zA-Z0-9_-]{0,8}", 0..6),
        ) {
            let key = build_key(&prefix, &parts);
            prop_assert_eq!(key_prefix(&key), prefix.as_str());
            prop_assert!(!key.ends_with(KEY_SEPARATOR));
            prop_assert!(!key.contains("::"));
        }
    }
}
