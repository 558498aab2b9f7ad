//! Cache macros.

/// Build a cache key from a prefix and any `Display` parts.
///
/// Empty parts are dropped, exactly as in [`build_key`](crate::cache::build_key).
///
/// ```ignore
/// let key = cache_key!("implementation", repo.full_name, issue.number);
/// ```
#[macro_export]
macro_rules! cache_key {
    ($prefix:expr $(, $part:expr)* $(,)?) => {{
        let parts: ::std::vec::Vec<::std::string::String> =
            ::std::vec![$(::std::string::ToString::to_string(&$part)),*];
        $crate::cache::build_key($prefix, parts)
    }};
}
