//! Extraction of repository URLs from fetch-failure diagnostics.
//!
//! A diagnostic is a comma separated list of error fragments. Warning
//! fragments (`W:`) are never actionable and are skipped; every URL found in
//! the remaining fragments is a candidate for disabling.

use lazy_static::lazy_static;
use regex::Regex;

pub const WARNING_MARKER: &str = "W:";

lazy_static! {
    pub static ref URL_REGEX: Regex =
        Regex::new(r"(?:https?|ftp)://\S+").expect("URL pattern is valid");
}

/// Candidate repository URLs named by `message`, in fragment order.
///
/// The iterator is lazy; calling this again on the same text yields the same
/// sequence. Duplicates are kept.
pub fn failed_repo_urls(message: &str) -> impl Iterator<Item = &str> + '_ {
    message
        .split(',')
        .map(str::trim)
        .filter(|fragment| !fragment.starts_with(WARNING_MARKER))
        .flat_map(|fragment| {
            URL_REGEX
                .find_iter(fragment)
                .map(|m| m.as_str().trim_end_matches('\''))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(message: &str) -> Vec<&str> {
        failed_repo_urls(message).collect()
    }

    #[test]
    fn test_warnings_only_yield_nothing() {
        assert!(collect("W: http://a.example/ skipped, W: ftp://b.example/x").is_empty());
        assert!(collect("").is_empty());
    }

    #[test]
    fn test_error_fragment_after_warning() {
        let urls = collect("W: skip this, E: Failed to fetch http://bad.example/repo/ Hash Sum mismatch");
        assert_eq!(urls, vec!["http://bad.example/repo/"]);
    }

    #[test]
    fn test_quoted_urls_are_unquoted() {
        let urls = collect(
            "E: The repository 'https://ppa.example/ubuntu focal Release' does not have a Release file., \
             E:Failed to fetch 'ftp://mirror.example/debian/dists/sid/InRelease'",
        );
        assert_eq!(
            urls,
            vec![
                "https://ppa.example/ubuntu",
                "ftp://mirror.example/debian/dists/sid/InRelease"
            ]
        );
    }

    #[test]
    fn test_multiple_matches_keep_order_and_duplicates() {
        let urls = collect(
            "E:GPG error: http://one.example/a http://two.example/b, E:again http://one.example/a",
        );
        assert_eq!(
            urls,
            vec!["http://one.example/a", "http://two.example/b", "http://one.example/a"]
        );
    }

    #[test]
    fn test_fragment_without_url_contributes_nothing() {
        let urls = collect("E: Some index files failed to download, E: http://x.example/ 404");
        assert_eq!(urls, vec!["http://x.example/"]);
    }

    #[test]
    fn test_only_known_schemes() {
        let urls = collect("E: git://nope.example/ file:///srv/repo https://yes.example/");
        assert_eq!(urls, vec!["https://yes.example/"]);
        for url in urls {
            assert!(
                url.starts_with("http://") || url.starts_with("https://") || url.starts_with("ftp://")
            );
            assert!(!url.ends_with('\''));
        }
    }

    #[test]
    fn test_sequence_is_restartable() {
        let message = "E: http://a.example/, E: http://b.example/";
        assert_eq!(collect(message), collect(message));
    }
}
