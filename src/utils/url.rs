// src/utils/url.rs

//! URL manipulation utilities.

use url::Url;

/// Resolve a link extracted from a listing page.
///
/// Root-relative links (leading `/`) are rewritten against the site's base
/// URL; everything else passes through unchanged.
///
/// # Examples
/// ```
/// use reelwatch::utils::url::resolve_link;
///
/// assert_eq!(
///     resolve_link("https://example.com", "/watch/1"),
///     "https://example.com/watch/1"
/// );
/// assert_eq!(
///     resolve_link("https://example.com", "https://other.com/watch/2"),
///     "https://other.com/watch/2"
/// );
/// ```
pub fn resolve_link(base_url: &str, href: &str) -> String {
    if href.starts_with('/') {
        format!("{}{}", base_url.trim_end_matches('/'), href)
    } else {
        href.to_string()
    }
}

/// Whether a URL string is syntactically absolute with an http(s) scheme.
///
/// Ledger keys must satisfy this before any membership comparison.
pub fn is_absolute_http(candidate: &str) -> bool {
    match Url::parse(candidate) {
        Ok(parsed) => matches!(parsed.scheme(), "http" | "https"),
        Err(_) => false,
    }
}
