//! Best-effort normalization of "view this item" links.
//!
//! Publishers put the item's home page in `related`, `Identifier`, or
//! `Item Url`, and not always as an absolute URL (`digitalcollections.example.org/ark:/...`).
//! This is a heuristic, not URL validation: anything without an `http://` or
//! `https://` scheme gets `http://` in front, and malformed hosts pass through.

/// Sentinel for records that have no link at all. Never prefixed.
pub const NO_LINK: &str = "No link available";

const SCHEMES: [&str; 2] = ["http://", "https://"];

/// Whether `candidate` starts with `http://` or `https://` (case-insensitive).
pub fn is_absolute_url(candidate: &str) -> bool {
    SCHEMES.iter().any(|scheme| {
        candidate
            .get(..scheme.len())
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case(scheme))
    })
}

/// Turn a link candidate into an absolute URL.
///
/// - absolute `http(s)://` URLs are returned unchanged
/// - [`NO_LINK`] is returned unchanged
/// - anything else is prefixed with `http://`
///
/// Surrounding whitespace is dropped; a blank candidate becomes [`NO_LINK`].
pub fn normalize(candidate: &str) -> String {
    let candidate = candidate.trim();
    if candidate.is_empty() {
        return NO_LINK.to_string();
    }
    if candidate == NO_LINK || is_absolute_url(candidate) {
        candidate.to_string()
    } else {
        format!("http://{candidate}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absolute_urls_unchanged() {
        assert_eq!(normalize("https://x.org/a"), "https://x.org/a");
        assert_eq!(normalize("http://x.org/a?b=c"), "http://x.org/a?b=c");
    }

    #[test]
    fn scheme_check_ignores_case() {
        assert!(is_absolute_url("HTTPS://X.ORG"));
        assert_eq!(normalize("Http://x.org"), "Http://x.org");
    }

    #[test]
    fn relative_links_get_http_prefix() {
        assert_eq!(normalize("x.org/a"), "http://x.org/a");
        assert_eq!(normalize("www.loc.gov/item/2005625258/"), "http://www.loc.gov/item/2005625258/");
    }

    #[test]
    fn sentinel_unchanged() {
        assert_eq!(normalize(NO_LINK), NO_LINK);
    }

    #[test]
    fn other_schemes_are_not_absolute() {
        assert!(!is_absolute_url("ftp://x.org"));
        assert!(!is_absolute_url("ark:/12345/abc"));
        assert_eq!(normalize("ark:/12345/abc"), "http://ark:/12345/abc");
    }

    #[test]
    fn malformed_hosts_pass_through() {
        assert_eq!(normalize("not a host"), "http://not a host");
    }

    #[test]
    fn blank_becomes_sentinel() {
        assert_eq!(normalize("   "), NO_LINK);
    }

    #[test]
    fn short_and_multibyte_candidates() {
        assert!(!is_absolute_url("http"));
        assert!(!is_absolute_url("日本語のリンク"));
        assert_eq!(normalize("é"), "http://é");
    }
}
