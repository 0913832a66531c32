//! URL to domain-key normalization.
//!
//! Intention keys and blocked-site comparisons both go through
//! [`normalize_url`], so `https://reddit.com` and `http://www.reddit.com/r/x`
//! always land on the same key.

use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

// Scheme and `www.` are optional; the host runs up to the first `/` or `?`.
static LOOSE_DOMAIN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(?:https?://)?(?:www\.)?([^/?]+)").unwrap());

/// Normalize a URL (or bare domain) into the domain key used for lookups.
///
/// Never fails: a strictly parsed host wins, then a permissive pattern match,
/// and finally the input itself is returned unchanged.
pub fn normalize_url(url: &str) -> String {
    if let Some(host) = host_of(url) {
        return strip_www(&host).to_string();
    }

    if let Some(captured) = LOOSE_DOMAIN.captures(url).and_then(|c| c.get(1)) {
        return captured.as_str().to_lowercase();
    }

    url.to_string()
}

/// Host of a strictly parsed URL, if the URL parses and carries one.
pub fn host_of(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    match parsed.host_str() {
        Some(host) if !host.is_empty() => Some(host.to_lowercase()),
        _ => None,
    }
}

fn strip_www(host: &str) -> &str {
    host.strip_prefix("www.").unwrap_or(host)
}
