//! Anonymization primitives for client-identifying request metadata.
//!
//! Both functions are pure and total: they never fail, whatever the input
//! looks like, because they run on untrusted header values. The reduced
//! forms are the only representation of the client that is ever persisted.

use std::sync::OnceLock;

use regex::Regex;

/// Placeholder stored when no address is available or the shape is not
/// recognized.
pub const UNSPECIFIED_ADDRESS: &str = "0.0.0.0";

/// Sentinel stored when the client sent no user agent.
pub const UNKNOWN_AGENT: &str = "Unknown";

/// Maximum number of characters of a user agent retained in storage.
pub const AGENT_MAX_CHARS: usize = 500;

static IPV4_RE: OnceLock<Regex> = OnceLock::new();

fn ipv4_regex() -> &'static Regex {
    IPV4_RE.get_or_init(|| {
        // Also matches the IPv6-mapped form (::ffff:192.0.2.1).
        let pattern = r"(?i)(?:::ffff:)?(\d{1,3}\.\d{1,3}\.\d{1,3}\.\d{1,3})";
        Regex::new(pattern)
            .unwrap_or_else(|error| panic!("address regex failed to compile: {error}"))
    })
}

/// Reduce a client address to a privacy-preserving form.
///
/// Dotted-quad IPv4 addresses (optionally carrying the IPv6-mapped prefix)
/// keep their first three octets and have the last replaced with `0`.
/// Colon-separated addresses that are not IPv4-shaped have their last
/// segment replaced with `0`. Anything else, including an empty string,
/// collapses to [`UNSPECIFIED_ADDRESS`].
///
/// Note: zeroing only the final 16-bit group of an IPv6 address keeps more
/// of the prefix than common anonymization practice recommends. The
/// behaviour is retained deliberately; see DESIGN.md.
///
/// # Examples
/// ```
/// use contact_backend::domain::privacy::anonymize_address;
///
/// assert_eq!(anonymize_address("192.168.1.123"), "192.168.1.0");
/// assert_eq!(anonymize_address(""), "0.0.0.0");
/// ```
pub fn anonymize_address(raw: &str) -> String {
    if raw.is_empty() {
        return UNSPECIFIED_ADDRESS.to_owned();
    }

    if let Some(captures) = ipv4_regex().captures(raw) {
        if let Some(quad) = captures.get(1) {
            let mut octets: Vec<&str> = quad.as_str().split('.').collect();
            if octets.len() == 4 {
                if let Some(last) = octets.last_mut() {
                    *last = "0";
                }
                return octets.join(".");
            }
        }
    }

    if raw.contains(':') {
        let mut segments: Vec<&str> = raw.split(':').collect();
        if segments.len() > 1 {
            if let Some(last) = segments.last_mut() {
                *last = "0";
            }
            return segments.join(":");
        }
    }

    UNSPECIFIED_ADDRESS.to_owned()
}

/// Bound a raw user-agent string for storage.
///
/// Absent or empty input yields the [`UNKNOWN_AGENT`] sentinel; anything
/// longer than [`AGENT_MAX_CHARS`] characters is silently truncated.
/// Truncation counts characters, not bytes, so multi-byte input cannot be
/// split mid code point.
pub fn summarize_agent(raw: Option<&str>) -> String {
    match raw {
        None => UNKNOWN_AGENT.to_owned(),
        Some(value) if value.is_empty() => UNKNOWN_AGENT.to_owned(),
        Some(value) => value.chars().take(AGENT_MAX_CHARS).collect(),
    }
}
