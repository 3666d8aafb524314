//! Signature base string construction for OAuth 1.0a (RFC 5849 §3.4.1).
//!
//! The base string has the form:
//!
//! ```text
//! HTTP-METHOD & encode(BaseStringURI) & encode(NormalizedParameters)
//! ```
//!
//! Each component is normalized so consumer and provider compute the same
//! bytes regardless of how the request travelled.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

/// The set of characters that must be percent-encoded in OAuth values.
///
/// Everything except the RFC 3986 unreserved characters
/// (A-Z, a-z, 0-9, `-`, `_`, `.`, `~`) is encoded, with uppercase hex digits.
const OAUTH_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// The parameter that carries the signature and is excluded from the base string.
pub const SIGNATURE_PARAM: &str = "oauth_signature";

/// Percent-encode a value using the OAuth encoding rules.
///
/// # Examples
///
/// ```
/// use lti_auth::canonical::percent_encode;
///
/// assert_eq!(percent_encode("r b"), "r%20b");
/// assert_eq!(percent_encode("a-b_c.d~e"), "a-b_c.d~e");
/// assert_eq!(percent_encode("=%3D"), "%3D%253D");
/// ```
#[must_use]
pub fn percent_encode(input: &str) -> String {
    utf8_percent_encode(input, OAUTH_ENCODE_SET).to_string()
}

/// Build the normalized request parameter string.
///
/// Every pair is percent-encoded, `oauth_signature` is dropped, pairs are
/// sorted by encoded name and then by encoded value, and joined with `&`.
/// Duplicate names are kept.
///
/// # Examples
///
/// ```
/// use lti_auth::canonical::normalize_parameters;
///
/// let normalized = normalize_parameters([("b", "2"), ("a", "x y"), ("oauth_signature", "s")]);
/// assert_eq!(normalized, "a=x%20y&b=2");
/// ```
#[must_use]
pub fn normalize_parameters<'a, I>(pairs: I) -> String
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let mut encoded: Vec<(String, String)> = pairs
        .into_iter()
        .filter(|(name, _)| *name != SIGNATURE_PARAM)
        .map(|(name, value)| (percent_encode(name), percent_encode(value)))
        .collect();

    encoded.sort_unstable();

    encoded
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&")
}

/// Build the base string URI: lowercase scheme and host, default ports
/// omitted, no query or fragment.
///
/// # Examples
///
/// ```
/// use lti_auth::canonical::build_base_uri;
///
/// assert_eq!(build_base_uri("HTTP", "Example.COM", Some(80), "/r"), "http://example.com/r");
/// assert_eq!(build_base_uri("https", "lms.test", Some(8443), ""), "https://lms.test:8443/");
/// ```
#[must_use]
pub fn build_base_uri(scheme: &str, host: &str, port: Option<u16>, path: &str) -> String {
    let scheme = scheme.to_ascii_lowercase();
    let host = host.to_ascii_lowercase();
    let path = if path.is_empty() { "/" } else { path };

    let default_port = match scheme.as_str() {
        "http" => Some(80),
        "https" => Some(443),
        _ => None,
    };

    match port {
        Some(port) if Some(port) != default_port => format!("{scheme}://{host}:{port}{path}"),
        _ => format!("{scheme}://{host}{path}"),
    }
}

/// Assemble the signature base string from its three components.
#[must_use]
pub fn build_signature_base_string(method: &str, base_uri: &str, normalized_params: &str) -> String {
    format!(
        "{}&{}&{}",
        method.to_ascii_uppercase(),
        percent_encode(base_uri),
        percent_encode(normalized_params)
    )
}

/// Build the signing key: `encode(consumer_secret) & encode(token_secret)`.
///
/// LTI launches carry no token, so the token secret is usually empty and the
/// key ends with a bare `&`.
#[must_use]
pub fn signing_key(consumer_secret: &str, token_secret: &str) -> String {
    format!(
        "{}&{}",
        percent_encode(consumer_secret),
        percent_encode(token_secret)
    )
}
