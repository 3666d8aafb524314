//! OAuth 1.0a signature computation and verification.
//!
//! LTI 1.x launches are signed with `HMAC-SHA1`:
//!
//! ```text
//! oauth_signature = Base64(HMAC-SHA1(encode(consumer_secret) + "&", BaseString))
//! ```
//!
//! `HMAC-SHA256` and `PLAINTEXT` are accepted as well; any other
//! `oauth_signature_method` is rejected as an unsupported scheme.

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use hmac::{Hmac, KeyInit, Mac};
use lti_core::{Params, SignatureMethod};
use percent_encoding::percent_decode_str;
use sha1::Sha1;
use sha2::Sha256;
use subtle::ConstantTimeEq;
use tracing::debug;

use crate::canonical::signing_key;
use crate::error::AuthError;

type HmacSha1 = Hmac<Sha1>;
type HmacSha256 = Hmac<Sha256>;

/// Consumer key parameter.
pub const CONSUMER_KEY_PARAM: &str = "oauth_consumer_key";
/// Signature method parameter.
pub const SIGNATURE_METHOD_PARAM: &str = "oauth_signature_method";
/// Nonce parameter.
pub const NONCE_PARAM: &str = "oauth_nonce";
/// Timestamp parameter.
pub const TIMESTAMP_PARAM: &str = "oauth_timestamp";
/// Version parameter.
pub const VERSION_PARAM: &str = "oauth_version";
/// Body hash parameter used on non-form service requests.
pub const BODY_HASH_PARAM: &str = "oauth_body_hash";

/// Check whether an `Authorization` header uses the OAuth scheme.
#[must_use]
pub fn is_oauth_header(auth_header: &str) -> bool {
    auth_header
        .get(..6)
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case("OAuth "))
}

/// Parse an `Authorization: OAuth ...` header into its parameters.
///
/// Values are quoted and percent-encoded on the wire; they are returned
/// decoded. The `realm` parameter is not part of the signature and is dropped.
///
/// ```text
/// OAuth realm="Example", oauth_consumer_key="9djdj82h48djs9d2", oauth_nonce="7d8f3e4a"
/// ```
///
/// # Errors
///
/// Returns [`AuthError::Malformed`] if the header is not an OAuth header or a
/// parameter is not a `name="value"` pair.
pub fn parse_authorization_header(header: &str) -> Result<Params, AuthError> {
    if !is_oauth_header(header) {
        return Err(AuthError::Malformed(
            "Authorization header is not an OAuth header".to_owned(),
        ));
    }

    let mut params = Params::new();
    for part in header[6..].split(',') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }

        let (name, value) = part
            .split_once('=')
            .ok_or_else(|| AuthError::Malformed(format!("invalid OAuth header parameter: {part}")))?;
        let value = value
            .strip_prefix('"')
            .and_then(|v| v.strip_suffix('"'))
            .ok_or_else(|| AuthError::Malformed(format!("unquoted OAuth header value for {name}")))?;

        let name = decode(name.trim());
        if name == "realm" {
            continue;
        }
        params.append(name, decode(value));
    }

    Ok(params)
}

/// Compute the signature of `base_string` for the given method and secrets.
///
/// The result is the value carried in `oauth_signature`, before percent-encoding.
#[must_use]
pub fn compute_signature(
    method: SignatureMethod,
    base_string: &str,
    consumer_secret: &str,
    token_secret: &str,
) -> String {
    let key = signing_key(consumer_secret, token_secret);
    match method {
        SignatureMethod::HmacSha1 => {
            let mut mac =
                HmacSha1::new_from_slice(key.as_bytes()).expect("HMAC can accept any key length");
            mac.update(base_string.as_bytes());
            BASE64.encode(mac.finalize().into_bytes())
        }
        SignatureMethod::HmacSha256 => {
            let mut mac = HmacSha256::new_from_slice(key.as_bytes())
                .expect("HMAC can accept any key length");
            mac.update(base_string.as_bytes());
            BASE64.encode(mac.finalize().into_bytes())
        }
        SignatureMethod::Plaintext => key,
    }
}

/// Verify a provided signature against the one computed with `consumer_secret`.
///
/// # Errors
///
/// Returns [`AuthError::Unauthorized`] if the signatures differ.
pub fn verify_signature(
    method: SignatureMethod,
    base_string: &str,
    provided_signature: &str,
    consumer_secret: &str,
) -> Result<(), AuthError> {
    let expected = compute_signature(method, base_string, consumer_secret, "");

    if provided_signature
        .as_bytes()
        .ct_eq(expected.as_bytes())
        .into()
    {
        debug!(signature_method = %method, "OAuth signature verification succeeded");
        Ok(())
    } else {
        debug!(signature_method = %method, "OAuth signature mismatch");
        Err(AuthError::Unauthorized)
    }
}

fn decode(value: &str) -> String {
    percent_decode_str(value).decode_utf8_lossy().into_owned()
}
