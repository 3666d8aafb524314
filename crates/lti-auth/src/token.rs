//! Compact signed-token (JWT) handling.
//!
//! Two operations live here: an unverified peek at the token header used only
//! to route the secret lookup, and full verification against the shared secret.
//! Cryptographic verification is delegated to `jsonwebtoken`.

use std::collections::HashSet;

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, TokenData, Validation, decode, decode_header};
use lti_core::{AuthConfig, TokenAlgorithm};
use tracing::debug;

use crate::error::AuthError;

/// Read the `kid` field of a token header without verifying the token.
///
/// The result is untrusted and must only be used to choose which secret to
/// verify with.
///
/// # Errors
///
/// Returns [`AuthError::Malformed`] if the header segment cannot be decoded.
pub fn peek_key_id(token: &str) -> Result<Option<String>, AuthError> {
    let header = decode_header(token)
        .map_err(|e| AuthError::Malformed(format!("uninterpretable token header: {e}")))?;
    Ok(header.kid)
}

/// Verify a token's signature and time claims with the shared secret.
///
/// Only the HMAC algorithms enabled in `config` are accepted. No claim is
/// required; `exp` and `nbf` are checked when present, using
/// `config.token_leeway_secs`. The audience is not checked.
///
/// # Errors
///
/// - [`AuthError::TokenVerificationFailed`] for a bad signature or a token that
///   is not structurally a compact JWT
/// - [`AuthError::UnsupportedAlgorithm`] for an algorithm that is not enabled
/// - [`AuthError::TokenRejected`] for an expired or not-yet-valid token
pub fn verify_token(
    token: &str,
    secret: &str,
    config: &AuthConfig,
) -> Result<TokenData<serde_json::Value>, AuthError> {
    let validation = build_validation(config);
    let key = DecodingKey::from_secret(secret.as_bytes());

    match decode::<serde_json::Value>(token, &key, &validation) {
        Ok(data) => {
            debug!(alg = ?data.header.alg, key_id = ?data.header.kid, "Token verification succeeded");
            Ok(data)
        }
        Err(e) => {
            debug!(error = %e, "Token verification failed");
            Err(map_token_error(token, e.into_kind()))
        }
    }
}

fn build_validation(config: &AuthConfig) -> Validation {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.algorithms = config
        .token_algorithms
        .iter()
        .map(|alg| to_jwt_algorithm(*alg))
        .collect();
    validation.required_spec_claims = HashSet::new();
    validation.leeway = config.token_leeway_secs;
    validation.validate_aud = false;
    validation
}

fn to_jwt_algorithm(alg: TokenAlgorithm) -> Algorithm {
    match alg {
        TokenAlgorithm::HS256 => Algorithm::HS256,
        TokenAlgorithm::HS384 => Algorithm::HS384,
        TokenAlgorithm::HS512 => Algorithm::HS512,
    }
}

fn map_token_error(token: &str, kind: ErrorKind) -> AuthError {
    match kind {
        ErrorKind::InvalidSignature => {
            AuthError::TokenVerificationFailed("signature does not match".to_owned())
        }
        ErrorKind::InvalidToken => {
            AuthError::TokenVerificationFailed("not a compact three-segment token".to_owned())
        }
        ErrorKind::Base64(e) => AuthError::TokenVerificationFailed(format!("invalid base64: {e}")),
        ErrorKind::Json(e) => AuthError::TokenVerificationFailed(format!("invalid JSON: {e}")),
        ErrorKind::Utf8(e) => AuthError::TokenVerificationFailed(format!("invalid UTF-8: {e}")),
        ErrorKind::InvalidAlgorithm | ErrorKind::InvalidAlgorithmName | ErrorKind::MissingAlgorithm => {
            let claimed = decode_header(token)
                .map(|h| format!("{:?}", h.alg))
                .unwrap_or_else(|_| "unknown".to_owned());
            AuthError::UnsupportedAlgorithm(claimed)
        }
        ErrorKind::ExpiredSignature => AuthError::TokenRejected("token has expired".to_owned()),
        ErrorKind::ImmatureSignature => {
            AuthError::TokenRejected("token is not valid yet".to_owned())
        }
        other => AuthError::Malformed(format!("token could not be verified: {other:?}")),
    }
}
