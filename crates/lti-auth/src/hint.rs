//! Credential scheme detection and key hint resolution.
//!
//! Before a request can be verified the caller must know which shared secret to
//! verify it with. This module peeks at the untrusted parameters to find out:
//! the OAuth consumer key for legacy launches, or the `kid` of the token header
//! for token launches. Nothing here authorizes anything.

use lti_core::{CredentialHint, Params};
use tracing::debug;

use crate::error::AuthError;
use crate::oauth1::CONSUMER_KEY_PARAM;
use crate::request::IncomingRequest;
use crate::token::peek_key_id;

/// Parameter carrying a compact signed token.
pub const TOKEN_PARAM: &str = "jwt";

/// The verification scheme a validator is bound to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scheme {
    /// OAuth 1.0a request signing over the whole request.
    Legacy,
    /// A compact signed token, carried verbatim.
    Token(String),
}

impl Scheme {
    /// Pick the scheme from the parameters without parsing anything.
    ///
    /// A non-empty `oauth_consumer_key` selects the legacy scheme; otherwise a
    /// `jwt` parameter selects the token scheme. Returns `None` when neither is
    /// present.
    #[must_use]
    pub fn detect(params: &Params) -> Option<Self> {
        if consumer_key(params).is_some() {
            Some(Self::Legacy)
        } else {
            params
                .get_str(TOKEN_PARAM)
                .map(|token| Self::Token(token.to_owned()))
        }
    }

    /// Pick the scheme from every parameter that takes part in the signature:
    /// body, query string and OAuth header.
    ///
    /// An OAuth header that cannot be parsed still selects the legacy scheme,
    /// so the first validation reports it as malformed.
    #[must_use]
    pub fn from_request(request: &IncomingRequest) -> Option<Self> {
        match request.signature_params() {
            Ok(params) => Self::detect(&params),
            Err(_) => Self::detect(request.params()).or(Some(Self::Legacy)),
        }
    }

    /// Short name for logging.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Legacy => "oauth1",
            Self::Token(_) => "jwt",
        }
    }
}

/// A credential found in the request, with its unverified routing hint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Credential {
    /// An OAuth 1.0a signed request.
    Legacy {
        /// The `oauth_consumer_key` parameter.
        consumer_key: String,
    },
    /// A compact signed token.
    Token {
        /// The raw token.
        token: String,
        /// The `kid` of the unverified token header, if it has one.
        key_id: Option<String>,
    },
}

impl Credential {
    /// The identifier to look the shared secret up with.
    #[must_use]
    pub fn hint(&self) -> Option<CredentialHint> {
        match self {
            Self::Legacy { consumer_key } => Some(CredentialHint::new(consumer_key.clone())),
            Self::Token { key_id, .. } => key_id.clone().map(CredentialHint::new),
        }
    }

    /// The scheme a validator for this credential is bound to.
    #[must_use]
    pub fn scheme(&self) -> Scheme {
        match self {
            Self::Legacy { .. } => Scheme::Legacy,
            Self::Token { token, .. } => Scheme::Token(token.clone()),
        }
    }
}

/// Find the credential carried by the request parameters.
///
/// The first match wins:
/// 1. a non-empty `oauth_consumer_key`
/// 2. a `jwt` parameter, whose header is decoded without verification
///
/// # Errors
///
/// Returns [`AuthError::Malformed`] if the token header cannot be decoded.
pub fn detect_credential(params: &Params) -> Result<Option<Credential>, AuthError> {
    if let Some(consumer_key) = consumer_key(params) {
        debug!(consumer_key = %consumer_key, "Found OAuth consumer key");
        return Ok(Some(Credential::Legacy {
            consumer_key: consumer_key.to_owned(),
        }));
    }

    let Some(token) = params.get_str(TOKEN_PARAM) else {
        debug!("No credential parameter found");
        return Ok(None);
    };

    let key_id = peek_key_id(token)?;
    debug!(key_id = ?key_id, "Found signed token");

    Ok(Some(Credential::Token {
        token: token.to_owned(),
        key_id,
    }))
}

/// Extract the identifier needed to look up the shared secret.
///
/// Returns `Ok(None)` when the request carries no credential, or carries a
/// token whose header has no `kid`.
///
/// # Errors
///
/// Returns [`AuthError::Malformed`] if a token is present but its header
/// cannot be decoded.
///
/// # Examples
///
/// ```
/// use lti_auth::resolve_hint;
/// use lti_core::Params;
///
/// let params = Params::from_urlencoded(b"oauth_consumer_key=abc&jwt=ignored");
/// assert_eq!(resolve_hint(&params).unwrap().unwrap().as_str(), "abc");
/// assert!(resolve_hint(&Params::new()).unwrap().is_none());
/// ```
pub fn resolve_hint(params: &Params) -> Result<Option<CredentialHint>, AuthError> {
    Ok(detect_credential(params)?.and_then(|credential| credential.hint()))
}

fn consumer_key(params: &Params) -> Option<&str> {
    params
        .get_str(CONSUMER_KEY_PARAM)
        .filter(|key| !key.is_empty())
}
