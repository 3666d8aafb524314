//! Error types for LTI request authentication.
//!
//! All authentication failures are represented by [`AuthError`]. Three kinds
//! are recoverable: a legacy signature mismatch, a legacy signature method that
//! is not accepted, and a token that fails verification. Every other kind is
//! reported even by the lenient entry points.

use http::StatusCode;

/// Errors that can occur while resolving or verifying an LTI credential.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// The OAuth signature did not match the one computed with the shared secret.
    #[error("OAuth signature does not match")]
    Unauthorized,

    /// The request claims an OAuth signature method that is not accepted.
    #[error("unsupported signature scheme: {0}")]
    UnsupportedScheme(String),

    /// The token header names an algorithm that is not enabled.
    #[error("unsupported token algorithm: {0}")]
    UnsupportedAlgorithm(String),

    /// The signed token failed signature or structural verification.
    #[error("token verification failed: {0}")]
    TokenVerificationFailed(String),

    /// The token signature is valid but its time or identity claims reject it.
    #[error("token rejected: {0}")]
    TokenRejected(String),

    /// The request carries no recognizable credential, or one that cannot be parsed.
    #[error("malformed request: {0}")]
    Malformed(String),

    /// No shared secret is registered for the credential hint.
    #[error("credential not found: {0}")]
    CredentialNotFound(String),

    /// An outbound signer was built without a consumer key or secret.
    #[error("invalid signer configuration: {0}")]
    InvalidConfig(String),
}

impl AuthError {
    /// Whether the lenient entry points report this error as `false`.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::Unauthorized | Self::UnsupportedScheme(_) | Self::TokenVerificationFailed(_)
        )
    }

    /// The HTTP status a transport adapter should answer with.
    ///
    /// Every inbound failure is a client error; only a misconfigured outbound
    /// signer maps to a server error.
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Unauthorized
            | Self::TokenVerificationFailed(_)
            | Self::TokenRejected(_)
            | Self::CredentialNotFound(_) => StatusCode::UNAUTHORIZED,
            Self::UnsupportedScheme(_) | Self::UnsupportedAlgorithm(_) | Self::Malformed(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::InvalidConfig(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
