//! Error types for the LTI core.

/// Core error type for LTI configuration and infrastructure.
#[derive(Debug, thiserror::Error)]
pub enum LtiError {
    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// Request parameters could not be decoded.
    #[error("invalid request parameters: {0}")]
    InvalidParams(String),
}

/// Convenience result type for LTI core operations.
pub type LtiResult<T> = Result<T, LtiError>;
