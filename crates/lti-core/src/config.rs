//! Configuration for LTI request authentication.
//!
//! All configuration is driven by environment variables.

use std::fmt;
use std::str::FromStr;

use crate::error::{LtiError, LtiResult};

/// An OAuth 1.0a signature method accepted on legacy launches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum SignatureMethod {
    /// `HMAC-SHA1`, the method mandated by LTI 1.x.
    #[serde(rename = "HMAC-SHA1")]
    HmacSha1,
    /// `HMAC-SHA256`.
    #[serde(rename = "HMAC-SHA256")]
    HmacSha256,
    /// `PLAINTEXT`: the signature is the signing key itself.
    #[serde(rename = "PLAINTEXT")]
    Plaintext,
}

impl SignatureMethod {
    /// The wire name carried in `oauth_signature_method`.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::HmacSha1 => "HMAC-SHA1",
            Self::HmacSha256 => "HMAC-SHA256",
            Self::Plaintext => "PLAINTEXT",
        }
    }
}

impl fmt::Display for SignatureMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SignatureMethod {
    type Err = LtiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "HMAC-SHA1" => Ok(Self::HmacSha1),
            "HMAC-SHA256" => Ok(Self::HmacSha256),
            "PLAINTEXT" => Ok(Self::Plaintext),
            other => Err(LtiError::Config(format!(
                "unknown signature method: {other}"
            ))),
        }
    }
}

/// A shared-secret token signing algorithm accepted on token launches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum TokenAlgorithm {
    /// HMAC using SHA-256.
    HS256,
    /// HMAC using SHA-384.
    HS384,
    /// HMAC using SHA-512.
    HS512,
}

impl TokenAlgorithm {
    /// The `alg` header value.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::HS256 => "HS256",
            Self::HS384 => "HS384",
            Self::HS512 => "HS512",
        }
    }
}

impl fmt::Display for TokenAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TokenAlgorithm {
    type Err = LtiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "HS256" => Ok(Self::HS256),
            "HS384" => Ok(Self::HS384),
            "HS512" => Ok(Self::HS512),
            other => Err(LtiError::Config(format!("unknown token algorithm: {other}"))),
        }
    }
}

/// Verification settings shared by every validator.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthConfig {
    /// OAuth signature methods accepted on legacy launches.
    pub signature_methods: Vec<SignatureMethod>,
    /// Algorithms accepted on token launches.
    pub token_algorithms: Vec<TokenAlgorithm>,
    /// Clock leeway in seconds applied to `exp` and `nbf` token claims.
    pub token_leeway_secs: u64,
    /// Log level.
    pub log_level: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            signature_methods: vec![
                SignatureMethod::HmacSha1,
                SignatureMethod::HmacSha256,
                SignatureMethod::Plaintext,
            ],
            token_algorithms: vec![TokenAlgorithm::HS256],
            token_leeway_secs: 0,
            log_level: "info".to_owned(),
        }
    }
}

impl AuthConfig {
    /// Load configuration from environment variables.
    ///
    /// | Variable | Default |
    /// |----------|---------|
    /// | `LTI_SIGNATURE_METHODS` | `HMAC-SHA1,HMAC-SHA256,PLAINTEXT` |
    /// | `LTI_TOKEN_ALGORITHMS` | `HS256` |
    /// | `LTI_TOKEN_LEEWAY_SECS` | `0` |
    /// | `LOG_LEVEL` | `info` |
    ///
    /// # Errors
    ///
    /// Returns [`LtiError::Config`] if a variable holds an unknown method or
    /// algorithm name, a non-numeric leeway, or an empty list.
    pub fn from_env() -> LtiResult<Self> {
        let mut config = Self::default();

        if let Ok(v) = std::env::var("LTI_SIGNATURE_METHODS") {
            config.signature_methods = parse_list(&v)?;
        }
        if let Ok(v) = std::env::var("LTI_TOKEN_ALGORITHMS") {
            config.token_algorithms = parse_list(&v)?;
        }
        if let Ok(v) = std::env::var("LTI_TOKEN_LEEWAY_SECS") {
            config.token_leeway_secs = v.trim().parse().map_err(|_| {
                LtiError::Config(format!("LTI_TOKEN_LEEWAY_SECS is not a number: {v}"))
            })?;
        }
        if let Ok(v) = std::env::var("LOG_LEVEL") {
            config.log_level = v;
        }

        config.validate()?;
        Ok(config)
    }

    /// Check that the configuration can accept at least one launch of each scheme.
    ///
    /// # Errors
    ///
    /// Returns [`LtiError::Config`] if either accepted list is empty.
    pub fn validate(&self) -> LtiResult<()> {
        if self.signature_methods.is_empty() {
            return Err(LtiError::Config(
                "at least one signature method must be enabled".to_owned(),
            ));
        }
        if self.token_algorithms.is_empty() {
            return Err(LtiError::Config(
                "at least one token algorithm must be enabled".to_owned(),
            ));
        }
        Ok(())
    }

    /// Whether `method` is accepted.
    #[must_use]
    pub fn accepts_signature_method(&self, method: SignatureMethod) -> bool {
        self.signature_methods.contains(&method)
    }
}

fn parse_list<T: FromStr<Err = LtiError>>(value: &str) -> LtiResult<Vec<T>> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::parse)
        .collect()
}
