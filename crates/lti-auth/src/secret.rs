//! Shared secret wrapper.

use std::fmt;

use secrecy::{ExposeSecret, SecretString};

/// The consumer secret shared between a tool consumer and this provider.
///
/// The value is held in a [`SecretString`] so it is zeroized on drop, and the
/// `Debug` output is redacted so it cannot leak through tracing fields.
#[derive(Clone)]
pub struct SharedSecret(SecretString);

impl SharedSecret {
    /// Wrap a secret value.
    #[must_use]
    pub fn new(secret: impl Into<String>) -> Self {
        Self(SecretString::new(secret.into()))
    }

    /// Whether the secret is the empty string.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.expose_secret().is_empty()
    }

    pub(crate) fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

impl fmt::Debug for SharedSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SharedSecret([REDACTED])")
    }
}

impl From<&str> for SharedSecret {
    fn from(secret: &str) -> Self {
        Self::new(secret)
    }
}

impl From<String> for SharedSecret {
    fn from(secret: String) -> Self {
        Self::new(secret)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_redact_debug_output() {
        let secret = SharedSecret::new("s3cr3t");
        let rendered = format!("{secret:?}");
        assert!(!rendered.contains("s3cr3t"));
        assert_eq!(secret.expose(), "s3cr3t");
    }

    #[test]
    fn test_should_detect_empty_secret() {
        assert!(SharedSecret::from("").is_empty());
        assert!(!SharedSecret::from(String::from("x")).is_empty());
    }
}
