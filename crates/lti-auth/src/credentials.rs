//! Credential provider trait and implementations.
//!
//! This module defines the [`CredentialProvider`] trait for resolving shared
//! secrets from credential hints (consumer keys or token key ids), along with a
//! [`StaticCredentialProvider`] for testing and development use cases.

use std::collections::HashMap;

use crate::error::AuthError;
use crate::secret::SharedSecret;

/// Trait for looking up shared secrets by credential hint.
///
/// Implementations may back this with a database, configuration file,
/// or any other secret store.
pub trait CredentialProvider: Send + Sync {
    /// Retrieve the shared secret registered for `hint`.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::CredentialNotFound`] if the hint is not recognized.
    fn get_secret(&self, hint: &str) -> Result<SharedSecret, AuthError>;
}

/// A simple in-memory credential provider backed by a `HashMap`.
///
/// # Examples
///
/// ```
/// use lti_auth::credentials::{CredentialProvider, StaticCredentialProvider};
///
/// let provider = StaticCredentialProvider::new(vec![
///     ("abc".to_owned(), "s3cr3t".to_owned()),
/// ]);
///
/// assert!(provider.get_secret("abc").is_ok());
/// assert!(provider.get_secret("missing").is_err());
/// ```
#[derive(Debug, Clone)]
pub struct StaticCredentialProvider {
    secrets: HashMap<String, SharedSecret>,
}

impl StaticCredentialProvider {
    /// Create a new `StaticCredentialProvider` from an iterable of (hint, secret) pairs.
    pub fn new(credentials: impl IntoIterator<Item = (String, String)>) -> Self {
        Self {
            secrets: credentials
                .into_iter()
                .map(|(hint, secret)| (hint, SharedSecret::new(secret)))
                .collect(),
        }
    }
}

impl CredentialProvider for StaticCredentialProvider {
    fn get_secret(&self, hint: &str) -> Result<SharedSecret, AuthError> {
        self.secrets
            .get(hint)
            .cloned()
            .ok_or_else(|| AuthError::CredentialNotFound(hint.to_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_return_secret_for_known_hint() {
        let provider =
            StaticCredentialProvider::new(vec![("abc".to_owned(), "s3cr3t".to_owned())]);

        let secret = provider.get_secret("abc").unwrap();
        assert_eq!(secret.expose(), "s3cr3t");
    }

    #[test]
    fn test_should_return_error_for_unknown_hint() {
        let provider = StaticCredentialProvider::new(vec![]);

        let result = provider.get_secret("UNKNOWN");
        assert!(matches!(result, Err(AuthError::CredentialNotFound(_))));
    }

    #[test]
    fn test_should_not_leak_secrets_in_debug_output() {
        let provider =
            StaticCredentialProvider::new(vec![("abc".to_owned(), "s3cr3t".to_owned())]);
        assert!(!format!("{provider:?}").contains("s3cr3t"));
    }
}
