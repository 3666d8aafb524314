//! A tool provider that authenticates its own launches.

use lti_core::{AuthConfig, Params};

use crate::error::AuthError;
use crate::hint::{Scheme, TOKEN_PARAM};
use crate::request::IncomingRequest;
use crate::secret::SharedSecret;
use crate::validator::{RequestAuthenticator, RequestValidator, SignatureContext};

/// The provider side of an LTI launch: the consumer credentials it was
/// configured with and the launch parameters it received.
///
/// Validation is composed in through [`RequestAuthenticator`]. The scheme is
/// chosen from the request being validated (body, query and OAuth header),
/// falling back to the stored launch parameters.
///
/// The configured consumer key is informational only: it is not compared with
/// the request's `oauth_consumer_key`. Only the consumer secret takes part in
/// verification, so callers that serve several consumers must pick the secret
/// by key themselves (see [`crate::resolve_hint`]).
#[derive(Debug, Clone)]
pub struct ToolProvider {
    consumer_key: String,
    consumer_secret: SharedSecret,
    params: Params,
    config: AuthConfig,
    context: Option<SignatureContext>,
}

impl ToolProvider {
    /// Create a provider for a received launch.
    #[must_use]
    pub fn new(
        consumer_key: impl Into<String>,
        consumer_secret: SharedSecret,
        params: Params,
    ) -> Self {
        Self {
            consumer_key: consumer_key.into(),
            consumer_secret,
            params,
            config: AuthConfig::default(),
            context: None,
        }
    }

    /// Replace the default verification settings.
    #[must_use]
    pub fn with_config(mut self, config: AuthConfig) -> Self {
        self.config = config;
        self
    }

    /// The consumer key this provider was configured with.
    #[must_use]
    pub fn consumer_key(&self) -> &str {
        &self.consumer_key
    }

    /// The launch parameters.
    #[must_use]
    pub fn params(&self) -> &Params {
        &self.params
    }

    /// A single launch parameter.
    #[must_use]
    pub fn launch_param(&self, key: &str) -> Option<&str> {
        self.params.get_str(key)
    }

    /// The signed token, for token launches.
    #[must_use]
    pub fn jwt(&self) -> Option<&str> {
        self.params.get_str(TOKEN_PARAM)
    }
}

impl RequestAuthenticator for ToolProvider {
    fn authenticate(&mut self, request: &IncomingRequest) -> Result<bool, AuthError> {
        let scheme = Scheme::from_request(request).or_else(|| Scheme::detect(&self.params));
        let mut validator =
            RequestValidator::new(&self.consumer_secret, scheme).with_config(self.config.clone());
        let result = validator.authenticate(request);
        self.context = validator.take_signature_context();
        result
    }

    fn signature_context(&self) -> Option<&SignatureContext> {
        self.context.as_ref()
    }
}
