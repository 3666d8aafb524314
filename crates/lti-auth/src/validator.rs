//! Request validation with strict and lenient entry points.
//!
//! A [`RequestValidator`] is bound at construction to a shared secret and to
//! the credential scheme of the request it validates, so dispatch is fixed per
//! instance. The core operation returns `Result<bool, AuthError>`; the lenient
//! entry point folds the recoverable failure kinds (see
//! [`AuthError::is_recoverable`]) into `Ok(false)` while the strict entry point
//! reports every failure.
//!
//! The main entry points are [`RequestAuthenticator::is_valid`],
//! [`RequestAuthenticator::is_valid_strict`], and [`authenticate_request`] for
//! the whole resolve, look up, validate flow.

use lti_core::{AuthConfig, CredentialHint, SignatureMethod};
use tracing::{debug, warn};

use crate::canonical::{SIGNATURE_PARAM, build_signature_base_string, normalize_parameters};
use crate::credentials::CredentialProvider;
use crate::error::AuthError;
use crate::hint::{Credential, Scheme, detect_credential};
use crate::oauth1::{
    CONSUMER_KEY_PARAM, NONCE_PARAM, SIGNATURE_METHOD_PARAM, TIMESTAMP_PARAM, verify_signature,
};
use crate::request::IncomingRequest;
use crate::secret::SharedSecret;
use crate::token::verify_token;

/// How verification failures are reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValidationMode {
    /// Signature mismatches are reported as `Ok(false)`.
    #[default]
    Lenient,
    /// Every failure is reported as an error.
    Strict,
}

/// The OAuth signature inputs parsed during the last legacy validation.
///
/// Exposed so callers can run their own nonce and timestamp replay checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureContext {
    /// The `oauth_consumer_key` that signed the request.
    pub consumer_key: String,
    /// The signature method used.
    pub signature_method: SignatureMethod,
    /// The `oauth_nonce`, if sent.
    pub nonce: Option<String>,
    /// The `oauth_timestamp`, if sent.
    pub timestamp: Option<String>,
}

/// Signature validation capability, composable into any type that can
/// authenticate a request.
///
/// Implementors provide [`authenticate`](Self::authenticate), which returns
/// `Ok(true)` or an error; the lenient and strict entry points are derived
/// from it.
pub trait RequestAuthenticator {
    /// Validate the request, reporting every failure as an error.
    ///
    /// # Errors
    ///
    /// Returns the [`AuthError`] describing why the request is not valid.
    fn authenticate(&mut self, request: &IncomingRequest) -> Result<bool, AuthError>;

    /// The signature inputs parsed by the last legacy validation, if any.
    fn signature_context(&self) -> Option<&SignatureContext>;

    /// Validate the request in the given mode.
    ///
    /// # Errors
    ///
    /// In [`ValidationMode::Strict`] every failure is returned. In
    /// [`ValidationMode::Lenient`] only non-recoverable failures are returned.
    fn validate_with(
        &mut self,
        request: &IncomingRequest,
        mode: ValidationMode,
    ) -> Result<bool, AuthError> {
        match (self.authenticate(request), mode) {
            (Err(e), ValidationMode::Lenient) if e.is_recoverable() => {
                debug!(error = %e, "Request signature is not valid");
                Ok(false)
            }
            (result, _) => result,
        }
    }

    /// Whether the request is validly signed.
    ///
    /// # Errors
    ///
    /// Returns an error only for requests that cannot be interpreted: no
    /// credential, an OAuth header that cannot be parsed, a token algorithm
    /// that is not enabled, or a token whose time claims reject it.
    fn is_valid(&mut self, request: &IncomingRequest) -> Result<bool, AuthError> {
        self.validate_with(request, ValidationMode::Lenient)
    }

    /// Validate the request, returning `Ok(true)` or the reason it is invalid.
    ///
    /// # Errors
    ///
    /// Returns every [`AuthError`], including signature mismatches.
    fn is_valid_strict(&mut self, request: &IncomingRequest) -> Result<bool, AuthError> {
        self.validate_with(request, ValidationMode::Strict)
    }

    /// The `oauth_nonce` of the last legacy validation.
    fn request_oauth_nonce(&self) -> Option<&str> {
        self.signature_context()
            .and_then(|context| context.nonce.as_deref())
    }

    /// The `oauth_timestamp` of the last legacy validation.
    fn request_oauth_timestamp(&self) -> Option<&str> {
        self.signature_context()
            .and_then(|context| context.timestamp.as_deref())
    }
}

/// Validates one request's signature against a borrowed shared secret.
///
/// The secret is borrowed, so the validator cannot outlive the lookup that
/// produced it. A validator is meant to be owned by a single request handler;
/// calls take `&mut self` because the signature context is rewritten.
///
/// # Examples
///
/// ```
/// use http::Method;
/// use lti_auth::{IncomingRequest, RequestAuthenticator, RequestValidator, SharedSecret};
/// use lti_core::Params;
///
/// let secret = SharedSecret::new("s3cr3t");
/// let request = IncomingRequest::from_params(Method::POST, "https://tool.test/launch", Params::new()).unwrap();
/// let mut validator = RequestValidator::for_request(&secret, &request);
///
/// // No credential at all: reported even in lenient mode.
/// assert!(validator.is_valid(&request).is_err());
/// ```
#[derive(Debug)]
pub struct RequestValidator<'a> {
    secret: &'a SharedSecret,
    scheme: Option<Scheme>,
    config: AuthConfig,
    context: Option<SignatureContext>,
}

impl<'a> RequestValidator<'a> {
    /// Bind a validator to a secret and a scheme.
    ///
    /// A `None` scheme yields a validator whose every call fails with
    /// [`AuthError::Malformed`].
    #[must_use]
    pub fn new(secret: &'a SharedSecret, scheme: Option<Scheme>) -> Self {
        Self {
            secret,
            scheme,
            config: AuthConfig::default(),
            context: None,
        }
    }

    /// Bind a validator to the scheme detected in the request.
    ///
    /// Detection looks at the body, query and OAuth header parameters; an OAuth
    /// header that cannot be parsed is ignored here and reported on the first
    /// validation instead.
    #[must_use]
    pub fn for_request(secret: &'a SharedSecret, request: &IncomingRequest) -> Self {
        Self::new(secret, Scheme::from_request(request))
    }

    /// Bind a validator to a credential found by [`detect_credential`].
    #[must_use]
    pub fn from_credential(secret: &'a SharedSecret, credential: &Credential) -> Self {
        Self::new(secret, Some(credential.scheme()))
    }

    /// Replace the default verification settings.
    #[must_use]
    pub fn with_config(mut self, config: AuthConfig) -> Self {
        self.config = config;
        self
    }

    /// The scheme this validator is bound to.
    #[must_use]
    pub fn scheme(&self) -> Option<&Scheme> {
        self.scheme.as_ref()
    }

    /// Take the signature context, leaving `None` behind.
    pub fn take_signature_context(&mut self) -> Option<SignatureContext> {
        self.context.take()
    }

    fn validate_legacy(&mut self, request: &IncomingRequest) -> Result<bool, AuthError> {
        let params = request.signature_params()?;

        let consumer_key = params
            .get_str(CONSUMER_KEY_PARAM)
            .filter(|key| !key.is_empty())
            .ok_or_else(|| AuthError::Malformed(format!("missing {CONSUMER_KEY_PARAM}")))?;

        let method_name = params.get_str(SIGNATURE_METHOD_PARAM).unwrap_or_default();
        let signature_method = method_name
            .parse::<SignatureMethod>()
            .ok()
            .filter(|method| self.config.accepts_signature_method(*method))
            .ok_or_else(|| {
                warn!(consumer_key = %consumer_key, signature_method = %method_name, "Unsupported OAuth signature method");
                AuthError::UnsupportedScheme(format!("signature method {method_name:?}"))
            })?;

        let base_uri = request.base_uri()?;
        let base_string = build_signature_base_string(
            request.method().as_str(),
            &base_uri,
            &normalize_parameters(params.pairs()),
        );

        debug!(consumer_key = %consumer_key, base_uri = %base_uri, "Verifying OAuth signature");

        self.context = Some(SignatureContext {
            consumer_key: consumer_key.to_owned(),
            signature_method,
            nonce: params.get_str(NONCE_PARAM).map(ToOwned::to_owned),
            timestamp: params.get_str(TIMESTAMP_PARAM).map(ToOwned::to_owned),
        });

        let provided = params.get_str(SIGNATURE_PARAM).unwrap_or_default();
        verify_signature(signature_method, &base_string, provided, self.secret.expose())?;
        Ok(true)
    }

    fn validate_token(&self, token: &str) -> Result<bool, AuthError> {
        verify_token(token, self.secret.expose(), &self.config)?;
        Ok(true)
    }
}

impl RequestAuthenticator for RequestValidator<'_> {
    fn authenticate(&mut self, request: &IncomingRequest) -> Result<bool, AuthError> {
        self.context = None;

        match self.scheme.clone() {
            Some(Scheme::Legacy) => self.validate_legacy(request),
            Some(Scheme::Token(token)) => self.validate_token(&token),
            None => Err(AuthError::Malformed(
                "request carries neither an OAuth signature nor a token".to_owned(),
            )),
        }
    }

    fn signature_context(&self) -> Option<&SignatureContext> {
        self.context.as_ref()
    }
}

/// The result of [`authenticate_request`].
#[derive(Debug, Clone)]
pub struct AuthResult {
    /// Whether the signature was valid. Always `true` in strict mode.
    pub valid: bool,
    /// The hint the shared secret was looked up with.
    pub hint: CredentialHint,
    /// The parsed OAuth signature inputs, for legacy launches.
    pub signature_context: Option<SignatureContext>,
}

/// Resolve the credential hint, look up the secret, and validate the request.
///
/// A hint with no registered secret is treated as an invalid credential:
/// `valid: false` in lenient mode, the scheme's recoverable error in strict mode.
///
/// # Errors
///
/// Returns [`AuthError::Malformed`] if no hint can be resolved, and otherwise
/// whatever the validator returns for `mode`.
pub fn authenticate_request(
    request: &IncomingRequest,
    provider: &dyn CredentialProvider,
    config: &AuthConfig,
    mode: ValidationMode,
) -> Result<AuthResult, AuthError> {
    let params = request.signature_params()?;
    let credential = detect_credential(&params)?.ok_or_else(|| {
        AuthError::Malformed("request carries neither an OAuth signature nor a token".to_owned())
    })?;
    let hint = credential
        .hint()
        .ok_or_else(|| AuthError::Malformed("token header has no kid".to_owned()))?;

    let secret = match provider.get_secret(hint.as_str()) {
        Ok(secret) => secret,
        Err(AuthError::CredentialNotFound(_)) => {
            warn!(hint = %hint, scheme = credential.scheme().name(), "No shared secret for credential");
            let err = match credential {
                Credential::Legacy { .. } => AuthError::Unauthorized,
                Credential::Token { .. } => {
                    AuthError::TokenVerificationFailed(format!("unknown key id {hint}"))
                }
            };
            return match mode {
                ValidationMode::Lenient => Ok(AuthResult {
                    valid: false,
                    hint,
                    signature_context: None,
                }),
                ValidationMode::Strict => Err(err),
            };
        }
        Err(e) => return Err(e),
    };

    let mut validator =
        RequestValidator::from_credential(&secret, &credential).with_config(config.clone());
    let valid = validator.validate_with(request, mode)?;

    Ok(AuthResult {
        valid,
        hint,
        signature_context: validator.take_signature_context(),
    })
}
