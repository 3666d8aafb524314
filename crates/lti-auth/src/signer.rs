//! Outbound OAuth 1.0a request signing.
//!
//! Tool providers call back into the consumer (outcome reporting, for example)
//! with requests signed by the same consumer key and secret the launch was
//! verified with. [`OAuthSigner`] produces the `oauth_*` parameters for such a
//! request; a non-form body such as an XML outcome envelope is covered by an
//! `oauth_body_hash` parameter.

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use http::Method;
use lti_core::{Params, SignatureMethod, generate_identifier};
use sha1::{Digest, Sha1};
use tracing::debug;

use crate::canonical::{
    SIGNATURE_PARAM, build_signature_base_string, normalize_parameters, percent_encode,
};
use crate::error::AuthError;
use crate::oauth1::{
    BODY_HASH_PARAM, CONSUMER_KEY_PARAM, NONCE_PARAM, SIGNATURE_METHOD_PARAM, TIMESTAMP_PARAM,
    VERSION_PARAM, compute_signature,
};
use crate::request::IncomingRequest;
use crate::secret::SharedSecret;

const OAUTH_VERSION: &str = "1.0";

/// Signs outbound requests with a consumer key and shared secret.
///
/// # Examples
///
/// ```
/// use http::Method;
/// use lti_auth::{OAuthSigner, SharedSecret};
/// use lti_core::Params;
///
/// let signer = OAuthSigner::new("abc", SharedSecret::new("s3cr3t")).unwrap();
/// let signed = signer
///     .sign(&Method::POST, "https://lms.test/outcomes", &Params::new())
///     .unwrap();
/// assert!(signed.authorization_header().starts_with("OAuth "));
/// ```
#[derive(Debug, Clone)]
pub struct OAuthSigner {
    consumer_key: String,
    secret: SharedSecret,
    signature_method: SignatureMethod,
}

impl OAuthSigner {
    /// Create a signer using `HMAC-SHA1`.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidConfig`] if the key or the secret is empty.
    pub fn new(consumer_key: impl Into<String>, secret: SharedSecret) -> Result<Self, AuthError> {
        let consumer_key = consumer_key.into();
        if consumer_key.is_empty() {
            return Err(AuthError::InvalidConfig("consumer key is empty".to_owned()));
        }
        if secret.is_empty() {
            return Err(AuthError::InvalidConfig("consumer secret is empty".to_owned()));
        }

        Ok(Self {
            consumer_key,
            secret,
            signature_method: SignatureMethod::HmacSha1,
        })
    }

    /// Use another signature method.
    #[must_use]
    pub fn with_signature_method(mut self, signature_method: SignatureMethod) -> Self {
        self.signature_method = signature_method;
        self
    }

    /// The consumer key requests are signed with.
    #[must_use]
    pub fn consumer_key(&self) -> &str {
        &self.consumer_key
    }

    /// Sign a form request with a fresh nonce and the current timestamp.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Malformed`] if `url` is not an absolute URL.
    pub fn sign(
        &self,
        method: &Method,
        url: &str,
        params: &Params,
    ) -> Result<SignedRequest, AuthError> {
        let nonce = generate_identifier().replace('-', "");
        let timestamp = chrono::Utc::now().timestamp().to_string();
        self.sign_with(method, url, params, &nonce, &timestamp)
    }

    /// Sign a form request with an explicit nonce and timestamp.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Malformed`] if `url` is not an absolute URL.
    pub fn sign_with(
        &self,
        method: &Method,
        url: &str,
        params: &Params,
        nonce: &str,
        timestamp: &str,
    ) -> Result<SignedRequest, AuthError> {
        let oauth_params = self.oauth_params(nonce, timestamp, None);
        self.finish(method, url, params.clone(), oauth_params)
    }

    /// Sign a request whose body is not form-encoded, such as an XML outcome
    /// envelope, by adding an `oauth_body_hash` parameter.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Malformed`] if `url` is not an absolute URL.
    pub fn sign_body(
        &self,
        method: &Method,
        url: &str,
        body: &[u8],
    ) -> Result<SignedRequest, AuthError> {
        let nonce = generate_identifier().replace('-', "");
        let timestamp = chrono::Utc::now().timestamp().to_string();
        let body_hash = BASE64.encode(Sha1::digest(body));
        let oauth_params = self.oauth_params(&nonce, &timestamp, Some(body_hash));
        self.finish(method, url, Params::new(), oauth_params)
    }

    fn oauth_params(
        &self,
        nonce: &str,
        timestamp: &str,
        body_hash: Option<String>,
    ) -> Vec<(String, String)> {
        let mut oauth_params = vec![
            (CONSUMER_KEY_PARAM.to_owned(), self.consumer_key.clone()),
            (NONCE_PARAM.to_owned(), nonce.to_owned()),
            (
                SIGNATURE_METHOD_PARAM.to_owned(),
                self.signature_method.as_str().to_owned(),
            ),
            (TIMESTAMP_PARAM.to_owned(), timestamp.to_owned()),
            (VERSION_PARAM.to_owned(), OAUTH_VERSION.to_owned()),
        ];
        if let Some(body_hash) = body_hash {
            oauth_params.push((BODY_HASH_PARAM.to_owned(), body_hash));
        }
        oauth_params
    }

    fn finish(
        &self,
        method: &Method,
        url: &str,
        body_params: Params,
        mut oauth_params: Vec<(String, String)>,
    ) -> Result<SignedRequest, AuthError> {
        let target = IncomingRequest::from_params(method.clone(), url, Params::new())?;
        let base_uri = target.base_uri()?;
        let query = target.query_params();

        let normalized = normalize_parameters(
            body_params
                .pairs()
                .chain(query.pairs())
                .chain(oauth_params.iter().map(|(k, v)| (k.as_str(), v.as_str()))),
        );
        let base_string = build_signature_base_string(method.as_str(), &base_uri, &normalized);
        let signature = compute_signature(
            self.signature_method,
            &base_string,
            self.secret.expose(),
            "",
        );

        debug!(consumer_key = %self.consumer_key, base_uri = %base_uri, "Signed outbound request");

        oauth_params.push((SIGNATURE_PARAM.to_owned(), signature));
        Ok(SignedRequest {
            body_params,
            oauth_params,
        })
    }
}

/// The output of [`OAuthSigner`]: the body parameters plus the `oauth_*`
/// parameters, including `oauth_signature`.
#[derive(Debug, Clone)]
pub struct SignedRequest {
    body_params: Params,
    oauth_params: Vec<(String, String)>,
}

impl SignedRequest {
    /// The `oauth_*` parameters, in signing order with the signature last.
    #[must_use]
    pub fn oauth_params(&self) -> &[(String, String)] {
        &self.oauth_params
    }

    /// The computed `oauth_signature`.
    #[must_use]
    pub fn signature(&self) -> &str {
        self.oauth_params
            .iter()
            .find(|(k, _)| k == SIGNATURE_PARAM)
            .map_or("", |(_, v)| v.as_str())
    }

    /// The value of an `Authorization` header carrying the OAuth parameters.
    #[must_use]
    pub fn authorization_header(&self) -> String {
        let params = self
            .oauth_params
            .iter()
            .map(|(k, v)| format!("{}=\"{}\"", percent_encode(k), percent_encode(v)))
            .collect::<Vec<_>>()
            .join(", ");
        format!("OAuth {params}")
    }

    /// Body and OAuth parameters together, for sending everything in a form body.
    #[must_use]
    pub fn into_params(self) -> Params {
        let mut params = self.body_params;
        for (key, value) in self.oauth_params {
            params.append(key, value);
        }
        params
    }

    /// Body and OAuth parameters form-encoded into a request body.
    #[must_use]
    pub fn form_body(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        serializer.extend_pairs(self.body_params.pairs());
        serializer.extend_pairs(self.oauth_params.iter().map(|(k, v)| (k.as_str(), v.as_str())));
        serializer.finish()
    }
}
