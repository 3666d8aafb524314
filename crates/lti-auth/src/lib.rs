//! OAuth 1.0a and signed-token request authentication for LTI launches.
//!
//! An LTI tool consumer (a learning platform) launches a tool provider with a
//! request that is either OAuth 1.0a signed (LTI 1.x) or carries a compact
//! signed token in a `jwt` parameter. This crate implements the provider side:
//! find which secret the request claims to be signed with, then verify it.
//!
//! # Overview
//!
//! 1. [`resolve_hint`] peeks at the untrusted parameters and returns the OAuth
//!    consumer key, or the `kid` of the token header.
//! 2. The caller looks the shared secret up (see [`CredentialProvider`]).
//! 3. A [`RequestValidator`] bound to the secret and the request's scheme
//!    verifies the signature, leniently ([`RequestAuthenticator::is_valid`]) or
//!    strictly ([`RequestAuthenticator::is_valid_strict`]).
//!
//! [`authenticate_request`] runs all three steps.
//!
//! # Usage
//!
//! ```rust
//! use http::Method;
//! use lti_auth::{IncomingRequest, OAuthSigner, RequestAuthenticator, RequestValidator, SharedSecret};
//! use lti_core::Params;
//!
//! let url = "https://tool.example.com/launch";
//! let signed = OAuthSigner::new("abc", SharedSecret::new("s3cr3t"))
//!     .unwrap()
//!     .sign(&Method::POST, url, &Params::new())
//!     .unwrap();
//! let request = IncomingRequest::from_params(Method::POST, url, signed.into_params()).unwrap();
//!
//! let hint = lti_auth::resolve_hint(request.params()).unwrap().unwrap();
//! assert_eq!(hint.as_str(), "abc");
//!
//! let secret = SharedSecret::new("s3cr3t");
//! let mut validator = RequestValidator::for_request(&secret, &request);
//! assert!(validator.is_valid(&request).unwrap());
//! ```
//!
//! # Modules
//!
//! - [`canonical`] - Signature base string construction per RFC 5849
//! - [`credentials`] - Credential provider trait and in-memory implementation
//! - [`error`] - Authentication error types
//! - [`hint`] - Credential scheme detection and key hint resolution
//! - [`oauth1`] - OAuth 1.0a signature computation and verification
//! - [`request`] - The normalized inbound request
//! - [`secret`] - Redacted shared secret wrapper
//! - [`signer`] - Outbound request signing
//! - [`token`] - Compact signed-token verification
//! - [`tool`] - A tool provider composing the authenticator
//! - [`validator`] - Strict and lenient request validation

pub mod canonical;
pub mod credentials;
pub mod error;
pub mod hint;
pub mod oauth1;
pub mod request;
pub mod secret;
pub mod signer;
pub mod token;
pub mod tool;
pub mod validator;

pub use credentials::{CredentialProvider, StaticCredentialProvider};
pub use error::AuthError;
pub use hint::{Credential, Scheme, detect_credential, resolve_hint};
pub use request::IncomingRequest;
pub use secret::SharedSecret;
pub use signer::{OAuthSigner, SignedRequest};
pub use tool::ToolProvider;
pub use validator::{
    AuthResult, RequestAuthenticator, RequestValidator, SignatureContext, ValidationMode,
    authenticate_request,
};
