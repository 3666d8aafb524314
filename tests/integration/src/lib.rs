//! End-to-end authentication scenarios for LTI launches.
//!
//! Each test builds a launch the way a tool consumer would (OAuth-signed form
//! post or signed token), passes it through the provider-side flow, and checks
//! the outcome in both validation modes.
//!
//! Run them with:
//! ```text
//! cargo test -p lti-integration
//! ```

use std::sync::Once;

use http::Method;
use http::header::CONTENT_TYPE;
use jsonwebtoken::{EncodingKey, Header};
use lti_auth::{IncomingRequest, OAuthSigner, SharedSecret};
use lti_core::{AuthConfig, Params};

static INIT: Once = Once::new();

/// Launch URL used by every fixture.
pub const LAUNCH_URL: &str = "https://tool.example.com/lti/launch";

/// Initialize tracing (once).
///
/// `RUST_LOG` wins when set; otherwise the filter is the configured
/// `LOG_LEVEL`.
pub fn init_tracing() {
    INIT.call_once(|| {
        let log_level = AuthConfig::from_env()
            .map(|config| config.log_level)
            .unwrap_or_else(|_| AuthConfig::default().log_level);
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_level)),
            )
            .with_test_writer()
            .init();
    });
}

/// Typical LTI 1.1 launch parameters, before signing.
#[must_use]
pub fn launch_params() -> Params {
    let mut params = Params::new();
    params.insert("lti_message_type", "basic-lti-launch-request");
    params.insert("lti_version", "LTI-1p0");
    params.insert("resource_link_id", "88391-e1919-bb3456");
    params.insert("user_id", "0ae836b9-7fc9-4060-006f-27b2066ac545");
    params.append("roles", "Instructor");
    params.append("roles", "urn:lti:instrole:ims/lis/Administrator");
    params.insert("context_title", "Design of Personal Environments");
    params
}

/// Build an OAuth-signed form launch, the way a consumer posts it.
#[must_use]
pub fn signed_form_launch(consumer_key: &str, secret: &str) -> IncomingRequest {
    init_tracing();

    let signed = OAuthSigner::new(consumer_key, SharedSecret::new(secret))
        .expect("test signer")
        .sign(&Method::POST, LAUNCH_URL, &launch_params())
        .expect("test sign");

    let (parts, ()) = http::Request::builder()
        .method(Method::POST)
        .uri("/lti/launch")
        .header("host", "tool.example.com")
        .header("x-forwarded-proto", "https")
        .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(())
        .expect("test request")
        .into_parts();

    IncomingRequest::from_parts(parts, signed.form_body().as_bytes())
}

/// Sign a compact token with an HS256 header carrying `kid`.
#[must_use]
pub fn sign_token(kid: Option<&str>, claims: &serde_json::Value, secret: &str) -> String {
    let header = Header {
        kid: kid.map(ToOwned::to_owned),
        ..Header::default()
    };
    jsonwebtoken::encode(&header, claims, &EncodingKey::from_secret(secret.as_bytes()))
        .expect("test token")
}

/// Build a launch carrying `token` in the `jwt` parameter.
#[must_use]
pub fn token_launch(token: &str) -> IncomingRequest {
    init_tracing();

    let mut params = Params::new();
    params.insert("jwt", token);
    IncomingRequest::from_params(Method::POST, LAUNCH_URL, params).expect("test request")
}

mod test_hint;
mod test_legacy;
mod test_token;
