//! The normalized inbound request seen by the validator.

use http::header::{AUTHORIZATION, CONTENT_TYPE, HOST};
use http::uri::Authority;
use http::{HeaderMap, HeaderName, HeaderValue, Method, Uri};
use lti_core::Params;

use crate::canonical::build_base_uri;
use crate::error::AuthError;
use crate::oauth1::{is_oauth_header, parse_authorization_header};

const FORWARDED_PROTO: &str = "x-forwarded-proto";
const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// An inbound launch or service request: transport metadata plus the decoded
/// body parameters.
///
/// The request is never mutated by validation.
///
/// # Examples
///
/// ```
/// use http::Method;
/// use lti_auth::IncomingRequest;
/// use lti_core::Params;
///
/// let params = Params::from_urlencoded(b"oauth_consumer_key=abc");
/// let request = IncomingRequest::from_params(Method::POST, "https://tool.test/launch", params).unwrap();
/// assert_eq!(request.base_uri().unwrap(), "https://tool.test/launch");
/// ```
#[derive(Debug, Clone)]
pub struct IncomingRequest {
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    params: Params,
}

impl IncomingRequest {
    /// Build a request from HTTP request parts and already-decoded body parameters.
    #[must_use]
    pub fn new(parts: http::request::Parts, params: Params) -> Self {
        Self {
            method: parts.method,
            uri: parts.uri,
            headers: parts.headers,
            params,
        }
    }

    /// Build a request from HTTP request parts and the raw body.
    ///
    /// The body contributes parameters only when it is form-encoded; any other
    /// content type (an XML outcome request, say) leaves the body params empty.
    #[must_use]
    pub fn from_parts(parts: http::request::Parts, body: &[u8]) -> Self {
        let is_form = parts
            .headers
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(is_form_content_type);

        let params = if is_form {
            Params::from_urlencoded(body)
        } else {
            Params::new()
        };

        Self::new(parts, params)
    }

    /// Build a request from a method, an absolute URL, and body parameters.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Malformed`] if `url` cannot be parsed.
    pub fn from_params(method: Method, url: &str, params: Params) -> Result<Self, AuthError> {
        let uri: Uri = url
            .parse()
            .map_err(|e| AuthError::Malformed(format!("invalid request URL {url}: {e}")))?;

        Ok(Self {
            method,
            uri,
            headers: HeaderMap::new(),
            params,
        })
    }

    /// Add a header, returning the updated request.
    #[must_use]
    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.append(name, value);
        self
    }

    /// The HTTP method.
    #[must_use]
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// The request URI as received.
    #[must_use]
    pub fn uri(&self) -> &Uri {
        &self.uri
    }

    /// The request headers.
    #[must_use]
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// The decoded body parameters.
    #[must_use]
    pub fn params(&self) -> &Params {
        &self.params
    }

    /// The decoded query string parameters.
    #[must_use]
    pub fn query_params(&self) -> Params {
        self.uri
            .query()
            .map(|q| Params::from_urlencoded(q.as_bytes()))
            .unwrap_or_default()
    }

    /// The parameters of an `Authorization: OAuth` header, if one is present.
    ///
    /// Headers using another scheme are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Malformed`] if an OAuth header cannot be parsed.
    pub fn authorization_params(&self) -> Result<Option<Params>, AuthError> {
        let Some(value) = self.headers.get(AUTHORIZATION) else {
            return Ok(None);
        };
        let value = value
            .to_str()
            .map_err(|_| AuthError::Malformed("Authorization header is not ASCII".to_owned()))?;

        if !is_oauth_header(value) {
            return Ok(None);
        }
        parse_authorization_header(value).map(Some)
    }

    /// Every parameter that takes part in the signature: body, query string and
    /// OAuth header, in that order.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Malformed`] if an OAuth header cannot be parsed.
    pub fn signature_params(&self) -> Result<Params, AuthError> {
        let mut merged = self.params.clone();
        for (key, value) in self.query_params().pairs() {
            merged.append(key, value);
        }
        if let Some(header_params) = self.authorization_params()? {
            for (key, value) in header_params.pairs() {
                merged.append(key, value);
            }
        }
        Ok(merged)
    }

    /// The base string URI used in the OAuth signature.
    ///
    /// Origin-form request targets are completed from the `Host` header, and
    /// from `X-Forwarded-Proto` when the scheme is not known.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Malformed`] if no host can be determined.
    pub fn base_uri(&self) -> Result<String, AuthError> {
        let scheme = self
            .uri
            .scheme_str()
            .or_else(|| self.header_str(FORWARDED_PROTO))
            .unwrap_or("http");

        let authority = match self.uri.authority() {
            Some(authority) => authority.clone(),
            None => {
                let host = self
                    .header_str(HOST.as_str())
                    .ok_or_else(|| AuthError::Malformed("request URL has no host".to_owned()))?;
                host.parse::<Authority>()
                    .map_err(|e| AuthError::Malformed(format!("invalid Host header {host}: {e}")))?
            }
        };

        Ok(build_base_uri(
            scheme,
            authority.host(),
            authority.port_u16(),
            self.uri.path(),
        ))
    }

    fn header_str(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

/// Media types are case-insensitive and may carry parameters such as `charset`.
fn is_form_content_type(value: &str) -> bool {
    value
        .split(';')
        .next()
        .is_some_and(|media_type| media_type.trim().eq_ignore_ascii_case(FORM_CONTENT_TYPE))
}
