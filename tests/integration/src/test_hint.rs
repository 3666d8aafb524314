//! Key hint resolution scenarios.

#[cfg(test)]
mod tests {
    use http::Method;
    use lti_auth::{
        AuthError, AuthResult, IncomingRequest, RequestAuthenticator, RequestValidator,
        SharedSecret, StaticCredentialProvider, ValidationMode, authenticate_request,
        resolve_hint,
    };
    use lti_core::{AuthConfig, CredentialHint, Params};
    use serde_json::json;

    use crate::{LAUNCH_URL, init_tracing, sign_token, signed_form_launch, token_launch};

    #[test]
    fn test_should_resolve_consumer_key_regardless_of_other_params() {
        let request = signed_form_launch("abc", "s3cr3t");
        let mut params = request.params().clone();
        params.insert("jwt", sign_token(Some("key1"), &json!({}), "other"));

        assert_eq!(
            resolve_hint(&params).unwrap(),
            Some(CredentialHint::new("abc"))
        );
    }

    #[test]
    fn test_should_resolve_token_kid_without_secret() {
        // Scenario C: the header's kid is returned, no secret is involved.
        let token = sign_token(Some("key1"), &json!({"sub": "learner"}), "never-looked-up");
        let request = token_launch(&token);

        assert_eq!(
            resolve_hint(request.params()).unwrap(),
            Some(CredentialHint::new("key1"))
        );
    }

    #[test]
    fn test_should_fail_empty_request_in_both_modes() {
        // Scenario D: no hint, and the validator reports Malformed on first call.
        init_tracing();
        let request =
            IncomingRequest::from_params(Method::POST, LAUNCH_URL, Params::new()).unwrap();
        assert_eq!(resolve_hint(request.params()).unwrap(), None);

        let secret = SharedSecret::new("s3cr3t");
        let mut validator = RequestValidator::for_request(&secret, &request);
        assert!(matches!(
            validator.is_valid(&request),
            Err(AuthError::Malformed(_))
        ));
        assert!(matches!(
            validator.is_valid_strict(&request),
            Err(AuthError::Malformed(_))
        ));
    }

    #[test]
    fn test_should_surface_uninterpretable_token_header() {
        let request = token_launch("this-is-not-a-token");
        assert!(matches!(
            resolve_hint(request.params()),
            Err(AuthError::Malformed(_))
        ));

        let provider = StaticCredentialProvider::new(vec![]);
        let result = authenticate_request(
            &request,
            &provider,
            &AuthConfig::default(),
            ValidationMode::Lenient,
        );
        assert!(matches!(result, Err(AuthError::Malformed(_))));
    }

    #[test]
    fn test_should_run_full_flow_for_each_scheme() {
        let provider = StaticCredentialProvider::new(vec![
            ("abc".to_owned(), "s3cr3t".to_owned()),
            ("key1".to_owned(), "t0k3n".to_owned()),
        ]);
        let config = AuthConfig::default();

        let legacy = signed_form_launch("abc", "s3cr3t");
        let AuthResult {
            valid,
            hint,
            signature_context,
        } = authenticate_request(&legacy, &provider, &config, ValidationMode::Strict).unwrap();
        assert!(valid);
        assert_eq!(hint.as_str(), "abc");
        assert!(signature_context.unwrap().nonce.is_some());

        let token = token_launch(&sign_token(Some("key1"), &json!({"sub": "x"}), "t0k3n"));
        let result =
            authenticate_request(&token, &provider, &config, ValidationMode::Strict).unwrap();
        assert!(result.valid);
        assert_eq!(result.hint.as_str(), "key1");
    }
}
