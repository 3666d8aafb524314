//! OAuth 1.0a signed launch scenarios.

#[cfg(test)]
mod tests {
    use http::Method;
    use http::header::CONTENT_TYPE;
    use lti_auth::{
        AuthError, IncomingRequest, OAuthSigner, RequestAuthenticator, RequestValidator,
        SharedSecret, ToolProvider,
    };
    use lti_core::Params;

    use crate::{LAUNCH_URL, launch_params, signed_form_launch};

    #[test]
    fn test_should_accept_launch_signed_with_secret() {
        // Scenario A.
        let request = signed_form_launch("abc", "s3cr3t");
        let secret = SharedSecret::new("s3cr3t");
        let mut validator = RequestValidator::for_request(&secret, &request);

        assert!(validator.is_valid(&request).unwrap());
        assert!(validator.is_valid_strict(&request).unwrap());
    }

    #[test]
    fn test_should_reject_launch_validated_with_wrong_secret() {
        // Scenario B.
        let request = signed_form_launch("abc", "s3cr3t");
        let secret = SharedSecret::new("wrong");
        let mut validator = RequestValidator::for_request(&secret, &request);

        assert!(!validator.is_valid(&request).unwrap());
        assert!(matches!(
            validator.is_valid_strict(&request),
            Err(AuthError::Unauthorized)
        ));
    }

    #[test]
    fn test_should_give_same_outcome_on_repeated_calls() {
        let request = signed_form_launch("abc", "s3cr3t");
        for secret in ["s3cr3t", "wrong"] {
            let secret = SharedSecret::new(secret);
            let mut validator = RequestValidator::for_request(&secret, &request);
            let first = validator.is_valid(&request).unwrap();
            let nonce = validator.request_oauth_nonce().map(ToOwned::to_owned);
            assert_eq!(validator.is_valid(&request).unwrap(), first);
            assert_eq!(validator.request_oauth_nonce().map(ToOwned::to_owned), nonce);
        }
    }

    #[test]
    fn test_should_not_mutate_request() {
        let request = signed_form_launch("abc", "s3cr3t");
        let before = request.params().clone();
        let secret = SharedSecret::new("s3cr3t");
        let mut validator = RequestValidator::for_request(&secret, &request);
        validator.is_valid(&request).unwrap();
        assert_eq!(request.params(), &before);
    }

    #[test]
    fn test_should_reject_replayed_body_on_other_url() {
        let request = signed_form_launch("abc", "s3cr3t");
        let moved = IncomingRequest::from_params(
            Method::POST,
            "https://evil.example.com/lti/launch",
            request.params().clone(),
        )
        .unwrap();

        let secret = SharedSecret::new("s3cr3t");
        let mut validator = RequestValidator::for_request(&secret, &moved);
        assert!(!validator.is_valid(&moved).unwrap());
    }

    #[test]
    fn test_should_reject_method_change() {
        let request = signed_form_launch("abc", "s3cr3t");
        let as_get =
            IncomingRequest::from_params(Method::GET, LAUNCH_URL, request.params().clone())
                .unwrap();

        let secret = SharedSecret::new("s3cr3t");
        let mut validator = RequestValidator::for_request(&secret, &as_get);
        assert!(matches!(
            validator.is_valid_strict(&as_get),
            Err(AuthError::Unauthorized)
        ));
    }

    #[test]
    fn test_should_validate_through_tool_provider() {
        let request = signed_form_launch("abc", "s3cr3t");
        let mut tool = ToolProvider::new("abc", SharedSecret::new("s3cr3t"), request.params().clone());

        assert_eq!(tool.launch_param("lti_version"), Some("LTI-1p0"));
        assert!(tool.is_valid(&request).unwrap());
        assert!(tool.request_oauth_timestamp().is_some());
    }

    #[test]
    fn test_should_report_unknown_signature_method_by_mode() {
        let request = signed_form_launch("abc", "s3cr3t");
        let mut params: Params = request.params().clone();
        params.insert("oauth_signature_method", "RSA-SHA1");
        let request = IncomingRequest::from_params(Method::POST, LAUNCH_URL, params).unwrap();

        let secret = SharedSecret::new("s3cr3t");
        let mut validator = RequestValidator::for_request(&secret, &request);
        assert!(!validator.is_valid(&request).unwrap());
        let err = validator.is_valid_strict(&request).unwrap_err();
        assert!(matches!(err, AuthError::UnsupportedScheme(_)));
        assert!(err.status_code().is_client_error());
    }

    #[test]
    fn test_should_accept_form_launch_with_mixed_case_content_type() {
        let signed = OAuthSigner::new("abc", SharedSecret::new("s3cr3t"))
            .unwrap()
            .sign(&Method::POST, LAUNCH_URL, &launch_params())
            .unwrap();
        let (parts, ()) = http::Request::builder()
            .method(Method::POST)
            .uri(LAUNCH_URL)
            .header(CONTENT_TYPE, "Application/X-WWW-Form-Urlencoded")
            .body(())
            .unwrap()
            .into_parts();
        let request = IncomingRequest::from_parts(parts, signed.form_body().as_bytes());

        let secret = SharedSecret::new("s3cr3t");
        let mut validator = RequestValidator::for_request(&secret, &request);
        assert!(validator.is_valid_strict(&request).unwrap());
    }
}
