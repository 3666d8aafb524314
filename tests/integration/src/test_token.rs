//! Signed-token launch scenarios.

#[cfg(test)]
mod tests {
    use lti_auth::{AuthError, RequestAuthenticator, RequestValidator, Scheme, SharedSecret};
    use lti_core::{AuthConfig, TokenAlgorithm};
    use serde_json::json;

    use crate::{sign_token, token_launch};

    /// Flip one character inside the payload segment.
    fn tamper_payload(token: &str, index: usize) -> String {
        let mut segments: Vec<String> = token.split('.').map(ToOwned::to_owned).collect();
        let payload: Vec<char> = segments[1].chars().collect();
        let index = index % payload.len();
        let replaced: String = payload
            .iter()
            .enumerate()
            .map(|(i, c)| {
                if i == index {
                    if *c == 'x' { 'y' } else { 'x' }
                } else {
                    *c
                }
            })
            .collect();
        segments[1] = replaced;
        segments.join(".")
    }

    #[test]
    fn test_should_accept_token_signed_with_secret() {
        let token = sign_token(Some("key1"), &json!({"sub": "learner", "iss": "lms"}), "s3cr3t");
        let request = token_launch(&token);
        let secret = SharedSecret::new("s3cr3t");
        let mut validator = RequestValidator::for_request(&secret, &request);

        assert_eq!(validator.scheme(), Some(&Scheme::Token(token.clone())));
        assert!(validator.is_valid(&request).unwrap());
        assert!(validator.is_valid_strict(&request).unwrap());
    }

    #[test]
    fn test_should_reject_token_with_wrong_secret_by_mode() {
        let token = sign_token(Some("key1"), &json!({"sub": "learner"}), "s3cr3t");
        let request = token_launch(&token);
        let secret = SharedSecret::new("wrong");
        let mut validator = RequestValidator::for_request(&secret, &request);

        assert!(!validator.is_valid(&request).unwrap());
        assert!(matches!(
            validator.is_valid_strict(&request),
            Err(AuthError::TokenVerificationFailed(_))
        ));
    }

    #[test]
    fn test_should_reject_any_tampered_payload_byte() {
        let token = sign_token(Some("key1"), &json!({"sub": "learner", "role": "x"}), "s3cr3t");
        let payload_len = token.split('.').nth(1).unwrap().len();
        let secret = SharedSecret::new("s3cr3t");

        for index in 0..payload_len {
            let tampered = tamper_payload(&token, index);
            let request = token_launch(&tampered);
            let mut validator = RequestValidator::for_request(&secret, &request);

            assert!(!validator.is_valid(&request).unwrap(), "index {index}");
            assert!(
                matches!(
                    validator.is_valid_strict(&request),
                    Err(AuthError::TokenVerificationFailed(_))
                ),
                "index {index}"
            );
        }
    }

    #[test]
    fn test_should_propagate_expired_token_in_lenient_mode() {
        let token = sign_token(None, &json!({"exp": 1_000_000_000}), "s3cr3t");
        let request = token_launch(&token);
        let secret = SharedSecret::new("s3cr3t");
        let mut validator = RequestValidator::for_request(&secret, &request);

        assert!(matches!(
            validator.is_valid(&request),
            Err(AuthError::TokenRejected(_))
        ));
    }

    #[test]
    fn test_should_honor_configured_algorithms() {
        let header = jsonwebtoken::Header::new(jsonwebtoken::Algorithm::HS384);
        let token = jsonwebtoken::encode(
            &header,
            &json!({"sub": "learner"}),
            &jsonwebtoken::EncodingKey::from_secret(b"s3cr3t"),
        )
        .unwrap();
        let request = token_launch(&token);
        let secret = SharedSecret::new("s3cr3t");

        let mut default_validator = RequestValidator::for_request(&secret, &request);
        assert!(matches!(
            default_validator.is_valid(&request),
            Err(AuthError::UnsupportedAlgorithm(_))
        ));

        let config = AuthConfig {
            token_algorithms: vec![TokenAlgorithm::HS384],
            ..AuthConfig::default()
        };
        let mut validator = RequestValidator::for_request(&secret, &request).with_config(config);
        assert!(validator.is_valid_strict(&request).unwrap());
    }
}
