//! Protocol versions and random identifiers.

/// The LTI versions whose launches this workspace authenticates.
pub const SUPPORTED_LTI_VERSIONS: &[&str] = &["1.0", "1.1"];

/// Generate a random unique identifier (UUID v4, hyphenated).
///
/// Used for OAuth nonces and message identifiers on outbound service requests.
///
/// # Examples
///
/// ```
/// let a = lti_core::generate_identifier();
/// let b = lti_core::generate_identifier();
/// assert_ne!(a, b);
/// assert_eq!(a.len(), 36);
/// ```
#[must_use]
pub fn generate_identifier() -> String {
    uuid::Uuid::new_v4().to_string()
}
