//! Core types, configuration, and identifiers for LTI request authentication.
//!
//! This crate provides the building blocks shared by the authentication crate
//! and its callers: the request parameter bag, the credential hint newtype,
//! environment-driven configuration, and random identifier generation.

mod config;
mod error;
mod identifier;
mod types;

pub use config::{AuthConfig, SignatureMethod, TokenAlgorithm};
pub use error::{LtiError, LtiResult};
pub use identifier::{SUPPORTED_LTI_VERSIONS, generate_identifier};
pub use types::{CredentialHint, ParamValue, Params};
