//! Request parameter and credential hint types shared across LTI crates.

use std::collections::BTreeMap;
use std::fmt;

use crate::error::{LtiError, LtiResult};

/// A single request parameter value: either one string or an array of strings.
///
/// Form-encoded launches repeat a key to send an array (`role=a&role=b`), and
/// JSON-shaped parameter bags use arrays directly.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    /// A single value.
    Single(String),
    /// Several values under the same key, in arrival order.
    Multiple(Vec<String>),
}

impl ParamValue {
    /// All values as a slice, in arrival order.
    #[must_use]
    pub fn values(&self) -> &[String] {
        match self {
            Self::Single(value) => std::slice::from_ref(value),
            Self::Multiple(values) => values,
        }
    }

    /// The first value, if any.
    #[must_use]
    pub fn first(&self) -> Option<&str> {
        self.values().first().map(String::as_str)
    }

    fn push(&mut self, value: String) {
        match self {
            Self::Single(existing) => {
                let first = std::mem::take(existing);
                *self = Self::Multiple(vec![first, value]);
            }
            Self::Multiple(values) => values.push(value),
        }
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        Self::Single(value)
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        Self::Single(value.to_owned())
    }
}

impl From<Vec<String>> for ParamValue {
    fn from(values: Vec<String>) -> Self {
        Self::Multiple(values)
    }
}

/// The decoded parameter bag of an incoming request.
///
/// Keys are kept sorted so iteration order is deterministic. The bag is
/// untrusted: nothing in it has been verified when it is constructed.
///
/// # Examples
///
/// ```
/// use lti_core::Params;
///
/// let params = Params::from_urlencoded(b"oauth_consumer_key=abc&role=a&role=b");
/// assert_eq!(params.get_str("oauth_consumer_key"), Some("abc"));
/// assert_eq!(params.get("role").unwrap().values().len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct Params(BTreeMap<String, ParamValue>);

impl Params {
    /// Create an empty parameter bag.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode an `application/x-www-form-urlencoded` body or query string.
    ///
    /// Repeated keys are collected into [`ParamValue::Multiple`].
    #[must_use]
    pub fn from_urlencoded(input: &[u8]) -> Self {
        form_urlencoded::parse(input)
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect()
    }

    /// Decode a JSON object whose values are strings or arrays of strings.
    ///
    /// # Errors
    ///
    /// Returns [`LtiError::InvalidParams`] if the input is not such an object.
    pub fn from_json(input: &str) -> LtiResult<Self> {
        serde_json::from_str(input).map_err(|e| LtiError::InvalidParams(e.to_string()))
    }

    /// Insert a value, replacing whatever was stored under `key`.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<ParamValue>) {
        self.0.insert(key.into(), value.into());
    }

    /// Append a value under `key`, turning an existing single value into an array.
    pub fn append(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let value = value.into();
        match self.0.entry(key.into()) {
            std::collections::btree_map::Entry::Occupied(mut entry) => entry.get_mut().push(value),
            std::collections::btree_map::Entry::Vacant(entry) => {
                entry.insert(ParamValue::Single(value));
            }
        }
    }

    /// Look up the raw value stored under `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.0.get(key)
    }

    /// Look up the first value stored under `key`.
    #[must_use]
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(ParamValue::first)
    }

    /// Whether `key` is present, regardless of its value.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Number of distinct keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the bag holds no keys.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate every `(key, value)` pair, flattening arrays.
    pub fn pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().flat_map(|(key, value)| {
            value
                .values()
                .iter()
                .map(move |v| (key.as_str(), v.as_str()))
        })
    }
}

impl<K, V> FromIterator<(K, V)> for Params
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Self::new();
        for (key, value) in iter {
            params.append(key, value);
        }
        params
    }
}

/// An unverified identifier used to select the shared secret for a request.
///
/// For the legacy scheme this is the OAuth consumer key; for the token scheme
/// it is the `kid` field of the token header. It is a routing hint only and
/// authorizes nothing.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CredentialHint(String);

impl CredentialHint {
    /// Wrap an identifier.
    #[must_use]
    pub fn new(hint: impl Into<String>) -> Self {
        Self(hint.into())
    }

    /// Get the hint as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the hint, returning the inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for CredentialHint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CredentialHint {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
