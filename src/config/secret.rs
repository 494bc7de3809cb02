//! Service API tokens
//!
//! Tokens are held as [`SecretString`]: zeroized on drop, redacted in `Debug`
//! output, and only readable through `expose_secret()`. [`SecretValue`] has
//! no `Display` impl.
//!
//! ```rust
//! use pvexport::config::secret_string;
//! use secrecy::ExposeSecret;
//!
//! let token = secret_string("my-api-token".to_string());
//! assert_eq!(token.expose_secret().bearer(), "Bearer my-api-token");
//! assert!(!format!("{token:?}").contains("my-api-token"));
//! ```

use secrecy::{CloneableSecret, DebugSecret, Secret, SerializableSecret};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use zeroize::Zeroize;

/// Token text; only reachable through a [`SecretString`]
#[derive(Clone, Debug, Zeroize)]
#[zeroize(drop)]
pub struct SecretValue(String);

impl CloneableSecret for SecretValue {}
impl DebugSecret for SecretValue {}
impl SerializableSecret for SecretValue {}

impl SecretValue {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// `Authorization` header value for this token
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.0)
    }
}

impl PartialEq<str> for SecretValue {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl Serialize for SecretValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for SecretValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(SecretValue)
    }
}

/// An API token
pub type SecretString = Secret<SecretValue>;

/// Wraps a token read from config or the environment
pub fn secret_string(value: String) -> SecretString {
    Secret::new(SecretValue(value))
}
