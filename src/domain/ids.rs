//! Domain identifier types with validation
//!
//! Newtype wrappers for the identifiers that flow through an export request.
//! Each type rejects empty or whitespace-only values, both when constructed
//! directly and when deserialized.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Namespace prefix the metadata service expects in front of a health code
/// when it is used as a participant lookup key.
pub const HEALTH_CODE_KEY_PREFIX: &str = "healthCode:";

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident, $label:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            #[doc = concat!("Creates a new ", $label, ", rejecting empty values")]
            pub fn new(id: impl Into<String>) -> Result<Self, String> {
                let id = id.into();
                if id.trim().is_empty() {
                    return Err(concat!($label, " cannot be empty").to_string());
                }
                Ok(Self(id))
            }

            /// Returns the identifier as a string slice
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consumes self and returns the inner String
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::new(s)
            }
        }

        impl TryFrom<String> for $name {
            type Error = String;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

string_id!(
    /// Identifier of the owning application
    ///
    /// ```
    /// use pvexport::domain::ids::AppId;
    ///
    /// let app_id = AppId::new("mobile-toolbox").unwrap();
    /// assert_eq!(app_id.as_str(), "mobile-toolbox");
    /// ```
    AppId,
    "App ID"
);

string_id!(
    /// Identifier of a sub-study within an application
    StudyId,
    "Study ID"
);

string_id!(
    /// Pseudonymous identifier of a participant
    HealthCode,
    "Health code"
);

string_id!(
    /// Identifier of a destination table in the data warehouse
    TableId,
    "Table ID"
);

impl HealthCode {
    /// Returns the namespaced lookup key used by the metadata service
    ///
    /// ```
    /// use pvexport::domain::ids::HealthCode;
    ///
    /// let health_code = HealthCode::new("abc-123").unwrap();
    /// assert_eq!(health_code.lookup_key(), "healthCode:abc-123");
    /// ```
    pub fn lookup_key(&self) -> String {
        format!("{HEALTH_CODE_KEY_PREFIX}{}", self.0)
    }
}
