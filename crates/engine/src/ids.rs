//! Opaque identifiers used by the store.
//!
//! Ids are never interpreted, only compared. Construction trims surrounding
//! whitespace and rejects empty values, so a validated record can never carry
//! an id that would silently match nothing.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{EngineError, ResultEngine};

/// Generates a validated string newtype with `new`, `as_str` and the usual
/// conversions.
macro_rules! opaque_id {
    ($(#[$meta:meta])* $name:ident, $label:literal) => {
        $(#[$meta])*
        #[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            pub fn new(value: impl AsRef<str>) -> ResultEngine<Self> {
                let trimmed = value.as_ref().trim();
                if trimmed.is_empty() {
                    return Err(EngineError::InvalidId(format!(
                        "{} id must not be empty",
                        $label
                    )));
                }
                Ok(Self(trimmed.to_string()))
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl TryFrom<String> for $name {
            type Error = EngineError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl TryFrom<&str> for $name {
            type Error = EngineError;

            fn try_from(value: &str) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

opaque_id!(
    /// A group participant (the `users.id` column).
    MemberId,
    "member"
);
opaque_id!(GroupId, "group");
opaque_id!(ExpenseId, "expense");
opaque_id!(SettlementId, "settlement");
