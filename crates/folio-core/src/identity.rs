//! # Identifier Newtypes
//!
//! Packs and access requests are identified by opaque server-issued
//! strings. Each namespace gets its own newtype so a `RequestId` cannot be
//! passed where a `PackId` is expected. Constructors reject blank values;
//! deserialization goes through the same check.

use serde::{Deserialize, Serialize};

use crate::error::FolioError;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident, $kind:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Build an identifier, trimming surrounding whitespace.
            ///
            /// # Errors
            ///
            /// Returns [`FolioError::InvalidIdentifier`] if the value is blank.
            pub fn new(raw: impl Into<String>) -> Result<Self, FolioError> {
                let raw = raw.into();
                let trimmed = raw.trim();
                if trimmed.is_empty() {
                    return Err(FolioError::InvalidIdentifier {
                        kind: $kind,
                        value: raw,
                    });
                }
                Ok(Self(trimmed.to_string()))
            }

            /// Borrow the raw identifier.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl TryFrom<String> for $name {
            type Error = FolioError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

string_id!(
    /// Server identity of a content pack (used in access endpoints).
    PackId,
    "pack"
);

string_id!(
    /// Human-readable pack address used by the public catalog.
    PackSlug,
    "slug"
);

string_id!(
    /// Server identity of an access request record.
    RequestId,
    "request"
);
