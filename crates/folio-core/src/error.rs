//! # Error Types
//!
//! `FolioError` covers malformed values at construction time.
//! `AccessError` is the failure taxonomy every collaborator call is
//! classified into before it reaches the access services.

use thiserror::Error;

/// Validation error for core value types.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FolioError {
    /// An identifier was empty or contained only whitespace.
    #[error("invalid {kind} identifier: {value:?}")]
    InvalidIdentifier {
        /// Identifier namespace ("pack", "slug", "request").
        kind: &'static str,
        /// The rejected raw value.
        value: String,
    },

    /// A timestamp string could not be parsed.
    #[error("invalid timestamp {value:?}: {reason}")]
    InvalidTimestamp {
        /// The rejected raw value.
        value: String,
        /// Parser diagnostic.
        reason: String,
    },
}

/// Classified failure of a collaborator call.
///
/// The access services decide per operation how each class is handled:
/// a status check degrades `AuthRequired` to the anonymous default, while
/// an access request surfaces it as a sign-in signal.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AccessError {
    /// The caller is not authenticated.
    #[error("authentication required")]
    AuthRequired,

    /// The pack does not currently accept access requests (e.g. unpublished).
    #[error("forbidden: {message}")]
    Forbidden {
        /// User-facing explanation, preferably the server's own message.
        message: String,
    },

    /// The referenced resource does not exist.
    #[error("{what} not found")]
    NotFound {
        /// What was looked up ("pack", "access status").
        what: String,
    },

    /// Network or server failure with no more specific classification.
    #[error("temporary failure: {message}")]
    Transient {
        /// Diagnostic or server-provided message.
        message: String,
    },
}

impl AccessError {
    /// Whether re-issuing the same call later may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Transient { .. })
    }

    /// Shorthand for a transient failure.
    pub fn transient(message: impl Into<String>) -> Self {
        Self::Transient {
            message: message.into(),
        }
    }
}
