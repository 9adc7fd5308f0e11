//! # Authentication Context
//!
//! The caller's session credential, passed explicitly into every
//! collaborator call instead of being read from shared storage. An
//! anonymous context is a normal value, not an error.

use zeroize::Zeroizing;

/// Bearer credential of the current user, if any.
///
/// `Debug` never prints the token.
#[derive(Clone, Default)]
pub struct AuthContext {
    token: Option<Zeroizing<String>>,
}

impl AuthContext {
    /// A visitor without a session.
    pub fn anonymous() -> Self {
        Self { token: None }
    }

    /// A signed-in user. A blank token yields an anonymous context.
    pub fn bearer(token: impl Into<String>) -> Self {
        let token = token.into();
        if token.trim().is_empty() {
            return Self::anonymous();
        }
        Self {
            token: Some(Zeroizing::new(token.trim().to_string())),
        }
    }

    /// Build from an optional token, e.g. a CLI flag or environment variable.
    pub fn from_optional(token: Option<String>) -> Self {
        token.map(Self::bearer).unwrap_or_default()
    }

    /// Whether a credential is present.
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// The raw bearer token, for the transport layer only.
    pub fn bearer_token(&self) -> Option<&str> {
        self.token.as_ref().map(|t| t.as_str())
    }
}

impl std::fmt::Debug for AuthContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let token = if self.token.is_some() {
            "[REDACTED]"
        } else {
            "<none>"
        };
        f.debug_struct("AuthContext").field("token", &token).finish()
    }
}
