//! Client error types and their classification into [`AccessError`].

use folio_core::AccessError;

/// Errors from platform API calls.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// HTTP transport error.
    #[error("HTTP error calling {endpoint}: {source}")]
    Http {
        endpoint: String,
        source: reqwest::Error,
    },
    /// The transport timeout elapsed.
    #[error("request to {endpoint} timed out")]
    Timeout { endpoint: String },
    /// The API returned a non-2xx status.
    #[error("{endpoint} returned {status}: {body}")]
    Api {
        endpoint: String,
        status: u16,
        /// `message` field of a JSON error body, if any.
        message: Option<String>,
        body: String,
    },
    /// Response deserialization failed.
    #[error("failed to deserialize response from {endpoint}: {source}")]
    Deserialization {
        endpoint: String,
        source: reqwest::Error,
    },
    /// The bearer token cannot be sent as a header value.
    #[error("authorization token contains invalid characters")]
    InvalidToken,
    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(#[from] super::config::ConfigError),
}

impl ClientError {
    /// Build an [`ClientError::Api`] from a failed response body.
    pub(crate) fn api(endpoint: impl Into<String>, status: u16, body: String) -> Self {
        let message = serde_json::from_str::<serde_json::Value>(&body)
            .ok()
            .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(str::to_string))
            .filter(|m| !m.trim().is_empty());
        Self::Api {
            endpoint: endpoint.into(),
            status,
            message,
            body,
        }
    }

    /// HTTP status, when the server answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Map to the access error taxonomy.
    ///
    /// 401 is `AuthRequired`, 403 `Forbidden`, 404 `NotFound`; everything
    /// else, including transport failures, is `Transient`.
    pub fn classify(&self) -> AccessError {
        match self {
            Self::Api { status: 401, .. } => AccessError::AuthRequired,
            Self::Api {
                status: 403,
                message,
                ..
            } => AccessError::Forbidden {
                message: message.clone().unwrap_or_else(|| {
                    "access forbidden: check the pack's publication status".to_string()
                }),
            },
            Self::Api {
                status: 404,
                endpoint,
                ..
            } => AccessError::NotFound {
                what: endpoint.clone(),
            },
            Self::Api {
                message: Some(message),
                ..
            } => AccessError::transient(message.clone()),
            Self::Api { status, .. } => AccessError::transient(format!("server error ({status})")),
            Self::Timeout { .. } => AccessError::transient("the request timed out"),
            Self::Http { .. } | Self::Deserialization { .. } => {
                AccessError::transient("unable to reach the server")
            }
            Self::InvalidToken | Self::Config(_) => AccessError::transient(self.to_string()),
        }
    }
}
