//! Shared request plumbing for the sub-clients.
//!
//! One attempt per call. The only bound on a call is the transport timeout
//! configured on the `reqwest::Client`.

use serde::de::DeserializeOwned;
use url::Url;

use folio_core::AuthContext;

use crate::config::ConfigError;
use crate::error::ClientError;

#[derive(Debug, Clone)]
pub(crate) struct Transport {
    http: reqwest::Client,
    base_url: Url,
}

impl Transport {
    pub(crate) fn new(http: reqwest::Client, base_url: Url) -> Self {
        Self { http, base_url }
    }

    /// Append percent-encoded path segments to the API root.
    pub(crate) fn url(&self, segments: &[&str]) -> Result<Url, ClientError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| {
                ClientError::Config(ConfigError::InvalidUrl(
                    "base_url".into(),
                    "URL cannot carry a path".into(),
                ))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    pub(crate) fn get(
        &self,
        url: Url,
        auth: &AuthContext,
    ) -> Result<reqwest::RequestBuilder, ClientError> {
        authorize(self.http.get(url), auth)
    }

    pub(crate) fn post(
        &self,
        url: Url,
        auth: &AuthContext,
    ) -> Result<reqwest::RequestBuilder, ClientError> {
        authorize(self.http.post(url), auth)
    }

    /// Send and decode a JSON body, mapping non-2xx statuses to
    /// [`ClientError::Api`].
    pub(crate) async fn send_json<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
        endpoint: &str,
    ) -> Result<T, ClientError> {
        let resp = request.send().await.map_err(|e| {
            if e.is_timeout() {
                ClientError::Timeout {
                    endpoint: endpoint.to_string(),
                }
            } else {
                ClientError::Http {
                    endpoint: endpoint.to_string(),
                    source: e,
                }
            }
        })?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            tracing::debug!(endpoint, status, "platform API returned an error status");
            return Err(ClientError::api(endpoint, status, body));
        }

        resp.json().await.map_err(|e| ClientError::Deserialization {
            endpoint: endpoint.to_string(),
            source: e,
        })
    }
}

fn authorize(
    request: reqwest::RequestBuilder,
    auth: &AuthContext,
) -> Result<reqwest::RequestBuilder, ClientError> {
    match auth.bearer_token() {
        None => Ok(request),
        Some(token) => {
            let mut value = reqwest::header::HeaderValue::from_str(&format!("Bearer {token}"))
                .map_err(|_| ClientError::InvalidToken)?;
            value.set_sensitive(true);
            Ok(request.header(reqwest::header::AUTHORIZATION, value))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transport(base: &str) -> Transport {
        Transport::new(reqwest::Client::new(), Url::parse(base).unwrap())
    }

    #[test]
    fn url_appends_segments() {
        let t = transport("http://127.0.0.1:5000/api");
        let url = t.url(&["student", "books", "abc", "access"]).unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:5000/api/student/books/abc/access");
    }

    #[test]
    fn url_tolerates_trailing_slash() {
        let t = transport("http://127.0.0.1:5000/api/");
        let url = t.url(&["books", "pack-1"]).unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:5000/api/books/pack-1");
    }

    #[test]
    fn url_encodes_segments() {
        let t = transport("http://127.0.0.1:5000/api");
        let url = t.url(&["books", "a b/c"]).unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:5000/api/books/a%20b%2Fc");
    }

    #[test]
    fn invalid_token_rejected() {
        let t = transport("http://127.0.0.1:5000/api");
        let url = t.url(&["books"]).unwrap();
        let auth = AuthContext::bearer("bad\ntoken");
        assert!(matches!(t.get(url, &auth), Err(ClientError::InvalidToken)));
    }
}
