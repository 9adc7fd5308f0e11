//! Typed client for the per-pack access endpoints.
//!
//! | Method | Path | Operation |
//! |--------|------|-----------|
//! | GET    | `/student/books/{packId}/access` | Grant state and latest request |
//! | POST   | `/student/books/{packId}/enroll` | Submit an access request |

use serde::{Deserialize, Serialize};

use folio_core::{AccessRequest, AccessSnapshot, AuthContext, EnrollmentReceipt, PackId};

use crate::error::ClientError;
use crate::transport::Transport;

// -- Wire types ---------------------------------------------------------------

/// Response of `GET .../access`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessStatusResponse {
    #[serde(default)]
    pub access_granted: bool,
    #[serde(default)]
    pub request: Option<AccessRequest>,
}

impl From<AccessStatusResponse> for AccessSnapshot {
    fn from(resp: AccessStatusResponse) -> Self {
        Self {
            grant: resp.access_granted,
            request: resp.request,
        }
    }
}

/// Body of `POST .../enroll`.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrollRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub whatsapp_number: Option<String>,
}

impl EnrollRequest {
    /// Body carrying the trimmed contact handle; blank handles are omitted.
    pub fn with_contact(contact: Option<&str>) -> Self {
        Self {
            whatsapp_number: contact
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .map(str::to_string),
        }
    }
}

/// Response of `POST .../enroll`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrollResponse {
    #[serde(default)]
    pub access_granted: bool,
    #[serde(default)]
    pub request: Option<AccessRequest>,
    #[serde(default)]
    pub message: Option<String>,
}

impl From<EnrollResponse> for EnrollmentReceipt {
    fn from(resp: EnrollResponse) -> Self {
        Self {
            grant: resp.access_granted,
            request: resp.request,
            message: resp.message.filter(|m| !m.trim().is_empty()),
        }
    }
}

// -- Client -------------------------------------------------------------------

/// Client for the access endpoints.
#[derive(Debug, Clone)]
pub struct AccessClient {
    transport: Transport,
}

impl AccessClient {
    pub(crate) fn new(transport: Transport) -> Self {
        Self { transport }
    }

    /// Current grant state and latest request for `pack`.
    ///
    /// Calls `GET {base_url}/student/books/{pack}/access`.
    pub async fn status(
        &self,
        pack: &PackId,
        auth: &AuthContext,
    ) -> Result<AccessSnapshot, ClientError> {
        let endpoint = format!("GET /student/books/{pack}/access");
        let url = self.transport.url(&["student", "books", pack.as_str(), "access"])?;
        let request = self.transport.get(url, auth)?;
        let resp: AccessStatusResponse = self.transport.send_json(request, &endpoint).await?;
        Ok(resp.into())
    }

    /// Submit an access request for `pack`.
    ///
    /// Calls `POST {base_url}/student/books/{pack}/enroll`.
    pub async fn enroll(
        &self,
        pack: &PackId,
        contact: Option<&str>,
        auth: &AuthContext,
    ) -> Result<EnrollmentReceipt, ClientError> {
        let endpoint = format!("POST /student/books/{pack}/enroll");
        let url = self.transport.url(&["student", "books", pack.as_str(), "enroll"])?;
        let body = EnrollRequest::with_contact(contact);
        let request = self.transport.post(url, auth)?.json(&body);
        let resp: EnrollResponse = self.transport.send_json(request, &endpoint).await?;
        Ok(resp.into())
    }
}
