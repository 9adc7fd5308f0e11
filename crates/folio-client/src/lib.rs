//! # folio-client -- Typed client for the learning-platform API
//!
//! Provides typed access to the endpoints the reader stack depends on:
//! - **Catalog** (`catalog.rs`): pack lookup by slug.
//! - **Access** (`access.rs`): grant status and enrollment requests.
//!
//! Plus the collaborator traits (`backend.rs`) the access services are
//! written against, an in-memory implementation (`mock.rs`) that mirrors
//! the server's semantics, and upload-response parsing (`upload.rs`).
//!
//! ## Request policy
//!
//! - Credentials are passed per call as an `AuthContext`; the client holds none.
//! - One attempt per call. No retry layer; the configured timeout bounds it.
//! - All paths are appended to `ClientConfig::base_url`.

pub mod access;
pub mod backend;
pub mod catalog;
pub mod config;
pub mod error;
pub mod mock;
pub(crate) mod transport;
pub mod upload;

pub use backend::{AccessBackend, CatalogBackend};
pub use config::ClientConfig;
pub use error::ClientError;
pub use mock::MockBackend;

use std::time::Duration;

use async_trait::async_trait;

use folio_core::{
    AccessError, AccessSnapshot, AuthContext, ContentPack, EnrollmentReceipt, PackId, PackSlug,
};

/// Top-level API client. Holds the sub-clients.
#[derive(Debug, Clone)]
pub struct FolioClient {
    catalog: catalog::CatalogClient,
    access: access::AccessClient,
}

impl FolioClient {
    /// Create a client from configuration.
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ClientError::Http {
                endpoint: "client_init".into(),
                source: e,
            })?;
        let transport = transport::Transport::new(http, config.base_url);

        Ok(Self {
            catalog: catalog::CatalogClient::new(transport.clone()),
            access: access::AccessClient::new(transport),
        })
    }

    /// Access the catalog client.
    pub fn catalog(&self) -> &catalog::CatalogClient {
        &self.catalog
    }

    /// Access the access-status/enrollment client.
    pub fn access(&self) -> &access::AccessClient {
        &self.access
    }
}

#[async_trait]
impl CatalogBackend for FolioClient {
    async fn get_pack(
        &self,
        slug: &PackSlug,
        auth: &AuthContext,
    ) -> Result<ContentPack, AccessError> {
        self.catalog.get(slug, auth).await.map_err(|e| {
            tracing::warn!(slug = %slug, error = %e, "pack fetch failed");
            match e.classify() {
                AccessError::NotFound { .. } => AccessError::NotFound { what: "pack".into() },
                other => other,
            }
        })
    }
}

#[async_trait]
impl AccessBackend for FolioClient {
    async fn get_access_status(
        &self,
        pack: &PackId,
        auth: &AuthContext,
    ) -> Result<AccessSnapshot, AccessError> {
        self.access.status(pack, auth).await.map_err(|e| {
            tracing::debug!(pack_id = %pack, error = %e, "access status call failed");
            e.classify()
        })
    }

    async fn submit_access_request(
        &self,
        pack: &PackId,
        contact: Option<&str>,
        auth: &AuthContext,
    ) -> Result<EnrollmentReceipt, AccessError> {
        self.access.enroll(pack, contact, auth).await.map_err(|e| {
            tracing::warn!(
                pack_id = %pack,
                status = ?e.status(),
                error = %e,
                "enrollment call failed"
            );
            e.classify()
        })
    }

    fn backend_name(&self) -> &str {
        "http"
    }
}
