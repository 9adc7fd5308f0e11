//! # Collaborator Traits
//!
//! The operations the access services consume, abstracted from transport.
//! [`FolioClient`](crate::FolioClient) implements them over HTTP and
//! [`MockBackend`](crate::mock::MockBackend) in memory.
//!
//! Implementations classify every failure into [`AccessError`] and make
//! exactly one attempt per call.

use async_trait::async_trait;

use folio_core::{
    AccessError, AccessSnapshot, AuthContext, ContentPack, EnrollmentReceipt, PackId, PackSlug,
};

/// Source of catalog packs.
#[async_trait]
pub trait CatalogBackend: Send + Sync {
    /// Fetch a pack and its ordered asset sequence.
    async fn get_pack(
        &self,
        slug: &PackSlug,
        auth: &AuthContext,
    ) -> Result<ContentPack, AccessError>;
}

/// Source of grant state and sink for access requests.
#[async_trait]
pub trait AccessBackend: Send + Sync {
    /// Grant state and latest request of the authenticated user on `pack`.
    async fn get_access_status(
        &self,
        pack: &PackId,
        auth: &AuthContext,
    ) -> Result<AccessSnapshot, AccessError>;

    /// Create (or update) an access request, or report an existing grant.
    async fn submit_access_request(
        &self,
        pack: &PackId,
        contact: Option<&str>,
        auth: &AuthContext,
    ) -> Result<EnrollmentReceipt, AccessError>;

    /// Human-readable name of the implementation, for logs.
    fn backend_name(&self) -> &str;
}
