//! # Enrollment Requester
//!
//! Submits an access request for the current user and, on success, stores
//! the snapshot the receipt establishes. One backend call per invocation and
//! no retry. A failure leaves the held state untouched.

use std::sync::Arc;

use folio_client::AccessBackend;
use folio_core::{AccessError, AuthContext, EnrollmentReceipt, PackId};

use crate::cell::AccessCell;

/// Creates access requests for one pack.
#[derive(Clone)]
pub struct EnrollmentRequester {
    backend: Arc<dyn AccessBackend>,
    cell: AccessCell,
}

impl std::fmt::Debug for EnrollmentRequester {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EnrollmentRequester")
            .field("backend", &self.backend.backend_name())
            .field("cell", &self.cell)
            .finish()
    }
}

impl EnrollmentRequester {
    pub fn new(backend: Arc<dyn AccessBackend>, cell: AccessCell) -> Self {
        Self { backend, cell }
    }

    /// Ask for a grant on `pack`.
    ///
    /// Without a credential this returns [`AccessError::AuthRequired`]
    /// immediately. A receipt reporting an existing grant stores
    /// `{grant: true, request: None}`; otherwise the returned request is
    /// stored with `grant: false`.
    pub async fn request_access(
        &self,
        pack: &PackId,
        contact: Option<&str>,
        auth: &AuthContext,
    ) -> Result<EnrollmentReceipt, AccessError> {
        if !auth.is_authenticated() {
            tracing::debug!(pack_id = %pack, "access request without credential");
            return Err(AccessError::AuthRequired);
        }

        let receipt = self
            .backend
            .submit_access_request(pack, contact, auth)
            .await
            .map_err(|error| {
                tracing::warn!(pack_id = %pack, error = %error, "access request failed");
                error
            })?;

        let applied = self.cell.replace(pack, receipt.snapshot());
        tracing::info!(
            pack_id = %pack,
            grant = receipt.grant,
            request = ?receipt.request.as_ref().map(|r| r.status),
            stored = applied.is_stored(),
            "access request answered"
        );
        Ok(receipt)
    }
}
