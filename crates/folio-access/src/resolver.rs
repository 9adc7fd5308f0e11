//! # Access Resolver
//!
//! Fetches the current user's grant and request for a pack and stores the
//! result in the shared [`AccessCell`].
//!
//! A status check never fails from the caller's point of view. Missing
//! credentials resolve to the anonymous default without a call. Any other
//! failure also resolves to the anonymous default (fail closed), is logged
//! at `warn`, and is handed back in [`StatusOutcome::degraded`] so the
//! caller can offer a manual refresh.

use std::sync::Arc;

use folio_client::AccessBackend;
use folio_core::{AccessError, AccessSnapshot, AuthContext, PackId};

use crate::cell::{AccessCell, Applied};

/// Result of one status check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusOutcome {
    /// The snapshot the check resolved to.
    pub snapshot: AccessSnapshot,
    /// The failure that forced the anonymous default, if any.
    pub degraded: Option<AccessError>,
    /// Whether the snapshot reached the cell.
    pub applied: Applied,
}

/// Pull-based grant state for one pack.
#[derive(Clone)]
pub struct AccessResolver {
    backend: Arc<dyn AccessBackend>,
    cell: AccessCell,
}

impl std::fmt::Debug for AccessResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessResolver")
            .field("backend", &self.backend.backend_name())
            .field("cell", &self.cell)
            .finish()
    }
}

impl AccessResolver {
    pub fn new(backend: Arc<dyn AccessBackend>, cell: AccessCell) -> Self {
        Self { backend, cell }
    }

    /// The cell this resolver writes to.
    pub fn cell(&self) -> &AccessCell {
        &self.cell
    }

    /// Held snapshot.
    pub fn snapshot(&self) -> AccessSnapshot {
        self.cell.snapshot()
    }

    /// Fetch and store the access state for `pack`.
    ///
    /// Returns `None` without doing anything when no pack is given.
    pub async fn fetch_status(
        &self,
        pack: Option<&PackId>,
        auth: &AuthContext,
    ) -> Option<StatusOutcome> {
        let pack = pack?;

        let (snapshot, degraded) = if !auth.is_authenticated() {
            tracing::debug!(pack_id = %pack, "no credential, access status is anonymous");
            (AccessSnapshot::anonymous(), None)
        } else {
            match self.backend.get_access_status(pack, auth).await {
                Ok(snapshot) => (snapshot, None),
                Err(AccessError::AuthRequired) => {
                    tracing::debug!(
                        pack_id = %pack,
                        "credential rejected, access status is anonymous"
                    );
                    (AccessSnapshot::anonymous(), None)
                }
                Err(error) => {
                    tracing::warn!(
                        pack_id = %pack,
                        backend = self.backend.backend_name(),
                        error = %error,
                        "access status unavailable, falling back to preview"
                    );
                    (AccessSnapshot::anonymous(), Some(error))
                }
            }
        };

        let applied = self.cell.replace(pack, snapshot.clone());
        if applied.is_stored() {
            tracing::debug!(
                pack_id = %pack,
                grant = snapshot.grant,
                request = ?snapshot.request_status(),
                "access status stored"
            );
        }
        Some(StatusOutcome {
            snapshot,
            degraded,
            applied,
        })
    }
}
