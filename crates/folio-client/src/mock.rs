//! # In-Memory Backend
//!
//! Implements [`CatalogBackend`] and [`AccessBackend`] against in-memory
//! state that follows the platform's server semantics:
//!
//! - Status and enrollment require a credential (401 otherwise).
//! - Enrollment on an unpublished pack is forbidden.
//! - Enrollment when a grant exists reports it and creates nothing.
//! - Requests are keyed by (user, pack): a pending request is returned
//!   as-is, a rejected or cancelled one is reopened as pending.
//! - Administrator actions (`approve`, `reject`, `cancel`) happen out of
//!   band, as on the real platform.
//!
//! Failures can be injected for the next call, and status calls can be held
//! behind a gate to exercise in-flight races.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::Notify;

use folio_core::{
    AccessError, AccessRequest, AccessSnapshot, AuthContext, ContentPack, EnrollmentReceipt, PackId,
    PackSlug, RequestId, RequestStatus, Timestamp,
};

use crate::backend::{AccessBackend, CatalogBackend};

/// Confirmation returned when a request is created or reopened.
pub const REQUEST_SENT_MESSAGE: &str =
    "Request sent. Access unlocks once an administrator approves it.";

/// Confirmation returned when the user already holds a grant.
pub const ALREADY_GRANTED_MESSAGE: &str = "Access already active.";

type UserKey = String;

#[derive(Debug, Default)]
struct MockState {
    packs: HashMap<PackId, ContentPack>,
    grants: HashMap<(UserKey, PackId), bool>,
    requests: HashMap<(UserKey, PackId), AccessRequest>,
    next_request: u64,
    fail_next_status: Option<AccessError>,
    fail_next_submit: Option<AccessError>,
    status_gate: Option<Arc<Notify>>,
}

impl MockState {
    fn pack_by_slug(&self, slug: &PackSlug) -> Option<&ContentPack> {
        self.packs
            .values()
            .find(|p| p.slug.as_ref() == Some(slug) || p.id.as_str() == slug.as_str())
    }

    fn is_granted(&self, key: &(UserKey, PackId)) -> bool {
        self.grants.get(key).copied().unwrap_or(false)
    }
}

/// In-memory platform backend.
#[derive(Debug, Default, Clone)]
pub struct MockBackend {
    state: Arc<Mutex<MockState>>,
    status_calls: Arc<AtomicUsize>,
    submit_calls: Arc<AtomicUsize>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a pack in the catalog.
    pub fn with_pack(self, pack: ContentPack) -> Self {
        self.insert_pack(pack);
        self
    }

    /// Register or replace a pack. It is reachable by slug, or by id when
    /// it has no slug.
    pub fn insert_pack(&self, pack: ContentPack) {
        self.state.lock().packs.insert(pack.id.clone(), pack);
    }

    /// Give `user` a permanent grant on `pack` (e.g. a purchase recorded elsewhere).
    pub fn grant(&self, user: &AuthContext, pack: &PackId) {
        if let Some(key) = key_for(user, pack) {
            self.state.lock().grants.insert(key, true);
        }
    }

    /// Approve the user's request: the request becomes `approved` and a
    /// grant is recorded.
    pub fn approve(&self, user: &AuthContext, pack: &PackId) -> bool {
        let Some(key) = key_for(user, pack) else {
            return false;
        };
        let mut state = self.state.lock();
        let Some(request) = state.requests.get_mut(&key) else {
            return false;
        };
        request.status = RequestStatus::Approved;
        request.approved_at = Some(Timestamp::now());
        state.grants.insert(key, true);
        true
    }

    /// Reject the user's request with an optional note.
    pub fn reject(&self, user: &AuthContext, pack: &PackId, note: Option<&str>) -> bool {
        self.set_status(user, pack, RequestStatus::Rejected, note)
    }

    /// Cancel the user's request.
    pub fn cancel(&self, user: &AuthContext, pack: &PackId) -> bool {
        self.set_status(user, pack, RequestStatus::Cancelled, None)
    }

    /// Make the next status call fail with `error`.
    pub fn fail_next_status(&self, error: AccessError) {
        self.state.lock().fail_next_status = Some(error);
    }

    /// Make the next enrollment call fail with `error`.
    pub fn fail_next_submit(&self, error: AccessError) {
        self.state.lock().fail_next_submit = Some(error);
    }

    /// Hold status calls until the returned gate is notified. The response
    /// is computed after release.
    pub fn hold_status(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        self.state.lock().status_gate = Some(Arc::clone(&gate));
        gate
    }

    /// Stop holding status calls.
    pub fn release_status(&self) {
        self.state.lock().status_gate = None;
    }

    /// Number of status calls received.
    pub fn status_calls(&self) -> usize {
        self.status_calls.load(Ordering::SeqCst)
    }

    /// Number of enrollment calls received.
    pub fn submit_calls(&self) -> usize {
        self.submit_calls.load(Ordering::SeqCst)
    }

    /// Requests on file for `pack`, across users.
    pub fn requests_for(&self, pack: &PackId) -> Vec<AccessRequest> {
        self.state
            .lock()
            .requests
            .iter()
            .filter(|((_, p), _)| p == pack)
            .map(|(_, r)| r.clone())
            .collect()
    }

    fn set_status(
        &self,
        user: &AuthContext,
        pack: &PackId,
        status: RequestStatus,
        note: Option<&str>,
    ) -> bool {
        let Some(key) = key_for(user, pack) else {
            return false;
        };
        let mut state = self.state.lock();
        match state.requests.get_mut(&key) {
            Some(request) => {
                request.status = status;
                request.admin_note = note.map(str::to_string);
                true
            }
            None => false,
        }
    }
}

fn key_for(user: &AuthContext, pack: &PackId) -> Option<(UserKey, PackId)> {
    user.bearer_token()
        .map(|token| (token.to_string(), pack.clone()))
}

#[async_trait]
impl CatalogBackend for MockBackend {
    async fn get_pack(
        &self,
        slug: &PackSlug,
        _auth: &AuthContext,
    ) -> Result<ContentPack, AccessError> {
        self.state
            .lock()
            .pack_by_slug(slug)
            .cloned()
            .ok_or_else(|| AccessError::NotFound { what: "pack".into() })
    }
}

#[async_trait]
impl AccessBackend for MockBackend {
    async fn get_access_status(
        &self,
        pack: &PackId,
        auth: &AuthContext,
    ) -> Result<AccessSnapshot, AccessError> {
        self.status_calls.fetch_add(1, Ordering::SeqCst);
        let gate = self.state.lock().status_gate.clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }

        let mut state = self.state.lock();
        if let Some(error) = state.fail_next_status.take() {
            return Err(error);
        }
        let key = key_for(auth, pack).ok_or(AccessError::AuthRequired)?;
        if !state.packs.contains_key(pack) {
            return Err(AccessError::NotFound { what: "pack".into() });
        }
        Ok(AccessSnapshot {
            grant: state.is_granted(&key),
            request: state.requests.get(&key).cloned(),
        })
    }

    async fn submit_access_request(
        &self,
        pack: &PackId,
        contact: Option<&str>,
        auth: &AuthContext,
    ) -> Result<EnrollmentReceipt, AccessError> {
        self.submit_calls.fetch_add(1, Ordering::SeqCst);

        let mut state = self.state.lock();
        if let Some(error) = state.fail_next_submit.take() {
            return Err(error);
        }
        let key = key_for(auth, pack).ok_or(AccessError::AuthRequired)?;
        match state.packs.get(pack) {
            None => return Err(AccessError::NotFound { what: "pack".into() }),
            Some(p) if !p.is_published() => {
                return Err(AccessError::Forbidden {
                    message: "This pack is not open for access requests.".into(),
                })
            }
            Some(_) => {}
        }

        if state.is_granted(&key) {
            return Ok(EnrollmentReceipt {
                grant: true,
                request: None,
                message: Some(ALREADY_GRANTED_MESSAGE.into()),
            });
        }

        let contact = contact.map(str::trim).filter(|c| !c.is_empty()).map(str::to_string);

        let request = match state.requests.get_mut(&key) {
            Some(existing) if existing.status.is_pending() => {
                if contact.is_some() {
                    existing.contact_handle = contact;
                }
                existing.clone()
            }
            Some(existing) => {
                existing.status = RequestStatus::Pending;
                existing.created_at = Timestamp::now();
                existing.approved_at = None;
                existing.admin_note = None;
                existing.contact_handle = contact;
                existing.clone()
            }
            None => {
                state.next_request += 1;
                let id = format!("req-{:04}", state.next_request);
                let request = AccessRequest {
                    id: RequestId::new(id).map_err(|e| AccessError::transient(e.to_string()))?,
                    status: RequestStatus::Pending,
                    created_at: Timestamp::now(),
                    approved_at: None,
                    admin_note: None,
                    contact_handle: contact,
                };
                state.requests.insert(key, request.clone());
                request
            }
        };

        Ok(EnrollmentReceipt {
            grant: false,
            request: Some(request),
            message: Some(REQUEST_SENT_MESSAGE.into()),
        })
    }

    fn backend_name(&self) -> &str {
        "mock"
    }
}
