//! # Pack Access Facade
//!
//! Everything a pack page mounts: the loaded pack, the held access state,
//! the reader and the preview overlay, wired to one [`Notifier`].
//!
//! Every method takes `&self`; state lives behind `parking_lot` locks that
//! are never held across an `.await`, so one `Arc<PackAccess>` can serve a
//! refresh and a submission at the same time. The later-resolving call
//! wins. The reader is rebound to the current access state before every
//! reader operation and after every stored access result, which keeps its
//! index inside the unlocked range whatever order results arrive in.
//!
//! Errors never escape: each operation returns an outcome value and relays
//! user-facing text through the notifier.

use std::ops::Range;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use serde::Serialize;

use folio_client::{AccessBackend, CatalogBackend};
use folio_core::{
    can_consume, slots, AccessError, AccessRequest, AccessSnapshot, AssetSlot, AuthContext,
    ContentAsset, ContentPack, PackSlug, UnlockedView, PREVIEW_COUNT,
};
use folio_state::{PreviewOverlay, Reader, ReaderBounds, ReaderError, ReaderMode, ReaderState};

use crate::cell::AccessCell;
use crate::notice::StatusNotice;
use crate::notifier::Notifier;
use crate::requester::EnrollmentRequester;
use crate::resolver::{AccessResolver, StatusOutcome};

/// Shown when the pack lookup fails with `NotFound`.
pub const PACK_NOT_FOUND_MESSAGE: &str = "Pack not found.";
/// Shown when an access request meets a missing credential.
pub const SIGN_IN_MESSAGE: &str = "Sign in to request access to this pack.";
/// Shown when the backend reports an existing grant.
pub const ALREADY_GRANTED_MESSAGE: &str = "Access already active: every document is unlocked.";
/// Fallback confirmation when the backend sends none.
pub const REQUEST_SENT_MESSAGE: &str =
    "Request sent. Access unlocks after an administrator approves it.";
/// Shown when a status check had to fall back to the preview.
pub const STATUS_UNAVAILABLE_MESSAGE: &str =
    "Access status is unavailable right now. Showing the preview; refresh access to retry.";

// -- Outcomes -----------------------------------------------------------------

/// Result of [`PackAccess::load`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The pack is loaded and its access state resolved.
    Loaded { snapshot: AccessSnapshot },
    /// The pack does not exist; the caller should return to the catalog.
    BackToCatalog,
    /// The lookup failed for another reason. Retrying may help.
    Failed(AccessError),
    /// The page was torn down before the pack arrived.
    Unmounted,
}

/// Result of [`PackAccess::request_access`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnrollOutcome {
    /// The user already held a grant. Every asset is unlocked.
    Granted,
    /// A request is on file and waiting for an administrator.
    Requested { request: Option<AccessRequest> },
    /// No credential: the caller should send the user to sign in.
    SignInRequired,
    /// The pack does not accept requests.
    Refused { message: String },
    /// The call failed; nothing changed. Retrying is a new user action.
    Failed { message: String },
    /// No pack is loaded.
    NoPack,
}

/// One entry of the reader's document list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IndexOption {
    pub position: usize,
    pub label: String,
}

// -- In-flight tracking -------------------------------------------------------

struct InFlight<'a>(&'a AtomicUsize);

impl<'a> InFlight<'a> {
    fn enter(counter: &'a AtomicUsize) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(counter)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

// -- PackAccess ---------------------------------------------------------------

/// Access and reading state for one pack page.
pub struct PackAccess {
    catalog: Arc<dyn CatalogBackend>,
    resolver: AccessResolver,
    requester: EnrollmentRequester,
    notifier: Arc<dyn Notifier>,
    cell: AccessCell,
    preview_count: usize,
    pack: RwLock<Option<Arc<ContentPack>>>,
    reader: Mutex<Reader>,
    overlay: Mutex<PreviewOverlay>,
    refreshing: AtomicUsize,
    submitting: AtomicUsize,
}

impl std::fmt::Debug for PackAccess {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let pack = self.pack().map(|p| p.id.clone());
        let reader = self.reader.lock().state();
        f.debug_struct("PackAccess")
            .field("pack", &pack)
            .field("snapshot", &self.cell.snapshot())
            .field("reader", &reader)
            .field("preview_count", &self.preview_count)
            .finish()
    }
}

impl PackAccess {
    pub fn new(
        catalog: Arc<dyn CatalogBackend>,
        access: Arc<dyn AccessBackend>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let cell = AccessCell::new();
        Self {
            catalog,
            resolver: AccessResolver::new(Arc::clone(&access), cell.clone()),
            requester: EnrollmentRequester::new(access, cell.clone()),
            notifier,
            cell,
            preview_count: PREVIEW_COUNT,
            pack: RwLock::new(None),
            reader: Mutex::new(Reader::new(ReaderBounds::default())),
            overlay: Mutex::new(PreviewOverlay::new()),
            refreshing: AtomicUsize::new(0),
            submitting: AtomicUsize::new(0),
        }
    }

    /// Override the number of assets readable without a grant.
    pub fn with_preview_count(mut self, preview_count: usize) -> Self {
        self.preview_count = preview_count;
        self
    }

    pub fn preview_count(&self) -> usize {
        self.preview_count
    }

    // -- Pack & access --------------------------------------------------------

    /// Look up the pack by slug, then resolve the user's access to it.
    ///
    /// Loading resets the reader, the overlay and the held access state.
    pub async fn load(&self, slug: &PackSlug, auth: &AuthContext) -> LoadOutcome {
        let fetched = self.catalog.get_pack(slug, auth).await;
        if !self.cell.is_mounted() {
            tracing::debug!(slug = %slug, "pack lookup settled after teardown, discarded");
            return LoadOutcome::Unmounted;
        }
        let pack = match fetched {
            Ok(pack) => Arc::new(pack),
            Err(AccessError::NotFound { .. }) => {
                tracing::info!(slug = %slug, "pack not found, returning to catalog");
                self.notifier.error(PACK_NOT_FOUND_MESSAGE);
                return LoadOutcome::BackToCatalog;
            }
            Err(error) => {
                tracing::warn!(slug = %slug, error = %error, "pack lookup failed");
                self.notifier.error(&format!("Unable to load the pack: {error}."));
                return LoadOutcome::Failed(error);
            }
        };

        tracing::debug!(pack_id = %pack.id, assets = pack.total_assets(), "pack loaded");
        self.cell.bind(pack.id.clone());
        *self.pack.write() = Some(pack);
        self.reader.lock().close();
        self.overlay.lock().close();
        self.sync_reader();

        let snapshot = self
            .refresh_access(auth)
            .await
            .map(|outcome| outcome.snapshot)
            .unwrap_or_default();
        LoadOutcome::Loaded { snapshot }
    }

    /// The loaded pack.
    pub fn pack(&self) -> Option<Arc<ContentPack>> {
        self.pack.read().clone()
    }

    /// Held access state.
    pub fn snapshot(&self) -> AccessSnapshot {
        self.cell.snapshot()
    }

    pub fn has_grant(&self) -> bool {
        self.cell.grant()
    }

    /// Banner for the held request, if any.
    pub fn status_notice(&self) -> Option<StatusNotice> {
        StatusNotice::for_snapshot(&self.cell.snapshot())
    }

    /// Re-fetch the access state. `None` when no pack is loaded.
    pub async fn refresh_access(&self, auth: &AuthContext) -> Option<StatusOutcome> {
        let pack = self.pack()?;
        let _guard = InFlight::enter(&self.refreshing);
        let outcome = self.resolver.fetch_status(Some(&pack.id), auth).await?;
        if outcome.applied.is_stored() {
            self.sync_reader();
            if outcome.degraded.is_some() {
                self.notifier.warning(STATUS_UNAVAILABLE_MESSAGE);
            }
        }
        Some(outcome)
    }

    /// Submit an access request for the loaded pack.
    pub async fn request_access(&self, contact: Option<&str>, auth: &AuthContext) -> EnrollOutcome {
        let Some(pack) = self.pack() else {
            return EnrollOutcome::NoPack;
        };
        let _guard = InFlight::enter(&self.submitting);
        let result = self.requester.request_access(&pack.id, contact, auth).await;
        if !self.cell.is_mounted() {
            return match result {
                Ok(receipt) if receipt.grant => EnrollOutcome::Granted,
                Ok(receipt) => EnrollOutcome::Requested {
                    request: receipt.request,
                },
                Err(error) => EnrollOutcome::Failed {
                    message: error.to_string(),
                },
            };
        }
        self.sync_reader();

        match result {
            Ok(receipt) if receipt.grant => {
                self.notifier.success(ALREADY_GRANTED_MESSAGE);
                EnrollOutcome::Granted
            }
            Ok(receipt) => {
                self.notifier
                    .success(receipt.message.as_deref().unwrap_or(REQUEST_SENT_MESSAGE));
                EnrollOutcome::Requested {
                    request: receipt.request,
                }
            }
            Err(AccessError::AuthRequired) => {
                self.notifier.warning(SIGN_IN_MESSAGE);
                EnrollOutcome::SignInRequired
            }
            Err(AccessError::Forbidden { message }) => {
                self.notifier.error(&message);
                EnrollOutcome::Refused { message }
            }
            Err(AccessError::NotFound { what }) => {
                let message = format!("Unable to send the access request: {what} not found.");
                self.notifier.error(&message);
                EnrollOutcome::Failed { message }
            }
            Err(AccessError::Transient { message }) => {
                let message = format!("Unable to send the access request ({message}).");
                self.notifier.error(&message);
                EnrollOutcome::Failed { message }
            }
        }
    }

    pub fn is_refreshing(&self) -> bool {
        self.refreshing.load(Ordering::SeqCst) > 0
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting.load(Ordering::SeqCst) > 0
    }

    /// Tear down: results of calls still in flight are dropped.
    pub fn unmount(&self) {
        self.cell.detach();
        tracing::debug!("pack access unmounted");
    }

    // -- Lock affordances -----------------------------------------------------

    /// One card per asset, with locked cards hiding their location.
    pub fn slots(&self) -> Vec<AssetSlot> {
        let grant = self.cell.grant();
        self.pack()
            .map(|pack| slots(&pack.assets, grant, self.preview_count))
            .unwrap_or_default()
    }

    /// Number of assets the user may open.
    pub fn unlocked_count(&self) -> usize {
        self.bounds().unlocked()
    }

    /// Number of assets behind the lock.
    pub fn locked_count(&self) -> usize {
        let grant = self.cell.grant();
        self.pack()
            .map(|pack| UnlockedView::new(&pack.assets, grant, self.preview_count).locked_count())
            .unwrap_or(0)
    }

    // -- Reader ---------------------------------------------------------------

    pub fn reader_state(&self) -> ReaderState {
        self.with_reader(|reader| reader.state())
    }

    /// Open the reader at `index`. Refusals are relayed as warnings.
    pub fn open_reader(&self, mode: ReaderMode, index: usize) -> Result<ReaderState, ReaderError> {
        let result = self.with_reader(|reader| reader.open(mode, index));
        self.relay(result)
    }

    /// Open at the first asset: continuous with a grant, single otherwise.
    pub fn open_reader_default(&self) -> Result<ReaderState, ReaderError> {
        let mode = if self.cell.grant() {
            ReaderMode::Continuous
        } else {
            ReaderMode::Single
        };
        self.open_reader(mode, 0)
    }

    /// Open single mode at a card's position.
    pub fn open_from_card(&self, position: usize) -> Result<ReaderState, ReaderError> {
        self.open_reader(ReaderMode::Single, position)
    }

    pub fn navigate(&self, delta: isize) -> Result<usize, ReaderError> {
        let result = self.with_reader(|reader| reader.navigate(delta));
        self.relay(result)
    }

    pub fn next(&self) -> Result<usize, ReaderError> {
        self.navigate(1)
    }

    pub fn previous(&self) -> Result<usize, ReaderError> {
        self.navigate(-1)
    }

    pub fn jump(&self, target: usize) -> Result<usize, ReaderError> {
        let result = self.with_reader(|reader| reader.jump(target));
        self.relay(result)
    }

    pub fn switch_mode(&self, mode: ReaderMode) -> Result<ReaderState, ReaderError> {
        let result = self.with_reader(|reader| reader.switch_mode(mode));
        self.relay(result)
    }

    pub fn close_reader(&self) -> bool {
        self.reader.lock().close()
    }

    pub fn has_previous(&self) -> bool {
        self.with_reader(|reader| reader.has_previous())
    }

    pub fn has_next(&self) -> bool {
        self.with_reader(|reader| reader.has_next())
    }

    /// Position and label of every unlocked asset.
    pub fn index_options(&self) -> Vec<IndexOption> {
        let grant = self.cell.grant();
        let Some(pack) = self.pack() else {
            return Vec::new();
        };
        UnlockedView::new(&pack.assets, grant, self.preview_count)
            .assets()
            .iter()
            .enumerate()
            .map(|(position, asset)| IndexOption {
                position,
                label: asset.display_label(position),
            })
            .collect()
    }

    /// Assets on screen, in order, with their positions.
    pub fn visible_assets(&self) -> Vec<(usize, ContentAsset)> {
        let positions: Range<usize> = self.with_reader(|reader| reader.visible_positions());
        let grant = self.cell.grant();
        let Some(pack) = self.pack() else {
            return Vec::new();
        };
        let view = UnlockedView::new(&pack.assets, grant, self.preview_count);
        positions
            .filter_map(|position| view.get(position).map(|asset| (position, asset.clone())))
            .collect()
    }

    /// The asset under the single-mode cursor.
    pub fn current_asset(&self) -> Option<ContentAsset> {
        let state = self.reader_state();
        match state {
            ReaderState::Open {
                mode: ReaderMode::Single,
                ..
            } => self.visible_assets().into_iter().next().map(|(_, asset)| asset),
            _ => None,
        }
    }

    // -- Preview overlay ------------------------------------------------------

    /// Show the asset at `position` in the overlay, if it may be consumed.
    pub fn open_preview(&self, position: usize) -> bool {
        let Some(pack) = self.pack() else {
            return false;
        };
        let Some(asset) = pack.assets.get(position) else {
            return false;
        };
        if !can_consume(position, self.cell.grant(), self.preview_count) {
            self.notifier
                .warning("This document is locked. Request access to unlock the whole pack.");
            return false;
        }
        let Some(location) = asset.location() else {
            self.notifier.warning("This document has no file attached.");
            return false;
        };
        self.overlay.lock().open(location, asset.display_label(position));
        true
    }

    pub fn close_preview(&self) {
        self.overlay.lock().close();
    }

    pub fn preview(&self) -> PreviewOverlay {
        self.overlay.lock().clone()
    }

    // -- Internals ------------------------------------------------------------

    fn bounds(&self) -> ReaderBounds {
        let grant = self.cell.grant();
        match self.pack.read().as_deref() {
            Some(pack) => {
                let view = UnlockedView::new(&pack.assets, grant, self.preview_count);
                ReaderBounds::from_view(&view)
            }
            None => ReaderBounds::new(0, grant),
        }
    }

    fn with_reader<R>(&self, f: impl FnOnce(&mut Reader) -> R) -> R {
        let bounds = self.bounds();
        let mut reader = self.reader.lock();
        if reader.rebind(bounds) {
            tracing::debug!(state = ?reader.state(), "reader re-derived under new access state");
        }
        f(&mut reader)
    }

    fn sync_reader(&self) {
        self.with_reader(|_| ());
    }

    fn relay<T>(&self, result: Result<T, ReaderError>) -> Result<T, ReaderError> {
        if let Err(error) = &result {
            match error {
                ReaderError::NothingToRead
                | ReaderError::ContinuousRequiresGrant
                | ReaderError::NotSingleMode { .. } => self.notifier.warning(&error.to_string()),
                _ => tracing::debug!(error = %error, "reader transition refused"),
            }
        }
        result
    }
}
