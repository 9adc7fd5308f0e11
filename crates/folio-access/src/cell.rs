//! # Access Cell
//!
//! The per-pack `{grant, request}` tuple shared by the resolver and the
//! requester. Writes replace the whole snapshot under one lock, so a reader
//! never observes a grant from one response paired with a request from
//! another.
//!
//! A cell is bound to at most one pack at a time and can be detached when
//! its owner goes away. Writes for another pack, or after detaching, are
//! dropped and reported as [`Applied::Discarded`].

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;

use folio_core::{AccessSnapshot, PackId};

/// Whether a write reached the cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    Stored,
    Discarded,
}

impl Applied {
    pub fn is_stored(self) -> bool {
        self == Self::Stored
    }
}

#[derive(Debug, Default)]
struct Slot {
    pack: Option<PackId>,
    snapshot: AccessSnapshot,
}

/// Cloneable handle to one shared access tuple.
#[derive(Debug, Clone)]
pub struct AccessCell {
    slot: Arc<RwLock<Slot>>,
    mounted: Arc<AtomicBool>,
}

impl Default for AccessCell {
    fn default() -> Self {
        Self::new()
    }
}

impl AccessCell {
    /// A mounted, unbound cell holding the anonymous default.
    pub fn new() -> Self {
        Self {
            slot: Arc::new(RwLock::new(Slot::default())),
            mounted: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Current snapshot.
    pub fn snapshot(&self) -> AccessSnapshot {
        self.slot.read().snapshot.clone()
    }

    /// Current grant.
    pub fn grant(&self) -> bool {
        self.slot.read().snapshot.grant
    }

    /// Pack the cell is bound to.
    pub fn pack(&self) -> Option<PackId> {
        self.slot.read().pack.clone()
    }

    /// Bind to `pack`, resetting the snapshot to the anonymous default.
    pub fn bind(&self, pack: PackId) {
        let mut slot = self.slot.write();
        slot.pack = Some(pack);
        slot.snapshot = AccessSnapshot::anonymous();
    }

    /// Replace the snapshot held for `pack`.
    pub fn replace(&self, pack: &PackId, snapshot: AccessSnapshot) -> Applied {
        if !self.is_mounted() {
            tracing::debug!(pack_id = %pack, "access result arrived after teardown, discarded");
            return Applied::Discarded;
        }
        let mut slot = self.slot.write();
        match &slot.pack {
            Some(bound) if bound != pack => {
                tracing::debug!(
                    pack_id = %pack,
                    bound = %bound,
                    "access result for another pack, discarded"
                );
                Applied::Discarded
            }
            _ => {
                slot.snapshot = snapshot;
                Applied::Stored
            }
        }
    }

    /// Stop accepting writes. Irreversible.
    pub fn detach(&self) {
        self.mounted.store(false, Ordering::SeqCst);
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pack(id: &str) -> PackId {
        PackId::new(id).unwrap()
    }

    #[test]
    fn starts_anonymous() {
        let cell = AccessCell::new();
        assert_eq!(cell.snapshot(), AccessSnapshot::anonymous());
        assert!(cell.is_mounted());
        assert_eq!(cell.pack(), None);
    }

    #[test]
    fn replace_is_whole_tuple() {
        let cell = AccessCell::new();
        cell.bind(pack("p1"));
        assert!(cell.replace(&pack("p1"), AccessSnapshot::granted()).is_stored());
        assert!(cell.grant());
        assert!(cell.replace(&pack("p1"), AccessSnapshot::anonymous()).is_stored());
        assert_eq!(cell.snapshot(), AccessSnapshot::anonymous());
    }

    #[test]
    fn other_pack_is_discarded() {
        let cell = AccessCell::new();
        cell.bind(pack("p1"));
        assert_eq!(cell.replace(&pack("p2"), AccessSnapshot::granted()), Applied::Discarded);
        assert!(!cell.grant());
    }

    #[test]
    fn detached_cell_drops_writes() {
        let cell = AccessCell::new();
        let handle = cell.clone();
        cell.detach();
        assert_eq!(handle.replace(&pack("p1"), AccessSnapshot::granted()), Applied::Discarded);
        assert!(!handle.grant());
    }

    #[test]
    fn rebinding_resets_state() {
        let cell = AccessCell::new();
        cell.bind(pack("p1"));
        cell.replace(&pack("p1"), AccessSnapshot::granted());
        cell.bind(pack("p2"));
        assert_eq!(cell.snapshot(), AccessSnapshot::anonymous());
    }
}
