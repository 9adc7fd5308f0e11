//! # Reader State Machine
//!
//! Bounded navigation over the unlocked assets of a pack.
//!
//! ## States
//!
//! ```text
//!            open(mode, i)                 navigate(d) / jump(t)   (single only)
//! Closed ─────────────────▶ Open(mode, i) ◀──────────────┐
//!   ▲                         │    │                     │
//!   └────────── close() ──────┘    └─────────────────────┘
//!                                  switch_mode(m)
//! ```
//!
//! ## Guarantees
//!
//! - `0 <= index < bounds.unlocked` in every `Open` state.
//! - `Continuous` is only reachable when the bounds carry a grant.
//! - Out-of-range navigation clamps; there is no wraparound.
//! - `close()` discards the index. Every `open()` starts from the index
//!   passed by the caller.
//!
//! The reader holds its [`ReaderBounds`]. When the access state of the pack
//! changes, [`Reader::rebind`] re-derives the state under the new bounds so
//! the guarantees keep holding.

use std::ops::Range;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use folio_core::UnlockedView;

// ─── Mode & State ────────────────────────────────────────────────────

/// Consumption mode of an open reader.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReaderMode {
    /// One asset at a time with previous/next/jump navigation.
    Single,
    /// Every unlocked asset in one scroll. Requires a grant.
    Continuous,
}

impl std::fmt::Display for ReaderMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Single => "single",
            Self::Continuous => "continuous",
        })
    }
}

/// Observable reader state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum ReaderState {
    Closed,
    Open { mode: ReaderMode, index: usize },
}

/// The range the reader may address: how many assets are unlocked, and
/// whether the user holds a grant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ReaderBounds {
    unlocked: usize,
    grant: bool,
}

impl ReaderBounds {
    pub fn new(unlocked: usize, grant: bool) -> Self {
        Self { unlocked, grant }
    }

    /// Bounds of an unlocked-asset view.
    pub fn from_view(view: &UnlockedView<'_>) -> Self {
        Self::new(view.len(), view.grant())
    }

    pub fn unlocked(&self) -> usize {
        self.unlocked
    }

    pub fn grant(&self) -> bool {
        self.grant
    }

    /// Highest addressable index, or `None` when nothing is unlocked.
    pub fn last_index(&self) -> Option<usize> {
        self.unlocked.checked_sub(1)
    }

    /// Whether `mode` may be used under these bounds.
    pub fn permits(&self, mode: ReaderMode) -> bool {
        match mode {
            ReaderMode::Single => true,
            ReaderMode::Continuous => self.grant,
        }
    }

    fn clamp(&self, index: i128) -> Option<usize> {
        let last = self.last_index()?;
        // Bounded by `last`, which is a usize.
        Some(index.clamp(0, last as i128) as usize)
    }
}

// ─── Errors ──────────────────────────────────────────────────────────

/// A refused reader transition. State is unchanged whenever one is returned.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReaderError {
    /// No asset is unlocked, so there is nothing to open.
    #[error("nothing to read: no document is available")]
    NothingToRead,

    /// Continuous mode was requested without a grant.
    #[error("limited access: unlock the pack to read every document continuously")]
    ContinuousRequiresGrant,

    /// `open` was called on an open reader.
    #[error("reader is already open")]
    AlreadyOpen,

    /// The operation needs an open reader.
    #[error("reader is not open")]
    NotOpen,

    /// Index navigation is only available in single mode.
    #[error("navigation requires single mode, reader is in {mode} mode")]
    NotSingleMode {
        /// The current mode.
        mode: ReaderMode,
    },
}

// ─── Reader ──────────────────────────────────────────────────────────

/// Reader session over the unlocked prefix of one pack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reader {
    state: ReaderState,
    bounds: ReaderBounds,
}

impl Reader {
    /// A closed reader bounded by `bounds`.
    pub fn new(bounds: ReaderBounds) -> Self {
        Self {
            state: ReaderState::Closed,
            bounds,
        }
    }

    pub fn state(&self) -> ReaderState {
        self.state
    }

    pub fn bounds(&self) -> ReaderBounds {
        self.bounds
    }

    pub fn is_open(&self) -> bool {
        matches!(self.state, ReaderState::Open { .. })
    }

    /// Current mode, if open.
    pub fn mode(&self) -> Option<ReaderMode> {
        match self.state {
            ReaderState::Open { mode, .. } => Some(mode),
            ReaderState::Closed => None,
        }
    }

    /// Current index into the unlocked assets, if open.
    pub fn index(&self) -> Option<usize> {
        match self.state {
            ReaderState::Open { index, .. } => Some(index),
            ReaderState::Closed => None,
        }
    }

    /// Open the reader (Closed → Open). The index is clamped into range.
    pub fn open(&mut self, mode: ReaderMode, requested: usize) -> Result<ReaderState, ReaderError> {
        if self.is_open() {
            return Err(ReaderError::AlreadyOpen);
        }
        let index = self
            .bounds
            .clamp(requested as i128)
            .ok_or(ReaderError::NothingToRead)?;
        if !self.bounds.permits(mode) {
            return Err(ReaderError::ContinuousRequiresGrant);
        }
        self.state = ReaderState::Open { mode, index };
        Ok(self.state)
    }

    /// Move by `delta` positions in single mode. Past either end the index
    /// stays at the bound.
    pub fn navigate(&mut self, delta: isize) -> Result<usize, ReaderError> {
        let current = self.require_single()?;
        self.set_index(current as i128 + delta as i128)
    }

    /// Go to `target` in single mode, clamped into range.
    pub fn jump(&mut self, target: usize) -> Result<usize, ReaderError> {
        self.require_single()?;
        self.set_index(target as i128)
    }

    /// Change mode while open. Refused without a grant for `Continuous`.
    pub fn switch_mode(&mut self, mode: ReaderMode) -> Result<ReaderState, ReaderError> {
        let ReaderState::Open { index, .. } = self.state else {
            return Err(ReaderError::NotOpen);
        };
        if !self.bounds.permits(mode) {
            return Err(ReaderError::ContinuousRequiresGrant);
        }
        self.state = ReaderState::Open { mode, index };
        Ok(self.state)
    }

    /// Close the reader, discarding the index. Returns whether it was open.
    pub fn close(&mut self) -> bool {
        let was_open = self.is_open();
        self.state = ReaderState::Closed;
        was_open
    }

    /// Adopt new bounds, re-deriving an open state under them.
    ///
    /// The index is re-clamped, `Continuous` falls back to `Single` when the
    /// grant is gone, and an empty range closes the reader. Returns whether
    /// the state changed.
    pub fn rebind(&mut self, bounds: ReaderBounds) -> bool {
        self.bounds = bounds;
        let ReaderState::Open { mode, index } = self.state else {
            return false;
        };
        let next = match bounds.clamp(index as i128) {
            None => ReaderState::Closed,
            Some(index) => {
                let mode = if bounds.permits(mode) {
                    mode
                } else {
                    ReaderMode::Single
                };
                ReaderState::Open { mode, index }
            }
        };
        let changed = next != self.state;
        self.state = next;
        changed
    }

    /// Whether a previous asset exists in single mode.
    pub fn has_previous(&self) -> bool {
        matches!(
            self.state,
            ReaderState::Open { mode: ReaderMode::Single, index } if index > 0
        )
    }

    /// Whether a next asset exists in single mode.
    pub fn has_next(&self) -> bool {
        match self.state {
            ReaderState::Open {
                mode: ReaderMode::Single,
                index,
            } => index + 1 < self.bounds.unlocked,
            _ => false,
        }
    }

    /// Positions currently on screen: the current index in single mode,
    /// every unlocked position in continuous mode, nothing when closed.
    pub fn visible_positions(&self) -> Range<usize> {
        match self.state {
            ReaderState::Closed => 0..0,
            ReaderState::Open {
                mode: ReaderMode::Single,
                index,
            } => index..index + 1,
            ReaderState::Open {
                mode: ReaderMode::Continuous,
                ..
            } => 0..self.bounds.unlocked,
        }
    }

    fn require_single(&self) -> Result<usize, ReaderError> {
        match self.state {
            ReaderState::Closed => Err(ReaderError::NotOpen),
            ReaderState::Open {
                mode: ReaderMode::Single,
                index,
            } => Ok(index),
            ReaderState::Open { mode, .. } => Err(ReaderError::NotSingleMode { mode }),
        }
    }

    fn set_index(&mut self, target: i128) -> Result<usize, ReaderError> {
        let index = self.bounds.clamp(target).ok_or(ReaderError::NothingToRead)?;
        self.state = ReaderState::Open {
            mode: ReaderMode::Single,
            index,
        };
        Ok(index)
    }
}

// ─── Tests ───────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use folio_core::{ContentAsset, PREVIEW_COUNT};
    use proptest::prelude::*;

    fn pack_assets(n: usize) -> Vec<ContentAsset> {
        (0..n)
            .map(|i| {
                ContentAsset::new(format!("PDF {}", i + 1), format!("https://cdn.example/{i}.pdf"))
            })
            .collect()
    }

    fn reader_for(n: usize, grant: bool) -> Reader {
        let assets = pack_assets(n);
        let view = UnlockedView::new(&assets, grant, PREVIEW_COUNT);
        Reader::new(ReaderBounds::from_view(&view))
    }

    fn open_single(index: usize) -> ReaderState {
        ReaderState::Open {
            mode: ReaderMode::Single,
            index,
        }
    }

    // ── Open ─────────────────────────────────────────────────────────

    #[test]
    fn open_clamps_to_unlocked_range_without_grant() {
        let mut reader = reader_for(5, false);
        let state = reader.open(ReaderMode::Single, 4).unwrap();
        assert_eq!(state, open_single(1));
    }

    #[test]
    fn open_continuous_refused_without_grant() {
        let mut reader = reader_for(5, false);
        assert_eq!(
            reader.open(ReaderMode::Continuous, 0),
            Err(ReaderError::ContinuousRequiresGrant)
        );
        assert_eq!(reader.state(), ReaderState::Closed);
    }

    #[test]
    fn open_continuous_with_grant() {
        let mut reader = reader_for(5, true);
        let state = reader.open(ReaderMode::Continuous, 3).unwrap();
        assert_eq!(
            state,
            ReaderState::Open {
                mode: ReaderMode::Continuous,
                index: 3
            }
        );
        assert_eq!(reader.visible_positions(), 0..5);
    }

    #[test]
    fn open_empty_pack_reports_nothing_to_read() {
        let mut reader = reader_for(0, true);
        assert_eq!(reader.open(ReaderMode::Single, 0), Err(ReaderError::NothingToRead));
        assert!(!reader.is_open());
    }

    #[test]
    fn open_twice_refused() {
        let mut reader = reader_for(3, true);
        reader.open(ReaderMode::Single, 2).unwrap();
        assert_eq!(reader.open(ReaderMode::Single, 0), Err(ReaderError::AlreadyOpen));
        assert_eq!(reader.index(), Some(2));
    }

    // ── Navigate / Jump ──────────────────────────────────────────────

    #[test]
    fn navigate_stops_at_bounds() {
        let mut reader = reader_for(3, true);
        reader.open(ReaderMode::Single, 0).unwrap();
        assert_eq!(reader.navigate(-1), Ok(0));
        assert_eq!(reader.navigate(1), Ok(1));
        assert_eq!(reader.navigate(1), Ok(2));
        assert_eq!(reader.navigate(1), Ok(2));
        assert_eq!(reader.navigate(isize::MIN), Ok(0));
    }

    #[test]
    fn navigate_requires_open_single() {
        let mut reader = reader_for(3, true);
        assert_eq!(reader.navigate(1), Err(ReaderError::NotOpen));
        reader.open(ReaderMode::Continuous, 1).unwrap();
        assert_eq!(
            reader.navigate(1),
            Err(ReaderError::NotSingleMode {
                mode: ReaderMode::Continuous
            })
        );
        assert_eq!(reader.index(), Some(1));
    }

    #[test]
    fn jump_clamps() {
        let mut reader = reader_for(5, false);
        reader.open(ReaderMode::Single, 0).unwrap();
        assert_eq!(reader.jump(4), Ok(1));
        assert_eq!(reader.jump(0), Ok(0));
    }

    // ── Switch mode ──────────────────────────────────────────────────

    #[test]
    fn switch_to_continuous_refused_without_grant() {
        let mut reader = reader_for(5, false);
        reader.open(ReaderMode::Single, 0).unwrap();
        assert_eq!(
            reader.switch_mode(ReaderMode::Continuous),
            Err(ReaderError::ContinuousRequiresGrant)
        );
        assert_eq!(reader.state(), open_single(0));
    }

    #[test]
    fn switch_mode_keeps_index() {
        let mut reader = reader_for(4, true);
        reader.open(ReaderMode::Single, 2).unwrap();
        reader.switch_mode(ReaderMode::Continuous).unwrap();
        let state = reader.switch_mode(ReaderMode::Single).unwrap();
        assert_eq!(state, open_single(2));
    }

    #[test]
    fn switch_mode_requires_open() {
        let mut reader = reader_for(4, true);
        assert_eq!(reader.switch_mode(ReaderMode::Single), Err(ReaderError::NotOpen));
    }

    // ── Close ────────────────────────────────────────────────────────

    #[test]
    fn close_discards_index() {
        let mut reader = reader_for(4, true);
        reader.open(ReaderMode::Single, 3).unwrap();
        assert!(reader.close());
        assert!(!reader.close());
        assert_eq!(reader.open(ReaderMode::Single, 0).unwrap(), open_single(0));
    }

    // ── Rebind ───────────────────────────────────────────────────────

    #[test]
    fn rebind_after_grant_loss_downgrades_and_clamps() {
        let mut reader = reader_for(5, true);
        reader.open(ReaderMode::Continuous, 4).unwrap();
        assert!(reader.rebind(ReaderBounds::new(2, false)));
        assert_eq!(reader.state(), open_single(1));
    }

    #[test]
    fn rebind_after_grant_gain_keeps_position() {
        let mut reader = reader_for(5, false);
        reader.open(ReaderMode::Single, 1).unwrap();
        assert!(!reader.rebind(ReaderBounds::new(5, true)));
        assert_eq!(reader.state(), open_single(1));
        assert_eq!(reader.navigate(3), Ok(4));
    }

    #[test]
    fn rebind_to_empty_closes() {
        let mut reader = reader_for(2, false);
        reader.open(ReaderMode::Single, 1).unwrap();
        assert!(reader.rebind(ReaderBounds::new(0, false)));
        assert!(!reader.is_open());
    }

    // ── Affordances ──────────────────────────────────────────────────

    #[test]
    fn previous_next_affordances() {
        let mut reader = reader_for(3, true);
        assert!(!reader.has_previous());
        assert!(!reader.has_next());
        reader.open(ReaderMode::Single, 0).unwrap();
        assert!(!reader.has_previous());
        assert!(reader.has_next());
        reader.jump(2).unwrap();
        assert!(reader.has_previous());
        assert!(!reader.has_next());
        assert_eq!(reader.visible_positions(), 2..3);
    }

    #[test]
    fn state_serializes_with_tag() {
        let json = serde_json::to_value(open_single(1)).unwrap();
        assert_eq!(json, serde_json::json!({ "state": "open", "mode": "single", "index": 1 }));
    }

    // ── Properties ───────────────────────────────────────────────────

    proptest! {
        /// Any sequence of navigations keeps the index in range.
        #[test]
        fn navigation_stays_in_range(
            n in 1usize..40,
            grant in any::<bool>(),
            start in any::<usize>(),
            deltas in prop::collection::vec(any::<isize>(), 0..32),
        ) {
            let mut reader = reader_for(n, grant);
            let unlocked = reader.bounds().unlocked();
            reader.open(ReaderMode::Single, start).unwrap();
            for delta in deltas {
                let index = reader.navigate(delta).unwrap();
                prop_assert!(index < unlocked);
            }
        }

        /// Without a grant, continuous mode is unreachable.
        #[test]
        fn continuous_unreachable_without_grant(n in 0usize..40, start in any::<usize>()) {
            let mut reader = reader_for(n, false);
            prop_assert!(reader.open(ReaderMode::Continuous, start).is_err());
            if reader.open(ReaderMode::Single, start).is_ok() {
                prop_assert!(reader.switch_mode(ReaderMode::Continuous).is_err());
                prop_assert_eq!(reader.mode(), Some(ReaderMode::Single));
            }
        }

        /// Rebinding never leaves the index outside the new range.
        #[test]
        fn rebind_keeps_invariant(
            before in 1usize..40,
            after in 0usize..40,
            grant_after in any::<bool>(),
            start in any::<usize>(),
        ) {
            let mut reader = Reader::new(ReaderBounds::new(before, true));
            reader.open(ReaderMode::Continuous, start).unwrap();
            reader.rebind(ReaderBounds::new(after, grant_after));
            match reader.state() {
                ReaderState::Closed => prop_assert_eq!(after, 0),
                ReaderState::Open { mode, index } => {
                    prop_assert!(index < after);
                    prop_assert!(grant_after || mode == ReaderMode::Single);
                }
            }
        }
    }
}
