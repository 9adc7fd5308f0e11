//! # Asset Lock Predicate
//!
//! [`can_consume`] is the only place that decides whether an asset
//! position is consumable. Card grids, the reader's index list and the
//! preview overlay trigger all derive their lock affordances from it,
//! through [`UnlockedView`] and [`slots`].
//!
//! Without a grant only the first `preview_count` positions are
//! consumable; with a grant every position is. The consumable positions
//! therefore always form a prefix of the pack.

use crate::pack::ContentAsset;

/// Number of leading assets visible without a grant.
pub const PREVIEW_COUNT: usize = 2;

/// Whether the asset at `position` may be consumed.
pub fn can_consume(position: usize, grant: bool, preview_count: usize) -> bool {
    grant || position < preview_count
}

/// The consumable prefix of a pack's assets.
#[derive(Debug, Clone, Copy)]
pub struct UnlockedView<'a> {
    all: &'a [ContentAsset],
    unlocked: usize,
    grant: bool,
}

impl<'a> UnlockedView<'a> {
    /// Derive the view for `assets` under the given grant.
    pub fn new(assets: &'a [ContentAsset], grant: bool, preview_count: usize) -> Self {
        let unlocked = (0..assets.len())
            .take_while(|&position| can_consume(position, grant, preview_count))
            .count();
        Self {
            all: assets,
            unlocked,
            grant,
        }
    }

    /// Number of consumable assets.
    pub fn len(&self) -> usize {
        self.unlocked
    }

    /// Whether nothing can be consumed.
    pub fn is_empty(&self) -> bool {
        self.unlocked == 0
    }

    /// Whether the view was derived under a grant.
    pub fn grant(&self) -> bool {
        self.grant
    }

    /// Total assets in the pack, locked or not.
    pub fn total(&self) -> usize {
        self.all.len()
    }

    /// Number of assets hidden behind the lock.
    pub fn locked_count(&self) -> usize {
        self.all.len() - self.unlocked
    }

    /// The consumable assets, in pack order.
    pub fn assets(&self) -> &'a [ContentAsset] {
        &self.all[..self.unlocked]
    }

    /// The consumable asset at `index`, or `None` past the unlocked range.
    pub fn get(&self, index: usize) -> Option<&'a ContentAsset> {
        self.assets().get(index)
    }
}

/// Lock affordance of one asset card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetSlot {
    /// Position in the pack.
    pub position: usize,
    /// Display label (with positional fallback).
    pub label: String,
    /// Location, only exposed for unlocked assets.
    pub location: Option<String>,
    /// Whether the asset may be opened.
    pub unlocked: bool,
}

/// One slot per asset, in pack order. Locked slots never expose a location.
pub fn slots(assets: &[ContentAsset], grant: bool, preview_count: usize) -> Vec<AssetSlot> {
    assets
        .iter()
        .enumerate()
        .map(|(position, asset)| {
            let unlocked = can_consume(position, grant, preview_count);
            AssetSlot {
                position,
                label: asset.display_label(position),
                location: asset.location().filter(|_| unlocked).map(str::to_string),
                unlocked,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn assets(n: usize) -> Vec<ContentAsset> {
        (0..n)
            .map(|i| {
                let location = format!("https://cdn.example/{i}.pdf");
                ContentAsset::new(format!("Chapter {}", i + 1), location)
            })
            .collect()
    }

    #[test]
    fn grant_unlocks_everything() {
        assert!(can_consume(0, true, PREVIEW_COUNT));
        assert!(can_consume(1_000, true, PREVIEW_COUNT));
    }

    #[test]
    fn preview_prefix_without_grant() {
        assert!(can_consume(0, false, 2));
        assert!(can_consume(1, false, 2));
        assert!(!can_consume(2, false, 2));
        assert!(!can_consume(0, false, 0));
    }

    #[test]
    fn view_of_five_without_grant() {
        let list = assets(5);
        let view = UnlockedView::new(&list, false, PREVIEW_COUNT);
        assert_eq!(view.len(), 2);
        assert_eq!(view.locked_count(), 3);
        assert_eq!(view.total(), 5);
        assert!(view.get(1).is_some());
        assert!(view.get(2).is_none());
    }

    #[test]
    fn view_shorter_than_preview() {
        let list = assets(1);
        let view = UnlockedView::new(&list, false, PREVIEW_COUNT);
        assert_eq!(view.len(), 1);
        assert_eq!(view.locked_count(), 0);
    }

    #[test]
    fn empty_pack_view_is_empty() {
        let view = UnlockedView::new(&[], true, PREVIEW_COUNT);
        assert!(view.is_empty());
        assert_eq!(view.locked_count(), 0);
    }

    #[test]
    fn slots_hide_locked_locations() {
        let list = assets(3);
        let cards = slots(&list, false, PREVIEW_COUNT);
        assert_eq!(cards.len(), 3);
        assert!(cards[0].unlocked);
        assert_eq!(cards[1].location.as_deref(), Some("https://cdn.example/1.pdf"));
        assert!(!cards[2].unlocked);
        assert_eq!(cards[2].location, None);
        assert_eq!(cards[2].label, "Chapter 3");
    }

    proptest! {
        /// unlocked = grant ? N : min(N, preview).
        #[test]
        fn unlocked_count_formula(n in 0usize..64, preview in 0usize..8, grant in any::<bool>()) {
            let list = assets(n);
            let view = UnlockedView::new(&list, grant, preview);
            let expected = if grant { n } else { n.min(preview) };
            prop_assert_eq!(view.len(), expected);
            prop_assert_eq!(view.len() + view.locked_count(), n);
        }

        /// Slots and the view agree on which positions are unlocked.
        #[test]
        fn slots_agree_with_view(n in 0usize..32, preview in 0usize..8, grant in any::<bool>()) {
            let list = assets(n);
            let view = UnlockedView::new(&list, grant, preview);
            for slot in slots(&list, grant, preview) {
                prop_assert_eq!(slot.unlocked, slot.position < view.len());
            }
        }
    }
}
