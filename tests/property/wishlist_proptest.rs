//! Property-based tests for wishlist toggling

use crate::common::*;
use marketsync::client::{OptimisticMutator, SessionCredentials, WishlistStore};
use marketsync::shared::{ListingId, WishlistSet};
use proptest::prelude::*;
use std::sync::Arc;

/// Seed a store from `initial`, toggle `listing_id` `toggles` times and
/// return the final set with the add and remove call counts.
fn run_toggles(
    initial: &WishlistSet,
    listing_id: ListingId,
    toggles: usize,
) -> (WishlistSet, usize, usize) {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap();

    runtime.block_on(async {
        let remote = Arc::new(ScriptedRemote::new());
        remote.set_wishlist(initial.iter().copied().map(wishlist_item).collect());
        let credentials = Arc::new(SessionCredentials::with_token("test-token"));
        let wishlist = WishlistStore::new();
        wishlist.refresh(&*remote, &*credentials).await.unwrap();
        assert_eq!(*wishlist.ids(), *initial);

        let mutator = OptimisticMutator::new(remote.clone(), credentials);
        for _ in 0..toggles {
            mutator.toggle(&wishlist, listing_id).await.unwrap();
        }

        (
            (*wishlist.ids()).clone(),
            remote.count(&Call::AddWishlist(listing_id)),
            remote.count(&Call::RemoveWishlist(listing_id)),
        )
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn test_even_toggles_restore_the_set(
        initial in prop::collection::btree_set(1i64..40, 0..8),
        listing_id in 1i64..40,
        half in 0usize..6,
    ) {
        let (after, adds, removes) = run_toggles(&initial, listing_id, half * 2);

        prop_assert_eq!(after, initial);
        prop_assert_eq!(adds, half);
        prop_assert_eq!(removes, half);
    }

    #[test]
    fn test_odd_toggles_flip_only_the_toggled_listing(
        initial in prop::collection::btree_set(1i64..40, 0..8),
        listing_id in 1i64..40,
        half in 0usize..6,
    ) {
        let (after, adds, removes) = run_toggles(&initial, listing_id, half * 2 + 1);

        let mut expected = initial.clone();
        if !expected.remove(&listing_id) {
            expected.insert(listing_id);
        }
        prop_assert_eq!(after, expected);

        if initial.contains(&listing_id) {
            prop_assert_eq!((adds, removes), (half, half + 1));
        } else {
            prop_assert_eq!((adds, removes), (half + 1, half));
        }
    }
}
