//! Wishlist Store
//!
//! Injectable owner of the wishlist. The set of listing IDs is the unit of
//! truth; the item rows (title, price, status) are kept alongside for the
//! wishlist page and are refreshed wholesale.

use crate::client::api::RemoteClient;
use crate::client::auth::CredentialProvider;
use crate::client::cache::EntityCache;
use crate::client::events::{EventBus, SyncEvent};
use crate::shared::error::SyncResult;
use crate::shared::wishlist::{ListingId, WishlistItem, WishlistSet};
use parking_lot::Mutex;
use std::sync::Arc;

#[derive(Debug, Default)]
struct WishlistState {
    ids: EntityCache<WishlistSet>,
    items: EntityCache<Vec<WishlistItem>>,
    loading: bool,
}

impl WishlistState {
    fn merge(&mut self, items: Vec<WishlistItem>) -> bool {
        let ids: WishlistSet = items.iter().map(|item| item.announcement_id).collect();
        let ids_changed = self.ids.merge(ids);
        let items_changed = self.items.merge(items);
        ids_changed || items_changed
    }
}

/// Shared wishlist cache
#[derive(Debug, Clone, Default)]
pub struct WishlistStore {
    state: Arc<Mutex<WishlistState>>,
    events: EventBus,
}

impl WishlistStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_events(events: EventBus) -> Self {
        Self {
            state: Arc::default(),
            events,
        }
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    pub fn contains(&self, listing_id: ListingId) -> bool {
        self.state.lock().ids.get().contains(&listing_id)
    }

    /// Snapshot of the wishlisted listing IDs
    pub fn ids(&self) -> Arc<WishlistSet> {
        self.state.lock().ids.snapshot()
    }

    /// Snapshot of the wishlist rows from the last refresh, minus removals
    pub fn items(&self) -> Arc<Vec<WishlistItem>> {
        self.state.lock().items.snapshot()
    }

    pub fn is_loading(&self) -> bool {
        self.state.lock().loading
    }

    pub fn is_loaded(&self) -> bool {
        self.state.lock().ids.is_loaded()
    }

    /// Fetch the whole wishlist.
    ///
    /// Without a credential the wishlist is cleared and no request is made.
    pub async fn refresh<C>(&self, client: &C, credentials: &dyn CredentialProvider) -> SyncResult<bool>
    where
        C: RemoteClient + ?Sized,
    {
        if !credentials.is_authenticated() {
            let changed = self.state.lock().merge(Vec::new());
            if changed {
                tracing::debug!("[WISHLIST] Logged out, cleared wishlist");
                self.events.publish(SyncEvent::WishlistChanged);
            }
            return Ok(changed);
        }

        self.state.lock().loading = true;
        let result = client.list_wishlist().await;

        let changed = {
            let mut state = self.state.lock();
            state.loading = false;
            match result {
                Ok(items) => state.merge(items),
                Err(e) => {
                    tracing::error!("[WISHLIST] Failed to fetch wishlist: {}", e);
                    return Err(e);
                }
            }
        };

        if changed {
            self.events.publish(SyncEvent::WishlistChanged);
        }
        Ok(changed)
    }

    /// Add an ID locally. Returns whether it was absent.
    pub(crate) fn insert(&self, listing_id: ListingId) -> bool {
        let inserted = {
            let mut state = self.state.lock();
            if state.ids.get().contains(&listing_id) {
                false
            } else {
                state.ids.update(|ids| ids.insert(listing_id))
            }
        };
        if inserted {
            self.events.publish(SyncEvent::WishlistChanged);
        }
        inserted
    }

    /// Remove an ID (and its row) locally. Returns whether it was present.
    pub(crate) fn remove(&self, listing_id: ListingId) -> bool {
        let removed = {
            let mut state = self.state.lock();
            if !state.ids.get().contains(&listing_id) {
                false
            } else {
                state.ids.update(|ids| ids.remove(&listing_id));
                if state.items.contains_key(&listing_id) {
                    state
                        .items
                        .update(|items| items.retain(|item| item.announcement_id != listing_id));
                }
                true
            }
        };
        if removed {
            self.events.publish(SyncEvent::WishlistChanged);
        }
        removed
    }
}
