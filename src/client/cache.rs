//! # Entity Cache
//!
//! In-memory holder for one server-owned collection (conversations, the
//! messages of the active conversation, the wishlist set).
//!
//! `merge` replaces the held collection only when the incoming one differs
//! structurally, so views holding a snapshot can compare pointers to decide
//! whether to re-render. Local edits go through `update`, which is
//! copy-on-write: snapshots handed out earlier never change under a reader.

use crate::shared::messaging::{Conversation, ConversationId};
use crate::shared::wishlist::{ListingId, WishlistItem};
use std::sync::Arc;

/// Entities addressable by a stable key
pub trait Keyed {
    type Key: PartialEq;

    fn key(&self) -> Self::Key;
}

impl Keyed for Conversation {
    type Key = ConversationId;

    fn key(&self) -> ConversationId {
        self.id
    }
}

impl Keyed for WishlistItem {
    type Key = ListingId;

    fn key(&self) -> ListingId {
        self.announcement_id
    }
}

/// Cached collection with structural change detection
#[derive(Debug)]
pub struct EntityCache<C> {
    items: Arc<C>,
    loaded: bool,
    revision: u64,
}

impl<C: Clone + PartialEq + Default> Default for EntityCache<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clone + PartialEq + Default> EntityCache<C> {
    /// Create an empty, not yet loaded cache
    pub fn new() -> Self {
        Self {
            items: Arc::new(C::default()),
            loaded: false,
            revision: 0,
        }
    }

    /// Replace the held collection if `incoming` differs from it.
    ///
    /// Returns whether a replacement happened. The first merge always
    /// replaces, even with an empty collection.
    pub fn merge(&mut self, incoming: C) -> bool {
        if self.loaded && *self.items == incoming {
            return false;
        }
        self.items = Arc::new(incoming);
        self.loaded = true;
        self.revision += 1;
        true
    }

    /// Apply a local edit (optimistic insert/remove)
    pub fn update<R>(&mut self, edit: impl FnOnce(&mut C) -> R) -> R {
        let result = edit(Arc::make_mut(&mut self.items));
        self.loaded = true;
        self.revision += 1;
        result
    }

    /// Drop the held collection and forget that it was ever loaded
    pub fn reset(&mut self) {
        self.items = Arc::new(C::default());
        self.loaded = false;
        self.revision += 1;
    }

    /// Shared read-only view of the current collection
    pub fn snapshot(&self) -> Arc<C> {
        Arc::clone(&self.items)
    }

    pub fn get(&self) -> &C {
        &self.items
    }

    /// Whether a server result (or a local edit) has seeded the cache
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Incremented on every replacement, edit or reset
    pub fn revision(&self) -> u64 {
        self.revision
    }
}

impl<T> EntityCache<Vec<T>>
where
    T: Keyed + Clone + PartialEq,
{
    /// Look up an entity by key
    pub fn find(&self, key: &T::Key) -> Option<&T> {
        self.items.iter().find(|item| item.key() == *key)
    }

    pub fn contains_key(&self, key: &T::Key) -> bool {
        self.find(key).is_some()
    }
}
