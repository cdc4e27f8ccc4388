//! # Optimistic Mutations
//!
//! User actions that change server state. Each one updates the local cache
//! first so the view responds at once, then calls the backend.
//!
//! ## Reconciliation rules
//!
//! - **Send message**: a pending entry is appended and survives polls while
//!   the request is in flight. On success it is swapped for the server record
//!   (or the record is appended if the entry is gone). On failure the pending
//!   entry stays until the next poll and the error goes back to the caller.
//! - **Wishlist add**: requires a credential before anything happens. The ID
//!   is inserted before the request and taken out again if the request fails.
//! - **Wishlist remove**: the ID is removed before the request and is not put
//!   back if the request fails; the error goes back to the caller.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use marketsync::client::{ConversationBoard, OptimisticMutator, WishlistStore};
//! # use marketsync::client::{HttpRemoteClient, SessionCredentials, Config};
//! # use std::sync::Arc;
//! # async fn example() -> Result<(), marketsync::shared::SyncError> {
//! # let credentials = Arc::new(SessionCredentials::from_env());
//! # let client = Arc::new(HttpRemoteClient::new(Config::new(), credentials.clone())?);
//! let mutator = OptimisticMutator::new(client, credentials);
//! let wishlist = WishlistStore::new();
//!
//! mutator.toggle(&wishlist, 42).await?;
//! # Ok(())
//! # }
//! ```

use crate::client::api::RemoteClient;
use crate::client::auth::CredentialProvider;
use crate::client::messaging::ConversationBoard;
use crate::client::wishlist::WishlistStore;
use crate::shared::error::{SyncError, SyncResult};
use crate::shared::messaging::{ConversationId, Message, MessageEntry};
use crate::shared::wishlist::ListingId;
use std::sync::Arc;

/// Outcome of a wishlist mutation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WishlistChange {
    Added,
    Removed,
    /// Already in the wishlist; nothing was sent
    AlreadyPresent,
}

/// Applies local edits ahead of server confirmation
pub struct OptimisticMutator<C: ?Sized> {
    client: Arc<C>,
    credentials: Arc<dyn CredentialProvider>,
}

impl<C: RemoteClient + ?Sized> OptimisticMutator<C> {
    pub fn new(client: Arc<C>, credentials: Arc<dyn CredentialProvider>) -> Self {
        Self {
            client,
            credentials,
        }
    }

    /// Send a message, showing it immediately as pending.
    ///
    /// Blank bodies are rejected before anything is appended or sent.
    pub async fn send_message(
        &self,
        board: &ConversationBoard,
        conversation_id: ConversationId,
        body: &str,
    ) -> SyncResult<Message> {
        if body.trim().is_empty() {
            return Err(SyncError::validation("content", "Message cannot be empty"));
        }

        let entry = MessageEntry::pending(conversation_id, body);
        let local_id = entry.local_id();
        board.push_pending(entry);

        tracing::info!("[SEND] Sending message to conversation {}", conversation_id);
        match self.client.send_message(conversation_id, body).await {
            Ok(message) => {
                if let Some(local_id) = local_id {
                    board.confirm_pending(local_id, message.clone());
                }
                Ok(message)
            }
            Err(e) => {
                tracing::warn!(
                    "[SEND] Failed to send message to conversation {}: {}",
                    conversation_id,
                    e
                );
                if let Some(local_id) = local_id {
                    board.fail_pending(local_id);
                }
                Err(e)
            }
        }
    }

    /// Add when absent, remove when present
    pub async fn toggle(
        &self,
        wishlist: &WishlistStore,
        listing_id: ListingId,
    ) -> SyncResult<WishlistChange> {
        if wishlist.contains(listing_id) {
            self.remove(wishlist, listing_id).await
        } else {
            self.add(wishlist, listing_id).await
        }
    }

    /// Add a listing to the wishlist
    pub async fn add(
        &self,
        wishlist: &WishlistStore,
        listing_id: ListingId,
    ) -> SyncResult<WishlistChange> {
        if !self.credentials.is_authenticated() {
            tracing::debug!("[WISHLIST] Add {} refused: not logged in", listing_id);
            return Err(SyncError::AuthRequired);
        }

        if !wishlist.insert(listing_id) {
            return Ok(WishlistChange::AlreadyPresent);
        }

        match self.client.add_to_wishlist(listing_id).await {
            Ok(()) => {
                tracing::info!("[WISHLIST] Added listing {}", listing_id);
                Ok(WishlistChange::Added)
            }
            Err(e) => {
                tracing::error!("[WISHLIST] Failed to add listing {}: {}", listing_id, e);
                wishlist.remove(listing_id);
                Err(e)
            }
        }
    }

    /// Remove a listing from the wishlist; not rolled back on failure
    pub async fn remove(
        &self,
        wishlist: &WishlistStore,
        listing_id: ListingId,
    ) -> SyncResult<WishlistChange> {
        if !self.credentials.is_authenticated() {
            tracing::debug!("[WISHLIST] Remove {} refused: not logged in", listing_id);
            return Err(SyncError::AuthRequired);
        }

        wishlist.remove(listing_id);

        match self.client.remove_from_wishlist(listing_id).await {
            Ok(()) => {
                tracing::info!("[WISHLIST] Removed listing {}", listing_id);
                Ok(WishlistChange::Removed)
            }
            Err(e) => {
                tracing::error!("[WISHLIST] Failed to remove listing {}: {}", listing_id, e);
                Err(e)
            }
        }
    }
}
