//! MarketSync - Main Library
//!
//! MarketSync is the synchronization core of a book-classifieds marketplace
//! client. It keeps local copies of server-owned collections (conversations,
//! messages, wishlist) fresh under periodic polling and optimistic edits,
//! without flicker, duplication or lost updates.
//!
//! # Module Structure
//!
//! - **`shared`** - Plain data shared by every layer
//!   - Conversation, message and wishlist wire types
//!   - `SyncError` and configuration types
//!
//! - **`client`** - Everything that talks to the backend or holds its state
//!   - `RemoteClient` seam and the `reqwest` implementation
//!   - `EntityCache`, `PollingLoop`, `ConversationSync`
//!   - `WishlistStore` and `OptimisticMutator`
//!
//! # Usage
//!
//! ```rust,no_run
//! use marketsync::client::{
//!     Config, ConversationSync, HttpRemoteClient, OptimisticMutator, SessionCredentials,
//! };
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), marketsync::shared::SyncError> {
//! let config = Config::new();
//! let credentials = Arc::new(SessionCredentials::from_env());
//! let client = Arc::new(HttpRemoteClient::new(config.clone(), credentials.clone())?);
//!
//! let sync = ConversationSync::new(client.clone(), config);
//! sync.mount(None);
//!
//! let mutator = OptimisticMutator::new(client, credentials);
//! if let Some(id) = sync.board().active_conversation_id() {
//!     mutator.send_message(sync.board(), id, "Is it still available?").await?;
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Concurrency
//!
//! All polling runs on Tokio tasks. Cache state sits behind short
//! `parking_lot` locks that are never held across an `.await`, so a merge is
//! atomic with respect to every other cache operation.
//!
//! # Error Handling
//!
//! Fallible operations return `Result<T, SyncError>`. Polling failures are
//! logged and retried on the next tick; mutation failures are returned to the
//! caller.

/// Shared types and data structures
pub mod shared;

/// Sync client: caches, polling, mutations
pub mod client;
