//! Sync Client Module
//!
//! Everything that talks to the marketplace backend or holds server state
//! locally.
//!
//! # Architecture
//!
//! - **`config`** - Runtime configuration (server URL, polling intervals)
//! - **`auth`** - Bearer token lookup
//! - **`api`** - `RemoteClient` trait and its HTTP implementation
//! - **`cache`** - `EntityCache`, structural change detection
//! - **`events`** - Change notifications for views
//! - **`sync`** - `PollingLoop`, one cancellable polling task per resource
//! - **`messaging`** - Conversation board and `ConversationSync`
//! - **`wishlist`** - `WishlistStore`
//! - **`optimistic`** - `OptimisticMutator` for sends and wishlist edits
//!
//! # Data Flow
//!
//! ```text
//! PollingLoop tick -> RemoteClient fetch -> EntityCache merge -> SyncEvent -> view
//! user action -> OptimisticMutator -> cache edit -> RemoteClient call -> reconcile
//! ```

pub mod api;
pub mod auth;
pub mod cache;
pub mod config;
pub mod events;
pub mod messaging;
pub mod optimistic;
pub mod sync;
pub mod wishlist;

pub use api::{HttpRemoteClient, RemoteClient};
pub use auth::{CredentialProvider, SessionCredentials};
pub use cache::{EntityCache, Keyed};
pub use config::Config;
pub use events::{EventBus, SyncEvent};
pub use messaging::{ActiveSelection, ConversationBoard, ConversationSync, SyncPhase};
pub use optimistic::{OptimisticMutator, WishlistChange};
pub use sync::{PollingLoop, ResourceKey, Subscription};
pub use wishlist::WishlistStore;
