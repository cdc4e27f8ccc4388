//! # Sync
//!
//! Timer-driven refresh of server-owned collections.
//!
//! - **`scheduler`** - `PollingLoop`, one cancellable polling task per resource key

pub mod scheduler;

pub use scheduler::{FetchFuture, PollingLoop, ResourceKey, Subscription};
