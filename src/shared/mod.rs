//! Shared Module
//!
//! Wire types, error types and configuration used by every part of the
//! client. Everything here is plain data: no I/O beyond reading a config file.

/// Application configuration
pub mod config;

/// Sync error types
pub mod error;

/// Conversation and message types
pub mod messaging;

/// Wishlist types
pub mod wishlist;

pub use config::{AppConfig, AppConfigBuilder, ConfigError};
pub use error::{SyncError, SyncResult};
pub use messaging::{Conversation, ConversationId, Message, MessageEntry, MessageId, UserId};
pub use wishlist::{ListingId, WishlistItem, WishlistSet};
