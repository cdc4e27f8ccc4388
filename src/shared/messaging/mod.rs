//! Messaging Module
//!
//! Wire and cache types for the messaging system:
//!
//! - `Conversation` - A thread between the current user and a counterpart
//! - `Message` - A server-confirmed message
//! - `MessageEntry` - A cached message, pending or confirmed
//!
//! # Usage
//!
//! ```rust
//! use marketsync::shared::messaging::{Conversation, Message, MessageEntry};
//! ```

pub mod conversation;
pub mod message;

pub use conversation::{Conversation, ListConversationsResponse};
pub use message::{ListMessagesResponse, Message, MessageEntry};

/// Backend conversation identifier
pub type ConversationId = i64;
/// Backend message identifier
pub type MessageId = i64;
/// Backend user identifier
pub type UserId = i64;
