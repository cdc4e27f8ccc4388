//! Messaging Module
//!
//! - **`board`** - `ConversationBoard`, owner of the conversation/message caches and the active selection
//! - **`sync`** - `ConversationSync`, list and message polling for the conversation view

pub mod board;
pub mod sync;

pub use board::{
    ActiveSelection, ConversationBoard, ConversationState, ListOutcome, SelectionSource, SyncPhase,
};
pub use sync::ConversationSync;
