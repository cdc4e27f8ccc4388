//! Change notifications for consuming views.
//!
//! Components publish an event after every cache replacement so a view can
//! re-render from a fresh snapshot. Nothing is published for polls that
//! returned identical data.

use crate::shared::messaging::ConversationId;
use tokio::sync::broadcast;

const EVENT_CAPACITY: usize = 64;

/// Something a view may want to re-render for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncEvent {
    /// The conversation list was replaced
    ConversationsChanged,
    /// The active conversation changed
    SelectionChanged { conversation_id: Option<ConversationId> },
    /// The message list of the active conversation was replaced or edited
    MessagesChanged { conversation_id: ConversationId },
    /// The wishlist set or its item rows changed
    WishlistChanged,
    /// The first conversation list fetch has finished
    LoadingFinished,
}

/// Broadcast channel wrapper; publishing never fails
#[derive(Debug, Clone)]
pub struct EventBus {
    tx: broadcast::Sender<SyncEvent>,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBus {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(EVENT_CAPACITY);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SyncEvent> {
        self.tx.subscribe()
    }

    pub fn publish(&self, event: SyncEvent) {
        // No receivers is fine: nobody is rendering.
        let _ = self.tx.send(event);
    }
}
