//! Common test utilities and helpers
//!
//! - `ScriptedRemote`, an in-memory `RemoteClient` with scripted responses
//! - Fixture builders for conversations, messages and wishlist items
//! - Assertion macros

#![allow(dead_code)]


use async_trait::async_trait;
use marketsync::client::{Config, RemoteClient};
use marketsync::shared::wishlist::ListingSummary;
use marketsync::shared::{
    AppConfig, Conversation, ConversationId, ListingId, Message, SyncError, SyncResult,
    WishlistItem,
};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::time::Duration;

/// One recorded backend call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    ListConversations,
    ListMessages(ConversationId),
    SendMessage(ConversationId, String),
    ListWishlist,
    AddWishlist(ListingId),
    RemoveWishlist(ListingId),
}

/// In-memory backend
pub struct ScriptedRemote {
    conversations: Mutex<SyncResult<Vec<Conversation>>>,
    messages: Mutex<HashMap<ConversationId, Vec<Message>>>,
    message_delay: Mutex<HashMap<ConversationId, Duration>>,
    send_failure: Mutex<Option<SyncError>>,
    send_delay: Mutex<Duration>,
    wishlist: Mutex<Vec<WishlistItem>>,
    wishlist_failure: Mutex<Option<SyncError>>,
    wishlist_delay: Mutex<Duration>,
    calls: Mutex<Vec<Call>>,
    next_message_id: AtomicI64,
}

impl Default for ScriptedRemote {
    fn default() -> Self {
        Self {
            conversations: Mutex::new(Ok(Vec::new())),
            messages: Mutex::default(),
            message_delay: Mutex::default(),
            send_failure: Mutex::new(None),
            send_delay: Mutex::new(Duration::ZERO),
            wishlist: Mutex::default(),
            wishlist_failure: Mutex::new(None),
            wishlist_delay: Mutex::new(Duration::ZERO),
            calls: Mutex::default(),
            next_message_id: AtomicI64::new(1000),
        }
    }
}

impl ScriptedRemote {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_conversations(conversations: Vec<Conversation>) -> Self {
        let remote = Self::new();
        remote.set_conversations(conversations);
        remote
    }

    pub fn set_conversations(&self, conversations: Vec<Conversation>) {
        *self.conversations.lock() = Ok(conversations);
    }

    pub fn fail_conversations(&self, error: SyncError) {
        *self.conversations.lock() = Err(error);
    }

    pub fn set_messages(&self, conversation_id: ConversationId, messages: Vec<Message>) {
        self.messages.lock().insert(conversation_id, messages);
    }

    pub fn delay_messages(&self, conversation_id: ConversationId, delay: Duration) {
        self.message_delay.lock().insert(conversation_id, delay);
    }

    pub fn fail_send(&self, error: SyncError) {
        *self.send_failure.lock() = Some(error);
    }

    pub fn delay_send(&self, delay: Duration) {
        *self.send_delay.lock() = delay;
    }

    pub fn set_wishlist(&self, items: Vec<WishlistItem>) {
        *self.wishlist.lock() = items;
    }

    pub fn fail_wishlist_mutations(&self, error: SyncError) {
        *self.wishlist_failure.lock() = Some(error);
    }

    pub fn delay_wishlist_mutations(&self, delay: Duration) {
        *self.wishlist_delay.lock() = delay;
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().clone()
    }

    pub fn count(&self, call: &Call) -> usize {
        self.calls.lock().iter().filter(|c| *c == call).count()
    }

    pub fn message_fetches(&self) -> Vec<ConversationId> {
        self.calls
            .lock()
            .iter()
            .filter_map(|c| match c {
                Call::ListMessages(id) => Some(*id),
                _ => None,
            })
            .collect()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().clear();
    }

    fn record(&self, call: Call) {
        self.calls.lock().push(call);
    }

    async fn pause(delay: Duration) {
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }
}

#[async_trait]
impl RemoteClient for ScriptedRemote {
    async fn list_conversations(&self) -> SyncResult<Vec<Conversation>> {
        self.record(Call::ListConversations);
        self.conversations.lock().clone()
    }

    async fn list_messages(&self, conversation_id: ConversationId) -> SyncResult<Vec<Message>> {
        self.record(Call::ListMessages(conversation_id));
        let delay = self
            .message_delay
            .lock()
            .get(&conversation_id)
            .copied()
            .unwrap_or_default();
        Self::pause(delay).await;
        Ok(self
            .messages
            .lock()
            .get(&conversation_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn send_message(
        &self,
        conversation_id: ConversationId,
        content: &str,
    ) -> SyncResult<Message> {
        self.record(Call::SendMessage(conversation_id, content.to_string()));
        let delay = *self.send_delay.lock();
        Self::pause(delay).await;

        if let Some(error) = self.send_failure.lock().clone() {
            return Err(error);
        }

        let created = Message {
            id: self.next_message_id.fetch_add(1, Ordering::SeqCst),
            conversation_id,
            sender_id: 1,
            content: content.to_string(),
            created_at: "2024-05-01T12:00:00".to_string(),
        };
        self.messages
            .lock()
            .entry(conversation_id)
            .or_default()
            .push(created.clone());
        Ok(created)
    }

    async fn list_wishlist(&self) -> SyncResult<Vec<WishlistItem>> {
        self.record(Call::ListWishlist);
        Ok(self.wishlist.lock().clone())
    }

    async fn add_to_wishlist(&self, listing_id: ListingId) -> SyncResult<()> {
        self.record(Call::AddWishlist(listing_id));
        let delay = *self.wishlist_delay.lock();
        Self::pause(delay).await;

        if let Some(error) = self.wishlist_failure.lock().clone() {
            return Err(error);
        }
        let mut wishlist = self.wishlist.lock();
        if !wishlist.iter().any(|item| item.announcement_id == listing_id) {
            wishlist.push(wishlist_item(listing_id));
        }
        Ok(())
    }

    async fn remove_from_wishlist(&self, listing_id: ListingId) -> SyncResult<()> {
        self.record(Call::RemoveWishlist(listing_id));
        let delay = *self.wishlist_delay.lock();
        Self::pause(delay).await;

        if let Some(error) = self.wishlist_failure.lock().clone() {
            return Err(error);
        }
        self.wishlist
            .lock()
            .retain(|item| item.announcement_id != listing_id);
        Ok(())
    }
}

/// Config with the standard 10 s / 5 s intervals, independent of the environment
pub fn test_config() -> Config {
    Config::from_app(AppConfig::default())
}

pub fn config_with_intervals(conversation_ms: u64, message_ms: u64) -> Config {
    Config::with_builder(
        AppConfig::builder()
            .conversation_poll_ms(conversation_ms)
            .message_poll_ms(message_ms),
    )
    .expect("valid test config")
}

pub fn conversation(id: ConversationId, name: &str) -> Conversation {
    Conversation {
        id,
        other_user_id: 100 + id,
        other_user_username: name.to_string(),
        last_message: Some(format!("last message in {}", id)),
        last_message_at: Some("2024-05-01T09:30:00".to_string()),
        announcement_title: None,
    }
}

pub fn message(id: i64, conversation_id: ConversationId, content: &str) -> Message {
    Message {
        id,
        conversation_id,
        sender_id: 100 + conversation_id,
        content: content.to_string(),
        created_at: "2024-05-01T09:30:00".to_string(),
    }
}

pub fn wishlist_item(listing_id: ListingId) -> WishlistItem {
    WishlistItem {
        announcement_id: listing_id,
        announcement: Some(ListingSummary {
            price: Some(800.0),
            status: Some("Active".to_string()),
            book: None,
        }),
    }
}
