//! Conversation Sync
//!
//! Drives the conversation view: polls the conversation list, keeps the
//! active selection stable across refreshes, and polls the messages of the
//! active conversation only.
//!
//! ## Polling
//!
//! - Conversation list: every `conversation_poll_ms` (10 s by default)
//! - Active conversation messages: every `message_poll_ms` (5 s by default)
//!
//! Both loops run independently. The message loop is restarted only when the
//! selected conversation ID actually changes, so at most one message loop is
//! ever live. The loop is always derived from the board's current selection
//! under one lock, so a list refresh racing a user selection cannot leave it
//! polling a conversation that is no longer shown.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use marketsync::client::{Config, ConversationSync, HttpRemoteClient, SessionCredentials};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), marketsync::shared::SyncError> {
//! let config = Config::new();
//! let credentials = Arc::new(SessionCredentials::from_env());
//! let client = Arc::new(HttpRemoteClient::new(config.clone(), credentials)?);
//!
//! let sync = ConversationSync::new(client, config);
//! sync.mount(Some(42));
//! # Ok(())
//! # }
//! ```

use super::board::{ConversationBoard, SelectionSource};
use crate::client::api::RemoteClient;
use crate::client::config::Config;
use crate::client::events::SyncEvent;
use crate::client::sync::{PollingLoop, ResourceKey};
use crate::shared::error::SyncResult;
use crate::shared::messaging::ConversationId;
use parking_lot::Mutex;
use std::sync::{Arc, Weak};
use tokio::sync::broadcast;

struct SyncInner<C> {
    client: Arc<C>,
    board: ConversationBoard,
    poller: PollingLoop,
    config: Config,
    /// Conversation the message loop is running for
    polled: Mutex<Option<ConversationId>>,
}

/// Conversation list and message polling for one mounted conversation view
pub struct ConversationSync<C: RemoteClient + 'static> {
    inner: Arc<SyncInner<C>>,
}

impl<C: RemoteClient + 'static> ConversationSync<C> {
    pub fn new(client: Arc<C>, config: Config) -> Self {
        Self::with_board(client, config, ConversationBoard::new())
    }

    /// Use an existing board, e.g. one shared with an optimistic mutator
    pub fn with_board(client: Arc<C>, config: Config, board: ConversationBoard) -> Self {
        Self {
            inner: Arc::new(SyncInner {
                client,
                board,
                poller: PollingLoop::new(),
                config,
                polled: Mutex::new(None),
            }),
        }
    }

    pub fn board(&self) -> &ConversationBoard {
        &self.inner.board
    }

    pub fn poller(&self) -> &PollingLoop {
        &self.inner.poller
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<SyncEvent> {
        self.inner.board.events().subscribe()
    }

    /// Start list polling, remembering an optional deep-link target.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn mount(&self, deep_link: Option<ConversationId>) {
        tracing::info!("[SYNC] Mounting conversation view (deep link: {:?})", deep_link);
        self.inner.board.set_deep_link(deep_link);
        SyncInner::follow_selection(&self.inner);
        SyncInner::start_list_polling(&self.inner);
    }

    /// Stop all polling for this view
    pub fn unmount(&self) {
        tracing::info!("[SYNC] Unmounting conversation view");
        let mut polled = self.inner.polled.lock();
        self.inner.poller.cancel(&ResourceKey::conversations());
        self.inner.poller.cancel(&ResourceKey::messages());
        *polled = None;
    }

    /// Explicit user selection
    pub fn select(&self, conversation_id: ConversationId) {
        if self
            .inner
            .board
            .select(conversation_id, SelectionSource::Explicit)
        {
            tracing::info!("[SYNC] User selected conversation {}", conversation_id);
            SyncInner::follow_selection(&self.inner);
        }
    }

    /// A deep link arriving while the view is mounted
    pub fn navigate_to(&self, conversation_id: ConversationId) {
        if self.inner.board.set_deep_link(Some(conversation_id)).is_some() {
            SyncInner::follow_selection(&self.inner);
        }
    }

    /// Fetch the conversation list once. Returns whether the cache changed.
    pub async fn refresh_conversations(&self) -> SyncResult<bool> {
        SyncInner::refresh_conversations(&self.inner).await
    }

    /// Fetch the active conversation's messages once
    pub async fn refresh_messages(&self) -> SyncResult<bool> {
        match self.inner.board.active_conversation_id() {
            Some(id) => self.inner.refresh_messages(id).await,
            None => Ok(false),
        }
    }
}

impl<C: RemoteClient + 'static> Drop for ConversationSync<C> {
    fn drop(&mut self) {
        self.unmount();
    }
}

impl<C: RemoteClient + 'static> SyncInner<C> {
    fn start_list_polling(this: &Arc<Self>) {
        let weak = Arc::downgrade(this);
        this.poller.subscribe(
            ResourceKey::conversations(),
            this.config.conversation_poll_interval(),
            move || {
                let weak: Weak<Self> = weak.clone();
                Box::pin(async move {
                    match weak.upgrade() {
                        Some(inner) => Self::refresh_conversations(&inner).await.map(|_| ()),
                        None => Ok(()),
                    }
                })
            },
        );
    }

    /// Point the message loop at the board's current selection.
    ///
    /// Reading the selection and subscribing happen under `polled`, so the
    /// last caller always subscribes for the latest selection.
    fn follow_selection(this: &Arc<Self>) {
        let mut polled = this.polled.lock();
        let selected = this.board.active_conversation_id();
        if *polled == selected {
            return;
        }
        match selected {
            Some(conversation_id) => Self::start_message_polling(this, conversation_id),
            None => {
                this.poller.cancel(&ResourceKey::messages());
            }
        }
        *polled = selected;
    }

    fn start_message_polling(this: &Arc<Self>, conversation_id: ConversationId) {
        let weak = Arc::downgrade(this);
        this.poller.subscribe(
            ResourceKey::messages(),
            this.config.message_poll_interval(),
            move || {
                let weak: Weak<Self> = weak.clone();
                Box::pin(async move {
                    match weak.upgrade() {
                        Some(inner) => inner.refresh_messages(conversation_id).await.map(|_| ()),
                        None => Ok(()),
                    }
                })
            },
        );
    }

    async fn refresh_conversations(this: &Arc<Self>) -> SyncResult<bool> {
        let conversations = match this.client.list_conversations().await {
            Ok(conversations) => conversations,
            Err(e) => {
                this.board.finish_loading();
                return Err(e);
            }
        };

        tracing::debug!("[SYNC] Received {} conversations", conversations.len());
        let outcome = this.board.apply_conversations(conversations);
        Self::follow_selection(this);
        Ok(outcome.changed)
    }

    async fn refresh_messages(&self, conversation_id: ConversationId) -> SyncResult<bool> {
        let messages = self.client.list_messages(conversation_id).await?;
        match self.board.apply_messages(conversation_id, messages) {
            Some(changed) => Ok(changed),
            None => {
                tracing::debug!(
                    "[SYNC] Discarded messages for inactive conversation {}",
                    conversation_id
                );
                Ok(false)
            }
        }
    }
}
