//! Conversation Board
//!
//! Owns the cached conversation list, the cached messages of the active
//! conversation and the active selection. Views read snapshots from it; only
//! `ConversationSync` and the optimistic mutator write to it.

use crate::client::cache::EntityCache;
use crate::client::events::{EventBus, SyncEvent};
use crate::shared::messaging::{Conversation, ConversationId, Message, MessageEntry};
use parking_lot::Mutex;
use std::collections::HashSet;
use std::sync::Arc;
use uuid::Uuid;

/// Lifecycle of the conversation view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncPhase {
    /// No conversation list has been received yet
    Uninitialized,
    /// The list is known but nothing is selected
    ListLoaded,
    /// A conversation is selected; its messages have not arrived yet
    ConversationSelected,
    /// Messages of the selected conversation are cached
    MessagesLoaded,
}

/// How the active conversation came to be selected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionSource {
    /// First conversation picked automatically on load
    Default,
    /// Deep-link target found in the list
    DeepLink,
    /// User choice
    Explicit,
}

/// The conversation currently displayed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActiveSelection {
    #[default]
    None,
    Default(ConversationId),
    DeepLink(ConversationId),
    Explicit(ConversationId),
}

impl ActiveSelection {
    fn new(id: ConversationId, source: SelectionSource) -> Self {
        match source {
            SelectionSource::Default => Self::Default(id),
            SelectionSource::DeepLink => Self::DeepLink(id),
            SelectionSource::Explicit => Self::Explicit(id),
        }
    }

    pub fn id(&self) -> Option<ConversationId> {
        match self {
            Self::None => None,
            Self::Default(id) | Self::DeepLink(id) | Self::Explicit(id) => Some(*id),
        }
    }

    pub fn is_explicit(&self) -> bool {
        matches!(self, Self::Explicit(_))
    }
}

/// Result of applying one conversation list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListOutcome {
    /// Whether the cached list was replaced
    pub changed: bool,
    /// Newly selected conversation, if the selection moved
    pub selected: Option<ConversationId>,
}

/// Plain state behind the board's lock
#[derive(Debug)]
pub struct ConversationState {
    conversations: EntityCache<Vec<Conversation>>,
    messages: EntityCache<Vec<MessageEntry>>,
    messages_for: Option<ConversationId>,
    /// Pending entries whose send has not finished yet
    in_flight: HashSet<Uuid>,
    selection: ActiveSelection,
    pending_target: Option<ConversationId>,
    phase: SyncPhase,
    loading: bool,
}

impl Default for ConversationState {
    fn default() -> Self {
        Self {
            conversations: EntityCache::new(),
            messages: EntityCache::new(),
            messages_for: None,
            in_flight: HashSet::new(),
            selection: ActiveSelection::None,
            pending_target: None,
            phase: SyncPhase::Uninitialized,
            loading: true,
        }
    }
}

impl ConversationState {
    /// Merge a fresh conversation list and resolve the selection.
    ///
    /// A pending deep-link target found in the list wins; otherwise the first
    /// conversation is picked only when nothing is selected yet.
    pub fn apply_conversations(&mut self, conversations: Vec<Conversation>) -> ListOutcome {
        let changed = self.conversations.merge(conversations);
        self.loading = false;
        if self.phase == SyncPhase::Uninitialized {
            self.phase = SyncPhase::ListLoaded;
        }

        let mut selected = None;
        if let Some(target) = self.pending_target {
            if self.conversations.contains_key(&target) {
                self.pending_target = None;
                if self.select(target, SelectionSource::DeepLink) {
                    selected = Some(target);
                }
                return ListOutcome { changed, selected };
            }
        }

        if self.selection.id().is_none() {
            if let Some(first) = self.conversations.get().first().map(|c| c.id) {
                if self.select(first, SelectionSource::Default) {
                    selected = Some(first);
                }
            }
        }

        ListOutcome { changed, selected }
    }

    /// Change the active conversation. Returns whether the ID changed.
    ///
    /// An explicit choice drops any pending deep-link target.
    pub fn select(&mut self, id: ConversationId, source: SelectionSource) -> bool {
        if source == SelectionSource::Explicit {
            self.pending_target = None;
        }

        if self.selection.id() == Some(id) {
            if source != SelectionSource::Default {
                self.selection = ActiveSelection::new(id, source);
            }
            return false;
        }

        self.selection = ActiveSelection::new(id, source);
        self.messages.reset();
        self.messages_for = Some(id);
        self.phase = SyncPhase::ConversationSelected;
        true
    }

    /// Remember a deep-link target, selecting it at once if it is already listed
    pub fn set_deep_link(&mut self, target: Option<ConversationId>) -> Option<ConversationId> {
        self.pending_target = target;
        let target = target?;
        if !self.conversations.contains_key(&target) {
            return None;
        }
        self.pending_target = None;
        self.select(target, SelectionSource::DeepLink).then_some(target)
    }

    /// Merge the message list of `conversation_id`.
    ///
    /// Pending entries whose send is still in flight are kept after the
    /// server records. Returns `None` when the conversation is no longer
    /// active and the result was discarded.
    pub fn apply_messages(
        &mut self,
        conversation_id: ConversationId,
        messages: Vec<Message>,
    ) -> Option<bool> {
        if self.selection.id() != Some(conversation_id) || self.messages_for != Some(conversation_id) {
            return None;
        }
        let mut entries: Vec<MessageEntry> =
            messages.into_iter().map(MessageEntry::Confirmed).collect();
        entries.extend(
            self.messages
                .get()
                .iter()
                .filter(|entry| entry.local_id().is_some_and(|id| self.in_flight.contains(&id)))
                .cloned(),
        );
        let changed = self.messages.merge(entries);
        self.phase = SyncPhase::MessagesLoaded;
        Some(changed)
    }

    /// Append a pending entry if its conversation is the one on display
    pub fn push_pending(&mut self, entry: MessageEntry) -> bool {
        if self.messages_for != Some(entry.conversation_id()) {
            return false;
        }
        if let Some(local_id) = entry.local_id() {
            self.in_flight.insert(local_id);
        }
        self.messages.update(|messages| messages.push(entry));
        true
    }

    /// Replace a pending entry with its server record.
    ///
    /// If a poll already delivered the record, the pending copy is dropped
    /// instead so the message is not shown twice. If the pending copy is
    /// gone, the record is appended unless it is already listed.
    pub fn confirm_pending(&mut self, local_id: Uuid, message: Message) -> bool {
        self.in_flight.remove(&local_id);
        if self.messages_for != Some(message.conversation_id) {
            return false;
        }

        let index = self
            .messages
            .get()
            .iter()
            .position(|entry| entry.local_id() == Some(local_id));
        let already_listed = self
            .messages
            .get()
            .iter()
            .any(|entry| entry.server_id() == Some(message.id));

        match (index, already_listed) {
            (Some(index), true) => {
                self.messages.update(|messages| messages.remove(index));
            }
            (Some(index), false) => {
                self.messages
                    .update(|messages| messages[index] = MessageEntry::Confirmed(message));
            }
            (None, false) => {
                self.messages
                    .update(|messages| messages.push(MessageEntry::Confirmed(message)));
            }
            (None, true) => return false,
        }
        true
    }

    /// Stop keeping a pending entry across polls; the next poll drops it
    pub fn fail_pending(&mut self, local_id: Uuid) {
        self.in_flight.remove(&local_id);
    }

    pub fn finish_loading(&mut self) -> bool {
        std::mem::replace(&mut self.loading, false)
    }

    pub fn conversations(&self) -> Arc<Vec<Conversation>> {
        self.conversations.snapshot()
    }

    pub fn messages(&self) -> Arc<Vec<MessageEntry>> {
        self.messages.snapshot()
    }

    pub fn selection(&self) -> ActiveSelection {
        self.selection
    }

    pub fn pending_target(&self) -> Option<ConversationId> {
        self.pending_target
    }

    pub fn phase(&self) -> SyncPhase {
        self.phase
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }
}

/// Shared, injectable owner of the conversation and message caches
#[derive(Debug, Clone, Default)]
pub struct ConversationBoard {
    state: Arc<Mutex<ConversationState>>,
    events: EventBus,
}

impl ConversationBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_events(events: EventBus) -> Self {
        Self {
            state: Arc::default(),
            events,
        }
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    /// Snapshot of the conversation list in server order
    pub fn conversations(&self) -> Arc<Vec<Conversation>> {
        self.state.lock().conversations()
    }

    /// Conversations whose counterpart name contains `query`, case-insensitively
    pub fn filtered_conversations(&self, query: &str) -> Vec<Conversation> {
        self.conversations()
            .iter()
            .filter(|c| c.matches_search(query))
            .cloned()
            .collect()
    }

    /// Snapshot of the active conversation's messages
    pub fn messages(&self) -> Arc<Vec<MessageEntry>> {
        self.state.lock().messages()
    }

    pub fn selection(&self) -> ActiveSelection {
        self.state.lock().selection()
    }

    pub fn active_conversation_id(&self) -> Option<ConversationId> {
        self.selection().id()
    }

    /// The active conversation, if it is in the cached list
    pub fn active_conversation(&self) -> Option<Conversation> {
        let state = self.state.lock();
        let id = state.selection().id()?;
        state.conversations.find(&id).cloned()
    }

    pub fn pending_target(&self) -> Option<ConversationId> {
        self.state.lock().pending_target()
    }

    pub fn phase(&self) -> SyncPhase {
        self.state.lock().phase()
    }

    pub fn is_loading(&self) -> bool {
        self.state.lock().is_loading()
    }

    pub(crate) fn apply_conversations(&self, conversations: Vec<Conversation>) -> ListOutcome {
        let (outcome, first_load) = {
            let mut state = self.state.lock();
            let was_loading = state.is_loading();
            (state.apply_conversations(conversations), was_loading)
        };

        if first_load {
            self.events.publish(SyncEvent::LoadingFinished);
        }
        if outcome.changed {
            self.events.publish(SyncEvent::ConversationsChanged);
        }
        if let Some(id) = outcome.selected {
            tracing::info!("[SYNC] Selected conversation {}", id);
            self.events.publish(SyncEvent::SelectionChanged {
                conversation_id: Some(id),
            });
        }
        outcome
    }

    pub(crate) fn select(&self, id: ConversationId, source: SelectionSource) -> bool {
        let changed = self.state.lock().select(id, source);
        if changed {
            self.events.publish(SyncEvent::SelectionChanged {
                conversation_id: Some(id),
            });
        }
        changed
    }

    pub(crate) fn set_deep_link(&self, target: Option<ConversationId>) -> Option<ConversationId> {
        let selected = self.state.lock().set_deep_link(target);
        if let Some(id) = selected {
            self.events.publish(SyncEvent::SelectionChanged {
                conversation_id: Some(id),
            });
        }
        selected
    }

    pub(crate) fn apply_messages(
        &self,
        conversation_id: ConversationId,
        messages: Vec<Message>,
    ) -> Option<bool> {
        let outcome = self.state.lock().apply_messages(conversation_id, messages);
        if outcome == Some(true) {
            self.events.publish(SyncEvent::MessagesChanged { conversation_id });
        }
        outcome
    }

    pub(crate) fn push_pending(&self, entry: MessageEntry) -> bool {
        let conversation_id = entry.conversation_id();
        let pushed = self.state.lock().push_pending(entry);
        if pushed {
            self.events.publish(SyncEvent::MessagesChanged { conversation_id });
        }
        pushed
    }

    pub(crate) fn fail_pending(&self, local_id: Uuid) {
        self.state.lock().fail_pending(local_id);
    }

    pub(crate) fn confirm_pending(&self, local_id: Uuid, message: Message) -> bool {
        let conversation_id = message.conversation_id;
        let confirmed = self.state.lock().confirm_pending(local_id, message);
        if confirmed {
            self.events.publish(SyncEvent::MessagesChanged { conversation_id });
        }
        confirmed
    }

    pub(crate) fn finish_loading(&self) {
        if self.state.lock().finish_loading() {
            self.events.publish(SyncEvent::LoadingFinished);
        }
    }
}
