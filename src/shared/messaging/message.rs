//! Chat Message Data Structure
//!
//! Represents a message in a conversation, both as the backend reports it and
//! as it sits in the local cache before the backend has confirmed it.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{ConversationId, MessageId, UserId};

/// Represents a chat message confirmed by the server
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Message {
    /// Server-assigned message ID
    pub id: MessageId,
    /// Conversation this message belongs to
    pub conversation_id: ConversationId,
    /// User who sent the message
    pub sender_id: UserId,
    /// Message body
    pub content: String,
    /// Creation timestamp, as sent by the backend
    pub created_at: String,
}

impl Message {
    /// Whether this message was sent by the current user, given the counterpart's ID
    pub fn is_outgoing(&self, other_user_id: UserId) -> bool {
        self.sender_id != other_user_id
    }
}

/// A cached message, either awaiting confirmation or confirmed by the server
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageEntry {
    /// Locally synthesized copy with no permanent ID yet
    Pending {
        local_id: Uuid,
        conversation_id: ConversationId,
        content: String,
        created_at: String,
    },
    /// Server record
    Confirmed(Message),
}

impl MessageEntry {
    /// Create a pending entry for a message that is about to be sent
    pub fn pending(conversation_id: ConversationId, content: impl Into<String>) -> Self {
        Self::Pending {
            local_id: Uuid::new_v4(),
            conversation_id,
            content: content.into(),
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending { .. })
    }

    pub fn conversation_id(&self) -> ConversationId {
        match self {
            Self::Pending { conversation_id, .. } => *conversation_id,
            Self::Confirmed(message) => message.conversation_id,
        }
    }

    pub fn content(&self) -> &str {
        match self {
            Self::Pending { content, .. } => content,
            Self::Confirmed(message) => &message.content,
        }
    }

    pub fn created_at(&self) -> &str {
        match self {
            Self::Pending { created_at, .. } => created_at,
            Self::Confirmed(message) => &message.created_at,
        }
    }

    /// Server ID, if confirmed
    pub fn server_id(&self) -> Option<MessageId> {
        match self {
            Self::Pending { .. } => None,
            Self::Confirmed(message) => Some(message.id),
        }
    }

    /// Local ID, if still pending
    pub fn local_id(&self) -> Option<Uuid> {
        match self {
            Self::Pending { local_id, .. } => Some(*local_id),
            Self::Confirmed(_) => None,
        }
    }
}

impl From<Message> for MessageEntry {
    fn from(message: Message) -> Self {
        Self::Confirmed(message)
    }
}

/// Response for listing messages
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListMessagesResponse {
    pub messages: Vec<Message>,
}
