//! Conversation Data Structure
//!
//! Represents a messaging thread between the current user and one counterpart,
//! optionally tied to a listing.

use serde::{Deserialize, Serialize};

use super::{ConversationId, UserId};

/// Represents a conversation as returned by the conversation list endpoint
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Conversation {
    /// Unique conversation ID
    pub id: ConversationId,
    /// User ID of the counterpart
    #[serde(default)]
    pub other_user_id: UserId,
    /// Display name of the counterpart (shown in the conversation list)
    pub other_user_username: String,
    /// Preview text of the last message
    #[serde(default)]
    pub last_message: Option<String>,
    /// Timestamp of the last message, as sent by the backend
    #[serde(default)]
    pub last_message_at: Option<String>,
    /// Title of the listing this conversation is about
    #[serde(default)]
    pub announcement_title: Option<String>,
}

impl Conversation {
    /// Two-letter avatar initials of the counterpart
    pub fn initials(&self) -> String {
        self.other_user_username
            .chars()
            .take(2)
            .collect::<String>()
            .to_uppercase()
    }

    /// Case-insensitive substring match against the counterpart's name.
    ///
    /// An empty (or whitespace-only) query matches every conversation.
    pub fn matches_search(&self, query: &str) -> bool {
        let query = query.trim().to_lowercase();
        query.is_empty() || self.other_user_username.to_lowercase().contains(&query)
    }
}

/// Response for listing conversations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListConversationsResponse {
    pub conversations: Vec<Conversation>,
}
