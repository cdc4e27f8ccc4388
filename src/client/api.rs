//! Marketplace API Client
//!
//! [`RemoteClient`] is the seam between the sync core and the backend.
//! [`HttpRemoteClient`] implements it over `reqwest`, attaching the bearer
//! token when one is present and classifying failures into [`SyncError`].

use crate::client::auth::CredentialProvider;
use crate::client::config::Config;
use crate::shared::error::{SyncError, SyncResult};
use crate::shared::messaging::{
    Conversation, ConversationId, ListConversationsResponse, ListMessagesResponse, Message,
};
use crate::shared::wishlist::{AddWishlistRequest, ListWishlistResponse, ListingId, WishlistItem};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::sync::Arc;

/// Backend operations the sync core depends on
#[async_trait]
pub trait RemoteClient: Send + Sync {
    /// Conversations of the current user, in server order
    async fn list_conversations(&self) -> SyncResult<Vec<Conversation>>;

    /// Messages of one conversation
    async fn list_messages(&self, conversation_id: ConversationId) -> SyncResult<Vec<Message>>;

    /// Create a message; returns the server record
    async fn send_message(
        &self,
        conversation_id: ConversationId,
        content: &str,
    ) -> SyncResult<Message>;

    /// Wishlist rows of the current user
    async fn list_wishlist(&self) -> SyncResult<Vec<WishlistItem>>;

    async fn add_to_wishlist(&self, listing_id: ListingId) -> SyncResult<()>;

    async fn remove_from_wishlist(&self, listing_id: ListingId) -> SyncResult<()>;
}

/// HTTP implementation of [`RemoteClient`]
pub struct HttpRemoteClient {
    config: Config,
    client: Client,
    credentials: Arc<dyn CredentialProvider>,
}

impl HttpRemoteClient {
    pub fn new(config: Config, credentials: Arc<dyn CredentialProvider>) -> SyncResult<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| SyncError::network(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            config,
            client,
            credentials,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match self.credentials.bearer_token() {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn send(&self, request: RequestBuilder) -> SyncResult<Response> {
        let response = self.authorize(request).send().await?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let detail = rejection_detail(status, &body);
        tracing::debug!("[API] Request rejected with {}: {}", status, detail);
        Err(SyncError::rejected(status.as_u16(), detail))
    }

    async fn fetch_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> SyncResult<T> {
        let body = self.send(request).await?.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

#[async_trait]
impl RemoteClient for HttpRemoteClient {
    async fn list_conversations(&self) -> SyncResult<Vec<Conversation>> {
        let url = self.config.api_url("/api/messages/conversations");
        tracing::debug!("[API] GET {}", url);
        let response: ListConversationsResponse = self.fetch_json(self.client.get(&url)).await?;
        Ok(response.conversations)
    }

    async fn list_messages(&self, conversation_id: ConversationId) -> SyncResult<Vec<Message>> {
        let url = self
            .config
            .api_url(&format!("/api/messages/conversations/{}", conversation_id));
        tracing::debug!("[API] GET {}", url);
        let response: ListMessagesResponse = self.fetch_json(self.client.get(&url)).await?;
        Ok(response.messages)
    }

    async fn send_message(
        &self,
        conversation_id: ConversationId,
        content: &str,
    ) -> SyncResult<Message> {
        let url = self
            .config
            .api_url(&format!("/api/messages/conversations/{}/messages", conversation_id));
        tracing::debug!("[API] POST {}", url);
        self.fetch_json(self.client.post(&url).query(&[("content", content)]))
            .await
    }

    async fn list_wishlist(&self) -> SyncResult<Vec<WishlistItem>> {
        let url = self.config.api_url("/api/wishlist");
        tracing::debug!("[API] GET {}", url);
        let response: ListWishlistResponse = self.fetch_json(self.client.get(&url)).await?;
        Ok(response.items)
    }

    async fn add_to_wishlist(&self, listing_id: ListingId) -> SyncResult<()> {
        let url = self.config.api_url("/api/wishlist/");
        tracing::debug!("[API] POST {} ({})", url, listing_id);
        let body = AddWishlistRequest {
            announcement_id: listing_id,
        };
        self.send(self.client.post(&url).json(&body)).await?;
        Ok(())
    }

    async fn remove_from_wishlist(&self, listing_id: ListingId) -> SyncResult<()> {
        let url = self.config.api_url(&format!("/api/wishlist/{}", listing_id));
        tracing::debug!("[API] DELETE {}", url);
        self.send(self.client.delete(&url)).await?;
        Ok(())
    }
}

/// Human-readable detail for a non-success response.
///
/// Prefers a string `detail` field in a JSON body, then the raw body, then
/// the status reason.
pub fn rejection_detail(status: StatusCode, body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        if let Some(detail) = value.get("detail").and_then(|d| d.as_str()) {
            return detail.to_string();
        }
    }

    let body = body.trim();
    if !body.is_empty() {
        return body.to_string();
    }

    status
        .canonical_reason()
        .map(str::to_string)
        .unwrap_or_else(|| status.to_string())
}
