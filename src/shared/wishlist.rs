//! Wishlist Data Structures
//!
//! The wishlist is a set of listing identifiers. The backend also returns a
//! summary of each listing, which the wishlist page renders.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Backend listing ("announcement") identifier
pub type ListingId = i64;

/// Set of wishlisted listing IDs
pub type WishlistSet = BTreeSet<ListingId>;

/// Cover shown when a listing has no image
pub const PLACEHOLDER_COVER_URL: &str = "https://via.placeholder.com/150";

/// Book details nested in a listing summary
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct BookSummary {
    pub title: String,
    #[serde(default)]
    pub cover_image_url: Option<String>,
}

/// Listing details nested in a wishlist item
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ListingSummary {
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub book: Option<BookSummary>,
}

/// One row of `GET /api/wishlist`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WishlistItem {
    pub announcement_id: ListingId,
    #[serde(default)]
    pub announcement: Option<ListingSummary>,
}

impl WishlistItem {
    pub fn title(&self) -> Option<&str> {
        self.announcement
            .as_ref()
            .and_then(|a| a.book.as_ref())
            .map(|b| b.title.as_str())
    }

    pub fn price(&self) -> Option<f64> {
        self.announcement.as_ref().and_then(|a| a.price)
    }

    pub fn status(&self) -> Option<&str> {
        self.announcement.as_ref().and_then(|a| a.status.as_deref())
    }

    /// Cover image URL, falling back to a placeholder
    pub fn cover_url(&self) -> &str {
        self.announcement
            .as_ref()
            .and_then(|a| a.book.as_ref())
            .and_then(|b| b.cover_image_url.as_deref())
            .unwrap_or(PLACEHOLDER_COVER_URL)
    }

    /// Whether the listing can still be bought
    pub fn is_available(&self) -> bool {
        matches!(self.status(), Some("Active") | Some("Available"))
    }
}

/// Response for listing the wishlist
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListWishlistResponse {
    pub items: Vec<WishlistItem>,
}

/// Request body for adding a listing to the wishlist
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddWishlistRequest {
    pub announcement_id: ListingId,
}
