//! Wishlist types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use craft_bazaar_core::{ProductId, UserId, WishlistItemId};

use super::{FieldErrors, Payload, Product};

/// A product saved to a user's wishlist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WishlistItem {
    pub id: WishlistItemId,
    pub user_id: UserId,
    pub product_id: ProductId,
    pub added_at: DateTime<Utc>,
}

/// A wishlist row joined with its product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WishlistLine {
    #[serde(flatten)]
    pub item: WishlistItem,
    pub product: Product,
}

/// Payload for `POST /wishlist`.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewWishlistItem {
    pub product_id: ProductId,
}

impl Payload for NewWishlistItem {
    fn check(&self) -> Result<(), FieldErrors> {
        Ok(())
    }
}
