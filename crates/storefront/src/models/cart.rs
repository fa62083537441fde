//! Cart types.
//!
//! Carts are anonymous: rows are keyed by a client-chosen session id, not by
//! a user account.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use craft_bazaar_core::{CartItemId, ProductId};

use super::{FieldErrors, Payload, Product};

/// One product line in a cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub id: CartItemId,
    pub session_id: String,
    pub product_id: ProductId,
    pub quantity: i32,
    pub created_at: DateTime<Utc>,
}

/// A cart row joined with its product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    #[serde(flatten)]
    pub item: CartItem,
    pub product: Product,
}

/// Result of changing a cart row's quantity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartUpdate {
    Updated(CartItem),
    /// The quantity was zero or less, so the row was deleted.
    Removed,
}

const fn default_quantity() -> i32 {
    1
}

/// Payload for adding a product to a cart.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewCartItem {
    #[validate(length(min = 1, max = 128, message = "must be 1-128 characters"))]
    pub session_id: String,
    pub product_id: ProductId,
    #[serde(default = "default_quantity")]
    #[validate(range(min = 1, max = 999, message = "must be between 1 and 999"))]
    pub quantity: i32,
}

impl Payload for NewCartItem {
    fn check(&self) -> Result<(), FieldErrors> {
        FieldErrors::collect(self.validate()).into_result()
    }
}

/// Payload for `PUT /cart/{sessionId}/{productId}`.
#[derive(Debug, Clone, Copy, Deserialize, Validate)]
pub struct UpdateCartQuantity {
    /// Zero removes the row.
    #[validate(range(min = 0, max = 999, message = "must be between 0 and 999"))]
    pub quantity: i32,
}

impl Payload for UpdateCartQuantity {
    fn check(&self) -> Result<(), FieldErrors> {
        FieldErrors::collect(self.validate()).into_result()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_new_cart_item_defaults_quantity() {
        let new: NewCartItem =
            serde_json::from_str(r#"{"sessionId":"abc","productId":3}"#).unwrap();
        assert_eq!(new.quantity, 1);
        assert!(new.check().is_ok());
    }

    #[test]
    fn test_new_cart_item_rejects_zero_quantity() {
        let new: NewCartItem =
            serde_json::from_str(r#"{"sessionId":"abc","productId":3,"quantity":0}"#).unwrap();
        assert!(new.check().unwrap_err().get("quantity").is_some());
    }

    #[test]
    fn test_update_quantity_rules() {
        let zero: UpdateCartQuantity = serde_json::from_str(r#"{"quantity":0}"#).unwrap();
        assert!(zero.check().is_ok());
        let negative: UpdateCartQuantity = serde_json::from_str(r#"{"quantity":-1}"#).unwrap();
        assert!(negative.check().is_err());
        assert!(serde_json::from_str::<UpdateCartQuantity>(r#"{"quantity":1.5}"#).is_err());
    }
}
