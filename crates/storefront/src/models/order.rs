//! Order types.
//!
//! Orders freeze the purchased lines at checkout time. The `items` field is
//! kept as a JSON-encoded string in both the store document and API
//! responses, which is what existing data files and clients expect.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use craft_bazaar_core::{
    Email, OrderId, OrderStatus, Price, ProductId, RecordedStatus, TrackingNumber, UserId,
};

use super::{FieldErrors, Payload};

/// A purchased line, snapshotted from the product at checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub product_id: ProductId,
    #[serde(alias = "productName")]
    pub name: String,
    pub price: Price,
    pub quantity: i32,
    #[serde(default)]
    pub sku: String,
}

/// A placed order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    /// Account that placed the order; absent on guest orders from older data.
    #[serde(default)]
    pub user_id: Option<UserId>,
    pub customer_name: String,
    pub customer_email: String,
    #[serde(default)]
    pub customer_phone: Option<String>,
    pub shipping_address: String,
    pub total: Price,
    #[serde(default)]
    pub status: RecordedStatus,
    #[serde(default)]
    pub tracking_number: TrackingNumber,
    #[serde(with = "order_items")]
    pub items: Vec<OrderItem>,
    pub created_at: DateTime<Utc>,
}

impl Order {
    /// First word of the customer name, for the public tracking view.
    #[must_use]
    pub fn customer_first_name(&self) -> &str {
        self.customer_name.split_whitespace().next().unwrap_or_default()
    }
}

/// Public view returned by `GET /track/{trackingNumber}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackingInfo {
    pub id: OrderId,
    pub tracking_number: TrackingNumber,
    pub status: RecordedStatus,
    pub created_at: DateTime<Utc>,
    /// First name only.
    pub customer_name: String,
    pub total: Price,
}

impl From<&Order> for TrackingInfo {
    fn from(order: &Order) -> Self {
        Self {
            id: order.id,
            tracking_number: order.tracking_number.clone(),
            status: order.status.clone(),
            created_at: order.created_at,
            customer_name: order.customer_first_name().to_owned(),
            total: order.total,
        }
    }
}

/// Checkout payload.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewOrder {
    #[validate(length(min = 1, max = 100, message = "must be 1-100 characters"))]
    pub customer_name: String,
    pub customer_email: String,
    #[serde(default)]
    #[validate(length(max = 30, message = "must be at most 30 characters"))]
    pub customer_phone: Option<String>,
    #[validate(length(min = 1, max = 500, message = "must be 1-500 characters"))]
    pub shipping_address: String,
    pub total: Price,
    #[serde(with = "order_items")]
    pub items: Vec<OrderItem>,
}

impl Payload for NewOrder {
    fn check(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::collect(self.validate());
        if let Err(e) = Email::parse(&self.customer_email) {
            errors.push("customerEmail", e.to_string());
        }
        if self.items.is_empty() {
            errors.push("items", "must contain at least one item");
        }
        if self.items.iter().any(|item| item.quantity < 1) {
            errors.push("items", "every item needs a quantity of at least 1");
        }
        errors.into_result()
    }
}

/// Payload for `PUT /orders/{id}/status`.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct StatusUpdate {
    pub status: OrderStatus,
}

impl Payload for StatusUpdate {
    fn check(&self) -> Result<(), FieldErrors> {
        Ok(())
    }
}

/// Serde adapter for the JSON-string encoding of order items.
///
/// Serializes to a string containing a JSON array. Deserializes from either
/// such a string or a plain array.
pub mod order_items {
    use serde::{Deserialize, Deserializer, Serializer};

    use super::OrderItem;

    /// # Errors
    ///
    /// Returns an error if the items cannot be encoded.
    pub fn serialize<S>(items: &[OrderItem], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let encoded = serde_json::to_string(items).map_err(serde::ser::Error::custom)?;
        serializer.serialize_str(&encoded)
    }

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Encoded {
        Text(String),
        Items(Vec<OrderItem>),
    }

    /// # Errors
    ///
    /// Returns an error if the value is neither an item array nor a string
    /// holding one.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<OrderItem>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Encoded::deserialize(deserializer)? {
            Encoded::Items(items) => Ok(items),
            Encoded::Text(text) => serde_json::from_str(&text).map_err(serde::de::Error::custom),
        }
    }
}
