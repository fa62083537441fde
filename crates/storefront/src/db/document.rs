//! The persisted store document.
//!
//! The whole store lives in one JSON object with a top-level array per entity
//! family and a `counters` object holding the next id for each family.
//! Missing arrays and counters default, so files written by earlier versions
//! (no users, no wishlist, settings sharing the order counter) still load.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use craft_bazaar_core::TrackingNumber;

use super::RepositoryError;
use crate::models::{CartItem, Category, Order, Product, Setting, User, WishlistItem};

/// Next id to hand out for each entity family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Counters {
    pub category_id: i32,
    pub product_id: i32,
    pub cart_item_id: i32,
    pub order_id: i32,
    pub setting_id: i32,
    pub user_id: i32,
    pub wishlist_item_id: i32,
}

impl Default for Counters {
    fn default() -> Self {
        Self {
            category_id: 1,
            product_id: 1,
            cart_item_id: 1,
            order_id: 1,
            setting_id: 1,
            user_id: 1,
            wishlist_item_id: 1,
        }
    }
}

/// Take the current value of a counter and advance it.
///
/// A counter that can no longer advance is exhausted: its value is never
/// handed out, so ids stay unique even at `i32::MAX`.
///
/// # Errors
///
/// Returns `RepositoryError::Invalid` once the id space is used up.
pub(crate) fn take(counter: &mut i32) -> Result<i32, RepositoryError> {
    let next = counter
        .checked_add(1)
        .ok_or_else(|| RepositoryError::Invalid("id space exhausted".to_string()))?;
    Ok(std::mem::replace(counter, next))
}

/// Everything the storefront persists.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreDocument {
    #[serde(default)]
    pub categories: Vec<Category>,
    #[serde(default)]
    pub products: Vec<Product>,
    #[serde(default)]
    pub cart_items: Vec<CartItem>,
    #[serde(default)]
    pub orders: Vec<Order>,
    #[serde(default)]
    pub settings: Vec<Setting>,
    #[serde(default)]
    pub users: Vec<User>,
    #[serde(default)]
    pub wishlist: Vec<WishlistItem>,
    #[serde(default)]
    pub counters: Counters,
}

/// What [`StoreDocument::repair`] changed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepairReport {
    /// Counter names that were raised above their collection's max id.
    pub counters_raised: Vec<&'static str>,
    /// Orders that received a tracking number.
    pub tracking_numbers_assigned: usize,
}

impl RepairReport {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.counters_raised.is_empty() && self.tracking_numbers_assigned == 0
    }
}

fn raise(counter: &mut i32, max_id: Option<i32>) -> bool {
    match max_id {
        Some(max) if *counter <= max => {
            *counter = max.saturating_add(1);
            true
        }
        _ => false,
    }
}

impl StoreDocument {
    /// Bring a freshly loaded document up to the current invariants.
    ///
    /// Raises every counter above the largest id in its collection and gives
    /// orders without a tracking number one generated by `make_code`.
    pub fn repair(
        &mut self,
        mut make_code: impl FnMut(&Order, &Self) -> TrackingNumber,
    ) -> RepairReport {
        let mut report = RepairReport::default();
        let max = self.max_ids();
        let counters = &mut self.counters;
        let checks = [
            ("categoryId", &mut counters.category_id, max.category_id),
            ("productId", &mut counters.product_id, max.product_id),
            ("cartItemId", &mut counters.cart_item_id, max.cart_item_id),
            ("orderId", &mut counters.order_id, max.order_id),
            ("settingId", &mut counters.setting_id, max.setting_id),
            ("userId", &mut counters.user_id, max.user_id),
            ("wishlistItemId", &mut counters.wishlist_item_id, max.wishlist_item_id),
        ];
        for (name, counter, max_id) in checks {
            if raise(counter, max_id) {
                report.counters_raised.push(name);
            }
        }

        for index in 0..self.orders.len() {
            let Some(order) = self.orders.get(index) else {
                break;
            };
            if !order.tracking_number.is_unassigned() {
                continue;
            }
            let code = make_code(order, self);
            if let Some(order) = self.orders.get_mut(index) {
                order.tracking_number = code;
                report.tracking_numbers_assigned += 1;
            }
        }
        report
    }

    /// Whether any order already uses `code`.
    #[must_use]
    pub fn tracking_number_taken(&self, code: &TrackingNumber) -> bool {
        self.orders.iter().any(|order| &order.tracking_number == code)
    }

    /// Largest id present in each collection.
    #[must_use]
    pub fn max_ids(&self) -> MaxIds {
        MaxIds {
            category_id: self.categories.iter().map(|c| c.id.as_i32()).max(),
            product_id: self.products.iter().map(|p| p.id.as_i32()).max(),
            cart_item_id: self.cart_items.iter().map(|c| c.id.as_i32()).max(),
            order_id: self.orders.iter().map(|o| o.id.as_i32()).max(),
            setting_id: self.settings.iter().map(|s| s.id.as_i32()).max(),
            user_id: self.users.iter().map(|u| u.id.as_i32()).max(),
            wishlist_item_id: self.wishlist.iter().map(|w| w.id.as_i32()).max(),
        }
    }

    /// Entity counts per collection, keyed by document field name.
    #[must_use]
    pub fn counts(&self) -> BTreeMap<&'static str, usize> {
        BTreeMap::from([
            ("categories", self.categories.len()),
            ("products", self.products.len()),
            ("cartItems", self.cart_items.len()),
            ("orders", self.orders.len()),
            ("settings", self.settings.len()),
            ("users", self.users.len()),
            ("wishlist", self.wishlist.len()),
        ])
    }
}

/// Per-collection maximum ids; `None` for an empty collection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MaxIds {
    pub category_id: Option<i32>,
    pub product_id: Option<i32>,
    pub cart_item_id: Option<i32>,
    pub order_id: Option<i32>,
    pub setting_id: Option<i32>,
    pub user_id: Option<i32>,
    pub wishlist_item_id: Option<i32>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const LEGACY: &str = r#"{
        "categories": [{"id": 4, "name": "Pottery", "slug": "pottery", "description": null, "thumbnail": null}],
        "products": [],
        "cartItems": [],
        "orders": [{"id": 2, "customerName": "A B", "customerEmail": "a@b.c",
            "shippingAddress": "x", "total": "10", "status": "pending", "items": "[]",
            "createdAt": "2025-03-01T10:00:00Z"}],
        "settings": [{"id": 7, "key": "hero_title", "value": "Hi", "type": "text",
            "createdAt": "2025-03-01T10:00:00Z", "updatedAt": "2025-03-01T10:00:00Z"}],
        "counters": {"categoryId": 5, "productId": 1, "cartItemId": 1, "orderId": 8}
    }"#;

    #[test]
    fn test_legacy_document_loads_with_defaults() {
        let doc: StoreDocument = serde_json::from_str(LEGACY).unwrap();
        assert!(doc.users.is_empty());
        assert!(doc.wishlist.is_empty());
        assert_eq!(doc.counters.order_id, 8);
        assert_eq!(doc.counters.setting_id, 1);
        assert_eq!(doc.counters.user_id, 1);
    }

    #[test]
    fn test_repair_raises_counters_and_assigns_tracking() {
        let mut doc: StoreDocument = serde_json::from_str(LEGACY).unwrap();
        let report = doc.repair(|order, _| {
            TrackingNumber::parse(&format!("CBLEGACY{}", order.id)).unwrap()
        });
        assert_eq!(report.counters_raised, ["settingId"]);
        assert_eq!(report.tracking_numbers_assigned, 1);
        assert_eq!(doc.counters.setting_id, 8);
        assert_eq!(doc.counters.category_id, 5);
        assert_eq!(doc.orders[0].tracking_number.as_str(), "CBLEGACY2");

        let again = doc.repair(|_, _| unreachable!());
        assert!(again.is_empty());
    }

    #[test]
    fn test_take_advances() {
        let mut counter = 3;
        assert_eq!(take(&mut counter).unwrap(), 3);
        assert_eq!(take(&mut counter).unwrap(), 4);
        assert_eq!(counter, 5);
    }

    #[test]
    fn test_take_refuses_to_repeat_max_id() {
        let mut counter = i32::MAX - 1;
        assert_eq!(take(&mut counter).unwrap(), i32::MAX - 1);
        assert!(matches!(take(&mut counter), Err(RepositoryError::Invalid(_))));
        assert!(matches!(take(&mut counter), Err(RepositoryError::Invalid(_))));
        assert_eq!(counter, i32::MAX);
    }

    #[test]
    fn test_repair_at_max_id_leaves_counter_exhausted() {
        let mut doc: StoreDocument = serde_json::from_str(LEGACY).unwrap();
        doc.categories[0].id = craft_bazaar_core::CategoryId::new(i32::MAX);
        doc.repair(|order, _| TrackingNumber::parse(&format!("CBX{}", order.id)).unwrap());
        assert_eq!(doc.counters.category_id, i32::MAX);
        assert!(take(&mut doc.counters.category_id).is_err());
    }
}
