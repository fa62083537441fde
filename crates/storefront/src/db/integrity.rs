//! Consistency report over a store document.
//!
//! References between collections are soft: nothing stops a hand-edited
//! file from pointing at a product that does not exist. [`check`] lists every
//! such problem so operators can fix the file.

use std::collections::HashSet;
use std::fmt;

use craft_bazaar_core::{CartItemId, CategoryId, ProductId, WishlistItemId};

use super::document::StoreDocument;

/// A single consistency problem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Issue {
    ProductWithoutCategory {
        product: ProductId,
        category: CategoryId,
    },
    CartItemWithoutProduct {
        item: CartItemId,
        product: ProductId,
    },
    WishlistItemWithoutProduct {
        item: WishlistItemId,
        product: ProductId,
    },
    DuplicateSku(String),
    DuplicateSlug(String),
    DuplicateTrackingNumber(String),
    CounterBehind {
        counter: &'static str,
        value: i32,
        max_id: i32,
    },
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ProductWithoutCategory { product, category } => {
                write!(f, "product {product} references missing category {category}")
            }
            Self::CartItemWithoutProduct { item, product } => {
                write!(f, "cart item {item} references missing product {product}")
            }
            Self::WishlistItemWithoutProduct { item, product } => {
                write!(f, "wishlist item {item} references missing product {product}")
            }
            Self::DuplicateSku(sku) => write!(f, "sku '{sku}' is used more than once"),
            Self::DuplicateSlug(slug) => write!(f, "slug '{slug}' is used more than once"),
            Self::DuplicateTrackingNumber(code) => {
                write!(f, "tracking number '{code}' is used more than once")
            }
            Self::CounterBehind {
                counter,
                value,
                max_id,
            } => write!(f, "counter {counter} is {value} but the largest id is {max_id}"),
        }
    }
}

fn duplicates<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut reported = HashSet::new();
    values
        .filter(|v| !v.is_empty() && !seen.insert(*v) && reported.insert(*v))
        .map(str::to_owned)
        .collect()
}

/// Find every consistency problem in `doc`.
#[must_use]
pub fn check(doc: &StoreDocument) -> Vec<Issue> {
    let mut issues = Vec::new();

    let categories: HashSet<_> = doc.categories.iter().map(|c| c.id).collect();
    let products: HashSet<_> = doc.products.iter().map(|p| p.id).collect();

    issues.extend(
        doc.products
            .iter()
            .filter(|p| !categories.contains(&p.category_id))
            .map(|p| Issue::ProductWithoutCategory {
                product: p.id,
                category: p.category_id,
            }),
    );
    issues.extend(
        doc.cart_items
            .iter()
            .filter(|i| !products.contains(&i.product_id))
            .map(|i| Issue::CartItemWithoutProduct {
                item: i.id,
                product: i.product_id,
            }),
    );
    issues.extend(
        doc.wishlist
            .iter()
            .filter(|i| !products.contains(&i.product_id))
            .map(|i| Issue::WishlistItemWithoutProduct {
                item: i.id,
                product: i.product_id,
            }),
    );

    issues.extend(
        duplicates(doc.products.iter().map(|p| p.sku.as_str())).into_iter().map(Issue::DuplicateSku),
    );
    issues.extend(
        duplicates(doc.categories.iter().map(|c| c.slug.as_str()))
            .into_iter()
            .map(Issue::DuplicateSlug),
    );
    issues.extend(
        duplicates(doc.orders.iter().map(|o| o.tracking_number.as_str()))
            .into_iter()
            .map(Issue::DuplicateTrackingNumber),
    );

    let max = doc.max_ids();
    let c = doc.counters;
    let counters = [
        ("categoryId", c.category_id, max.category_id),
        ("productId", c.product_id, max.product_id),
        ("cartItemId", c.cart_item_id, max.cart_item_id),
        ("orderId", c.order_id, max.order_id),
        ("settingId", c.setting_id, max.setting_id),
        ("userId", c.user_id, max.user_id),
        ("wishlistItemId", c.wishlist_item_id, max.wishlist_item_id),
    ];
    for (counter, value, max_id) in counters {
        if let Some(max_id) = max_id.filter(|max_id| value <= *max_id) {
            issues.push(Issue::CounterBehind {
                counter,
                value,
                max_id,
            });
        }
    }

    issues
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::db::seed::seed_document;

    #[test]
    fn test_seed_is_clean() {
        assert!(check(&seed_document(Utc::now())).is_empty());
    }

    #[test]
    fn test_reports_problems() {
        let mut doc = seed_document(Utc::now());
        doc.categories.retain(|c| c.slug != "jewelry");
        let mut copy = doc.products[0].clone();
        copy.id = ProductId::new(50);
        doc.products.push(copy);

        let issues = check(&doc);
        assert!(issues.contains(&Issue::ProductWithoutCategory {
            product: ProductId::new(3),
            category: CategoryId::new(3),
        }));
        assert!(issues.contains(&Issue::DuplicateSku("POT001".to_owned())));
        assert!(issues.contains(&Issue::CounterBehind {
            counter: "productId",
            value: 7,
            max_id: 50,
        }));
        assert_eq!(
            Issue::DuplicateSku("X".to_owned()).to_string(),
            "sku 'X' is used more than once"
        );
    }
}
