//! Wishlist repository.

use chrono::Utc;

use craft_bazaar_core::{ProductId, UserId, WishlistItemId};

use super::document::take;
use super::products::find as find_product;
use super::{Database, RepositoryError};
use crate::models::{WishlistItem, WishlistLine};

/// Repository for per-user wishlists.
pub struct WishlistRepository<'a> {
    db: &'a Database,
}

impl<'a> WishlistRepository<'a> {
    /// Create a new wishlist repository.
    #[must_use]
    pub const fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// A user's wishlist joined with products, skipping rows whose product
    /// is gone.
    pub async fn items(&self, user_id: UserId) -> Vec<WishlistLine> {
        self.db
            .read(|doc| {
                doc.wishlist
                    .iter()
                    .filter(|item| item.user_id == user_id)
                    .filter_map(|item| {
                        let Some(product) = find_product(doc, item.product_id) else {
                            tracing::warn!(
                                wishlist_item = %item.id,
                                product_id = %item.product_id,
                                "Skipping wishlist row for missing product"
                            );
                            return None;
                        };
                        Some(WishlistLine {
                            item: item.clone(),
                            product: product.clone(),
                        })
                    })
                    .collect()
            })
            .await
    }

    /// Save a product to a wishlist. Adding a product twice returns the
    /// existing row.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::MissingReference` if the product does not
    /// exist.
    #[tracing::instrument(skip(self))]
    pub async fn add(&self, user_id: UserId, product_id: ProductId) -> Result<WishlistItem, RepositoryError> {
        self.db
            .write_if(|doc| {
                if find_product(doc, product_id).is_none() {
                    return Err(RepositoryError::MissingReference(format!(
                        "Product {product_id} does not exist"
                    )));
                }
                if let Some(existing) = doc
                    .wishlist
                    .iter()
                    .find(|i| i.user_id == user_id && i.product_id == product_id)
                {
                    return Ok((existing.clone(), false));
                }
                let item = WishlistItem {
                    id: WishlistItemId::new(take(&mut doc.counters.wishlist_item_id)?),
                    user_id,
                    product_id,
                    added_at: Utc::now(),
                };
                doc.wishlist.push(item.clone());
                Ok((item, true))
            })
            .await
    }

    /// Remove a product from a wishlist. Returns `false` if it was not there.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the store cannot be saved.
    #[tracing::instrument(skip(self))]
    pub async fn remove(&self, user_id: UserId, product_id: ProductId) -> Result<bool, RepositoryError> {
        let removed = self
            .db
            .write_opt(|doc| {
                let before = doc.wishlist.len();
                doc.wishlist
                    .retain(|i| !(i.user_id == user_id && i.product_id == product_id));
                Ok((doc.wishlist.len() < before).then_some(()))
            })
            .await?;
        Ok(removed.is_some())
    }

    /// Empty a user's wishlist. Returns whether anything was removed.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the store cannot be saved.
    #[tracing::instrument(skip(self))]
    pub async fn clear(&self, user_id: UserId) -> Result<bool, RepositoryError> {
        let cleared = self
            .db
            .write_opt(|doc| {
                let before = doc.wishlist.len();
                doc.wishlist.retain(|i| i.user_id != user_id);
                Ok((doc.wishlist.len() < before).then_some(()))
            })
            .await?;
        Ok(cleared.is_some())
    }
}
