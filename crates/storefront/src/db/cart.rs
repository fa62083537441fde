//! Cart repository.

use chrono::Utc;

use craft_bazaar_core::{CartItemId, ProductId};

use super::document::take;
use super::products::find as find_product;
use super::{Database, RepositoryError};
use crate::models::{CartItem, CartLine, CartUpdate, NewCartItem};

/// Repository for session carts.
pub struct CartRepository<'a> {
    db: &'a Database,
}

impl<'a> CartRepository<'a> {
    /// Create a new cart repository.
    #[must_use]
    pub const fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// The cart for `session_id`, each row joined with its product.
    ///
    /// Rows whose product no longer exists are skipped.
    pub async fn items(&self, session_id: &str) -> Vec<CartLine> {
        self.db
            .read(|doc| {
                doc.cart_items
                    .iter()
                    .filter(|item| item.session_id == session_id)
                    .filter_map(|item| {
                        let Some(product) = find_product(doc, item.product_id) else {
                            tracing::warn!(
                                cart_item = %item.id,
                                product_id = %item.product_id,
                                "Skipping cart row for missing product"
                            );
                            return None;
                        };
                        Some(CartLine {
                            item: item.clone(),
                            product: product.clone(),
                        })
                    })
                    .collect()
            })
            .await
    }

    /// Add a product to a cart, merging with an existing row for the same
    /// product by summing quantities.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::MissingReference` if the product does not
    /// exist and `RepositoryError::Invalid` for a quantity below 1.
    #[tracing::instrument(skip(self, new), fields(session = %new.session_id, product = %new.product_id))]
    pub async fn add(&self, new: NewCartItem) -> Result<CartItem, RepositoryError> {
        if new.quantity < 1 {
            return Err(RepositoryError::Invalid(
                "Quantity must be at least 1".to_owned(),
            ));
        }
        self.db
            .write(|doc| {
                if find_product(doc, new.product_id).is_none() {
                    return Err(RepositoryError::MissingReference(format!(
                        "Product {} does not exist",
                        new.product_id
                    )));
                }
                if let Some(existing) = doc
                    .cart_items
                    .iter_mut()
                    .find(|i| i.session_id == new.session_id && i.product_id == new.product_id)
                {
                    existing.quantity = existing.quantity.saturating_add(new.quantity);
                    return Ok(existing.clone());
                }
                let item = CartItem {
                    id: CartItemId::new(take(&mut doc.counters.cart_item_id)?),
                    session_id: new.session_id,
                    product_id: new.product_id,
                    quantity: new.quantity,
                    created_at: Utc::now(),
                };
                doc.cart_items.push(item.clone());
                Ok(item)
            })
            .await
    }

    /// Set the quantity of a cart row; zero or less removes it.
    ///
    /// Returns `None` if the cart has no row for the product.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the store cannot be saved.
    #[tracing::instrument(skip(self))]
    pub async fn update(
        &self,
        session_id: &str,
        product_id: ProductId,
        quantity: i32,
    ) -> Result<Option<CartUpdate>, RepositoryError> {
        self.db
            .write_opt(|doc| {
                let Some(index) = doc
                    .cart_items
                    .iter()
                    .position(|i| i.session_id == session_id && i.product_id == product_id)
                else {
                    return Ok(None);
                };
                if quantity <= 0 {
                    doc.cart_items.remove(index);
                    return Ok(Some(CartUpdate::Removed));
                }
                Ok(doc.cart_items.get_mut(index).map(|item| {
                    item.quantity = quantity;
                    CartUpdate::Updated(item.clone())
                }))
            })
            .await
    }

    /// Remove one product from a cart. Returns `false` if it was not there.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the store cannot be saved.
    #[tracing::instrument(skip(self))]
    pub async fn remove(&self, session_id: &str, product_id: ProductId) -> Result<bool, RepositoryError> {
        let removed = self
            .db
            .write_opt(|doc| {
                let before = doc.cart_items.len();
                doc.cart_items
                    .retain(|i| !(i.session_id == session_id && i.product_id == product_id));
                Ok((doc.cart_items.len() < before).then_some(()))
            })
            .await?;
        Ok(removed.is_some())
    }

    /// Empty a cart. Returns whether anything was removed.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the store cannot be saved.
    #[tracing::instrument(skip(self))]
    pub async fn clear(&self, session_id: &str) -> Result<bool, RepositoryError> {
        let cleared = self
            .db
            .write_opt(|doc| {
                let before = doc.cart_items.len();
                doc.cart_items.retain(|i| i.session_id != session_id);
                Ok((doc.cart_items.len() < before).then_some(()))
            })
            .await?;
        Ok(cleared.is_some())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn add(session: &str, product: i32, quantity: i32) -> NewCartItem {
        NewCartItem {
            session_id: session.to_owned(),
            product_id: ProductId::new(product),
            quantity,
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_adds_are_all_persisted() {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::open(dir.path()).await.unwrap();

        let tasks: Vec<_> = (0..50)
            .map(|i| {
                let db = db.clone();
                tokio::spawn(async move {
                    CartRepository::new(&db)
                        .add(add(&format!("session-{i}"), 1 + i % 6, 1))
                        .await
                })
            })
            .collect();
        for task in tasks {
            task.await.unwrap().unwrap();
        }
        drop(db);

        let reopened = Database::open(dir.path()).await.unwrap();
        let ids: std::collections::BTreeSet<i32> = reopened
            .read(|doc| doc.cart_items.iter().map(|item| item.id.as_i32()).collect())
            .await;
        assert_eq!(ids.len(), 50);
        assert_eq!(ids.first(), Some(&1));
        assert_eq!(ids.last(), Some(&50));
        assert_eq!(reopened.read(|doc| doc.counters.cart_item_id).await, 51);
    }

    #[tokio::test]
    async fn test_add_merges_same_product() {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::open(dir.path()).await.unwrap();
        let cart = CartRepository::new(&db);

        let first = cart.add(add("s1", 1, 2)).await.unwrap();
        let second = cart.add(add("s1", 1, 3)).await.unwrap();
        assert_eq!(first.id, second.id);
        assert_eq!(second.quantity, 5);

        let lines = cart.items("s1").await;
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].item.quantity, 5);
        assert_eq!(lines[0].product.sku, "POT001");
    }

    #[tokio::test]
    async fn test_sessions_are_isolated() {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::open(dir.path()).await.unwrap();
        let cart = CartRepository::new(&db);
        cart.add(add("a", 1, 1)).await.unwrap();
        cart.add(add("b", 1, 1)).await.unwrap();

        assert_eq!(cart.items("a").await.len(), 1);
        assert!(cart.clear("a").await.unwrap());
        assert!(!cart.clear("a").await.unwrap());
        assert_eq!(cart.items("b").await.len(), 1);
    }

    #[tokio::test]
    async fn test_add_unknown_product_fails() {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::open(dir.path()).await.unwrap();
        let result = CartRepository::new(&db).add(add("s", 99, 1)).await;
        assert!(matches!(result, Err(RepositoryError::MissingReference(_))));
    }

    #[tokio::test]
    async fn test_update_to_zero_removes() {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::open(dir.path()).await.unwrap();
        let cart = CartRepository::new(&db);
        cart.add(add("s", 3, 2)).await.unwrap();

        let updated = cart.update("s", ProductId::new(3), 4).await.unwrap();
        assert!(matches!(updated, Some(CartUpdate::Updated(ref item)) if item.quantity == 4));

        let removed = cart.update("s", ProductId::new(3), 0).await.unwrap();
        assert_eq!(removed, Some(CartUpdate::Removed));
        assert!(cart.items("s").await.is_empty());
        assert_eq!(cart.update("s", ProductId::new(3), 1).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_remove_reports_absence() {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::open(dir.path()).await.unwrap();
        let cart = CartRepository::new(&db);
        cart.add(add("s", 1, 1)).await.unwrap();

        assert!(cart.remove("s", ProductId::new(1)).await.unwrap());
        assert!(!cart.remove("s", ProductId::new(1)).await.unwrap());
    }

    #[tokio::test]
    async fn test_items_skip_missing_products() {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::open(dir.path()).await.unwrap();
        let cart = CartRepository::new(&db);
        cart.add(add("s", 1, 1)).await.unwrap();
        cart.add(add("s", 2, 1)).await.unwrap();
        db.write(|doc| {
            doc.products.retain(|p| p.id != ProductId::new(1));
            Ok(())
        })
        .await
        .unwrap();

        let lines = cart.items("s").await;
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].item.product_id, ProductId::new(2));
    }
}
