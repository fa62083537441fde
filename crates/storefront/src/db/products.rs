//! Product repository.

use chrono::Utc;

use craft_bazaar_core::{CategoryId, ProductId};

use super::document::{StoreDocument, take};
use super::{Database, RepositoryError};
use crate::models::{NewProduct, Product, ProductUpdate, ProductWithCategory};

/// Repository for catalog products.
pub struct ProductRepository<'a> {
    db: &'a Database,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// All products, optionally restricted to one category.
    pub async fn list(&self, category_id: Option<CategoryId>) -> Vec<Product> {
        self.db
            .read(|doc| {
                doc.products
                    .iter()
                    .filter(|p| category_id.is_none_or(|id| p.category_id == id))
                    .cloned()
                    .collect()
            })
            .await
    }

    pub async fn featured(&self) -> Vec<Product> {
        self.db
            .read(|doc| doc.products.iter().filter(|p| p.featured).cloned().collect())
            .await
    }

    /// Every product joined with its category.
    ///
    /// Products whose category no longer exists are left out.
    pub async fn with_category(&self) -> Vec<ProductWithCategory> {
        self.db
            .read(|doc| {
                doc.products
                    .iter()
                    .filter_map(|product| join_category(doc, product))
                    .collect()
            })
            .await
    }

    pub async fn get(&self, id: ProductId) -> Option<Product> {
        self.db.read(|doc| find(doc, id).cloned()).await
    }

    /// A product joined with its category, or `None` if either is missing.
    pub async fn get_with_category(&self, id: ProductId) -> Option<ProductWithCategory> {
        self.db
            .read(|doc| find(doc, id).and_then(|product| join_category(doc, product)))
            .await
    }

    /// Case-insensitive substring match over name and description.
    ///
    /// Results keep catalog order; there is no ranking.
    pub async fn search(&self, query: &str) -> Vec<Product> {
        let needle = query.to_lowercase();
        self.db
            .read(|doc| {
                doc.products
                    .iter()
                    .filter(|p| {
                        p.name.to_lowercase().contains(&needle)
                            || p.description.to_lowercase().contains(&needle)
                    })
                    .cloned()
                    .collect()
            })
            .await
    }

    /// Create a product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the sku is taken and
    /// `RepositoryError::MissingReference` if the category does not exist.
    #[tracing::instrument(skip(self, new), fields(sku = %new.sku))]
    pub async fn create(&self, new: NewProduct) -> Result<Product, RepositoryError> {
        self.db
            .write(|doc| {
                ensure_category(doc, new.category_id)?;
                ensure_unique_sku(doc, None, &new.sku)?;
                let id = ProductId::new(take(&mut doc.counters.product_id)?);
                let product = new.into_product(id, Utc::now());
                doc.products.push(product.clone());
                Ok(product)
            })
            .await
    }

    /// Merge the supplied fields into a product.
    ///
    /// Returns `None` if the product does not exist.
    ///
    /// # Errors
    ///
    /// Same as [`ProductRepository::create`].
    #[tracing::instrument(skip(self, update))]
    pub async fn update(
        &self,
        id: ProductId,
        update: ProductUpdate,
    ) -> Result<Option<Product>, RepositoryError> {
        self.db
            .write_opt(|doc| {
                let Some(mut product) = find(doc, id).cloned() else {
                    return Ok(None);
                };
                update.apply(&mut product);
                ensure_category(doc, product.category_id)?;
                ensure_unique_sku(doc, Some(id), &product.sku)?;
                if let Some(slot) = doc.products.iter_mut().find(|p| p.id == id) {
                    *slot = product.clone();
                }
                Ok(Some(product))
            })
            .await
    }

    /// Delete a product along with the cart and wishlist rows that point at
    /// it.
    ///
    /// Returns `false` if the product does not exist.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the store cannot be saved.
    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, id: ProductId) -> Result<bool, RepositoryError> {
        let deleted = self
            .db
            .write_opt(|doc| {
                let Some(index) = doc.products.iter().position(|p| p.id == id) else {
                    return Ok(None);
                };
                doc.products.remove(index);
                let carts = doc.cart_items.len();
                doc.cart_items.retain(|item| item.product_id != id);
                let wishes = doc.wishlist.len();
                doc.wishlist.retain(|item| item.product_id != id);
                tracing::debug!(
                    cart_rows = carts - doc.cart_items.len(),
                    wishlist_rows = wishes - doc.wishlist.len(),
                    "Removed rows referencing deleted product"
                );
                Ok(Some(()))
            })
            .await?;
        Ok(deleted.is_some())
    }
}

pub(crate) fn find(doc: &StoreDocument, id: ProductId) -> Option<&Product> {
    doc.products.iter().find(|p| p.id == id)
}

fn join_category(doc: &StoreDocument, product: &Product) -> Option<ProductWithCategory> {
    let category = doc
        .categories
        .iter()
        .find(|c| c.id == product.category_id)?;
    Some(ProductWithCategory {
        product: product.clone(),
        category: category.clone(),
    })
}

fn ensure_category(doc: &StoreDocument, id: CategoryId) -> Result<(), RepositoryError> {
    if doc.categories.iter().any(|c| c.id == id) {
        Ok(())
    } else {
        Err(RepositoryError::MissingReference(format!(
            "Category {id} does not exist"
        )))
    }
}

fn ensure_unique_sku(
    doc: &StoreDocument,
    except: Option<ProductId>,
    sku: &str,
) -> Result<(), RepositoryError> {
    if doc
        .products
        .iter()
        .any(|p| Some(p.id) != except && p.sku == sku)
    {
        Err(RepositoryError::Conflict(format!(
            "A product with sku '{sku}' already exists"
        )))
    } else {
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::db::CartRepository;
    use crate::models::NewCartItem;

    fn new_product(sku: &str, category: i32) -> NewProduct {
        NewProduct {
            name: "Clay Lamp".to_owned(),
            description: "Terracotta oil lamp".to_owned(),
            price: "350".parse().unwrap(),
            category_id: CategoryId::new(category),
            stock: 5,
            images: Vec::new(),
            sku: sku.to_owned(),
            featured: false,
            features: vec!["Terracotta".to_owned()],
        }
    }

    #[tokio::test]
    async fn test_create_checks_sku_and_category() {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::open(dir.path()).await.unwrap();
        let repo = ProductRepository::new(&db);

        let lamp = repo.create(new_product("LAMP-1", 1)).await.unwrap();
        assert_eq!(lamp.id, ProductId::new(7));

        assert!(matches!(
            repo.create(new_product("POT001", 1)).await,
            Err(RepositoryError::Conflict(_))
        ));
        assert!(matches!(
            repo.create(new_product("LAMP-2", 42)).await,
            Err(RepositoryError::MissingReference(_))
        ));
        assert_eq!(repo.list(None).await.len(), 7);
    }

    #[tokio::test]
    async fn test_filters() {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::open(dir.path()).await.unwrap();
        let repo = ProductRepository::new(&db);

        assert_eq!(repo.list(Some(CategoryId::new(2))).await.len(), 2);
        assert_eq!(repo.featured().await.len(), 3);

        let hits = repo.search("TRADITIONAL").await;
        let skus: Vec<_> = hits.iter().map(|p| p.sku.as_str()).collect();
        assert_eq!(skus, ["POT001", "JEW001", "WOD001", "TEX002"]);
        assert!(repo.search("unicorn").await.is_empty());
    }

    #[tokio::test]
    async fn test_with_category_drops_orphans() {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::open(dir.path()).await.unwrap();
        db.write(|doc| {
            doc.categories.retain(|c| c.slug != "metalwork");
            Ok(())
        })
        .await
        .unwrap();
        let repo = ProductRepository::new(&db);

        assert_eq!(repo.with_category().await.len(), 5);
        assert!(repo.get_with_category(ProductId::new(6)).await.is_none());
        assert!(repo.get(ProductId::new(6)).await.is_some());
        let joined = repo.get_with_category(ProductId::new(1)).await.unwrap();
        assert_eq!(joined.category.slug, "pottery");
    }

    #[tokio::test]
    async fn test_update_replaces_arrays_and_validates() {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::open(dir.path()).await.unwrap();
        let repo = ProductRepository::new(&db);

        let update = ProductUpdate {
            features: Some(vec!["Glazed".to_owned()]),
            stock: Some(0),
            ..ProductUpdate::default()
        };
        let updated = repo.update(ProductId::new(1), update).await.unwrap().unwrap();
        assert_eq!(updated.features, ["Glazed"]);
        assert_eq!(updated.name, "Traditional Ceramic Vase");

        let bad = ProductUpdate {
            category_id: Some(CategoryId::new(77)),
            ..ProductUpdate::default()
        };
        assert!(matches!(
            repo.update(ProductId::new(1), bad).await,
            Err(RepositoryError::MissingReference(_))
        ));
        assert!(
            repo.update(ProductId::new(404), ProductUpdate::default())
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_delete_cascades_to_cart() {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::open(dir.path()).await.unwrap();
        let cart = CartRepository::new(&db);
        cart.add(NewCartItem {
            session_id: "s1".to_owned(),
            product_id: ProductId::new(2),
            quantity: 1,
        })
        .await
        .unwrap();

        let repo = ProductRepository::new(&db);
        assert!(repo.delete(ProductId::new(2)).await.unwrap());
        assert!(cart.items("s1").await.is_empty());
        assert!(db.read(|doc| doc.cart_items.is_empty()).await);
        assert!(!repo.delete(ProductId::new(2)).await.unwrap());
    }
}
