//! Category repository.

use craft_bazaar_core::CategoryId;

use super::document::{StoreDocument, take};
use super::{Database, RepositoryError};
use crate::models::{Category, CategoryUpdate, NewCategory};

/// Repository for product categories.
pub struct CategoryRepository<'a> {
    db: &'a Database,
}

impl<'a> CategoryRepository<'a> {
    /// Create a new category repository.
    #[must_use]
    pub const fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// All categories in insertion order.
    pub async fn list(&self) -> Vec<Category> {
        self.db.read(|doc| doc.categories.clone()).await
    }

    pub async fn get(&self, id: CategoryId) -> Option<Category> {
        self.db.read(|doc| find(doc, id).cloned()).await
    }

    /// Look up a category by its exact slug.
    pub async fn get_by_slug(&self, slug: &str) -> Option<Category> {
        self.db
            .read(|doc| doc.categories.iter().find(|c| c.slug == slug).cloned())
            .await
    }

    /// Create a category.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the name or slug is taken and
    /// `RepositoryError::Invalid` if no usable slug can be made.
    #[tracing::instrument(skip(self, new), fields(name = %new.name))]
    pub async fn create(&self, new: NewCategory) -> Result<Category, RepositoryError> {
        let slug = new
            .resolved_slug()
            .ok_or_else(|| RepositoryError::Invalid(format!("no valid slug for '{}'", new.name)))?;

        self.db
            .write(|doc| {
                ensure_unique(doc, None, &new.name, slug.as_str())?;
                let category = Category {
                    id: CategoryId::new(take(&mut doc.counters.category_id)?),
                    name: new.name,
                    slug: slug.into(),
                    description: new.description,
                    thumbnail: new.thumbnail,
                };
                doc.categories.push(category.clone());
                Ok(category)
            })
            .await
    }

    /// Merge the supplied fields into a category.
    ///
    /// Returns `None` if the category does not exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the new name or slug is taken.
    #[tracing::instrument(skip(self, update))]
    pub async fn update(
        &self,
        id: CategoryId,
        update: CategoryUpdate,
    ) -> Result<Option<Category>, RepositoryError> {
        self.db
            .write_opt(|doc| {
                let Some(mut category) = find(doc, id).cloned() else {
                    return Ok(None);
                };
                update.apply(&mut category);
                ensure_unique(doc, Some(id), &category.name, &category.slug)?;
                if let Some(slot) = doc.categories.iter_mut().find(|c| c.id == id) {
                    *slot = category.clone();
                }
                Ok(Some(category))
            })
            .await
    }

    /// Delete a category that no product uses.
    ///
    /// Returns `false` if the category does not exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::ReferenceInUse` if products still belong to
    /// the category; the category is kept.
    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, id: CategoryId) -> Result<bool, RepositoryError> {
        let deleted = self
            .db
            .write_opt(|doc| {
                let Some(index) = doc.categories.iter().position(|c| c.id == id) else {
                    return Ok(None);
                };
                let in_use = doc.products.iter().filter(|p| p.category_id == id).count();
                if in_use > 0 {
                    return Err(RepositoryError::ReferenceInUse(format!(
                        "Cannot delete category: {in_use} product(s) are still using it"
                    )));
                }
                doc.categories.remove(index);
                Ok(Some(()))
            })
            .await?;
        Ok(deleted.is_some())
    }
}

fn find(doc: &StoreDocument, id: CategoryId) -> Option<&Category> {
    doc.categories.iter().find(|c| c.id == id)
}

fn ensure_unique(
    doc: &StoreDocument,
    except: Option<CategoryId>,
    name: &str,
    slug: &str,
) -> Result<(), RepositoryError> {
    for other in doc.categories.iter().filter(|c| Some(c.id) != except) {
        if other.name.eq_ignore_ascii_case(name) {
            return Err(RepositoryError::Conflict(format!(
                "A category named '{name}' already exists"
            )));
        }
        if other.slug == slug {
            return Err(RepositoryError::Conflict(format!(
                "A category with slug '{slug}' already exists"
            )));
        }
    }
    Ok(())
}
