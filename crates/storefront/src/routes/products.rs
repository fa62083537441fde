//! Product route handlers.

use axum::{Json, extract::State, http::StatusCode};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::instrument;

use craft_bazaar_core::ProductId;

use crate::db::categories::CategoryRepository;
use crate::db::products::ProductRepository;
use crate::error::{AppError, Result};
use crate::extract::{Path, Query, ValidJson};
use crate::middleware::RequireAdmin;
use crate::models::{NewProduct, Product, ProductUpdate, ProductWithCategory};
use crate::recommendations;
use crate::state::AppState;

/// Query parameters for `GET /api/products`.
#[derive(Debug, Default, Deserialize)]
pub struct ProductQuery {
    pub search: Option<String>,
    pub featured: Option<String>,
    pub category: Option<String>,
}

/// Which listing a product query asks for.
#[derive(Debug, PartialEq, Eq)]
enum Listing<'a> {
    Search(&'a str),
    Featured,
    Category(&'a str),
    All,
}

impl ProductQuery {
    /// Search wins over featured, which wins over category. Empty values
    /// count as absent.
    fn listing(&self) -> Listing<'_> {
        fn present(value: Option<&str>) -> Option<&str> {
            value.filter(|v| !v.is_empty())
        }

        if let Some(search) = present(self.search.as_deref()) {
            Listing::Search(search)
        } else if self.featured.as_deref() == Some("true") {
            Listing::Featured
        } else if let Some(slug) = present(self.category.as_deref()) {
            Listing::Category(slug)
        } else {
            Listing::All
        }
    }
}

/// List products.
///
/// An unknown category slug yields an empty list.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<ProductQuery>,
) -> Json<Vec<Product>> {
    let products = ProductRepository::new(state.db());

    let list = match query.listing() {
        Listing::Search(term) => products.search(term).await,
        Listing::Featured => products.featured().await,
        Listing::Category(slug) => {
            match CategoryRepository::new(state.db()).get_by_slug(slug).await {
                Some(category) => products.list(Some(category.id)).await,
                None => Vec::new(),
            }
        }
        Listing::All => products.list(None).await,
    };

    Json(list)
}

/// Every product joined with its category.
#[instrument(skip(state))]
pub async fn with_category(State(state): State<AppState>) -> Json<Vec<ProductWithCategory>> {
    Json(ProductRepository::new(state.db()).with_category().await)
}

/// A single product with its category.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<Json<ProductWithCategory>> {
    ProductRepository::new(state.db())
        .get_with_category(id)
        .await
        .map(Json)
        .ok_or_else(|| AppError::NotFound("Product not found".to_string()))
}

/// Products similar to the given one, best first.
#[instrument(skip(state))]
pub async fn recommendations(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<Json<Vec<Product>>> {
    let products = ProductRepository::new(state.db());
    let reference = products
        .get(id)
        .await
        .ok_or_else(|| AppError::NotFound("Product not found".to_string()))?;

    let catalog = products.list(None).await;
    Ok(Json(recommendations::recommend(&reference, &catalog)))
}

/// Create a product.
#[instrument(skip(state, admin, new), fields(admin = %admin.id, sku = %new.sku))]
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    ValidJson(new): ValidJson<NewProduct>,
) -> Result<(StatusCode, Json<Product>)> {
    let product = ProductRepository::new(state.db()).create(new).await?;
    tracing::info!(product = %product.id, "Product created");
    Ok((StatusCode::CREATED, Json(product)))
}

/// Apply a partial update to a product.
#[instrument(skip(state, _admin, update))]
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<ProductId>,
    ValidJson(update): ValidJson<ProductUpdate>,
) -> Result<Json<Product>> {
    ProductRepository::new(state.db())
        .update(id, update)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound("Product not found".to_string()))
}

/// Delete a product along with the cart and wishlist rows that reference it.
#[instrument(skip(state, _admin))]
pub async fn delete(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<ProductId>,
) -> Result<Json<Value>> {
    if !ProductRepository::new(state.db()).delete(id).await? {
        return Err(AppError::NotFound("Product not found".to_string()));
    }
    Ok(Json(json!({ "message": "Product deleted successfully" })))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(search: Option<&str>, featured: Option<&str>, category: Option<&str>) -> ProductQuery {
        ProductQuery {
            search: search.map(String::from),
            featured: featured.map(String::from),
            category: category.map(String::from),
        }
    }

    #[test]
    fn test_listing_precedence() {
        assert_eq!(
            query(Some("vase"), Some("true"), Some("pottery")).listing(),
            Listing::Search("vase")
        );
        assert_eq!(
            query(None, Some("true"), Some("pottery")).listing(),
            Listing::Featured
        );
        assert_eq!(
            query(None, Some("false"), Some("pottery")).listing(),
            Listing::Category("pottery")
        );
        assert_eq!(query(None, None, None).listing(), Listing::All);
    }

    #[test]
    fn test_empty_values_are_absent() {
        assert_eq!(
            query(Some(""), None, Some("textiles")).listing(),
            Listing::Category("textiles")
        );
        assert_eq!(query(None, None, Some("")).listing(), Listing::All);
    }
}
