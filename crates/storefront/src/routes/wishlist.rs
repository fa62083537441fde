//! Wishlist route handlers. Every route requires a logged-in user.

use axum::{Json, extract::State, http::StatusCode};
use serde_json::{Value, json};
use tracing::instrument;

use craft_bazaar_core::ProductId;

use crate::db::wishlist::WishlistRepository;
use crate::error::{AppError, Result};
use crate::extract::{Path, ValidJson};
use crate::middleware::RequireUser;
use crate::models::{NewWishlistItem, WishlistItem, WishlistLine};
use crate::state::AppState;

#[instrument(skip(state, user), fields(user = %user.id))]
pub async fn index(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
) -> Json<Vec<WishlistLine>> {
    Json(WishlistRepository::new(state.db()).items(user.id).await)
}

/// Save a product. Saving one that is already there returns the existing row.
#[instrument(skip(state, user, body), fields(user = %user.id, product = %body.product_id))]
pub async fn add(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    ValidJson(body): ValidJson<NewWishlistItem>,
) -> Result<(StatusCode, Json<WishlistItem>)> {
    let item = WishlistRepository::new(state.db())
        .add(user.id, body.product_id)
        .await?;
    Ok((StatusCode::CREATED, Json(item)))
}

#[instrument(skip(state, user), fields(user = %user.id))]
pub async fn remove(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Path(product_id): Path<ProductId>,
) -> Result<Json<Value>> {
    if !WishlistRepository::new(state.db())
        .remove(user.id, product_id)
        .await?
    {
        return Err(AppError::NotFound("Wishlist item not found".to_string()));
    }
    Ok(Json(json!({ "message": "Removed from wishlist" })))
}

#[instrument(skip(state, user), fields(user = %user.id))]
pub async fn clear(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
) -> Result<Json<Value>> {
    WishlistRepository::new(state.db()).clear(user.id).await?;
    Ok(Json(json!({ "message": "Wishlist cleared" })))
}
