//! Cart route handlers.
//!
//! Carts belong to an opaque session id chosen by the client; no login is
//! needed to shop.

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::{Value, json};
use tracing::instrument;

use craft_bazaar_core::ProductId;

use crate::db::cart::CartRepository;
use crate::error::{AppError, Result};
use crate::extract::{Path, ValidJson};
use crate::models::{CartItem, CartLine, CartUpdate, NewCartItem, UpdateCartQuantity};
use crate::state::AppState;

/// Cart lines with their products.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Json<Vec<CartLine>> {
    Json(CartRepository::new(state.db()).items(&session_id).await)
}

/// Add a product, merging with an existing line.
#[instrument(skip(state, new), fields(product = %new.product_id, quantity = new.quantity))]
pub async fn add(
    State(state): State<AppState>,
    ValidJson(new): ValidJson<NewCartItem>,
) -> Result<(StatusCode, Json<CartItem>)> {
    let item = CartRepository::new(state.db()).add(new).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

/// Set the quantity of a line; zero removes it.
#[instrument(skip(state, body))]
pub async fn update(
    State(state): State<AppState>,
    Path((session_id, product_id)): Path<(String, ProductId)>,
    ValidJson(body): ValidJson<UpdateCartQuantity>,
) -> Result<Response> {
    let outcome = CartRepository::new(state.db())
        .update(&session_id, product_id, body.quantity)
        .await?
        .ok_or_else(|| AppError::NotFound("Cart item not found".to_string()))?;

    Ok(match outcome {
        CartUpdate::Updated(item) => Json(item).into_response(),
        CartUpdate::Removed => Json(json!({ "message": "Item removed from cart" })).into_response(),
    })
}

/// Remove one line.
#[instrument(skip(state))]
pub async fn remove(
    State(state): State<AppState>,
    Path((session_id, product_id)): Path<(String, ProductId)>,
) -> Result<Json<Value>> {
    if !CartRepository::new(state.db())
        .remove(&session_id, product_id)
        .await?
    {
        return Err(AppError::NotFound("Cart item not found".to_string()));
    }
    Ok(Json(json!({ "message": "Item removed from cart" })))
}

/// Empty the cart. Clearing an empty cart succeeds.
#[instrument(skip(state))]
pub async fn clear(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<Value>> {
    CartRepository::new(state.db()).clear(&session_id).await?;
    Ok(Json(json!({ "message": "Cart cleared" })))
}
