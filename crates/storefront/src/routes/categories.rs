//! Category route handlers.

use axum::{Json, extract::State, http::StatusCode};
use serde_json::{Value, json};
use tracing::instrument;

use craft_bazaar_core::CategoryId;

use crate::db::categories::CategoryRepository;
use crate::error::{AppError, Result};
use crate::extract::{Path, ValidJson};
use crate::middleware::RequireAdmin;
use crate::models::{Category, CategoryUpdate, NewCategory};
use crate::state::AppState;

/// List all categories.
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> Json<Vec<Category>> {
    Json(CategoryRepository::new(state.db()).list().await)
}

/// Look up a category by slug.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<Category>> {
    CategoryRepository::new(state.db())
        .get_by_slug(&slug)
        .await
        .map(Json)
        .ok_or_else(|| AppError::NotFound("Category not found".to_string()))
}

/// Create a category.
#[instrument(skip(state, admin, new), fields(admin = %admin.id, name = %new.name))]
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    ValidJson(new): ValidJson<NewCategory>,
) -> Result<(StatusCode, Json<Category>)> {
    let category = CategoryRepository::new(state.db()).create(new).await?;
    tracing::info!(category = %category.id, slug = %category.slug, "Category created");
    Ok((StatusCode::CREATED, Json(category)))
}

/// Apply a partial update to a category.
#[instrument(skip(state, _admin, update))]
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<CategoryId>,
    ValidJson(update): ValidJson<CategoryUpdate>,
) -> Result<Json<Category>> {
    CategoryRepository::new(state.db())
        .update(id, update)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound("Category not found".to_string()))
}

/// Delete a category that no product uses.
#[instrument(skip(state, _admin))]
pub async fn delete(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<CategoryId>,
) -> Result<Json<Value>> {
    if !CategoryRepository::new(state.db()).delete(id).await? {
        return Err(AppError::NotFound("Category not found".to_string()));
    }
    Ok(Json(json!({ "message": "Category deleted successfully" })))
}
