//! Homepage setting route handlers.

use axum::{Json, extract::State, http::StatusCode};
use serde_json::{Value, json};
use tracing::instrument;

use crate::db::RepositoryError;
use crate::db::settings::SettingRepository;
use crate::error::{AppError, Result};
use crate::extract::{Path, ValidJson};
use crate::middleware::RequireAdmin;
use crate::models::{FieldErrors, NewSetting, Setting, SettingValue};
use crate::state::AppState;

#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> Json<Vec<Setting>> {
    Json(SettingRepository::new(state.db()).list().await)
}

#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<Setting>> {
    SettingRepository::new(state.db())
        .get(&key)
        .await
        .map(Json)
        .ok_or_else(|| AppError::NotFound("Setting not found".to_string()))
}

#[instrument(skip(state, _admin, new), fields(key = %new.key))]
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    ValidJson(new): ValidJson<NewSetting>,
) -> Result<(StatusCode, Json<Setting>)> {
    let setting = SettingRepository::new(state.db()).create(new).await?;
    Ok((StatusCode::CREATED, Json(setting)))
}

/// Replace a setting's value. Boolean settings only take `"true"` or
/// `"false"`.
#[instrument(skip(state, _admin, body))]
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(key): Path<String>,
    ValidJson(body): ValidJson<SettingValue>,
) -> Result<Json<Setting>> {
    SettingRepository::new(state.db())
        .update(&key, body.value)
        .await
        .map_err(|err| match err {
            RepositoryError::Invalid(message) => {
                let mut errors = FieldErrors::default();
                errors.push("value", message);
                AppError::Validation(errors)
            }
            other => other.into(),
        })?
        .map(Json)
        .ok_or_else(|| AppError::NotFound("Setting not found".to_string()))
}

#[instrument(skip(state, _admin))]
pub async fn delete(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(key): Path<String>,
) -> Result<Json<Value>> {
    if !SettingRepository::new(state.db()).delete(&key).await? {
        return Err(AppError::NotFound("Setting not found".to_string()));
    }
    Ok(Json(json!({ "message": "Setting deleted successfully" })))
}
