//! Authentication route handlers.
//!
//! Tokens are returned as `sessionId` and sent back as
//! `Authorization: Bearer <sessionId>`.

use axum::{Json, extract::State, http::StatusCode};
use serde::Serialize;
use serde_json::{Value, json};
use tracing::instrument;

use crate::error::{Result, clear_sentry_user, set_sentry_user};
use crate::extract::ValidJson;
use crate::middleware::{BearerToken, RequireUser};
use crate::models::{LoginRequest, RegisterRequest, User, UserProfile};
use crate::services::auth::AuthService;
use crate::state::AppState;

/// A user together with their session token.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub user: UserProfile,
    pub session_id: String,
}

impl SessionResponse {
    fn new(user: &User, session_id: String) -> Self {
        Self {
            user: UserProfile::from(user),
            session_id,
        }
    }
}

/// Create a customer account and log it in.
#[instrument(skip(state, form), fields(email = %form.email))]
pub async fn register(
    State(state): State<AppState>,
    ValidJson(form): ValidJson<RegisterRequest>,
) -> Result<(StatusCode, Json<SessionResponse>)> {
    let (user, token) = AuthService::new(state.db(), state.sessions())
        .register(&form.name, &form.email, &form.password)
        .await?;

    set_sentry_user(&user.id, Some(&user.email));
    Ok((StatusCode::CREATED, Json(SessionResponse::new(&user, token))))
}

/// Exchange email and password for a session token.
#[instrument(skip(state, form), fields(email = %form.email))]
pub async fn login(
    State(state): State<AppState>,
    ValidJson(form): ValidJson<LoginRequest>,
) -> Result<Json<SessionResponse>> {
    let (user, token) = AuthService::new(state.db(), state.sessions())
        .login(&form.email, &form.password)
        .await?;

    set_sentry_user(&user.id, Some(&user.email));
    tracing::info!(user = %user.id, "Logged in");
    Ok(Json(SessionResponse::new(&user, token)))
}

/// Revoke the caller's token. Succeeds without a token too.
#[instrument(skip_all)]
pub async fn logout(State(state): State<AppState>, BearerToken(token): BearerToken) -> Json<Value> {
    if let Some(token) = token {
        AuthService::new(state.db(), state.sessions())
            .logout(&token)
            .await;
    }
    clear_sentry_user();
    Json(json!({ "message": "Logged out successfully" }))
}

/// The user behind the caller's token.
#[instrument(skip_all)]
pub async fn me(
    RequireUser(user): RequireUser,
    BearerToken(token): BearerToken,
) -> Json<SessionResponse> {
    Json(SessionResponse::new(&user, token.unwrap_or_default()))
}
