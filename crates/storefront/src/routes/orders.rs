//! Order and tracking route handlers.

use axum::{Json, extract::State, http::StatusCode};
use tracing::instrument;

use craft_bazaar_core::{OrderId, TrackingNumber};

use crate::db::orders::OrderRepository;
use crate::error::{AppError, Result, add_breadcrumb};
use crate::extract::{Path, ValidJson};
use crate::middleware::{RequireAdmin, RequireUser};
use crate::models::{NewOrder, Order, StatusUpdate, TrackingInfo};
use crate::state::AppState;

/// Every order, for the admin dashboard.
#[instrument(skip(state, _admin))]
pub async fn index(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> Json<Vec<Order>> {
    Json(OrderRepository::new(state.db()).list().await)
}

/// The caller's own orders.
#[instrument(skip(state, user), fields(user = %user.id))]
pub async fn mine(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
) -> Json<Vec<Order>> {
    Json(OrderRepository::new(state.db()).list_for_user(user.id).await)
}

/// A single order, visible to the customer who placed it and to admins.
///
/// Anyone else gets the same 404 as for a missing order.
#[instrument(skip(state, user), fields(user = %user.id))]
pub async fn show(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Path(id): Path<OrderId>,
) -> Result<Json<Order>> {
    OrderRepository::new(state.db())
        .get(id)
        .await
        .filter(|order| user.is_admin() || order.user_id == Some(user.id))
        .map(Json)
        .ok_or_else(|| AppError::NotFound("Order not found".to_string()))
}

/// Checkout: place an order for the logged-in user.
#[instrument(skip(state, user, new), fields(user = %user.id))]
pub async fn create(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    ValidJson(new): ValidJson<NewOrder>,
) -> Result<(StatusCode, Json<Order>)> {
    let order = OrderRepository::new(state.db())
        .create(new, Some(user.id))
        .await?;

    let order_id = order.id.to_string();
    add_breadcrumb(
        "checkout",
        "Order placed",
        Some(&[
            ("order_id", order_id.as_str()),
            ("tracking_number", order.tracking_number.as_str()),
        ]),
    );

    Ok((StatusCode::CREATED, Json(order)))
}

/// Overwrite an order's status.
#[instrument(skip(state, admin, body), fields(admin = %admin.id, status = %body.status))]
pub async fn update_status(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<OrderId>,
    ValidJson(body): ValidJson<StatusUpdate>,
) -> Result<Json<Order>> {
    OrderRepository::new(state.db())
        .update_status(id, body.status)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound("Order not found".to_string()))
}

/// Public order tracking. Exposes only the customer's first name.
#[instrument(skip(state))]
pub async fn track(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<TrackingInfo>> {
    let not_found = || AppError::NotFound("Order not found with this tracking number".to_string());

    let code = TrackingNumber::parse(&code).map_err(|_| not_found())?;
    OrderRepository::new(state.db())
        .get_by_tracking_number(&code)
        .await
        .map(|order| Json(TrackingInfo::from(&order)))
        .ok_or_else(not_found)
}
