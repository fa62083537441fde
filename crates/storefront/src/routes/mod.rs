//! HTTP route handlers for the storefront API.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health                              - Liveness
//! GET    /health/ready                        - Store file readiness
//! GET    /images/...                          - Uploaded images (static)
//!
//! # Catalog
//! GET    /api/categories                      - Category list
//! GET    /api/categories/{slug}               - Category by slug
//! POST   /api/categories                      - Create (admin)
//! PUT    /api/categories/{id}                 - Partial update (admin)
//! DELETE /api/categories/{id}                 - Delete unless in use (admin)
//! GET    /api/products                        - ?search= | ?featured=true | ?category=<slug>
//! GET    /api/products-with-category          - Products joined with their category
//! GET    /api/products/{id}                   - Product with category
//! GET    /api/products/{id}/recommendations   - Up to 8 similar products
//! POST   /api/products                        - Create (admin)
//! PUT    /api/products/{id}                   - Partial update (admin)
//! DELETE /api/products/{id}                   - Delete (admin)
//!
//! # Cart (keyed by client session id)
//! GET    /api/cart/{sessionId}                - Lines with products
//! POST   /api/cart                            - Add or merge
//! PUT    /api/cart/{sessionId}/{productId}    - Set quantity, 0 removes
//! DELETE /api/cart/{sessionId}/{productId}    - Remove line
//! DELETE /api/cart/{sessionId}                - Clear
//!
//! # Orders
//! GET    /api/orders                          - All orders (admin)
//! GET    /api/orders/mine                     - Caller's orders
//! GET    /api/orders/{id}                     - Owner or admin
//! POST   /api/orders                          - Checkout
//! PUT    /api/orders/{id}/status              - Set status (admin)
//! GET    /api/track/{trackingNumber}          - Public tracking view
//!
//! # Homepage settings
//! GET    /api/settings                        - List
//! GET    /api/settings/{key}                  - Get
//! POST   /api/settings                        - Create (admin)
//! PUT    /api/settings/{key}                  - Set value (admin)
//! DELETE /api/settings/{key}                  - Delete (admin)
//!
//! # Wishlist (requires auth)
//! GET    /api/wishlist                        - Lines with products
//! POST   /api/wishlist                        - Add
//! DELETE /api/wishlist                        - Clear
//! DELETE /api/wishlist/{productId}            - Remove
//!
//! # Uploads (admin)
//! POST   /api/upload-image                    - Product image
//! POST   /api/upload-category-image           - Category thumbnail
//! POST   /api/upload-homepage-image           - Hero banner
//! DELETE /api/delete-image                    - Delete by URL
//!
//! # Auth (rate limited)
//! POST   /api/auth/register                   - Create account, returns token
//! POST   /api/auth/login                      - Returns token
//! POST   /api/auth/logout                     - Revoke token
//! GET    /api/auth/me                         - Current user
//! ```

pub mod auth;
pub mod cart;
pub mod categories;
pub mod health;
pub mod images;
pub mod orders;
pub mod products;
pub mod settings;
pub mod wishlist;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{delete, get, post, put},
};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::middleware::{auth_rate_limiter, request_id_middleware};
use crate::services::images::MAX_IMAGE_BYTES;
use crate::state::AppState;

/// Multipart framing allowance on top of the image itself.
const UPLOAD_OVERHEAD_BYTES: usize = 1024 * 1024;

/// Create the category routes router.
pub fn category_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(categories::index).post(categories::create))
        // One parameter segment: a slug for reads, a numeric id for writes
        .route(
            "/{key}",
            get(categories::show)
                .put(categories::update)
                .delete(categories::delete),
        )
}

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index).post(products::create))
        .route(
            "/{id}",
            get(products::show)
                .put(products::update)
                .delete(products::delete),
        )
        .route("/{id}/recommendations", get(products::recommendations))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(cart::add))
        .route("/{session_id}", get(cart::show).delete(cart::clear))
        .route(
            "/{session_id}/{product_id}",
            put(cart::update).delete(cart::remove),
        )
}

/// Create the order routes router.
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(orders::index).post(orders::create))
        .route("/mine", get(orders::mine))
        .route("/{id}", get(orders::show))
        .route("/{id}/status", put(orders::update_status))
}

/// Create the settings routes router.
pub fn setting_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(settings::index).post(settings::create))
        .route(
            "/{key}",
            get(settings::show)
                .put(settings::update)
                .delete(settings::delete),
        )
}

/// Create the wishlist routes router.
pub fn wishlist_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(wishlist::index)
                .post(wishlist::add)
                .delete(wishlist::clear),
        )
        .route("/{product_id}", delete(wishlist::remove))
}

/// Create the image upload routes router.
pub fn upload_routes() -> Router<AppState> {
    Router::new()
        .route("/upload-image", post(images::upload_product_image))
        .route("/upload-category-image", post(images::upload_category_image))
        .route("/upload-homepage-image", post(images::upload_homepage_image))
        .route("/delete-image", delete(images::delete_image))
        .layer(DefaultBodyLimit::max(MAX_IMAGE_BYTES + UPLOAD_OVERHEAD_BYTES))
}

/// Create the auth routes router, rate limited per client IP.
pub fn auth_routes(requests_per_minute: u32) -> Router<AppState> {
    let router = Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
        .route("/me", get(auth::me));

    match auth_rate_limiter(requests_per_minute) {
        Some(limiter) => router.layer(limiter),
        None => router,
    }
}

/// Create all `/api` routes.
pub fn api_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .nest("/categories", category_routes())
        .route("/products-with-category", get(products::with_category))
        .nest("/products", product_routes())
        .nest("/cart", cart_routes())
        .nest("/orders", order_routes())
        .route("/track/{tracking_number}", get(orders::track))
        .nest("/settings", setting_routes())
        .nest("/wishlist", wishlist_routes())
        .merge(upload_routes())
        .nest(
            "/auth",
            auth_routes(state.config().auth_rate_limit_per_minute),
        )
}

/// Build the complete application router.
///
/// Sentry layers and connect info are added by the binary; everything a
/// request needs to be served lives here so tests can drive it directly.
pub fn router(state: AppState) -> Router {
    let images_dir = state.db().images_dir();

    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .nest("/api", api_routes(&state))
        .nest_service("/images", ServeDir::new(images_dir))
        .layer(axum::middleware::from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
