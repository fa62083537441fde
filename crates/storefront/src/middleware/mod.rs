//! HTTP middleware stack for the storefront API.
//!
//! # Middleware Order (bottom to top in Router)
//!
//! 1. Sentry layers (capture errors, transactions)
//! 2. `TraceLayer` (request tracing)
//! 3. Request ID (add unique ID to each request)
//! 4. Rate limiting on `/api/auth/*` (governor)
//!
//! Authentication is not a layer: handlers opt in through the
//! [`RequireUser`] and [`RequireAdmin`] extractors.

pub mod auth;
pub mod rate_limit;
pub mod request_id;

pub use auth::{BearerToken, RequireAdmin, RequireUser};
pub use rate_limit::auth_rate_limiter;
pub use request_id::{RequestId, request_id_middleware};
