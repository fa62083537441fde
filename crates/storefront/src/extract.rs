//! Request extractors whose rejections are [`AppError`]s.
//!
//! Axum's own `Path` and `Json` reject with plain-text bodies; these wrappers
//! keep every client error in the JSON `{"message"}` shape.

use axum::{
    Json,
    extract::{FromRequest, FromRequestParts, Request},
};
use serde::de::DeserializeOwned;

use crate::error::AppError;
use crate::models::Payload;

/// Path parameters; a value that does not parse is a 400.
#[derive(Debug, Clone, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct Path<T>(pub T);

/// Query string; a value that does not parse is a 400.
#[derive(Debug, Clone, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
pub struct Query<T>(pub T);

/// JSON body that has been deserialized and then checked with
/// [`Payload::check`].
///
/// Malformed JSON and type mismatches are 400s carrying the parser's
/// message; rule violations are 400s with per-field detail.
#[derive(Debug, Clone)]
pub struct ValidJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidJson<T>
where
    T: DeserializeOwned + Payload,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        value.check()?;
        Ok(Self(value))
    }
}
