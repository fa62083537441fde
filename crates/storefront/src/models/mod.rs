//! Domain models for the storefront.
//!
//! Entity structs mirror the records held in the store document and use the
//! document's camelCase field names. `New*` and `*Update` structs are API
//! payloads; each implements [`Payload`] so handlers can reject bad input
//! with field-level detail before the repository is called.

pub mod cart;
pub mod category;
pub mod order;
pub mod product;
pub mod setting;
pub mod user;
pub mod wishlist;

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use validator::ValidationErrors;

pub use cart::{CartItem, CartLine, CartUpdate, NewCartItem, UpdateCartQuantity};
pub use category::{Category, CategoryUpdate, NewCategory};
pub use order::{NewOrder, Order, OrderItem, StatusUpdate, TrackingInfo};
pub use product::{NewProduct, Product, ProductUpdate, ProductWithCategory};
pub use setting::{NewSetting, Setting, SettingValue};
pub use user::{LoginRequest, RegisterRequest, User, UserProfile};
pub use wishlist::{NewWishlistItem, WishlistItem, WishlistLine};

/// An API payload that can check itself before reaching the repository.
pub trait Payload {
    /// Validate the payload.
    ///
    /// # Errors
    ///
    /// Returns every failing field with its messages.
    fn check(&self) -> Result<(), FieldErrors>;
}

/// Validation failures keyed by camelCase field name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    /// Start from the result of a `validator` derive.
    #[must_use]
    pub fn collect(result: Result<(), ValidationErrors>) -> Self {
        let mut errors = Self::default();
        if let Err(validation) = result {
            for (field, failures) in validation.field_errors() {
                for failure in failures {
                    let message = failure
                        .message
                        .as_ref()
                        .map_or_else(|| failure.code.to_string(), ToString::to_string);
                    errors.push(&field, message);
                }
            }
        }
        errors
    }

    /// Record a failure for `field` (snake or camel case).
    pub fn push(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(to_camel_case(field))
            .or_default()
            .push(message.into());
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Messages recorded for a camelCase field.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    /// `Ok(())` when nothing failed.
    ///
    /// # Errors
    ///
    /// Returns `self` when at least one field failed.
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl std::fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for (field, messages) in &self.0 {
            for message in messages {
                if !first {
                    f.write_str("; ")?;
                }
                write!(f, "{field}: {message}")?;
                first = false;
            }
        }
        Ok(())
    }
}

fn to_camel_case(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut upper = false;
    for c in field.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}

/// Deserialize a field that distinguishes "absent" from "explicit null".
///
/// Use with `#[serde(default, deserialize_with = "double_option")]`: a
/// missing field stays `None`, `null` becomes `Some(None)`.
pub(crate) fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
