//! Business logic services for storefront.
//!
//! # Services
//!
//! - `auth` - Password accounts and bearer-token sessions
//! - `images` - Uploaded image storage under the data directory

pub mod auth;
pub mod images;
