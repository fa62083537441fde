//! Craft Bazaar storefront library.
//!
//! The JSON API behind the Craft Bazaar handmade crafts shop: catalog,
//! carts, checkout with order tracking, wishlists, homepage settings and
//! image uploads, persisted to a single JSON document on disk.
//!
//! The crate is a library so the operator CLI and the integration tests can
//! open the same store and drive the same router as the server binary.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod extract;
pub mod middleware;
pub mod models;
pub mod recommendations;
pub mod routes;
pub mod services;
pub mod state;
