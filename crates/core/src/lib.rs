//! Craft Bazaar Core - Shared types library.
//!
//! This crate provides common types used across all Craft Bazaar components:
//! - `storefront` - JSON API server for the catalog, cart, orders and admin
//! - `cli` - Command-line tools for seeding and inspecting the data file
//!
//! # Architecture
//!
//! The core crate contains only types and parsing rules - no I/O, no storage
//! access, no HTTP. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for ids, prices, emails, slugs, tracking
//!   numbers and statuses

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
