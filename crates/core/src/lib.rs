//! Dukkan Core - Shared types and the delivery zone engine.
//!
//! This crate provides the types used across all Dukkan components:
//! - `dashboard` - Merchant dashboard and public storefront delivery endpoints
//! - `cli` - Command-line tools for migrations and bulk maintenance
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no database
//! access, no HTTP clients. Every delivery zone operation takes an immutable
//! snapshot and returns a new value, so callers own all state.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs and prices
//! - [`delivery`] - Delivery zone detection, migration, assignment and coverage

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod delivery;
pub mod types;

pub use types::*;
