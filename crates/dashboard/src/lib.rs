//! Dukkan merchant dashboard library.
//!
//! Serves the delivery-zone editor for merchants and the delivery options
//! that storefront checkouts read. Exposed as a library so the router can be
//! built in tests without a running server.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod state;
