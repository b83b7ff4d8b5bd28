//! Session-stored models.

pub mod session;

pub use session::keys;
