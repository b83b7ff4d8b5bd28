//! HTTP middleware for the dashboard.

pub mod session;

pub use session::{SESSION_COOKIE_NAME, SessionLayerError, create_session_layer};
