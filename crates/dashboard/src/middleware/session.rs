//! Session middleware configuration.
//!
//! Sets up `PostgreSQL`-backed sessions using tower-sessions. Unsaved delivery
//! edits live here, so the expiry also bounds how long a draft survives.

use sqlx::PgPool;
use thiserror::Error;
use tower_sessions::{Expiry, SessionManagerLayer};
use tower_sessions_sqlx_store::PostgresStore;

use crate::config::DashboardConfig;

/// Session cookie name for the dashboard.
pub const SESSION_COOKIE_NAME: &str = "dukkan_dashboard_session";

/// Session expiry time in seconds (24 hours).
const SESSION_EXPIRY_SECONDS: i64 = 24 * 60 * 60;

const SESSION_SCHEMA: &str = "dashboard";
const SESSION_TABLE: &str = "session";

#[derive(Debug, Error)]
#[error("invalid session store setting: {0}")]
pub struct SessionLayerError(String);

/// Create the session layer with `PostgreSQL` store.
///
/// The session table is created by migration in the `dashboard` schema.
///
/// # Errors
///
/// Returns `SessionLayerError` if the schema or table name is rejected.
pub fn create_session_layer(
    pool: &PgPool,
    config: &DashboardConfig,
) -> Result<SessionManagerLayer<PostgresStore>, SessionLayerError> {
    let store = PostgresStore::new(pool.clone())
        .with_schema_name(SESSION_SCHEMA)
        .map_err(SessionLayerError)?
        .with_table_name(SESSION_TABLE)
        .map_err(SessionLayerError)?;

    Ok(SessionManagerLayer::new(store)
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::seconds(SESSION_EXPIRY_SECONDS),
        ))
        .with_secure(config.is_secure())
        .with_same_site(tower_sessions::cookie::SameSite::Strict)
        .with_http_only(true)
        .with_path("/"))
}
