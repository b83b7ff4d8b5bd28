//! Database migration commands.
//!
//! # Usage
//!
//! ```bash
//! dukkan migrate
//! ```
//!
//! # Environment Variables
//!
//! - `DASHBOARD_DATABASE_URL` - `PostgreSQL` connection string (falls back to `DATABASE_URL`)
//!
//! # Migration Files
//!
//! Dashboard migrations: `crates/dashboard/migrations/`

use super::{CommandError, database_url};

/// Run dashboard database migrations.
///
/// # Errors
///
/// Returns `CommandError` if the database is unreachable or a migration fails.
pub async fn dashboard() -> Result<(), CommandError> {
    let database_url = database_url()?;

    tracing::info!("Connecting to dashboard database...");
    let pool = dukkan_dashboard::db::create_pool(&database_url).await?;

    tracing::info!("Running dashboard migrations...");
    sqlx::migrate!("../dashboard/migrations").run(&pool).await?;

    tracing::info!("Dashboard migrations complete!");
    Ok(())
}
