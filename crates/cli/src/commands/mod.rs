//! CLI command implementations.

pub mod delivery;
pub mod migrate;

use secrecy::SecretString;
use thiserror::Error;

/// Errors shared by every command.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Required environment variable is missing.
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    /// Database connection error.
    #[error("Database connection error: {0}")]
    Database(#[from] sqlx::Error),

    /// Migration failed.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Storage read or write failed.
    #[error("Repository error: {0}")]
    Repository(#[from] dukkan_dashboard::db::RepositoryError),

    /// Invalid configuration.
    #[error("Configuration error: {0}")]
    Config(#[from] dukkan_dashboard::config::ConfigError),
}

/// Database URL from `DASHBOARD_DATABASE_URL`, falling back to `DATABASE_URL`.
fn database_url() -> Result<SecretString, CommandError> {
    dotenvy::dotenv().ok();

    std::env::var("DASHBOARD_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map(SecretString::from)
        .map_err(|_| CommandError::MissingEnvVar("DASHBOARD_DATABASE_URL"))
}
