//! Dukkan CLI - Database migrations and delivery data maintenance.
//!
//! # Usage
//!
//! ```bash
//! # Run dashboard database migrations
//! dukkan migrate
//!
//! # Rewrite every store's legacy delivery fees as zones
//! dukkan delivery normalize
//!
//! # Show what would change without writing
//! dukkan delivery normalize --dry-run
//!
//! # Show which locations a store does not deliver to
//! dukkan delivery coverage 42
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `delivery normalize` - Bulk-migrate legacy delivery data
//! - `delivery coverage` - Coverage report for one store

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use dukkan_core::StoreId;

mod commands;

#[derive(Parser)]
#[command(name = "dukkan")]
#[command(author, version, about = "Dukkan CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Maintain store delivery settings
    Delivery {
        #[command(subcommand)]
        action: DeliveryAction,
    },
}

#[derive(Subcommand)]
enum DeliveryAction {
    /// Convert legacy delivery fees to zones and write them back
    Normalize {
        /// Report what would change without writing
        #[arg(long)]
        dry_run: bool,

        /// Only this store
        #[arg(short, long)]
        store: Option<StoreId>,
    },
    /// Show coverage for one store
    Coverage {
        /// Store ID
        store_id: StoreId,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate => commands::migrate::dashboard().await?,
        Commands::Delivery { action } => match action {
            DeliveryAction::Normalize { dry_run, store } => {
                commands::delivery::normalize(store, dry_run).await?;
            }
            DeliveryAction::Coverage { store_id } => {
                commands::delivery::coverage(store_id).await?;
            }
        },
    }
    Ok(())
}
