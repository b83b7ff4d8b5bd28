//! Delivery data maintenance.
//!
//! # Usage
//!
//! ```bash
//! # Normalize every store
//! dukkan delivery normalize
//!
//! # Normalize one store, report only
//! dukkan delivery normalize --store 42 --dry-run
//!
//! # Coverage report
//! dukkan delivery coverage 42
//! ```
//!
//! # Environment Variables
//!
//! - `DASHBOARD_DATABASE_URL` - `PostgreSQL` connection string (falls back to `DATABASE_URL`)
//! - `DELIVERY_DEFAULT_PRIMARY_FEE` / `DELIVERY_DEFAULT_SECONDARY_FEE` - Fees for
//!   legacy records that carry none

use dukkan_core::StoreId;
use dukkan_core::delivery::{CoverageReport, LoadOutcome, LocationCatalog, load_and_normalize};
use dukkan_dashboard::config::DeliveryDefaults;
use dukkan_dashboard::db::{DeliveryStore, PgDeliveryStore};

use super::{CommandError, database_url};

async fn connect() -> Result<(PgDeliveryStore, LocationCatalog), CommandError> {
    let database_url = database_url()?;
    let defaults = DeliveryDefaults::from_env()?;
    let catalog =
        LocationCatalog::iraq().with_default_fees(defaults.primary_fee, defaults.secondary_fee);

    tracing::info!("Connecting to dashboard database...");
    let pool = dukkan_dashboard::db::create_pool(&database_url).await?;
    Ok((PgDeliveryStore::new(pool), catalog))
}

/// Counts printed at the end of a normalize run.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct NormalizeSummary {
    pub examined: usize,
    pub migrated: usize,
    pub ambiguous: usize,
}

impl NormalizeSummary {
    fn record(&mut self, outcome: &LoadOutcome) {
        self.examined += 1;
        if outcome.needs_write_back() {
            self.migrated += 1;
        }
        if matches!(outcome, LoadOutcome::MigratedTwoTier { ambiguous: true }) {
            self.ambiguous += 1;
        }
    }
}

/// One-line description of a load outcome.
#[must_use]
pub fn describe_outcome(outcome: &LoadOutcome) -> String {
    match outcome {
        LoadOutcome::AlreadyNormalized { skipped_zones: 0 } => "already normalized".to_string(),
        LoadOutcome::AlreadyNormalized { skipped_zones } => {
            format!("already normalized, {skipped_zones} unreadable zone(s) skipped")
        }
        LoadOutcome::MigratedDetailed {
            dropped_unknown,
            skipped_entries,
            fallback,
        } => {
            let mut text = "per-location fees -> zones".to_string();
            if *fallback {
                text.push_str(", no enabled locations (default zone created)");
            }
            if !dropped_unknown.is_empty() {
                text.push_str(&format!(", dropped unknown: {}", dropped_unknown.join(", ")));
            }
            if !skipped_entries.is_empty() {
                text.push_str(&format!(", unreadable fees: {}", skipped_entries.join(", ")));
            }
            text
        }
        LoadOutcome::MigratedTwoTier { ambiguous: false } => "two-tier fees -> zones".to_string(),
        LoadOutcome::MigratedTwoTier { ambiguous: true } => {
            "unreadable value, replaced with default zones".to_string()
        }
    }
}

/// Normalize stored delivery settings, writing back migrated records.
///
/// # Errors
///
/// Returns `CommandError` if the database is unreachable or a write fails.
pub async fn normalize(only: Option<StoreId>, dry_run: bool) -> Result<(), CommandError> {
    let (store, catalog) = connect().await?;

    let store_ids = match only {
        Some(store_id) => vec![store_id],
        None => store.list_store_ids().await?,
    };

    let mut summary = NormalizeSummary::default();
    for store_id in store_ids {
        let raw = store.read(store_id).await?;
        let loaded = load_and_normalize(raw.as_ref(), &catalog);
        summary.record(&loaded.outcome);

        #[allow(clippy::print_stdout)]
        {
            println!("store {store_id}: {}", describe_outcome(&loaded.outcome));
        }

        if loaded.outcome.needs_write_back() && !dry_run {
            store.write(store_id, &loaded.configuration).await?;
            tracing::info!(%store_id, "Wrote normalized delivery settings");
        }
    }

    #[allow(clippy::print_stdout)]
    {
        println!();
        println!(
            "{} store(s) examined, {} {}, {} with unreadable data",
            summary.examined,
            summary.migrated,
            if dry_run { "would be migrated" } else { "migrated" },
            summary.ambiguous,
        );
    }

    Ok(())
}

/// Print which locations a store serves.
///
/// # Errors
///
/// Returns `CommandError` if the store cannot be read.
pub async fn coverage(store_id: StoreId) -> Result<(), CommandError> {
    let (store, catalog) = connect().await?;

    let raw = store.read(store_id).await?;
    let loaded = load_and_normalize(raw.as_ref(), &catalog);
    let report = CoverageReport::build(&loaded.configuration.zones, &catalog);

    #[allow(clippy::print_stdout)]
    {
        println!("store {store_id}: {}", describe_outcome(&loaded.outcome));
        println!("served: {} of {} locations", report.served, report.total);
        for zone in &loaded.configuration.zones {
            println!(
                "  {} ({} {}{}): {}",
                zone.name,
                zone.fee.normalize(),
                catalog.currency(),
                if zone.enabled { "" } else { ", hidden" },
                zone.cities.iter().cloned().collect::<Vec<_>>().join(", "),
            );
        }
        if !report.unassigned.is_empty() {
            println!("unassigned: {}", report.unassigned.join(", "));
        }
        if !report.disabled_only.is_empty() {
            println!("hidden only: {}", report.disabled_only.join(", "));
        }
    }

    Ok(())
}
