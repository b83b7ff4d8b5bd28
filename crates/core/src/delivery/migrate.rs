//! Migration of legacy fee formats into zones.

use std::collections::{BTreeMap, BTreeSet};

use rust_decimal::Decimal;
use serde_json::Value;

use super::catalog::LocationCatalog;
use super::legacy::{LegacyShape, LocationFee};
use super::zone::{DeliveryConfiguration, DeliveryZone, ZoneId};

/// Name of the zone holding every non-primary location after a two-tier migration.
pub const SECONDARY_ZONE_NAME: &str = "Provinces";

/// What happened while loading a stored value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Stored data was already normalized and is returned as-is.
    AlreadyNormalized { skipped_zones: usize },
    /// Per-location fees were grouped into zones.
    MigratedDetailed {
        /// Keys that are not catalog locations, or repeat a location already
        /// read under another spelling.
        dropped_unknown: Vec<String>,
        /// Keys whose fee record could not be read.
        skipped_entries: Vec<String>,
        /// No location was enabled, so a single default zone was created.
        fallback: bool,
    },
    /// Primary/secondary fees became two zones.
    MigratedTwoTier { ambiguous: bool },
}

impl LoadOutcome {
    /// Whether the normalized result differs from what is stored.
    #[must_use]
    pub const fn needs_write_back(&self) -> bool {
        !matches!(self, Self::AlreadyNormalized { .. })
    }
}

/// A normalized configuration together with how it was obtained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedConfiguration {
    pub configuration: DeliveryConfiguration,
    pub outcome: LoadOutcome,
}

/// Read a stored delivery-fee value into the current format.
///
/// Normalized data passes through untouched, ids included. Legacy data is
/// migrated with fresh zone ids and free delivery switched off.
#[must_use]
pub fn load_and_normalize(raw: Option<&Value>, catalog: &LocationCatalog) -> LoadedConfiguration {
    match LegacyShape::detect(raw) {
        LegacyShape::Normalized {
            configuration,
            skipped_zones,
        } => LoadedConfiguration {
            configuration,
            outcome: LoadOutcome::AlreadyNormalized { skipped_zones },
        },
        LegacyShape::Detailed { entries, malformed } => {
            let (zones, dropped_unknown) = migrate_detailed(&entries, catalog);
            let fallback = zones.is_empty();
            let zones = if fallback {
                vec![fallback_zone(catalog)]
            } else {
                zones
            };
            LoadedConfiguration {
                configuration: DeliveryConfiguration::new(zones, false),
                outcome: LoadOutcome::MigratedDetailed {
                    dropped_unknown,
                    skipped_entries: malformed,
                    fallback,
                },
            }
        }
        LegacyShape::TwoTier {
            primary_fee,
            secondary_fee,
            ambiguous,
        } => LoadedConfiguration {
            configuration: DeliveryConfiguration::new(
                migrate_two_tier(primary_fee, secondary_fee, catalog),
                false,
            ),
            outcome: LoadOutcome::MigratedTwoTier { ambiguous },
        },
    }
}

/// Group enabled locations by fee, one zone per distinct fee, cheapest first.
///
/// Keys are matched to catalog locations ignoring case and surrounding
/// spaces, and zones use the catalog spelling. Disabled locations are left
/// unassigned. Returns the zones and the keys that matched no new location.
/// May return no zones at all.
#[must_use]
pub fn migrate_detailed(
    entries: &BTreeMap<String, LocationFee>,
    catalog: &LocationCatalog,
) -> (Vec<DeliveryZone>, Vec<String>) {
    let mut by_fee: BTreeMap<Decimal, BTreeSet<String>> = BTreeMap::new();
    let mut dropped_unknown = Vec::new();

    let mut seen: BTreeSet<&str> = BTreeSet::new();

    for (key, entry) in entries {
        let Some(location) = catalog.resolve(key).filter(|&known| seen.insert(known)) else {
            dropped_unknown.push(key.clone());
            continue;
        };
        if entry.enabled {
            by_fee.entry(entry.fee).or_default().insert(location.to_owned());
        }
    }

    let zones = by_fee
        .into_iter()
        .map(|(fee, cities)| DeliveryZone {
            id: ZoneId::generate(),
            name: format!("{} {} zone", fee.normalize(), catalog.currency()),
            fee,
            enabled: true,
            cities,
        })
        .collect();

    (zones, dropped_unknown)
}

/// Build the primary and secondary zones, filling missing fees from the catalog.
#[must_use]
pub fn migrate_two_tier(
    primary_fee: Option<Decimal>,
    secondary_fee: Option<Decimal>,
    catalog: &LocationCatalog,
) -> Vec<DeliveryZone> {
    vec![
        DeliveryZone {
            id: ZoneId::generate(),
            name: catalog.primary().to_owned(),
            fee: primary_fee.unwrap_or_else(|| catalog.default_primary_fee()),
            enabled: true,
            cities: BTreeSet::from([catalog.primary().to_owned()]),
        },
        DeliveryZone {
            id: ZoneId::generate(),
            name: SECONDARY_ZONE_NAME.to_owned(),
            fee: secondary_fee.unwrap_or_else(|| catalog.default_secondary_fee()),
            enabled: true,
            cities: catalog.secondary().map(str::to_owned).collect(),
        },
    ]
}

// Keeps a store from ending up with zero zones when every detailed entry was off.
fn fallback_zone(catalog: &LocationCatalog) -> DeliveryZone {
    DeliveryZone {
        id: ZoneId::generate(),
        name: catalog.primary().to_owned(),
        fee: catalog.default_primary_fee(),
        enabled: true,
        cities: BTreeSet::from([catalog.primary().to_owned()]),
    }
}
