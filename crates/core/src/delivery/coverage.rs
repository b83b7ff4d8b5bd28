//! Which known locations are (not) served by a store's zones.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use super::catalog::LocationCatalog;
use super::zone::DeliveryZone;

/// Known locations that appear in no zone, in catalog order.
///
/// Disabled zones still count as covering their cities.
#[must_use]
pub fn compute_unassigned<S: AsRef<str>>(
    zones: &[DeliveryZone],
    known_locations: &[S],
) -> Vec<String> {
    let assigned: BTreeSet<&str> = zones
        .iter()
        .flat_map(|zone| zone.cities.iter().map(String::as_str))
        .collect();

    known_locations
        .iter()
        .map(AsRef::<str>::as_ref)
        .filter(|location| !assigned.contains(location))
        .map(str::to_owned)
        .collect()
}

/// Locations listed by more than one zone.
///
/// Always empty for lists built through [`super::upsert_zone`]; stored data
/// written by older clients may violate this.
#[must_use]
pub fn overlapping_locations(zones: &[DeliveryZone]) -> Vec<String> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for city in zones.iter().flat_map(|zone| zone.cities.iter()) {
        *counts.entry(city.as_str()).or_insert(0) += 1;
    }

    counts
        .into_iter()
        .filter(|&(_, count)| count > 1)
        .map(|(city, _)| city.to_owned())
        .collect()
}

/// Coverage summary shown next to the zone editor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CoverageReport {
    /// Locations in no zone.
    pub unassigned: Vec<String>,
    /// Locations whose only zone is disabled.
    pub disabled_only: Vec<String>,
    /// Locations customers can currently order to.
    pub served: usize,
    /// Size of the catalog.
    pub total: usize,
}

impl CoverageReport {
    #[must_use]
    pub fn build(zones: &[DeliveryZone], catalog: &LocationCatalog) -> Self {
        let unassigned = compute_unassigned(zones, catalog.locations());
        let enabled: BTreeSet<&str> = zones
            .iter()
            .filter(|zone| zone.enabled)
            .flat_map(|zone| zone.cities.iter().map(String::as_str))
            .collect();

        let disabled_only: Vec<String> = catalog
            .locations()
            .iter()
            .filter(|location| {
                !enabled.contains(location.as_str()) && !unassigned.contains(location)
            })
            .cloned()
            .collect();

        let served = catalog
            .locations()
            .iter()
            .filter(|location| enabled.contains(location.as_str()))
            .count();

        Self {
            unassigned,
            disabled_only,
            served,
            total: catalog.locations().len(),
        }
    }

    /// Every known location can be ordered to.
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.served == self.total
    }
}
