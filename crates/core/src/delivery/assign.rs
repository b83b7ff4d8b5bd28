//! Zone edits that keep each location in at most one zone.
//!
//! Every function takes the current zones by reference and returns a new list.
//! A rejected edit returns an error and the caller's list is untouched.

use std::collections::BTreeSet;

use thiserror::Error;

use super::zone::{DeliveryZone, ZoneDraft, ZoneId};

/// Reasons an edited zone is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ZoneValidationError {
    #[error("Zone name is required")]
    EmptyName,

    #[error("Select at least one city for this zone")]
    EmptyCities,

    #[error("Delivery fee cannot be negative")]
    NegativeFee,

    #[error("Unknown location: {0}")]
    UnknownLocation(String),
}

impl ZoneValidationError {
    /// The form field the error belongs to.
    #[must_use]
    pub const fn field(&self) -> &'static str {
        match self {
            Self::EmptyName => "name",
            Self::EmptyCities | Self::UnknownLocation(_) => "cities",
            Self::NegativeFee => "fee",
        }
    }

    /// Stable machine-readable code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::EmptyName => "empty_name",
            Self::EmptyCities => "empty_cities",
            Self::NegativeFee => "negative_fee",
            Self::UnknownLocation(_) => "unknown_location",
        }
    }
}

/// Create or replace a zone.
///
/// A draft whose id matches an existing zone replaces it in place; any other
/// draft is appended, with a fresh id if it has none. Cities in the draft are
/// removed from every other zone, so the last edit wins. A replaced zone keeps
/// its visibility unless the draft sets one.
///
/// # Errors
///
/// Returns `ZoneValidationError` if the name or city set is empty, or the fee
/// is negative.
pub fn upsert_zone(
    zones: &[DeliveryZone],
    draft: ZoneDraft,
) -> Result<Vec<DeliveryZone>, ZoneValidationError> {
    let requested_visibility = draft.enabled;
    let zone = validate(draft)?;

    let mut replaced = false;
    let mut next: Vec<DeliveryZone> = zones
        .iter()
        .map(|existing| {
            if existing.id == zone.id {
                replaced = true;
                DeliveryZone {
                    enabled: requested_visibility.unwrap_or(existing.enabled),
                    ..zone.clone()
                }
            } else {
                let mut other = existing.clone();
                other.cities.retain(|city| !zone.cities.contains(city));
                other
            }
        })
        .collect();

    if !replaced {
        next.push(zone);
    }

    Ok(next)
}

/// Remove a zone. Its cities become unassigned.
#[must_use]
pub fn delete_zone(zones: &[DeliveryZone], id: &ZoneId) -> Vec<DeliveryZone> {
    zones.iter().filter(|zone| &zone.id != id).cloned().collect()
}

/// Flip a zone's `enabled` flag. City membership is unchanged.
#[must_use]
pub fn toggle_zone(zones: &[DeliveryZone], id: &ZoneId) -> Vec<DeliveryZone> {
    zones
        .iter()
        .map(|zone| {
            let mut zone = zone.clone();
            if &zone.id == id {
                zone.enabled = !zone.enabled;
            }
            zone
        })
        .collect()
}

fn validate(draft: ZoneDraft) -> Result<DeliveryZone, ZoneValidationError> {
    let name = draft.name.trim();
    if name.is_empty() {
        return Err(ZoneValidationError::EmptyName);
    }

    let cities: BTreeSet<String> = draft
        .cities
        .into_iter()
        .map(|city| city.trim().to_owned())
        .filter(|city| !city.is_empty())
        .collect();
    if cities.is_empty() {
        return Err(ZoneValidationError::EmptyCities);
    }

    if draft.fee.is_sign_negative() && !draft.fee.is_zero() {
        return Err(ZoneValidationError::NegativeFee);
    }

    Ok(DeliveryZone {
        id: draft.id.unwrap_or_else(ZoneId::generate),
        name: name.to_owned(),
        fee: draft.fee,
        enabled: draft.enabled.unwrap_or(true),
        cities,
    })
}
