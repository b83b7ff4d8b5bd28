//! Detection of stored delivery-fee formats.
//!
//! Stored fee data carries no version marker. Three formats exist in the wild:
//!
//! 1. Normalized: `{ "zones": [...], "isFreeDelivery": bool }`
//! 2. Detailed: `{ "<location>": { "fee": n, "enabled": bool }, ... }`
//! 3. Two-tier: `{ "baghdad": n, "provinces": n }`
//!
//! [`LegacyShape::detect`] tries each structural predicate in that order and
//! returns the first match. The predicates look at key count and key names
//! only; unreadable values inside a matched shape are skipped and reported.
//! Anything unrecognized becomes a two-tier shape with default fees and is
//! flagged as ambiguous.

use std::collections::BTreeMap;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde_json::{Map, Value};

use super::zone::{DeliveryConfiguration, DeliveryZone};

/// Two-tier key holding the primary location's fee.
pub const PRIMARY_FEE_KEY: &str = "baghdad";

/// Two-tier key holding the fee for every other location.
pub const SECONDARY_FEE_KEY: &str = "provinces";

const ZONES_KEY: &str = "zones";
const FREE_DELIVERY_KEY: &str = "isFreeDelivery";

/// Detailed-format record for one location.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocationFee {
    pub fee: Decimal,
    pub enabled: bool,
}

/// The recognized format of a stored delivery-fee value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LegacyShape {
    /// Already in the current format.
    Normalized {
        configuration: DeliveryConfiguration,
        /// Entries of `zones` that could not be read as a zone.
        skipped_zones: usize,
    },
    /// Per-location fees, keyed by location name.
    Detailed {
        entries: BTreeMap<String, LocationFee>,
        /// Keys whose value is not a `{ fee, enabled }` record with a valid fee.
        malformed: Vec<String>,
    },
    /// Primary/secondary fees. `None` means the fee was missing or invalid.
    TwoTier {
        primary_fee: Option<Decimal>,
        secondary_fee: Option<Decimal>,
        /// The value did not cleanly match any known format.
        ambiguous: bool,
    },
}

impl LegacyShape {
    /// Classify a raw stored value. `None` and JSON `null` mean "nothing stored".
    #[must_use]
    pub fn detect(raw: Option<&Value>) -> Self {
        match raw {
            None | Some(Value::Null) => Self::TwoTier {
                primary_fee: None,
                secondary_fee: None,
                ambiguous: false,
            },
            Some(Value::Object(map)) => Self::normalized(map)
                .or_else(|| Self::detailed(map))
                .unwrap_or_else(|| Self::two_tier(map)),
            Some(_) => Self::TwoTier {
                primary_fee: None,
                secondary_fee: None,
                ambiguous: true,
            },
        }
    }

    /// Whether reading this shape requires a migration.
    #[must_use]
    pub const fn is_legacy(&self) -> bool {
        !matches!(self, Self::Normalized { .. })
    }

    fn normalized(map: &Map<String, Value>) -> Option<Self> {
        let entries = map.get(ZONES_KEY)?.as_array()?;

        let mut zones = Vec::with_capacity(entries.len());
        let mut skipped_zones = 0;
        for entry in entries {
            match serde_json::from_value::<DeliveryZone>(entry.clone()) {
                Ok(zone) => zones.push(zone),
                Err(_) => skipped_zones += 1,
            }
        }

        let is_free_delivery = map
            .get(FREE_DELIVERY_KEY)
            .and_then(Value::as_bool)
            .unwrap_or(false);

        Some(Self::Normalized {
            configuration: DeliveryConfiguration::new(zones, is_free_delivery),
            skipped_zones,
        })
    }

    fn detailed(map: &Map<String, Value>) -> Option<Self> {
        if map.len() <= 2 || map.contains_key(PRIMARY_FEE_KEY) {
            return None;
        }

        let mut entries = BTreeMap::new();
        let mut malformed = Vec::new();
        for (location, value) in map {
            match location_fee(value) {
                Some(entry) => {
                    entries.insert(location.clone(), entry);
                }
                None => malformed.push(location.clone()),
            }
        }
        malformed.sort();

        Some(Self::Detailed { entries, malformed })
    }

    fn two_tier(map: &Map<String, Value>) -> Self {
        let primary_fee = map.get(PRIMARY_FEE_KEY).and_then(parse_fee);
        let secondary_fee = map.get(SECONDARY_FEE_KEY).and_then(parse_fee);
        let exact = map.len() == 2 && primary_fee.is_some() && secondary_fee.is_some();

        Self::TwoTier {
            primary_fee,
            secondary_fee,
            ambiguous: !map.is_empty() && !exact,
        }
    }
}

fn location_fee(value: &Value) -> Option<LocationFee> {
    let record = value.as_object()?;
    let fee = parse_fee(record.get("fee")?)?;
    let enabled = record
        .get("enabled")
        .and_then(Value::as_bool)
        .unwrap_or(false);
    Some(LocationFee { fee, enabled })
}

/// Read a non-negative fee from a JSON number or numeric string.
pub(crate) fn parse_fee(value: &Value) -> Option<Decimal> {
    let fee = match value {
        Value::Number(number) => {
            let text = number.to_string();
            Decimal::from_str(&text)
                .or_else(|_| Decimal::from_scientific(&text))
                .ok()?
        }
        Value::String(text) => Decimal::from_str(text.trim()).ok()?,
        _ => return None,
    };

    (!fee.is_sign_negative()).then(|| fee.normalize())
}
