//! Delivery zone data model.

use std::collections::BTreeSet;
use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// Opaque zone identifier.
///
/// Stored data may carry ids in any string format, or as plain numbers, so
/// this wraps a `String` rather than a `Uuid`. Numeric ids are read as their
/// decimal text. Newly created zones get a UUID v4.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct ZoneId(String);

impl<'de> Deserialize<'de> for ZoneId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum StoredId {
            Text(String),
            Number(serde_json::Number),
        }

        Ok(match StoredId::deserialize(deserializer)? {
            StoredId::Text(id) => Self(id),
            StoredId::Number(id) => Self(id.to_string()),
        })
    }
}

impl ZoneId {
    /// Generate a fresh random identifier.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ZoneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for ZoneId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for ZoneId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl AsRef<str> for ZoneId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

const fn default_enabled() -> bool {
    true
}

/// A named group of locations sharing one delivery fee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryZone {
    pub id: ZoneId,
    pub name: String,
    /// Stored fee. Customers may pay less; see [`DeliveryConfiguration::effective_fee`].
    #[serde(with = "rust_decimal::serde::float")]
    pub fee: Decimal,
    /// Disabled zones keep their cities but are hidden from customers.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default)]
    pub cities: BTreeSet<String>,
}

impl DeliveryZone {
    /// Whether this zone lists `city`.
    #[must_use]
    pub fn covers(&self, city: &str) -> bool {
        self.cities.contains(city)
    }
}

/// A store's complete delivery settings. This is the unit that gets persisted.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryConfiguration {
    /// Zones in display order.
    pub zones: Vec<DeliveryZone>,
    /// When set, every enabled zone delivers for free. Stored fees are kept.
    #[serde(default)]
    pub is_free_delivery: bool,
}

impl DeliveryConfiguration {
    #[must_use]
    pub const fn new(zones: Vec<DeliveryZone>, is_free_delivery: bool) -> Self {
        Self {
            zones,
            is_free_delivery,
        }
    }

    /// Find a zone by id.
    #[must_use]
    pub fn zone(&self, id: &ZoneId) -> Option<&DeliveryZone> {
        self.zones.iter().find(|zone| &zone.id == id)
    }

    /// The zone that lists `city`, if any.
    #[must_use]
    pub fn zone_for_city(&self, city: &str) -> Option<&DeliveryZone> {
        self.zones.iter().find(|zone| zone.covers(city))
    }

    /// The fee a customer pays for delivery into `zone`.
    #[must_use]
    pub fn effective_fee(&self, zone: &DeliveryZone) -> Decimal {
        if self.is_free_delivery {
            Decimal::ZERO
        } else {
            zone.fee
        }
    }
}

/// A zone as submitted from the editor, before validation.
///
/// `id` is `None` for a zone that does not exist yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoneDraft {
    #[serde(default)]
    pub id: Option<ZoneId>,
    pub name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub fee: Decimal,
    /// `None` keeps an existing zone's visibility; new zones start enabled.
    #[serde(default)]
    pub enabled: Option<bool>,
    #[serde(default)]
    pub cities: BTreeSet<String>,
}

impl ZoneDraft {
    /// Start a draft for a new zone.
    #[must_use]
    pub fn new<I, S>(name: impl Into<String>, fee: Decimal, cities: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            id: None,
            name: name.into(),
            fee,
            enabled: None,
            cities: cities.into_iter().map(Into::into).collect(),
        }
    }

    /// Target an existing zone.
    #[must_use]
    pub fn with_id(mut self, id: ZoneId) -> Self {
        self.id = Some(id);
        self
    }
}

impl From<&DeliveryZone> for ZoneDraft {
    fn from(zone: &DeliveryZone) -> Self {
        Self {
            id: Some(zone.id.clone()),
            name: zone.name.clone(),
            fee: zone.fee,
            enabled: Some(zone.enabled),
            cities: zone.cities.clone(),
        }
    }
}
