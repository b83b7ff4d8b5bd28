//! The fixed universe of locations a store can deliver to.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::CurrencyCode;

/// Iraqi governorates, in the order they are shown to merchants.
pub const IRAQ_GOVERNORATES: [&str; 18] = [
    "Baghdad",
    "Basra",
    "Nineveh",
    "Erbil",
    "Sulaymaniyah",
    "Duhok",
    "Kirkuk",
    "Anbar",
    "Babil",
    "Karbala",
    "Najaf",
    "Diyala",
    "Wasit",
    "Maysan",
    "Dhi Qar",
    "Muthanna",
    "Qadisiyyah",
    "Saladin",
];

/// Default fee for the primary location when legacy data carries none.
const DEFAULT_PRIMARY_FEE: i64 = 5000;

/// Default fee for every other location when legacy data carries none.
const DEFAULT_SECONDARY_FEE: i64 = 8000;

/// Known locations plus the defaults used when migrating legacy fee data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationCatalog {
    locations: Vec<String>,
    primary: String,
    default_primary_fee: Decimal,
    default_secondary_fee: Decimal,
    currency: CurrencyCode,
}

impl LocationCatalog {
    /// Build a catalog from an ordered list of locations.
    ///
    /// The first location is the primary one (the store's home city).
    /// Returns `None` if `locations` is empty.
    #[must_use]
    pub fn new<I, S>(locations: I, currency: CurrencyCode) -> Option<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut unique: Vec<String> = Vec::new();
        for location in locations.into_iter().map(Into::into) {
            if !unique.contains(&location) {
                unique.push(location);
            }
        }
        let locations = unique;
        let primary = locations.first()?.clone();

        Some(Self {
            locations,
            primary,
            default_primary_fee: Decimal::from(DEFAULT_PRIMARY_FEE),
            default_secondary_fee: Decimal::from(DEFAULT_SECONDARY_FEE),
            currency,
        })
    }

    /// The built-in catalog: Iraqi governorates, Baghdad as primary, IQD.
    #[must_use]
    pub fn iraq() -> Self {
        Self {
            locations: IRAQ_GOVERNORATES.iter().map(|&s| s.to_owned()).collect(),
            primary: IRAQ_GOVERNORATES[0].to_owned(),
            default_primary_fee: Decimal::from(DEFAULT_PRIMARY_FEE),
            default_secondary_fee: Decimal::from(DEFAULT_SECONDARY_FEE),
            currency: CurrencyCode::IQD,
        }
    }

    /// Override the fees used when legacy data has none.
    #[must_use]
    pub fn with_default_fees(mut self, primary: Decimal, secondary: Decimal) -> Self {
        self.default_primary_fee = primary;
        self.default_secondary_fee = secondary;
        self
    }

    /// All known locations, in display order.
    #[must_use]
    pub fn locations(&self) -> &[String] {
        &self.locations
    }

    /// The primary location.
    #[must_use]
    pub fn primary(&self) -> &str {
        &self.primary
    }

    /// Every known location except the primary one.
    pub fn secondary(&self) -> impl Iterator<Item = &str> {
        self.locations
            .iter()
            .map(String::as_str)
            .filter(move |&location| location != self.primary)
    }

    /// Whether `location` is a known location.
    #[must_use]
    pub fn contains(&self, location: &str) -> bool {
        self.locations.iter().any(|known| known == location)
    }

    /// The catalog spelling of `name`, ignoring case and surrounding spaces.
    #[must_use]
    pub fn resolve(&self, name: &str) -> Option<&str> {
        let name = name.trim().to_lowercase();
        self.locations
            .iter()
            .find(|known| known.to_lowercase() == name)
            .map(String::as_str)
    }

    #[must_use]
    pub const fn default_primary_fee(&self) -> Decimal {
        self.default_primary_fee
    }

    #[must_use]
    pub const fn default_secondary_fee(&self) -> Decimal {
        self.default_secondary_fee
    }

    #[must_use]
    pub const fn currency(&self) -> CurrencyCode {
        self.currency
    }
}

impl Default for LocationCatalog {
    fn default() -> Self {
        Self::iraq()
    }
}
