//! What customers see: where a store delivers and what it costs.

use serde::Serialize;
use thiserror::Error;

use super::zone::{DeliveryConfiguration, ZoneId};
use crate::types::{CurrencyCode, Price};

/// One city a customer can choose at checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeliveryOption {
    pub city: String,
    pub zone_id: ZoneId,
    pub zone_name: String,
    pub fee: Price,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuoteError {
    /// The city is unassigned or only in a disabled zone.
    #[error("Delivery is not available to {0}")]
    NotServed(String),
}

/// Cities in enabled zones with their effective fee, sorted by city.
#[must_use]
pub fn delivery_options(
    configuration: &DeliveryConfiguration,
    currency: CurrencyCode,
) -> Vec<DeliveryOption> {
    let mut options: Vec<DeliveryOption> = configuration
        .zones
        .iter()
        .filter(|zone| zone.enabled)
        .flat_map(|zone| {
            let fee = Price::new(configuration.effective_fee(zone), currency);
            zone.cities.iter().map(move |city| DeliveryOption {
                city: city.clone(),
                zone_id: zone.id.clone(),
                zone_name: zone.name.clone(),
                fee,
            })
        })
        .collect();

    options.sort_by(|a, b| a.city.cmp(&b.city));
    options
}

/// Delivery price for one city.
///
/// # Errors
///
/// Returns `QuoteError::NotServed` if no enabled zone lists `city`.
pub fn quote(
    configuration: &DeliveryConfiguration,
    city: &str,
    currency: CurrencyCode,
) -> Result<Price, QuoteError> {
    configuration
        .zones
        .iter()
        .find(|zone| zone.enabled && zone.covers(city))
        .map(|zone| Price::new(configuration.effective_fee(zone), currency))
        .ok_or_else(|| QuoteError::NotServed(city.to_owned()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;
    use crate::delivery::zone::DeliveryZone;

    fn configuration(is_free_delivery: bool) -> DeliveryConfiguration {
        DeliveryConfiguration::new(
            vec![
                DeliveryZone {
                    id: ZoneId::from("south"),
                    name: "South".to_owned(),
                    fee: Decimal::from(7000),
                    enabled: true,
                    cities: ["Basra", "Maysan"].map(str::to_owned).into(),
                },
                DeliveryZone {
                    id: ZoneId::from("north"),
                    name: "North".to_owned(),
                    fee: Decimal::from(9000),
                    enabled: false,
                    cities: ["Erbil"].map(str::to_owned).into(),
                },
            ],
            is_free_delivery,
        )
    }

    #[test]
    fn test_options_skip_disabled_zones() {
        let options = delivery_options(&configuration(false), CurrencyCode::IQD);
        let cities: Vec<&str> = options.iter().map(|o| o.city.as_str()).collect();
        assert_eq!(cities, ["Basra", "Maysan"]);
        assert_eq!(options[0].fee.amount, Decimal::from(7000));
    }

    #[test]
    fn test_free_delivery_zeroes_fees() {
        let options = delivery_options(&configuration(true), CurrencyCode::IQD);
        assert!(options.iter().all(|o| o.fee.is_zero()));
        assert!(quote(&configuration(true), "Basra", CurrencyCode::IQD).unwrap().is_zero());
    }

    #[test]
    fn test_quote() {
        let price = quote(&configuration(false), "Maysan", CurrencyCode::IQD).unwrap();
        assert_eq!(price, Price::new(Decimal::from(7000), CurrencyCode::IQD));
    }

    #[test]
    fn test_quote_not_served() {
        for city in ["Erbil", "Kirkuk"] {
            assert_eq!(
                quote(&configuration(false), city, CurrencyCode::IQD),
                Err(QuoteError::NotServed(city.to_owned()))
            );
        }
    }
}
