//! Cross-module properties of the delivery zone engine.
//!
//! No server or database needed.

#![allow(clippy::unwrap_used)]

use std::collections::BTreeSet;

use dukkan_core::delivery::{
    DeliveryZone, LegacyShape, LoadOutcome, LocationCatalog, ZoneDraft, ZoneEditor, ZoneId,
    ZoneValidationError, compute_unassigned, delete_zone, load_and_normalize,
    overlapping_locations, quote, toggle_zone, upsert_zone,
};
use dukkan_core::{CurrencyCode, Price};
use rust_decimal::Decimal;
use serde_json::{Value, json};

fn catalog() -> LocationCatalog {
    LocationCatalog::iraq()
}

/// Every catalog location is either in exactly one zone or unassigned.
fn assert_partition(zones: &[DeliveryZone], catalog: &LocationCatalog) {
    assert!(
        overlapping_locations(zones).is_empty(),
        "overlap in {zones:?}"
    );

    let assigned: BTreeSet<&str> = zones
        .iter()
        .flat_map(|zone| zone.cities.iter().map(String::as_str))
        .collect();
    let unassigned = compute_unassigned(zones, catalog.locations());

    for location in catalog.locations() {
        let in_zone = assigned.contains(location.as_str());
        let listed = unassigned.contains(location);
        assert!(in_zone ^ listed, "{location} in_zone={in_zone} unassigned={listed}");
    }
}

fn legacy_values() -> Vec<Value> {
    vec![
        Value::Null,
        json!({ "baghdad": 5000, "provinces": 8000 }),
        json!({ "baghdad": "4000" }),
        json!({
            "Baghdad": { "fee": 3000, "enabled": true },
            "Basra": { "fee": 6000, "enabled": true },
            "Erbil": { "fee": 6000, "enabled": true },
            "Kirkuk": { "fee": 6000, "enabled": false }
        }),
        json!({
            "Basra": { "fee": 6000, "enabled": false },
            "Erbil": { "fee": 6000, "enabled": false },
            "Najaf": { "fee": 6000, "enabled": false }
        }),
        json!([1, 2, 3]),
        json!("5000"),
    ]
}

// ============================================================================
// Migration
// ============================================================================

#[test]
fn test_every_legacy_shape_migrates_to_a_partition() {
    for raw in legacy_values() {
        let loaded = load_and_normalize(Some(&raw), &catalog());
        assert!(loaded.outcome.needs_write_back(), "{raw} should migrate");
        assert!(!loaded.configuration.zones.is_empty(), "{raw} produced no zones");
        assert!(!loaded.configuration.is_free_delivery);
        assert_partition(&loaded.configuration.zones, &catalog());
    }
}

#[test]
fn test_normalizing_twice_is_a_noop() {
    for raw in legacy_values() {
        let first = load_and_normalize(Some(&raw), &catalog());
        let stored = serde_json::to_value(&first.configuration).unwrap();

        let second = load_and_normalize(Some(&stored), &catalog());

        assert_eq!(
            second.outcome,
            LoadOutcome::AlreadyNormalized { skipped_zones: 0 }
        );
        assert_eq!(second.configuration, first.configuration);
    }
}

#[test]
fn test_two_tier_defaults() {
    let loaded = load_and_normalize(None, &catalog());
    let zones = &loaded.configuration.zones;

    assert_eq!(zones.len(), 2);
    assert_eq!(zones[0].cities, BTreeSet::from(["Baghdad".to_owned()]));
    assert_eq!(zones[0].fee, Decimal::from(5000));
    assert_eq!(zones[1].cities.len(), 17);
    assert_eq!(zones[1].fee, Decimal::from(8000));
    assert!(zones.iter().all(|zone| zone.enabled));
}

#[test]
fn test_detailed_with_disabled_locations() {
    let raw = json!({
        "Baghdad": { "fee": 3000, "enabled": true },
        "Basra": { "fee": 6000, "enabled": true },
        "Erbil": { "fee": 6000, "enabled": true },
        "Kirkuk": { "fee": 6000, "enabled": false }
    });

    let loaded = load_and_normalize(Some(&raw), &catalog());
    let zones = &loaded.configuration.zones;

    assert_eq!(zones.len(), 2);
    assert_eq!(zones[1].cities.len(), 2);
    let unassigned = compute_unassigned(zones, catalog().locations());
    assert!(unassigned.contains(&"Kirkuk".to_owned()));
}

#[test]
fn test_all_disabled_gets_fallback_zone() {
    let raw = json!({
        "Basra": { "fee": 6000, "enabled": false },
        "Erbil": { "fee": 6000, "enabled": false },
        "Najaf": { "fee": 6000, "enabled": false }
    });

    let loaded = load_and_normalize(Some(&raw), &catalog());

    assert_eq!(
        loaded.outcome,
        LoadOutcome::MigratedDetailed {
            dropped_unknown: Vec::new(),
            skipped_entries: Vec::new(),
            fallback: true,
        }
    );
    assert_eq!(loaded.configuration.zones.len(), 1);
    assert!(loaded.configuration.zones[0].covers("Baghdad"));
}

#[test]
fn test_normalized_passes_through_untouched() {
    let raw = json!({
        "zones": [
            { "id": "keep-me", "name": "Everywhere", "fee": 2500.5, "enabled": false, "cities": ["Basra"] }
        ],
        "isFreeDelivery": true
    });

    assert!(matches!(
        LegacyShape::detect(Some(&raw)),
        LegacyShape::Normalized { .. }
    ));

    let loaded = load_and_normalize(Some(&raw), &catalog());
    let zone = &loaded.configuration.zones[0];
    assert_eq!(zone.id, ZoneId::from("keep-me"));
    assert_eq!(zone.fee, Decimal::new(25005, 1));
    assert!(!zone.enabled);
    assert!(loaded.configuration.is_free_delivery);
}

// ============================================================================
// Editing
// ============================================================================

#[test]
fn test_edit_sequence_keeps_partition() {
    let catalog = catalog();
    let mut zones = load_and_normalize(None, &catalog).configuration.zones;

    let drafts = [
        ZoneDraft::new("South", Decimal::from(7000), ["Basra", "Maysan", "Dhi Qar"]),
        ZoneDraft::new("North", Decimal::from(9000), ["Erbil", "Duhok", "Sulaymaniyah"]),
        ZoneDraft::new("Holy cities", Decimal::from(6000), ["Najaf", "Karbala", "Basra"]),
        ZoneDraft::new("Capital", Decimal::from(4000), ["Baghdad", "Erbil"]),
    ];

    for draft in drafts {
        zones = upsert_zone(&zones, draft).unwrap();
        assert_partition(&zones, &catalog);
    }

    let south = zones.iter().find(|zone| zone.name == "South").unwrap();
    assert!(!south.covers("Basra"));

    let north_id = zones.iter().find(|zone| zone.name == "North").unwrap().id.clone();
    zones = toggle_zone(&zones, &north_id);
    assert_partition(&zones, &catalog);

    zones = delete_zone(&zones, &north_id);
    assert_partition(&zones, &catalog);
    let unassigned = compute_unassigned(&zones, catalog.locations());
    assert!(unassigned.contains(&"Duhok".to_owned()));
    assert!(!unassigned.contains(&"Erbil".to_owned()));
}

#[test]
fn test_moving_a_city_between_zones() {
    let zones = vec![
        DeliveryZone {
            id: ZoneId::from("z1"),
            name: "One".to_owned(),
            fee: Decimal::from(1000),
            enabled: true,
            cities: ["Baghdad", "Basra"].map(str::to_owned).into(),
        },
        DeliveryZone {
            id: ZoneId::from("z2"),
            name: "Two".to_owned(),
            fee: Decimal::from(2000),
            enabled: true,
            cities: ["Najaf"].map(str::to_owned).into(),
        },
    ];

    let draft = ZoneDraft::new("Two", Decimal::from(2000), ["Najaf", "Basra"])
        .with_id(ZoneId::from("z2"));
    let next = upsert_zone(&zones, draft).unwrap();

    assert_eq!(next[0].cities, BTreeSet::from(["Baghdad".to_owned()]));
    assert_eq!(
        next[1].cities,
        BTreeSet::from(["Basra".to_owned(), "Najaf".to_owned()])
    );
}

#[test]
fn test_rejected_edits_change_nothing() {
    let zones = load_and_normalize(None, &catalog()).configuration.zones;
    let snapshot = zones.clone();

    for (draft, expected) in [
        (
            ZoneDraft::new("", Decimal::from(1000), ["Basra"]),
            ZoneValidationError::EmptyName,
        ),
        (
            ZoneDraft::new("Empty", Decimal::from(1000), Vec::<String>::new()),
            ZoneValidationError::EmptyCities,
        ),
        (
            ZoneDraft::new("Negative", Decimal::from(-5), ["Basra"]),
            ZoneValidationError::NegativeFee,
        ),
    ] {
        assert_eq!(upsert_zone(&zones, draft), Err(expected));
        assert_eq!(zones, snapshot);
    }
}

#[test]
fn test_editor_session_to_customer_quote() {
    let catalog = catalog();
    let (mut editor, _) = ZoneEditor::load(None, &catalog);

    let south = editor
        .upsert(
            ZoneDraft::new("South", Decimal::from(7000), ["Basra"]),
            &catalog,
        )
        .unwrap();

    assert_eq!(
        quote(editor.configuration(), "Basra", CurrencyCode::IQD),
        Ok(Price::new(Decimal::from(7000), CurrencyCode::IQD))
    );

    editor.toggle(&south);
    assert!(quote(editor.configuration(), "Basra", CurrencyCode::IQD).is_err());
    // Still counted as assigned while hidden
    assert!(!editor.unassigned(&catalog).contains(&"Basra".to_owned()));

    editor.set_free_delivery(true);
    assert!(
        quote(editor.configuration(), "Najaf", CurrencyCode::IQD)
            .unwrap()
            .is_zero()
    );
}
