//! Delivery editor and storefront flows through the dashboard router.
//!
//! The in-process tests run against [`MemoryDeliveryStore`]. The live tests
//! need a migrated database, a running dashboard, and a store with slug
//! `integration-test`:
//!
//! ```sql
//! INSERT INTO dashboard.store (slug, name) VALUES ('integration-test', 'Integration Test');
//! ```

#![allow(clippy::unwrap_used)]

use dukkan_core::StoreId;
use dukkan_dashboard::db::MemoryDeliveryStore;
use dukkan_integration_tests::{TestClient, dashboard_base_url, in_process_app, seeded_store};
use reqwest::{Client, StatusCode};
use serde_json::{Value, json};

const STORE: StoreId = StoreId::new(3);

async fn client_for(raw: Option<Value>) -> (TestClient, MemoryDeliveryStore) {
    let store = seeded_store(STORE, "corner-shop", raw).await;
    (TestClient::new(in_process_app(&store)), store)
}

// ============================================================================
// In-process
// ============================================================================

#[tokio::test]
async fn test_legacy_store_full_editing_flow() {
    let (mut client, store) = client_for(Some(json!({ "baghdad": 5000, "provinces": 8000 }))).await;

    // First load migrates in memory only
    let state = client.send("GET", "/api/stores/3/delivery", None).await;
    assert_eq!(state.status, StatusCode::OK);
    assert_eq!(state.body["dirty"], true);
    assert_eq!(
        store.raw(STORE).await,
        Some(json!({ "baghdad": 5000, "provinces": 8000 }))
    );

    // Carve the south out of the provinces zone
    let created = client
        .send(
            "POST",
            "/api/stores/3/delivery/zones",
            Some(json!({ "name": "South", "fee": 6500, "cities": ["Basra", "Maysan"] })),
        )
        .await;
    assert_eq!(created.status, StatusCode::OK);
    let south_id = created.body["zoneId"].as_str().unwrap().to_owned();
    let zones = created.body["zones"].as_array().unwrap();
    assert_eq!(zones.len(), 3);
    let provinces = zones.iter().find(|z| z["name"] == "Provinces").unwrap();
    let provinces_cities = provinces["cities"].as_array().unwrap();
    assert!(!provinces_cities.contains(&json!("Basra")));

    // Hide it, then delete it
    let toggled = client
        .send(
            "POST",
            &format!("/api/stores/3/delivery/zones/{south_id}/toggle"),
            None,
        )
        .await;
    assert_eq!(toggled.body["enabled"], false);
    assert_eq!(
        toggled.body["coverage"]["disabledOnly"],
        json!(["Basra", "Maysan"])
    );

    let deleted = client
        .send(
            "DELETE",
            &format!("/api/stores/3/delivery/zones/{south_id}"),
            None,
        )
        .await;
    assert_eq!(deleted.status, StatusCode::OK);
    assert_eq!(deleted.body["unassigned"], json!(["Basra", "Maysan"]));

    // Save writes the normalized shape
    let saved = client.send("POST", "/api/stores/3/delivery/save", None).await;
    assert_eq!(saved.status, StatusCode::OK);
    assert_eq!(saved.body["dirty"], false);

    let stored = store.raw(STORE).await.unwrap();
    assert_eq!(stored["isFreeDelivery"], false);
    assert_eq!(stored["zones"].as_array().unwrap().len(), 2);
    assert!(stored.get("baghdad").is_none());
}

#[tokio::test]
async fn test_customer_sees_only_saved_state() {
    let (mut merchant, _) = client_for(Some(json!({ "zones": [], "isFreeDelivery": false }))).await;

    merchant
        .send(
            "POST",
            "/api/stores/3/delivery/zones",
            Some(json!({ "name": "Capital", "fee": 3000, "cities": ["Baghdad"] })),
        )
        .await;

    // A separate client has no session
    let mut customer = merchant.clone();
    customer.clear_cookie();

    let before = customer
        .send("GET", "/shop/corner-shop/delivery/quote?city=Baghdad", None)
        .await;
    assert_eq!(before.status, StatusCode::NOT_FOUND);

    merchant.send("POST", "/api/stores/3/delivery/save", None).await;

    let after = customer
        .send("GET", "/shop/corner-shop/delivery/quote?city=Baghdad", None)
        .await;
    assert_eq!(after.status, StatusCode::OK);
    assert_eq!(after.body["fee"]["amount"], "3000");
    assert_eq!(after.body["fee"]["currency_code"], "IQD");
}

#[tokio::test]
async fn test_save_failure_keeps_edits_for_retry() {
    let (mut client, store) = client_for(None).await;

    client
        .send(
            "PUT",
            "/api/stores/3/delivery/free-delivery",
            Some(json!({ "enabled": true })),
        )
        .await;

    store.set_fail_writes(true);
    let failed = client.send("POST", "/api/stores/3/delivery/save", None).await;
    assert_eq!(failed.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(failed.body["error"], "Internal server error");
    assert_eq!(store.raw(STORE).await, None);

    let state = client.send("GET", "/api/stores/3/delivery", None).await;
    assert_eq!(state.body["isFreeDelivery"], true);
    assert_eq!(state.body["dirty"], true);

    store.set_fail_writes(false);
    let retried = client.send("POST", "/api/stores/3/delivery/save", None).await;
    assert_eq!(retried.status, StatusCode::OK);
    assert_eq!(store.raw(STORE).await.unwrap()["isFreeDelivery"], true);
}

#[tokio::test]
async fn test_unknown_city_rejected() {
    let (mut client, _) = client_for(None).await;

    let response = client
        .send(
            "POST",
            "/api/stores/3/delivery/zones",
            Some(json!({ "name": "Far", "fee": 1000, "cities": ["Gotham"] })),
        )
        .await;

    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(response.body["field"], "cities");
    assert_eq!(response.body["code"], "unknown_location");
}

#[tokio::test]
async fn test_editor_page_lists_unassigned() {
    let (mut client, _) = client_for(Some(json!({
        "zones": [
            { "id": "z", "name": "Capital", "fee": 3000, "enabled": true, "cities": ["Baghdad"] }
        ],
        "isFreeDelivery": false
    })))
    .await;

    let page = client.send("GET", "/stores/3/delivery", None).await;

    assert_eq!(page.status, StatusCode::OK);
    assert!(page.text.contains("Capital"));
    assert!(page.text.contains("Not in any zone"));
    assert!(page.text.contains("Delivering to 1 of 18 locations"));
}

// ============================================================================
// Live server
// ============================================================================

fn live_client() -> Client {
    Client::builder()
        .cookie_store(true)
        .build()
        .expect("Failed to create HTTP client")
}

#[tokio::test]
#[ignore = "Requires running dashboard server and database"]
async fn test_live_health() {
    let base_url = dashboard_base_url();
    let resp = live_client()
        .get(format!("{base_url}/health/ready"))
        .send()
        .await
        .expect("Failed to reach dashboard");

    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
#[ignore = "Requires running dashboard server and database"]
async fn test_live_storefront_options() {
    let base_url = dashboard_base_url();
    let resp = live_client()
        .get(format!("{base_url}/shop/integration-test/delivery"))
        .send()
        .await
        .expect("Failed to get delivery options");

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("Failed to parse response");
    assert!(body["options"].is_array());
    assert_eq!(body["currency"], "IQD");
}

#[tokio::test]
#[ignore = "Requires running dashboard server and database"]
async fn test_live_quote_requires_city() {
    let base_url = dashboard_base_url();
    let resp = live_client()
        .get(format!("{base_url}/shop/integration-test/delivery/quote"))
        .send()
        .await
        .expect("Failed to get quote");

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}
