//! Customer-facing delivery endpoints.
//!
//! Customers only ever see normalized data. Legacy records are migrated in
//! memory for the response and left as stored; write-back is the merchant's save.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::get,
};
use dukkan_core::delivery::{
    DeliveryConfiguration, DeliveryOption, delivery_options, load_and_normalize, quote,
};
use dukkan_core::{CurrencyCode, Price};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::error::AppError;
use crate::state::AppState;

/// Build the storefront delivery router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/shop/{slug}/delivery", get(options))
        .route("/shop/{slug}/delivery/quote", get(quote_city))
}

// =============================================================================
// API Types
// =============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryOptionsResponse {
    pub options: Vec<DeliveryOption>,
    pub is_free_delivery: bool,
    pub currency: CurrencyCode,
}

#[derive(Debug, Deserialize)]
pub struct QuoteParams {
    pub city: String,
}

#[derive(Debug, Serialize)]
pub struct QuoteResponse {
    pub city: String,
    pub fee: Price,
}

// =============================================================================
// Route Handlers
// =============================================================================

async fn load_configuration(state: &AppState, slug: &str) -> Result<DeliveryConfiguration, AppError> {
    let store_id = state.store().find_by_slug(slug).await?;
    let raw = state.store().read(store_id).await?;
    Ok(load_and_normalize(raw.as_ref(), state.catalog()).configuration)
}

/// Cities the store delivers to, with fees.
///
/// GET /shop/{slug}/delivery
#[instrument(skip(state))]
async fn options(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<DeliveryOptionsResponse>, AppError> {
    let configuration = load_configuration(&state, &slug).await?;
    let currency = state.catalog().currency();

    Ok(Json(DeliveryOptionsResponse {
        options: delivery_options(&configuration, currency),
        is_free_delivery: configuration.is_free_delivery,
        currency,
    }))
}

/// Delivery price for one city.
///
/// GET /shop/{slug}/delivery/quote?city=...
#[instrument(skip(state))]
async fn quote_city(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Query(params): Query<QuoteParams>,
) -> Result<Json<QuoteResponse>, AppError> {
    let city = params.city.trim();
    if city.is_empty() {
        return Err(AppError::BadRequest("city is required".to_string()));
    }

    let configuration = load_configuration(&state, &slug).await?;
    let fee = quote(&configuration, city, state.catalog().currency())?;

    Ok(Json(QuoteResponse {
        city: city.to_owned(),
        fee,
    }))
}
