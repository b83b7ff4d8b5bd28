//! Merchant delivery-zone editor.
//!
//! Edits are applied to a [`ZoneEditor`] kept in the merchant's session and
//! only reach storage on `save`. A failed save leaves the session untouched so
//! the merchant can retry.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post, put},
};
use dukkan_core::delivery::{
    CoverageReport, DeliveryZone, LoadOutcome, ZoneDraft, ZoneEditor, ZoneId,
    overlapping_locations,
};
use dukkan_core::{CurrencyCode, Price, StoreId};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::{info, instrument, warn};

use crate::error::AppError;
use crate::models::session::delivery_editor_key;
use crate::state::AppState;

/// Build the delivery editor router.
pub fn router() -> Router<AppState> {
    Router::new()
        // Page
        .route("/stores/{store_id}/delivery", get(settings_page))
        // API
        .route("/api/stores/{store_id}/delivery", get(show))
        .route("/api/stores/{store_id}/delivery/zones", post(upsert_zone))
        .route(
            "/api/stores/{store_id}/delivery/zones/{zone_id}",
            axum::routing::delete(delete_zone),
        )
        .route(
            "/api/stores/{store_id}/delivery/zones/{zone_id}/toggle",
            post(toggle_zone),
        )
        .route(
            "/api/stores/{store_id}/delivery/free-delivery",
            put(set_free_delivery),
        )
        .route("/api/stores/{store_id}/delivery/save", post(save))
        .route("/api/stores/{store_id}/delivery/discard", post(discard))
}

// =============================================================================
// Templates
// =============================================================================

/// Zone row for template rendering.
#[derive(Debug, Clone)]
pub struct ZoneView {
    pub id: String,
    pub name: String,
    pub fee: String,
    /// Plain amount used to prefill the edit form.
    pub fee_amount: String,
    pub enabled: bool,
    pub cities: String,
    pub city_count: usize,
}

impl ZoneView {
    fn new(zone: &DeliveryZone, currency: CurrencyCode) -> Self {
        Self {
            id: zone.id.to_string(),
            name: zone.name.clone(),
            fee: Price::new(zone.fee, currency).to_string(),
            fee_amount: zone.fee.normalize().to_string(),
            enabled: zone.enabled,
            cities: zone
                .cities
                .iter()
                .map(String::as_str)
                .collect::<Vec<_>>()
                .join(", "),
            city_count: zone.cities.len(),
        }
    }
}

/// Delivery settings page template.
#[derive(Template, WebTemplate)]
#[template(path = "delivery/settings.html")]
pub struct DeliverySettingsTemplate {
    pub store_id: StoreId,
    pub zones: Vec<ZoneView>,
    pub locations: Vec<String>,
    pub coverage: CoverageReport,
    pub is_free_delivery: bool,
    pub dirty: bool,
}

// =============================================================================
// API Types
// =============================================================================

/// Editor state returned by every API call.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryStateResponse {
    pub store_id: StoreId,
    pub zones: Vec<DeliveryZone>,
    pub is_free_delivery: bool,
    /// Edits not yet saved.
    pub dirty: bool,
    pub unassigned: Vec<String>,
    pub coverage: CoverageReport,
    pub currency: CurrencyCode,
}

impl DeliveryStateResponse {
    fn new(state: &AppState, store_id: StoreId, editor: &ZoneEditor) -> Self {
        let catalog = state.catalog();
        let coverage = editor.coverage(catalog);
        Self {
            store_id,
            zones: editor.zones().to_vec(),
            is_free_delivery: editor.is_free_delivery(),
            dirty: editor.is_dirty(),
            unassigned: coverage.unassigned.clone(),
            coverage,
            currency: catalog.currency(),
        }
    }
}

/// Response after creating or editing a zone.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoneSavedResponse {
    pub zone_id: ZoneId,
    #[serde(flatten)]
    pub state: DeliveryStateResponse,
}

/// Response after toggling a zone.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoneToggledResponse {
    pub zone_id: ZoneId,
    pub enabled: bool,
    #[serde(flatten)]
    pub state: DeliveryStateResponse,
}

/// Request to switch free delivery on or off.
#[derive(Debug, Deserialize)]
pub struct FreeDeliveryRequest {
    pub enabled: bool,
}

// =============================================================================
// Session Helpers
// =============================================================================

/// The session's editor for `store_id`, loading it from storage on first use.
async fn current_editor(
    state: &AppState,
    session: &Session,
    store_id: StoreId,
) -> Result<ZoneEditor, AppError> {
    let key = delivery_editor_key(store_id);
    if let Some(editor) = session.get::<ZoneEditor>(&key).await? {
        return Ok(editor);
    }

    let editor = load_from_store(state, store_id).await?;
    session.insert(&key, &editor).await?;
    Ok(editor)
}

async fn load_from_store(state: &AppState, store_id: StoreId) -> Result<ZoneEditor, AppError> {
    let raw = state.store().read(store_id).await?;
    let (editor, outcome) = ZoneEditor::load(raw.as_ref(), state.catalog());
    log_load_outcome(store_id, &outcome);

    let overlaps = overlapping_locations(editor.zones());
    if !overlaps.is_empty() {
        warn!(%store_id, ?overlaps, "Stored zones share locations");
    }

    Ok(editor)
}

fn log_load_outcome(store_id: StoreId, outcome: &LoadOutcome) {
    match outcome {
        LoadOutcome::AlreadyNormalized { skipped_zones: 0 } => {}
        LoadOutcome::AlreadyNormalized { skipped_zones } => {
            warn!(%store_id, skipped_zones, "Skipped unreadable stored zones");
        }
        LoadOutcome::MigratedDetailed {
            dropped_unknown,
            skipped_entries,
            fallback,
        } => {
            info!(%store_id, fallback, "Migrated per-location delivery fees");
            if !dropped_unknown.is_empty() {
                warn!(%store_id, ?dropped_unknown, "Dropped unknown locations during migration");
            }
            if !skipped_entries.is_empty() {
                warn!(%store_id, ?skipped_entries, "Skipped unreadable per-location fees");
            }
        }
        LoadOutcome::MigratedTwoTier { ambiguous: true } => {
            warn!(%store_id, "Stored delivery fees were unreadable; using defaults");
        }
        LoadOutcome::MigratedTwoTier { ambiguous: false } => {
            info!(%store_id, "Migrated two-tier delivery fees");
        }
    }
}

async fn store_editor(
    session: &Session,
    store_id: StoreId,
    editor: &ZoneEditor,
) -> Result<(), AppError> {
    session
        .insert(&delivery_editor_key(store_id), editor)
        .await?;
    Ok(())
}

// =============================================================================
// Route Handlers
// =============================================================================

/// Render the delivery settings page.
///
/// GET /stores/{store_id}/delivery
#[instrument(skip(state, session))]
async fn settings_page(
    State(state): State<AppState>,
    session: Session,
    Path(store_id): Path<StoreId>,
) -> Result<DeliverySettingsTemplate, AppError> {
    let editor = current_editor(&state, &session, store_id).await?;
    let catalog = state.catalog();

    Ok(DeliverySettingsTemplate {
        store_id,
        zones: editor
            .zones()
            .iter()
            .map(|zone| ZoneView::new(zone, catalog.currency()))
            .collect(),
        locations: catalog.locations().to_vec(),
        coverage: editor.coverage(catalog),
        is_free_delivery: editor.is_free_delivery(),
        dirty: editor.is_dirty(),
    })
}

/// GET /api/stores/{store_id}/delivery
#[instrument(skip(state, session))]
async fn show(
    State(state): State<AppState>,
    session: Session,
    Path(store_id): Path<StoreId>,
) -> Result<Json<DeliveryStateResponse>, AppError> {
    let editor = current_editor(&state, &session, store_id).await?;
    Ok(Json(DeliveryStateResponse::new(&state, store_id, &editor)))
}

/// Create or edit a zone.
///
/// POST /api/stores/{store_id}/delivery/zones
#[instrument(skip(state, session))]
async fn upsert_zone(
    State(state): State<AppState>,
    session: Session,
    Path(store_id): Path<StoreId>,
    Json(draft): Json<ZoneDraft>,
) -> Result<Json<ZoneSavedResponse>, AppError> {
    let mut editor = current_editor(&state, &session, store_id).await?;
    let zone_id = editor.upsert(draft, state.catalog())?;
    store_editor(&session, store_id, &editor).await?;

    Ok(Json(ZoneSavedResponse {
        zone_id,
        state: DeliveryStateResponse::new(&state, store_id, &editor),
    }))
}

/// DELETE /api/stores/{store_id}/delivery/zones/{zone_id}
#[instrument(skip(state, session))]
async fn delete_zone(
    State(state): State<AppState>,
    session: Session,
    Path((store_id, zone_id)): Path<(StoreId, ZoneId)>,
) -> Result<Json<DeliveryStateResponse>, AppError> {
    let mut editor = current_editor(&state, &session, store_id).await?;
    if !editor.delete(&zone_id) {
        return Err(AppError::NotFound(format!("zone {zone_id}")));
    }
    store_editor(&session, store_id, &editor).await?;

    Ok(Json(DeliveryStateResponse::new(&state, store_id, &editor)))
}

/// POST /api/stores/{store_id}/delivery/zones/{zone_id}/toggle
#[instrument(skip(state, session))]
async fn toggle_zone(
    State(state): State<AppState>,
    session: Session,
    Path((store_id, zone_id)): Path<(StoreId, ZoneId)>,
) -> Result<Json<ZoneToggledResponse>, AppError> {
    let mut editor = current_editor(&state, &session, store_id).await?;
    let enabled = editor
        .toggle(&zone_id)
        .ok_or_else(|| AppError::NotFound(format!("zone {zone_id}")))?;
    store_editor(&session, store_id, &editor).await?;

    Ok(Json(ZoneToggledResponse {
        zone_id,
        enabled,
        state: DeliveryStateResponse::new(&state, store_id, &editor),
    }))
}

/// PUT /api/stores/{store_id}/delivery/free-delivery
#[instrument(skip(state, session))]
async fn set_free_delivery(
    State(state): State<AppState>,
    session: Session,
    Path(store_id): Path<StoreId>,
    Json(request): Json<FreeDeliveryRequest>,
) -> Result<Json<DeliveryStateResponse>, AppError> {
    let mut editor = current_editor(&state, &session, store_id).await?;
    editor.set_free_delivery(request.enabled);
    store_editor(&session, store_id, &editor).await?;

    Ok(Json(DeliveryStateResponse::new(&state, store_id, &editor)))
}

/// Persist the session's configuration, replacing the stored record.
///
/// POST /api/stores/{store_id}/delivery/save
#[instrument(skip(state, session))]
async fn save(
    State(state): State<AppState>,
    session: Session,
    Path(store_id): Path<StoreId>,
) -> Result<Json<DeliveryStateResponse>, AppError> {
    let mut editor = current_editor(&state, &session, store_id).await?;

    // Session state is only touched after the write succeeds
    state.store().write(store_id, editor.configuration()).await?;
    editor.mark_saved();
    store_editor(&session, store_id, &editor).await?;

    info!(%store_id, zones = editor.zones().len(), "Saved delivery settings");
    Ok(Json(DeliveryStateResponse::new(&state, store_id, &editor)))
}

/// Drop unsaved edits and reload from storage.
///
/// POST /api/stores/{store_id}/delivery/discard
#[instrument(skip(state, session))]
async fn discard(
    State(state): State<AppState>,
    session: Session,
    Path(store_id): Path<StoreId>,
) -> Result<Json<DeliveryStateResponse>, AppError> {
    let editor = load_from_store(&state, store_id).await?;
    store_editor(&session, store_id, &editor).await?;

    Ok(Json(DeliveryStateResponse::new(&state, store_id, &editor)))
}
