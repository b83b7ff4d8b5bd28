//! HTTP route handlers for the dashboard.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                 - Health check (main.rs)
//! GET  /health/ready           - Readiness check (main.rs)
//!
//! # Merchant delivery editor (session-backed until save)
//! GET    /stores/{store_id}/delivery                       - Editor page
//! GET    /api/stores/{store_id}/delivery                   - Editor state
//! POST   /api/stores/{store_id}/delivery/zones             - Create or edit a zone
//! DELETE /api/stores/{store_id}/delivery/zones/{zone_id}   - Delete a zone
//! POST   /api/stores/{store_id}/delivery/zones/{zone_id}/toggle - Show/hide a zone
//! PUT    /api/stores/{store_id}/delivery/free-delivery     - Set free delivery
//! POST   /api/stores/{store_id}/delivery/save              - Persist edits
//! POST   /api/stores/{store_id}/delivery/discard           - Drop edits
//!
//! # Customer storefront
//! GET  /shop/{slug}/delivery               - Delivery options
//! GET  /shop/{slug}/delivery/quote?city=   - Delivery price for one city
//! ```

pub mod delivery;
pub mod storefront;

use axum::Router;

use crate::state::AppState;

/// Create all routes for the dashboard.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(delivery::router())
        .merge(storefront::router())
}
