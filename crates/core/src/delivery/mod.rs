//! Delivery zone engine.
//!
//! A store's delivery settings are a list of [`DeliveryZone`]s plus a global
//! free-delivery flag. Older stores carry one of several legacy fee formats;
//! those are detected and migrated on first read.
//!
//! # Flow
//!
//! ```text
//! raw JSON ──► LegacyShape::detect ──► load_and_normalize ──► ZoneEditor
//!                                                               │
//!                      upsert_zone / delete_zone / toggle_zone ◄┘
//!                                                               │
//!                                   compute_unassigned ◄────────┘
//! ```
//!
//! Every function here is pure: it borrows a snapshot and returns a new value.
//! Persistence and session handling live in the dashboard crate.
//!
//! # Invariant
//!
//! Within one store a location belongs to at most one zone. [`upsert_zone`]
//! keeps this true by removing the edited zone's cities from every other zone.

pub mod assign;
pub mod catalog;
pub mod coverage;
pub mod editor;
pub mod legacy;
pub mod migrate;
pub mod quote;
pub mod zone;

pub use assign::{ZoneValidationError, delete_zone, toggle_zone, upsert_zone};
pub use catalog::{IRAQ_GOVERNORATES, LocationCatalog};
pub use coverage::{CoverageReport, compute_unassigned, overlapping_locations};
pub use editor::ZoneEditor;
pub use legacy::{LegacyShape, LocationFee};
pub use migrate::{LoadOutcome, LoadedConfiguration, load_and_normalize};
pub use quote::{DeliveryOption, QuoteError, delivery_options, quote};
pub use zone::{DeliveryConfiguration, DeliveryZone, ZoneDraft, ZoneId};
