//! Editing-session state for a store's delivery settings.
//!
//! A [`ZoneEditor`] is owned by whoever holds the merchant's session (the
//! dashboard keeps it in the server-side session). It is serializable so it
//! can live there between requests. Edits touch only this value; nothing is
//! persisted until the owner saves [`ZoneEditor::configuration`].

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::assign::{ZoneValidationError, delete_zone, toggle_zone, upsert_zone};
use super::catalog::LocationCatalog;
use super::coverage::{CoverageReport, compute_unassigned};
use super::migrate::{LoadOutcome, load_and_normalize};
use super::zone::{DeliveryConfiguration, DeliveryZone, ZoneDraft, ZoneId};

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ZoneEditor {
    configuration: DeliveryConfiguration,
    /// Holds changes that have not been saved.
    dirty: bool,
}

impl ZoneEditor {
    /// Start a session from the stored value.
    ///
    /// A migrated legacy value starts dirty so that the first save persists
    /// the normalized form.
    #[must_use]
    pub fn load(raw: Option<&Value>, catalog: &LocationCatalog) -> (Self, LoadOutcome) {
        let loaded = load_and_normalize(raw, catalog);
        let editor = Self {
            configuration: loaded.configuration,
            dirty: loaded.outcome.needs_write_back(),
        };
        (editor, loaded.outcome)
    }

    #[must_use]
    pub const fn from_configuration(configuration: DeliveryConfiguration) -> Self {
        Self {
            configuration,
            dirty: false,
        }
    }

    #[must_use]
    pub const fn configuration(&self) -> &DeliveryConfiguration {
        &self.configuration
    }

    #[must_use]
    pub fn zones(&self) -> &[DeliveryZone] {
        &self.configuration.zones
    }

    #[must_use]
    pub const fn is_free_delivery(&self) -> bool {
        self.configuration.is_free_delivery
    }

    #[must_use]
    pub const fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Create or edit a zone. Returns the id of the affected zone.
    ///
    /// # Errors
    ///
    /// Returns `ZoneValidationError` if the draft is invalid or names a city
    /// outside `catalog`. The editor is unchanged in that case.
    pub fn upsert(
        &mut self,
        mut draft: ZoneDraft,
        catalog: &LocationCatalog,
    ) -> Result<ZoneId, ZoneValidationError> {
        if let Some(unknown) = draft
            .cities
            .iter()
            .find(|city| !catalog.contains(city.trim()))
        {
            return Err(ZoneValidationError::UnknownLocation(unknown.clone()));
        }

        let id = draft.id.get_or_insert_with(ZoneId::generate).clone();
        self.configuration.zones = upsert_zone(&self.configuration.zones, draft)?;
        self.dirty = true;
        Ok(id)
    }

    /// Remove a zone. Returns `false` if no zone has that id.
    pub fn delete(&mut self, id: &ZoneId) -> bool {
        if self.configuration.zone(id).is_none() {
            return false;
        }
        self.configuration.zones = delete_zone(&self.configuration.zones, id);
        self.dirty = true;
        true
    }

    /// Flip a zone's visibility. Returns the new state, or `None` for an unknown id.
    pub fn toggle(&mut self, id: &ZoneId) -> Option<bool> {
        self.configuration.zone(id)?;
        self.configuration.zones = toggle_zone(&self.configuration.zones, id);
        self.dirty = true;
        self.configuration.zone(id).map(|zone| zone.enabled)
    }

    pub fn set_free_delivery(&mut self, enabled: bool) {
        if self.configuration.is_free_delivery != enabled {
            self.configuration.is_free_delivery = enabled;
            self.dirty = true;
        }
    }

    #[must_use]
    pub fn unassigned(&self, catalog: &LocationCatalog) -> Vec<String> {
        compute_unassigned(&self.configuration.zones, catalog.locations())
    }

    #[must_use]
    pub fn coverage(&self, catalog: &LocationCatalog) -> CoverageReport {
        CoverageReport::build(&self.configuration.zones, catalog)
    }

    /// Record that the current configuration has been persisted.
    pub const fn mark_saved(&mut self) {
        self.dirty = false;
    }
}
