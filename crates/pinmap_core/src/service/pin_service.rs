//! Pin use-case service.
//!
//! # Responsibility
//! - Provide stable pin CRUD entry points for UI collaborators.
//! - Delegate persistence to repository implementations.

use crate::model::pin::{PinDetail, PinId, PinListItem, PinOverview};
use crate::repo::pin_repo::PinRepository;
use crate::repo::RepoResult;
use std::collections::BTreeMap;

/// Use-case service wrapper for pin CRUD operations.
pub struct PinService<R: PinRepository> {
    repo: R,
}

impl<R: PinRepository> PinService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Places a marker of the named pin type.
    pub fn add_pin(
        &mut self,
        pin_type_name: &str,
        latitude: f64,
        longitude: f64,
        values: &BTreeMap<String, String>,
    ) -> RepoResult<PinDetail> {
        self.repo.add_pin(pin_type_name, latitude, longitude, values)
    }

    /// Gets one pin for detail/edit views.
    pub fn get_pin_by_id(&self, id: PinId) -> RepoResult<PinDetail> {
        self.repo.get_pin(id)
    }

    /// Lists pins of one pin type.
    pub fn get_pins(&self, pin_type_name: &str) -> RepoResult<Vec<PinListItem>> {
        self.repo.list_pins(pin_type_name)
    }

    /// Lists every pin with its rendering annotations.
    pub fn get_all_pins(&self) -> RepoResult<Vec<PinOverview>> {
        self.repo.list_all_pins()
    }

    /// Upserts field values on an existing pin.
    pub fn update_pin(
        &mut self,
        id: PinId,
        values: &BTreeMap<String, String>,
    ) -> RepoResult<PinDetail> {
        self.repo.update_pin(id, values)
    }

    /// Deletes a pin and its field values.
    pub fn delete_pin(&mut self, id: PinId) -> RepoResult<()> {
        self.repo.delete_pin(id)
    }
}
