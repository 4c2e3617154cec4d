//! Pin type use-case service.
//!
//! # Responsibility
//! - Provide stable schema-editing entry points for UI collaborators.
//! - Delegate persistence to repository implementations.
//!
//! # Invariants
//! - Service APIs never bypass repository validation/persistence contracts.
//! - Service layer remains storage-agnostic.

use crate::model::pin_type::{
    FieldSpec, PinTypeId, PinTypeRecord, PinTypeSummary, PinTypeUpdate,
};
use crate::repo::pin_type_repo::PinTypeRepository;
use crate::repo::RepoResult;

/// Use-case service wrapper for pin type schema operations.
pub struct PinTypeService<R: PinTypeRepository> {
    repo: R,
}

impl<R: PinTypeRepository> PinTypeService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates a pin type with default color/style when none are given.
    pub fn create_pin_type(
        &mut self,
        name: &str,
        fields: &[FieldSpec],
        color: Option<&str>,
        style: Option<&str>,
    ) -> RepoResult<PinTypeRecord> {
        self.repo.create_pin_type(name, fields, color, style)
    }

    /// Lists all pin types for category pickers.
    pub fn get_all_pin_types(&self) -> RepoResult<Vec<PinTypeSummary>> {
        self.repo.list_pin_types()
    }

    /// Gets one pin type with its schema for edit dialogs.
    pub fn get_pin_type_by_name(&self, name: &str) -> RepoResult<PinTypeRecord> {
        self.repo.get_pin_type_by_name(name)
    }

    /// Applies a partial update; a supplied field list replaces the schema
    /// via reconciliation.
    pub fn update_pin_type(
        &mut self,
        id: PinTypeId,
        update: &PinTypeUpdate,
    ) -> RepoResult<PinTypeRecord> {
        self.repo.update_pin_type(id, update)
    }

    /// Deletes a pin type and every pin placed under it.
    pub fn delete_pin_type_and_pins(&mut self, name: &str) -> RepoResult<()> {
        self.repo.delete_pin_type_and_pins(name)
    }
}
