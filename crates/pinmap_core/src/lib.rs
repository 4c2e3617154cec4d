//! Core domain logic for pinmap.
//! This crate is the single source of truth for business invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::pin::{
    FieldValueEntry, PinDetail, PinId, PinListItem, PinOverview, TypedValue, ValueError,
};
pub use model::pin_type::{
    FieldEdit, FieldId, FieldKind, FieldRecord, FieldSpec, PinTypeId, PinTypeRecord,
    PinTypeSummary, PinTypeUpdate, DEFAULT_COLOR, DEFAULT_STYLE,
};
pub use repo::pin_repo::{PinRepository, SqlitePinRepository};
pub use repo::pin_type_repo::{PinTypeRepository, SqlitePinTypeRepository};
pub use repo::{Missing, RepoError, RepoResult};
pub use service::pin_service::PinService;
pub use service::pin_type_service::PinTypeService;

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
