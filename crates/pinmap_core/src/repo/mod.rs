//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts for pin types and pins.
//! - Isolate SQLite query details from service/business orchestration.
//!
//! # Invariants
//! - Repository writes validate every precondition (existence, name
//!   uniqueness, value typing) before mutating storage; a failed validation
//!   rolls back the enclosing transaction, so no partial mutation commits.
//! - Repository APIs return semantic errors (`NotFound`, duplicate kinds)
//!   in addition to DB transport errors.

use crate::db::DbError;
use crate::model::pin::{PinId, ValueError};
use crate::model::pin_type::{FieldId, PinTypeId};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod pin_repo;
pub mod pin_type_repo;

pub type RepoResult<T> = Result<T, RepoError>;

/// The entity a lookup failed to resolve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Missing {
    PinTypeName(String),
    PinTypeId(PinTypeId),
    PinId(PinId),
    /// A field name that does not belong to the addressed pin type.
    Field { pin_type: String, field: String },
}

impl Display for Missing {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PinTypeName(name) => write!(f, "pin type `{name}` does not exist"),
            Self::PinTypeId(id) => write!(f, "pin type with id {id} does not exist"),
            Self::PinId(id) => write!(f, "pin with id {id} does not exist"),
            Self::Field { pin_type, field } => {
                write!(f, "field `{field}` does not exist for pin type `{pin_type}`")
            }
        }
    }
}

/// Generic repository error for pin persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    /// A pin type with the requested name already exists.
    DuplicatePinType(String),
    /// Two fields of one pin type would share a name.
    DuplicateField { pin_type: String, field: String },
    NotFound(Missing),
    /// A supplied value does not parse under the field's declared kind.
    Value { field: String, source: ValueError },
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::DuplicatePinType(name) => write!(f, "pin type `{name}` already exists"),
            Self::DuplicateField { pin_type, field } => {
                write!(f, "pin type `{pin_type}` already has a field named `{field}`")
            }
            Self::NotFound(missing) => write!(f, "{missing}"),
            Self::Value { field, source } => {
                write!(f, "invalid value for field `{field}`: {source}")
            }
            Self::InvalidData(message) => write!(f, "invalid persisted pin data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Value { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

pub(crate) fn missing_field(pin_type: &str, field: &str) -> RepoError {
    RepoError::NotFound(Missing::Field {
        pin_type: pin_type.to_string(),
        field: field.to_string(),
    })
}

pub(crate) fn parse_field_kind(
    id: FieldId,
    kind_text: &str,
) -> RepoResult<crate::model::pin_type::FieldKind> {
    crate::model::pin_type::FieldKind::parse(kind_text).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "invalid field_type `{kind_text}` for field {id} in fields.field_type"
        ))
    })
}
