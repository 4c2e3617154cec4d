//! Pin type schema model.
//!
//! # Responsibility
//! - Define the user-editable category shape: name, color, style and an
//!   ordered list of typed fields.
//! - Provide the input/read shapes exchanged with UI collaborators.
//!
//! # Invariants
//! - Field names are unique within one pin type.
//! - A field keeps its id across renames; values stay attached by id.

use serde::{Deserialize, Serialize};

/// Stable identifier of a pin type row.
pub type PinTypeId = i64;

/// Stable identifier of a field row.
pub type FieldId = i64;

/// Color applied to a pin type when the caller supplies none.
pub const DEFAULT_COLOR: &str = "36aedc";

/// Marker style applied to a pin type when the caller supplies none.
pub const DEFAULT_STYLE: &str = "add_location";

/// Logical type of one schema field.
///
/// Values are always persisted as text; this tag tells callers how to
/// interpret and edit them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    /// Free-form text.
    String,
    /// Signed integer, persisted in decimal notation.
    Integer,
    /// Calendar date, exchanged as `YYYY-MM-DD` text.
    Date,
}

impl FieldKind {
    /// Returns the `field_type` text stored for this kind.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Date => "date",
        }
    }

    /// Parses stored `field_type` text back into a kind.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "string" => Some(Self::String),
            "integer" => Some(Self::Integer),
            "date" => Some(Self::Date),
            _ => None,
        }
    }
}

/// Input shape for one field when creating a pin type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSpec {
    pub name: String,
    #[serde(rename = "field_type")]
    pub kind: FieldKind,
    pub is_required: bool,
}

impl FieldSpec {
    pub fn new(name: impl Into<String>, kind: FieldKind, is_required: bool) -> Self {
        Self {
            name: name.into(),
            kind,
            is_required,
        }
    }
}

/// One entry of the target field list passed to pin type updates.
///
/// An entry carrying the id of an existing field updates that field in
/// place; an entry without a recognized id creates a new field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldEdit {
    pub id: Option<FieldId>,
    pub name: String,
    #[serde(rename = "field_type")]
    pub kind: FieldKind,
    pub is_required: bool,
}

impl FieldEdit {
    /// Edit entry addressing an existing field by id.
    pub fn existing(id: FieldId, name: impl Into<String>, kind: FieldKind, is_required: bool) -> Self {
        Self {
            id: Some(id),
            name: name.into(),
            kind,
            is_required,
        }
    }

    /// Edit entry creating a new field.
    pub fn new_field(name: impl Into<String>, kind: FieldKind, is_required: bool) -> Self {
        Self {
            id: None,
            name: name.into(),
            kind,
            is_required,
        }
    }
}

/// Partial update for a pin type.
///
/// `None` members leave the corresponding attribute untouched; a `None`
/// field list leaves the schema untouched, while `Some(list)` replaces the
/// schema with the list via reconciliation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PinTypeUpdate {
    pub name: Option<String>,
    pub color: Option<String>,
    pub style: Option<String>,
    pub fields: Option<Vec<FieldEdit>>,
}

/// Read model for one persisted field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldRecord {
    pub id: FieldId,
    pub name: String,
    #[serde(rename = "field_type")]
    pub kind: FieldKind,
    pub is_required: bool,
}

/// Listing shape for pin types (no schema attached).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PinTypeSummary {
    pub name: String,
    pub color: String,
    pub style: String,
}

/// Full read model for one pin type including its schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PinTypeRecord {
    pub id: PinTypeId,
    pub name: String,
    pub color: String,
    pub style: String,
    pub fields: Vec<FieldRecord>,
}

impl PinTypeRecord {
    /// Looks up one field of this pin type by name.
    pub fn field(&self, name: &str) -> Option<&FieldRecord> {
        self.fields.iter().find(|field| field.name == name)
    }
}
