//! Domain model for pin types, pins and their field values.
//!
//! # Responsibility
//! - Define canonical data structures used by core business logic.
//! - Keep schema shapes (pin type + fields) and instance shapes
//!   (pin + values) separate but id-linked.
//!
//! # Invariants
//! - Every record is identified by a stable SQLite rowid.
//! - Field values are exchanged and persisted as plain text; logical typing
//!   lives in the owning field's `FieldKind`.

pub mod pin;
pub mod pin_type;
