//! Pin type repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Own the schema side of the data model: pin types and their fields.
//! - Implement declarative field-list reconciliation for pin type edits.
//!
//! # Invariants
//! - Pin type names are globally unique; field names are unique within one
//!   pin type. Both are checked before any write.
//! - Deleting a pin type removes its pins, their field values and its
//!   fields inside one transaction; no orphan rows survive.
//! - Reconciliation updates fields in place by id, so field values stay
//!   attached across renames and type changes.

use crate::model::pin_type::{
    FieldEdit, FieldRecord, FieldSpec, PinTypeId, PinTypeRecord, PinTypeSummary, PinTypeUpdate,
    DEFAULT_COLOR, DEFAULT_STYLE,
};
use crate::repo::{parse_field_kind, Missing, RepoError, RepoResult};
use rusqlite::{params, Connection, OptionalExtension, TransactionBehavior};
use std::collections::{BTreeMap, BTreeSet};

/// Repository interface for pin type schema operations.
pub trait PinTypeRepository {
    /// Creates a pin type with the supplied field list.
    fn create_pin_type(
        &mut self,
        name: &str,
        fields: &[FieldSpec],
        color: Option<&str>,
        style: Option<&str>,
    ) -> RepoResult<PinTypeRecord>;
    /// Lists all pin types without their schemas. Never fails on empty.
    fn list_pin_types(&self) -> RepoResult<Vec<PinTypeSummary>>;
    /// Gets one pin type with its full field list.
    fn get_pin_type_by_name(&self, name: &str) -> RepoResult<PinTypeRecord>;
    /// Applies a partial update, reconciling the field list when supplied.
    fn update_pin_type(&mut self, id: PinTypeId, update: &PinTypeUpdate)
        -> RepoResult<PinTypeRecord>;
    /// Deletes a pin type together with every pin of that type.
    fn delete_pin_type_and_pins(&mut self, name: &str) -> RepoResult<()>;
}

/// SQLite-backed pin type repository.
pub struct SqlitePinTypeRepository<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> SqlitePinTypeRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn new(conn: &'conn mut Connection) -> Self {
        Self { conn }
    }
}

impl PinTypeRepository for SqlitePinTypeRepository<'_> {
    fn create_pin_type(
        &mut self,
        name: &str,
        fields: &[FieldSpec],
        color: Option<&str>,
        style: Option<&str>,
    ) -> RepoResult<PinTypeRecord> {
        ensure_unique_field_names(name, fields.iter().map(|spec| spec.name.as_str()))?;

        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        if pin_type_name_taken(&tx, name, None)? {
            return Err(RepoError::DuplicatePinType(name.to_string()));
        }

        tx.execute(
            "INSERT INTO pin_types (name, color, style) VALUES (?1, ?2, ?3);",
            params![
                name,
                color.unwrap_or(DEFAULT_COLOR),
                style.unwrap_or(DEFAULT_STYLE)
            ],
        )?;
        let pin_type_id = tx.last_insert_rowid();

        for spec in fields {
            tx.execute(
                "INSERT INTO fields (pin_type_id, name, field_type, is_required)
                 VALUES (?1, ?2, ?3, ?4);",
                params![
                    pin_type_id,
                    spec.name.as_str(),
                    spec.kind.as_str(),
                    i64::from(spec.is_required)
                ],
            )?;
        }

        let record = load_pin_type(&tx, pin_type_id)?
            .ok_or(RepoError::NotFound(Missing::PinTypeId(pin_type_id)))?;
        tx.commit()?;
        Ok(record)
    }

    fn list_pin_types(&self) -> RepoResult<Vec<PinTypeSummary>> {
        let mut stmt = self
            .conn
            .prepare("SELECT name, color, style FROM pin_types ORDER BY id ASC;")?;
        let mut rows = stmt.query([])?;
        let mut summaries = Vec::new();
        while let Some(row) = rows.next()? {
            summaries.push(PinTypeSummary {
                name: row.get("name")?,
                color: row.get("color")?,
                style: row.get("style")?,
            });
        }
        Ok(summaries)
    }

    fn get_pin_type_by_name(&self, name: &str) -> RepoResult<PinTypeRecord> {
        let id: Option<PinTypeId> = self
            .conn
            .query_row(
                "SELECT id FROM pin_types WHERE name = ?1;",
                [name],
                |row| row.get(0),
            )
            .optional()?;

        let Some(id) = id else {
            return Err(RepoError::NotFound(Missing::PinTypeName(name.to_string())));
        };

        load_pin_type(self.conn, id)?.ok_or(RepoError::NotFound(Missing::PinTypeId(id)))
    }

    fn update_pin_type(
        &mut self,
        id: PinTypeId,
        update: &PinTypeUpdate,
    ) -> RepoResult<PinTypeRecord> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        let current: Option<(String, String, String)> = tx
            .query_row(
                "SELECT name, color, style FROM pin_types WHERE id = ?1;",
                [id],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
            )
            .optional()?;
        let Some((current_name, current_color, current_style)) = current else {
            return Err(RepoError::NotFound(Missing::PinTypeId(id)));
        };

        let name = update.name.as_deref().unwrap_or(current_name.as_str());
        if name != current_name && pin_type_name_taken(&tx, name, Some(id))? {
            return Err(RepoError::DuplicatePinType(name.to_string()));
        }

        tx.execute(
            "UPDATE pin_types SET name = ?1, color = ?2, style = ?3 WHERE id = ?4;",
            params![
                name,
                update.color.as_deref().unwrap_or(current_color.as_str()),
                update.style.as_deref().unwrap_or(current_style.as_str()),
                id
            ],
        )?;

        if let Some(edits) = update.fields.as_deref() {
            reconcile_fields(&tx, id, name, edits)?;
        }

        let record = load_pin_type(&tx, id)?.ok_or(RepoError::NotFound(Missing::PinTypeId(id)))?;
        tx.commit()?;
        Ok(record)
    }

    fn delete_pin_type_and_pins(&mut self, name: &str) -> RepoResult<()> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        let id: Option<PinTypeId> = tx
            .query_row(
                "SELECT id FROM pin_types WHERE name = ?1;",
                [name],
                |row| row.get(0),
            )
            .optional()?;
        let Some(id) = id else {
            return Err(RepoError::NotFound(Missing::PinTypeName(name.to_string())));
        };

        // Explicit dependent-first deletes; the schema cascades are a
        // structural backstop, not the mechanism.
        tx.execute(
            "DELETE FROM field_values
             WHERE pin_id IN (SELECT id FROM pins WHERE pin_type_id = ?1);",
            [id],
        )?;
        tx.execute("DELETE FROM pins WHERE pin_type_id = ?1;", [id])?;
        tx.execute("DELETE FROM fields WHERE pin_type_id = ?1;", [id])?;
        tx.execute("DELETE FROM pin_types WHERE id = ?1;", [id])?;

        tx.commit()?;
        Ok(())
    }
}

/// Replaces a pin type's field set with the target list.
///
/// Entries carrying the id of an existing field of this pin type are
/// updated in place; entries with no id (or an unrecognized one) become new
/// fields; existing fields absent from the list are deleted along with
/// their values.
fn reconcile_fields(
    conn: &Connection,
    pin_type_id: PinTypeId,
    pin_type_name: &str,
    edits: &[FieldEdit],
) -> RepoResult<()> {
    ensure_unique_field_names(pin_type_name, edits.iter().map(|edit| edit.name.as_str()))?;

    let existing: BTreeMap<i64, FieldRecord> = load_fields(conn, pin_type_id)?
        .into_iter()
        .map(|field| (field.id, field))
        .collect();

    let mut kept = BTreeSet::new();
    for edit in edits {
        match edit.id {
            Some(field_id) if existing.contains_key(&field_id) => {
                conn.execute(
                    "UPDATE fields SET name = ?1, field_type = ?2, is_required = ?3
                     WHERE id = ?4;",
                    params![
                        edit.name.as_str(),
                        edit.kind.as_str(),
                        i64::from(edit.is_required),
                        field_id
                    ],
                )?;
                kept.insert(field_id);
            }
            _ => {
                conn.execute(
                    "INSERT INTO fields (pin_type_id, name, field_type, is_required)
                     VALUES (?1, ?2, ?3, ?4);",
                    params![
                        pin_type_id,
                        edit.name.as_str(),
                        edit.kind.as_str(),
                        i64::from(edit.is_required)
                    ],
                )?;
            }
        }
    }

    for field_id in existing.keys().filter(|field_id| !kept.contains(field_id)) {
        conn.execute("DELETE FROM field_values WHERE field_id = ?1;", [field_id])?;
        conn.execute("DELETE FROM fields WHERE id = ?1;", [field_id])?;
    }

    Ok(())
}

fn ensure_unique_field_names<'a>(
    pin_type: &str,
    names: impl Iterator<Item = &'a str>,
) -> RepoResult<()> {
    let mut seen = BTreeSet::new();
    for name in names {
        if !seen.insert(name) {
            return Err(RepoError::DuplicateField {
                pin_type: pin_type.to_string(),
                field: name.to_string(),
            });
        }
    }
    Ok(())
}

fn pin_type_name_taken(
    conn: &Connection,
    name: &str,
    exclude: Option<PinTypeId>,
) -> RepoResult<bool> {
    let taken: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1 FROM pin_types WHERE name = ?1 AND id <> ?2
        );",
        params![name, exclude.unwrap_or(-1)],
        |row| row.get(0),
    )?;
    Ok(taken == 1)
}

pub(crate) fn load_fields(conn: &Connection, pin_type_id: PinTypeId) -> RepoResult<Vec<FieldRecord>> {
    let mut stmt = conn.prepare(
        "SELECT id, name, field_type, is_required
         FROM fields
         WHERE pin_type_id = ?1
         ORDER BY id ASC;",
    )?;
    let mut rows = stmt.query([pin_type_id])?;
    let mut fields = Vec::new();
    while let Some(row) = rows.next()? {
        let id: i64 = row.get("id")?;
        let kind_text: String = row.get("field_type")?;
        fields.push(FieldRecord {
            id,
            name: row.get("name")?,
            kind: parse_field_kind(id, &kind_text)?,
            is_required: row.get::<_, i64>("is_required")? != 0,
        });
    }
    Ok(fields)
}

pub(crate) fn load_pin_type(
    conn: &Connection,
    id: PinTypeId,
) -> RepoResult<Option<PinTypeRecord>> {
    let header: Option<(String, String, String)> = conn
        .query_row(
            "SELECT name, color, style FROM pin_types WHERE id = ?1;",
            [id],
            |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
        )
        .optional()?;

    let Some((name, color, style)) = header else {
        return Ok(None);
    };

    Ok(Some(PinTypeRecord {
        id,
        name,
        color,
        style,
        fields: load_fields(conn, id)?,
    }))
}
