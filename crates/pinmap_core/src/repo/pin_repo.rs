//! Pin repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Own the instance side of the data model: placed pins and their field
//!   values.
//! - Resolve caller-supplied field names against the owning pin type's
//!   schema on every write.
//!
//! # Invariants
//! - A pin only persists when every supplied field name resolved and every
//!   value parsed under its field's kind; add/update run in one transaction.
//! - At most one field value exists per (pin, field); updates overwrite in
//!   place.
//! - Deleting a pin removes its field values in the same transaction.

use crate::model::pin::{FieldValueEntry, PinDetail, PinId, PinListItem, PinOverview, TypedValue};
use crate::model::pin_type::{FieldId, FieldKind, PinTypeId};
use crate::repo::{missing_field, parse_field_kind, Missing, RepoError, RepoResult};
use rusqlite::{params, Connection, OptionalExtension, TransactionBehavior};
use std::collections::BTreeMap;

/// Repository interface for pin CRUD operations.
pub trait PinRepository {
    /// Places a pin of the named type with the supplied field values.
    fn add_pin(
        &mut self,
        pin_type_name: &str,
        latitude: f64,
        longitude: f64,
        values: &BTreeMap<String, String>,
    ) -> RepoResult<PinDetail>;
    /// Gets one pin with typed field values and pin type presentation data.
    fn get_pin(&self, id: PinId) -> RepoResult<PinDetail>;
    /// Lists all pins of one pin type with flattened field values.
    fn list_pins(&self, pin_type_name: &str) -> RepoResult<Vec<PinListItem>>;
    /// Lists every pin across all pin types, annotated with color/style.
    fn list_all_pins(&self) -> RepoResult<Vec<PinOverview>>;
    /// Upserts one field value per supplied entry on an existing pin.
    fn update_pin(&mut self, id: PinId, values: &BTreeMap<String, String>)
        -> RepoResult<PinDetail>;
    /// Deletes a pin and its field values.
    fn delete_pin(&mut self, id: PinId) -> RepoResult<()>;
}

/// SQLite-backed pin repository.
pub struct SqlitePinRepository<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> SqlitePinRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn new(conn: &'conn mut Connection) -> Self {
        Self { conn }
    }
}

impl PinRepository for SqlitePinRepository<'_> {
    fn add_pin(
        &mut self,
        pin_type_name: &str,
        latitude: f64,
        longitude: f64,
        values: &BTreeMap<String, String>,
    ) -> RepoResult<PinDetail> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        let Some(pin_type) = pin_type_by_name(&tx, pin_type_name)? else {
            return Err(RepoError::NotFound(Missing::PinTypeName(
                pin_type_name.to_string(),
            )));
        };

        tx.execute(
            "INSERT INTO pins (pin_type_id, latitude, longitude) VALUES (?1, ?2, ?3);",
            params![pin_type.id, latitude, longitude],
        )?;
        let pin_id = tx.last_insert_rowid();

        for (field_name, raw) in values {
            let (field_id, value) =
                checked_value(&tx, &pin_type, field_name, raw)?;
            tx.execute(
                "INSERT INTO field_values (pin_id, field_id, value) VALUES (?1, ?2, ?3);",
                params![pin_id, field_id, value.into_text()],
            )?;
        }

        let detail =
            load_pin_detail(&tx, pin_id)?.ok_or(RepoError::NotFound(Missing::PinId(pin_id)))?;
        tx.commit()?;
        Ok(detail)
    }

    fn get_pin(&self, id: PinId) -> RepoResult<PinDetail> {
        load_pin_detail(self.conn, id)?.ok_or(RepoError::NotFound(Missing::PinId(id)))
    }

    fn list_pins(&self, pin_type_name: &str) -> RepoResult<Vec<PinListItem>> {
        let Some(pin_type) = pin_type_by_name(self.conn, pin_type_name)? else {
            return Err(RepoError::NotFound(Missing::PinTypeName(
                pin_type_name.to_string(),
            )));
        };

        let mut stmt = self.conn.prepare(
            "SELECT id, latitude, longitude
             FROM pins
             WHERE pin_type_id = ?1
             ORDER BY id ASC;",
        )?;
        let mut rows = stmt.query([pin_type.id])?;
        let mut pins = Vec::new();
        while let Some(row) = rows.next()? {
            let id: PinId = row.get("id")?;
            pins.push(PinListItem {
                id,
                latitude: row.get("latitude")?,
                longitude: row.get("longitude")?,
                fields: load_value_texts(self.conn, id)?,
            });
        }
        Ok(pins)
    }

    fn list_all_pins(&self) -> RepoResult<Vec<PinOverview>> {
        let mut stmt = self.conn.prepare(
            "SELECT p.id, p.latitude, p.longitude, t.name, t.color, t.style
             FROM pins p
             INNER JOIN pin_types t ON t.id = p.pin_type_id
             ORDER BY p.id ASC;",
        )?;
        let mut rows = stmt.query([])?;
        let mut pins = Vec::new();
        while let Some(row) = rows.next()? {
            let id: PinId = row.get(0)?;
            pins.push(PinOverview {
                id,
                pin_type: row.get(3)?,
                latitude: row.get(1)?,
                longitude: row.get(2)?,
                color: row.get(4)?,
                style: row.get(5)?,
                fields: load_value_texts(self.conn, id)?,
            });
        }
        Ok(pins)
    }

    fn update_pin(
        &mut self,
        id: PinId,
        values: &BTreeMap<String, String>,
    ) -> RepoResult<PinDetail> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        let Some(pin_type) = pin_type_of_pin(&tx, id)? else {
            return Err(RepoError::NotFound(Missing::PinId(id)));
        };

        for (field_name, raw) in values {
            let (field_id, value) = checked_value(&tx, &pin_type, field_name, raw)?;
            tx.execute(
                "INSERT INTO field_values (pin_id, field_id, value)
                 VALUES (?1, ?2, ?3)
                 ON CONFLICT (pin_id, field_id) DO UPDATE SET value = excluded.value;",
                params![id, field_id, value.into_text()],
            )?;
        }

        let detail = load_pin_detail(&tx, id)?.ok_or(RepoError::NotFound(Missing::PinId(id)))?;
        tx.commit()?;
        Ok(detail)
    }

    fn delete_pin(&mut self, id: PinId) -> RepoResult<()> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        tx.execute("DELETE FROM field_values WHERE pin_id = ?1;", [id])?;
        let changed = tx.execute("DELETE FROM pins WHERE id = ?1;", [id])?;
        if changed == 0 {
            return Err(RepoError::NotFound(Missing::PinId(id)));
        }

        tx.commit()?;
        Ok(())
    }
}

/// Pin type header row resolved for pin operations.
struct PinTypeRow {
    id: PinTypeId,
    name: String,
}

fn pin_type_by_name(conn: &Connection, name: &str) -> RepoResult<Option<PinTypeRow>> {
    let row = conn
        .query_row(
            "SELECT id, name FROM pin_types WHERE name = ?1;",
            [name],
            |row| {
                Ok(PinTypeRow {
                    id: row.get(0)?,
                    name: row.get(1)?,
                })
            },
        )
        .optional()?;
    Ok(row)
}

fn pin_type_of_pin(conn: &Connection, pin_id: PinId) -> RepoResult<Option<PinTypeRow>> {
    let row = conn
        .query_row(
            "SELECT t.id, t.name
             FROM pins p
             INNER JOIN pin_types t ON t.id = p.pin_type_id
             WHERE p.id = ?1;",
            [pin_id],
            |row| {
                Ok(PinTypeRow {
                    id: row.get(0)?,
                    name: row.get(1)?,
                })
            },
        )
        .optional()?;
    Ok(row)
}

/// Resolves a caller-supplied field name and validates its raw value.
fn checked_value(
    conn: &Connection,
    pin_type: &PinTypeRow,
    field_name: &str,
    raw: &str,
) -> RepoResult<(FieldId, TypedValue)> {
    let field: Option<(FieldId, String)> = conn
        .query_row(
            "SELECT id, field_type FROM fields WHERE pin_type_id = ?1 AND name = ?2;",
            params![pin_type.id, field_name],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .optional()?;

    let Some((field_id, kind_text)) = field else {
        return Err(missing_field(&pin_type.name, field_name));
    };
    let kind = parse_field_kind(field_id, &kind_text)?;

    let value = TypedValue::parse(kind, raw).map_err(|source| RepoError::Value {
        field: field_name.to_string(),
        source,
    })?;
    Ok((field_id, value))
}

fn load_value_entries(
    conn: &Connection,
    pin_id: PinId,
) -> RepoResult<BTreeMap<String, FieldValueEntry>> {
    let mut stmt = conn.prepare(
        "SELECT f.id, f.name, f.field_type, v.value
         FROM field_values v
         INNER JOIN fields f ON f.id = v.field_id
         WHERE v.pin_id = ?1
         ORDER BY f.id ASC;",
    )?;
    let mut rows = stmt.query([pin_id])?;
    let mut entries = BTreeMap::new();
    while let Some(row) = rows.next()? {
        let field_id: FieldId = row.get(0)?;
        let kind_text: String = row.get(2)?;
        let kind: FieldKind = parse_field_kind(field_id, &kind_text)?;
        entries.insert(
            row.get::<_, String>(1)?,
            FieldValueEntry {
                value: row.get(3)?,
                kind,
            },
        );
    }
    Ok(entries)
}

fn load_value_texts(conn: &Connection, pin_id: PinId) -> RepoResult<BTreeMap<String, String>> {
    let mut stmt = conn.prepare(
        "SELECT f.name, v.value
         FROM field_values v
         INNER JOIN fields f ON f.id = v.field_id
         WHERE v.pin_id = ?1
         ORDER BY f.id ASC;",
    )?;
    let mut rows = stmt.query([pin_id])?;
    let mut values = BTreeMap::new();
    while let Some(row) = rows.next()? {
        values.insert(row.get::<_, String>(0)?, row.get::<_, String>(1)?);
    }
    Ok(values)
}

pub(crate) fn load_pin_detail(conn: &Connection, pin_id: PinId) -> RepoResult<Option<PinDetail>> {
    let header: Option<(f64, f64, String, String, String)> = conn
        .query_row(
            "SELECT p.latitude, p.longitude, t.name, t.color, t.style
             FROM pins p
             INNER JOIN pin_types t ON t.id = p.pin_type_id
             WHERE p.id = ?1;",
            [pin_id],
            |row| {
                Ok((
                    row.get(0)?,
                    row.get(1)?,
                    row.get(2)?,
                    row.get(3)?,
                    row.get(4)?,
                ))
            },
        )
        .optional()?;

    let Some((latitude, longitude, pin_type, color, style)) = header else {
        return Ok(None);
    };

    Ok(Some(PinDetail {
        id: pin_id,
        latitude,
        longitude,
        pin_type,
        color,
        style,
        fields: load_value_entries(conn, pin_id)?,
    }))
}
