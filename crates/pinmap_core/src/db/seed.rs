//! Default pin type seeding.
//!
//! # Responsibility
//! - Give a fresh database one usable pin category out of the box.
//!
//! # Invariants
//! - Seeding only happens while no pin types exist at all; a database the
//!   user has shaped (including deleting "Default") is left alone.

use super::DbResult;
use crate::model::pin_type::{DEFAULT_COLOR, DEFAULT_STYLE};
use log::info;
use rusqlite::{params, Connection};

/// Seeds the "Default" pin type (required `Name` string + `Date` date
/// fields) when the database has no pin types yet.
///
/// Returns `true` when the seed row was created by this call.
pub fn ensure_default_pin_type(conn: &mut Connection) -> DbResult<bool> {
    let tx = conn.transaction()?;

    let pin_type_count: i64 =
        tx.query_row("SELECT COUNT(*) FROM pin_types;", [], |row| row.get(0))?;
    if pin_type_count > 0 {
        return Ok(false);
    }

    tx.execute(
        "INSERT INTO pin_types (name, color, style) VALUES (?1, ?2, ?3);",
        params!["Default", DEFAULT_COLOR, DEFAULT_STYLE],
    )?;
    let pin_type_id = tx.last_insert_rowid();

    for (name, field_type) in [("Name", "string"), ("Date", "date")] {
        tx.execute(
            "INSERT INTO fields (pin_type_id, name, field_type, is_required)
             VALUES (?1, ?2, ?3, 1);",
            params![pin_type_id, name, field_type],
        )?;
    }

    tx.commit()?;
    info!("event=db_seed module=db status=ok pin_type=Default");
    Ok(true)
}
