//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `pinmap_core` wiring end to
//!   end: open the database, seed the default pin type, list categories.
//! - Keep output deterministic for quick local sanity checks.

use pinmap_core::db::{ensure_default_pin_type, open_db};
use pinmap_core::{PinTypeRepository, SqlitePinTypeRepository};
use std::process::ExitCode;

const DEFAULT_DB_FILE: &str = "map_pins.db";

fn main() -> ExitCode {
    println!("pinmap_core ping={}", pinmap_core::ping());
    println!("pinmap_core version={}", pinmap_core::core_version());

    let db_path = std::env::var("PINMAP_DB").unwrap_or_else(|_| DEFAULT_DB_FILE.to_string());
    match run(&db_path) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("pinmap_cli error: {message}");
            ExitCode::FAILURE
        }
    }
}

fn run(db_path: &str) -> Result<(), String> {
    let mut conn = open_db(db_path).map_err(|err| err.to_string())?;

    let seeded = ensure_default_pin_type(&mut conn).map_err(|err| err.to_string())?;
    if seeded {
        println!("seeded pin type `Default`");
    }

    let repo = SqlitePinTypeRepository::new(&mut conn);
    let pin_types = repo.list_pin_types().map_err(|err| err.to_string())?;
    println!("db={db_path} pin_types={}", pin_types.len());
    for pin_type in pin_types {
        println!(
            "pin_type name={} color={} style={}",
            pin_type.name, pin_type.color, pin_type.style
        );
    }

    Ok(())
}
