// ==========================================
// Shipment Import - SQLite connection setup
// ==========================================
// Goals:
// - every Connection::open gets the same PRAGMA behaviour
// - a shared busy_timeout so concurrent writers rarely see SQLITE_BUSY
// ==========================================

use rusqlite::Connection;
use std::path::PathBuf;
use std::time::Duration;

/// Default busy_timeout (milliseconds)
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// Environment variable that overrides the database location
pub const DB_PATH_ENV: &str = "SHIPMENT_IMPORT_DB_PATH";

/// Apply the shared PRAGMA set
///
/// foreign_keys and busy_timeout are per-connection settings.
pub fn configure_sqlite_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS))?;
    Ok(())
}

/// Open a SQLite connection with the shared configuration
pub fn open_sqlite_connection(db_path: &str) -> rusqlite::Result<Connection> {
    let conn = Connection::open(db_path)?;
    configure_sqlite_connection(&conn)?;
    Ok(conn)
}

/// Default database path
///
/// Order: `SHIPMENT_IMPORT_DB_PATH`, then the user data directory, then `./shipment_import.db`.
pub fn get_default_db_path() -> String {
    if let Ok(path) = std::env::var(DB_PATH_ENV) {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    let mut path = PathBuf::from("./shipment_import.db");

    if let Some(data_dir) = dirs::data_dir() {
        let app_dir = data_dir.join("shipment-import");
        if std::fs::create_dir_all(&app_dir).is_ok() {
            path = app_dir.join("shipment_import.db");
        }
    }

    path.to_string_lossy().to_string()
}
