// ==========================================
// Shipment Import - Config Manager
// ==========================================
// Responsibility: load, query and override import settings
// Storage: config_kv table (scope_id + key -> value)
// ==========================================

use crate::config::import_config_trait::ImportConfigReader;
use crate::db::open_sqlite_connection;
use crate::repository::{RepositoryError, RepositoryResult};
use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};
use std::sync::{Arc, Mutex};

const GLOBAL_SCOPE: &str = "global";

/// Config keys
pub mod config_keys {
    pub const MAX_FILE_SIZE_BYTES: &str = "import.max_file_size_bytes";
    pub const ALLOWED_EXTENSIONS: &str = "import.allowed_extensions";
    pub const TRACKING_PREFIX: &str = "import.tracking_prefix";
    pub const SHIPMENT_TABLE: &str = "import.shipment_table";
    pub const MESSAGE_LOCALE: &str = "import.message_locale";
}

/// Defaults for every key
pub mod defaults {
    pub const MAX_FILE_SIZE_BYTES: u64 = 10 * 1024 * 1024;
    pub const ALLOWED_EXTENSIONS: &str = "xlsx,xls,csv";
    pub const TRACKING_PREFIX: &str = "SHP";
    pub const SHIPMENT_TABLE: &str = "shipments";
    pub const MESSAGE_LOCALE: &str = "ar";
}

// ==========================================
// ConfigManager
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// Create a ConfigManager on a database file
    ///
    /// # Arguments
    /// - db_path: database file path
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)?;
        Self::from_connection(Arc::new(Mutex::new(conn)))
    }

    /// Create a ConfigManager on a shared connection
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> RepositoryResult<Self> {
        let manager = Self { conn };
        manager.ensure_schema()?;
        Ok(manager)
    }

    fn ensure_schema(&self) -> RepositoryResult<()> {
        let conn = self.lock()?;
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS config_kv (
                scope_id TEXT NOT NULL,
                key TEXT NOT NULL,
                value TEXT NOT NULL,
                updated_at TEXT NOT NULL DEFAULT (datetime('now')),
                PRIMARY KEY (scope_id, key)
            );
            "#,
        )?;
        Ok(())
    }

    fn lock(&self) -> RepositoryResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// Read a global config value
    ///
    /// # Returns
    /// - Some(String): stored value
    /// - None: key not set
    pub fn get_config_value(&self, key: &str) -> RepositoryResult<Option<String>> {
        let conn = self.lock()?;
        let value = conn
            .query_row(
                "SELECT value FROM config_kv WHERE scope_id = ?1 AND key = ?2",
                params![GLOBAL_SCOPE, key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn get_config_or_default(&self, key: &str, default: &str) -> RepositoryResult<String> {
        Ok(self
            .get_config_value(key)?
            .unwrap_or_else(|| default.to_string()))
    }

    /// Insert or overwrite a global config value
    pub fn set_config_value(&self, key: &str, value: &str) -> RepositoryResult<()> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO config_kv (scope_id, key, value) VALUES (?1, ?2, ?3)
             ON CONFLICT(scope_id, key) DO UPDATE SET value = excluded.value,
                 updated_at = datetime('now')",
            params![GLOBAL_SCOPE, key, value],
        )?;
        Ok(())
    }
}

#[async_trait]
impl ImportConfigReader for ConfigManager {
    async fn get_max_file_size_bytes(&self) -> RepositoryResult<u64> {
        match self.get_config_value(config_keys::MAX_FILE_SIZE_BYTES)? {
            None => Ok(defaults::MAX_FILE_SIZE_BYTES),
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .map_err(|_| RepositoryError::FieldValueError {
                    field: config_keys::MAX_FILE_SIZE_BYTES.to_string(),
                    message: format!("not a byte count: {}", raw),
                }),
        }
    }

    async fn get_allowed_extensions(&self) -> RepositoryResult<Vec<String>> {
        let raw =
            self.get_config_or_default(config_keys::ALLOWED_EXTENSIONS, defaults::ALLOWED_EXTENSIONS)?;
        Ok(raw
            .split(',')
            .map(|ext| ext.trim().trim_start_matches('.').to_lowercase())
            .filter(|ext| !ext.is_empty())
            .collect())
    }

    async fn get_tracking_prefix(&self) -> RepositoryResult<String> {
        self.get_config_or_default(config_keys::TRACKING_PREFIX, defaults::TRACKING_PREFIX)
    }

    async fn get_shipment_table(&self) -> RepositoryResult<String> {
        self.get_config_or_default(config_keys::SHIPMENT_TABLE, defaults::SHIPMENT_TABLE)
    }

    async fn get_message_locale(&self) -> RepositoryResult<String> {
        self.get_config_or_default(config_keys::MESSAGE_LOCALE, defaults::MESSAGE_LOCALE)
    }
}
