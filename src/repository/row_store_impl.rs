// ==========================================
// Shipment Import - SQLite Row Store
// ==========================================
// Rows are stored as JSON payloads in one `row_store` table, keyed by
// logical table name. Filters and ordering go through json_extract.
// Unique keys are partial expression indexes per logical table.
// ==========================================

use crate::db::open_sqlite_connection;
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::row_store::{Row, RowQuery, RowStore};
use async_trait::async_trait;
use rusqlite::types::Value as SqlValue;
use rusqlite::{params, params_from_iter, Connection};
use serde_json::Value;
use std::sync::{Arc, Mutex};
use tracing::debug;

// ==========================================
// SqliteRowStore
// ==========================================
pub struct SqliteRowStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteRowStore {
    /// Open (or create) a row store on a database file
    ///
    /// # Arguments
    /// - db_path: database file path
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)?;
        Self::from_connection(Arc::new(Mutex::new(conn)))
    }

    /// Row store on a shared connection
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> RepositoryResult<Self> {
        let store = Self { conn };
        store.ensure_schema()?;
        Ok(store)
    }

    fn ensure_schema(&self) -> RepositoryResult<()> {
        let conn = self.lock()?;
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS row_store (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                table_name TEXT NOT NULL,
                payload TEXT NOT NULL,
                created_at TEXT NOT NULL DEFAULT (datetime('now'))
            );
            CREATE INDEX IF NOT EXISTS idx_row_store_table ON row_store(table_name);
            "#,
        )?;
        Ok(())
    }

    fn lock(&self) -> RepositoryResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// Enforce uniqueness of one column within a logical table
    ///
    /// Inserts that repeat an existing value fail with UniqueConstraintViolation.
    pub fn with_unique_key(self, table: &str, column: &str) -> RepositoryResult<Self> {
        validate_identifier(table)?;
        validate_identifier(column)?;

        // Index expressions cannot take bound parameters; both names are validated above
        let sql = format!(
            "CREATE UNIQUE INDEX IF NOT EXISTS ux_row_store_{table}_{column} \
             ON row_store(json_extract(payload, '$.{column}')) \
             WHERE table_name = '{table}'",
            table = table,
            column = column,
        );
        {
            let conn = self.lock()?;
            conn.execute(&sql, [])?;
        }
        debug!(table = %table, column = %column, "unique key registered");
        Ok(self)
    }
}

#[async_trait]
impl RowStore for SqliteRowStore {
    async fn insert_row(&self, table: &str, row: Row) -> RepositoryResult<i64> {
        validate_identifier(table)?;
        let payload = serde_json::to_string(&row)?;

        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO row_store (table_name, payload) VALUES (?1, ?2)",
            params![table, payload],
        )?;
        Ok(conn.last_insert_rowid())
    }

    async fn select_rows(&self, table: &str, query: &RowQuery) -> RepositoryResult<Vec<Row>> {
        validate_identifier(table)?;

        let mut sql = String::from("SELECT payload FROM row_store WHERE table_name = ?");
        let mut bind: Vec<SqlValue> = vec![SqlValue::Text(table.to_string())];

        for filter in &query.filters {
            validate_identifier(&filter.column)?;
            bind.push(SqlValue::Text(json_path(&filter.column)));
            match json_to_sql(&filter.value) {
                Some(value) => {
                    sql.push_str(" AND json_extract(payload, ?) = ?");
                    bind.push(value);
                }
                None => sql.push_str(" AND json_extract(payload, ?) IS NULL"),
            }
        }

        match &query.order {
            Some(order) => {
                validate_identifier(&order.column)?;
                sql.push_str(" ORDER BY json_extract(payload, ?)");
                // rowid breaks ties in the same direction as the sort key
                sql.push_str(if order.descending {
                    " DESC, id DESC"
                } else {
                    " ASC, id ASC"
                });
                bind.push(SqlValue::Text(json_path(&order.column)));
            }
            None => sql.push_str(" ORDER BY id ASC"),
        }

        if let Some(limit) = query.limit {
            sql.push_str(" LIMIT ?");
            bind.push(SqlValue::Integer(limit as i64));
        }

        let conn = self.lock()?;
        let mut stmt = conn.prepare(&sql)?;
        let payloads = stmt
            .query_map(params_from_iter(bind.iter()), |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;

        let mut rows = Vec::with_capacity(payloads.len());
        for payload in payloads {
            rows.push(serde_json::from_str::<Row>(&payload)?);
        }
        Ok(rows)
    }

    async fn count_rows(&self, table: &str) -> RepositoryResult<usize> {
        validate_identifier(table)?;
        let conn = self.lock()?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM row_store WHERE table_name = ?1",
            params![table],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }
}

fn json_path(column: &str) -> String {
    format!("$.{}", column)
}

// json_extract returns SQL values; JSON booleans come back as 0/1
fn json_to_sql(value: &Value) -> Option<SqlValue> {
    match value {
        Value::Null => None,
        Value::Bool(b) => Some(SqlValue::Integer(i64::from(*b))),
        Value::Number(n) => match n.as_i64() {
            Some(i) => Some(SqlValue::Integer(i)),
            None => n.as_f64().map(SqlValue::Real),
        },
        Value::String(s) => Some(SqlValue::Text(s.clone())),
        other => Some(SqlValue::Text(other.to_string())),
    }
}

fn validate_identifier(name: &str) -> RepositoryResult<()> {
    let valid = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_');
    if valid {
        Ok(())
    } else {
        Err(RepositoryError::ValidationError(format!(
            "invalid table or column name: {:?}",
            name
        )))
    }
}
