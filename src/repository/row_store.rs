// ==========================================
// Shipment Import - Row Store Trait
// ==========================================
// A generic "insert one row into table X" / "read filtered, ordered rows
// from table X" interface. The backend behind it is opaque.
// ==========================================

use crate::repository::error::RepositoryResult;
use async_trait::async_trait;
use serde_json::Value;

/// One row: column name -> JSON value
pub type Row = serde_json::Map<String, Value>;

/// Equality filter on one column
#[derive(Debug, Clone, PartialEq)]
pub struct RowFilter {
    pub column: String,
    pub value: Value,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RowOrder {
    pub column: String,
    pub descending: bool,
}

/// Filter + order + limit for select_rows
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RowQuery {
    pub filters: Vec<RowFilter>,
    pub order: Option<RowOrder>,
    pub limit: Option<usize>,
}

impl RowQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn eq(mut self, column: &str, value: impl Into<Value>) -> Self {
        self.filters.push(RowFilter {
            column: column.to_string(),
            value: value.into(),
        });
        self
    }

    pub fn order_by(mut self, column: &str, descending: bool) -> Self {
        self.order = Some(RowOrder {
            column: column.to_string(),
            descending,
        });
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

// ==========================================
// RowStore Trait
// ==========================================
// Implementors: SqliteRowStore, test doubles
#[async_trait]
pub trait RowStore: Send + Sync {
    /// Insert one row
    ///
    /// # Returns
    /// - Ok(i64): store-assigned row id
    /// - Err: the backend rejected the row (message is surfaced per record)
    async fn insert_row(&self, table: &str, row: Row) -> RepositoryResult<i64>;

    /// Read rows matching every filter, in the requested order
    async fn select_rows(&self, table: &str, query: &RowQuery) -> RepositoryResult<Vec<Row>>;

    /// Number of rows in a table
    async fn count_rows(&self, table: &str) -> RepositoryResult<usize>;
}
