// ==========================================
// Shipment Import - Repository Layer
// ==========================================
// Responsibility: the row-store collaborator the submitter writes to
// Rule: no business rules here, only row CRUD
// Constraint: values are always bound as parameters
// ==========================================

pub mod error;
pub mod row_store;
pub mod row_store_impl;

pub use error::{RepositoryError, RepositoryResult};
pub use row_store::{Row, RowFilter, RowOrder, RowQuery, RowStore};
pub use row_store_impl::SqliteRowStore;
