// ==========================================
// Shipment Import - Domain Layer
// ==========================================
// Responsibility: sheet cells, import records, submission outcomes
// Rule: no data access, no parsing logic
// ==========================================

pub mod sheet;
pub mod shipment;

pub use sheet::{CellValue, RawSheet};
pub use shipment::{
    ImportOutcome, ImportRecord, LogicalField, NewShipment, SubmissionError, SubmitProgress,
};
