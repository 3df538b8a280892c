// ==========================================
// Shipment Import - Importer Traits
// ==========================================
// Responsibility: seams of the import pipeline (no implementations)
// ==========================================

use crate::domain::{ImportRecord, RawSheet};
use crate::importer::error::ImportResult;

// ==========================================
// FileParser Trait
// ==========================================
// Implementors: ExcelParser, CsvParser
pub trait FileParser: Send + Sync {
    /// Parse an in-memory file into its first sheet
    ///
    /// # Returns
    /// - Ok(RawSheet): every row of the first sheet, header included
    /// - Err: the bytes are not a readable workbook
    fn parse_bytes(&self, bytes: &[u8]) -> ImportResult<RawSheet>;
}

// ==========================================
// RecordValidator Trait
// ==========================================
// Implementors: ShipmentValidator
pub trait RecordValidator: Send + Sync {
    /// Field-level validation
    ///
    /// Every rule is evaluated; the result lists all failures in rule order.
    fn validate(&self, record: &ImportRecord) -> Vec<String>;
}
