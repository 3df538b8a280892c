// ==========================================
// Shipment Import - Importer Layer
// ==========================================
// Pipeline: Sheet Parser -> Row Mapper & Validator -> Bulk Submitter
// -> Sheet Writer
// Supported inputs: xlsx, xls, csv
// ==========================================

pub mod bulk_submitter;
pub mod data_cleaner;
pub mod error;
pub mod field_mapper;
pub mod file_parser;
pub mod import_session;
pub mod record_validator;
pub mod sheet_writer;
pub mod shipment_importer;
pub mod shipment_importer_trait;

pub use bulk_submitter::{BulkSubmitter, SubmissionRun};
pub use data_cleaner::DataCleaner;
pub use error::{ImportError, ImportResult};
pub use field_mapper::{FieldMapper, FieldMapping, HeaderResolution, FIELD_MAPPINGS};
pub use file_parser::{CsvParser, ExcelParser, UniversalFileParser};
pub use import_session::ImportSession;
pub use record_validator::ShipmentValidator;
pub use sheet_writer::{export_file_name, KeyedRecord, SheetWriter};
pub use shipment_importer::{MappedSheet, ShipmentImporter};
pub use shipment_importer_trait::{FileParser, RecordValidator};
