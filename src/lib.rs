// ==========================================
// Shipment Import - Core Library
// ==========================================
// Excel bulk-import pipeline for shipments:
// parse -> map & validate -> bulk submit -> error reports
// Stack: Rust + SQLite row store
// ==========================================

// Message catalogues under locales/
rust_i18n::i18n!("locales", fallback = "ar");

// ==========================================
// Modules
// ==========================================

// Domain - sheets, records, outcomes
pub mod domain;

// Row store - persistence collaborator
pub mod repository;

// Import pipeline
pub mod importer;

// Import settings
pub mod config;

// SQLite connection setup (shared PRAGMAs)
pub mod db;

pub mod logging;

pub mod i18n;

// API - entry points for hosts
pub mod api;

// ==========================================
// Re-exports
// ==========================================

pub use domain::{
    CellValue, ImportOutcome, ImportRecord, LogicalField, NewShipment, RawSheet, SubmitProgress,
};

pub use importer::{
    BulkSubmitter, ImportError, ImportSession, SheetWriter, ShipmentImporter, ShipmentValidator,
};

pub use api::{ApiError, ImportApi};

pub use repository::{RowStore, SqliteRowStore};

// ==========================================
// Constants
// ==========================================

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub const APP_NAME: &str = "shipment-import";
