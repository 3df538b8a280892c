// ==========================================
// Shipment Import - API Layer
// ==========================================
// Responsibility: entry points for hosts
// ==========================================

pub mod error;
pub mod import_api;

pub use error::{ApiError, ApiResult};
pub use import_api::{ImportApi, PreviewSummary};
