// ==========================================
// Shipment Import - Shipment Domain Model
// ==========================================
// ImportRecord: one structured unit per non-blank data row
// ImportOutcome: aggregate result of one submission run
// NewShipment: row shape written to the shipment table
// ==========================================

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

// ==========================================
// LogicalField - canonical record attribute
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogicalField {
    TrackingNumber,
    RecipientName,
    RecipientPhone,
    RecipientAddress,
    RecipientCity,
    RecipientArea,
    CodAmount,
    ProductName,
    Weight,
    Notes,
}

impl LogicalField {
    /// Column name used in the row store
    pub fn as_str(&self) -> &'static str {
        match self {
            LogicalField::TrackingNumber => "tracking_number",
            LogicalField::RecipientName => "recipient_name",
            LogicalField::RecipientPhone => "recipient_phone",
            LogicalField::RecipientAddress => "recipient_address",
            LogicalField::RecipientCity => "recipient_city",
            LogicalField::RecipientArea => "recipient_area",
            LogicalField::CodAmount => "cod_amount",
            LogicalField::ProductName => "product_name",
            LogicalField::Weight => "weight",
            LogicalField::Notes => "notes",
        }
    }

    /// i18n key of the human-readable label
    pub fn label_key(&self) -> String {
        format!("fields.{}", self.as_str())
    }
}

// ==========================================
// ImportRecord
// ==========================================
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ImportRecord {
    /// 1-based sheet row (the header is row 1)
    pub row_number: usize,

    pub tracking_number: String,
    pub recipient_name: String,
    pub recipient_phone: String,
    pub recipient_address: String,
    pub recipient_city: String,
    pub recipient_area: Option<String>,
    pub cod_amount: f64,
    pub product_name: Option<String>,
    pub weight: Option<f64>,
    pub notes: Option<String>,

    /// Validation failures in rule order; empty means submittable
    pub errors: Vec<String>,
}

impl ImportRecord {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }

    /// Identifier used in reports: the tracking number, or the row when none was given
    pub fn identifier(&self) -> String {
        if self.tracking_number.trim().is_empty() {
            format!("#{}", self.row_number)
        } else {
            self.tracking_number.clone()
        }
    }
}

// ==========================================
// Submission result types
// ==========================================

/// One failed insert
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionError {
    pub identifier: String,
    pub message: String,
}

/// Aggregate result of a submission run
///
/// success_count + failed_count always equals the number of records attempted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImportOutcome {
    pub success_count: usize,
    pub failed_count: usize,
    pub errors: Vec<SubmissionError>,
}

impl ImportOutcome {
    pub fn attempted(&self) -> usize {
        self.success_count + self.failed_count
    }

    pub fn has_failures(&self) -> bool {
        self.failed_count > 0
    }

    pub fn record_success(&mut self) {
        self.success_count += 1;
    }

    pub fn record_failure(&mut self, identifier: String, message: String) {
        self.failed_count += 1;
        self.errors.push(SubmissionError {
            identifier,
            message,
        });
    }
}

/// Progress after one record has been attempted
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubmitProgress {
    /// 0-based position in the batch
    pub index: usize,
    pub total: usize,
    /// round((index + 1) / total * 100)
    pub percent: u32,
    pub identifier: String,
    pub succeeded: bool,
    pub success_so_far: usize,
    pub failed_so_far: usize,
}

// ==========================================
// NewShipment - row written to the store
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewShipment {
    pub tracking_number: String,
    pub recipient_name: String,
    pub recipient_phone: String,
    pub recipient_address: String,
    pub recipient_city: String,
    pub recipient_area: Option<String>,
    pub cod_amount: f64,
    pub product_name: Option<String>,
    pub weight: Option<f64>,
    pub notes: Option<String>,
    pub status: String,
    pub source: String,
    #[serde(serialize_with = "serialize_fixed_width")]
    pub created_at: DateTime<Utc>,
}

/// Fixed-width RFC 3339 so stored timestamps sort as text
fn serialize_fixed_width<S>(at: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_str(&at.to_rfc3339_opts(SecondsFormat::Micros, true))
}

impl NewShipment {
    pub const STATUS_PENDING: &'static str = "pending";
    pub const SOURCE_EXCEL_IMPORT: &'static str = "excel_import";

    /// Build the store row from a clean record; `tracking_number` is already resolved
    pub fn from_record(record: &ImportRecord, tracking_number: String, now: DateTime<Utc>) -> Self {
        Self {
            tracking_number,
            recipient_name: record.recipient_name.trim().to_string(),
            recipient_phone: record.recipient_phone.trim().to_string(),
            recipient_address: record.recipient_address.trim().to_string(),
            recipient_city: record.recipient_city.trim().to_string(),
            recipient_area: record.recipient_area.clone(),
            cod_amount: record.cod_amount,
            product_name: record.product_name.clone(),
            weight: record.weight,
            notes: record.notes.clone(),
            status: Self::STATUS_PENDING.to_string(),
            source: Self::SOURCE_EXCEL_IMPORT.to_string(),
            created_at: now,
        }
    }
}
