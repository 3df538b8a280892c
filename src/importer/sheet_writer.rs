// ==========================================
// Shipment Import - Sheet Writer
// ==========================================
// Responsibility: ordered key-labeled records -> single-sheet .xlsx
// Built-in documents: shipment template, validation error report,
// submission error report
// Tool: rust_xlsxwriter
// ==========================================

use crate::domain::{CellValue, ImportOutcome, ImportRecord, LogicalField};
use crate::i18n::t_in;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::field_mapper::FIELD_MAPPINGS;
use chrono::NaiveDate;
use rust_xlsxwriter::{Format, Workbook};
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};

/// One output row: (column key, value) in column order
pub type KeyedRecord = Vec<(String, CellValue)>;

/// Purpose part of exported file names
pub mod purposes {
    pub const TEMPLATE: &str = "shipments_template";
    pub const VALIDATION_ERRORS: &str = "validation_errors";
    pub const SUBMISSION_ERRORS: &str = "import_errors";
}

const COLUMN_WIDTH: f64 = 22.0;

pub struct SheetWriter {
    right_to_left: bool,
}

impl SheetWriter {
    /// Writer laid out for the locale (Arabic sheets are right-to-left)
    pub fn for_locale(locale: &str) -> Self {
        Self {
            right_to_left: locale == "ar",
        }
    }

    /// Serialize records into xlsx bytes
    ///
    /// Row 1 holds the keys of the first record; each later row holds the
    /// values of one record looked up by key. Blank values leave the cell empty.
    pub fn write_to_buffer(&self, records: &[KeyedRecord]) -> ImportResult<Vec<u8>> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet.set_right_to_left(self.right_to_left);

        let header_format = Format::new().set_bold();
        let keys: Vec<&str> = records
            .first()
            .map(|first| first.iter().map(|(k, _)| k.as_str()).collect())
            .unwrap_or_default();

        for (col, key) in keys.iter().enumerate() {
            let col = col as u16;
            worksheet.write_string_with_format(0, col, *key, &header_format)?;
            worksheet.set_column_width(col, COLUMN_WIDTH)?;
        }

        for (idx, record) in records.iter().enumerate() {
            let row = (idx + 1) as u32;
            for (col, key) in keys.iter().enumerate() {
                let value = record.iter().find(|(k, _)| k == key).map(|(_, v)| v);
                let col = col as u16;
                match value {
                    Some(CellValue::Text(s)) if !s.trim().is_empty() => {
                        worksheet.write_string(row, col, s)?;
                    }
                    Some(CellValue::Number(n)) => {
                        worksheet.write_number(row, col, *n)?;
                    }
                    Some(CellValue::Bool(b)) => {
                        worksheet.write_boolean(row, col, *b)?;
                    }
                    _ => {}
                }
            }
        }

        let buffer = workbook.save_to_buffer()?;
        debug!(rows = records.len(), bytes = buffer.len(), "sheet written");
        Ok(buffer)
    }

    /// Write records to `<dir>/<file_name>`
    pub async fn save(
        &self,
        records: &[KeyedRecord],
        dir: &Path,
        file_name: &str,
    ) -> ImportResult<PathBuf> {
        let buffer = self.write_to_buffer(records)?;
        let path = dir.join(file_name);

        tokio::fs::create_dir_all(dir)
            .await
            .map_err(|e| export_io_error(&path, e))?;
        tokio::fs::write(&path, buffer)
            .await
            .map_err(|e| export_io_error(&path, e))?;

        info!(path = %path.display(), rows = records.len(), "sheet saved");
        Ok(path)
    }
}

fn export_io_error(path: &Path, err: std::io::Error) -> ImportError {
    error!(path = %path.display(), error = %err, "export write failed");
    ImportError::ExportFailed(err.to_string())
}

/// `<purpose>_<YYYY-MM-DD>.xlsx`
pub fn export_file_name(purpose: &str, date: NaiveDate) -> String {
    format!("{}_{}.xlsx", purpose, date.format("%Y-%m-%d"))
}

// ==========================================
// Built-in documents
// ==========================================

/// Example rows shipped in the template
pub fn template_examples() -> Vec<ImportRecord> {
    vec![
        ImportRecord {
            row_number: 2,
            tracking_number: "EG-1001".to_string(),
            recipient_name: "أحمد محمد".to_string(),
            recipient_phone: "01012345678".to_string(),
            recipient_address: "15 شارع التحرير، الدقي".to_string(),
            recipient_city: "القاهرة".to_string(),
            recipient_area: Some("الدقي".to_string()),
            cod_amount: 250.0,
            product_name: Some("ملابس".to_string()),
            weight: Some(1.5),
            notes: Some("الاتصال قبل التوصيل".to_string()),
            errors: Vec::new(),
        },
        ImportRecord {
            row_number: 3,
            tracking_number: String::new(),
            recipient_name: "سارة علي".to_string(),
            recipient_phone: "01198765432".to_string(),
            recipient_address: "شارع فوزي معاذ".to_string(),
            recipient_city: "الإسكندرية".to_string(),
            recipient_area: Some("سموحة".to_string()),
            cod_amount: 120.0,
            product_name: Some("إكسسوارات".to_string()),
            weight: Some(0.5),
            notes: None,
            errors: Vec::new(),
        },
    ]
}

/// Record as a keyed row, one column per logical field labeled in `locale`
pub fn record_to_keyed(locale: &str, record: &ImportRecord) -> KeyedRecord {
    FIELD_MAPPINGS
        .iter()
        .map(|mapping| {
            let value = match mapping.field {
                LogicalField::TrackingNumber => CellValue::from(record.tracking_number.as_str()),
                LogicalField::RecipientName => CellValue::from(record.recipient_name.as_str()),
                LogicalField::RecipientPhone => CellValue::from(record.recipient_phone.as_str()),
                LogicalField::RecipientAddress => {
                    CellValue::from(record.recipient_address.as_str())
                }
                LogicalField::RecipientCity => CellValue::from(record.recipient_city.as_str()),
                LogicalField::RecipientArea => CellValue::from(record.recipient_area.clone()),
                LogicalField::CodAmount => CellValue::Number(record.cod_amount),
                LogicalField::ProductName => CellValue::from(record.product_name.clone()),
                LogicalField::Weight => CellValue::from(record.weight),
                LogicalField::Notes => CellValue::from(record.notes.clone()),
            };
            (t_in(locale, &mapping.field.label_key()), value)
        })
        .collect()
}

/// Template rows: localized field labels as header, two example rows
pub fn template_records(locale: &str) -> Vec<KeyedRecord> {
    template_examples()
        .iter()
        .map(|record| record_to_keyed(locale, record))
        .collect()
}

/// Two-column report rows: sequence number, message
fn numbered_report(locale: &str, messages: impl Iterator<Item = String>) -> Vec<KeyedRecord> {
    let sequence_key = t_in(locale, "report.sequence");
    let error_key = t_in(locale, "report.error");

    messages
        .enumerate()
        .map(|(idx, message)| {
            vec![
                (sequence_key.clone(), CellValue::from((idx + 1) as i64)),
                (error_key.clone(), CellValue::Text(message)),
            ]
        })
        .collect()
}

/// Report rows for validation errors (one per report line)
pub fn validation_report_records(locale: &str, report_lines: &[String]) -> Vec<KeyedRecord> {
    numbered_report(locale, report_lines.iter().cloned())
}

/// Report rows for failed inserts, "<identifier>: <message>"
pub fn submission_error_report_records(locale: &str, outcome: &ImportOutcome) -> Vec<KeyedRecord> {
    numbered_report(
        locale,
        outcome
            .errors
            .iter()
            .map(|e| format!("{}: {}", e.identifier, e.message)),
    )
}
