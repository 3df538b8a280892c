// ==========================================
// Test helpers
// ==========================================
// Temporary databases, in-memory spreadsheets, row-store doubles
// ==========================================
#![allow(dead_code)]

use async_trait::async_trait;
use rust_xlsxwriter::Workbook;
use shipment_import::config::ImportConfigReader;
use shipment_import::domain::CellValue;
use shipment_import::repository::{RepositoryError, RepositoryResult, Row, RowQuery, RowStore};
use std::collections::HashSet;
use std::error::Error;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tempfile::NamedTempFile;

/// Temporary database file
///
/// # Returns
/// - NamedTempFile: keep alive for the duration of the test
/// - String: database path
pub fn create_test_db() -> Result<(NamedTempFile, String), Box<dyn Error>> {
    let temp_file = NamedTempFile::new()?;
    let db_path = temp_file.path().to_str().unwrap().to_string();
    Ok((temp_file, db_path))
}

/// The six required columns with their Arabic labels
pub fn arabic_header() -> Vec<CellValue> {
    text_row(&[
        "رقم التتبع",
        "اسم المستلم",
        "رقم الهاتف",
        "العنوان",
        "المدينة",
        "المبلغ",
    ])
}

pub fn text_row(values: &[&str]) -> Vec<CellValue> {
    values.iter().map(|v| CellValue::from(*v)).collect()
}

/// Data row under `arabic_header`
pub fn shipment_row(tracking: &str, phone: &str, amount: f64) -> Vec<CellValue> {
    vec![
        CellValue::from(tracking),
        CellValue::from("Ali"),
        CellValue::from(phone),
        CellValue::from("Cairo St 1"),
        CellValue::from("Cairo"),
        CellValue::Number(amount),
    ]
}

/// Build an .xlsx workbook the way a user's spreadsheet program would
pub fn xlsx_bytes(rows: &[Vec<CellValue>]) -> Vec<u8> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();

    for (r, row) in rows.iter().enumerate() {
        for (c, cell) in row.iter().enumerate() {
            let (r, c) = (r as u32, c as u16);
            match cell {
                CellValue::Text(s) => {
                    sheet.write_string(r, c, s).unwrap();
                }
                CellValue::Number(n) => {
                    sheet.write_number(r, c, *n).unwrap();
                }
                CellValue::Bool(b) => {
                    sheet.write_boolean(r, c, *b).unwrap();
                }
                CellValue::Empty => {}
            }
        }
    }

    workbook.save_to_buffer().unwrap()
}

/// Write a workbook into `dir/file_name`
pub fn write_xlsx(dir: &Path, file_name: &str, rows: &[Vec<CellValue>]) -> PathBuf {
    let path = dir.join(file_name);
    std::fs::write(&path, xlsx_bytes(rows)).unwrap();
    path
}

// ==========================================
// FlakyRowStore - fails selected inserts
// ==========================================
pub struct FlakyRowStore {
    rows: Mutex<Vec<Row>>,
    calls: Mutex<usize>,
    fail_on: HashSet<usize>,
}

impl FlakyRowStore {
    /// `fail_on`: 1-based insert calls that fail
    pub fn new(fail_on: &[usize]) -> Self {
        Self {
            rows: Mutex::new(Vec::new()),
            calls: Mutex::new(0),
            fail_on: fail_on.iter().copied().collect(),
        }
    }

    pub fn inserted(&self) -> Vec<Row> {
        self.rows.lock().unwrap().clone()
    }

    pub fn calls(&self) -> usize {
        *self.calls.lock().unwrap()
    }
}

#[async_trait]
impl RowStore for FlakyRowStore {
    async fn insert_row(&self, _table: &str, row: Row) -> RepositoryResult<i64> {
        let call = {
            let mut calls = self.calls.lock().unwrap();
            *calls += 1;
            *calls
        };
        if self.fail_on.contains(&call) {
            return Err(RepositoryError::DatabaseQueryError(format!(
                "insert {} rejected",
                call
            )));
        }
        let mut rows = self.rows.lock().unwrap();
        rows.push(row);
        Ok(rows.len() as i64)
    }

    async fn select_rows(&self, _table: &str, _query: &RowQuery) -> RepositoryResult<Vec<Row>> {
        Ok(self.inserted())
    }

    async fn count_rows(&self, _table: &str) -> RepositoryResult<usize> {
        Ok(self.rows.lock().unwrap().len())
    }
}

// ==========================================
// MockConfig - fixed settings
// ==========================================
#[derive(Debug, Clone)]
pub struct MockConfig {
    pub max_file_size_bytes: u64,
    pub allowed_extensions: Vec<String>,
    pub tracking_prefix: String,
    pub shipment_table: String,
    pub locale: String,
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            max_file_size_bytes: 10 * 1024 * 1024,
            allowed_extensions: vec!["xlsx".into(), "xls".into(), "csv".into()],
            tracking_prefix: "TST".into(),
            shipment_table: "shipments".into(),
            locale: "ar".into(),
        }
    }
}

#[async_trait]
impl ImportConfigReader for MockConfig {
    async fn get_max_file_size_bytes(&self) -> RepositoryResult<u64> {
        Ok(self.max_file_size_bytes)
    }

    async fn get_allowed_extensions(&self) -> RepositoryResult<Vec<String>> {
        Ok(self.allowed_extensions.clone())
    }

    async fn get_tracking_prefix(&self) -> RepositoryResult<String> {
        Ok(self.tracking_prefix.clone())
    }

    async fn get_shipment_table(&self) -> RepositoryResult<String> {
        Ok(self.shipment_table.clone())
    }

    async fn get_message_locale(&self) -> RepositoryResult<String> {
        Ok(self.locale.clone())
    }
}
