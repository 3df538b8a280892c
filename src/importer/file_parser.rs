// ==========================================
// Shipment Import - Sheet Parser
// ==========================================
// Stage 0: file read and parse
// Supports: Excel (.xlsx/.xls) / CSV (.csv)
// ==========================================

use crate::config::ImportSettings;
use crate::domain::{CellValue, RawSheet};
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::shipment_importer_trait::FileParser;
use calamine::{open_workbook_auto_from_rs, Data, Reader};
use csv::ReaderBuilder;
use std::io::Cursor;
use std::path::Path;
use tracing::{debug, warn};

// ==========================================
// Excel Parser
// ==========================================
pub struct ExcelParser;

impl FileParser for ExcelParser {
    fn parse_bytes(&self, bytes: &[u8]) -> ImportResult<RawSheet> {
        let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))?;

        // First sheet by position, whatever its name
        let range = workbook
            .worksheet_range_at(0)
            .ok_or_else(|| ImportError::ExcelParseError("workbook has no worksheets".to_string()))??;

        // The range starts at the first used row, which holds the header
        let start_row = range.start().map(|(row, _)| row as usize).unwrap_or(0);
        let rows: Vec<Vec<CellValue>> = range
            .rows()
            .map(|row| row.iter().map(cell_from_excel).collect::<Vec<_>>())
            .collect();

        Ok(RawSheet::new(rows).with_row_offset(start_row))
    }
}

fn cell_from_excel(cell: &Data) -> CellValue {
    match cell {
        Data::Empty | Data::Error(_) => CellValue::Empty,
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Float(f) => CellValue::Number(*f),
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Bool(b) => CellValue::Bool(*b),
        other => CellValue::Text(other.to_string()),
    }
}

// ==========================================
// CSV Parser
// ==========================================
pub struct CsvParser;

impl FileParser for CsvParser {
    fn parse_bytes(&self, bytes: &[u8]) -> ImportResult<RawSheet> {
        // Excel saves UTF-8 CSV with a BOM
        let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);

        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(bytes);

        let mut rows: Vec<Vec<CellValue>> = Vec::new();
        for record in reader.records() {
            let record = record?;
            rows.push(
                record
                    .iter()
                    .map(|value| {
                        if value.is_empty() {
                            CellValue::Empty
                        } else {
                            CellValue::Text(value.to_string())
                        }
                    })
                    .collect::<Vec<_>>(),
            );
        }

        Ok(RawSheet::new(rows))
    }
}

// ==========================================
// Universal parser (dispatch on extension)
// ==========================================
pub struct UniversalFileParser {
    settings: ImportSettings,
}

impl UniversalFileParser {
    pub fn new(settings: &ImportSettings) -> Self {
        Self {
            settings: settings.clone(),
        }
    }

    /// Read an upload from disk
    ///
    /// The size cap is checked against file metadata before reading.
    ///
    /// # Errors
    /// - FileNotFound: nothing at the path
    /// - FileReadError: the path exists but cannot be inspected or read
    pub async fn read_upload<P: AsRef<Path>>(&self, file_path: P) -> ImportResult<(String, Vec<u8>)> {
        let path = file_path.as_ref();

        match tokio::fs::try_exists(path).await {
            Ok(true) => {}
            Ok(false) => return Err(ImportError::FileNotFound(path.display().to_string())),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "upload not accessible");
                return Err(ImportError::FileReadError(e.to_string()));
            }
        }

        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
            .to_string();
        self.check_extension(&file_name)?;

        let metadata = tokio::fs::metadata(path).await?;
        self.check_size(metadata.len())?;

        let bytes = tokio::fs::read(path).await?;
        debug!(file = %file_name, bytes = bytes.len(), "upload read");
        Ok((file_name, bytes))
    }

    /// Parse an upload held in memory
    ///
    /// # Errors
    /// - UnsupportedFormat / FileTooLarge: input constraints
    /// - ExcelParseError / CsvParseError: not a readable spreadsheet
    /// - EmptySheet: fewer than two rows (header only, or nothing)
    pub fn parse(&self, file_name: &str, bytes: &[u8]) -> ImportResult<RawSheet> {
        let ext = self.check_extension(file_name)?;
        self.check_size(bytes.len() as u64)?;

        let sheet = match ext.as_str() {
            "csv" => CsvParser.parse_bytes(bytes)?,
            _ => ExcelParser.parse_bytes(bytes)?,
        };

        if sheet.row_count() < 2 {
            warn!(file = %file_name, rows = sheet.row_count(), "sheet has no data rows");
            return Err(ImportError::EmptySheet);
        }

        debug!(file = %file_name, rows = sheet.row_count(), "sheet parsed");
        Ok(sheet)
    }

    fn check_extension(&self, file_name: &str) -> ImportResult<String> {
        let ext = Path::new(file_name)
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        if self.settings.is_extension_allowed(&ext) {
            Ok(ext)
        } else {
            Err(ImportError::UnsupportedFormat {
                ext,
                allowed: self.settings.allowed_extensions_display(),
            })
        }
    }

    fn check_size(&self, size: u64) -> ImportResult<()> {
        let limit = self.settings.max_file_size_bytes;
        if size > limit {
            return Err(ImportError::FileTooLarge { size, limit });
        }
        Ok(())
    }
}
