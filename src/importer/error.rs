// ==========================================
// Shipment Import - Importer Error Types
// ==========================================
// Tool: thiserror
// Display text is for logs; user_message() gives the localized text
// ==========================================

use crate::domain::LogicalField;
use crate::i18n::{t_in, t_in_with_args};
use thiserror::Error;

/// Importer error type
#[derive(Error, Debug)]
pub enum ImportError {
    // ===== File-level errors =====
    #[error("file not found: {0}")]
    FileNotFound(String),

    #[error("unsupported file format: {ext} (allowed: {allowed})")]
    UnsupportedFormat { ext: String, allowed: String },

    #[error("file too large: {size} bytes (limit {limit} bytes)")]
    FileTooLarge { size: u64, limit: u64 },

    #[error("file read failed: {0}")]
    FileReadError(String),

    #[error("Excel parse failed: {0}")]
    ExcelParseError(String),

    #[error("CSV parse failed: {0}")]
    CsvParseError(String),

    #[error("sheet is empty or has no data rows")]
    EmptySheet,

    #[error("missing required columns: {}", join_fields(.0))]
    MissingColumns(Vec<LogicalField>),

    // ===== Session gate =====
    #[error("{0} records still have validation errors")]
    UnresolvedRecordErrors(usize),

    #[error("no clean records to submit")]
    NothingToSubmit,

    #[error("session already submitted")]
    AlreadySubmitted,

    #[error("record index out of range: {0}")]
    RecordNotFound(usize),

    // ===== Export =====
    #[error("export failed: {0}")]
    ExportFailed(String),
}

fn join_fields(fields: &[LogicalField]) -> String {
    fields
        .iter()
        .map(|f| f.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

impl ImportError {
    /// Single human-readable message in the given locale
    pub fn user_message(&self, locale: &str) -> String {
        match self {
            ImportError::FileNotFound(path) => {
                t_in_with_args(locale, "import.file_not_found", &[("path", path)])
            }
            ImportError::UnsupportedFormat { ext, allowed } => t_in_with_args(
                locale,
                "import.unsupported_format",
                &[("ext", ext), ("allowed", allowed)],
            ),
            ImportError::FileTooLarge { limit, .. } => {
                const MIB: u64 = 1024 * 1024;
                if *limit < MIB {
                    let max_bytes = limit.to_string();
                    return t_in_with_args(
                        locale,
                        "import.file_too_large_bytes",
                        &[("max_bytes", &max_bytes)],
                    );
                }
                let max_mb = if limit % MIB == 0 {
                    (limit / MIB).to_string()
                } else {
                    format!("{:.1}", *limit as f64 / MIB as f64)
                };
                t_in_with_args(locale, "import.file_too_large", &[("max_mb", &max_mb)])
            }
            ImportError::FileReadError(_) => t_in(locale, "import.file_read_failed"),
            ImportError::ExcelParseError(detail) | ImportError::CsvParseError(detail) => {
                t_in_with_args(locale, "import.parse_failed", &[("detail", detail)])
            }
            ImportError::EmptySheet => t_in(locale, "import.file_empty"),
            ImportError::MissingColumns(fields) => {
                let columns = fields
                    .iter()
                    .map(|f| t_in(locale, &f.label_key()))
                    .collect::<Vec<_>>()
                    .join("، ");
                t_in_with_args(locale, "import.missing_columns", &[("columns", &columns)])
            }
            ImportError::UnresolvedRecordErrors(count) => {
                let count = count.to_string();
                t_in_with_args(locale, "import.unresolved_errors", &[("count", &count)])
            }
            ImportError::NothingToSubmit => t_in(locale, "import.nothing_to_submit"),
            ImportError::AlreadySubmitted => t_in(locale, "import.already_submitted"),
            ImportError::ExportFailed(_) => t_in(locale, "export.failed"),
            other => other.to_string(),
        }
    }

    /// File-level errors end the attempt before any record exists
    pub fn is_file_level(&self) -> bool {
        matches!(
            self,
            ImportError::FileNotFound(_)
                | ImportError::UnsupportedFormat { .. }
                | ImportError::FileTooLarge { .. }
                | ImportError::FileReadError(_)
                | ImportError::ExcelParseError(_)
                | ImportError::CsvParseError(_)
                | ImportError::EmptySheet
                | ImportError::MissingColumns(_)
        )
    }
}

impl From<std::io::Error> for ImportError {
    fn from(err: std::io::Error) -> Self {
        ImportError::FileReadError(err.to_string())
    }
}

impl From<csv::Error> for ImportError {
    fn from(err: csv::Error) -> Self {
        ImportError::CsvParseError(err.to_string())
    }
}

impl From<calamine::Error> for ImportError {
    fn from(err: calamine::Error) -> Self {
        ImportError::ExcelParseError(err.to_string())
    }
}

impl From<rust_xlsxwriter::XlsxError> for ImportError {
    fn from(err: rust_xlsxwriter::XlsxError) -> Self {
        ImportError::ExportFailed(err.to_string())
    }
}

/// Result alias
pub type ImportResult<T> = Result<T, ImportError>;
