// ==========================================
// Shipment Import - Field Mapper
// ==========================================
// Responsibility: header label -> logical field (bilingual substring match)
// and data row -> ImportRecord
// ==========================================

use crate::domain::{CellValue, ImportRecord, LogicalField};
use crate::importer::data_cleaner::DataCleaner;
use crate::importer::error::{ImportError, ImportResult};
use std::collections::HashMap;

/// One entry of the header table
#[derive(Debug, Clone, Copy)]
pub struct FieldMapping {
    pub field: LogicalField,
    /// Accepted header substrings (Arabic, English)
    pub synonyms: &'static [&'static str],
    /// The import fails when no column matches a required field
    pub required: bool,
}

/// Static header table; order decides which field claims an ambiguous column
pub static FIELD_MAPPINGS: &[FieldMapping] = &[
    FieldMapping {
        field: LogicalField::TrackingNumber,
        synonyms: &["رقم التتبع", "Tracking"],
        required: true,
    },
    FieldMapping {
        field: LogicalField::RecipientName,
        synonyms: &["اسم المستلم", "Recipient Name"],
        required: true,
    },
    FieldMapping {
        field: LogicalField::RecipientPhone,
        synonyms: &["رقم الهاتف", "Phone"],
        required: true,
    },
    FieldMapping {
        field: LogicalField::RecipientAddress,
        synonyms: &["العنوان", "Address"],
        required: true,
    },
    FieldMapping {
        field: LogicalField::RecipientCity,
        synonyms: &["المدينة", "City"],
        required: true,
    },
    FieldMapping {
        field: LogicalField::RecipientArea,
        synonyms: &["المنطقة", "Area"],
        required: false,
    },
    FieldMapping {
        field: LogicalField::CodAmount,
        synonyms: &["المبلغ", "Amount"],
        required: true,
    },
    FieldMapping {
        field: LogicalField::ProductName,
        synonyms: &["المنتج", "Product"],
        required: false,
    },
    FieldMapping {
        field: LogicalField::Weight,
        synonyms: &["الوزن", "Weight"],
        required: false,
    },
    FieldMapping {
        field: LogicalField::Notes,
        synonyms: &["ملاحظات", "Notes"],
        required: false,
    },
];

// ==========================================
// HeaderResolution
// ==========================================
/// Column index -> logical field, resolved once per import
#[derive(Debug, Clone, PartialEq)]
pub struct HeaderResolution {
    columns: Vec<Option<LogicalField>>,
}

impl HeaderResolution {
    pub fn field_at(&self, column: usize) -> Option<LogicalField> {
        self.columns.get(column).copied().flatten()
    }

    pub fn column_of(&self, field: LogicalField) -> Option<usize> {
        self.columns.iter().position(|f| *f == Some(field))
    }

    /// (column, field) pairs for every mapped column
    pub fn mapped_columns(&self) -> impl Iterator<Item = (usize, LogicalField)> + '_ {
        self.columns
            .iter()
            .enumerate()
            .filter_map(|(idx, field)| field.map(|f| (idx, f)))
    }
}

// ==========================================
// FieldMapper
// ==========================================
pub struct FieldMapper {
    cleaner: DataCleaner,
}

impl Default for FieldMapper {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldMapper {
    pub fn new() -> Self {
        Self {
            cleaner: DataCleaner,
        }
    }

    /// Resolve header labels to logical fields
    ///
    /// A field binds to the first unclaimed column whose trimmed label contains
    /// one of its synonyms.
    ///
    /// # Errors
    /// - MissingColumns: required fields without a column, in table order
    pub fn resolve_headers(&self, header: &[CellValue]) -> ImportResult<HeaderResolution> {
        let labels: Vec<String> = header.iter().map(CellValue::as_text).collect();
        let mut columns: Vec<Option<LogicalField>> = vec![None; labels.len()];
        let mut missing = Vec::new();

        for mapping in FIELD_MAPPINGS {
            let found = labels.iter().enumerate().position(|(idx, label)| {
                columns[idx].is_none()
                    && !label.is_empty()
                    && mapping.synonyms.iter().any(|s| label.contains(s))
            });

            match found {
                Some(idx) => columns[idx] = Some(mapping.field),
                None if mapping.required => missing.push(mapping.field),
                None => {}
            }
        }

        if !missing.is_empty() {
            return Err(ImportError::MissingColumns(missing));
        }

        Ok(HeaderResolution { columns })
    }

    /// Build a record from one data row
    ///
    /// # Returns
    /// - None: the row is empty or every cell is blank
    pub fn map_row(
        &self,
        resolution: &HeaderResolution,
        row_number: usize,
        row: &[CellValue],
    ) -> Option<ImportRecord> {
        if row.iter().all(CellValue::is_blank) {
            return None;
        }

        let mut record = ImportRecord {
            row_number,
            ..Default::default()
        };

        for (column, field) in resolution.mapped_columns() {
            let cell = row.get(column).unwrap_or(&CellValue::Empty);
            self.assign(&mut record, field, cell);
        }

        Some(record)
    }

    fn assign(&self, record: &mut ImportRecord, field: LogicalField, cell: &CellValue) {
        match field {
            LogicalField::TrackingNumber => record.tracking_number = self.cleaner.cell_text(cell),
            LogicalField::RecipientName => record.recipient_name = self.cleaner.cell_text(cell),
            LogicalField::RecipientPhone => record.recipient_phone = self.cleaner.cell_text(cell),
            LogicalField::RecipientAddress => {
                record.recipient_address = self.cleaner.cell_text(cell)
            }
            LogicalField::RecipientCity => record.recipient_city = self.cleaner.cell_text(cell),
            LogicalField::RecipientArea => record.recipient_area = self.cleaner.optional_text(cell),
            LogicalField::CodAmount => record.cod_amount = self.cleaner.lenient_amount(cell),
            LogicalField::ProductName => record.product_name = self.cleaner.optional_text(cell),
            LogicalField::Weight => record.weight = self.cleaner.optional_positive_number(cell),
            LogicalField::Notes => record.notes = self.cleaner.optional_text(cell),
        }
    }
}

/// Which header label each field resolved to, for logs
pub fn describe_resolution(
    resolution: &HeaderResolution,
    header: &[CellValue],
) -> HashMap<LogicalField, String> {
    resolution
        .mapped_columns()
        .map(|(idx, field)| {
            let label = header.get(idx).map(CellValue::as_text).unwrap_or_default();
            (field, label)
        })
        .collect()
}
