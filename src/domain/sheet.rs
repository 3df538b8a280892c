// ==========================================
// Shipment Import - Raw Sheet Model
// ==========================================
// Output of the sheet parser, input of the field mapper.
// Cells are kept untyped: numbers, strings and blanks pass through as-is.
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

/// A single spreadsheet cell value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(untagged)]
pub enum CellValue {
    #[default]
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
}

impl CellValue {
    /// Blank cell: empty, or text made only of whitespace
    pub fn is_blank(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// Trimmed text form of the cell (empty string for blanks)
    pub fn as_text(&self) -> String {
        match self {
            CellValue::Empty => String::new(),
            CellValue::Text(s) => s.trim().to_string(),
            CellValue::Number(n) => format_number(*n),
            CellValue::Bool(b) => b.to_string(),
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_text())
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::Text(value)
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Number(value)
    }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        CellValue::Number(value as f64)
    }
}

impl From<Option<String>> for CellValue {
    fn from(value: Option<String>) -> Self {
        value.map(CellValue::Text).unwrap_or(CellValue::Empty)
    }
}

impl From<Option<f64>> for CellValue {
    fn from(value: Option<f64>) -> Self {
        value.map(CellValue::Number).unwrap_or(CellValue::Empty)
    }
}

// Whole numbers print without a trailing ".0" (150 rather than 150.0)
fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

// ==========================================
// RawSheet
// ==========================================
/// First sheet of an uploaded workbook; row 0 is the header
///
/// `rows` starts at the first used row of the sheet. `row_offset` counts the
/// unused rows above it and only affects reported row numbers.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawSheet {
    pub rows: Vec<Vec<CellValue>>,
    pub row_offset: usize,
}

impl RawSheet {
    pub fn new(rows: Vec<Vec<CellValue>>) -> Self {
        Self {
            rows,
            row_offset: 0,
        }
    }

    pub fn with_row_offset(mut self, row_offset: usize) -> Self {
        self.row_offset = row_offset;
        self
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Header row (empty slice when the sheet has no rows)
    pub fn header(&self) -> &[CellValue] {
        self.rows.first().map(Vec::as_slice).unwrap_or(&[])
    }

    /// Data rows paired with their 1-based sheet row number
    pub fn data_rows(&self) -> impl Iterator<Item = (usize, &[CellValue])> {
        let offset = self.row_offset;
        self.rows
            .iter()
            .enumerate()
            .skip(1)
            .map(move |(idx, row)| (idx + 1 + offset, row.as_slice()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whole_number_as_text() {
        assert_eq!(CellValue::Number(150.0).as_text(), "150");
        assert_eq!(CellValue::Number(2.5).as_text(), "2.5");
    }

    #[test]
    fn test_blank_detection() {
        assert!(CellValue::Empty.is_blank());
        assert!(CellValue::Text("   ".to_string()).is_blank());
        assert!(!CellValue::Number(0.0).is_blank());
    }

    #[test]
    fn test_data_rows_numbering() {
        let sheet = RawSheet::new(vec![
            vec!["h".into()],
            vec!["a".into()],
            vec!["b".into()],
        ]);
        let numbers: Vec<usize> = sheet.data_rows().map(|(n, _)| n).collect();
        assert_eq!(numbers, vec![2, 3]);
    }

    #[test]
    fn test_row_offset_shifts_numbers_not_header() {
        let sheet = RawSheet::new(vec![vec!["h".into()], vec!["a".into()]]).with_row_offset(2);
        assert_eq!(sheet.header(), &[CellValue::from("h")]);
        let numbers: Vec<usize> = sheet.data_rows().map(|(n, _)| n).collect();
        assert_eq!(numbers, vec![4]);
    }
}
