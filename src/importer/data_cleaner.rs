// ==========================================
// Shipment Import - Cell Cleaner
// ==========================================
// Responsibility: TRIM / NULL normalisation / lenient numeric coercion
// of raw cells into record attributes
// ==========================================

use crate::domain::CellValue;

pub struct DataCleaner;

impl DataCleaner {
    /// Trimmed text, empty string for blanks
    pub fn cell_text(&self, cell: &CellValue) -> String {
        cell.as_text()
    }

    /// Trimmed text, None for blanks
    pub fn optional_text(&self, cell: &CellValue) -> Option<String> {
        let text = cell.as_text();
        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    }

    /// Parse a number; None when the cell is blank or not numeric
    pub fn parse_number(&self, cell: &CellValue) -> Option<f64> {
        let value = match cell {
            CellValue::Number(n) => Some(*n),
            CellValue::Text(s) => s.trim().parse::<f64>().ok(),
            CellValue::Empty | CellValue::Bool(_) => None,
        };
        // "NaN" and "inf" parse as f64 but are not amounts
        value.filter(|v| v.is_finite())
    }

    /// COD amount: unparseable values become 0 rather than an error
    pub fn lenient_amount(&self, cell: &CellValue) -> f64 {
        self.parse_number(cell).unwrap_or(0.0)
    }

    /// Weight: unparseable or non-positive values leave the field unset
    pub fn optional_positive_number(&self, cell: &CellValue) -> Option<f64> {
        self.parse_number(cell).filter(|v| *v > 0.0)
    }

    /// Egyptian mobile number: exactly 11 ASCII digits starting with "01"
    ///
    /// Equivalent to the anchored pattern `^01[0-9]{9}$`, checked without a regex.
    pub fn is_valid_phone(&self, phone: &str) -> bool {
        phone.len() == 11 && phone.starts_with("01") && phone.bytes().all(|b| b.is_ascii_digit())
    }
}
