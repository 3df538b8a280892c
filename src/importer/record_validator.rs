// ==========================================
// Shipment Import - Record Validator
// ==========================================
// Rules (evaluated in order, all collected):
// 1. tracking_number: never an error (generated at submit when empty)
// 2. recipient_name: required
// 3. recipient_phone: required, then ^01[0-9]{9}$
// 4. recipient_address: required
// 5. recipient_city: required
// 6. cod_amount: must not be negative
// ==========================================

use crate::domain::ImportRecord;
use crate::i18n::{t_in, t_in_with_args};
use crate::importer::data_cleaner::DataCleaner;
use crate::importer::shipment_importer_trait::RecordValidator;

pub struct ShipmentValidator {
    locale: String,
    cleaner: DataCleaner,
}

impl ShipmentValidator {
    /// # Arguments
    /// * `locale` - language of the produced messages
    pub fn new(locale: &str) -> Self {
        Self {
            locale: locale.to_string(),
            cleaner: DataCleaner,
        }
    }

    pub fn locale(&self) -> &str {
        &self.locale
    }

    fn message(&self, key: &str) -> String {
        t_in(&self.locale, key)
    }
}

impl RecordValidator for ShipmentValidator {
    fn validate(&self, record: &ImportRecord) -> Vec<String> {
        let mut errors = Vec::new();

        if record.recipient_name.trim().is_empty() {
            errors.push(self.message("validation.name_required"));
        }

        let phone = record.recipient_phone.trim();
        if phone.is_empty() {
            errors.push(self.message("validation.phone_required"));
        } else if !self.cleaner.is_valid_phone(phone) {
            errors.push(self.message("validation.phone_invalid"));
        }

        if record.recipient_address.trim().is_empty() {
            errors.push(self.message("validation.address_required"));
        }

        if record.recipient_city.trim().is_empty() {
            errors.push(self.message("validation.city_required"));
        }

        if record.cod_amount < 0.0 {
            errors.push(self.message("validation.amount_negative"));
        }

        errors
    }
}

/// Run the validator and store its result on the record
pub fn revalidate(validator: &dyn RecordValidator, record: &mut ImportRecord) {
    record.errors = validator.validate(record);
}

/// Flat display line for a record with errors, e.g. "الصف 2: رقم الهاتف مطلوب"
pub fn report_line(locale: &str, record: &ImportRecord) -> Option<String> {
    if record.is_clean() {
        return None;
    }
    let row = record.row_number.to_string();
    let errors = record.errors.join(", ");
    Some(t_in_with_args(
        locale,
        "report.row_line",
        &[("row", &row), ("errors", &errors)],
    ))
}

/// Report lines for every record with errors, in record order
pub fn collect_report_lines(locale: &str, records: &[ImportRecord]) -> Vec<String> {
    records
        .iter()
        .filter_map(|r| report_line(locale, r))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clean_record() -> ImportRecord {
        ImportRecord {
            row_number: 2,
            tracking_number: "EG-1".to_string(),
            recipient_name: "Ali".to_string(),
            recipient_phone: "01098765432".to_string(),
            recipient_address: "Cairo St 1".to_string(),
            recipient_city: "Cairo".to_string(),
            cod_amount: 150.0,
            ..Default::default()
        }
    }

    #[test]
    fn test_clean_record_has_no_errors() {
        let validator = ShipmentValidator::new("ar");
        assert!(validator.validate(&clean_record()).is_empty());
    }

    #[test]
    fn test_empty_tracking_number_is_not_an_error() {
        let validator = ShipmentValidator::new("ar");
        let record = ImportRecord {
            tracking_number: String::new(),
            ..clean_record()
        };
        assert!(validator.validate(&record).is_empty());
    }

    #[test]
    fn test_short_phone_yields_single_format_error() {
        let validator = ShipmentValidator::new("ar");
        let record = ImportRecord {
            recipient_phone: "0109876543".to_string(),
            ..clean_record()
        };

        let errors = validator.validate(&record);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].starts_with("رقم الهاتف غير صحيح"));
    }

    #[test]
    fn test_phone_rules() {
        let validator = ShipmentValidator::new("en");
        for bad in ["02098765432", "0109876543a", "010987654321", "١٠٩٨٧٦٥٤٣٢١"] {
            let record = ImportRecord {
                recipient_phone: bad.to_string(),
                ..clean_record()
            };
            assert_eq!(validator.validate(&record).len(), 1, "phone {bad}");
        }

        let record = ImportRecord {
            recipient_phone: "   ".to_string(),
            ..clean_record()
        };
        assert_eq!(
            validator.validate(&record),
            vec![t_in("en", "validation.phone_required")]
        );
    }

    #[test]
    fn test_all_errors_collected_in_rule_order() {
        let validator = ShipmentValidator::new("en");
        let record = ImportRecord {
            row_number: 5,
            tracking_number: String::new(),
            recipient_name: " ".to_string(),
            recipient_phone: String::new(),
            recipient_address: String::new(),
            recipient_city: String::new(),
            cod_amount: -10.0,
            ..Default::default()
        };

        let errors = validator.validate(&record);
        assert_eq!(
            errors,
            vec![
                t_in("en", "validation.name_required"),
                t_in("en", "validation.phone_required"),
                t_in("en", "validation.address_required"),
                t_in("en", "validation.city_required"),
                t_in("en", "validation.amount_negative"),
            ]
        );
    }

    #[test]
    fn test_zero_amount_is_valid() {
        let validator = ShipmentValidator::new("ar");
        let record = ImportRecord {
            cod_amount: 0.0,
            ..clean_record()
        };
        assert!(validator.validate(&record).is_empty());
    }

    #[test]
    fn test_report_line_format() {
        let validator = ShipmentValidator::new("ar");
        let mut record = ImportRecord {
            recipient_phone: "0109876543".to_string(),
            ..clean_record()
        };
        revalidate(&validator, &mut record);

        let line = report_line("ar", &record).unwrap();
        assert!(line.starts_with("الصف 2: رقم الهاتف غير صحيح"));

        let lines = collect_report_lines("ar", &[clean_record(), record]);
        assert_eq!(lines.len(), 1);
    }

    #[test]
    fn test_report_line_joins_with_comma() {
        let record = ImportRecord {
            row_number: 7,
            errors: vec!["a".to_string(), "b".to_string()],
            ..Default::default()
        };
        assert_eq!(report_line("en", &record).unwrap(), "Row 7: a, b");
    }
}
