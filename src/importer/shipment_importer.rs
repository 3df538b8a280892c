// ==========================================
// Shipment Import - Shipment Importer
// ==========================================
// Responsibility: file -> RawSheet -> annotated records
// Flow: read -> parse -> resolve headers -> map rows -> validate -> report
// No network access; disk is touched only by read_and_parse
// ==========================================

use crate::config::ImportSettings;
use crate::domain::{ImportRecord, RawSheet};
use crate::importer::error::ImportResult;
use crate::importer::field_mapper::{describe_resolution, FieldMapper};
use crate::importer::file_parser::UniversalFileParser;
use crate::importer::record_validator::{collect_report_lines, ShipmentValidator};
use crate::importer::shipment_importer_trait::RecordValidator;
use std::path::Path;
use tracing::{debug, info, instrument, warn};

/// Records of one sheet plus their flat error report
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MappedSheet {
    pub records: Vec<ImportRecord>,
    pub report_lines: Vec<String>,
}

impl MappedSheet {
    pub fn clean_count(&self) -> usize {
        self.records.iter().filter(|r| r.is_clean()).count()
    }

    pub fn error_count(&self) -> usize {
        self.records.len() - self.clean_count()
    }
}

// ==========================================
// ShipmentImporter
// ==========================================
pub struct ShipmentImporter {
    settings: ImportSettings,
    file_parser: UniversalFileParser,
    field_mapper: FieldMapper,
    validator: Box<dyn RecordValidator>,
}

impl ShipmentImporter {
    /// Importer with the default validator in the settings' locale
    pub fn new(settings: ImportSettings) -> Self {
        let validator = Box::new(ShipmentValidator::new(&settings.locale));
        Self::with_validator(settings, validator)
    }

    pub fn with_validator(settings: ImportSettings, validator: Box<dyn RecordValidator>) -> Self {
        Self {
            file_parser: UniversalFileParser::new(&settings),
            field_mapper: FieldMapper::new(),
            settings,
            validator,
        }
    }

    pub fn settings(&self) -> &ImportSettings {
        &self.settings
    }

    pub fn validator(&self) -> &dyn RecordValidator {
        self.validator.as_ref()
    }

    /// Read a file from disk and run the whole preview step
    ///
    /// # Returns
    /// - (file name, mapped sheet)
    #[instrument(skip(self, file_path), fields(path = %file_path.as_ref().display()))]
    pub async fn read_and_parse<P: AsRef<Path>>(
        &self,
        file_path: P,
    ) -> ImportResult<(String, MappedSheet)> {
        let (file_name, bytes) = self.file_parser.read_upload(file_path).await?;
        let mapped = self.load_bytes(&file_name, &bytes)?;
        Ok((file_name, mapped))
    }

    /// Parse an in-memory upload and map it
    pub fn load_bytes(&self, file_name: &str, bytes: &[u8]) -> ImportResult<MappedSheet> {
        let sheet = self.parse_bytes(file_name, bytes)?;
        self.map_sheet(&sheet)
    }

    pub fn parse_bytes(&self, file_name: &str, bytes: &[u8]) -> ImportResult<RawSheet> {
        self.file_parser.parse(file_name, bytes)
    }

    /// Header resolution, row mapping and validation
    ///
    /// Fails before producing any record when a required column is missing.
    pub fn map_sheet(&self, sheet: &RawSheet) -> ImportResult<MappedSheet> {
        let header = sheet.header();
        let resolution = self.field_mapper.resolve_headers(header).map_err(|e| {
            warn!(error = %e, "header resolution failed");
            e
        })?;
        debug!(columns = ?describe_resolution(&resolution, header), "headers resolved");

        let mut records = Vec::new();
        let mut skipped = 0usize;
        for (row_number, row) in sheet.data_rows() {
            match self.field_mapper.map_row(&resolution, row_number, row) {
                Some(mut record) => {
                    record.errors = self.validator.validate(&record);
                    records.push(record);
                }
                None => skipped += 1,
            }
        }

        let report_lines = collect_report_lines(&self.settings.locale, &records);
        let mapped = MappedSheet {
            records,
            report_lines,
        };

        info!(
            records = mapped.records.len(),
            clean = mapped.clean_count(),
            with_errors = mapped.error_count(),
            skipped_blank = skipped,
            "sheet mapped"
        );
        Ok(mapped)
    }
}
