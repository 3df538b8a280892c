// ==========================================
// Shipment Import - Import Session
// ==========================================
// All per-file state: records, report lines, submission outcome.
// Created per file selection, dropped on clear. Nothing is global.
// ==========================================

use crate::config::ImportSettings;
use crate::domain::{ImportOutcome, ImportRecord, SubmitProgress};
use crate::importer::bulk_submitter::BulkSubmitter;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::record_validator::{collect_report_lines, revalidate};
use crate::importer::sheet_writer::{
    submission_error_report_records, validation_report_records, KeyedRecord,
};
use crate::importer::shipment_importer::MappedSheet;
use crate::importer::shipment_importer_trait::RecordValidator;
use crate::repository::RowStore;
use chrono::{DateTime, Utc};
use tracing::{info, warn};
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct ImportSession {
    session_id: String,
    file_name: String,
    created_at: DateTime<Utc>,
    locale: String,
    records: Vec<ImportRecord>,
    report_lines: Vec<String>,
    outcome: Option<ImportOutcome>,
}

impl ImportSession {
    pub fn new(file_name: &str, locale: &str, mapped: MappedSheet) -> Self {
        let session = Self {
            session_id: Uuid::new_v4().to_string(),
            file_name: file_name.to_string(),
            created_at: Utc::now(),
            locale: locale.to_string(),
            records: mapped.records,
            report_lines: mapped.report_lines,
            outcome: None,
        };
        info!(
            session_id = %session.session_id,
            file = %session.file_name,
            records = session.records.len(),
            "import session opened"
        );
        session
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn locale(&self) -> &str {
        &self.locale
    }

    pub fn records(&self) -> &[ImportRecord] {
        &self.records
    }

    pub fn report_lines(&self) -> &[String] {
        &self.report_lines
    }

    pub fn outcome(&self) -> Option<&ImportOutcome> {
        self.outcome.as_ref()
    }

    pub fn clean_count(&self) -> usize {
        self.records.iter().filter(|r| r.is_clean()).count()
    }

    pub fn error_count(&self) -> usize {
        self.records.len() - self.clean_count()
    }

    /// Submittable: not yet submitted, no record with errors, at least one record
    pub fn can_submit(&self) -> bool {
        self.outcome.is_none() && self.error_count() == 0 && !self.records.is_empty()
    }

    /// Replace a record after a user edit and validate it again
    ///
    /// The row number of the original record is kept.
    pub fn update_record(
        &mut self,
        index: usize,
        mut record: ImportRecord,
        validator: &dyn RecordValidator,
    ) -> ImportResult<&ImportRecord> {
        let slot = self
            .records
            .get_mut(index)
            .ok_or(ImportError::RecordNotFound(index))?;
        record.row_number = slot.row_number;
        revalidate(validator, &mut record);
        *slot = record;

        self.refresh_report();
        Ok(&self.records[index])
    }

    /// Drop a record from the batch
    pub fn remove_record(&mut self, index: usize) -> ImportResult<ImportRecord> {
        if index >= self.records.len() {
            return Err(ImportError::RecordNotFound(index));
        }
        let removed = self.records.remove(index);
        self.refresh_report();
        Ok(removed)
    }

    fn refresh_report(&mut self) {
        self.report_lines = collect_report_lines(&self.locale, &self.records);
    }

    /// Submit every record through the bulk submitter
    ///
    /// # Errors
    /// - AlreadySubmitted: the session already holds an outcome
    /// - UnresolvedRecordErrors: some record still has errors
    /// - NothingToSubmit: the session has no records
    pub async fn submit<F>(
        &mut self,
        store: &dyn RowStore,
        settings: &ImportSettings,
        on_progress: F,
    ) -> ImportResult<&ImportOutcome>
    where
        F: FnMut(&SubmitProgress),
    {
        if self.outcome.is_some() {
            return Err(ImportError::AlreadySubmitted);
        }
        let unresolved = self.error_count();
        if unresolved > 0 {
            warn!(session_id = %self.session_id, unresolved, "submit refused");
            return Err(ImportError::UnresolvedRecordErrors(unresolved));
        }
        if self.records.is_empty() {
            return Err(ImportError::NothingToSubmit);
        }

        let outcome =
            BulkSubmitter::submit(store, settings, self.records.clone(), on_progress).await;
        info!(
            session_id = %self.session_id,
            success = outcome.success_count,
            failed = outcome.failed_count,
            "import session submitted"
        );
        let stored = self.outcome.insert(outcome);
        Ok(&*stored)
    }

    /// Rows of the validation error report
    pub fn validation_report(&self) -> Vec<KeyedRecord> {
        validation_report_records(&self.locale, &self.report_lines)
    }

    /// Rows of the submission error report (empty before submit)
    pub fn submission_error_report(&self) -> Vec<KeyedRecord> {
        self.outcome
            .as_ref()
            .map(|outcome| submission_error_report_records(&self.locale, outcome))
            .unwrap_or_default()
    }
}
