// ==========================================
// Shipment Import - Import API
// ==========================================
// Responsibility: compose the pipeline for hosts (CLI, services)
// preview -> fix -> submit -> export
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::config::{config_keys, defaults, ConfigManager, ImportConfigReader, ImportSettings};
use crate::db::open_sqlite_connection;
use crate::domain::{ImportOutcome, ImportRecord, SubmitProgress};
use crate::i18n::t_in_with_args;
use crate::importer::sheet_writer::{export_file_name, purposes, template_records};
use crate::importer::{ImportSession, SheetWriter, ShipmentImporter, ShipmentValidator};
use crate::repository::{Row, RowQuery, RowStore, SqliteRowStore};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing::{info, instrument};

/// Preview numbers for one session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreviewSummary {
    pub session_id: String,
    pub file_name: String,
    pub total: usize,
    pub clean: usize,
    pub with_errors: usize,
    pub report_lines: Vec<String>,
}

impl From<&ImportSession> for PreviewSummary {
    fn from(session: &ImportSession) -> Self {
        Self {
            session_id: session.session_id().to_string(),
            file_name: session.file_name().to_string(),
            total: session.records().len(),
            clean: session.clean_count(),
            with_errors: session.error_count(),
            report_lines: session.report_lines().to_vec(),
        }
    }
}

pub struct ImportApi {
    store: Arc<dyn RowStore>,
    config: Arc<dyn ImportConfigReader>,
    locale_override: Option<String>,
}

impl ImportApi {
    pub fn new(store: Arc<dyn RowStore>, config: Arc<dyn ImportConfigReader>) -> Self {
        Self {
            store,
            config,
            locale_override: None,
        }
    }

    /// Open row store and config on one SQLite file
    ///
    /// The configured shipment table gets a unique tracking_number key.
    pub fn open(db_path: &str) -> ApiResult<Self> {
        let conn = open_sqlite_connection(db_path)
            .map_err(|e| ApiError::DatabaseConnectionError(e.to_string()))?;
        let conn = Arc::new(Mutex::new(conn));

        let config = ConfigManager::from_connection(conn.clone())?;
        let table = config
            .get_config_value(config_keys::SHIPMENT_TABLE)?
            .unwrap_or_else(|| defaults::SHIPMENT_TABLE.to_string());
        let store = SqliteRowStore::from_connection(conn)?.with_unique_key(&table, "tracking_number")?;

        info!(db_path = %db_path, table = %table, "import api opened");
        Ok(Self::new(Arc::new(store), Arc::new(config)))
    }

    /// Force the message locale regardless of configuration
    pub fn with_locale(mut self, locale: &str) -> Self {
        self.locale_override = Some(locale.to_string());
        self
    }

    pub fn store(&self) -> &dyn RowStore {
        self.store.as_ref()
    }

    /// Settings snapshot for one operation
    pub async fn settings(&self) -> ApiResult<ImportSettings> {
        let settings = ImportSettings::load(self.config.as_ref()).await?;
        Ok(match &self.locale_override {
            Some(locale) => settings.with_locale(locale),
            None => settings,
        })
    }

    /// Read, parse, map and validate a file into a fresh session
    #[instrument(skip(self, file_path), fields(path = %file_path.as_ref().display()))]
    pub async fn preview_file<P: AsRef<Path>>(&self, file_path: P) -> ApiResult<ImportSession> {
        let settings = self.settings().await?;
        let locale = settings.locale.clone();
        let importer = ShipmentImporter::new(settings);

        let (file_name, mapped) = importer.read_and_parse(file_path).await?;
        Ok(ImportSession::new(&file_name, &locale, mapped))
    }

    /// Same as preview_file for an upload already in memory
    pub async fn preview_bytes(&self, file_name: &str, bytes: &[u8]) -> ApiResult<ImportSession> {
        let settings = self.settings().await?;
        let locale = settings.locale.clone();
        let importer = ShipmentImporter::new(settings);

        let mapped = importer.load_bytes(file_name, bytes)?;
        Ok(ImportSession::new(file_name, &locale, mapped))
    }

    /// Replace one record after a user edit and validate it again
    pub fn update_record(
        &self,
        session: &mut ImportSession,
        index: usize,
        record: ImportRecord,
    ) -> ApiResult<ImportRecord> {
        let validator = ShipmentValidator::new(session.locale());
        let updated = session.update_record(index, record, &validator)?;
        Ok(updated.clone())
    }

    /// Submit a session's records to the store
    pub async fn submit<F>(&self, session: &mut ImportSession, on_progress: F) -> ApiResult<ImportOutcome>
    where
        F: FnMut(&SubmitProgress),
    {
        let settings = self.settings().await?;
        let outcome = session
            .submit(self.store.as_ref(), &settings, on_progress)
            .await?;
        Ok(outcome.clone())
    }

    /// "N imported, M failed" in the given locale
    pub fn completion_message(&self, locale: &str, outcome: &ImportOutcome) -> String {
        let success = outcome.success_count.to_string();
        let failed = outcome.failed_count.to_string();
        t_in_with_args(
            locale,
            "import.completed",
            &[("success", &success), ("failed", &failed)],
        )
    }

    /// Save the blank template with two example rows
    pub async fn download_template(&self, dir: &Path, today: NaiveDate) -> ApiResult<PathBuf> {
        let settings = self.settings().await?;
        let writer = SheetWriter::for_locale(&settings.locale);
        let records = template_records(&settings.locale);
        let path = writer
            .save(&records, dir, &export_file_name(purposes::TEMPLATE, today))
            .await?;
        Ok(path)
    }

    pub async fn export_validation_errors(
        &self,
        session: &ImportSession,
        dir: &Path,
        today: NaiveDate,
    ) -> ApiResult<PathBuf> {
        let writer = SheetWriter::for_locale(session.locale());
        let path = writer
            .save(
                &session.validation_report(),
                dir,
                &export_file_name(purposes::VALIDATION_ERRORS, today),
            )
            .await?;
        Ok(path)
    }

    pub async fn export_submission_errors(
        &self,
        session: &ImportSession,
        dir: &Path,
        today: NaiveDate,
    ) -> ApiResult<PathBuf> {
        let writer = SheetWriter::for_locale(session.locale());
        let path = writer
            .save(
                &session.submission_error_report(),
                dir,
                &export_file_name(purposes::SUBMISSION_ERRORS, today),
            )
            .await?;
        Ok(path)
    }

    /// Most recent shipments first
    pub async fn list_shipments(&self, limit: usize) -> ApiResult<Vec<Row>> {
        if limit == 0 {
            return Err(ApiError::InvalidInput("limit must be positive".to_string()));
        }
        let settings = self.settings().await?;
        let query = RowQuery::new().order_by("created_at", true).limit(limit);
        let rows = self
            .store
            .select_rows(&settings.shipment_table, &query)
            .await?;
        Ok(rows)
    }
}
