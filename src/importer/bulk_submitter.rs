// ==========================================
// Shipment Import - Bulk Submitter
// ==========================================
// Responsibility: persist clean records one at a time
// - sequential: each insert is awaited before the next
// - no batching, no transaction: earlier rows stay committed on failure
// - one failed insert never stops the run
// ==========================================

use crate::config::ImportSettings;
use crate::domain::{ImportOutcome, ImportRecord, NewShipment, SubmitProgress};
use crate::repository::{RepositoryError, RepositoryResult, Row, RowStore};
use chrono::{DateTime, Utc};
use serde_json::Value;
use tracing::{debug, info, instrument, warn};

// ==========================================
// SubmissionRun - stepper over one batch
// ==========================================
pub struct SubmissionRun<'a> {
    store: &'a dyn RowStore,
    table: String,
    tracking_prefix: String,
    run_started_at: DateTime<Utc>,
    records: Vec<ImportRecord>,
    position: usize,
    outcome: ImportOutcome,
}

impl<'a> SubmissionRun<'a> {
    /// Prepare a run; records with errors are dropped here and never attempted
    pub fn new(store: &'a dyn RowStore, settings: &ImportSettings, records: Vec<ImportRecord>) -> Self {
        let offered = records.len();
        let records: Vec<ImportRecord> = records.into_iter().filter(|r| r.is_clean()).collect();
        if records.len() < offered {
            warn!(
                dropped = offered - records.len(),
                "records with errors excluded from submission"
            );
        }

        Self {
            store,
            table: settings.shipment_table.clone(),
            tracking_prefix: settings.tracking_prefix.clone(),
            run_started_at: Utc::now(),
            records,
            position: 0,
            outcome: ImportOutcome::default(),
        }
    }

    /// Number of records that will be attempted
    pub fn total(&self) -> usize {
        self.records.len()
    }

    pub fn is_finished(&self) -> bool {
        self.position >= self.records.len()
    }

    pub fn outcome(&self) -> &ImportOutcome {
        &self.outcome
    }

    pub fn into_outcome(self) -> ImportOutcome {
        self.outcome
    }

    /// Attempt the next record
    ///
    /// # Returns
    /// - Some(progress) after one insert attempt
    /// - None once every record has been attempted
    pub async fn step(&mut self) -> Option<SubmitProgress> {
        let index = self.position;
        let record = self.records.get(index)?;
        self.position += 1;

        let tracking_number =
            resolve_tracking_number(record, &self.tracking_prefix, self.run_started_at);
        let shipment = NewShipment::from_record(record, tracking_number.clone(), Utc::now());

        let succeeded = match self.insert(shipment).await {
            Ok(id) => {
                debug!(tracking = %tracking_number, id, "shipment inserted");
                self.outcome.record_success();
                true
            }
            Err(e) => {
                warn!(tracking = %tracking_number, error = %e, "shipment insert failed");
                self.outcome.record_failure(tracking_number.clone(), e.to_string());
                false
            }
        };

        let total = self.records.len();
        Some(SubmitProgress {
            index,
            total,
            percent: progress_percent(index, total),
            identifier: tracking_number,
            succeeded,
            success_so_far: self.outcome.success_count,
            failed_so_far: self.outcome.failed_count,
        })
    }

    async fn insert(&self, shipment: NewShipment) -> RepositoryResult<i64> {
        let row = shipment_row(&shipment)?;
        self.store.insert_row(&self.table, row).await
    }
}

/// Serialize a shipment into a store row
fn shipment_row(shipment: &NewShipment) -> RepositoryResult<Row> {
    match serde_json::to_value(shipment)? {
        Value::Object(map) => Ok(map),
        other => Err(RepositoryError::SerializationError(format!(
            "shipment serialized to non-object: {}",
            other
        ))),
    }
}

/// Tracking number to persist: the sheet's value, or `<prefix>-<run millis>-<row>`
pub fn resolve_tracking_number(
    record: &ImportRecord,
    prefix: &str,
    run_started_at: DateTime<Utc>,
) -> String {
    let given = record.tracking_number.trim();
    if given.is_empty() {
        format!(
            "{}-{}-{}",
            prefix,
            run_started_at.timestamp_millis(),
            record.row_number
        )
    } else {
        given.to_string()
    }
}

/// round((index + 1) / total * 100), 100 for an empty batch
pub fn progress_percent(index: usize, total: usize) -> u32 {
    if total == 0 {
        return 100;
    }
    (((index + 1) as f64 / total as f64) * 100.0).round() as u32
}

// ==========================================
// BulkSubmitter - drives a run to completion
// ==========================================
pub struct BulkSubmitter;

impl BulkSubmitter {
    /// Submit every clean record, reporting progress after each attempt
    #[instrument(skip_all, fields(table = %settings.shipment_table, records = records.len()))]
    pub async fn submit<F>(
        store: &dyn RowStore,
        settings: &ImportSettings,
        records: Vec<ImportRecord>,
        mut on_progress: F,
    ) -> ImportOutcome
    where
        F: FnMut(&SubmitProgress),
    {
        let mut run = SubmissionRun::new(store, settings, records);
        info!(total = run.total(), "submission started");

        while let Some(progress) = run.step().await {
            on_progress(&progress);
        }

        let outcome = run.into_outcome();
        info!(
            success = outcome.success_count,
            failed = outcome.failed_count,
            "submission finished"
        );
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::RowQuery;
    use async_trait::async_trait;
    use chrono::TimeZone;
    use std::sync::Mutex;

    /// Fails the insert at the given 0-based call index
    struct MockStore {
        rows: Mutex<Vec<(String, Row)>>,
        calls: Mutex<usize>,
        fail_at: Option<usize>,
    }

    impl MockStore {
        fn new(fail_at: Option<usize>) -> Self {
            Self {
                rows: Mutex::new(Vec::new()),
                calls: Mutex::new(0),
                fail_at,
            }
        }
    }

    #[async_trait]
    impl RowStore for MockStore {
        async fn insert_row(&self, table: &str, row: Row) -> RepositoryResult<i64> {
            let mut calls = self.calls.lock().unwrap();
            let call = *calls;
            *calls += 1;
            if Some(call) == self.fail_at {
                return Err(RepositoryError::DatabaseQueryError("backend rejected row".into()));
            }
            let mut rows = self.rows.lock().unwrap();
            rows.push((table.to_string(), row));
            Ok(rows.len() as i64)
        }

        async fn select_rows(&self, _table: &str, _query: &RowQuery) -> RepositoryResult<Vec<Row>> {
            Ok(self.rows.lock().unwrap().iter().map(|(_, r)| r.clone()).collect())
        }

        async fn count_rows(&self, _table: &str) -> RepositoryResult<usize> {
            Ok(self.rows.lock().unwrap().len())
        }
    }

    fn clean(row_number: usize, tracking: &str) -> ImportRecord {
        ImportRecord {
            row_number,
            tracking_number: tracking.to_string(),
            recipient_name: "Ali".to_string(),
            recipient_phone: "01098765432".to_string(),
            recipient_address: "Cairo St 1".to_string(),
            recipient_city: "Cairo".to_string(),
            cod_amount: 100.0,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_second_insert_failure_does_not_stop_batch() {
        let store = MockStore::new(Some(1));
        let records = vec![clean(2, "EG-1"), clean(3, "EG-2"), clean(4, "EG-3")];

        let outcome =
            BulkSubmitter::submit(&store, &ImportSettings::default(), records, |_| {}).await;

        assert_eq!(outcome.success_count, 2);
        assert_eq!(outcome.failed_count, 1);
        assert_eq!(outcome.errors.len(), 1);
        assert_eq!(outcome.errors[0].identifier, "EG-2");
        assert_eq!(store.count_rows("shipments").await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_progress_is_monotonic_and_ends_at_100() {
        let store = MockStore::new(None);
        let records = (0..3).map(|i| clean(i + 2, &format!("EG-{i}"))).collect();

        let mut seen = Vec::new();
        BulkSubmitter::submit(&store, &ImportSettings::default(), records, |p| {
            seen.push(p.percent)
        })
        .await;

        assert_eq!(seen, vec![33, 67, 100]);
    }

    #[tokio::test]
    async fn test_dirty_records_are_never_sent() {
        let store = MockStore::new(None);
        let mut dirty = clean(3, "EG-bad");
        dirty.errors.push("phone".to_string());

        let mut run = SubmissionRun::new(
            &store,
            &ImportSettings::default(),
            vec![clean(2, "EG-1"), dirty],
        );
        assert_eq!(run.total(), 1);

        let progress = run.step().await.unwrap();
        assert!(progress.succeeded);
        assert_eq!(progress.percent, 100);
        assert!(run.step().await.is_none());
        assert!(run.is_finished());
        assert_eq!(run.outcome().attempted(), 1);
    }

    #[tokio::test]
    async fn test_row_shape_written_to_store() {
        let store = MockStore::new(None);
        BulkSubmitter::submit(
            &store,
            &ImportSettings::default(),
            vec![clean(2, "EG-1")],
            |_| {},
        )
        .await;

        let rows = store.rows.lock().unwrap();
        let (table, row) = &rows[0];
        assert_eq!(table, "shipments");
        assert_eq!(row["tracking_number"], "EG-1");
        assert_eq!(row["status"], NewShipment::STATUS_PENDING);
        assert_eq!(row["source"], NewShipment::SOURCE_EXCEL_IMPORT);
        assert_eq!(row["cod_amount"], 100.0);
        assert!(row["weight"].is_null());
    }

    #[test]
    fn test_generated_tracking_number() {
        let at = Utc.timestamp_millis_opt(1_700_000_000_123).unwrap();
        let record = clean(7, "  ");
        assert_eq!(
            resolve_tracking_number(&record, "SHP", at),
            "SHP-1700000000123-7"
        );
        assert_eq!(resolve_tracking_number(&clean(7, " EG-5 "), "SHP", at), "EG-5");
    }

    #[test]
    fn test_progress_percent_rounding() {
        assert_eq!(progress_percent(0, 3), 33);
        assert_eq!(progress_percent(1, 3), 67);
        assert_eq!(progress_percent(0, 8), 13);
        assert_eq!(progress_percent(7, 8), 100);
        assert_eq!(progress_percent(0, 0), 100);
    }

    #[tokio::test]
    async fn test_empty_batch() {
        let store = MockStore::new(None);
        let mut calls = 0;
        let outcome =
            BulkSubmitter::submit(&store, &ImportSettings::default(), Vec::new(), |_| calls += 1)
                .await;
        assert_eq!(calls, 0);
        assert_eq!(outcome.attempted(), 0);
    }
}
