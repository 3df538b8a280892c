// ==========================================
// ImportApi end-to-end tests
// ==========================================
// Real SQLite row store + config table, files on disk
// ==========================================

mod test_helpers;

use chrono::NaiveDate;
use shipment_import::api::{ApiError, ImportApi, PreviewSummary};
use shipment_import::config::{config_keys, ConfigManager, ImportSettings};
use shipment_import::domain::CellValue;
use shipment_import::importer::{ImportError, UniversalFileParser};
use std::sync::Arc;
use test_helpers::*;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()
}

#[tokio::test]
async fn test_template_import_and_duplicate_rejection() {
    shipment_import::logging::init_test();
    let (_db, db_path) = create_test_db().unwrap();
    let dir = tempfile::tempdir().unwrap();
    let api = ImportApi::open(&db_path).unwrap();

    let template = api.download_template(dir.path(), today()).await.unwrap();
    assert_eq!(
        template.file_name().unwrap().to_str().unwrap(),
        "shipments_template_2024-05-01.xlsx"
    );

    // First run: both example rows go in
    let mut session = api.preview_file(&template).await.unwrap();
    let summary = PreviewSummary::from(&session);
    assert_eq!((summary.total, summary.clean, summary.with_errors), (2, 2, 0));

    let mut percents = Vec::new();
    let outcome = api
        .submit(&mut session, |p| percents.push(p.percent))
        .await
        .unwrap();
    assert_eq!(outcome.success_count, 2);
    assert_eq!(percents, vec![50, 100]);

    let rows = api.list_shipments(10).await.unwrap();
    assert_eq!(rows.len(), 2);
    let mut tracking: Vec<String> = rows
        .iter()
        .map(|r| r["tracking_number"].as_str().unwrap().to_string())
        .collect();
    tracking.sort();
    assert_eq!(tracking[0], "EG-1001");
    assert!(tracking[1].starts_with("SHP-"));
    assert!(rows.iter().all(|r| r["status"] == "pending" && r["source"] == "excel_import"));

    // Second run with a new prefix: EG-1001 already exists
    let config = ConfigManager::new(&db_path).unwrap();
    config
        .set_config_value(config_keys::TRACKING_PREFIX, "RUN2")
        .unwrap();

    let mut session = api.preview_file(&template).await.unwrap();
    let outcome = api.submit(&mut session, |_| {}).await.unwrap();
    assert_eq!(outcome.success_count, 1);
    assert_eq!(outcome.failed_count, 1);
    assert_eq!(outcome.errors[0].identifier, "EG-1001");
    assert_eq!(api.store().count_rows("shipments").await.unwrap(), 3);

    let report = api
        .export_submission_errors(&session, dir.path(), today())
        .await
        .unwrap();
    assert!(report.ends_with("import_errors_2024-05-01.xlsx"));
    let bytes = std::fs::read(&report).unwrap();
    let sheet = UniversalFileParser::new(&ImportSettings::default())
        .parse("report.xlsx", &bytes)
        .unwrap();
    assert_eq!(sheet.row_count(), 2);
    assert!(sheet.rows[1][1].as_text().starts_with("EG-1001: "));

    // A session is submitted once
    let again = api.submit(&mut session, |_| {}).await.unwrap_err();
    assert!(matches!(again, ApiError::Import(ImportError::AlreadySubmitted)));
}

#[tokio::test]
async fn test_rows_with_errors_block_submission() {
    let (_db, db_path) = create_test_db().unwrap();
    let dir = tempfile::tempdir().unwrap();
    let api = ImportApi::open(&db_path).unwrap();
    let file = write_xlsx(
        dir.path(),
        "orders.xlsx",
        &[
            arabic_header(),
            shipment_row("EG-1", "01098765432", 10.0),
            shipment_row("EG-2", "0109876543", 20.0),
        ],
    );

    let mut session = api.preview_file(&file).await.unwrap();
    assert_eq!(session.error_count(), 1);

    let err = api.submit(&mut session, |_| {}).await.unwrap_err();
    assert!(matches!(
        err,
        ApiError::Import(ImportError::UnresolvedRecordErrors(1))
    ));
    assert!(err.user_message("ar").contains('1'));
    assert_eq!(api.store().count_rows("shipments").await.unwrap(), 0);

    let report = api
        .export_validation_errors(&session, dir.path(), today())
        .await
        .unwrap();
    let sheet = UniversalFileParser::new(&ImportSettings::default())
        .parse("report.xlsx", &std::fs::read(report).unwrap())
        .unwrap();
    assert!(sheet.rows[1][1].as_text().starts_with("الصف 3: رقم الهاتف غير صحيح"));

    // Fix the phone and try again
    let mut fixed = session.records()[1].clone();
    fixed.recipient_phone = "01098765439".to_string();
    let updated = api.update_record(&mut session, 1, fixed).unwrap();
    assert!(updated.is_clean());

    let outcome = api.submit(&mut session, |_| {}).await.unwrap();
    assert_eq!(outcome.success_count, 2);
}

#[tokio::test]
async fn test_file_level_errors() {
    let (_db, db_path) = create_test_db().unwrap();
    let dir = tempfile::tempdir().unwrap();
    let api = ImportApi::open(&db_path).unwrap().with_locale("en");

    let missing = api
        .preview_file(dir.path().join("nope.xlsx"))
        .await
        .unwrap_err();
    assert!(matches!(missing, ApiError::Import(ImportError::FileNotFound(_))));

    let txt = dir.path().join("orders.txt");
    std::fs::write(&txt, "hello").unwrap();
    let unsupported = api.preview_file(&txt).await.unwrap_err();
    assert!(unsupported.user_message("en").contains(".xlsx"));

    let mut header = arabic_header();
    header.retain(|c| *c != CellValue::from("المبلغ"));
    let no_amount = write_xlsx(dir.path(), "no_amount.xlsx", &[header, vec![CellValue::from("x")]]);
    let err = api.preview_file(&no_amount).await.unwrap_err();
    assert_eq!(
        err.user_message("ar"),
        "الأعمدة التالية غير موجودة في الملف: المبلغ"
    );

    let config = ConfigManager::new(&db_path).unwrap();
    config
        .set_config_value(config_keys::MAX_FILE_SIZE_BYTES, "100")
        .unwrap();
    let big = write_xlsx(
        dir.path(),
        "big.xlsx",
        &[arabic_header(), shipment_row("EG-1", "01098765432", 1.0)],
    );
    let err = api.preview_file(&big).await.unwrap_err();
    assert!(matches!(err, ApiError::Import(ImportError::FileTooLarge { .. })));
}

#[tokio::test]
async fn test_list_shipments_newest_first_with_limit() {
    let (_db, db_path) = create_test_db().unwrap();
    let api = ImportApi::open(&db_path).unwrap();
    let bytes = xlsx_bytes(&[
        arabic_header(),
        shipment_row("EG-1", "01098765432", 10.0),
        shipment_row("EG-2", "01098765432", 20.0),
        shipment_row("EG-3", "01098765432", 30.0),
    ]);

    let mut session = api.preview_bytes("orders.xlsx", &bytes).await.unwrap();
    api.submit(&mut session, |_| {}).await.unwrap();

    let rows = api.list_shipments(2).await.unwrap();
    let tracking: Vec<&str> = rows
        .iter()
        .map(|r| r["tracking_number"].as_str().unwrap())
        .collect();
    assert_eq!(tracking, vec!["EG-3", "EG-2"]);
    assert!(matches!(
        api.list_shipments(0).await,
        Err(ApiError::InvalidInput(_))
    ));
}

#[tokio::test]
async fn test_api_over_injected_collaborators() {
    let store = Arc::new(FlakyRowStore::new(&[1]));
    let config = Arc::new(MockConfig::default());
    let api = ImportApi::new(store.clone(), config);

    let bytes = xlsx_bytes(&[
        arabic_header(),
        shipment_row("", "01098765432", 10.0),
        shipment_row("EG-2", "01098765432", 20.0),
    ]);
    let mut session = api.preview_bytes("orders.xlsx", &bytes).await.unwrap();
    let outcome = api.submit(&mut session, |_| {}).await.unwrap();

    assert_eq!(outcome.failed_count, 1);
    assert!(outcome.errors[0].identifier.starts_with("TST-"));
    assert_eq!(store.inserted().len(), 1);
    assert_eq!(
        api.completion_message("en", &outcome),
        "1 shipments imported successfully, 1 failed"
    );
}
