// ==========================================
// Shipment Import - CLI Entry
// ==========================================
// Commands: template / preview / import / list
// Stack: clap + tokio + SQLite
// ==========================================

mod cli;

use anyhow::Context;
use clap::Parser;
use cli::{Cli, Command};
use shipment_import::api::{ApiError, ImportApi, PreviewSummary};
use shipment_import::db::get_default_db_path;
use shipment_import::i18n::{self, t_in, t_in_with_args, DEFAULT_LOCALE};
use shipment_import::importer::ImportSession;
use shipment_import::logging;
use std::io::Write;
use std::path::Path;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if cli.json_logs {
        logging::init_json();
    } else {
        logging::init();
    }

    tracing::info!(version = shipment_import::VERSION, "{} starting", shipment_import::APP_NAME);
    run(cli).await
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let db_path = cli.db.clone().unwrap_or_else(get_default_db_path);
    tracing::info!(db_path = %db_path, "using database");

    let mut api = ImportApi::open(&db_path)
        .map_err(|e| localized(DEFAULT_LOCALE, e))
        .with_context(|| format!("opening {}", db_path))?;
    if let Some(locale) = &cli.locale {
        api = api.with_locale(locale);
    }

    let settings = api
        .settings()
        .await
        .map_err(|e| localized(DEFAULT_LOCALE, e))?;
    let locale = settings.locale.as_str();
    i18n::set_locale(locale);
    let today = chrono::Local::now().date_naive();

    match cli.command {
        Command::Template { dir } => {
            let path = api
                .download_template(&dir, today)
                .await
                .map_err(|e| localized(locale, e))?;
            let path = path.display().to_string();
            println!("{}", t_in_with_args(locale, "cli.template_saved", &[("path", &path)]));
        }

        Command::Preview { file, json } => {
            let session = api
                .preview_file(&file)
                .await
                .map_err(|e| localized(locale, e))?;
            let summary = PreviewSummary::from(&session);
            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                print_summary(locale, &summary);
            }
        }

        Command::Import {
            file,
            export_errors,
        } => {
            let mut session = api
                .preview_file(&file)
                .await
                .map_err(|e| localized(locale, e))?;
            print_summary(locale, &PreviewSummary::from(&session));

            if session.error_count() > 0 {
                if let Some(dir) = &export_errors {
                    let path = api
                        .export_validation_errors(&session, dir, today)
                        .await
                        .map_err(|e| localized(locale, e))?;
                    print_report_saved(locale, &path);
                }
            }

            let outcome = api
                .submit(&mut session, |progress| {
                    let percent = progress.percent.to_string();
                    eprint!(
                        "\r{}",
                        t_in_with_args(locale, "cli.progress", &[("percent", &percent)])
                    );
                    let _ = std::io::stderr().flush();
                })
                .await
                .map_err(|e| localized(locale, e))?;
            eprintln!();

            println!("{}", api.completion_message(locale, &outcome));
            for error in &outcome.errors {
                println!("  {}: {}", error.identifier, error.message);
            }

            if outcome.has_failures() {
                if let Some(dir) = &export_errors {
                    export_submission_report(&api, locale, &session, dir, today).await?;
                }
            }
        }

        Command::List { limit } => {
            let rows = api
                .list_shipments(limit)
                .await
                .map_err(|e| localized(locale, e))?;
            if rows.is_empty() {
                println!("{}", t_in(locale, "cli.no_shipments"));
            }
            for row in rows {
                println!("{}", serde_json::Value::Object(row));
            }
        }
    }

    Ok(())
}

async fn export_submission_report(
    api: &ImportApi,
    locale: &str,
    session: &ImportSession,
    dir: &Path,
    today: chrono::NaiveDate,
) -> anyhow::Result<()> {
    let path = api
        .export_submission_errors(session, dir, today)
        .await
        .map_err(|e| localized(locale, e))?;
    print_report_saved(locale, &path);
    Ok(())
}

fn print_summary(locale: &str, summary: &PreviewSummary) {
    let total = summary.total.to_string();
    let clean = summary.clean.to_string();
    let errors = summary.with_errors.to_string();
    println!(
        "{}",
        t_in_with_args(
            locale,
            "cli.preview_summary",
            &[("total", &total), ("clean", &clean), ("errors", &errors)],
        )
    );
    for line in &summary.report_lines {
        println!("  {}", line);
    }
}

fn print_report_saved(locale: &str, path: &Path) {
    let path = path.display().to_string();
    println!("{}", t_in_with_args(locale, "cli.report_saved", &[("path", &path)]));
}

/// Log the technical error, surface the localized one
fn localized(locale: &str, err: ApiError) -> anyhow::Error {
    tracing::error!(error = %err, "command failed");
    anyhow::anyhow!(err.user_message(locale))
}
