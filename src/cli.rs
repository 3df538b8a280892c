//! CLI argument parsing for the shipment-import binary.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "shipment-import",
    version,
    about = "Bulk-import shipments from Excel or CSV sheets"
)]
pub struct Cli {
    /// SQLite database file (default: SHIPMENT_IMPORT_DB_PATH or the user data directory)
    #[arg(long, global = true)]
    pub db: Option<String>,

    /// Message language: ar or en (default: configured import.message_locale)
    #[arg(long, global = true)]
    pub locale: Option<String>,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Save the blank shipment template into a directory
    Template {
        /// Output directory
        #[arg(default_value = ".")]
        dir: PathBuf,
    },
    /// Parse and validate a sheet without submitting it
    Preview {
        file: PathBuf,
        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },
    /// Validate a sheet and submit its shipments
    Import {
        file: PathBuf,
        /// Write error reports into this directory
        #[arg(long, value_name = "DIR")]
        export_errors: Option<PathBuf>,
    },
    /// Show the most recent shipments
    List {
        #[arg(long, default_value_t = 20)]
        limit: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_cli_import_with_export_dir() {
        let cli = Cli::parse_from([
            "shipment-import",
            "--locale",
            "en",
            "import",
            "orders.xlsx",
            "--export-errors",
            "out",
        ]);
        assert_eq!(cli.locale.as_deref(), Some("en"));
        match cli.command {
            Command::Import {
                file,
                export_errors,
            } => {
                assert_eq!(file, PathBuf::from("orders.xlsx"));
                assert_eq!(export_errors, Some(PathBuf::from("out")));
            }
            _ => panic!("expected import command"),
        }
    }

    #[test]
    fn test_cli_list_default_limit() {
        let cli = Cli::parse_from(["shipment-import", "list"]);
        assert!(matches!(cli.command, Command::List { limit: 20 }));
    }

    #[test]
    fn test_cli_global_db_after_subcommand() {
        let cli = Cli::parse_from(["shipment-import", "template", "--db", "x.db"]);
        assert_eq!(cli.db.as_deref(), Some("x.db"));
        assert!(matches!(cli.command, Command::Template { .. }));
    }
}
