//! CLI command for CSV import

use std::path::PathBuf;

use clap::Args;

use crate::config::settings::Settings;
use crate::error::{MoneyAgeError, MoneyAgeResult};
use crate::services::import::{ImportService, ImportStatus};
use crate::storage::Storage;

/// Arguments for `import`
#[derive(Args, Debug)]
pub struct ImportArgs {
    /// Path to CSV file
    pub file: PathBuf,

    /// Date format tried first (strftime), defaults to the configured one
    #[arg(long)]
    pub date_format: Option<String>,

    /// Field delimiter
    #[arg(long, default_value_t = ',')]
    pub delimiter: char,

    /// Show what would be imported without saving
    #[arg(long)]
    pub dry_run: bool,
}

/// Handle `import`
pub fn handle_import_command(storage: &Storage, settings: &Settings, args: ImportArgs) -> MoneyAgeResult<()> {
    if !args.delimiter.is_ascii() {
        return Err(MoneyAgeError::Validation(format!(
            "Delimiter must be a single ASCII character, got '{}'",
            args.delimiter
        )));
    }

    let service = ImportService::new(storage);
    let date_format = args
        .date_format
        .as_deref()
        .unwrap_or(&settings.import_date_format);
    let preview = service.preview_file(&args.file, date_format, args.delimiter as u8)?;

    if args.dry_run {
        for entry in &preview {
            let label = match &entry.status {
                ImportStatus::New => "new".to_string(),
                ImportStatus::Duplicate => "duplicate".to_string(),
                ImportStatus::Error(message) => format!("error: {}", message),
            };
            match &entry.transaction {
                Some(txn) => println!(
                    "row {:>4}  {}  {:>12}  {}  [{}]",
                    entry.row_number + 1,
                    txn.date,
                    txn.amount.format_with_symbol(&settings.currency_symbol),
                    txn.memo,
                    label
                ),
                None => println!("row {:>4}  [{}]", entry.row_number + 1, label),
            }
        }
        let new_rows = preview
            .iter()
            .filter(|e| e.status == ImportStatus::New)
            .count();
        println!("\nDry run: {} of {} rows would be imported.", new_rows, preview.len());
        return Ok(());
    }

    let result = service.import(preview)?;
    println!(
        "Imported {} transactions ({} duplicates skipped, {} errors).",
        result.imported, result.duplicates_skipped, result.errors
    );

    let mut rows: Vec<_> = result.error_messages.iter().collect();
    rows.sort_by_key(|(row, _)| **row);
    for (row, message) in rows {
        println!("  row {}: {}", row + 1, message);
    }

    Ok(())
}
