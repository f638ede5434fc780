//! CSV Import service
//!
//! Imports bank or spreadsheet exports into the ledger: column mapping,
//! multi-format date parsing, duplicate detection, and batch import.

use std::collections::{HashMap, HashSet};
use std::io::Read;
use std::path::Path;

use chrono::NaiveDate;
use csv::{Reader, ReaderBuilder, StringRecord};
use tracing::{info, warn};

use crate::error::{MoneyAgeError, MoneyAgeResult};
use crate::models::{Money, Transaction};
use crate::storage::Storage;

/// Date formats tried after the configured one
const FALLBACK_DATE_FORMATS: [&str; 8] = [
    "%Y-%m-%d", "%m/%d/%Y", "%m/%d/%y", "%d/%m/%Y", "%d/%m/%y", "%Y/%m/%d", "%m-%d-%Y",
    "%d-%m-%Y",
];

/// Column mapping configuration for CSV import
#[derive(Debug, Clone)]
pub struct ColumnMapping {
    /// Index of the date column
    pub date_column: usize,
    /// Index of a single signed amount column
    pub amount_column: Option<usize>,
    /// Index of the outflow column (if using separate columns)
    pub outflow_column: Option<usize>,
    /// Index of the inflow column (if using separate columns)
    pub inflow_column: Option<usize>,
    /// Index of the memo/description column
    pub memo_column: Option<usize>,
    /// Index of an explicit transaction id column
    pub id_column: Option<usize>,
    /// Date format tried first (e.g., "%Y-%m-%d", "%m/%d/%Y")
    pub date_format: String,
    /// Whether the first row is a header
    pub has_header: bool,
    pub delimiter: u8,
    /// Flip signs (some banks export debits as positive)
    pub invert_amounts: bool,
}

impl Default for ColumnMapping {
    fn default() -> Self {
        Self {
            date_column: 0,
            amount_column: Some(1),
            outflow_column: None,
            inflow_column: None,
            memo_column: Some(2),
            id_column: None,
            date_format: "%Y-%m-%d".to_string(),
            has_header: true,
            delimiter: b',',
            invert_amounts: false,
        }
    }
}

impl ColumnMapping {
    /// Create a new column mapping (date, amount, memo)
    pub fn new() -> Self {
        Self::default()
    }

    /// Mapping for separate inflow/outflow columns
    pub fn separate_inout(date_col: usize, outflow_col: usize, inflow_col: usize) -> Self {
        Self {
            date_column: date_col,
            amount_column: None,
            outflow_column: Some(outflow_col),
            inflow_column: Some(inflow_col),
            memo_column: None,
            ..Self::default()
        }
    }

    /// Set the date format
    pub fn with_date_format(mut self, format: &str) -> Self {
        self.date_format = format.to_string();
        self
    }

    /// Set whether first row is header
    pub fn with_header(mut self, has_header: bool) -> Self {
        self.has_header = has_header;
        self
    }

    /// Set the delimiter
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Set the id column
    pub fn with_id_column(mut self, column: usize) -> Self {
        self.id_column = Some(column);
        self
    }

    /// Build a CSV reader honoring this mapping's header and delimiter
    pub fn reader<R: Read>(&self, source: R) -> Reader<R> {
        ReaderBuilder::new()
            .has_headers(self.has_header)
            .delimiter(self.delimiter)
            .flexible(true)
            .from_reader(source)
    }
}

/// A parsed row from the CSV before import
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedTransaction {
    pub date: NaiveDate,
    /// Amount (negative for outflow)
    pub amount: Money,
    pub memo: String,
    /// Explicit id from the file, if mapped
    pub id: Option<String>,
    /// Row number in the CSV (0-indexed, excluding header)
    pub row_number: usize,
    /// Fingerprint for duplicate detection
    pub import_id: String,
}

impl ParsedTransaction {
    /// Convert into a ledger transaction, generating an id when none was given
    pub fn into_transaction(self) -> Transaction {
        let id = self.id.unwrap_or_else(Transaction::generate_id);
        Transaction::new(id, self.date, self.amount).with_memo(self.memo)
    }
}

/// Status of a row in an import preview
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportStatus {
    /// Row will be imported
    New,
    /// Row matches an existing transaction and will be skipped
    Duplicate,
    /// Row could not be parsed
    Error(String),
}

/// Preview entry for import review
#[derive(Debug, Clone)]
pub struct ImportPreviewEntry {
    pub row_number: usize,
    /// The parsed row, when parsing succeeded
    pub transaction: Option<ParsedTransaction>,
    pub status: ImportStatus,
}

/// Result of a completed import
#[derive(Debug, Clone, Default)]
pub struct ImportResult {
    pub imported: usize,
    pub duplicates_skipped: usize,
    /// Number of rows with errors
    pub errors: usize,
    pub imported_ids: Vec<String>,
    /// Error messages by row
    pub error_messages: HashMap<usize, String>,
}

/// Service for CSV import
pub struct ImportService<'a> {
    storage: &'a Storage,
}

impl<'a> ImportService<'a> {
    /// Create a new import service
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Parse every record of a CSV reader, keeping per-row errors
    pub fn parse_csv_from_reader<R: Read>(
        &self,
        reader: &mut Reader<R>,
        mapping: &ColumnMapping,
    ) -> Vec<Result<ParsedTransaction, String>> {
        reader
            .records()
            .enumerate()
            .map(|(idx, result)| match result {
                Ok(record) => parse_record(&record, idx, mapping),
                Err(e) => Err(format!("Error reading CSV record: {}", e)),
            })
            .collect()
    }

    /// Classify parsed rows as new, duplicate or error
    pub fn preview(
        &self,
        parsed: Vec<Result<ParsedTransaction, String>>,
    ) -> MoneyAgeResult<Vec<ImportPreviewEntry>> {
        let mut known_fingerprints = self.storage.transactions.import_ids()?;
        let mut claimed_ids: HashSet<String> = HashSet::new();
        let mut preview = Vec::with_capacity(parsed.len());

        for (idx, row) in parsed.into_iter().enumerate() {
            let entry = match row {
                Err(message) => ImportPreviewEntry {
                    row_number: idx,
                    transaction: None,
                    status: ImportStatus::Error(message),
                },
                Ok(txn) => {
                    let id_taken = match &txn.id {
                        Some(id) => {
                            self.storage.transactions.contains(id)? || !claimed_ids.insert(id.clone())
                        }
                        None => false,
                    };
                    let status = if id_taken || !known_fingerprints.insert(txn.import_id.clone()) {
                        ImportStatus::Duplicate
                    } else {
                        ImportStatus::New
                    };
                    ImportPreviewEntry {
                        row_number: txn.row_number,
                        transaction: Some(txn),
                        status,
                    }
                }
            };
            preview.push(entry);
        }

        Ok(preview)
    }

    /// Import the `New` rows of a preview and persist the ledger
    pub fn import(&self, preview: Vec<ImportPreviewEntry>) -> MoneyAgeResult<ImportResult> {
        let mut result = ImportResult::default();

        for entry in preview {
            match (entry.status, entry.transaction) {
                (ImportStatus::New, Some(parsed)) => {
                    let txn = parsed.into_transaction();
                    result.imported_ids.push(txn.id.clone());
                    self.storage.transactions.upsert(txn)?;
                    result.imported += 1;
                }
                (ImportStatus::Duplicate, _) => result.duplicates_skipped += 1,
                (ImportStatus::Error(message), _) => {
                    warn!(row = entry.row_number, %message, "skipping CSV row");
                    result.errors += 1;
                    result.error_messages.insert(entry.row_number, message);
                }
                (ImportStatus::New, None) => {}
            }
        }

        if result.imported > 0 {
            self.storage.transactions.save()?;
        }

        info!(
            imported = result.imported,
            duplicates = result.duplicates_skipped,
            errors = result.errors,
            "CSV import finished"
        );
        Ok(result)
    }

    /// Parse and preview a CSV file, detecting the column mapping from its
    /// header row
    pub fn preview_file(
        &self,
        path: &Path,
        date_format: &str,
        delimiter: u8,
    ) -> MoneyAgeResult<Vec<ImportPreviewEntry>> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            MoneyAgeError::Import(format!("Failed to read {}: {}", path.display(), e))
        })?;
        let mut first_pass = ReaderBuilder::new()
            .has_headers(false)
            .delimiter(delimiter)
            .flexible(true)
            .from_reader(contents.as_bytes());
        let first_row = match first_pass.records().next() {
            Some(Ok(record)) => record,
            Some(Err(e)) => return Err(MoneyAgeError::Import(e.to_string())),
            None => return Err(MoneyAgeError::Import(format!("{} is empty", path.display()))),
        };

        let mapping = detect_mapping_from_headers(&first_row)
            .with_date_format(date_format)
            .with_delimiter(delimiter);
        let mut reader = mapping.reader(contents.as_bytes());
        let parsed = self.parse_csv_from_reader(&mut reader, &mapping);
        self.preview(parsed)
    }
}

/// Parse a single CSV record
fn parse_record(
    record: &StringRecord,
    row_number: usize,
    mapping: &ColumnMapping,
) -> Result<ParsedTransaction, String> {
    let date_str = record
        .get(mapping.date_column)
        .ok_or_else(|| "Missing date column".to_string())?
        .trim();
    let date = parse_date(date_str, &mapping.date_format)?;

    let amount = parse_amount_from_record(record, mapping)?;
    if amount.is_zero() {
        return Err("Amount is zero".to_string());
    }

    let memo = mapping
        .memo_column
        .and_then(|col| record.get(col))
        .map(|s| s.trim().to_string())
        .unwrap_or_default();

    let id = mapping
        .id_column
        .and_then(|col| record.get(col))
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from);

    Ok(ParsedTransaction {
        date,
        amount,
        import_id: Transaction::fingerprint(date, amount, &memo),
        memo,
        id,
        row_number,
    })
}

/// Parse amount from a single column or from separate inflow/outflow columns
fn parse_amount_from_record(record: &StringRecord, mapping: &ColumnMapping) -> Result<Money, String> {
    let amount = if let Some(amount_col) = mapping.amount_column {
        let amount_str = record
            .get(amount_col)
            .ok_or_else(|| "Missing amount column".to_string())?
            .trim();
        parse_amount_string(amount_str)?
    } else {
        let outflow_col = mapping
            .outflow_column
            .ok_or_else(|| "Missing outflow column configuration".to_string())?;
        let inflow_col = mapping
            .inflow_column
            .ok_or_else(|| "Missing inflow column configuration".to_string())?;

        let outflow_str = record.get(outflow_col).map(str::trim).unwrap_or("");
        let inflow_str = record.get(inflow_col).map(str::trim).unwrap_or("");

        let outflow = if outflow_str.is_empty() {
            Money::zero()
        } else {
            -parse_amount_string(outflow_str)?.abs()
        };
        let inflow = if inflow_str.is_empty() {
            Money::zero()
        } else {
            parse_amount_string(inflow_str)?.abs()
        };

        outflow + inflow
    };

    Ok(if mapping.invert_amounts { -amount } else { amount })
}

/// Parse an amount, accepting accounting-style parentheses for negatives
fn parse_amount_string(s: &str) -> Result<Money, String> {
    let (negative, body) = match s.strip_prefix('(').and_then(|r| r.strip_suffix(')')) {
        Some(inner) => (true, inner),
        None => (false, s),
    };
    let amount = Money::parse(body).map_err(|e| e.to_string())?;
    Ok(if negative { -amount.abs() } else { amount })
}

/// Parse a date string, trying the preferred format first
fn parse_date(s: &str, primary_format: &str) -> Result<NaiveDate, String> {
    std::iter::once(primary_format)
        .chain(FALLBACK_DATE_FORMATS)
        .find_map(|format| NaiveDate::parse_from_str(s, format).ok())
        .ok_or_else(|| format!("Could not parse date: '{}'", s))
}

/// A first row whose first cell is a date is data, not a header
fn looks_like_data_row(record: &StringRecord) -> bool {
    record
        .get(0)
        .map(|first| {
            FALLBACK_DATE_FORMATS
                .iter()
                .any(|format| NaiveDate::parse_from_str(first.trim(), format).is_ok())
        })
        .unwrap_or(false)
}

/// Detect column mapping from the first CSV record
pub fn detect_mapping_from_headers(headers: &StringRecord) -> ColumnMapping {
    if looks_like_data_row(headers) {
        // Headerless: assume date, amount, memo
        return ColumnMapping::new().with_header(false);
    }

    let mut mapping = ColumnMapping {
        amount_column: None,
        memo_column: None,
        ..ColumnMapping::default()
    };

    for (idx, header) in headers.iter().enumerate() {
        let h = header.trim().to_lowercase();

        if h == "id" || h.contains("reference") || h.ends_with(" id") {
            mapping.id_column = Some(idx);
        } else if h.contains("date") || h.contains("posted") {
            mapping.date_column = idx;
        } else if h.contains("amount") && mapping.amount_column.is_none() {
            mapping.amount_column = Some(idx);
        } else if h.contains("debit") || h.contains("outflow") || h.contains("withdrawal") {
            mapping.outflow_column = Some(idx);
        } else if h.contains("credit") || h.contains("inflow") || h.contains("deposit") {
            mapping.inflow_column = Some(idx);
        } else if h.contains("memo")
            || h.contains("description")
            || h.contains("payee")
            || h.contains("note")
        {
            if mapping.memo_column.is_none() {
                mapping.memo_column = Some(idx);
            }
        }
    }

    // A single amount column wins over inflow/outflow pairs
    if mapping.amount_column.is_none()
        && (mapping.outflow_column.is_none() || mapping.inflow_column.is_none())
    {
        mapping.amount_column = Some(1);
    }

    mapping
}
