//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the service layer.

pub mod import;
pub mod report;
pub mod transaction;

pub use import::{handle_import_command, ImportArgs};
pub use report::{handle_report_command, ReportArgs, ReportFormat};
pub use transaction::{
    handle_add_command, handle_delete_command, handle_list_command, AddArgs, ListArgs,
};

use chrono::NaiveDate;

use crate::models::Money;

/// clap value parser for YYYY-MM-DD dates
pub fn parse_date_arg(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|_| format!("invalid date '{}', use YYYY-MM-DD", s))
}

/// clap value parser for money amounts
pub fn parse_money_arg(s: &str) -> Result<Money, String> {
    Money::parse(s).map_err(|e| e.to_string())
}
