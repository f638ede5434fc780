//! Display formatting for terminal output
//!
//! Provides utilities for formatting ledger data and reports for terminal
//! display.

pub mod report;
pub mod transaction;

pub use transaction::{format_transaction_register, format_transaction_row};
