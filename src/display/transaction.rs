//! Transaction display formatting
//!
//! Register-style listing of ledger transactions for terminal output.

use super::report::truncate;
use crate::models::{FlowKind, Transaction};

const ID_WIDTH: usize = 18;
const MEMO_WIDTH: usize = 24;

/// Format a single transaction as a register row
pub fn format_transaction_row(txn: &Transaction, currency_symbol: &str) -> String {
    let direction = match txn.kind() {
        Some(FlowKind::Inflow) => "+",
        Some(FlowKind::Outflow) => "-",
        None => " ",
    };

    format!(
        "{} {} {:<id_w$} {:<memo_w$} {:>12}",
        direction,
        txn.date.format("%Y-%m-%d"),
        truncate(&txn.id, ID_WIDTH),
        truncate(&txn.memo, MEMO_WIDTH),
        txn.amount.format_with_symbol(currency_symbol),
        id_w = ID_WIDTH,
        memo_w = MEMO_WIDTH,
    )
}

/// Format a list of transactions as a register
pub fn format_transaction_register(transactions: &[Transaction], currency_symbol: &str) -> String {
    if transactions.is_empty() {
        return "No transactions found.\n".to_string();
    }

    let mut output = String::new();
    output.push_str(&format!(
        "  {:<10} {:<id_w$} {:<memo_w$} {:>12}\n",
        "Date",
        "Id",
        "Memo",
        "Amount",
        id_w = ID_WIDTH,
        memo_w = MEMO_WIDTH,
    ));
    output.push_str(&"-".repeat(70));
    output.push('\n');

    for txn in transactions {
        output.push_str(&format_transaction_row(txn, currency_symbol));
        output.push('\n');
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Money;
    use chrono::NaiveDate;

    #[test]
    fn test_row_marks_direction() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        let expense = Transaction::new("rent", date, Money::from_cents(-120_000)).with_memo("January rent");
        let row = format_transaction_row(&expense, "$");

        assert!(row.starts_with("- 2024-01-15 rent"));
        assert!(row.contains("January rent"));
        assert!(row.ends_with("-$1200.00"));
    }

    #[test]
    fn test_empty_register() {
        assert_eq!(format_transaction_register(&[], "$"), "No transactions found.\n");
    }

    #[test]
    fn test_register_has_header_and_rows() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let income = Transaction::new("pay", date, Money::from_cents(250_000));
        let output = format_transaction_register(&[income], "€");

        assert_eq!(output.lines().count(), 3);
        assert!(output.contains("€2500.00"));
    }
}
