//! CLI commands for ledger transactions

use chrono::NaiveDate;
use clap::Args;

use super::{parse_date_arg, parse_money_arg};
use crate::config::settings::Settings;
use crate::display::format_transaction_register;
use crate::error::MoneyAgeResult;
use crate::models::{FlowKind, Money};
use crate::services::{CreateTransactionInput, TransactionFilter, TransactionService};
use crate::storage::Storage;

/// Arguments for `add`
#[derive(Args, Debug)]
pub struct AddArgs {
    /// Amount (positive for income, negative for an expense), e.g. 2500 or -42.10
    #[arg(allow_negative_numbers = true, value_parser = parse_money_arg)]
    pub amount: Money,

    /// Transaction date (YYYY-MM-DD), defaults to today
    #[arg(short, long, value_parser = parse_date_arg)]
    pub date: Option<NaiveDate>,

    /// Memo
    #[arg(short, long)]
    pub memo: Option<String>,

    /// Explicit transaction id (generated when omitted)
    #[arg(long)]
    pub id: Option<String>,
}

/// Arguments for `list`
#[derive(Args, Debug)]
pub struct ListArgs {
    /// Only show income
    #[arg(long, conflicts_with = "expenses")]
    pub income: bool,

    /// Only show expenses
    #[arg(long)]
    pub expenses: bool,

    /// Start date (YYYY-MM-DD)
    #[arg(short, long, value_parser = parse_date_arg)]
    pub start: Option<NaiveDate>,

    /// End date (YYYY-MM-DD)
    #[arg(short, long, value_parser = parse_date_arg)]
    pub end: Option<NaiveDate>,

    /// Number of transactions to show
    #[arg(short, long, default_value = "20")]
    pub limit: usize,
}

/// Handle `add`
pub fn handle_add_command(storage: &Storage, settings: &Settings, args: AddArgs) -> MoneyAgeResult<()> {
    let service = TransactionService::new(storage);
    let txn = service.add(CreateTransactionInput {
        id: args.id,
        date: args
            .date
            .unwrap_or_else(|| chrono::Local::now().date_naive()),
        amount: args.amount,
        memo: args.memo,
    })?;

    let kind = if txn.is_inflow() { "income" } else { "expense" };
    println!(
        "Added {} {} on {} ({})",
        kind,
        txn.amount.format_with_symbol(&settings.currency_symbol),
        txn.date.format(&settings.date_format),
        txn.id
    );
    Ok(())
}

/// Handle `list`
pub fn handle_list_command(storage: &Storage, settings: &Settings, args: ListArgs) -> MoneyAgeResult<()> {
    let mut filter = TransactionFilter::new()
        .date_range(args.start, args.end)
        .limit(args.limit);
    if args.income {
        filter = filter.kind(FlowKind::Inflow);
    } else if args.expenses {
        filter = filter.kind(FlowKind::Outflow);
    }

    let transactions = TransactionService::new(storage).list(&filter)?;
    print!(
        "{}",
        format_transaction_register(&transactions, &settings.currency_symbol)
    );
    Ok(())
}

/// Handle `delete`
pub fn handle_delete_command(storage: &Storage, id: &str) -> MoneyAgeResult<()> {
    let removed = TransactionService::new(storage).delete(id)?;
    println!("Deleted transaction: {}", removed);
    Ok(())
}
