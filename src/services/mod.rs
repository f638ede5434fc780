//! Service layer for moneyage
//!
//! The service layer provides business logic on top of the storage layer:
//! the age-of-money calculations themselves, ledger management and CSV import.

pub mod age_of_money;
pub mod import;
pub mod transaction;

pub use age_of_money::{calculate_age_of_money, calculate_average_age, calculate_trend};
pub use import::{ColumnMapping, ImportService};
pub use transaction::{CreateTransactionInput, TransactionFilter, TransactionService};
