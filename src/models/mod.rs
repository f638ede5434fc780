//! Core data models for moneyage
//!
//! Ledger transactions and money amounts on the input side, age entries,
//! monthly points and trends on the output side.

pub mod age;
pub mod money;
pub mod transaction;

pub use age::{AgeEntry, AgeOfMoneyResult, MonthlyPoint, Trend};
pub use money::{Money, MoneyParseError};
pub use transaction::{partition_flows, FlowKind, Transaction};
