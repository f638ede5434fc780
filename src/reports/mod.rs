//! Reports module for moneyage
//!
//! Builds the age of money report from the stored ledger and renders it for
//! the terminal or exports it as CSV, JSON or YAML.

pub mod age_of_money;

pub use age_of_money::{monthly_points, AgeOfMoneyReport, ReportOptions};
