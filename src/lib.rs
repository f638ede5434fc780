//! moneyage - age of money tracking
//!
//! This library computes the "age of money": how many days pass between the
//! moment income arrives and the moment it is spent. Income is consumed
//! first in, first out, and each expense is aged against the last income it
//! drew from, i.e. the youngest dollar it spent.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Configuration and path management
//! - `error`: Custom error types
//! - `logging`: `tracing` subscriber setup for the binary
//! - `models`: Core data models (money, transactions, age results)
//! - `storage`: JSON file storage layer
//! - `services`: FIFO matching, averaging and trend logic, plus ledger and import services
//! - `reports`: The age of money report and its exports
//! - `display`: Terminal formatting helpers
//! - `cli`: Command handlers for the `moneyage` binary
//!
//! # Example
//!
//! ```rust
//! use chrono::NaiveDate;
//! use moneyage::models::{Money, Transaction};
//! use moneyage::services::age_of_money::{calculate_age_of_money, calculate_average_age};
//!
//! let day = |d| NaiveDate::from_ymd_opt(2024, 1, d).unwrap();
//! let income = vec![Transaction::new("i1", day(1), Money::from_dollars_cents(1000, 0))];
//! let expenses = vec![Transaction::new("e1", day(15), Money::from_dollars_cents(-500, 0))];
//!
//! let result = calculate_age_of_money(&income, &expenses);
//! assert_eq!(result.ages[0].age, 14);
//! assert_eq!(calculate_average_age(&result.ages, 10), Some(14));
//! ```

pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod logging;
pub mod models;
pub mod reports;
pub mod services;
pub mod storage;

pub use error::{MoneyAgeError, MoneyAgeResult};
