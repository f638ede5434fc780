//! Age of Money result types
//!
//! These are the values produced by the FIFO matcher and the summarizers in
//! `services::age_of_money`. They are plain data: built per call, never cached.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Age of the money that paid for one expense
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgeEntry {
    /// The expense's date
    pub date: NaiveDate,
    /// Whole days between the attributed income and the expense
    pub age: i64,
}

impl AgeEntry {
    pub fn new(date: NaiveDate, age: i64) -> Self {
        Self { date, age }
    }
}

/// Output of the FIFO matcher
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgeOfMoneyResult {
    /// One entry per fully funded expense, in expense-date order
    pub ages: Vec<AgeEntry>,
    /// Income ran out before all expenses were funded
    pub insufficient_data: bool,
}

/// One sample of a periodic age-of-money series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyPoint {
    /// Period label, e.g. "2024-03"
    pub date: String,
    pub age_of_money: f64,
}

impl MonthlyPoint {
    pub fn new(date: impl Into<String>, age_of_money: f64) -> Self {
        Self {
            date: date.into(),
            age_of_money,
        }
    }
}

/// Direction of the age of money between the last two periods
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Up,
    Down,
    #[default]
    Stable,
}

impl Trend {
    /// Arrow used in terminal output
    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Up => "↑",
            Self::Down => "↓",
            Self::Stable => "→",
        }
    }
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Up => write!(f, "up"),
            Self::Down => write!(f, "down"),
            Self::Stable => write!(f, "stable"),
        }
    }
}
