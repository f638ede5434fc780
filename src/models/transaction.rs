//! Transaction model
//!
//! A ledger transaction is a dated, signed amount. Positive amounts are
//! inflows (income), negative amounts are outflows (expenses).

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use super::money::Money;

/// Direction of money movement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlowKind {
    /// Income (positive amount)
    Inflow,
    /// Expense (negative amount)
    Outflow,
}

impl fmt::Display for FlowKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Inflow => write!(f, "Inflow"),
            Self::Outflow => write!(f, "Outflow"),
        }
    }
}

/// A financial transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Opaque identifier, unique within its ledger
    pub id: String,

    /// Calendar date (serialized as YYYY-MM-DD)
    pub date: NaiveDate,

    /// Amount (positive for inflow, negative for outflow)
    pub amount: Money,

    /// Memo/notes
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub memo: String,
}

impl Transaction {
    /// Create a new transaction
    pub fn new(id: impl Into<String>, date: NaiveDate, amount: Money) -> Self {
        Self {
            id: id.into(),
            date,
            amount,
            memo: String::new(),
        }
    }

    /// Attach a memo
    pub fn with_memo(mut self, memo: impl Into<String>) -> Self {
        self.memo = memo.into();
        self
    }

    /// Generate a random transaction id
    pub fn generate_id() -> String {
        let uuid = Uuid::new_v4().simple().to_string();
        format!("txn-{}", &uuid[..12])
    }

    /// Whether this is an inflow, an outflow, or neither (zero amount)
    pub fn kind(&self) -> Option<FlowKind> {
        if self.amount.is_positive() {
            Some(FlowKind::Inflow)
        } else if self.amount.is_negative() {
            Some(FlowKind::Outflow)
        } else {
            None
        }
    }

    /// Check if this is an inflow (positive amount)
    pub fn is_inflow(&self) -> bool {
        self.kind() == Some(FlowKind::Inflow)
    }

    /// Check if this is an outflow (negative amount)
    pub fn is_outflow(&self) -> bool {
        self.kind() == Some(FlowKind::Outflow)
    }

    /// Stable fingerprint for duplicate detection during import
    pub fn import_id(&self) -> String {
        Self::fingerprint(self.date, self.amount, &self.memo)
    }

    /// Fingerprint of the fields an imported row is identified by
    pub fn fingerprint(date: NaiveDate, amount: Money, memo: &str) -> String {
        use std::hash::{Hash, Hasher};
        let mut hasher = std::collections::hash_map::DefaultHasher::new();
        date.hash(&mut hasher);
        amount.cents().hash(&mut hasher);
        memo.hash(&mut hasher);
        format!("imp-{:016x}", hasher.finish())
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.date.format("%Y-%m-%d"), self.id)?;
        if !self.memo.is_empty() {
            write!(f, " {}", self.memo)?;
        }
        write!(f, " {}", self.amount)
    }
}

/// Split a ledger into (income, expenses), preserving order
///
/// Zero-amount transactions move no money and belong to neither side.
pub fn partition_flows(transactions: &[Transaction]) -> (Vec<Transaction>, Vec<Transaction>) {
    let mut income = Vec::new();
    let mut expenses = Vec::new();
    for txn in transactions {
        match txn.kind() {
            Some(FlowKind::Inflow) => income.push(txn.clone()),
            Some(FlowKind::Outflow) => expenses.push(txn.clone()),
            None => {}
        }
    }
    (income, expenses)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_inflow_outflow() {
        let inflow = Transaction::new("a", date(2024, 1, 1), Money::from_cents(1000));
        assert!(inflow.is_inflow());
        assert!(!inflow.is_outflow());

        let outflow = Transaction::new("b", date(2024, 1, 2), Money::from_cents(-1000));
        assert_eq!(outflow.kind(), Some(FlowKind::Outflow));

        let zero = Transaction::new("c", date(2024, 1, 3), Money::zero());
        assert_eq!(zero.kind(), None);
    }

    #[test]
    fn test_partition_flows() {
        let ledger = vec![
            Transaction::new("pay", date(2024, 1, 1), Money::from_cents(100_000)),
            Transaction::new("rent", date(2024, 1, 2), Money::from_cents(-50_000)),
            Transaction::new("noop", date(2024, 1, 3), Money::zero()),
            Transaction::new("bonus", date(2024, 1, 4), Money::from_cents(20_000)),
        ];

        let (income, expenses) = partition_flows(&ledger);
        let income_ids: Vec<_> = income.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(income_ids, vec!["pay", "bonus"]);
        assert_eq!(expenses.len(), 1);
        assert_eq!(expenses[0].id, "rent");
    }

    #[test]
    fn test_generated_ids_are_unique() {
        let a = Transaction::generate_id();
        let b = Transaction::generate_id();
        assert!(a.starts_with("txn-"));
        assert_ne!(a, b);
    }

    #[test]
    fn test_import_id_depends_on_content() {
        let txn = Transaction::new("x", date(2024, 1, 15), Money::from_cents(-500)).with_memo("Coffee");
        let same = Transaction::new("y", date(2024, 1, 15), Money::from_cents(-500)).with_memo("Coffee");
        let other = Transaction::new("x", date(2024, 1, 16), Money::from_cents(-500)).with_memo("Coffee");

        assert_eq!(txn.import_id(), same.import_id());
        assert_ne!(txn.import_id(), other.import_id());
    }

    #[test]
    fn test_serde_wire_format() {
        let json = r#"{"id":"t1","date":"2024-01-15","amount":-50000}"#;
        let txn: Transaction = serde_json::from_str(json).unwrap();
        assert_eq!(txn.date, date(2024, 1, 15));
        assert_eq!(txn.amount.cents(), -50000);
        assert!(txn.memo.is_empty());

        assert_eq!(serde_json::to_string(&txn).unwrap(), json);
    }

    #[test]
    fn test_display() {
        let txn = Transaction::new("t1", date(2024, 1, 15), Money::from_cents(-500)).with_memo("Coffee");
        assert_eq!(txn.to_string(), "2024-01-15 t1 Coffee -$5.00");
    }
}
