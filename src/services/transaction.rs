//! Transaction service
//!
//! Business logic for ledger management: adding with validation, filtering,
//! deleting, and splitting the ledger into the income and expense lists the
//! age-of-money matcher consumes.

use chrono::NaiveDate;
use tracing::info;

use crate::error::{MoneyAgeError, MoneyAgeResult};
use crate::models::{partition_flows, FlowKind, Money, Transaction};
use crate::storage::Storage;

/// Service for transaction management
pub struct TransactionService<'a> {
    storage: &'a Storage,
}

/// Options for filtering transactions
#[derive(Debug, Clone, Default)]
pub struct TransactionFilter {
    /// Only inflows or only outflows
    pub kind: Option<FlowKind>,
    /// Filter by date range start (inclusive)
    pub start_date: Option<NaiveDate>,
    /// Filter by date range end (inclusive)
    pub end_date: Option<NaiveDate>,
    /// Maximum number of transactions to return
    pub limit: Option<usize>,
}

impl TransactionFilter {
    /// Create a new empty filter
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter by flow direction
    pub fn kind(mut self, kind: FlowKind) -> Self {
        self.kind = Some(kind);
        self
    }

    /// Filter by date range
    pub fn date_range(mut self, start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        self.start_date = start;
        self.end_date = end;
        self
    }

    /// Limit results
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    fn matches(&self, txn: &Transaction) -> bool {
        if let Some(kind) = self.kind {
            if txn.kind() != Some(kind) {
                return false;
            }
        }
        if self.start_date.is_some_and(|start| txn.date < start) {
            return false;
        }
        if self.end_date.is_some_and(|end| txn.date > end) {
            return false;
        }
        true
    }
}

/// Input for creating a new transaction
#[derive(Debug, Clone)]
pub struct CreateTransactionInput {
    /// Explicit id; generated when absent
    pub id: Option<String>,
    pub date: NaiveDate,
    pub amount: Money,
    pub memo: Option<String>,
}

impl<'a> TransactionService<'a> {
    /// Create a new transaction service
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Validate and add a transaction, persisting the ledger
    pub fn add(&self, input: CreateTransactionInput) -> MoneyAgeResult<Transaction> {
        if input.amount.is_zero() {
            return Err(MoneyAgeError::Validation(
                "Transaction amount cannot be zero".into(),
            ));
        }

        let id = match input.id {
            Some(id) => {
                let id = id.trim().to_string();
                if id.is_empty() {
                    return Err(MoneyAgeError::Validation(
                        "Transaction id cannot be blank".into(),
                    ));
                }
                if self.storage.transactions.contains(&id)? {
                    return Err(MoneyAgeError::duplicate_transaction(id));
                }
                id
            }
            None => Transaction::generate_id(),
        };

        let mut txn = Transaction::new(id, input.date, input.amount);
        if let Some(memo) = input.memo {
            txn.memo = memo.trim().to_string();
        }

        self.storage.transactions.upsert(txn.clone())?;
        self.storage.transactions.save()?;

        info!(id = %txn.id, date = %txn.date, amount = %txn.amount, "transaction added");
        Ok(txn)
    }

    /// Get a transaction by id
    pub fn get(&self, id: &str) -> MoneyAgeResult<Transaction> {
        self.storage
            .transactions
            .get(id)?
            .ok_or_else(|| MoneyAgeError::transaction_not_found(id))
    }

    /// Delete a transaction by id, persisting the ledger
    pub fn delete(&self, id: &str) -> MoneyAgeResult<Transaction> {
        let removed = self
            .storage
            .transactions
            .delete(id)?
            .ok_or_else(|| MoneyAgeError::transaction_not_found(id))?;
        self.storage.transactions.save()?;

        info!(id = %removed.id, "transaction deleted");
        Ok(removed)
    }

    /// List transactions matching a filter, newest first
    pub fn list(&self, filter: &TransactionFilter) -> MoneyAgeResult<Vec<Transaction>> {
        let mut transactions: Vec<Transaction> = self
            .storage
            .transactions
            .get_all()?
            .into_iter()
            .rev()
            .filter(|txn| filter.matches(txn))
            .collect();

        if let Some(limit) = filter.limit {
            transactions.truncate(limit);
        }
        Ok(transactions)
    }

    /// Split the ledger (optionally limited to a date range) into
    /// `(income, expenses)`
    pub fn ledger(
        &self,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> MoneyAgeResult<(Vec<Transaction>, Vec<Transaction>)> {
        let filter = TransactionFilter::new().date_range(start, end);
        let transactions: Vec<Transaction> = self
            .storage
            .transactions
            .get_all()?
            .into_iter()
            .filter(|txn| filter.matches(txn))
            .collect();
        Ok(partition_flows(&transactions))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::MoneyAgePaths;
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = MoneyAgePaths::with_base_dir(temp_dir.path().to_path_buf());
        let mut storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();
        (temp_dir, storage)
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn input(id: Option<&str>, day: NaiveDate, cents: i64) -> CreateTransactionInput {
        CreateTransactionInput {
            id: id.map(String::from),
            date: day,
            amount: Money::from_cents(cents),
            memo: None,
        }
    }

    #[test]
    fn test_add_generates_id_and_persists() {
        let (_temp_dir, storage) = create_test_storage();
        let service = TransactionService::new(&storage);

        let txn = service.add(input(None, date(2024, 1, 1), 100_000)).unwrap();
        assert!(txn.id.starts_with("txn-"));

        storage.transactions.load().unwrap();
        assert_eq!(service.get(&txn.id).unwrap(), txn);
    }

    #[test]
    fn test_add_rejects_zero_and_duplicates() {
        let (_temp_dir, storage) = create_test_storage();
        let service = TransactionService::new(&storage);

        let err = service.add(input(None, date(2024, 1, 1), 0)).unwrap_err();
        assert!(err.is_validation());

        service
            .add(input(Some("pay-jan"), date(2024, 1, 1), 100_000))
            .unwrap();
        let err = service
            .add(input(Some("pay-jan"), date(2024, 1, 2), 5_000))
            .unwrap_err();
        assert!(matches!(err, MoneyAgeError::Duplicate { .. }));
    }

    #[test]
    fn test_delete() {
        let (_temp_dir, storage) = create_test_storage();
        let service = TransactionService::new(&storage);
        service.add(input(Some("rent"), date(2024, 1, 3), -50_000)).unwrap();

        service.delete("rent").unwrap();
        assert!(service.get("rent").unwrap_err().is_not_found());
        assert!(service.delete("rent").unwrap_err().is_not_found());
    }

    #[test]
    fn test_list_filters_newest_first() {
        let (_temp_dir, storage) = create_test_storage();
        let service = TransactionService::new(&storage);
        service.add(input(Some("pay"), date(2024, 1, 1), 100_000)).unwrap();
        service.add(input(Some("rent"), date(2024, 1, 3), -50_000)).unwrap();
        service.add(input(Some("food"), date(2024, 1, 9), -7_500)).unwrap();

        let all = service.list(&TransactionFilter::new()).unwrap();
        let ids: Vec<_> = all.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["food", "rent", "pay"]);

        let outflows = service
            .list(&TransactionFilter::new().kind(FlowKind::Outflow).limit(1))
            .unwrap();
        assert_eq!(outflows.len(), 1);
        assert_eq!(outflows[0].id, "food");
    }

    #[test]
    fn test_ledger_partitions_within_range() {
        let (_temp_dir, storage) = create_test_storage();
        let service = TransactionService::new(&storage);
        service.add(input(Some("pay"), date(2024, 1, 1), 100_000)).unwrap();
        service.add(input(Some("rent"), date(2024, 1, 3), -50_000)).unwrap();
        service.add(input(Some("late"), date(2024, 3, 1), -1_000)).unwrap();

        let (income, expenses) = service
            .ledger(None, Some(date(2024, 1, 31)))
            .unwrap();
        assert_eq!(income.len(), 1);
        assert_eq!(expenses.len(), 1);
        assert_eq!(expenses[0].id, "rent");
    }
}
