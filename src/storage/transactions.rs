//! Transaction repository for JSON storage
//!
//! Manages loading and saving the ledger to transactions.json

use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::sync::RwLock;

use tracing::debug;

use crate::error::MoneyAgeError;
use crate::models::Transaction;

use super::file_io::{read_json, write_json_atomic};

/// Serializable ledger file layout
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct TransactionData {
    transactions: Vec<Transaction>,
}

fn lock_err<E: std::fmt::Display>(e: E) -> MoneyAgeError {
    MoneyAgeError::Storage(format!("Failed to acquire lock: {}", e))
}

/// Repository for transaction persistence, keyed by transaction id
pub struct TransactionRepository {
    path: PathBuf,
    data: RwLock<HashMap<String, Transaction>>,
}

impl TransactionRepository {
    /// Create a new transaction repository
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
        }
    }

    /// Load transactions from disk, replacing anything in memory
    pub fn load(&self) -> Result<(), MoneyAgeError> {
        let file_data: TransactionData = read_json(&self.path)?;

        let mut loaded = HashMap::with_capacity(file_data.transactions.len());
        for txn in file_data.transactions {
            if txn.amount.cents() == i64::MIN {
                return Err(MoneyAgeError::Storage(format!(
                    "Transaction '{}' in {} has an amount out of range",
                    txn.id,
                    self.path.display()
                )));
            }
            if loaded.contains_key(&txn.id) {
                return Err(MoneyAgeError::Storage(format!(
                    "Duplicate transaction id '{}' in {}",
                    txn.id,
                    self.path.display()
                )));
            }
            loaded.insert(txn.id.clone(), txn);
        }

        let mut data = self.data.write().map_err(lock_err)?;
        *data = loaded;
        debug!(count = data.len(), path = %self.path.display(), "ledger loaded");
        Ok(())
    }

    /// Save transactions to disk, oldest first
    pub fn save(&self) -> Result<(), MoneyAgeError> {
        let transactions = self.get_all()?;
        debug!(count = transactions.len(), path = %self.path.display(), "saving ledger");
        write_json_atomic(&self.path, &TransactionData { transactions })
    }

    /// Get a transaction by ID
    pub fn get(&self, id: &str) -> Result<Option<Transaction>, MoneyAgeError> {
        let data = self.data.read().map_err(lock_err)?;
        Ok(data.get(id).cloned())
    }

    /// Check whether an ID is taken
    pub fn contains(&self, id: &str) -> Result<bool, MoneyAgeError> {
        let data = self.data.read().map_err(lock_err)?;
        Ok(data.contains_key(id))
    }

    /// Get all transactions sorted by date ascending (ties by id)
    pub fn get_all(&self) -> Result<Vec<Transaction>, MoneyAgeError> {
        let data = self.data.read().map_err(lock_err)?;

        let mut transactions: Vec<_> = data.values().cloned().collect();
        transactions.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.id.cmp(&b.id)));
        Ok(transactions)
    }

    /// Insert or update a transaction
    pub fn upsert(&self, txn: Transaction) -> Result<(), MoneyAgeError> {
        let mut data = self.data.write().map_err(lock_err)?;
        data.insert(txn.id.clone(), txn);
        Ok(())
    }

    /// Remove a transaction, returning it if it existed
    pub fn delete(&self, id: &str) -> Result<Option<Transaction>, MoneyAgeError> {
        let mut data = self.data.write().map_err(lock_err)?;
        Ok(data.remove(id))
    }

    /// Number of stored transactions
    pub fn count(&self) -> Result<usize, MoneyAgeError> {
        let data = self.data.read().map_err(lock_err)?;
        Ok(data.len())
    }

    /// Import fingerprints of every stored transaction
    pub fn import_ids(&self) -> Result<HashSet<String>, MoneyAgeError> {
        let data = self.data.read().map_err(lock_err)?;
        Ok(data.values().map(Transaction::import_id).collect())
    }
}
