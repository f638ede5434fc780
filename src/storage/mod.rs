//! Storage layer for moneyage
//!
//! Provides JSON file storage with atomic writes and automatic directory
//! creation.

pub mod file_io;
pub mod transactions;

pub use file_io::{inspect_json_file, read_json, write_json_atomic, FileStatus};
pub use transactions::TransactionRepository;

use crate::config::paths::MoneyAgePaths;
use crate::error::MoneyAgeError;

/// Main storage coordinator
pub struct Storage {
    paths: MoneyAgePaths,
    pub transactions: TransactionRepository,
}

impl Storage {
    /// Create a new Storage instance, creating directories as needed
    pub fn new(paths: MoneyAgePaths) -> Result<Self, MoneyAgeError> {
        paths.ensure_directories()?;

        Ok(Self {
            transactions: TransactionRepository::new(paths.ledger_file()),
            paths,
        })
    }

    /// Get the paths configuration
    pub fn paths(&self) -> &MoneyAgePaths {
        &self.paths
    }

    /// Load all data from disk
    pub fn load_all(&mut self) -> Result<(), MoneyAgeError> {
        self.transactions.load()
    }

    /// Save all data to disk
    pub fn save_all(&self) -> Result<(), MoneyAgeError> {
        self.transactions.save()
    }

    /// Check if storage has been initialized
    pub fn is_initialized(&self) -> bool {
        self.paths.is_initialized()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_storage_creation() {
        let temp_dir = TempDir::new().unwrap();
        let paths = MoneyAgePaths::with_base_dir(temp_dir.path().to_path_buf());
        let mut storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();

        assert!(temp_dir.path().join("data").exists());
        assert!(!storage.is_initialized());
        assert_eq!(storage.transactions.count().unwrap(), 0);
    }
}
