//! JSON file helpers for the ledger
//!
//! The ledger is rewritten whole on every save. A save goes to a hidden
//! sibling file that replaces the target only after it has been synced, and
//! the sibling is removed again if anything fails on the way.

use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::{de::DeserializeOwned, Serialize};

use crate::error::{MoneyAgeError, MoneyAgeResult};

/// What is on disk at a data file path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileStatus {
    Missing,
    Valid,
    /// Present but not parseable JSON
    Corrupt,
}

/// Read a JSON document, or `T::default()` when the file does not exist yet
pub fn read_json<T: DeserializeOwned + Default>(path: &Path) -> MoneyAgeResult<T> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(T::default()),
        Err(e) => {
            return Err(MoneyAgeError::Storage(format!(
                "Failed to open {}: {}",
                path.display(),
                e
            )))
        }
    };

    serde_json::from_reader(BufReader::new(file)).map_err(|e| {
        MoneyAgeError::Storage(format!(
            "{} is not a valid ledger file (line {}, column {}): {}",
            path.display(),
            e.line(),
            e.column(),
            e
        ))
    })
}

/// Classify the file at `path` without deserializing it into a model
pub fn inspect_json_file(path: &Path) -> FileStatus {
    match File::open(path) {
        Ok(file) => match serde_json::from_reader::<_, serde_json::Value>(BufReader::new(file)) {
            Ok(_) => FileStatus::Valid,
            Err(_) => FileStatus::Corrupt,
        },
        Err(e) if e.kind() == io::ErrorKind::NotFound => FileStatus::Missing,
        Err(_) => FileStatus::Corrupt,
    }
}

/// Temp file that is deleted on drop unless it was renamed into place
struct PendingFile {
    path: PathBuf,
    committed: bool,
}

impl PendingFile {
    fn beside(target: &Path) -> Self {
        let name = target
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "ledger".to_string());
        Self {
            path: target.with_file_name(format!(".{}.tmp", name)),
            committed: false,
        }
    }

    fn commit(mut self, target: &Path) -> io::Result<()> {
        fs::rename(&self.path, target)?;
        self.committed = true;
        Ok(())
    }
}

impl Drop for PendingFile {
    fn drop(&mut self) {
        if !self.committed {
            let _ = fs::remove_file(&self.path);
        }
    }
}

/// Serialize `data` as pretty JSON and atomically replace `path` with it
pub fn write_json_atomic<T: Serialize>(path: &Path, data: &T) -> MoneyAgeResult<()> {
    let storage_err = |what: &str, e: &dyn std::fmt::Display| {
        MoneyAgeError::Storage(format!("Failed to {} {}: {}", what, path.display(), e))
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| storage_err("create the directory for", &e))?;
    }

    let pending = PendingFile::beside(path);
    let file = File::create(&pending.path).map_err(|e| storage_err("stage", &e))?;

    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, data).map_err(|e| storage_err("serialize", &e))?;
    let file = writer
        .into_inner()
        .map_err(|e| storage_err("flush", e.error()))?;
    file.sync_all().map_err(|e| storage_err("sync", &e))?;
    drop(file);

    pending
        .commit(path)
        .map_err(|e| storage_err("replace", &e))
}
