//! Where moneyage keeps its files
//!
//! ```text
//! <base>/config.json              settings
//! <base>/data/transactions.json   ledger
//! ```
//!
//! `<base>` is `MONEYAGE_DATA_DIR` when set. Otherwise it is `moneyage` under
//! `%APPDATA%` on Windows, or under `$XDG_CONFIG_HOME` (falling back to
//! `~/.config`) elsewhere.

use std::path::{Path, PathBuf};

use crate::error::MoneyAgeError;

/// Environment variable that overrides the base directory
pub const DATA_DIR_ENV: &str = "MONEYAGE_DATA_DIR";

const APP_DIR: &str = "moneyage";

/// Resolved file locations
#[derive(Debug, Clone)]
pub struct MoneyAgePaths {
    base_dir: PathBuf,
}

impl MoneyAgePaths {
    /// Resolve the base directory from the process environment
    pub fn new() -> Result<Self, MoneyAgeError> {
        resolve_base_dir(|key| std::env::var(key).ok()).map(Self::with_base_dir)
    }

    /// Use an explicit base directory
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn data_dir(&self) -> PathBuf {
        self.base_dir.join("data")
    }

    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    /// The transaction ledger
    pub fn ledger_file(&self) -> PathBuf {
        self.data_dir().join("transactions.json")
    }

    /// Create the base and data directories if needed
    pub fn ensure_directories(&self) -> Result<(), MoneyAgeError> {
        let data_dir = self.data_dir();
        std::fs::create_dir_all(&data_dir).map_err(|e| {
            MoneyAgeError::Io(format!("Failed to create {}: {}", data_dir.display(), e))
        })
    }

    /// Settings have been saved at least once (`moneyage init` or `config`)
    pub fn is_initialized(&self) -> bool {
        self.settings_file().exists()
    }
}

/// Pick the base directory using `lookup` for environment variables
///
/// Empty values count as unset. A relative `XDG_CONFIG_HOME` is ignored, as
/// the XDG base directory rules require.
pub fn resolve_base_dir<F>(lookup: F) -> Result<PathBuf, MoneyAgeError>
where
    F: Fn(&str) -> Option<String>,
{
    let var = |key: &str| lookup(key).filter(|value| !value.is_empty());

    if let Some(custom) = var(DATA_DIR_ENV) {
        return Ok(PathBuf::from(custom));
    }

    if cfg!(windows) {
        return var("APPDATA")
            .map(|appdata| PathBuf::from(appdata).join(APP_DIR))
            .ok_or_else(|| MoneyAgeError::Config("Could not determine APPDATA directory".into()));
    }

    let config_home = match var("XDG_CONFIG_HOME").map(PathBuf::from) {
        Some(xdg) if xdg.is_absolute() => xdg,
        _ => var("HOME")
            .map(|home| PathBuf::from(home).join(".config"))
            .ok_or_else(|| {
                MoneyAgeError::Config(format!(
                    "Could not determine HOME directory; set {} instead",
                    DATA_DIR_ENV
                ))
            })?,
    };
    Ok(config_home.join(APP_DIR))
}
