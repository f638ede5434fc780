//! User settings for moneyage
//!
//! Manages the report defaults (averaging window, trend threshold) and
//! display/import preferences.

use serde::{Deserialize, Serialize};

use super::paths::MoneyAgePaths;
use crate::error::MoneyAgeError;
use crate::services::age_of_money::{DEFAULT_AVERAGE_WINDOW, DEFAULT_TREND_THRESHOLD};

/// User settings for moneyage
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Number of most recent expenses averaged into the age of money
    #[serde(default = "default_average_window")]
    pub average_window: usize,

    /// Day difference between the last two monthly points that counts as a trend
    #[serde(default = "default_trend_threshold")]
    pub trend_threshold: f64,

    /// Default currency symbol
    #[serde(default = "default_currency")]
    pub currency_symbol: String,

    /// Date format preference (strftime format)
    #[serde(default = "default_date_format")]
    pub date_format: String,

    /// Date format tried first when importing CSV files
    #[serde(default = "default_date_format")]
    pub import_date_format: String,
}

fn default_schema_version() -> u32 {
    1
}

fn default_average_window() -> usize {
    DEFAULT_AVERAGE_WINDOW
}

fn default_trend_threshold() -> f64 {
    DEFAULT_TREND_THRESHOLD
}

fn default_currency() -> String {
    "$".to_string()
}

fn default_date_format() -> String {
    "%Y-%m-%d".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            average_window: default_average_window(),
            trend_threshold: default_trend_threshold(),
            currency_symbol: default_currency(),
            date_format: default_date_format(),
            import_date_format: default_date_format(),
        }
    }
}

impl Settings {
    /// Load settings from disk, or create default settings if file doesn't exist
    pub fn load_or_create(paths: &MoneyAgePaths) -> Result<Self, MoneyAgeError> {
        let settings_path = paths.settings_file();

        if settings_path.exists() {
            let contents = std::fs::read_to_string(&settings_path).map_err(|e| {
                MoneyAgeError::Io(format!("Failed to read settings file: {}", e))
            })?;

            let settings: Settings = serde_json::from_str(&contents).map_err(|e| {
                MoneyAgeError::Config(format!("Failed to parse settings file: {}", e))
            })?;

            settings.validate()?;
            Ok(settings)
        } else {
            // Don't save yet - let caller decide when to persist
            Ok(Settings::default())
        }
    }

    /// Save settings to disk
    pub fn save(&self, paths: &MoneyAgePaths) -> Result<(), MoneyAgeError> {
        self.validate()?;
        paths.ensure_directories()?;

        let contents = serde_json::to_string_pretty(self).map_err(|e| {
            MoneyAgeError::Config(format!("Failed to serialize settings: {}", e))
        })?;

        std::fs::write(paths.settings_file(), contents).map_err(|e| {
            MoneyAgeError::Io(format!("Failed to write settings file: {}", e))
        })?;

        Ok(())
    }

    /// Reject settings the report cannot work with
    pub fn validate(&self) -> Result<(), MoneyAgeError> {
        if self.average_window == 0 {
            return Err(MoneyAgeError::Config(
                "average_window must be at least 1".into(),
            ));
        }
        if !self.trend_threshold.is_finite() || self.trend_threshold < 0.0 {
            return Err(MoneyAgeError::Config(format!(
                "trend_threshold must be a non-negative number, got {}",
                self.trend_threshold
            )));
        }
        Ok(())
    }
}
