//! Configuration module for moneyage
//!
//! This module provides configuration management including:
//! - XDG-compliant path resolution
//! - User settings persistence (report defaults, formats)

pub mod paths;
pub mod settings;

pub use paths::MoneyAgePaths;
pub use settings::Settings;
