//! # Configuration State
//!
//! Application configuration loaded at startup.
//!
//! ## Configuration Sources (Priority Order)
//! 1. Command-line flags (`--db`)
//! 2. Environment variables (`PARTNERLINE_*`)
//! 3. Defaults (this file)
//!
//! Configuration is read-only after initialization.

use chrono::NaiveDate;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::ApiError;

/// Environment variable overriding the database file location.
pub const DB_PATH_VAR: &str = "PARTNERLINE_DB_PATH";

/// Environment variable enabling degraded sales history reads.
pub const DEGRADE_READS_VAR: &str = "PARTNERLINE_DEGRADE_READS";

/// Database file name inside the platform data directory.
const DB_FILE_NAME: &str = "partnerline.db";

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ConfigState {
    /// Database file override. `None` uses the platform data directory.
    pub database_path: Option<PathBuf>,

    /// When a sales history read fails, log it and show an empty history
    /// instead of reporting the error.
    /// Default: false
    pub degrade_sales_reads: bool,

    /// Unit printed after material amounts.
    pub quantity_unit: String,

    /// chrono format string for dates in reports.
    pub date_format: String,
}

impl Default for ConfigState {
    fn default() -> Self {
        ConfigState {
            database_path: None,
            degrade_sales_reads: false,
            quantity_unit: "m²".to_string(),
            date_format: "%d.%m.%Y".to_string(),
        }
    }
}

impl ConfigState {
    /// Creates a new ConfigState from environment variables and defaults.
    ///
    /// ## Environment Variables
    /// - `PARTNERLINE_DB_PATH`: Database file path
    /// - `PARTNERLINE_DEGRADE_READS`: `1`/`true`/`yes` to degrade history reads
    pub fn from_env() -> Self {
        ConfigState::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = ConfigState::default();

        if let Some(path) = lookup(DB_PATH_VAR).filter(|p| !p.trim().is_empty()) {
            config.database_path = Some(PathBuf::from(path));
        }

        if let Some(flag) = lookup(DEGRADE_READS_VAR) {
            config.degrade_sales_reads = matches!(
                flag.trim().to_ascii_lowercase().as_str(),
                "1" | "true" | "yes" | "on"
            );
        }

        config
    }

    /// Applies a `--db` flag, which wins over the environment.
    pub fn with_database_path(mut self, path: Option<PathBuf>) -> Self {
        if path.is_some() {
            self.database_path = path;
        }
        self
    }

    /// Resolves the database file path.
    ///
    /// ## Platform-Specific Paths
    /// - **Linux**: `~/.local/share/partnerline/partnerline.db`
    /// - **macOS**: `~/Library/Application Support/com.partnerline.partnerline/partnerline.db`
    /// - **Windows**: `%APPDATA%\partnerline\partnerline\data\partnerline.db`
    pub fn resolve_database_path(&self) -> Result<PathBuf, ApiError> {
        if let Some(path) = &self.database_path {
            return Ok(path.clone());
        }

        let proj_dirs = ProjectDirs::from("com", "partnerline", "partnerline")
            .ok_or_else(|| ApiError::internal("Could not determine app data directory"))?;

        let data_dir = proj_dirs.data_dir();
        std::fs::create_dir_all(data_dir).map_err(|e| {
            ApiError::internal(format!(
                "Could not create data directory {}: {}",
                data_dir.display(),
                e
            ))
        })?;

        Ok(data_dir.join(DB_FILE_NAME))
    }

    /// Formats a date for reports.
    pub fn format_date(&self, date: NaiveDate) -> String {
        date.format(&self.date_format).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ConfigState::from_lookup(|_| None);
        assert_eq!(config, ConfigState::default());
        assert!(!config.degrade_sales_reads);
        assert_eq!(config.quantity_unit, "m²");
    }

    #[test]
    fn test_environment_overrides() {
        let config = ConfigState::from_lookup(|key| match key {
            DB_PATH_VAR => Some("/tmp/p.db".to_string()),
            DEGRADE_READS_VAR => Some("TRUE".to_string()),
            _ => None,
        });
        assert_eq!(config.database_path, Some(PathBuf::from("/tmp/p.db")));
        assert!(config.degrade_sales_reads);
        assert_eq!(
            config.resolve_database_path().unwrap(),
            PathBuf::from("/tmp/p.db")
        );
    }

    #[test]
    fn test_flag_wins_over_environment() {
        let config = ConfigState::from_lookup(|key| {
            (key == DB_PATH_VAR).then(|| "/tmp/env.db".to_string())
        })
        .with_database_path(Some(PathBuf::from("/tmp/flag.db")));
        assert_eq!(config.database_path, Some(PathBuf::from("/tmp/flag.db")));

        let unchanged = config.clone().with_database_path(None);
        assert_eq!(unchanged.database_path, Some(PathBuf::from("/tmp/flag.db")));
    }

    #[test]
    fn test_format_date() {
        let config = ConfigState::default();
        let date = NaiveDate::from_ymd_opt(2024, 2, 20).unwrap();
        assert_eq!(config.format_date(date), "20.02.2024");
    }
}
