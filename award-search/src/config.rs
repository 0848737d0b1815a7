use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

use award_common::Cabin;

use crate::engine::EngineSettings;
use crate::error::ValidationError;

/// One full search run, as read from the TOML config file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// IATA 2-letter code of the airline website to search
    pub website: String,

    /// IATA 3-letter code of the departure airport
    pub from: String,

    /// IATA 3-letter code of the arrival airport
    pub to: String,

    pub cabin: Cabin,

    /// Starting date of the search range (YYYY-MM-DD)
    pub start: NaiveDate,

    /// Ending date of the search range; defaults to a one-day search
    pub end: Option<NaiveDate>,

    #[serde(default = "default_quantity")]
    pub quantity: u32,

    /// Index of the account to use when the engine requires login
    #[serde(default)]
    pub account: usize,

    #[serde(default)]
    pub partners: bool,

    #[serde(default)]
    pub oneway: bool,

    #[serde(default)]
    pub headless: bool,

    /// Parse search results into awards (disable to only collect assets)
    #[serde(default = "default_parse")]
    pub parse: bool,

    /// Run queries in reverse chronological order
    #[serde(default)]
    pub reverse: bool,

    /// Terminate the search after this many successive days without
    /// results; 0 disables early termination
    #[serde(default)]
    pub terminate: u32,

    /// Re-run queries even if already answered by stored data
    #[serde(default)]
    pub force: bool,

    #[serde(default = "default_backoff_min")]
    pub backoff_min_secs: u64,

    #[serde(default = "default_backoff_max")]
    pub backoff_max_secs: u64,

    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    #[serde(default = "default_log_dir")]
    pub log_dir: PathBuf,

    #[serde(default = "default_accounts_file")]
    pub accounts_file: PathBuf,

    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Capability descriptors for the supported engines, keyed by id
    #[serde(default)]
    pub engines: HashMap<String, EngineSettings>,
}

fn default_quantity() -> u32 {
    1
}

fn default_parse() -> bool {
    true
}

fn default_backoff_min() -> u64 {
    65
}

fn default_backoff_max() -> u64 {
    320
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_log_dir() -> PathBuf {
    PathBuf::from("logs")
}

fn default_accounts_file() -> PathBuf {
    PathBuf::from("accounts.toml")
}

fn default_log_level() -> String {
    "info".to_string()
}

impl SearchConfig {
    pub fn from_file(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: SearchConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Ending date of the window, defaulting to a one-day search.
    pub fn end_date(&self) -> NaiveDate {
        self.end.unwrap_or(self.start)
    }

    /// Check everything that does not require an engine capability
    /// descriptor. Range clamping against the engine's valid window
    /// happens separately, once the engine is known.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.engines.contains_key(&self.website) {
            return Err(ValidationError::UnsupportedWebsite(self.website.clone()));
        }
        if self.end_date() < self.start {
            return Err(ValidationError::InvalidDateRange {
                start: self.start,
                end: self.end_date(),
            });
        }
        if self.quantity < 1 {
            return Err(ValidationError::InvalidQuantity(self.quantity));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"
        website = "SQ"
        from = "SFO"
        to = "SIN"
        cabin = "business"
        start = "2024-03-01"

        [engines.SQ]
        name = "Singapore Airlines KrisFlyer"
        base_url = "https://awards.example.com/sq"
    "#;

    #[test]
    fn test_defaults() {
        let config: SearchConfig = toml::from_str(MINIMAL).unwrap();
        assert_eq!(config.quantity, 1);
        assert_eq!(config.account, 0);
        assert!(config.parse);
        assert!(!config.force);
        assert_eq!(config.terminate, 0);
        assert_eq!(config.backoff_min_secs, 65);
        assert_eq!(config.backoff_max_secs, 320);
        assert_eq!(config.data_dir, PathBuf::from("data"));
        assert_eq!(config.log_dir, PathBuf::from("logs"));
        assert_eq!(config.end_date(), config.start);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_unsupported_website() {
        let mut config: SearchConfig = toml::from_str(MINIMAL).unwrap();
        config.website = "ZZ".to_string();
        assert!(matches!(
            config.validate(),
            Err(ValidationError::UnsupportedWebsite(_))
        ));
    }

    #[test]
    fn test_inverted_range() {
        let mut config: SearchConfig = toml::from_str(MINIMAL).unwrap();
        config.end = Some("2024-02-01".parse().unwrap());
        assert!(matches!(
            config.validate(),
            Err(ValidationError::InvalidDateRange { .. })
        ));
    }
}
