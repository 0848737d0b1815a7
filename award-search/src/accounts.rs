///! Credential lookup for engines that require login
///!
///! Accounts live in a TOML file next to the search config:
///!
///! ```toml
///! [[accounts.SQ]]
///! username = "krisflyer-number"
///! password = "secret"
///! ```

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Default, Deserialize)]
struct AccountsFile {
    #[serde(default)]
    accounts: HashMap<String, Vec<Credentials>>,
}

/// Credential collaborator, keyed by engine id and account index.
#[derive(Debug, Default)]
pub struct Accounts {
    by_engine: HashMap<String, Vec<Credentials>>,
}

impl Accounts {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let file: AccountsFile = toml::from_str(&content)?;
        Ok(Self {
            by_engine: file.accounts,
        })
    }

    /// Empty account set, for engines that never log in.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn get_credentials(&self, engine_id: &str, index: usize) -> Result<Credentials> {
        let Some(list) = self.by_engine.get(engine_id) else {
            bail!("No accounts configured for engine: {}", engine_id);
        };
        match list.get(index) {
            Some(credentials) => Ok(credentials.clone()),
            None => bail!(
                "Account index {} out of range for engine {} ({} configured)",
                index,
                engine_id,
                list.len()
            ),
        }
    }
}
