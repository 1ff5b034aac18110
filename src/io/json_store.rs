//! JSON file storage for the account collection
//!
//! The whole collection lives in one pretty-printed JSON array. Every save
//! truncates and rewrites the file in place: there is no temporary file,
//! rename, backup or lock, and the last writer wins.

use crate::core::traits::AccountStore;
use crate::types::{Account, BankError};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Default data file name, relative to the working directory
pub const DEFAULT_DATA_FILE: &str = "bank_data.json";

/// Account store backed by a JSON file
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        JsonFileStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn display_path(&self) -> String {
        self.path.display().to_string()
    }
}

impl Default for JsonFileStore {
    fn default() -> Self {
        JsonFileStore::new(DEFAULT_DATA_FILE)
    }
}

impl AccountStore for JsonFileStore {
    fn load(&self) -> Result<Vec<Account>, BankError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!(path = %self.display_path(), "no data file, starting empty");
                return Ok(Vec::new());
            }
            Err(e) => return Err(e.into()),
        };

        let accounts: Vec<Account> = serde_json::from_str(&contents)
            .map_err(|e| BankError::corrupt_storage(&self.display_path(), e))?;

        tracing::debug!(path = %self.display_path(), count = accounts.len(), "accounts loaded");
        Ok(accounts)
    }

    fn save(&self, accounts: &[Account]) -> Result<(), BankError> {
        let json = serde_json::to_string_pretty(accounts).map_err(|e| BankError::IoError {
            message: format!("Failed to serialize accounts: {}", e),
        })?;
        fs::write(&self.path, json)?;

        tracing::debug!(path = %self.display_path(), count = accounts.len(), "accounts saved");
        Ok(())
    }
}
