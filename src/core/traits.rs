//! Core traits for time and storage
//!
//! The engine depends on these seams rather than on the system clock and the
//! filesystem directly, so tests can substitute a manual clock and a
//! throwaway store.

use crate::types::{Account, BankError};
use chrono::{DateTime, Utc};

/// Source of the current time
pub trait Clock {
    /// The current instant
    fn now(&self) -> DateTime<Utc>;
}

/// Accounts as read from storage
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LoadedAccounts {
    /// The loaded collection (empty when recovered)
    pub accounts: Vec<Account>,
    /// Set when the stored document was unreadable and has been replaced
    /// by an empty collection
    pub recovered_from: Option<BankError>,
}

/// Durable home of the full account collection
///
/// The collection is the unit of persistence: it is read once at startup
/// and rewritten wholesale after every mutation.
pub trait AccountStore {
    /// Load every stored account
    ///
    /// Returns an empty collection if nothing has been stored yet.
    ///
    /// # Errors
    ///
    /// - `CorruptStorage` if the stored document cannot be parsed
    /// - `IoError` if it cannot be read
    fn load(&self) -> Result<Vec<Account>, BankError>;

    /// Replace the stored collection with `accounts`
    fn save(&self, accounts: &[Account]) -> Result<(), BankError>;

    /// Load, treating a corrupt document as an empty collection
    ///
    /// The corruption is logged and handed back in
    /// [`LoadedAccounts::recovered_from`] so the caller can tell the
    /// operator. I/O errors are still returned.
    fn load_or_recover(&self) -> Result<LoadedAccounts, BankError> {
        match self.load() {
            Ok(accounts) => Ok(LoadedAccounts {
                accounts,
                recovered_from: None,
            }),
            Err(error @ BankError::CorruptStorage { .. }) => {
                tracing::warn!(%error, "starting with an empty account list");
                Ok(LoadedAccounts {
                    accounts: Vec::new(),
                    recovered_from: Some(error),
                })
            }
            Err(error) => Err(error),
        }
    }
}
