//! Account management module
//!
//! This module provides the `AccountManager` struct which holds the in-memory
//! account collection loaded at startup.
//!
//! The AccountManager is responsible for:
//! - Registering new accounts and rejecting duplicate account numbers
//! - Looking accounts up by account number and password
//! - Dropping a registration that could not be persisted
//! - Exposing the collection, in stored order, for persistence

use crate::types::{Account, BankError};

/// Manages the collection of accounts
///
/// Accounts are kept in a `Vec` so the stored order survives a
/// load/save cycle.
#[derive(Debug, Default)]
pub struct AccountManager {
    accounts: Vec<Account>,
}

impl AccountManager {
    /// Create a new AccountManager with no accounts
    pub fn new() -> Self {
        AccountManager {
            accounts: Vec::new(),
        }
    }

    /// Create an AccountManager over an already loaded collection
    ///
    /// Duplicates present in the stored document are kept; lookups resolve
    /// to the first match.
    pub fn from_accounts(accounts: Vec<Account>) -> Self {
        AccountManager { accounts }
    }

    /// Add a new account to the collection
    ///
    /// # Errors
    ///
    /// Returns `DuplicateAccount` if an account with the same number exists.
    pub fn register(&mut self, account: Account) -> Result<&mut Account, BankError> {
        if self.contains(&account.account_number) {
            return Err(BankError::duplicate_account(&account.account_number));
        }
        self.accounts.push(account);
        let last = self.accounts.len() - 1;
        Ok(&mut self.accounts[last])
    }

    /// Check whether an account number is taken
    pub fn contains(&self, account_number: &str) -> bool {
        self.accounts
            .iter()
            .any(|account| account.account_number == account_number)
    }

    /// Find the account matching both `account_number` and `password`
    ///
    /// # Errors
    ///
    /// Returns `InvalidCredentials` if no account matches.
    pub fn authenticate(
        &mut self,
        account_number: &str,
        password: &str,
    ) -> Result<&mut Account, BankError> {
        self.accounts
            .iter_mut()
            .find(|account| account.matches(account_number, password))
            .ok_or(BankError::InvalidCredentials)
    }

    /// Read-only variant of [`AccountManager::authenticate`]
    ///
    /// # Errors
    ///
    /// Returns `InvalidCredentials` if no account matches.
    pub fn find(&self, account_number: &str, password: &str) -> Result<&Account, BankError> {
        self.accounts
            .iter()
            .find(|account| account.matches(account_number, password))
            .ok_or(BankError::InvalidCredentials)
    }

    /// Remove the first account with `account_number`
    pub fn remove(&mut self, account_number: &str) -> Option<Account> {
        let index = self
            .accounts
            .iter()
            .position(|account| account.account_number == account_number)?;
        Some(self.accounts.remove(index))
    }

    /// All accounts in stored order
    pub fn accounts(&self) -> &[Account] {
        &self.accounts
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }
}
