//! Error types for the bank ledger
//!
//! This module defines all error types that can occur while operating on
//! accounts or their backing storage. Errors are designed to be descriptive
//! and user-friendly for CLI output.
//!
//! # Error Categories
//!
//! - **Storage Errors**: I/O failures, corrupt JSON documents
//! - **Lookup Errors**: Unknown credentials, duplicate account numbers
//! - **Balance Errors**: Invalid amounts, insufficient funds, locked savings
//! - **Arithmetic Errors**: Overflow in balance calculations

use rust_decimal::Decimal;
use thiserror::Error;

/// Main error type for the bank ledger
///
/// Every variant is terminal for the single operation that raised it.
/// The interactive loop reports it and continues with the next prompt.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BankError {
    /// I/O error occurred while reading or writing the data file
    #[error("I/O error: {message}")]
    IoError {
        /// Description of the I/O error
        message: String,
    },

    /// The data file exists but does not hold a valid account document
    #[error("Corrupt storage in {path}: {message}")]
    CorruptStorage {
        /// Path of the data file
        path: String,
        /// Description of the parse failure
        message: String,
    },

    /// No account matches the given number and password
    #[error("Invalid account number or password")]
    InvalidCredentials,

    /// An account with this number is already registered
    #[error("Account {account} already exists")]
    DuplicateAccount {
        /// The duplicated account number
        account: String,
    },

    /// Transfer amount is zero, negative or could not be parsed
    #[error("Invalid amount '{amount}': amounts must be greater than zero")]
    InvalidAmount {
        /// The rejected amount as entered
        amount: String,
    },

    /// The funding balance does not cover the requested amount
    #[error("Insufficient funds in account {account}: available {available}, requested {requested}")]
    InsufficientFunds {
        /// Account number
        account: String,
        /// Balance the transfer would be funded from
        available: Decimal,
        /// Requested amount
        requested: Decimal,
    },

    /// Savings cannot be withdrawn before the unlock date
    #[error("Savings in account {account} are locked for {remaining_days} more day(s)")]
    StillLocked {
        /// Account number
        account: String,
        /// Whole days (rounded up) until the unlock date
        remaining_days: i64,
    },

    /// Interest cycles must last at least one day
    #[error("Invalid cycle length {days}: savings must be locked for at least one day and unlock on a valid date")]
    InvalidCycleLength {
        /// The rejected cycle length
        days: u32,
    },

    /// The account kind does not support the requested operation
    #[error("{operation} is not available for {kind} account {account}")]
    UnsupportedOperation {
        /// Account number
        account: String,
        /// Display name of the account kind
        kind: String,
        /// Operation that was attempted
        operation: String,
    },

    /// Arithmetic overflow would occur
    #[error("Arithmetic overflow in {operation} for account {account}")]
    ArithmeticOverflow {
        /// Operation that would overflow
        operation: String,
        /// Account number
        account: String,
    },
}

impl From<std::io::Error> for BankError {
    fn from(error: std::io::Error) -> Self {
        BankError::IoError {
            message: error.to_string(),
        }
    }
}

impl BankError {
    /// Create an InsufficientFunds error
    pub fn insufficient_funds(account: &str, available: Decimal, requested: Decimal) -> Self {
        BankError::InsufficientFunds {
            account: account.to_string(),
            available,
            requested,
        }
    }

    /// Create an InvalidAmount error
    pub fn invalid_amount(amount: impl ToString) -> Self {
        BankError::InvalidAmount {
            amount: amount.to_string(),
        }
    }

    /// Create a StillLocked error
    pub fn still_locked(account: &str, remaining_days: i64) -> Self {
        BankError::StillLocked {
            account: account.to_string(),
            remaining_days,
        }
    }

    /// Create a DuplicateAccount error
    pub fn duplicate_account(account: &str) -> Self {
        BankError::DuplicateAccount {
            account: account.to_string(),
        }
    }

    /// Create a CorruptStorage error
    pub fn corrupt_storage(path: &str, message: impl ToString) -> Self {
        BankError::CorruptStorage {
            path: path.to_string(),
            message: message.to_string(),
        }
    }

    /// Create an UnsupportedOperation error
    pub fn unsupported_operation(account: &str, kind: &str, operation: &str) -> Self {
        BankError::UnsupportedOperation {
            account: account.to_string(),
            kind: kind.to_string(),
            operation: operation.to_string(),
        }
    }

    /// Create an ArithmeticOverflow error
    pub fn arithmetic_overflow(operation: &str, account: &str) -> Self {
        BankError::ArithmeticOverflow {
            operation: operation.to_string(),
            account: account.to_string(),
        }
    }
}
