//! Rust Bank Ledger Library
//! # Overview
//!
//! This library provides a small single-user bookkeeping engine: accounts
//! with a main balance and a savings balance, persisted as one JSON document.
//!
//! # Architecture
//!
//! The system is organized into several key components:
//!
//! - [`types`] - Core data types (Account, Command, BankError, etc.)
//! - [`cli`] - CLI arguments parsing and the interactive menu
//! - [`core`] - Business logic components:
//!   - [`core::accrual`] - Fee and interest arithmetic
//!   - [`core::account_ops`] - Balance operations and catch-up accrual
//!   - [`core::account_manager`] - The in-memory account collection
//!   - [`core::engine`] - Load once, mutate, persist
//! - [`io`] - JSON storage and CSV export
//!
//! # Account Kinds
//!
//! - **Basic / Checking**: main balance only
//! - **Savings**: main balance plus a savings balance that moves freely
//! - **Hybrid**: savings are locked for an operator-chosen cycle and earn
//!   0.1% simple interest per day; a 10.00 fee is charged every 30 days
//!
//! # Accrual
//!
//! Fees and interest are caught up before every operation: every cycle that
//! elapsed since the last processed boundary is applied in sequence, and
//! boundaries advance by whole cycles.

// Module declarations
pub mod cli;
pub mod core;
pub mod io;
pub mod types;

pub use core::{AccountManager, AccrualPolicy, BankEngine};
pub use io::{write_accounts_csv, JsonFileStore};
pub use types::{
    Account, AccountKind, AccrualReport, BankError, Command, Credentials, Outcome, Registration,
};
