//! Types module
//!
//! Contains core data structures used throughout the application.
//! This module organizes types into logical submodules:
//! - `account`: The account record and its kind tag
//! - `command`: Operator commands and their outcomes
//! - `error`: Error types for the ledger
//! - `timestamp`: Serde adapter for stored timestamps

pub mod account;
pub mod command;
pub mod error;
pub mod timestamp;

pub use account::{Account, AccountKind};
pub use command::{AccrualReport, Command, Credentials, Outcome, Registration};
pub use error::BankError;
