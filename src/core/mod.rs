//! Core business logic module
//!
//! This module contains the account processing components:
//! - `traits` - Clock and storage abstractions
//! - `accrual` - Fee and interest arithmetic
//! - `account_ops` - Balance operations on a single account
//! - `account_manager` - The in-memory account collection
//! - `engine` - Command orchestration (lookup, accrual, operation, save)
//! - `clock` - System and manual clocks

pub mod account_manager;
pub mod account_ops;
pub mod accrual;
pub mod clock;
pub mod engine;
pub mod traits;

pub use account_manager::AccountManager;
pub use accrual::AccrualPolicy;
pub use clock::{ManualClock, SystemClock};
pub use engine::BankEngine;
pub use traits::{AccountStore, Clock, LoadedAccounts};
