//! Operator commands and their results
//!
//! A [`Command`] is one menu action with all of its inputs already collected.
//! The engine turns it into an [`Outcome`] or a [`BankError`](super::BankError).

use super::account::{Account, AccountKind};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

/// Account number and password as typed by the operator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub account_number: String,
    pub password: String,
}

impl Credentials {
    pub fn new(account_number: impl Into<String>, password: impl Into<String>) -> Self {
        Credentials {
            account_number: account_number.into(),
            password: password.into(),
        }
    }
}

/// Everything needed to open a new account
#[derive(Debug, Clone, PartialEq)]
pub struct Registration {
    pub kind: AccountKind,
    pub account_number: String,
    pub owner: String,
    pub password: String,
    /// Opening deposit; zero opens an empty account
    pub initial_deposit: Decimal,
}

/// Operations offered by the menu
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Open a new account
    Register(Registration),

    /// Show balances (after applying any due accrual)
    Show(Credentials),

    /// Credit the main balance
    Deposit {
        credentials: Credentials,
        amount: Decimal,
    },

    /// Debit the main balance
    Withdraw {
        credentials: Credentials,
        amount: Decimal,
    },

    /// Move funds from the main balance into savings
    ///
    /// Hybrid accounts lock the funds for `cycle_days`; simple savings
    /// accounts ignore it.
    SavingsDeposit {
        credentials: Credentials,
        amount: Decimal,
        cycle_days: Option<u32>,
    },

    /// Move funds from savings back into the main balance
    SavingsWithdraw {
        credentials: Credentials,
        amount: Decimal,
    },
}

impl Command {
    /// Short name used in logs
    pub fn name(&self) -> &'static str {
        match self {
            Command::Register(_) => "register",
            Command::Show(_) => "show",
            Command::Deposit { .. } => "deposit",
            Command::Withdraw { .. } => "withdraw",
            Command::SavingsDeposit { .. } => "savings deposit",
            Command::SavingsWithdraw { .. } => "savings withdraw",
        }
    }
}

/// What catch-up accrual did to an account before a command ran
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AccrualReport {
    /// Monthly fee cycles processed
    pub fee_cycles: u32,
    /// Total fees deducted from the main balance
    pub fees_charged: Decimal,
    /// Fees not collected because the main balance was exhausted
    pub fees_waived: Decimal,
    /// Interest cycles processed
    pub interest_cycles: u32,
    /// Total interest credited to savings
    pub interest_credited: Decimal,
}

impl AccrualReport {
    /// Whether any cycle was processed (and so the account changed)
    pub fn changed(&self) -> bool {
        self.fee_cycles > 0 || self.interest_cycles > 0
    }
}

/// Result of a successful command
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    /// Snapshot of the account after the command
    pub account: Account,
    /// Accrual applied before the command ran
    pub accrual: AccrualReport,
    /// The time the command ran at
    pub as_of: DateTime<Utc>,
}
