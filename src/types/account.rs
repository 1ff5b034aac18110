//! Account-related types for the bank ledger
//!
//! This module defines the Account record and the AccountKind tag that
//! replaces a per-kind type hierarchy. Balance operations live in
//! [`crate::core::account_ops`].

use super::timestamp;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kind of account, stored in the `type` field of each record
///
/// The tag decides which savings operations an account supports and
/// whether time-based accrual applies to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AccountKind {
    /// Plain account with a main balance only
    #[serde(rename = "BankAccount")]
    Basic,

    /// Everyday account with a main balance only
    #[serde(rename = "CheckingAccount")]
    Checking,

    /// Main balance plus a freely movable savings balance
    #[serde(rename = "SavingsAccount", alias = "SavingAccount")]
    Savings,

    /// Main balance plus locked, interest-bearing savings and a monthly fee
    #[default]
    #[serde(rename = "HybridAccount")]
    Hybrid,
}

impl AccountKind {
    /// Whether fees and interest accrue on this kind of account
    pub fn accrues(self) -> bool {
        matches!(self, AccountKind::Hybrid)
    }

    /// Whether the account carries a savings balance at all
    pub fn has_savings(self) -> bool {
        matches!(self, AccountKind::Savings | AccountKind::Hybrid)
    }

    /// Lowercase name used in prompts and messages
    pub fn as_str(self) -> &'static str {
        match self {
            AccountKind::Basic => "basic",
            AccountKind::Checking => "checking",
            AccountKind::Savings => "savings",
            AccountKind::Hybrid => "hybrid",
        }
    }
}

impl fmt::Display for AccountKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccountKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "basic" => Ok(AccountKind::Basic),
            "checking" => Ok(AccountKind::Checking),
            "savings" | "saving" => Ok(AccountKind::Savings),
            "hybrid" | "" => Ok(AccountKind::Hybrid),
            other => Err(format!("Unknown account type '{}'", other)),
        }
    }
}

/// A single account record
///
/// Serializes to the flat JSON object used by the data file. Every field
/// after `password` is optional on read and falls back to the defaults of a
/// freshly registered account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    /// Kind tag used to dispatch savings operations
    #[serde(rename = "type", default)]
    pub kind: AccountKind,

    /// Account number, unique within the collection
    pub account_number: String,

    /// Display name of the owner
    pub owner: String,

    /// Plaintext credential
    pub password: String,

    /// Main (spendable) balance
    #[serde(default)]
    pub balance: Decimal,

    /// Balance held in the savings sub-account
    #[serde(default)]
    pub saving_balance: Decimal,

    /// Length in days of the current interest cycle; 0 means no active cycle
    #[serde(default)]
    pub saved_days: u32,

    /// Savings cannot be withdrawn before this instant
    #[serde(default = "Utc::now", with = "timestamp")]
    pub unlock_date: DateTime<Utc>,

    /// Last processed monthly-fee boundary
    #[serde(default = "Utc::now", with = "timestamp")]
    pub last_fee_date: DateTime<Utc>,

    /// Last processed interest boundary
    #[serde(default = "Utc::now", with = "timestamp")]
    pub last_interest_date: DateTime<Utc>,
}

impl Account {
    /// Create a new account with zero balances and every date set to `now`
    ///
    /// # Arguments
    ///
    /// * `kind` - The kind of account to open
    /// * `account_number` - Unique account number
    /// * `owner` - Display name of the owner
    /// * `password` - Plaintext credential
    /// * `now` - Registration time
    pub fn new(
        kind: AccountKind,
        account_number: impl Into<String>,
        owner: impl Into<String>,
        password: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Account {
            kind,
            account_number: account_number.into(),
            owner: owner.into(),
            password: password.into(),
            balance: Decimal::ZERO,
            saving_balance: Decimal::ZERO,
            saved_days: 0,
            unlock_date: now,
            last_fee_date: now,
            last_interest_date: now,
        }
    }

    /// Check whether the given credentials belong to this account
    pub fn matches(&self, account_number: &str, password: &str) -> bool {
        self.account_number == account_number && self.password == password
    }
}
