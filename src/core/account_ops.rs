//! Balance operations on a single account
//!
//! This module implements the account state machine: transfers between the
//! main and savings balances, the savings lock window, and catch-up accrual.
//!
//! Every operation validates first and mutates last, so a failed call
//! leaves the account exactly as it was. Amounts must be strictly positive;
//! that check runs before any other.

use crate::core::accrual::{self, AccrualPolicy};
use crate::types::{Account, AccountKind, AccrualReport, BankError};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

fn ensure_positive(amount: Decimal) -> Result<(), BankError> {
    if amount <= Decimal::ZERO {
        return Err(BankError::invalid_amount(amount));
    }
    Ok(())
}

impl Account {
    fn ensure_kind(&self, kind: AccountKind, operation: &str) -> Result<(), BankError> {
        if self.kind != kind {
            return Err(BankError::unsupported_operation(
                &self.account_number,
                self.kind.as_str(),
                operation,
            ));
        }
        Ok(())
    }

    fn checked_credit(
        &self,
        balance: Decimal,
        amount: Decimal,
        operation: &str,
    ) -> Result<Decimal, BankError> {
        balance
            .checked_add(amount)
            .ok_or_else(|| BankError::arithmetic_overflow(operation, &self.account_number))
    }

    /// Deposit funds into the main balance
    ///
    /// # Errors
    ///
    /// - `InvalidAmount` if `amount <= 0`
    /// - `ArithmeticOverflow` if the balance would overflow
    pub fn deposit(&mut self, amount: Decimal) -> Result<(), BankError> {
        ensure_positive(amount)?;
        self.balance = self.checked_credit(self.balance, amount, "deposit")?;
        Ok(())
    }

    /// Withdraw funds from the main balance
    ///
    /// # Errors
    ///
    /// - `InvalidAmount` if `amount <= 0`
    /// - `InsufficientFunds` if `amount` exceeds the main balance
    pub fn withdraw(&mut self, amount: Decimal) -> Result<(), BankError> {
        ensure_positive(amount)?;
        if amount > self.balance {
            return Err(BankError::insufficient_funds(
                &self.account_number,
                self.balance,
                amount,
            ));
        }
        self.balance -= amount;
        Ok(())
    }

    /// Lock funds from the main balance into interest-bearing savings
    ///
    /// Starts a new interest cycle of `cycle_days` days at `now` and moves
    /// the unlock date to the end of it. Any previous cycle parameters are
    /// replaced; only one cycle is active per account.
    ///
    /// # Errors
    ///
    /// - `InvalidAmount` if `amount <= 0`
    /// - `UnsupportedOperation` unless this is a hybrid account
    /// - `InvalidCycleLength` if `cycle_days == 0` or the unlock date would
    ///   fall outside the representable calendar
    /// - `InsufficientFunds` if `amount` exceeds the main balance
    pub fn lock_to_savings(
        &mut self,
        amount: Decimal,
        cycle_days: u32,
        now: DateTime<Utc>,
    ) -> Result<(), BankError> {
        ensure_positive(amount)?;
        self.ensure_kind(AccountKind::Hybrid, "savings lock")?;
        let unlock_date = Some(cycle_days)
            .filter(|&days| days > 0)
            .and_then(|days| now.checked_add_signed(accrual::days(days)))
            .ok_or(BankError::InvalidCycleLength { days: cycle_days })?;
        if amount > self.balance {
            return Err(BankError::insufficient_funds(
                &self.account_number,
                self.balance,
                amount,
            ));
        }
        let saving_balance = self.checked_credit(self.saving_balance, amount, "savings lock")?;

        self.balance -= amount;
        self.saving_balance = saving_balance;
        self.saved_days = cycle_days;
        self.last_interest_date = now;
        self.unlock_date = unlock_date;
        Ok(())
    }

    /// Release funds from savings back to the main balance
    ///
    /// # Errors
    ///
    /// - `InvalidAmount` if `amount <= 0`
    /// - `UnsupportedOperation` unless this is a hybrid account
    /// - `StillLocked` if `now` is before the unlock date
    /// - `InsufficientFunds` if `amount` exceeds the savings balance
    pub fn unlock_from_savings(
        &mut self,
        amount: Decimal,
        now: DateTime<Utc>,
    ) -> Result<(), BankError> {
        ensure_positive(amount)?;
        self.ensure_kind(AccountKind::Hybrid, "savings unlock")?;
        if now < self.unlock_date {
            return Err(BankError::still_locked(
                &self.account_number,
                accrual::remaining_days(now, self.unlock_date),
            ));
        }
        if amount > self.saving_balance {
            return Err(BankError::insufficient_funds(
                &self.account_number,
                self.saving_balance,
                amount,
            ));
        }
        let balance = self.checked_credit(self.balance, amount, "savings unlock")?;

        self.saving_balance -= amount;
        self.balance = balance;
        Ok(())
    }

    /// Move funds from the main balance into a simple savings balance
    ///
    /// # Errors
    ///
    /// - `InvalidAmount` if `amount <= 0`
    /// - `UnsupportedOperation` unless this is a savings account
    /// - `InsufficientFunds` if `amount` exceeds the main balance
    pub fn transfer_to_savings(&mut self, amount: Decimal) -> Result<(), BankError> {
        ensure_positive(amount)?;
        self.ensure_kind(AccountKind::Savings, "savings deposit")?;
        if amount > self.balance {
            return Err(BankError::insufficient_funds(
                &self.account_number,
                self.balance,
                amount,
            ));
        }
        let saving_balance =
            self.checked_credit(self.saving_balance, amount, "savings deposit")?;

        self.balance -= amount;
        self.saving_balance = saving_balance;
        Ok(())
    }

    /// Move funds from a simple savings balance back to the main balance
    ///
    /// # Errors
    ///
    /// - `InvalidAmount` if `amount <= 0`
    /// - `UnsupportedOperation` unless this is a savings account
    /// - `InsufficientFunds` if `amount` exceeds the savings balance
    pub fn transfer_from_savings(&mut self, amount: Decimal) -> Result<(), BankError> {
        ensure_positive(amount)?;
        self.ensure_kind(AccountKind::Savings, "savings withdraw")?;
        if amount > self.saving_balance {
            return Err(BankError::insufficient_funds(
                &self.account_number,
                self.saving_balance,
                amount,
            ));
        }
        let balance = self.checked_credit(self.balance, amount, "savings withdraw")?;

        self.saving_balance -= amount;
        self.balance = balance;
        Ok(())
    }

    /// Deduct the maintenance fee for every fee cycle due as of `now`
    ///
    /// Each cycle charges at most what is left in the main balance; the
    /// balance floors at zero and the uncollected part is waived. The fee
    /// boundary advances by whole cycles either way.
    ///
    /// Returns `(cycles, charged, waived)`.
    pub fn apply_monthly_fee(
        &mut self,
        now: DateTime<Utc>,
        policy: &AccrualPolicy,
    ) -> (u32, Decimal, Decimal) {
        let cycles = policy.due_fee_cycles(now, self.last_fee_date);
        let mut charged = Decimal::ZERO;
        let mut waived = Decimal::ZERO;

        for _ in 0..cycles {
            let fee = policy.monthly_fee.min(self.balance.max(Decimal::ZERO));
            self.balance -= fee;
            charged += fee;
            waived = waived.saturating_add(policy.monthly_fee - fee);
        }

        if cycles > 0 {
            self.last_fee_date += accrual::cycle_span(policy.fee_cycle_days, cycles);
            if !waived.is_zero() {
                tracing::warn!(
                    account = %self.account_number,
                    %waived,
                    "main balance exhausted, fee waived"
                );
            }
        }

        (cycles, charged, waived)
    }

    /// Credit interest on savings for every interest cycle due as of `now`
    ///
    /// Cycles compound: each one earns interest on the savings balance left
    /// by the previous one. Nothing is changed unless every cycle succeeds.
    ///
    /// Returns `(cycles, credited)`.
    ///
    /// # Errors
    ///
    /// Returns `ArithmeticOverflow` if the interest or the new savings
    /// balance cannot be represented.
    pub fn apply_interest(
        &mut self,
        now: DateTime<Utc>,
        policy: &AccrualPolicy,
    ) -> Result<(u32, Decimal), BankError> {
        let cycles = policy.due_interest_cycles(
            now,
            self.last_interest_date,
            self.saved_days,
            self.saving_balance,
        );
        let mut saving_balance = self.saving_balance;
        let mut credited = Decimal::ZERO;

        for _ in 0..cycles {
            let interest = policy
                .interest_amount(saving_balance, self.saved_days)
                .ok_or_else(|| BankError::arithmetic_overflow("interest", &self.account_number))?;
            saving_balance = self.checked_credit(saving_balance, interest, "interest")?;
            credited = self.checked_credit(credited, interest, "interest")?;
        }

        if cycles > 0 {
            self.saving_balance = saving_balance;
            self.last_interest_date += accrual::cycle_span(self.saved_days, cycles);
        }

        Ok((cycles, credited))
    }

    /// Apply every fee and interest cycle due as of `now`
    ///
    /// Only hybrid accounts accrue; other kinds are left untouched.
    ///
    /// # Errors
    ///
    /// Returns `ArithmeticOverflow` from interest accrual, in which case the
    /// account is left unchanged.
    pub fn catch_up(
        &mut self,
        now: DateTime<Utc>,
        policy: &AccrualPolicy,
    ) -> Result<AccrualReport, BankError> {
        if !self.kind.accrues() {
            return Ok(AccrualReport::default());
        }

        // Interest is the only step that can fail, and fees never read the
        // fields it writes.
        let (interest_cycles, interest_credited) = self.apply_interest(now, policy)?;
        let (fee_cycles, fees_charged, fees_waived) = self.apply_monthly_fee(now, policy);

        let report = AccrualReport {
            fee_cycles,
            fees_charged,
            fees_waived,
            interest_cycles,
            interest_credited,
        };
        if report.changed() {
            tracing::debug!(account = %self.account_number, ?report, "accrual applied");
        }
        Ok(report)
    }
}
