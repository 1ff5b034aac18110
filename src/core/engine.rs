//! Bank engine
//!
//! This module provides the BankEngine that runs operator commands by
//! coordinating the AccountManager, the AccountStore and the clock.
//!
//! Every authenticated command follows the same sequence:
//! 1. Look the account up by the credentials given with this command
//! 2. Apply every fee and interest cycle due as of now
//! 3. Run the operation
//! 4. Rewrite the whole collection to storage
//!
//! Storage is rewritten when the operation succeeds, and also when it fails
//! after catch-up accrual changed the account, so accrued cycles are never
//! applied twice. If that save fails, the in-memory change is rolled back
//! and the collection stays equal to what was last written.

use crate::core::account_manager::AccountManager;
use crate::core::accrual::AccrualPolicy;
use crate::core::traits::{AccountStore, Clock};
use crate::types::{
    Account, AccountKind, AccrualReport, BankError, Command, Credentials, Outcome, Registration,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

/// Command processing engine
///
/// Owns the in-memory collection for the lifetime of the process. The
/// collection is loaded once in [`BankEngine::open`] and persisted after
/// each mutation.
pub struct BankEngine<S, C> {
    account_manager: AccountManager,
    store: S,
    clock: C,
    policy: AccrualPolicy,
    recovered_from: Option<BankError>,
}

impl<S: AccountStore, C: Clock> BankEngine<S, C> {
    /// Load the collection from `store` and create an engine over it
    ///
    /// A corrupt document is replaced by an empty collection; the error is
    /// kept and available from [`BankEngine::recovered_from`].
    ///
    /// # Errors
    ///
    /// Returns `IoError` if the store cannot be read at all.
    pub fn open(store: S, policy: AccrualPolicy, clock: C) -> Result<Self, BankError> {
        let loaded = store.load_or_recover()?;
        tracing::info!(accounts = loaded.accounts.len(), "ledger opened");

        Ok(BankEngine {
            account_manager: AccountManager::from_accounts(loaded.accounts),
            store,
            clock,
            policy,
            recovered_from: loaded.recovered_from,
        })
    }

    /// The storage error recovered from at startup, if any
    pub fn recovered_from(&self) -> Option<&BankError> {
        self.recovered_from.as_ref()
    }

    /// All accounts in stored order, as last persisted or mutated
    pub fn accounts(&self) -> &[Account] {
        self.account_manager.accounts()
    }

    pub fn policy(&self) -> &AccrualPolicy {
        &self.policy
    }

    /// Check credentials without touching the account
    ///
    /// Returns the account kind so the caller can ask the right follow-up
    /// questions.
    ///
    /// # Errors
    ///
    /// Returns `InvalidCredentials` if no account matches.
    pub fn authenticate(&self, credentials: &Credentials) -> Result<AccountKind, BankError> {
        self.account_manager
            .find(&credentials.account_number, &credentials.password)
            .map(|account| account.kind)
    }

    /// Run a single command
    ///
    /// # Errors
    ///
    /// Returns the error of the failed lookup, accrual or operation, or
    /// `IoError` if the collection could not be saved afterwards (the
    /// command is then undone in memory).
    pub fn execute(&mut self, command: Command) -> Result<Outcome, BankError> {
        let name = command.name();
        let result = match command {
            Command::Register(registration) => self.register(registration),
            Command::Show(credentials) => self.with_account(&credentials, |_, _| Ok(())),
            Command::Deposit {
                credentials,
                amount,
            } => self.with_account(&credentials, |account, _| account.deposit(amount)),
            Command::Withdraw {
                credentials,
                amount,
            } => self.with_account(&credentials, |account, _| account.withdraw(amount)),
            Command::SavingsDeposit {
                credentials,
                amount,
                cycle_days,
            } => self.with_account(&credentials, |account, now| match account.kind {
                AccountKind::Hybrid => {
                    account.lock_to_savings(amount, cycle_days.unwrap_or(0), now)
                }
                _ => account.transfer_to_savings(amount),
            }),
            Command::SavingsWithdraw {
                credentials,
                amount,
            } => self.with_account(&credentials, |account, now| match account.kind {
                AccountKind::Hybrid => account.unlock_from_savings(amount, now),
                _ => account.transfer_from_savings(amount),
            }),
        };

        match &result {
            Ok(outcome) => tracing::info!(
                command = name,
                account = %outcome.account.account_number,
                "command completed"
            ),
            Err(error) => tracing::info!(command = name, %error, "command rejected"),
        }
        result
    }

    fn register(&mut self, registration: Registration) -> Result<Outcome, BankError> {
        if registration.initial_deposit.is_sign_negative() {
            return Err(BankError::invalid_amount(registration.initial_deposit));
        }

        let now = self.clock.now();
        let mut account = Account::new(
            registration.kind,
            registration.account_number,
            registration.owner,
            registration.password,
            now,
        );
        if registration.initial_deposit > Decimal::ZERO {
            account.deposit(registration.initial_deposit)?;
        }

        let snapshot = self.account_manager.register(account)?.clone();
        if let Err(error) = self.persist() {
            self.account_manager.remove(&snapshot.account_number);
            return Err(error);
        }

        Ok(Outcome {
            account: snapshot,
            accrual: AccrualReport::default(),
            as_of: now,
        })
    }

    fn with_account<F>(
        &mut self,
        credentials: &Credentials,
        operation: F,
    ) -> Result<Outcome, BankError>
    where
        F: FnOnce(&mut Account, DateTime<Utc>) -> Result<(), BankError>,
    {
        let now = self.clock.now();
        let account = self
            .account_manager
            .authenticate(&credentials.account_number, &credentials.password)?;

        let before = account.clone();

        let accrual = account.catch_up(now, &self.policy)?;
        let result = operation(account, now);
        let snapshot = account.clone();

        if result.is_ok() || accrual.changed() {
            if let Err(error) = self.persist() {
                if let Ok(account) = self
                    .account_manager
                    .authenticate(&credentials.account_number, &credentials.password)
                {
                    *account = before;
                }
                return Err(error);
            }
        }
        result?;

        Ok(Outcome {
            account: snapshot,
            accrual,
            as_of: now,
        })
    }

    fn persist(&self) -> Result<(), BankError> {
        self.store.save(self.account_manager.accounts())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::clock::ManualClock;
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use rstest::rstest;
    use std::cell::{Cell, RefCell};

    /// In-memory store that counts saves
    #[derive(Default)]
    struct MemoryStore {
        initial: Vec<Account>,
        saved: RefCell<Option<Vec<Account>>>,
        saves: Cell<usize>,
        corrupt: bool,
        fail_saves: Cell<bool>,
    }

    impl AccountStore for &MemoryStore {
        fn load(&self) -> Result<Vec<Account>, BankError> {
            if self.corrupt {
                return Err(BankError::corrupt_storage("memory", "bad document"));
            }
            Ok(self.initial.clone())
        }

        fn save(&self, accounts: &[Account]) -> Result<(), BankError> {
            if self.fail_saves.get() {
                return Err(BankError::IoError {
                    message: "disk full".to_string(),
                });
            }
            self.saves.set(self.saves.get() + 1);
            *self.saved.borrow_mut() = Some(accounts.to_vec());
            Ok(())
        }
    }

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
    }

    fn creds(number: &str, password: &str) -> Credentials {
        Credentials::new(number, password)
    }

    fn registration(kind: AccountKind, initial: i64) -> Command {
        Command::Register(Registration {
            kind,
            account_number: "A1".to_string(),
            owner: "Alice".to_string(),
            password: "pw1".to_string(),
            initial_deposit: Decimal::new(initial, 0),
        })
    }

    fn open<'a>(
        store: &'a MemoryStore,
        clock: &'a ManualClock,
    ) -> BankEngine<&'a MemoryStore, &'a ManualClock> {
        BankEngine::open(store, AccrualPolicy::default(), clock).unwrap()
    }

    #[test]
    fn test_register_deposit_withdraw_scenario() {
        let store = MemoryStore::default();
        let clock = ManualClock::new(t0());
        let mut engine = open(&store, &clock);

        let outcome = engine.execute(registration(AccountKind::Hybrid, 100)).unwrap();
        assert_eq!(outcome.account.balance, Decimal::new(100, 0));

        let outcome = engine
            .execute(Command::Deposit {
                credentials: creds("A1", "pw1"),
                amount: Decimal::new(50, 0),
            })
            .unwrap();
        assert_eq!(outcome.account.balance, Decimal::new(150, 0));

        let result = engine.execute(Command::Withdraw {
            credentials: creds("A1", "pw1"),
            amount: Decimal::new(200, 0),
        });
        assert!(matches!(
            result.unwrap_err(),
            BankError::InsufficientFunds { .. }
        ));
        assert_eq!(engine.accounts()[0].balance, Decimal::new(150, 0));

        let outcome = engine
            .execute(Command::Withdraw {
                credentials: creds("A1", "pw1"),
                amount: Decimal::new(150, 0),
            })
            .unwrap();
        assert_eq!(outcome.account.balance, Decimal::ZERO);

        let saved = store.saved.borrow().clone().unwrap();
        assert_eq!(saved[0].balance, Decimal::ZERO);
    }

    #[test]
    fn test_failed_command_without_accrual_does_not_save() {
        let store = MemoryStore::default();
        let clock = ManualClock::new(t0());
        let mut engine = open(&store, &clock);
        engine.execute(registration(AccountKind::Hybrid, 10)).unwrap();
        let saves = store.saves.get();

        let _ = engine.execute(Command::Withdraw {
            credentials: creds("A1", "pw1"),
            amount: Decimal::new(20, 0),
        });

        assert_eq!(store.saves.get(), saves);
    }

    #[test]
    fn test_failed_command_after_accrual_still_saves() {
        let store = MemoryStore::default();
        let clock = ManualClock::new(t0());
        let mut engine = open(&store, &clock);
        engine.execute(registration(AccountKind::Hybrid, 100)).unwrap();
        let saves = store.saves.get();

        clock.advance(Duration::days(30));
        let result = engine.execute(Command::Withdraw {
            credentials: creds("A1", "pw1"),
            amount: Decimal::new(95, 0),
        });

        assert!(matches!(
            result.unwrap_err(),
            BankError::InsufficientFunds { .. }
        ));
        assert_eq!(store.saves.get(), saves + 1);
        let saved = store.saved.borrow().clone().unwrap();
        assert_eq!(saved[0].balance, Decimal::new(90, 0));
    }

    #[test]
    fn test_invalid_credentials_change_nothing() {
        let store = MemoryStore::default();
        let clock = ManualClock::new(t0());
        let mut engine = open(&store, &clock);
        engine.execute(registration(AccountKind::Hybrid, 100)).unwrap();
        let saves = store.saves.get();

        let result = engine.execute(Command::Deposit {
            credentials: creds("A1", "wrong"),
            amount: Decimal::new(5, 0),
        });

        assert_eq!(result.unwrap_err(), BankError::InvalidCredentials);
        assert_eq!(
            engine.authenticate(&creds("A9", "pw1")),
            Err(BankError::InvalidCredentials)
        );
        assert_eq!(store.saves.get(), saves);
    }

    #[rstest]
    #[case::hybrid(AccountKind::Hybrid)]
    #[case::savings(AccountKind::Savings)]
    #[case::checking(AccountKind::Checking)]
    fn test_authenticate_reports_kind(#[case] kind: AccountKind) {
        let store = MemoryStore::default();
        let clock = ManualClock::new(t0());
        let mut engine = open(&store, &clock);
        engine.execute(registration(kind, 0)).unwrap();

        assert_eq!(engine.authenticate(&creds("A1", "pw1")).unwrap(), kind);
    }

    #[test]
    fn test_register_duplicate_is_rejected() {
        let store = MemoryStore::default();
        let clock = ManualClock::new(t0());
        let mut engine = open(&store, &clock);
        engine.execute(registration(AccountKind::Hybrid, 0)).unwrap();

        let result = engine.execute(registration(AccountKind::Checking, 5));

        assert_eq!(result.unwrap_err(), BankError::duplicate_account("A1"));
        assert_eq!(engine.accounts().len(), 1);
    }

    #[test]
    fn test_register_negative_initial_deposit_is_rejected() {
        let store = MemoryStore::default();
        let clock = ManualClock::new(t0());
        let mut engine = open(&store, &clock);

        let result = engine.execute(registration(AccountKind::Hybrid, -1));

        assert!(matches!(result.unwrap_err(), BankError::InvalidAmount { .. }));
        assert!(engine.accounts().is_empty());
    }

    #[test]
    fn test_show_applies_fee_catch_up() {
        let store = MemoryStore::default();
        let clock = ManualClock::new(t0());
        let mut engine = open(&store, &clock);
        engine.execute(registration(AccountKind::Hybrid, 100)).unwrap();

        clock.advance(Duration::days(95));
        let outcome = engine.execute(Command::Show(creds("A1", "pw1"))).unwrap();

        assert_eq!(outcome.accrual.fee_cycles, 3);
        assert_eq!(outcome.accrual.fees_charged, Decimal::new(30, 0));
        assert_eq!(outcome.account.balance, Decimal::new(70, 0));
        assert_eq!(outcome.account.last_fee_date, t0() + Duration::days(90));

        let again = engine.execute(Command::Show(creds("A1", "pw1"))).unwrap();
        assert!(!again.accrual.changed());
        assert_eq!(again.account, outcome.account);
    }

    #[test]
    fn test_savings_lock_interest_and_unlock() {
        let store = MemoryStore::default();
        let clock = ManualClock::new(t0());
        let mut engine = open(&store, &clock);
        engine.execute(registration(AccountKind::Hybrid, 1000)).unwrap();

        let outcome = engine
            .execute(Command::SavingsDeposit {
                credentials: creds("A1", "pw1"),
                amount: Decimal::new(1000, 0),
                cycle_days: Some(10),
            })
            .unwrap();
        assert_eq!(outcome.account.balance, Decimal::ZERO);
        assert_eq!(outcome.account.unlock_date, t0() + Duration::days(10));

        clock.advance(Duration::days(5));
        let early = engine.execute(Command::SavingsWithdraw {
            credentials: creds("A1", "pw1"),
            amount: Decimal::new(10, 0),
        });
        assert_eq!(early.unwrap_err(), BankError::still_locked("A1", 5));

        clock.advance(Duration::days(15));
        let outcome = engine
            .execute(Command::SavingsWithdraw {
                credentials: creds("A1", "pw1"),
                amount: Decimal::new(20, 0),
            })
            .unwrap();

        assert_eq!(outcome.accrual.interest_cycles, 2);
        assert_eq!(outcome.accrual.interest_credited, Decimal::new(2010, 2));
        assert_eq!(outcome.account.saving_balance, Decimal::new(100010, 2));
        assert_eq!(outcome.account.balance, Decimal::new(20, 0));
    }

    #[test]
    fn test_savings_deposit_on_simple_savings_ignores_cycle() {
        let store = MemoryStore::default();
        let clock = ManualClock::new(t0());
        let mut engine = open(&store, &clock);
        engine.execute(registration(AccountKind::Savings, 100)).unwrap();

        let outcome = engine
            .execute(Command::SavingsDeposit {
                credentials: creds("A1", "pw1"),
                amount: Decimal::new(60, 0),
                cycle_days: None,
            })
            .unwrap();
        assert_eq!(outcome.account.saving_balance, Decimal::new(60, 0));
        assert_eq!(outcome.account.saved_days, 0);

        let outcome = engine
            .execute(Command::SavingsWithdraw {
                credentials: creds("A1", "pw1"),
                amount: Decimal::new(60, 0),
            })
            .unwrap();
        assert_eq!(outcome.account.balance, Decimal::new(100, 0));
    }

    #[test]
    fn test_savings_on_checking_is_unsupported() {
        let store = MemoryStore::default();
        let clock = ManualClock::new(t0());
        let mut engine = open(&store, &clock);
        engine.execute(registration(AccountKind::Checking, 100)).unwrap();

        let result = engine.execute(Command::SavingsDeposit {
            credentials: creds("A1", "pw1"),
            amount: Decimal::new(10, 0),
            cycle_days: Some(30),
        });

        assert!(matches!(
            result.unwrap_err(),
            BankError::UnsupportedOperation { .. }
        ));
    }

    #[test]
    fn test_hybrid_savings_deposit_without_cycle_is_rejected() {
        let store = MemoryStore::default();
        let clock = ManualClock::new(t0());
        let mut engine = open(&store, &clock);
        engine.execute(registration(AccountKind::Hybrid, 100)).unwrap();

        let result = engine.execute(Command::SavingsDeposit {
            credentials: creds("A1", "pw1"),
            amount: Decimal::new(10, 0),
            cycle_days: None,
        });

        assert_eq!(result.unwrap_err(), BankError::InvalidCycleLength { days: 0 });
    }

    #[test]
    fn test_open_recovers_from_corrupt_store() {
        let store = MemoryStore {
            corrupt: true,
            ..Default::default()
        };
        let clock = ManualClock::new(t0());
        let engine = open(&store, &clock);

        assert!(engine.accounts().is_empty());
        assert!(matches!(
            engine.recovered_from(),
            Some(BankError::CorruptStorage { .. })
        ));
    }

    #[test]
    fn test_open_uses_stored_accounts() {
        let store = MemoryStore {
            initial: vec![Account::new(AccountKind::Checking, "C1", "Carol", "pw", t0())],
            ..Default::default()
        };
        let clock = ManualClock::new(t0());
        let engine = open(&store, &clock);

        assert!(engine.recovered_from().is_none());
        assert_eq!(
            engine.authenticate(&creds("C1", "pw")).unwrap(),
            AccountKind::Checking
        );
    }

    #[test]
    fn test_failed_save_rolls_back_deposit() {
        let store = MemoryStore::default();
        let clock = ManualClock::new(t0());
        let mut engine = open(&store, &clock);
        engine.execute(registration(AccountKind::Checking, 100)).unwrap();

        store.fail_saves.set(true);
        let result = engine.execute(Command::Deposit {
            credentials: creds("A1", "pw1"),
            amount: Decimal::new(50, 0),
        });
        assert!(matches!(result.unwrap_err(), BankError::IoError { .. }));
        assert_eq!(engine.accounts()[0].balance, Decimal::new(100, 0));

        store.fail_saves.set(false);
        let outcome = engine.execute(Command::Show(creds("A1", "pw1"))).unwrap();
        assert_eq!(outcome.account.balance, Decimal::new(100, 0));
    }

    #[test]
    fn test_failed_save_rolls_back_accrual() {
        let store = MemoryStore::default();
        let clock = ManualClock::new(t0());
        let mut engine = open(&store, &clock);
        engine.execute(registration(AccountKind::Hybrid, 100)).unwrap();
        let before = engine.accounts()[0].clone();

        clock.advance(Duration::days(60));
        store.fail_saves.set(true);
        let result = engine.execute(Command::Show(creds("A1", "pw1")));

        assert!(matches!(result.unwrap_err(), BankError::IoError { .. }));
        assert_eq!(engine.accounts()[0], before);
    }

    #[test]
    fn test_failed_save_drops_registration() {
        let store = MemoryStore::default();
        store.fail_saves.set(true);
        let clock = ManualClock::new(t0());
        let mut engine = open(&store, &clock);

        let result = engine.execute(registration(AccountKind::Hybrid, 10));

        assert!(matches!(result.unwrap_err(), BankError::IoError { .. }));
        assert!(engine.accounts().is_empty());
        assert!(engine.authenticate(&creds("A1", "pw1")).is_err());
    }

    #[test]
    fn test_interest_overflow_is_reported_without_saving() {
        let mut account = Account::new(AccountKind::Hybrid, "A1", "Alice", "pw1", t0());
        account.saving_balance = Decimal::MAX;
        account.saved_days = 10;
        let store = MemoryStore {
            initial: vec![account.clone()],
            ..Default::default()
        };
        let clock = ManualClock::new(t0() + Duration::days(10));
        let mut engine = open(&store, &clock);

        let result = engine.execute(Command::Show(creds("A1", "pw1")));

        assert!(matches!(
            result.unwrap_err(),
            BankError::ArithmeticOverflow { .. }
        ));
        assert_eq!(engine.accounts()[0], account);
        assert_eq!(store.saves.get(), 0);
    }
}
