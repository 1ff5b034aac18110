//! Interactive numbered menu
//!
//! Reads choices and answers line by line, turns them into [`Command`]s and
//! prints the outcome. Every failure is reported and the loop carries on
//! with the next prompt. End of input behaves like choosing Exit.

use crate::core::accrual;
use crate::core::traits::{AccountStore, Clock};
use crate::core::BankEngine;
use crate::types::{
    AccountKind, AccrualReport, BankError, Command, Credentials, Outcome, Registration,
};
use rust_decimal::Decimal;
use std::io::{self, BufRead, Write};
use std::str::FromStr;

const MENU: &str = "1. Register | 2. Show | 3. Deposit | 4. Withdraw | 5. Savings | 6. Exit";

/// Parse an amount as typed by the operator
///
/// # Errors
///
/// Returns `InvalidAmount` for anything that is not a decimal number.
pub fn parse_amount(text: &str) -> Result<Decimal, BankError> {
    let trimmed = text.trim();
    Decimal::from_str(trimmed).map_err(|_| BankError::invalid_amount(trimmed))
}

/// Run the menu until Exit or end of input
pub fn run_menu<S, C, R, W>(
    engine: &mut BankEngine<S, C>,
    input: R,
    output: &mut W,
) -> io::Result<()>
where
    S: AccountStore,
    C: Clock,
    R: BufRead,
    W: Write,
{
    Menu {
        engine,
        input,
        output,
    }
    .run()
}

struct Menu<'a, S, C, R, W> {
    engine: &'a mut BankEngine<S, C>,
    input: R,
    output: &'a mut W,
}

impl<S, C, R, W> Menu<'_, S, C, R, W>
where
    S: AccountStore,
    C: Clock,
    R: BufRead,
    W: Write,
{
    fn run(&mut self) -> io::Result<()> {
        if let Some(error) = self.engine.recovered_from() {
            writeln!(
                self.output,
                "Warning: {}. Starting with no accounts; the data file will be overwritten on the next save.",
                error
            )?;
        }

        loop {
            writeln!(self.output, "\n{}", MENU)?;
            let Some(choice) = self.prompt("Choose: ")? else {
                break;
            };

            let keep_going = match choice.as_str() {
                "1" => self.register()?,
                "2" => self.show()?,
                "3" | "4" => self.transfer(&choice)?,
                "5" => self.savings()?,
                "6" => false,
                other => {
                    writeln!(self.output, "Invalid choice '{}'", other)?;
                    true
                }
            };
            if !keep_going {
                break;
            }
        }

        writeln!(self.output, "Goodbye.")?;
        Ok(())
    }

    /// Print `label` and read one trimmed line; `None` at end of input
    fn prompt(&mut self, label: &str) -> io::Result<Option<String>> {
        write!(self.output, "{}", label)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    fn report_error(&mut self, error: &BankError) -> io::Result<bool> {
        writeln!(self.output, "Error: {}", error)?;
        Ok(true)
    }

    /// Ask for account number and password, then check them right away
    fn login(&mut self) -> io::Result<Option<Result<(Credentials, AccountKind), BankError>>> {
        let Some(account_number) = self.prompt("Acc #: ")? else {
            return Ok(None);
        };
        let Some(password) = self.prompt("PW: ")? else {
            return Ok(None);
        };
        let credentials = Credentials::new(account_number, password);
        Ok(Some(
            self.engine
                .authenticate(&credentials)
                .map(|kind| (credentials, kind)),
        ))
    }

    fn register(&mut self) -> io::Result<bool> {
        let Some(account_number) = self.prompt("Account number: ")? else {
            return Ok(false);
        };
        let Some(owner) = self.prompt("Owner: ")? else {
            return Ok(false);
        };
        let Some(password) = self.prompt("Password: ")? else {
            return Ok(false);
        };
        let Some(kind) = self.prompt("Type (checking/savings/hybrid) [hybrid]: ")? else {
            return Ok(false);
        };
        let Some(initial) = self.prompt("Initial deposit: ")? else {
            return Ok(false);
        };

        let kind = match kind.parse::<AccountKind>() {
            Ok(kind) => kind,
            Err(message) => {
                writeln!(self.output, "Error: {}", message)?;
                return Ok(true);
            }
        };
        let initial_deposit = if initial.is_empty() {
            Decimal::ZERO
        } else {
            match parse_amount(&initial) {
                Ok(amount) => amount,
                Err(error) => return self.report_error(&error),
            }
        };

        let command = Command::Register(Registration {
            kind,
            account_number,
            owner,
            password,
            initial_deposit,
        });
        match self.engine.execute(command) {
            Ok(outcome) => {
                writeln!(
                    self.output,
                    "Registered {} account {} for {}. Balance: ${:.2}",
                    outcome.account.kind,
                    outcome.account.account_number,
                    outcome.account.owner,
                    outcome.account.balance
                )?;
                Ok(true)
            }
            Err(error) => self.report_error(&error),
        }
    }

    fn show(&mut self) -> io::Result<bool> {
        let credentials = match self.login()? {
            None => return Ok(false),
            Some(Err(error)) => return self.report_error(&error),
            Some(Ok((credentials, _))) => credentials,
        };

        match self.engine.execute(Command::Show(credentials)) {
            Ok(outcome) => {
                self.print_accrual(&outcome.accrual)?;
                self.print_summary(&outcome)?;
                Ok(true)
            }
            Err(error) => self.report_error(&error),
        }
    }

    fn transfer(&mut self, choice: &str) -> io::Result<bool> {
        let credentials = match self.login()? {
            None => return Ok(false),
            Some(Err(error)) => return self.report_error(&error),
            Some(Ok((credentials, _))) => credentials,
        };
        let Some(amount) = self.prompt("Amount: ")? else {
            return Ok(false);
        };
        let amount = match parse_amount(&amount) {
            Ok(amount) => amount,
            Err(error) => return self.report_error(&error),
        };

        let (command, verb) = if choice == "3" {
            (Command::Deposit { credentials, amount }, "Deposited")
        } else {
            (Command::Withdraw { credentials, amount }, "Withdrew")
        };

        match self.engine.execute(command) {
            Ok(outcome) => {
                self.print_accrual(&outcome.accrual)?;
                writeln!(
                    self.output,
                    "{} ${:.2}. New balance: ${:.2}",
                    verb, amount, outcome.account.balance
                )?;
                Ok(true)
            }
            Err(error) => self.report_error(&error),
        }
    }

    fn savings(&mut self) -> io::Result<bool> {
        let (credentials, kind) = match self.login()? {
            None => return Ok(false),
            Some(Err(error)) => return self.report_error(&error),
            Some(Ok(found)) => found,
        };
        if !kind.has_savings() {
            let error = BankError::unsupported_operation(
                &credentials.account_number,
                kind.as_str(),
                "savings",
            );
            return self.report_error(&error);
        }

        let Some(action) = self.prompt("Deposit/Withdraw (d/w): ")? else {
            return Ok(false);
        };
        let Some(amount) = self.prompt("Amount: ")? else {
            return Ok(false);
        };
        let amount = match parse_amount(&amount) {
            Ok(amount) => amount,
            Err(error) => return self.report_error(&error),
        };

        let command = match action.to_lowercase().as_str() {
            "d" => {
                let cycle_days = if kind == AccountKind::Hybrid {
                    let Some(days) = self.prompt("Lock for how many days: ")? else {
                        return Ok(false);
                    };
                    match days.parse::<u32>() {
                        Ok(days) => Some(days),
                        Err(_) => {
                            writeln!(self.output, "Error: invalid number of days '{}'", days)?;
                            return Ok(true);
                        }
                    }
                } else {
                    None
                };
                Command::SavingsDeposit {
                    credentials,
                    amount,
                    cycle_days,
                }
            }
            "w" => Command::SavingsWithdraw {
                credentials,
                amount,
            },
            other => {
                writeln!(self.output, "Invalid action '{}'", other)?;
                return Ok(true);
            }
        };

        match self.engine.execute(command) {
            Ok(outcome) => {
                self.print_accrual(&outcome.accrual)?;
                self.print_summary(&outcome)?;
                Ok(true)
            }
            Err(error) => self.report_error(&error),
        }
    }

    fn print_accrual(&mut self, report: &AccrualReport) -> io::Result<()> {
        if report.fee_cycles > 0 {
            write!(
                self.output,
                "Charged {} monthly fee(s): ${:.2}",
                report.fee_cycles, report.fees_charged
            )?;
            if !report.fees_waived.is_zero() {
                write!(self.output, " (${:.2} waived)", report.fees_waived)?;
            }
            writeln!(self.output)?;
        }
        if report.interest_cycles > 0 {
            writeln!(
                self.output,
                "Credited {} interest cycle(s): ${:.2}",
                report.interest_cycles, report.interest_credited
            )?;
        }
        Ok(())
    }

    fn print_summary(&mut self, outcome: &Outcome) -> io::Result<()> {
        let account = &outcome.account;
        write!(
            self.output,
            "{} | {} | Bal: ${:.2}",
            account.account_number, account.owner, account.balance
        )?;

        if account.kind.has_savings() {
            write!(self.output, " | Savings: ${:.2}", account.saving_balance)?;
        }
        if account.kind == AccountKind::Hybrid && account.saved_days > 0 {
            let remaining = accrual::remaining_days(outcome.as_of, account.unlock_date);
            if remaining > 0 {
                write!(
                    self.output,
                    " | Locked until {} ({} day(s) left, {}-day cycle)",
                    account.unlock_date.format("%Y-%m-%d"),
                    remaining,
                    account.saved_days
                )?;
            } else {
                write!(self.output, " | Unlocked")?;
            }
        }
        writeln!(self.output)
    }
}
