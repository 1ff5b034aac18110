use crate::core::AccrualPolicy;
use crate::io::DEFAULT_DATA_FILE;
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use std::path::PathBuf;

/// Personal bookkeeping with locked, interest-bearing savings
#[derive(Parser, Debug)]
#[command(name = "bank-ledger")]
#[command(about = "Personal bookkeeping with locked, interest-bearing savings", long_about = None)]
pub struct CliArgs {
    /// JSON file holding all accounts
    #[arg(
        long = "data-file",
        value_name = "PATH",
        default_value = DEFAULT_DATA_FILE,
        help = "Path to the JSON data file (created on first save)"
    )]
    pub data_file: PathBuf,

    /// Maintenance fee charged every 30 days on hybrid accounts
    #[arg(
        long = "monthly-fee",
        value_name = "AMOUNT",
        help = "Fee deducted per 30-day cycle (default: 10.00)"
    )]
    pub monthly_fee: Option<Decimal>,

    /// Simple daily interest rate on locked savings
    #[arg(
        long = "daily-interest-rate",
        value_name = "RATE",
        help = "Daily interest as a fraction, e.g. 0.001 for 0.1% (default: 0.001)"
    )]
    pub daily_interest_rate: Option<Decimal>,

    /// Log filter used when RUST_LOG is not set
    #[arg(
        long = "log-level",
        value_name = "LEVEL",
        default_value = "warn",
        help = "Log level written to stderr: error, warn, info, debug or trace"
    )]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Option<CliCommand>,
}

/// What to do once the data file is located
#[derive(Subcommand, Clone, Debug, PartialEq, Eq)]
pub enum CliCommand {
    /// Run the interactive menu (default)
    Menu,
    /// Write every account as CSV to stdout and exit
    Export,
}

impl CliArgs {
    /// Create an AccrualPolicy from CLI arguments
    ///
    /// Values not given on the command line fall back to the defaults.
    /// Invalid values are replaced by defaults with a warning.
    pub fn to_accrual_policy(&self) -> AccrualPolicy {
        if self.monthly_fee.is_some() || self.daily_interest_rate.is_some() {
            let AccrualPolicy {
                monthly_fee,
                daily_interest_rate,
                ..
            } = AccrualPolicy::default();
            AccrualPolicy::new(
                self.monthly_fee.unwrap_or(monthly_fee),
                self.daily_interest_rate.unwrap_or(daily_interest_rate),
            )
        } else {
            AccrualPolicy::default()
        }
    }

    /// The selected subcommand, defaulting to the menu
    pub fn command(&self) -> CliCommand {
        self.command.clone().unwrap_or(CliCommand::Menu)
    }
}
