//! Bank Ledger CLI
//!
//! Interactive bookkeeping over a JSON data file.
//!
//! # Usage
//!
//! ```bash
//! cargo run
//! cargo run -- --data-file ~/ledger.json
//! cargo run -- --monthly-fee 5 --daily-interest-rate 0.0005
//! cargo run -- export > accounts.csv
//! RUST_LOG=debug cargo run
//! ```
//!
//! # Exit Codes
//!
//! - 0: Success
//! - 1: Error (data file unreadable, export failed, etc.)

use rust_bank_ledger::cli::{self, CliArgs, CliCommand};
use rust_bank_ledger::core::traits::AccountStore;
use rust_bank_ledger::core::{BankEngine, SystemClock};
use rust_bank_ledger::io::{write_accounts_csv, JsonFileStore};
use rust_bank_ledger::BankError;
use std::io;
use std::process;
use tracing_subscriber::EnvFilter;

fn main() {
    let args = cli::parse_args();
    init_logging(&args.log_level);

    if let Err(e) = run(args) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run(args: CliArgs) -> Result<(), BankError> {
    let store = JsonFileStore::new(&args.data_file);

    match args.command() {
        CliCommand::Export => {
            let accounts = store.load()?;
            let mut output = io::stdout();
            write_accounts_csv(&accounts, &mut output)
                .map_err(|message| BankError::IoError { message })?;
        }
        CliCommand::Menu => {
            let mut engine = BankEngine::open(store, args.to_accrual_policy(), SystemClock)?;
            let stdin = io::stdin();
            cli::run_menu(&mut engine, stdin.lock(), &mut io::stdout())?;
        }
    }

    Ok(())
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .compact()
        .init();
}
