//! CSV export of account balances
//!
//! Writes one row per account with columns:
//! `account_number, owner, type, balance, saving_balance, saved_days, unlock_date`.
//! Passwords are never exported. Rows keep the stored order.

use crate::types::{timestamp, Account};
use std::io::Write;

/// Write account balances to CSV format
///
/// # Arguments
///
/// * `accounts` - Slice of accounts to write
/// * `output` - Mutable reference to a writer for outputting CSV
///
/// # Returns
///
/// * `Ok(())` if writing succeeded
/// * `Err(String)` if a write error occurred
pub fn write_accounts_csv(accounts: &[Account], output: &mut dyn Write) -> Result<(), String> {
    use csv::Writer;

    let mut writer = Writer::from_writer(output);

    writer
        .write_record([
            "account_number",
            "owner",
            "type",
            "balance",
            "saving_balance",
            "saved_days",
            "unlock_date",
        ])
        .map_err(|e| format!("Failed to write CSV header: {}", e))?;

    for account in accounts {
        writer
            .write_record(&[
                account.account_number.clone(),
                account.owner.clone(),
                account.kind.to_string(),
                format!("{:.2}", account.balance),
                format!("{:.2}", account.saving_balance),
                account.saved_days.to_string(),
                timestamp::format(&account.unlock_date),
            ])
            .map_err(|e| format!("Failed to write account record: {}", e))?;
    }

    writer
        .flush()
        .map_err(|e| format!("Failed to flush output: {}", e))?;

    Ok(())
}
