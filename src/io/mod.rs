//! I/O module
//!
//! Handles account persistence and export.
//!
//! # Components
//!
//! - `json_store` - JSON file storage for the account collection
//! - `csv_format` - CSV export of account balances

pub mod csv_format;
pub mod json_store;

pub use csv_format::write_accounts_csv;
pub use json_store::{JsonFileStore, DEFAULT_DATA_FILE};
