// CLI module
// Command-line arguments and the interactive menu

mod args;
mod menu;

pub use args::{CliArgs, CliCommand};
pub use menu::{parse_amount, run_menu};

use clap::Parser;

/// Parse command-line arguments using clap
///
/// If parsing fails (invalid arguments or --help), clap displays an error
/// message or help text and exits the process.
pub fn parse_args() -> CliArgs {
    CliArgs::parse()
}
