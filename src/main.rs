//! Project CLI entry point.

use clap::Parser;

use project::cli::{self, Cli};
use project::infrastructure::logging::LoggerImpl;

fn main() {
    let cli = Cli::parse();

    let result = LoggerImpl::init(&cli.log_config()).and_then(|_logger| cli::execute(&cli));

    if let Err(err) = result {
        cli::handle_error(&err);
    }
}
