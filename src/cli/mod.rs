//! Command-line entry point
//!
//! The default run prints the greeting. `--check-config` loads the settings
//! and reports every invalid field at once.

pub mod types;

use anyhow::{Context, Result};
use tracing::info;

use crate::domain::models::Settings;

pub use types::Cli;

/// Text printed by a default run
pub const GREETING: &str = "Hello, World!";

/// Run the command described by `cli`
pub fn execute(cli: &Cli) -> Result<()> {
    if cli.check_config {
        return check_config();
    }

    println!("{GREETING}");
    Ok(())
}

fn check_config() -> Result<()> {
    let settings = Settings::load().context("Failed to load settings")?;
    info!(
        some_example_var = settings.some_example_var(),
        "Settings are valid"
    );

    let rendered =
        serde_json::to_string_pretty(&settings).context("Failed to render settings")?;
    println!("{rendered}");
    Ok(())
}

/// Print `err` with its cause chain to stderr and exit with status 1
pub fn handle_error(err: &anyhow::Error) -> ! {
    eprintln!("Error: {err:#}");
    std::process::exit(1)
}
