//! Logging initialization and configuration.
//!
//! Sets up the tracing subscriber and color control based on CLI flags and
//! environment variables.

use anyhow::Result;
use colored::control as color_control;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use crate::cli::{Cli, Commands};
use crate::output::OutputFormat;

/// Log level implied by the global flags.
///
/// Machine-readable output keeps stderr quiet unless verbosity was requested.
pub fn level_for(cli: &Cli) -> Level {
    if cli.verbose || cli.debug {
        return Level::DEBUG;
    }
    if cli.quiet || wants_machine_output(cli) {
        return Level::ERROR;
    }
    Level::INFO
}

fn wants_machine_output(cli: &Cli) -> bool {
    matches!(
        &cli.command,
        Some(
            Commands::List {
                format: OutputFormat::Json
            } | Commands::Categories {
                format: OutputFormat::Json
            }
        )
    )
}

/// Initialize the logging subsystem based on CLI flags.
///
/// # Errors
///
/// Returns an error if the global tracing subscriber cannot be set.
pub fn initialize_logging(cli: &Cli) -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level_for(cli))
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    // Color control: disable when requested, NO_COLOR is set, or when emitting machine output
    let env_no_color = std::env::var_os("NO_COLOR").is_some();
    if cli.no_color || env_no_color || wants_machine_output(cli) {
        color_control::set_override(false);
    }
    Ok(())
}
