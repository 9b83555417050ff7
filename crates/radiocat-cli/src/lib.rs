//! radiocat CLI - daily liveness-checked internet radio catalogs
//!
//! Parses arguments, sets up logging, resolves configuration and dispatches
//! to the command modules.
use anyhow::Result;
use clap::{CommandFactory, Parser};

mod cli;
mod commands;
mod output;
mod utils;

use crate::commands::UpdateRequest;
use crate::utils::initialize_logging;
use crate::utils::settings::load_config;
use cli::{Cli, Commands};

/// Execute the radiocat CLI with the currently configured environment.
///
/// # Errors
///
/// Returns an error if configuration is invalid or a catalog cannot be saved.
pub async fn run() -> Result<()> {
    // Convert Broken pipe panics into a clean exit
    std::panic::set_hook(Box::new(|info| {
        let msg = info.to_string();
        if msg.contains("Broken pipe") || msg.contains("broken pipe") {
            // Exit silently for pipeline truncation
            std::process::exit(0);
        }
        eprintln!("{msg}");
    }));

    let cli = Cli::parse();
    initialize_logging(&cli)?;
    execute_command(&cli).await
}

async fn execute_command(cli: &Cli) -> Result<()> {
    let quiet = cli.quiet;
    match &cli.command {
        Some(Commands::Update {
            categories,
            all,
            concurrency,
            stale_after_hours,
        }) => {
            let request = UpdateRequest {
                categories: if *all { Vec::new() } else { categories.clone() },
                concurrency: *concurrency,
                stale_after_hours: *stale_after_hours,
            };
            commands::update_categories(load_config(cli)?, &request, quiet).await?;
        },
        Some(Commands::List { format }) => {
            commands::list_catalogs(&load_config(cli)?, *format)?;
        },
        Some(Commands::Categories { format }) => {
            commands::show_categories(&load_config(cli)?, *format)?;
        },
        None => {
            // No subcommand provided - show help
            Cli::command().print_help()?;
        },
    }
    Ok(())
}
