//! # CLI Structure and Argument Parsing
//!
//! `radiocat` follows a standard command-subcommand pattern built on `clap`
//! derive macros:
//!
//! - **Global options**: apply to all commands (`--config`, `--output`,
//!   `--verbose`, `--quiet`, `--no-color`)
//! - **Subcommands**: `update`, `list`, `categories`
//!
//! ## Usage Patterns
//!
//! ```bash
//! # Refresh every configured category
//! radiocat update
//!
//! # Refresh two categories with a smaller probe pool
//! radiocat update jazz_blues classical --concurrency 20
//!
//! # Inspect what is on disk
//! radiocat list --format json
//! ```

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::output::OutputFormat;

/// Main CLI structure for the `radiocat` command
#[derive(Parser, Clone, Debug)]
#[command(name = "radiocat")]
#[command(version)]
#[command(about = "radiocat - build liveness-checked internet radio catalogs", long_about = None)]
#[allow(clippy::struct_excessive_bools)]
pub struct Cli {
    /// Command to run; prints help when omitted
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Path to a config file (defaults to the platform config directory)
    #[arg(long, global = true, env = "RADIOCAT_CONFIG", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Directory for category catalogs (overrides config and `RADIOCAT_OUTPUT_DIR`)
    #[arg(long, global = true, value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Show debug-level progress for each source and probe
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    /// Suppress informational messages (only show errors)
    #[arg(short = 'q', long, global = true)]
    pub quiet: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Disable all ANSI colors in output (also respects `NO_COLOR` env)
    #[arg(long = "no-color", global = true)]
    pub no_color: bool,
}

/// Available subcommands
#[derive(Subcommand, Clone, Debug)]
pub enum Commands {
    /// Fetch, probe and rewrite category catalogs
    Update {
        /// Categories to refresh (default: all configured categories)
        #[arg(value_name = "CATEGORY")]
        categories: Vec<String>,

        /// Refresh every configured category
        #[arg(long, conflicts_with = "categories")]
        all: bool,

        /// Maximum probes in flight (overrides config)
        #[arg(long, value_name = "N", value_parser = clap::value_parser!(u16).range(1..))]
        concurrency: Option<u16>,

        /// Re-probe cached entries older than this many hours (overrides config)
        #[arg(long = "stale-after-hours", value_name = "HOURS")]
        stale_after_hours: Option<u32>,
    },

    /// Show catalogs written to the output directory
    List {
        /// Output format
        #[arg(short = 'f', long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Show configured categories and their source playlists
    Categories {
        /// Output format
        #[arg(short = 'f', long, value_enum, default_value = "text")]
        format: OutputFormat,
    },
}
