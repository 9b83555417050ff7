//! # Output Formatting
//!
//! Commands that report data accept `--format`:
//!
//! - **text**: human-readable output with colors (default)
//! - **json**: a single pretty-printed JSON array for scripts
//!
//! ```bash
//! radiocat list --format json | jq '.[] | .category'
//! ```
//!
//! Progress indicators live in [`progress`] and always draw to stderr so
//! stdout stays clean for piping.

mod progress;

pub use progress::ProbeProgress;

/// Output format for reporting commands
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Pretty text output (default)
    Text,
    /// Single JSON array
    Json,
}
