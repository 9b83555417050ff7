//! # Utility Functions and Helpers
//!
//! - [`logging`]: tracing subscriber and color control from global flags
//! - [`formatting`]: category colors and summary text
//! - [`settings`]: resolving the effective [`radiocat_core::Config`] for a run

pub mod formatting;
pub mod logging;
pub mod settings;

pub use logging::initialize_logging;
