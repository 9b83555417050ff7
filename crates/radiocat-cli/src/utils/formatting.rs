//! Formatting utilities

use colored::Colorize;
use radiocat_core::RunReport;

/// ANSI-only color cycling functions for categories (exclude red)
/// Order: blue → cyan → green → yellow → magenta
pub const CATEGORY_COLORS: &[fn(&str) -> colored::ColoredString] = &[
    |s| s.blue(),
    |s| s.cyan(),
    |s| s.green(),
    |s| s.yellow(),
    |s| s.magenta(),
];

/// Get a color for a category based on its index
pub fn category_color(category: &str, index: usize) -> colored::ColoredString {
    let color_fn = CATEGORY_COLORS[index % CATEGORY_COLORS.len()];
    color_fn(category)
}

/// One-line summary of a finished category run (without colors).
pub fn summarize(report: &RunReport) -> String {
    let mut parts = vec![format!("{} active", report.saved)];
    if report.carried + report.reused > 0 {
        parts.push(format!("{} cached", report.carried + report.reused));
    }
    parts.push(format!(
        "{}/{} probes passed",
        report.probes_passed, report.probes_attempted
    ));
    if report.duplicates > 0 {
        parts.push(format!("{} duplicates", report.duplicates));
    }
    parts.push(format!(
        "{}/{} sources ok",
        report.sources_succeeded(),
        report.sources_attempted
    ));
    parts.join(", ")
}
