//! Progress display for probe fan-out

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use is_terminal::IsTerminal;

/// Progress bar over the probes of one category run.
///
/// Hidden when quiet or when stderr is not a terminal.
#[derive(Clone)]
pub struct ProbeProgress {
    bar: ProgressBar,
}

impl ProbeProgress {
    /// Bar labelled with `category`.
    pub fn new(category: &str, quiet: bool) -> Self {
        let bar = ProgressBar::new(0);
        if quiet || !std::io::stderr().is_terminal() {
            bar.set_draw_target(ProgressDrawTarget::hidden());
        }
        bar.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} {prefix:.bold} [{bar:40.cyan/blue}] {pos}/{len} probes ({eta})")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-"),
        );
        bar.set_prefix(category.to_string());
        Self { bar }
    }

    /// Record `(completed, total)` reported by the pipeline.
    pub fn update(&self, completed: usize, total: usize) {
        self.bar.set_length(total as u64);
        self.bar.set_position(completed as u64);
    }

    /// Remove the bar from the terminal.
    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}
