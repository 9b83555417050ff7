//! Update command implementation

use anyhow::{Context, Result, bail};
use colored::Colorize;
use radiocat_core::{CategoryPipeline, Config, Fetcher, HttpProbe, RunReport, Storage};
use tracing::debug;

use crate::output::ProbeProgress;
use crate::utils::formatting::{category_color, summarize};

/// Arguments of `radiocat update` after flag resolution
#[derive(Debug, Clone, Default)]
pub struct UpdateRequest {
    /// Empty means every configured category
    pub categories: Vec<String>,
    /// `--concurrency` override
    pub concurrency: Option<u16>,
    /// `--stale-after-hours` override
    pub stale_after_hours: Option<u32>,
}

/// Execute the update command
pub async fn execute(mut config: Config, request: &UpdateRequest, quiet: bool) -> Result<()> {
    if let Some(concurrency) = request.concurrency {
        config.defaults.probe_concurrency = usize::from(concurrency);
    }
    if let Some(hours) = request.stale_after_hours {
        config.defaults.stale_after_hours = hours;
    }
    config.validate()?;

    let selected = select_categories(&config, &request.categories)?;
    let storage = Storage::with_root(config.output_dir())
        .with_context(|| format!("Cannot use output directory {}", config.output_dir().display()))?;
    let fetcher = Fetcher::with_timeout(config.fetch_timeout())?;
    let probe = HttpProbe::with_timeout(config.probe_timeout())?;

    let mut failed = Vec::new();
    for (index, (category, urls)) in selected.iter().enumerate() {
        let progress = ProbeProgress::new(category, quiet);
        let sink = progress.clone();
        let pipeline = CategoryPipeline::new(&fetcher, &probe, &storage, config.pipeline_options())
            .with_progress(move |done, total| sink.update(done, total));

        let result = pipeline.run(category, urls).await;
        progress.finish();

        match result {
            Ok(report) => {
                if !quiet {
                    print_report(&report, &storage, index);
                }
            },
            Err(e) => {
                eprintln!(
                    "{} {}: {}",
                    "✗".red(),
                    category_color(category, index),
                    e
                );
                failed.push(category.clone());
            },
        }
    }

    if !failed.is_empty() {
        bail!(
            "{} of {} categories could not be saved: {}",
            failed.len(),
            selected.len(),
            failed.join(", ")
        );
    }
    Ok(())
}

/// Resolve requested names against the configured categories, keeping
/// configuration order when no names are given.
pub fn select_categories(
    config: &Config,
    requested: &[String],
) -> Result<Vec<(String, Vec<String>)>> {
    let configured = config.category_sources();
    if requested.is_empty() {
        return Ok(configured);
    }

    let mut selected: Vec<(String, Vec<String>)> = Vec::with_capacity(requested.len());
    for name in requested {
        let Some(found) = configured.iter().find(|(category, _)| category == name) else {
            let known: Vec<&str> = configured.iter().map(|(c, _)| c.as_str()).collect();
            bail!(
                "Unknown category '{name}'. Known categories: {}",
                known.join(", ")
            );
        };
        if selected.iter().any(|(category, _)| category == name) {
            debug!("Ignoring repeated category {}", name);
            continue;
        }
        selected.push(found.clone());
    }
    Ok(selected)
}

fn print_report(report: &RunReport, storage: &Storage, index: usize) {
    let path = storage
        .catalog_path(&report.category)
        .map(|p| p.display().to_string())
        .unwrap_or_default();
    println!(
        "{} {}: {} {}",
        "✓".green(),
        category_color(&report.category, index),
        summarize(report),
        format!("→ {path}").bright_black()
    );
    if let Some(reason) = &report.prior_error {
        println!("  {} previous catalog ignored ({})", "!".yellow(), reason.bright_black());
    }
    for failure in &report.sources_failed {
        println!("  {} {} ({})", "!".yellow(), failure.url, failure.error.bright_black());
    }
}
