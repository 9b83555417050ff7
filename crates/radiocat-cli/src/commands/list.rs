//! List command implementation

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use colored::Colorize;
use radiocat_core::{CatalogStore, Config, Entry, Storage};
use serde::Serialize;

use crate::output::OutputFormat;
use crate::utils::formatting::category_color;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CatalogInfo {
    category: String,
    entries: usize,
    last_checked: Option<DateTime<Utc>>,
    path: String,
}

/// Execute the list command
pub fn execute(config: &Config, format: OutputFormat) -> Result<()> {
    let storage = Storage::with_root(config.output_dir())?;
    let catalogs = collect(&storage)?;

    match format {
        OutputFormat::Text => print_text_format(&catalogs, &storage),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&catalogs)?),
    }
    Ok(())
}

fn collect(storage: &Storage) -> Result<Vec<CatalogInfo>> {
    storage
        .list_categories()
        .into_iter()
        .map(|category| {
            let entries = storage
                .load(&category)
                .with_context(|| format!("Failed to load catalog for '{category}'"))?;
            let path = storage.catalog_path(&category)?;
            Ok(CatalogInfo {
                entries: entries.len(),
                last_checked: newest_check(&entries),
                path: path.display().to_string(),
                category,
            })
        })
        .collect()
}

fn newest_check(entries: &[Entry]) -> Option<DateTime<Utc>> {
    entries.iter().filter_map(|e| e.last_checked).max()
}

fn print_text_format(catalogs: &[CatalogInfo], storage: &Storage) {
    if catalogs.is_empty() {
        println!(
            "No catalogs in {}. Run 'radiocat update' to build them.",
            storage.root_dir().display()
        );
        return;
    }
    for (idx, catalog) in catalogs.iter().enumerate() {
        let checked = catalog.last_checked.map_or_else(
            || "never".to_string(),
            |at| at.format("%Y-%m-%d %H:%M UTC").to_string(),
        );
        println!(
            "{} - {} stations, checked {}",
            category_color(&catalog.category, idx),
            catalog.entries,
            checked
        );
        println!("  {}", catalog.path.bright_black());
    }
}
