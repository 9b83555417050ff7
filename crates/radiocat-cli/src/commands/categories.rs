//! Categories command implementation

use anyhow::Result;
use colored::Colorize;
use radiocat_core::{Config, Registry};
use serde::Serialize;

use crate::output::OutputFormat;
use crate::utils::formatting::category_color;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CategoryInfo {
    category: String,
    description: Option<String>,
    builtin: bool,
    overridden: bool,
    sources: Vec<String>,
}

/// Execute the categories command
pub fn execute(config: &Config, format: OutputFormat) -> Result<()> {
    let categories = describe(config);
    match format {
        OutputFormat::Text => print_text_format(&categories),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&categories)?),
    }
    Ok(())
}

fn describe(config: &Config) -> Vec<CategoryInfo> {
    let registry = Registry::new();
    config
        .category_sources()
        .into_iter()
        .map(|(category, sources)| {
            let builtin = registry.get(&category);
            CategoryInfo {
                description: builtin.map(|entry| entry.description.clone()),
                builtin: builtin.is_some(),
                overridden: config.categories.contains_key(&category),
                category,
                sources,
            }
        })
        .collect()
}

fn print_text_format(categories: &[CategoryInfo]) {
    for (idx, info) in categories.iter().enumerate() {
        let origin = match (info.builtin, info.overridden) {
            (true, false) => "built-in",
            (true, true) => "built-in, overridden",
            (false, _) => "config",
        };
        println!(
            "{} ({} sources, {})",
            category_color(&info.category, idx),
            info.sources.len(),
            origin
        );
        if let Some(description) = &info.description {
            println!("  {description}");
        }
        for url in &info.sources {
            println!("    {}", url.bright_black());
        }
    }
}
