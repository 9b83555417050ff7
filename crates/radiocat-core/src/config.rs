//! Configuration management for radiocat.
//!
//! Configuration is stored in TOML format. Every field has a default, so an
//! empty or missing file yields a working setup that processes the built-in
//! [`Registry`] categories.
//!
//! ## Lookup Order
//!
//! 1. An explicit path (`--config` on the command line, or `RADIOCAT_CONFIG`)
//! 2. The platform config directory (`radiocat/config.toml`)
//! 3. Built-in defaults when neither exists
//!
//! `RADIOCAT_OUTPUT_DIR` overrides `[paths] output` after the file is read.
//!
//! ## Example Configuration File
//!
//! ```toml
//! [defaults]
//! stale_after_hours = 24
//! probe_concurrency = 100
//! fetch_timeout_secs = 20
//! probe_timeout_secs = 15
//! default_name = "Unknown"
//! default_description = "Radio Station"
//! default_thumb = "https://tonetune.netlify.app/assets/tonetune.png"
//! audio_hints = ["mp3", "aac", "ogg", "opus", "flac", "m4a", "wav", "wma", "mpeg"]
//!
//! [paths]
//! output = "dailyupdated"
//!
//! [categories]
//! jazz_blues = ["https://example.org/jazz.m3u"]
//! ```
//!
//! ## Examples
//!
//! ```rust
//! use radiocat_core::Config;
//!
//! let config = Config::from_toml_str("[defaults]\nprobe_concurrency = 8\n")?;
//! assert_eq!(config.defaults.probe_concurrency, 8);
//! assert_eq!(config.defaults.stale_after_hours, 24);
//! # Ok::<(), radiocat_core::Error>(())
//! ```

use crate::parser::{DEFAULT_AUDIO_HINTS, DEFAULT_DESCRIPTION, DEFAULT_NAME, DEFAULT_THUMB};
use crate::{Error, ParserOptions, PipelineOptions, Registry, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "RADIOCAT_CONFIG";
/// Environment variable overriding the output directory.
pub const OUTPUT_DIR_ENV: &str = "RADIOCAT_OUTPUT_DIR";
/// Default output directory, relative to the working directory.
pub const DEFAULT_OUTPUT_DIR: &str = "dailyupdated";

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Pipeline and parser defaults
    pub defaults: DefaultsConfig,
    /// File system paths
    pub paths: PathsConfig,
    /// Category name to ordered source URLs.
    ///
    /// A name that exists in the registry replaces its URL list; any other
    /// name adds a category.
    pub categories: BTreeMap<String, Vec<String>>,
}

/// Default settings for every category run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DefaultsConfig {
    /// Cached verdicts younger than this are reused without probing.
    pub stale_after_hours: u32,
    /// Maximum probes in flight at once.
    pub probe_concurrency: usize,
    /// Timeout for each playlist download.
    pub fetch_timeout_secs: u64,
    /// Timeout for each probe request (HEAD and fallback GET separately).
    pub probe_timeout_secs: u64,
    /// Name for playlist entries without a title.
    pub default_name: String,
    /// Description for entries without `group-title`.
    pub default_description: String,
    /// Artwork for entries without `tvg-logo`.
    pub default_thumb: String,
    /// Substrings marking an endpoint as an audio stream.
    pub audio_hints: Vec<String>,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            stale_after_hours: 24,
            probe_concurrency: 100,
            fetch_timeout_secs: 20,
            probe_timeout_secs: 15,
            default_name: DEFAULT_NAME.to_string(),
            default_description: DEFAULT_DESCRIPTION.to_string(),
            default_thumb: DEFAULT_THUMB.to_string(),
            audio_hints: DEFAULT_AUDIO_HINTS
                .iter()
                .map(|s| (*s).to_string())
                .collect(),
        }
    }
}

/// File system paths configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Directory holding one `<category>.json` catalog per category.
    pub output: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            output: PathBuf::from(DEFAULT_OUTPUT_DIR),
        }
    }
}

impl Config {
    /// Load configuration from `RADIOCAT_CONFIG` or the platform config directory.
    ///
    /// A missing file in the platform directory yields defaults. A path named
    /// by `RADIOCAT_CONFIG` must exist.
    pub fn load() -> Result<Self> {
        if let Some(explicit) = std::env::var_os(CONFIG_ENV) {
            return Self::load_from(Path::new(&explicit));
        }

        let mut config = match Self::default_path() {
            Some(path) if path.exists() => Self::read_file(&path)?,
            _ => Self::default(),
        };
        config.apply_env_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from an explicit file, which must exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::Config(format!(
                "Config file not found: {}",
                path.display()
            )));
        }
        let mut config = Self::read_file(path)?;
        config.apply_env_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate configuration from TOML text, without env overrides.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)
            .map_err(|e| Error::Config(format!("Failed to parse config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    fn read_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read config: {e}")))?;
        toml::from_str(&content).map_err(|e| Error::Config(format!("Failed to parse config: {e}")))
    }

    /// Platform location of the config file, if a home directory is known.
    ///
    /// - Linux: `~/.config/radiocat/config.toml`
    /// - macOS: `~/Library/Application Support/radiocat/config.toml`
    /// - Windows: `%APPDATA%\radiocat\config\config.toml`
    pub fn default_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "radiocat")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Apply environment overrides using `lookup` to read variables.
    pub fn apply_env_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(dir) = lookup(OUTPUT_DIR_ENV).filter(|d| !d.trim().is_empty()) {
            self.paths.output = PathBuf::from(dir);
        }
    }

    /// Reject values that would stall or disable the pipeline.
    pub fn validate(&self) -> Result<()> {
        let d = &self.defaults;
        if d.probe_concurrency == 0 {
            return Err(Error::Config("probe_concurrency must be at least 1".into()));
        }
        if d.fetch_timeout_secs == 0 {
            return Err(Error::Config("fetch_timeout_secs must be at least 1".into()));
        }
        if d.probe_timeout_secs == 0 {
            return Err(Error::Config("probe_timeout_secs must be at least 1".into()));
        }
        if let Some((name, _)) = self.categories.iter().find(|(_, urls)| urls.is_empty()) {
            return Err(Error::Config(format!(
                "Category '{name}' has no source URLs"
            )));
        }
        Ok(())
    }

    /// Directory that receives the category catalogs.
    #[must_use]
    pub fn output_dir(&self) -> PathBuf {
        self.paths.output.clone()
    }

    /// Timeout for each playlist download.
    #[must_use]
    pub const fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.defaults.fetch_timeout_secs)
    }

    /// Timeout for each probe request.
    #[must_use]
    pub const fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.defaults.probe_timeout_secs)
    }

    /// Age after which a cached verdict is re-probed.
    #[must_use]
    pub fn stale_after(&self) -> chrono::Duration {
        chrono::Duration::hours(i64::from(self.defaults.stale_after_hours))
    }

    /// Parser defaults and filters from `[defaults]`.
    #[must_use]
    pub fn parser_options(&self) -> ParserOptions {
        let d = &self.defaults;
        ParserOptions {
            default_name: d.default_name.clone(),
            default_description: d.default_description.clone(),
            default_thumb: d.default_thumb.clone(),
            audio_hints: d.audio_hints.clone(),
        }
    }

    /// Options for a [`crate::CategoryPipeline`] built from this config.
    #[must_use]
    pub fn pipeline_options(&self) -> PipelineOptions {
        PipelineOptions {
            concurrency: self.defaults.probe_concurrency,
            stale_after: self.stale_after(),
            parser: self.parser_options(),
        }
    }

    /// Every configured category with its source URLs.
    ///
    /// Registry categories come first in registry order (with any overridden
    /// URL lists), then config-only categories sorted by name.
    #[must_use]
    pub fn category_sources(&self) -> Vec<(String, Vec<String>)> {
        let registry = Registry::new();
        let mut sources: Vec<(String, Vec<String>)> = registry
            .all_entries()
            .iter()
            .map(|entry| {
                let urls = self
                    .categories
                    .get(&entry.category)
                    .cloned()
                    .unwrap_or_else(|| entry.sources.clone());
                (entry.category.clone(), urls)
            })
            .collect();

        sources.extend(
            self.categories
                .iter()
                .filter(|(name, _)| registry.get(name).is_none())
                .map(|(name, urls)| (name.clone(), urls.clone())),
        );
        sources
    }

    /// Source URLs for a single category, if it is configured.
    #[must_use]
    pub fn sources_for(&self, category: &str) -> Option<Vec<String>> {
        self.categories.get(category).cloned().or_else(|| {
            Registry::new()
                .get(category)
                .map(|entry| entry.sources.clone())
        })
    }
}
