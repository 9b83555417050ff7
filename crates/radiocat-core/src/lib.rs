//! # radiocat-core
//!
//! Core functionality for radiocat - a builder for liveness-checked internet radio catalogs.
//!
//! This crate pulls remote M3U playlists for a set of categories, extracts audio stream
//! entries, checks that every stream is reachable right now, and persists one
//! deduplicated JSON catalog per category. Previously verified entries are reused
//! until they go stale, so a daily run only probes what actually needs probing.
//!
//! ## Architecture
//!
//! - **Parsing**: [`PlaylistParser`] turns playlist text into candidate [`Entry`] values
//! - **Probing**: [`LivenessProbe`] decides whether an endpoint is serving content
//! - **Storage**: [`CatalogStore`] loads and overwrites the per-category catalog
//! - **Dedup**: [`Deduplicator`] tracks identity keys across sources and runs
//! - **Pipeline**: [`CategoryPipeline`] ties the pieces together per category
//! - **Configuration**: [`Config`] with the built-in [`Registry`] of category sources
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use radiocat_core::{CategoryPipeline, Config, Fetcher, HttpProbe, Storage};
//!
//! # async fn example() -> radiocat_core::Result<()> {
//! let config = Config::load()?;
//! let storage = Storage::with_root(config.output_dir())?;
//! let fetcher = Fetcher::with_timeout(config.fetch_timeout())?;
//! let probe = HttpProbe::with_timeout(config.probe_timeout())?;
//!
//! let pipeline = CategoryPipeline::new(&fetcher, &probe, &storage, config.pipeline_options());
//! for (category, urls) in config.category_sources() {
//!     let report = pipeline.run(&category, &urls).await?;
//!     println!("{category}: {} active", report.saved);
//! }
//! # Ok(())
//! # }
//! ```

/// Configuration management for defaults, paths and category overrides
pub mod config;
/// Identity-key deduplication across sources and runs
pub mod dedup;
/// Error types and result aliases
pub mod error;
/// HTTP retrieval of playlist documents
pub mod fetcher;
/// Tolerant line scanner for M3U playlists
pub mod parser;
/// Per-category aggregation, probing and persistence
pub mod pipeline;
/// Endpoint liveness checks
pub mod probe;
/// Built-in category to playlist URL registry
pub mod registry;
/// Local filesystem storage for category catalogs
pub mod storage;
/// Core data types
pub mod types;

pub use config::{Config, DefaultsConfig, PathsConfig};
pub use dedup::Deduplicator;
pub use error::{Error, Result};
pub use fetcher::{DocumentSource, Fetcher};
pub use parser::{ParserOptions, PlaylistParser};
pub use pipeline::{CategoryPipeline, PipelineOptions, RunReport, SourceFailure};
pub use probe::{HttpProbe, LivenessProbe};
pub use registry::{Registry, RegistryEntry};
pub use storage::{CatalogStore, Storage};
pub use types::*;
