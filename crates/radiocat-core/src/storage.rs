use crate::{Entry, Error, Result};
use chrono::{DateTime, Utc};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Maximum allowed category name length
const MAX_CATEGORY_LEN: usize = 64;

/// Persistence seam for per-category catalogs.
///
/// `save` is an unconditional overwrite: callers pass the final, already
/// merged set of entries.
pub trait CatalogStore {
    /// Load the persisted catalog, or an empty one if none exists yet.
    ///
    /// Entries without `last_checked` are backfilled with the current time.
    fn load(&self, category: &str) -> Result<Vec<Entry>>;

    /// Stamp every entry's `last_checked` with the current time and replace
    /// the stored catalog with `entries`.
    fn save(&self, category: &str, entries: &[Entry]) -> Result<()>;
}

/// Treat legacy entries (written before liveness tracking) as freshly checked.
pub fn backfill_last_checked(entries: &mut [Entry], now: DateTime<Utc>) -> usize {
    let mut filled = 0;
    for entry in entries.iter_mut().filter(|e| e.last_checked.is_none()) {
        entry.last_checked = Some(now);
        filled += 1;
    }
    filled
}

/// Copy of `entries` with `last_checked` set to `now`.
#[must_use]
pub fn stamp_checked(entries: &[Entry], now: DateTime<Utc>) -> Vec<Entry> {
    entries
        .iter()
        .cloned()
        .map(|mut entry| {
            entry.last_checked = Some(now);
            entry
        })
        .collect()
}

/// Local filesystem storage: one `<category>.json` file per category
pub struct Storage {
    root_dir: PathBuf,
}

impl Storage {
    /// Creates a storage instance rooted at `root_dir`, creating it if needed
    pub fn with_root(root_dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&root_dir)
            .map_err(|e| Error::Storage(format!("Failed to create output directory: {e}")))?;
        Ok(Self { root_dir })
    }

    /// Returns the output directory path
    #[must_use]
    pub fn root_dir(&self) -> &Path {
        &self.root_dir
    }

    /// Returns the path of the catalog file for a category
    pub fn catalog_path(&self, category: &str) -> Result<PathBuf> {
        Self::validate_category(category)?;
        Ok(self.root_dir.join(format!("{category}.json")))
    }

    /// Checks if a catalog has been written for a category
    #[must_use]
    pub fn exists(&self, category: &str) -> bool {
        self.catalog_path(category)
            .map(|path| path.exists())
            .unwrap_or(false)
    }

    /// Lists all categories with a catalog on disk, sorted by name
    #[must_use]
    pub fn list_categories(&self) -> Vec<String> {
        let mut categories = Vec::new();
        if let Ok(entries) = fs::read_dir(&self.root_dir) {
            for entry in entries.flatten() {
                let path = entry.path();
                if !path.is_file() {
                    continue;
                }
                let is_json = path
                    .extension()
                    .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
                if let (true, Some(stem)) = (is_json, path.file_stem().and_then(|s| s.to_str())) {
                    if Self::validate_category(stem).is_ok() {
                        categories.push(stem.to_string());
                    }
                }
            }
        }
        categories.sort();
        categories
    }

    /// Validate that a category name is safe to use as a file name
    fn validate_category(category: &str) -> Result<()> {
        if category.is_empty() {
            return Err(Error::Storage("Category cannot be empty".into()));
        }

        if category.starts_with('-') || category.starts_with('.') {
            return Err(Error::Storage(format!(
                "Invalid category '{category}': cannot start with '-' or '.'"
            )));
        }

        if category.len() > MAX_CATEGORY_LEN {
            return Err(Error::Storage(format!(
                "Invalid category '{category}': exceeds maximum length of {MAX_CATEGORY_LEN} characters"
            )));
        }

        if !category
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(Error::Storage(format!(
                "Invalid category '{category}': only [A-Za-z0-9_-] are allowed"
            )));
        }

        Ok(())
    }

    fn read_catalog(&self, category: &str) -> Result<Vec<Entry>> {
        let path = self.catalog_path(category)?;
        if !path.exists() {
            return Ok(Vec::new());
        }
        let json = fs::read_to_string(&path)
            .map_err(|e| Error::Storage(format!("Failed to read {}: {e}", path.display())))?;
        serde_json::from_str(&json)
            .map_err(|e| Error::Storage(format!("Failed to parse {}: {e}", path.display())))
    }

    fn write_catalog(&self, category: &str, entries: &[Entry]) -> Result<()> {
        let path = self.catalog_path(category)?;
        let json = serde_json::to_string_pretty(entries)
            .map_err(|e| Error::Storage(format!("Failed to serialize catalog: {e}")))?;

        // Write to a temp file first so readers never see a half-written catalog
        let tmp_path = path.with_extension("json.tmp");
        fs::write(&tmp_path, json)
            .map_err(|e| Error::Storage(format!("Failed to write temp catalog: {e}")))?;

        #[cfg(target_os = "windows")]
        if path.exists() {
            if let Err(e) = fs::remove_file(&path) {
                let _ = fs::remove_file(&tmp_path);
                return Err(Error::Storage(format!("Failed to remove existing catalog: {e}")));
            }
        }
        if let Err(e) = fs::rename(&tmp_path, &path) {
            let _ = fs::remove_file(&tmp_path);
            return Err(Error::Storage(format!("Failed to commit catalog: {e}")));
        }
        Ok(())
    }
}

impl CatalogStore for Storage {
    fn load(&self, category: &str) -> Result<Vec<Entry>> {
        let mut entries = self.read_catalog(category)?;
        let filled = backfill_last_checked(&mut entries, Utc::now());
        if filled > 0 {
            debug!("Backfilled last_checked on {} legacy entries in {}", filled, category);
        }
        Ok(entries)
    }

    fn save(&self, category: &str, entries: &[Entry]) -> Result<()> {
        let stamped = stamp_checked(entries, Utc::now());
        self.write_catalog(category, &stamped)?;
        info!("Saved {} entries for {}", stamped.len(), category);
        Ok(())
    }
}

// Note: Default is not implemented as Storage::with_root() can fail.
