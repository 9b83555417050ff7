use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Liveness state of a catalog entry.
///
/// Entries that fail probing are dropped, so there is no inactive state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryStatus {
    /// Parsed but not yet verified.
    #[default]
    Pending,
    /// Verified reachable.
    Active,
}

/// One station in a category catalog.
///
/// Serialized field names match the published catalog format
/// (`name`, `description`, `url`, `thumb`, `status`, `last_checked`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    /// Display name taken from the playlist title.
    pub name: String,
    /// Genre or group label.
    pub description: String,
    /// Stream URL.
    #[serde(rename = "url")]
    pub endpoint: String,
    /// Artwork URL.
    #[serde(rename = "thumb")]
    pub thumbnail: String,
    /// Liveness state; only `Active` entries are persisted.
    #[serde(default)]
    pub status: EntryStatus,
    /// Missing in catalogs written before liveness tracking existed.
    #[serde(default)]
    pub last_checked: Option<DateTime<Utc>>,
}

impl Entry {
    /// Create a pending entry.
    #[must_use]
    pub fn pending(
        name: impl Into<String>,
        description: impl Into<String>,
        endpoint: impl Into<String>,
        thumbnail: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            endpoint: endpoint.into(),
            thumbnail: thumbnail.into(),
            status: EntryStatus::Pending,
            last_checked: None,
        }
    }

    /// Identity used for deduplication: endpoint plus lowercased name.
    #[must_use]
    pub fn identity_key(&self) -> IdentityKey {
        IdentityKey::new(&self.endpoint, &self.name)
    }

    /// Whether the entry passed its last probe.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.status == EntryStatus::Active
    }

    /// Promote to `Active`, recording when liveness was determined.
    pub fn activate(&mut self, checked_at: DateTime<Utc>) {
        self.status = EntryStatus::Active;
        self.last_checked = Some(checked_at);
    }

    /// Whether a cached verdict can be reused at `now` without probing again.
    ///
    /// Only active entries with a `last_checked` strictly younger than
    /// `stale_after` qualify. Entries with no timestamp are never fresh.
    #[must_use]
    pub fn is_fresh(&self, now: DateTime<Utc>, stale_after: Duration) -> bool {
        self.is_active()
            && self
                .last_checked
                .is_some_and(|checked| now - checked < stale_after)
    }
}

/// (endpoint, lowercased name) pair identifying an entry across sources and runs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IdentityKey {
    /// Stream URL, compared exactly.
    pub endpoint: String,
    /// Display name, lowercased.
    pub name: String,
}

impl IdentityKey {
    /// Key for `endpoint` and `name`; the name is lowercased.
    #[must_use]
    pub fn new(endpoint: &str, name: &str) -> Self {
        Self {
            endpoint: endpoint.to_string(),
            name: name.to_lowercase(),
        }
    }
}

impl std::fmt::Display for IdentityKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} <{}>", self.name, self.endpoint)
    }
}
