use crate::{Entry, IdentityKey};
use std::collections::HashSet;

/// Tracks identity keys seen during one category run.
///
/// Seed it with the prior catalog before any source is read so that
/// re-encountered stations are discarded before they reach probing.
#[derive(Debug, Default, Clone)]
pub struct Deduplicator {
    seen: HashSet<IdentityKey>,
}

impl Deduplicator {
    /// Empty seen-set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with every key of `prior` already marked as seen.
    #[must_use]
    pub fn seeded(prior: &[Entry]) -> Self {
        Self {
            seen: prior.iter().map(Entry::identity_key).collect(),
        }
    }

    /// Record `entry`, returning `false` if its key was already seen.
    pub fn admit(&mut self, entry: &Entry) -> bool {
        self.seen.insert(entry.identity_key())
    }

    /// Whether `key` has been seen.
    #[must_use]
    pub fn contains(&self, key: &IdentityKey) -> bool {
        self.seen.contains(key)
    }

    /// Number of distinct keys seen.
    #[must_use]
    pub fn len(&self) -> usize {
        self.seen.len()
    }

    /// Whether nothing has been seen yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }

    /// Final pass: drop repeated keys (first occurrence wins) and anything
    /// that is not active. Order is preserved.
    pub fn finalize(entries: impl IntoIterator<Item = Entry>) -> Vec<Entry> {
        let mut seen = HashSet::new();
        entries
            .into_iter()
            .filter(|entry| entry.is_active() && seen.insert(entry.identity_key()))
            .collect()
    }
}
