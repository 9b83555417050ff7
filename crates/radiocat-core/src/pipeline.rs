//! Per-category orchestration.
//!
//! One run of a category goes through four stages:
//!
//! 1. Load the prior catalog. Fresh entries are carried over as they are,
//!    stale ones are queued for a new probe. Every prior key seeds the
//!    [`Deduplicator`]. An unreadable catalog is logged and treated as empty.
//! 2. Fetch each source in order and parse it. A failing source is logged and
//!    skipped. A new candidate whose endpoint belongs to a fresh cached entry
//!    is replaced by that cached entry; the rest are queued.
//! 3. Probe the queued endpoints concurrently, bounded by
//!    [`PipelineOptions::concurrency`]. Each endpoint is probed once per run
//!    and its verdict applies to every queued entry sharing it.
//! 4. Drop duplicates and anything not active, then overwrite the catalog.
//!
//! Only a failure to save the catalog ends the run with an error.

use crate::{
    CatalogStore, Deduplicator, DocumentSource, Entry, EntryStatus, LivenessProbe, ParserOptions,
    PlaylistParser, Result,
};
use chrono::{DateTime, Duration, Utc};
use futures::stream::{self, StreamExt};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};

/// Default number of probes in flight.
pub const DEFAULT_CONCURRENCY: usize = 100;

/// Callback receiving `(completed, total)` after each probe finishes.
pub type ProgressCallback = Arc<dyn Fn(usize, usize) + Send + Sync>;

/// Tunables for a pipeline run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineOptions {
    /// Maximum concurrent probes (values below 1 are treated as 1).
    pub concurrency: usize,
    /// Age after which a cached verdict must be re-probed.
    pub stale_after: Duration,
    /// Defaults and filters handed to the playlist parser.
    pub parser: ParserOptions,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
            stale_after: Duration::hours(24),
            parser: ParserOptions::default(),
        }
    }
}

/// A source that could not be retrieved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFailure {
    /// Source URL as configured.
    pub url: String,
    /// Rendered fetch error.
    pub error: String,
}

/// What happened during one category run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    /// Category this run refreshed.
    pub category: String,
    /// Entries in the catalog before this run.
    pub prior: usize,
    /// Why the prior catalog could not be read, if it could not.
    ///
    /// The run then starts from an empty catalog and overwrites the file.
    pub prior_error: Option<String>,
    /// Fresh prior entries kept without probing.
    pub carried: usize,
    /// Sources the run tried to fetch.
    pub sources_attempted: usize,
    /// Sources that could not be fetched, in source order.
    pub sources_failed: Vec<SourceFailure>,
    /// Candidates produced by the parser across all sources.
    pub parsed: usize,
    /// Candidates discarded because their identity key was already seen.
    pub duplicates: usize,
    /// New candidates replaced by the fresh cached entry for their endpoint.
    pub reused: usize,
    /// Distinct endpoints probed.
    pub probes_attempted: usize,
    /// Probed endpoints that answered.
    pub probes_passed: usize,
    /// Probed endpoints that did not answer.
    pub probes_failed: usize,
    /// Entries written to the catalog.
    pub saved: usize,
}

impl RunReport {
    fn new(category: &str) -> Self {
        Self {
            category: category.to_string(),
            ..Self::default()
        }
    }

    /// Sources fetched without error.
    #[must_use]
    pub fn sources_succeeded(&self) -> usize {
        self.sources_attempted
            .saturating_sub(self.sources_failed.len())
    }
}

/// Runs categories against a document source, a probe, and a catalog store.
pub struct CategoryPipeline<'a, D, P, S> {
    source: &'a D,
    probe: &'a P,
    store: &'a S,
    options: PipelineOptions,
    parser: PlaylistParser,
    progress: Option<ProgressCallback>,
}

impl<'a, D, P, S> CategoryPipeline<'a, D, P, S>
where
    D: DocumentSource + Sync,
    P: LivenessProbe,
    S: CatalogStore,
{
    /// Pipeline over borrowed collaborators.
    #[must_use]
    pub fn new(source: &'a D, probe: &'a P, store: &'a S, options: PipelineOptions) -> Self {
        let parser = PlaylistParser::new(options.parser.clone());
        Self {
            source,
            probe,
            store,
            options,
            parser,
            progress: None,
        }
    }

    /// Set progress callback.
    ///
    /// The callback receives `(completed, total)` after each probe of a run.
    #[must_use]
    pub fn with_progress<F>(mut self, callback: F) -> Self
    where
        F: Fn(usize, usize) + Send + Sync + 'static,
    {
        self.progress = Some(Arc::new(callback));
        self
    }

    /// Options this pipeline was built with.
    #[must_use]
    pub const fn options(&self) -> &PipelineOptions {
        &self.options
    }

    /// Refresh one category from its ordered source URLs.
    #[instrument(skip(self, urls), fields(sources = urls.len()))]
    pub async fn run(&self, category: &str, urls: &[String]) -> Result<RunReport> {
        let now = Utc::now();
        let stale_after = self.options.stale_after;
        let mut report = RunReport::new(category);
        let prior = match self.store.load(category) {
            Ok(prior) => prior,
            Err(e) => {
                warn!("Ignoring unreadable catalog for {}: {}", category, e);
                report.prior_error = Some(e.to_string());
                Vec::new()
            },
        };
        report.prior = prior.len();

        let mut dedup = Deduplicator::seeded(&prior);
        let mut fresh_cached: HashMap<String, Entry> = HashMap::new();
        for entry in prior.iter().filter(|entry| entry.is_fresh(now, stale_after)) {
            fresh_cached
                .entry(entry.endpoint.clone())
                .or_insert_with(|| entry.clone());
        }

        let mut working: Vec<Entry> = Vec::with_capacity(prior.len());
        let mut queued: Vec<usize> = Vec::new();

        for mut entry in prior {
            if entry.is_fresh(now, stale_after) {
                report.carried += 1;
            } else {
                entry.status = EntryStatus::Pending;
                queued.push(working.len());
            }
            working.push(entry);
        }

        for url in urls {
            report.sources_attempted += 1;
            let document = match self.source.fetch_document(url).await {
                Ok(document) => document,
                Err(e) => {
                    warn!("Skipping source {}: {}", url, e);
                    report.sources_failed.push(SourceFailure {
                        url: url.clone(),
                        error: e.to_string(),
                    });
                    continue;
                },
            };

            let parsed_before = report.parsed;
            for candidate in self.parser.parse(&document) {
                report.parsed += 1;
                if !dedup.admit(&candidate) {
                    report.duplicates += 1;
                    continue;
                }
                if let Some(cached) = fresh_cached.get(&candidate.endpoint) {
                    debug!("Reusing cached {} for {}", cached.name, candidate.name);
                    working.push(cached.clone());
                    report.reused += 1;
                } else {
                    queued.push(working.len());
                    working.push(candidate);
                }
            }
            debug!(
                "Parsed {} candidates from {}",
                report.parsed - parsed_before,
                url
            );
        }

        let groups = group_by_endpoint(&working, &queued);
        report.probes_attempted = groups.len();
        for (indices, live, checked_at) in self.probe_all(groups).await {
            if live {
                for index in indices {
                    if let Some(entry) = working.get_mut(index) {
                        entry.activate(checked_at);
                    }
                }
                report.probes_passed += 1;
            } else {
                report.probes_failed += 1;
            }
        }

        let catalog = Deduplicator::finalize(working);
        report.saved = catalog.len();
        self.store.save(category, &catalog)?;

        info!(
            "{}: {} active ({} carried, {} reused, {}/{} probes passed, {} sources failed)",
            category,
            report.saved,
            report.carried,
            report.reused,
            report.probes_passed,
            report.probes_attempted,
            report.sources_failed.len()
        );
        Ok(report)
    }

    /// Run several categories one after another.
    ///
    /// A failing category is logged and the remaining ones still run.
    pub async fn run_all(
        &self,
        categories: &[(String, Vec<String>)],
    ) -> Vec<(String, Result<RunReport>)> {
        let mut results = Vec::with_capacity(categories.len());
        for (category, urls) in categories {
            let result = self.run(category, urls).await;
            if let Err(e) = &result {
                error!("Category {} failed: {}", category, e);
            }
            results.push((category.clone(), result));
        }
        results
    }

    /// Probe each endpoint group once, returning `(indices, live, checked_at)`
    /// in completion order.
    async fn probe_all(
        &self,
        groups: Vec<(&str, Vec<usize>)>,
    ) -> Vec<(Vec<usize>, bool, DateTime<Utc>)> {
        let total = groups.len();
        if total == 0 {
            return Vec::new();
        }

        let mut verdicts = Vec::with_capacity(total);
        let mut pending = stream::iter(groups)
            .map(|(endpoint, indices)| async move {
                let live = self.probe.is_live(endpoint).await;
                if !live {
                    debug!("Dropping unreachable {}", endpoint);
                }
                (indices, live, Utc::now())
            })
            .buffer_unordered(self.options.concurrency.max(1));

        while let Some(verdict) = pending.next().await {
            verdicts.push(verdict);
            if let Some(progress) = &self.progress {
                progress(verdicts.len(), total);
            }
        }
        verdicts
    }
}

/// Queued working indices grouped by endpoint, in first-queued order.
fn group_by_endpoint<'e>(working: &'e [Entry], queued: &[usize]) -> Vec<(&'e str, Vec<usize>)> {
    let mut groups: Vec<(&str, Vec<usize>)> = Vec::new();
    let mut positions: HashMap<&str, usize> = HashMap::new();
    for &index in queued {
        let Some(entry) = working.get(index) else {
            continue;
        };
        let endpoint = entry.endpoint.as_str();
        match positions.get(endpoint) {
            Some(&position) => groups[position].1.push(index),
            None => {
                positions.insert(endpoint, groups.len());
                groups.push((endpoint, vec![index]));
            },
        }
    }
    groups
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::storage::stamp_checked;
    use crate::{Error, IdentityKey};
    use async_trait::async_trait;
    use std::collections::HashSet;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    // --------------------------------------------------------
    // Mocks
    // --------------------------------------------------------

    #[derive(Default)]
    struct MockSource {
        documents: HashMap<String, String>,
        requests: Mutex<Vec<String>>,
    }

    impl MockSource {
        fn with_document(mut self, url: &str, body: &str) -> Self {
            self.documents.insert(url.to_string(), body.to_string());
            self
        }
    }

    #[async_trait]
    impl DocumentSource for MockSource {
        async fn fetch_document(&self, url: &str) -> Result<String> {
            self.requests.lock().expect("lock poisoned").push(url.to_string());
            self.documents
                .get(url)
                .cloned()
                .ok_or_else(|| Error::NotFound(format!("Playlist not found at '{url}'")))
        }
    }

    #[derive(Default)]
    struct MockProbe {
        live: HashSet<String>,
        calls: Mutex<Vec<String>>,
        delay_ms: u64,
        in_flight: AtomicUsize,
        max_in_flight: AtomicUsize,
    }

    impl MockProbe {
        fn live(endpoints: &[&str]) -> Self {
            Self {
                live: endpoints.iter().map(|e| (*e).to_string()).collect(),
                ..Self::default()
            }
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().expect("lock poisoned").clone()
        }
    }

    #[async_trait]
    impl LivenessProbe for MockProbe {
        async fn is_live(&self, endpoint: &str) -> bool {
            self.calls.lock().expect("lock poisoned").push(endpoint.to_string());
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(now, Ordering::SeqCst);
            if self.delay_ms > 0 {
                tokio::time::sleep(std::time::Duration::from_millis(self.delay_ms)).await;
            }
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            self.live.contains(endpoint)
        }
    }

    #[derive(Default)]
    struct MemoryStore {
        catalogs: Mutex<HashMap<String, Vec<Entry>>>,
        fail_load_for: Option<String>,
        fail_save_for: Option<String>,
        saves: AtomicUsize,
    }

    impl MemoryStore {
        fn with_catalog(self, category: &str, entries: Vec<Entry>) -> Self {
            self.catalogs
                .lock()
                .expect("lock poisoned")
                .insert(category.to_string(), entries);
            self
        }

        fn catalog(&self, category: &str) -> Vec<Entry> {
            self.catalogs
                .lock()
                .expect("lock poisoned")
                .get(category)
                .cloned()
                .unwrap_or_default()
        }
    }

    impl CatalogStore for MemoryStore {
        fn load(&self, category: &str) -> Result<Vec<Entry>> {
            if self.fail_load_for.as_deref() == Some(category) {
                return Err(Error::Storage(format!("Failed to parse {category}.json")));
            }
            Ok(self.catalog(category))
        }

        fn save(&self, category: &str, entries: &[Entry]) -> Result<()> {
            if self.fail_save_for.as_deref() == Some(category) {
                return Err(Error::Storage("disk full".into()));
            }
            self.saves.fetch_add(1, Ordering::SeqCst);
            self.catalogs
                .lock()
                .expect("lock poisoned")
                .insert(category.to_string(), stamp_checked(entries, Utc::now()));
            Ok(())
        }
    }

    // --------------------------------------------------------
    // Helpers
    // --------------------------------------------------------

    fn block(name: &str, endpoint: &str) -> String {
        format!("#EXTINF:-1,{name}\n{endpoint}\n")
    }

    fn cached(name: &str, endpoint: &str, hours_ago: i64) -> Entry {
        let mut entry = Entry::pending(name, "Radio Station", endpoint, "thumb");
        entry.activate(Utc::now() - Duration::hours(hours_ago));
        entry
    }

    fn urls(list: &[&str]) -> Vec<String> {
        list.iter().map(|u| (*u).to_string()).collect()
    }

    fn names(entries: &[Entry]) -> Vec<&str> {
        entries.iter().map(|e| e.name.as_str()).collect()
    }

    // --------------------------------------------------------
    // Behaviour
    // --------------------------------------------------------

    #[tokio::test]
    async fn test_single_block_end_to_end() {
        let source = MockSource::default().with_document(
            "src",
            "#EXTM3U\n#EXTINF:-1 group-title=\"News\",Example Radio\nhttp://example.org/stream.mp3\n",
        );
        let probe = MockProbe::live(&["http://example.org/stream.mp3"]);
        let store = MemoryStore::default();

        let pipeline = CategoryPipeline::new(&source, &probe, &store, PipelineOptions::default());
        let report = pipeline.run("news", &urls(&["src"])).await.unwrap();

        assert_eq!(report.saved, 1);
        let catalog = store.catalog("news");
        assert_eq!(catalog.len(), 1);
        let entry = &catalog[0];
        assert_eq!(entry.name, "Example Radio");
        assert_eq!(entry.description, "News");
        assert_eq!(entry.endpoint, "http://example.org/stream.mp3");
        assert_eq!(entry.status, EntryStatus::Active);
        assert!(entry.last_checked.is_some());
    }

    #[tokio::test]
    async fn test_duplicates_across_sources_collapse() {
        let endpoint = "http://e.org/live.mp3";
        let source = MockSource::default()
            .with_document("a", &block("Jazz FM", endpoint))
            .with_document("b", &block("JAZZ fm", endpoint));
        let probe = MockProbe::live(&[endpoint]);
        let store = MemoryStore::default();

        let pipeline = CategoryPipeline::new(&source, &probe, &store, PipelineOptions::default());
        let report = pipeline.run("jazz", &urls(&["a", "b"])).await.unwrap();

        assert_eq!(report.parsed, 2);
        assert_eq!(report.duplicates, 1);
        assert_eq!(probe.calls(), vec![endpoint.to_string()]);
        assert_eq!(names(&store.catalog("jazz")), vec!["Jazz FM"]);
    }

    #[tokio::test]
    async fn test_fresh_cache_is_not_reprobed() {
        let endpoint = "http://e.org/classic.mp3";
        let source = MockSource::default().with_document("a", &block("Classic", endpoint));
        let probe = MockProbe::live(&[]);
        let store = MemoryStore::default().with_catalog("classical", vec![cached("Classic", endpoint, 1)]);

        let pipeline = CategoryPipeline::new(&source, &probe, &store, PipelineOptions::default());
        let report = pipeline.run("classical", &urls(&["a"])).await.unwrap();

        assert!(probe.calls().is_empty(), "fresh verdict must be reused");
        assert_eq!(report.carried, 1);
        assert_eq!(report.duplicates, 1);
        assert_eq!(names(&store.catalog("classical")), vec!["Classic"]);
    }

    #[tokio::test]
    async fn test_new_name_on_fresh_endpoint_reuses_cached_entry() {
        let endpoint = "http://e.org/shared.mp3";
        let source = MockSource::default().with_document(
            "a",
            &format!("#EXTINF:-1 group-title=\"Other\",Renamed\n{endpoint}\n"),
        );
        let probe = MockProbe::live(&[]);
        let store = MemoryStore::default().with_catalog("cat", vec![cached("Original", endpoint, 1)]);

        let pipeline = CategoryPipeline::new(&source, &probe, &store, PipelineOptions::default());
        let report = pipeline.run("cat", &urls(&["a"])).await.unwrap();

        assert!(probe.calls().is_empty());
        assert_eq!(report.reused, 1);
        assert_eq!(report.probes_attempted, 0);
        let catalog = store.catalog("cat");
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog[0].name, "Original");
        assert_eq!(catalog[0].description, "Radio Station");
    }

    #[tokio::test]
    async fn test_shared_endpoint_is_probed_once() {
        let endpoint = "http://e.org/shared.mp3";
        let document = format!("{}{}", block("Renamed", endpoint), block("Third", endpoint));
        let source = MockSource::default().with_document("a", &document);
        let probe = MockProbe::live(&[endpoint]);
        let store = MemoryStore::default().with_catalog("cat", vec![cached("Original", endpoint, 30)]);

        let pipeline = CategoryPipeline::new(&source, &probe, &store, PipelineOptions::default());
        let report = pipeline.run("cat", &urls(&["a"])).await.unwrap();

        assert_eq!(probe.calls(), vec![endpoint.to_string()]);
        assert_eq!(report.probes_attempted, 1);
        assert_eq!(report.probes_passed, 1);
        assert_eq!(names(&store.catalog("cat")), vec!["Original", "Renamed", "Third"]);
    }

    #[tokio::test]
    async fn test_unreadable_catalog_is_rebuilt() {
        let source = MockSource::default().with_document("a", &block("Live", "http://l.org/live.mp3"));
        let probe = MockProbe::live(&["http://l.org/live.mp3"]);
        let store = MemoryStore {
            fail_load_for: Some("news".to_string()),
            ..MemoryStore::default()
        };

        let pipeline = CategoryPipeline::new(&source, &probe, &store, PipelineOptions::default());
        let report = pipeline.run("news", &urls(&["a"])).await.unwrap();

        assert!(report.prior_error.as_deref().unwrap().contains("news.json"));
        assert_eq!(report.prior, 0);
        assert_eq!(report.saved, 1);
        assert_eq!(store.saves.load(Ordering::SeqCst), 1);
        assert_eq!(names(&store.catalog("news")), vec!["Live"]);
    }

    #[tokio::test]
    async fn test_stale_entry_is_reprobed_and_dropped() {
        let endpoint = "http://e.org/gone.mp3";
        let source = MockSource::default().with_document("a", &block("Gone", endpoint));
        let probe = MockProbe::live(&[]);
        let store = MemoryStore::default().with_catalog("cat", vec![cached("Gone", endpoint, 25)]);

        let pipeline = CategoryPipeline::new(&source, &probe, &store, PipelineOptions::default());
        let report = pipeline.run("cat", &urls(&["a"])).await.unwrap();

        assert_eq!(probe.calls(), vec![endpoint.to_string()]);
        assert_eq!(report.probes_failed, 1);
        assert!(store.catalog("cat").is_empty());
    }

    #[tokio::test]
    async fn test_stale_entry_survives_when_live() {
        let endpoint = "http://e.org/still.mp3";
        let source = MockSource::default();
        let probe = MockProbe::live(&[endpoint]);
        let store = MemoryStore::default().with_catalog("cat", vec![cached("Still", endpoint, 48)]);

        let before = Utc::now();
        let pipeline = CategoryPipeline::new(&source, &probe, &store, PipelineOptions::default());
        pipeline.run("cat", &[]).await.unwrap();

        let catalog = store.catalog("cat");
        assert_eq!(names(&catalog), vec!["Still"]);
        assert!(catalog[0].last_checked.unwrap() >= before);
    }

    #[tokio::test]
    async fn test_fresh_prior_entry_not_in_sources_is_carried() {
        let source = MockSource::default().with_document("a", &block("New", "http://n.org/new.mp3"));
        let probe = MockProbe::live(&["http://n.org/new.mp3"]);
        let store = MemoryStore::default()
            .with_catalog("cat", vec![cached("Quiet", "http://q.org/quiet.mp3", 3)]);

        let pipeline = CategoryPipeline::new(&source, &probe, &store, PipelineOptions::default());
        pipeline.run("cat", &urls(&["a"])).await.unwrap();

        assert_eq!(names(&store.catalog("cat")), vec!["Quiet", "New"]);
        assert_eq!(probe.calls(), vec!["http://n.org/new.mp3".to_string()]);
    }

    #[tokio::test]
    async fn test_failing_source_does_not_abort_category() {
        let source = MockSource::default().with_document("good", &block("Ok", "http://o.org/ok.mp3"));
        let probe = MockProbe::live(&["http://o.org/ok.mp3"]);
        let store = MemoryStore::default();

        let pipeline = CategoryPipeline::new(&source, &probe, &store, PipelineOptions::default());
        let report = pipeline.run("cat", &urls(&["missing", "good"])).await.unwrap();

        assert_eq!(report.sources_attempted, 2);
        assert_eq!(report.sources_succeeded(), 1);
        assert_eq!(report.sources_failed[0].url, "missing");
        assert!(report.sources_failed[0].error.contains("not found"));
        assert_eq!(store.catalog("cat").len(), 1);
        assert_eq!(
            *source.requests.lock().unwrap(),
            vec!["missing".to_string(), "good".to_string()]
        );
    }

    #[tokio::test]
    async fn test_non_audio_endpoint_never_probed() {
        let source = MockSource::default().with_document(
            "a",
            &format!(
                "{}{}",
                block("Video", "http://v.org/channel.m3u8"),
                block("Audio", "http://a.org/live.aac")
            ),
        );
        let probe = MockProbe::live(&["http://v.org/channel.m3u8", "http://a.org/live.aac"]);
        let store = MemoryStore::default();

        let pipeline = CategoryPipeline::new(&source, &probe, &store, PipelineOptions::default());
        pipeline.run("cat", &urls(&["a"])).await.unwrap();

        assert_eq!(probe.calls(), vec!["http://a.org/live.aac".to_string()]);
        assert_eq!(names(&store.catalog("cat")), vec!["Audio"]);
    }

    #[tokio::test]
    async fn test_second_run_is_idempotent() {
        let document = format!(
            "{}{}{}",
            block("One", "http://x.org/1.mp3"),
            block("Two", "http://x.org/2.mp3"),
            block("Dead", "http://x.org/3.mp3")
        );
        let source = MockSource::default().with_document("a", &document);
        let probe = MockProbe::live(&["http://x.org/1.mp3", "http://x.org/2.mp3"]);
        let store = MemoryStore::default();
        let pipeline = CategoryPipeline::new(&source, &probe, &store, PipelineOptions::default());

        pipeline.run("cat", &urls(&["a"])).await.unwrap();
        let first = store.catalog("cat");
        let probes_after_first = probe.calls().len();
        pipeline.run("cat", &urls(&["a"])).await.unwrap();
        let second = store.catalog("cat");

        let keys = |entries: &[Entry]| -> Vec<IdentityKey> {
            entries.iter().map(Entry::identity_key).collect()
        };
        assert_eq!(keys(&first), keys(&second));
        assert_eq!(names(&second), vec!["One", "Two"]);
        // Only the dead endpoint is tried again.
        assert_eq!(probe.calls().len(), probes_after_first + 1);
    }

    #[tokio::test]
    async fn test_discovery_order_after_carried_entries() {
        let document = format!(
            "{}{}{}",
            block("C", "http://x.org/c.mp3"),
            block("A", "http://x.org/a.mp3"),
            block("B", "http://x.org/b.mp3")
        );
        let source = MockSource::default().with_document("a", &document);
        let probe = MockProbe {
            delay_ms: 5,
            ..MockProbe::live(&["http://x.org/a.mp3", "http://x.org/b.mp3", "http://x.org/c.mp3"])
        };
        let store = MemoryStore::default().with_catalog("cat", vec![cached("Z", "http://x.org/z.mp3", 1)]);

        let pipeline = CategoryPipeline::new(&source, &probe, &store, PipelineOptions::default());
        pipeline.run("cat", &urls(&["a"])).await.unwrap();

        assert_eq!(names(&store.catalog("cat")), vec!["Z", "C", "A", "B"]);
    }

    #[tokio::test]
    async fn test_concurrency_cap_and_progress() {
        let endpoints: Vec<String> = (0..12).map(|i| format!("http://x.org/{i}.mp3")).collect();
        let document: String = endpoints
            .iter()
            .enumerate()
            .map(|(i, e)| block(&format!("S{i}"), e))
            .collect();
        let source = MockSource::default().with_document("a", &document);
        let probe = MockProbe {
            delay_ms: 20,
            ..MockProbe::live(&[])
        };
        let store = MemoryStore::default();

        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let options = PipelineOptions {
            concurrency: 3,
            ..PipelineOptions::default()
        };
        let pipeline = CategoryPipeline::new(&source, &probe, &store, options)
            .with_progress(move |done, total| sink.lock().unwrap().push((done, total)));
        let report = pipeline.run("cat", &urls(&["a"])).await.unwrap();

        assert_eq!(report.probes_attempted, 12);
        assert!(probe.max_in_flight.load(Ordering::SeqCst) <= 3);
        let progress = seen.lock().unwrap().clone();
        assert_eq!(progress.len(), 12);
        assert_eq!(progress.last(), Some(&(12, 12)));
    }

    #[tokio::test]
    async fn test_save_failure_is_fatal_for_category_only() {
        let source = MockSource::default().with_document("a", &block("Ok", "http://o.org/ok.mp3"));
        let probe = MockProbe::live(&["http://o.org/ok.mp3"]);
        let store = MemoryStore {
            fail_save_for: Some("broken".to_string()),
            ..MemoryStore::default()
        };

        let pipeline = CategoryPipeline::new(&source, &probe, &store, PipelineOptions::default());
        let results = pipeline
            .run_all(&[
                ("broken".to_string(), urls(&["a"])),
                ("fine".to_string(), urls(&["a"])),
            ])
            .await;

        assert_eq!(results.len(), 2);
        assert!(matches!(results[0].1, Err(Error::Storage(_))));
        assert_eq!(results[1].1.as_ref().unwrap().saved, 1);
        assert_eq!(store.saves.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_no_sources_and_empty_cache_writes_empty_catalog() {
        let source = MockSource::default();
        let probe = MockProbe::default();
        let store = MemoryStore::default();

        let pipeline = CategoryPipeline::new(&source, &probe, &store, PipelineOptions::default());
        let report = pipeline.run("cat", &[]).await.unwrap();

        assert_eq!(report, RunReport::new("cat"));
        assert_eq!(store.saves.load(Ordering::SeqCst), 1);
    }
}
