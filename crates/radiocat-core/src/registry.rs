use serde::{Deserialize, Serialize};

const JUNGULER: &str = "https://raw.githubusercontent.com/junguler/m3u-radio-music-playlists/main";
const SCHILLER: &str = "https://raw.githubusercontent.com/ArnoldSchiller/m3u-radio-music-playlists/main";

/// Built-in category with its ordered playlist sources
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryEntry {
    /// Category name, also the catalog file stem.
    pub category: String,
    /// Short human-readable description.
    pub description: String,
    /// Playlist URLs, fetched in this order.
    pub sources: Vec<String>,
}

impl RegistryEntry {
    /// Entry without sources.
    #[must_use]
    pub fn new(category: &str, description: &str) -> Self {
        Self {
            category: category.to_string(),
            description: description.to_string(),
            sources: Vec::new(),
        }
    }

    /// Replace the playlist URLs.
    #[must_use]
    pub fn with_sources(mut self, sources: Vec<String>) -> Self {
        self.sources = sources;
        self
    }
}

impl std::fmt::Display for RegistryEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} ({} sources)\n   {}",
            self.category,
            self.sources.len(),
            self.description
        )
    }
}

fn junguler(files: &[&str]) -> Vec<String> {
    files.iter().map(|f| format!("{JUNGULER}/{f}")).collect()
}

/// Registry of the categories radiocat knows out of the box
pub struct Registry {
    entries: Vec<RegistryEntry>,
}

impl Registry {
    /// Create a new registry with hardcoded entries
    pub fn new() -> Self {
        let mut worldfm = vec![
            "https://raw.githubusercontent.com/iptv-org/iptv/master/categories/radio.m3u"
                .to_string(),
        ];
        worldfm.extend(junguler(&[
            "world.m3u",
            "europe.m3u",
            "north_america.m3u",
            "south_america.m3u",
            "asia.m3u",
            "africa.m3u",
            "australia.m3u",
        ]));
        worldfm.push(
            "https://gist.githubusercontent.com/casaper/ddec35d21a0158628fccbab7876b7ef3/raw/bbc.m3u"
                .to_string(),
        );

        let mut bollywood = junguler(&["fm_cube/india.m3u", "bollywood.m3u"]);
        bollywood.push(format!("{SCHILLER}/indian.m3u"));

        let mut dance_edm = vec![format!("{SCHILLER}/dance.m3u")];
        dance_edm.extend(junguler(&["electronic.m3u", "techno.m3u"]));

        let mut audiobooks = junguler(&["fm_cube/audiobooks.m3u"]);
        audiobooks.push(
            "https://raw.githubusercontent.com/junguler/m3u-audiobooks/main/audiobooks.m3u"
                .to_string(),
        );

        let entries = vec![
            RegistryEntry::new("worldfm", "Stations from around the world").with_sources(worldfm),
            RegistryEntry::new("bollywood", "Indian and Bollywood music").with_sources(bollywood),
            RegistryEntry::new("hollywood", "English pop, rock and decade hits").with_sources(
                junguler(&["pop.m3u", "80s.m3u", "90s.m3u", "rock.m3u", "english.m3u"]),
            ),
            RegistryEntry::new("dance_edm", "Dance, electronic and techno").with_sources(dance_edm),
            RegistryEntry::new("jazz_blues", "Jazz and blues")
                .with_sources(junguler(&["jazz.m3u", "blues.m3u"])),
            RegistryEntry::new("classical", "Classical music")
                .with_sources(junguler(&["classical.m3u"])),
            RegistryEntry::new("audiobooks", "Spoken word and audiobooks")
                .with_sources(audiobooks),
            RegistryEntry::new("relax_chill", "Chill, ambient and lounge")
                .with_sources(junguler(&["chill.m3u", "ambient.m3u", "lounge.m3u"])),
        ];

        Self { entries }
    }

    /// Look up a category by exact name
    pub fn get(&self, category: &str) -> Option<&RegistryEntry> {
        self.entries.iter().find(|e| e.category == category)
    }

    /// Get all registry entries, in processing order
    pub fn all_entries(&self) -> &[RegistryEntry] {
        &self.entries
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}
