//! Tolerant scanner for extended M3U playlists.
//!
//! Only the subset used by public radio lists is understood:
//!
//! ```text
//! #EXTM3U
//! #EXTINF:-1 tvg-logo="http://example.org/logo.png" group-title="News",Example Radio
//! http://example.org/stream.mp3
//! ```
//!
//! The scanner never fails. Blocks it cannot make sense of are skipped and
//! missing attributes fall back to defaults from [`ParserOptions`].

use crate::Entry;
use std::str::Lines;

/// Marker that introduces an entry's metadata line.
const EXTINF_PREFIX: &str = "#EXTINF:";

/// Fallback display name when a metadata line has no title.
pub const DEFAULT_NAME: &str = "Unknown";
/// Fallback description when `group-title` is absent.
pub const DEFAULT_DESCRIPTION: &str = "Radio Station";
/// Fallback artwork when `tvg-logo` is absent.
pub const DEFAULT_THUMB: &str = "https://tonetune.netlify.app/assets/tonetune.png";
/// Substrings that mark an endpoint as an audio stream (container and codec hints).
pub const DEFAULT_AUDIO_HINTS: &[&str] = &[
    "mp3", "aac", "ogg", "opus", "flac", "m4a", "wav", "wma", "mpeg",
];

/// Defaults and filters applied while scanning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParserOptions {
    /// Name used when the metadata line has no title.
    pub default_name: String,
    /// Description used when `group-title` is missing or blank.
    pub default_description: String,
    /// Artwork used when `tvg-logo` is missing or blank.
    pub default_thumb: String,
    /// Compared case-insensitively against the endpoint.
    pub audio_hints: Vec<String>,
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self {
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

/// Line-oriented playlist parser producing pending [`Entry`] candidates.
#[derive(Debug, Clone)]
pub struct PlaylistParser {
    options: ParserOptions,
    hints: Vec<String>,
}

impl Default for PlaylistParser {
    fn default() -> Self {
        Self::new(ParserOptions::default())
    }
}

impl PlaylistParser {
    /// Create a parser with the given options.
    #[must_use]
    pub fn new(options: ParserOptions) -> Self {
        let hints = options
            .audio_hints
            .iter()
            .map(|h| h.trim().to_lowercase())
            .filter(|h| !h.is_empty())
            .collect();
        Self { options, hints }
    }

    /// Options this parser was built with.
    #[must_use]
    pub const fn options(&self) -> &ParserOptions {
        &self.options
    }

    /// Lazily scan `content`, yielding one pending entry per usable block.
    pub fn parse<'a>(&'a self, content: &'a str) -> Entries<'a> {
        Entries {
            parser: self,
            lines: content.lines(),
        }
    }

    /// Whether the endpoint carries one of the configured audio hints.
    #[must_use]
    pub fn looks_like_audio(&self, endpoint: &str) -> bool {
        let lowered = endpoint.to_lowercase();
        self.hints.iter().any(|hint| lowered.contains(hint.as_str()))
    }

    fn build_entry(&self, meta: &str, endpoint: &str) -> Entry {
        let options = &self.options;
        let name = display_name(meta).unwrap_or(options.default_name.as_str());
        let description =
            attribute(meta, "group-title").unwrap_or(options.default_description.as_str());
        let thumbnail = attribute(meta, "tvg-logo").unwrap_or(options.default_thumb.as_str());
        Entry::pending(name, description, endpoint, thumbnail)
    }
}

/// Iterator returned by [`PlaylistParser::parse`].
pub struct Entries<'a> {
    parser: &'a PlaylistParser,
    lines: Lines<'a>,
}

impl Iterator for Entries<'_> {
    type Item = Entry;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let line = self.lines.next()?.trim();
            if !line.starts_with(EXTINF_PREFIX) {
                continue;
            }

            // Metadata and endpoint are consumed as a pair, even when the
            // following line turns out not to be an endpoint.
            let endpoint = self.lines.next()?.trim();
            if !endpoint.starts_with("http") {
                continue;
            }
            if !self.parser.looks_like_audio(endpoint) {
                continue;
            }
            return Some(self.parser.build_entry(line, endpoint));
        }
    }
}

/// Title after the last comma, if non-empty.
fn display_name(meta: &str) -> Option<&str> {
    let (_, title) = meta.rsplit_once(',')?;
    let title = title.trim();
    (!title.is_empty()).then_some(title)
}

/// Value of `key="..."`, if present and not blank.
fn attribute<'a>(meta: &'a str, key: &str) -> Option<&'a str> {
    let needle = format!("{key}=\"");
    let start = meta.find(&needle)? + needle.len();
    let rest = &meta[start..];
    let value = &rest[..rest.find('"')?];
    let value = value.trim();
    (!value.is_empty()).then_some(value)
}
