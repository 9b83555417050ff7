use crate::{Error, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

/// Default timeout for playlist downloads.
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(20);

/// Anything that can hand the pipeline the text of a playlist URL.
#[async_trait]
pub trait DocumentSource {
    /// Retrieve the document at `url`.
    ///
    /// Any error is treated by the pipeline as a skipped source.
    async fn fetch_document(&self, url: &str) -> Result<String>;
}

/// HTTP client for fetching playlist documents
pub struct Fetcher {
    client: Client,
}

impl Fetcher {
    /// Creates a new fetcher with the default timeout
    pub fn new() -> Result<Self> {
        Self::with_timeout(DEFAULT_FETCH_TIMEOUT)
    }

    /// Creates a new fetcher with a custom request timeout
    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("radiocat/", env!("CARGO_PKG_VERSION")))
            .gzip(true)
            .brotli(true)
            .build()
            .map_err(Error::Network)?;
        Ok(Self { client })
    }

    /// Fetches a playlist, requiring a `200 OK` response
    pub async fn fetch(&self, url: &str) -> Result<String> {
        let parsed = validate_url(url)?;
        let response = self.client.get(parsed).send().await.map_err(|e| {
            if e.is_timeout() {
                Error::Timeout(format!("fetching '{url}'"))
            } else {
                Error::Network(e)
            }
        })?;
        let status = response.status();

        if status != StatusCode::OK {
            if status == StatusCode::NOT_FOUND {
                return Err(Error::NotFound(format!("Playlist not found at '{url}'")));
            }
            return Err(Error::UnexpectedStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let content = response.text().await?;
        info!("Fetched {} bytes from {}", content.len(), url);
        Ok(content)
    }
}

#[async_trait]
impl DocumentSource for Fetcher {
    async fn fetch_document(&self, url: &str) -> Result<String> {
        debug!("Fetching playlist {}", url);
        self.fetch(url).await
    }
}

/// Only absolute http(s) URLs are fetched.
pub(crate) fn validate_url(url: &str) -> Result<Url> {
    let parsed = Url::parse(url).map_err(|e| Error::InvalidUrl(format!("'{url}': {e}")))?;
    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        other => Err(Error::InvalidUrl(format!(
            "'{url}': unsupported scheme '{other}'"
        ))),
    }
}

// Note: Default is not implemented as Fetcher::new() can fail.
// Use Fetcher::new() directly and handle the Result.
