//! Endpoint liveness checks.
//!
//! A stream counts as live when it answers `200 OK` or `206 Partial Content`.
//! The cheap check is a `HEAD` request. Many streaming servers reject `HEAD`,
//! so any failure falls back to a `GET` whose body is never read: only the
//! status line and headers are awaited before the response is dropped.
//!
//! There is exactly one fallback and no retry within a run. The probe knows
//! nothing about the catalog cache.

use crate::{Error, Result};
use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use std::time::Duration;
use tracing::{debug, instrument};

/// Default timeout for each probe request (HEAD and fallback GET separately).
pub const PROBE_TIMEOUT: Duration = Duration::from_secs(15);

/// Maximum redirects followed per probe request.
const MAX_REDIRECTS: usize = 10;

/// Decides whether an endpoint is currently serving content.
#[async_trait]
pub trait LivenessProbe: Sync {
    /// Return `true` if `endpoint` is reachable right now.
    async fn is_live(&self, endpoint: &str) -> bool;
}

/// HEAD-then-GET probe over a shared HTTP client.
pub struct HttpProbe {
    client: Client,
}

impl HttpProbe {
    /// Create a probe with the default per-request timeout.
    pub fn new() -> Result<Self> {
        Self::with_timeout(PROBE_TIMEOUT)
    }

    /// Create a probe with a custom per-request timeout.
    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: build_probe_client(timeout)?,
        })
    }

    async fn head_ok(&self, endpoint: &str) -> bool {
        match self.client.head(endpoint).send().await {
            Ok(response) => is_serving(&response),
            Err(e) => {
                debug!("HEAD {} failed: {}", endpoint, e);
                false
            },
        }
    }

    async fn get_ok(&self, endpoint: &str) -> bool {
        // `send` resolves once headers arrive; dropping the response closes the
        // connection without downloading the stream.
        match self.client.get(endpoint).send().await {
            Ok(response) => is_serving(&response),
            Err(e) => {
                debug!("GET {} failed: {}", endpoint, e);
                false
            },
        }
    }
}

#[async_trait]
impl LivenessProbe for HttpProbe {
    #[instrument(skip(self), level = "debug")]
    async fn is_live(&self, endpoint: &str) -> bool {
        if self.head_ok(endpoint).await {
            return true;
        }
        let live = self.get_ok(endpoint).await;
        debug!(live, "fallback GET for {}", endpoint);
        live
    }
}

fn is_serving(response: &Response) -> bool {
    matches!(
        response.status(),
        StatusCode::OK | StatusCode::PARTIAL_CONTENT
    )
}

/// Build an HTTP client configured for probing.
fn build_probe_client(timeout: Duration) -> Result<Client> {
    Client::builder()
        .timeout(timeout)
        .user_agent(concat!("radiocat/", env!("CARGO_PKG_VERSION")))
        .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
        .build()
        .map_err(Error::Network)
}
