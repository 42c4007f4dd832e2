//! Page fetching
//!
//! `PageFetcher` issues one paced GET per page, parses the body into a
//! [`Page`], and classifies non-success responses into typed errors. It has
//! no side effects beyond the HTTP call itself: fetching the same cursor
//! against unchanged server state returns an equal page.

mod types;

pub use types::Page;

use crate::error::{Error, Result};
use crate::http::PacedHttpClient;
use std::time::Duration;
use tracing::{debug, warn};
use types::IdentifierList;

/// Default path of the identifiers endpoint
pub const DEFAULT_IDENTIFIERS_PATH: &str = "/api/v1/mqtt/clients";

/// Query parameter carrying the continuation cursor
const CURSOR_PARAM: &str = "cursor";

/// Retry policy for page fetches.
///
/// The default retries nothing, matching the base contract where the first
/// failure is fatal to the session. Callers may opt in to retrying errors
/// classified retryable (transport failures, 503) with a fixed backoff.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Additional attempts after the first failure
    pub max_retries: u32,
    /// Fixed delay between attempts
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::none()
    }
}

impl RetryPolicy {
    /// No retries: the first failure is surfaced as-is
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            backoff: Duration::ZERO,
        }
    }

    /// Retry retryable errors up to `max_retries` times with a fixed backoff
    pub fn fixed(max_retries: u32, backoff: Duration) -> Self {
        Self {
            max_retries,
            backoff,
        }
    }
}

/// Fetches pages of identifiers from the server
#[derive(Debug, Clone)]
pub struct PageFetcher {
    client: PacedHttpClient,
    path: String,
    retry: RetryPolicy,
}

impl PageFetcher {
    /// Create a fetcher for the default identifiers endpoint
    pub fn new(client: PacedHttpClient) -> Self {
        Self::with_path(client, DEFAULT_IDENTIFIERS_PATH)
    }

    /// Create a fetcher for a specific endpoint path
    pub fn with_path(client: PacedHttpClient, path: impl Into<String>) -> Self {
        Self {
            client,
            path: path.into(),
            retry: RetryPolicy::none(),
        }
    }

    /// Set the retry policy
    #[must_use]
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// The endpoint path this fetcher queries
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Fetch one page, starting from the beginning when `cursor` is `None`.
    ///
    /// Fails with a typed error on any non-2xx status or transport failure;
    /// under the default policy no retry is attempted.
    pub async fn fetch_page(&self, cursor: Option<&str>) -> Result<Page> {
        let mut attempt = 0;
        loop {
            match self.fetch_once(cursor).await {
                Ok(page) => return Ok(page),
                Err(err) if err.is_retryable() && attempt < self.retry.max_retries => {
                    attempt += 1;
                    warn!(
                        attempt,
                        max_retries = self.retry.max_retries,
                        error = %err,
                        "page fetch failed, retrying"
                    );
                    tokio::time::sleep(self.retry.backoff).await;
                }
                Err(err) => return Err(err),
            }
        }
    }

    async fn fetch_once(&self, cursor: Option<&str>) -> Result<Page> {
        // The cursor parameter is omitted entirely when absent
        let query: Vec<(&str, &str)> = match cursor {
            Some(token) => vec![(CURSOR_PARAM, token)],
            None => Vec::new(),
        };

        let response = self.client.get(&self.path, &query).await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::classify_status(status.as_u16(), body));
        }

        let body = response.text().await?;
        let list: IdentifierList = serde_json::from_str(&body)?;
        let page = Page::from(list);

        debug!(
            items = page.items.len(),
            has_next = !page.is_last(),
            "fetched page"
        );

        Ok(page)
    }
}
