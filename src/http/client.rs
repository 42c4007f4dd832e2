//! Paced HTTP client
//!
//! Pure transport plus pacing: every request waits for its pacing slot, then
//! goes out as-is. Retries, status classification, and body parsing are the
//! caller's concern.

use super::pacing::Pacer;
use crate::error::Result;
use reqwest::{Client, Request, Response};
use std::time::Duration;
use tracing::debug;

/// Configuration for the paced HTTP client
#[derive(Debug, Clone)]
pub struct PacedHttpClientConfig {
    /// Base URL for all requests
    pub base_url: String,
    /// Maximum calls per second through this client
    pub calls_per_second: u32,
    /// Request timeout
    pub timeout: Duration,
    /// User agent string
    pub user_agent: String,
}

impl Default for PacedHttpClientConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            calls_per_second: 500,
            timeout: Duration::from_secs(30),
            user_agent: format!("idfeed/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl PacedHttpClientConfig {
    /// Create a new config builder
    pub fn builder() -> PacedHttpClientConfigBuilder {
        PacedHttpClientConfigBuilder::default()
    }
}

/// Builder for the paced HTTP client config
#[derive(Default)]
pub struct PacedHttpClientConfigBuilder {
    config: PacedHttpClientConfig,
}

impl PacedHttpClientConfigBuilder {
    /// Set the base URL
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = url.into();
        self
    }

    /// Set the maximum call rate
    pub fn calls_per_second(mut self, rate: u32) -> Self {
        self.config.calls_per_second = rate;
        self
    }

    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Set the user agent
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.config.user_agent = agent.into();
        self
    }

    /// Build the config
    pub fn build(self) -> PacedHttpClientConfig {
        self.config
    }
}

/// HTTP client that enforces a minimum inter-call interval.
///
/// Cloning is cheap and clones share the same pacing state, so one client
/// instance may serve several concurrent sessions without exceeding the
/// configured rate.
#[derive(Clone)]
pub struct PacedHttpClient {
    client: Client,
    config: PacedHttpClientConfig,
    pacer: Pacer,
}

impl PacedHttpClient {
    /// Create a client from a config
    pub fn with_config(config: PacedHttpClientConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()?;
        let pacer = Pacer::new(config.calls_per_second);

        Ok(Self {
            client,
            config,
            pacer,
        })
    }

    /// Create a client for a base URL with a maximum call rate
    pub fn new(base_url: impl Into<String>, calls_per_second: u32) -> Result<Self> {
        Self::with_config(
            PacedHttpClientConfig::builder()
                .base_url(base_url)
                .calls_per_second(calls_per_second)
                .build(),
        )
    }

    /// The configured base URL
    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    /// The pacer shared by all clones of this client
    pub fn pacer(&self) -> &Pacer {
        &self.pacer
    }

    /// Issue a GET request against `path`, paced.
    ///
    /// Query parameters are appended as given; an empty slice appends none.
    pub async fn get(&self, path: &str, query: &[(&str, &str)]) -> Result<Response> {
        let url = self.build_url(path);
        let mut builder = self.client.get(&url);
        if !query.is_empty() {
            builder = builder.query(query);
        }
        let request = builder.build()?;
        self.execute(request).await
    }

    /// Execute a prepared request, paced.
    ///
    /// Waits for the pacing slot, then sends. The response is returned
    /// regardless of status code.
    pub async fn execute(&self, request: Request) -> Result<Response> {
        self.pacer.wait().await;
        debug!(method = %request.method(), url = %request.url(), "issuing request");
        let response = self.client.execute(request).await?;
        Ok(response)
    }

    /// Build full URL from path
    fn build_url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }

        let base = self.config.base_url.trim_end_matches('/');
        let path = path.trim_start_matches('/');
        format!("{base}/{path}")
    }
}

impl std::fmt::Debug for PacedHttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PacedHttpClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
