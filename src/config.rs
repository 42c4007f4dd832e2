//! Retrieval configuration
//!
//! Caller-facing knobs for one retrieval setup: where the identifiers
//! endpoint lives, how fast it may be called, and how much the queue may
//! buffer. Deserializable from JSON for file-based configuration, with a
//! builder for programmatic use.

use crate::error::{Error, Result};
use crate::fetch::{RetryPolicy, DEFAULT_IDENTIFIERS_PATH};
use crate::queue::DEFAULT_CAPACITY;
use serde::Deserialize;
use std::time::Duration;
use url::Url;

/// Default maximum call rate against the server, calls per second
pub const DEFAULT_CALLS_PER_SECOND: u32 = 500;

/// Configuration for one retrieval setup
#[derive(Debug, Clone, Deserialize)]
pub struct RetrieverConfig {
    /// Base URL of the REST API
    pub base_url: String,

    /// Path of the identifiers endpoint
    #[serde(default = "default_path")]
    pub identifiers_path: String,

    /// Maximum calls per second through the paced client
    #[serde(default = "default_rate")]
    pub calls_per_second: u32,

    /// Queue capacity; the default is effectively unbounded
    #[serde(default = "default_capacity")]
    pub queue_capacity: usize,

    /// HTTP request timeout in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Additional fetch attempts for retryable errors (default: none)
    #[serde(default)]
    pub max_retries: u32,

    /// Backoff between retry attempts, in milliseconds
    #[serde(default)]
    pub retry_backoff_ms: u64,
}

fn default_path() -> String {
    DEFAULT_IDENTIFIERS_PATH.to_string()
}

fn default_rate() -> u32 {
    DEFAULT_CALLS_PER_SECOND
}

fn default_capacity() -> usize {
    DEFAULT_CAPACITY
}

fn default_timeout_ms() -> u64 {
    30_000
}

impl RetrieverConfig {
    /// Create a config for a base URL with all defaults
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            identifiers_path: default_path(),
            calls_per_second: default_rate(),
            queue_capacity: default_capacity(),
            timeout_ms: default_timeout_ms(),
            max_retries: 0,
            retry_backoff_ms: 0,
        }
    }

    /// Create a new config builder
    pub fn builder(base_url: impl Into<String>) -> RetrieverConfigBuilder {
        RetrieverConfigBuilder {
            config: Self::new(base_url),
        }
    }

    /// The HTTP request timeout
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// The retry policy derived from this config
    pub fn retry_policy(&self) -> RetryPolicy {
        if self.max_retries == 0 {
            RetryPolicy::none()
        } else {
            RetryPolicy::fixed(self.max_retries, Duration::from_millis(self.retry_backoff_ms))
        }
    }

    /// Validate the config, returning it for chaining
    pub fn validate(self) -> Result<Self> {
        Url::parse(&self.base_url)?;
        if self.calls_per_second == 0 {
            return Err(Error::config("calls_per_second must be at least 1"));
        }
        if self.queue_capacity == 0 {
            return Err(Error::config("queue_capacity must be at least 1"));
        }
        Ok(self)
    }
}

/// Builder for [`RetrieverConfig`]
pub struct RetrieverConfigBuilder {
    config: RetrieverConfig,
}

impl RetrieverConfigBuilder {
    /// Set the identifiers endpoint path
    pub fn identifiers_path(mut self, path: impl Into<String>) -> Self {
        self.config.identifiers_path = path.into();
        self
    }

    /// Set the maximum call rate
    pub fn calls_per_second(mut self, rate: u32) -> Self {
        self.config.calls_per_second = rate;
        self
    }

    /// Set the queue capacity
    pub fn queue_capacity(mut self, capacity: usize) -> Self {
        self.config.queue_capacity = capacity;
        self
    }

    /// Set the HTTP request timeout, kept at millisecond precision
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout_ms = timeout.as_millis() as u64;
        self
    }

    /// Set the retry policy
    pub fn retry(mut self, max_retries: u32, backoff: Duration) -> Self {
        self.config.max_retries = max_retries;
        self.config.retry_backoff_ms = backoff.as_millis() as u64;
        self
    }

    /// Validate and build the config
    pub fn build(self) -> Result<RetrieverConfig> {
        self.config.validate()
    }
}
