#![allow(clippy::must_use_candidate)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::needless_pass_by_value)]

//! # idfeed
//!
//! Streams a server-paginated collection of identifiers from a REST API
//! into a bounded in-memory queue for concurrent consumption, while
//! respecting a configured maximum call rate and classifying failures.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use idfeed::fetch::PageFetcher;
//! use idfeed::http::PacedHttpClient;
//! use idfeed::retriever::start_session;
//!
//! #[tokio::main]
//! async fn main() -> idfeed::Result<()> {
//!     let client = PacedHttpClient::new("https://broker.example.com", 500)?;
//!     let fetcher = PageFetcher::new(client);
//!
//!     let (handle, consumer) = start_session(fetcher, 1024);
//!     while let Some(id) = consumer.recv().await {
//!         println!("{id}");
//!     }
//!     let stats = handle.join().await?;
//!     eprintln!("fetched {} identifiers", stats.identifiers_enqueued);
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! server ──▶ PageFetcher ──▶ RetrieverTask ──▶ bounded queue ──▶ consumers
//!                │
//!            PacedHttpClient (minimum inter-call interval)
//! ```
//!
//! The producer suspends on a full queue (backpressure) and on pacer
//! admission; consumers suspend on an empty queue. The queue closes when
//! the producer reaches a terminal state, so "producer finished AND queue
//! empty" is a single observation on the consumer side.

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Common types and type aliases
pub mod types;

/// Paced HTTP transport
pub mod http;

/// Page fetching and error classification
pub mod fetch;

/// Bounded identifier queue
pub mod queue;

/// Retrieval session (producer task)
pub mod retriever;

/// Retrieval configuration
pub mod config;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use config::RetrieverConfig;
pub use error::{Error, Result};
pub use fetch::{Page, PageFetcher, RetryPolicy};
pub use http::{PacedHttpClient, Pacer};
pub use queue::{Polled, QueueConsumer, QueueProducer};
pub use retriever::{start_session, RetrieverHandle, RetrieverTask};
pub use types::{Cursor, Identifier, RetrievalStats};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
