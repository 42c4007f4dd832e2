//! Paced HTTP transport
//!
//! A thin HTTP client that enforces a minimum inter-call interval before
//! every outbound request. It does not retry and does not interpret status
//! codes; classification happens in the fetch layer.

mod client;
mod pacing;

pub use client::{PacedHttpClient, PacedHttpClientConfig, PacedHttpClientConfigBuilder};
pub use pacing::Pacer;
