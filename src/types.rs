//! Common types used throughout idfeed
//!
//! Shared type aliases and small value types used across multiple modules.

use serde::{Deserialize, Serialize};

// ============================================================================
// Type Aliases
// ============================================================================

/// An opaque identifier retrieved from the server.
///
/// Equality is exact string equality; the value may contain arbitrary Unicode.
pub type Identifier = String;

/// An opaque continuation token returned by the server.
///
/// Cursors are never inspected or compared by the client, only passed back
/// unmodified on the next request.
pub type Cursor = String;

// ============================================================================
// Retrieval Statistics
// ============================================================================

/// Counters for one completed retrieval session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetrievalStats {
    /// Number of pages successfully fetched
    pub pages_fetched: u64,
    /// Number of identifiers enqueued
    pub identifiers_enqueued: u64,
}

impl RetrievalStats {
    /// Record one successfully fetched page of the given size
    pub fn add_page(&mut self, items: usize) {
        self.pages_fetched += 1;
        self.identifiers_enqueued += items as u64;
    }
}
