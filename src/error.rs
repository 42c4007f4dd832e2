//! Error types for idfeed
//!
//! All public APIs return `Result<T, Error>` where Error is defined here.
//! Non-2xx responses from the identifiers endpoint are classified into the
//! typed variants below; transport and parse failures keep their source
//! error as the cause.

use thiserror::Error;

/// The main error type for idfeed
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Transport Errors
    // ============================================================================
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Failed to parse response body: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // ============================================================================
    // API Errors (classified from non-2xx status codes)
    // ============================================================================
    #[error("Invalid cursor (HTTP 400): {body}")]
    InvalidCursor { body: String },

    #[error("Cursor no longer valid (HTTP 410): {body}")]
    CursorExpired { body: String },

    #[error("Service temporarily unavailable (HTTP 503): {body}")]
    TemporarilyUnavailable { body: String },

    #[error("Unexpected HTTP {status}: {body}")]
    UnexpectedStatus { status: u16, body: String },

    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ============================================================================
    // I/O and Session Errors
    // ============================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Retrieval session panicked or was aborted")]
    SessionAborted,

    #[error("Queue disconnected: all consumers dropped")]
    QueueDisconnected,

    #[error("Retrieval cancelled before completion")]
    Cancelled,

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

impl Error {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Classify a non-2xx response status into a typed error.
    ///
    /// The body is kept verbatim for diagnostics.
    pub fn classify_status(status: u16, body: impl Into<String>) -> Self {
        let body = body.into();
        match status {
            400 => Self::InvalidCursor { body },
            410 => Self::CursorExpired { body },
            503 => Self::TemporarilyUnavailable { body },
            _ => Self::UnexpectedStatus { status, body },
        }
    }

    /// Check if this error is retryable under an opt-in retry policy.
    ///
    /// The default policy retries nothing; this only reports the
    /// classification. Cursor errors are never retryable: the same cursor
    /// would fail the same way.
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Transport(_) | Error::TemporarilyUnavailable { .. } => true,
            Error::UnexpectedStatus { status, .. } => matches!(status, 500 | 502 | 504),
            _ => false,
        }
    }

    /// Check if this error was caused by a bad or stale cursor
    pub fn is_cursor_error(&self) -> bool {
        matches!(
            self,
            Error::InvalidCursor { .. } | Error::CursorExpired { .. }
        )
    }
}

/// Result type alias for idfeed
pub type Result<T> = std::result::Result<T, Error>;
