//! Retrieval session
//!
//! `RetrieverTask` is the producing half of a session: it fetches pages one
//! at a time, pushes every identifier into the bounded queue in server
//! order, and advances the cursor until the server stops returning one.
//!
//! The task moves through `Init → Fetching → (Fetching | Done | Failed)`.
//! The first fetch error is terminal: nothing is retried at this layer, no
//! page is skipped, and identifiers enqueued before the failure stay in the
//! queue. On either terminal state the task drops its producer half, which
//! closes the queue and lets consumers finish.

use crate::error::{Error, Result};
use crate::fetch::PageFetcher;
use crate::queue::{self, QueueConsumer, QueueProducer};
use crate::types::{Cursor, RetrievalStats};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Producer task that streams one paginated collection into a queue
pub struct RetrieverTask {
    fetcher: PageFetcher,
    queue: QueueProducer,
    cancel: Option<CancellationToken>,
}

impl RetrieverTask {
    /// Create a task writing into the given queue
    pub fn new(fetcher: PageFetcher, queue: QueueProducer) -> Self {
        Self {
            fetcher,
            queue,
            cancel: None,
        }
    }

    /// Attach a cancellation token, checked between pages.
    ///
    /// A fetch already in flight is never interrupted; without a token the
    /// task always runs to a terminal state.
    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Drive the session to a terminal state.
    ///
    /// Returns the session counters on success. On failure the original
    /// typed fetch error is returned unwrapped, and identifiers already
    /// enqueued remain in the queue.
    pub async fn run(self) -> Result<RetrievalStats> {
        let mut stats = RetrievalStats::default();
        let mut cursor: Option<Cursor> = None;

        loop {
            if let Some(token) = &self.cancel {
                if token.is_cancelled() {
                    warn!(
                        pages = stats.pages_fetched,
                        identifiers = stats.identifiers_enqueued,
                        "retrieval cancelled"
                    );
                    return Err(Error::Cancelled);
                }
            }

            let page = match self.fetcher.fetch_page(cursor.as_deref()).await {
                Ok(page) => page,
                Err(err) => {
                    warn!(
                        pages = stats.pages_fetched,
                        identifiers = stats.identifiers_enqueued,
                        error = %err,
                        "retrieval failed"
                    );
                    return Err(err);
                }
            };

            stats.add_page(page.items.len());
            debug!(
                page = stats.pages_fetched,
                items = page.items.len(),
                "enqueueing page"
            );

            // Backpressure: each put suspends while the queue is full
            for id in page.items {
                self.queue.put(id).await?;
            }

            match page.next {
                Some(next) => cursor = Some(next),
                None => {
                    info!(
                        pages = stats.pages_fetched,
                        identifiers = stats.identifiers_enqueued,
                        "retrieval complete"
                    );
                    return Ok(stats);
                }
            }
        }
    }

    /// Run the task on a dedicated worker.
    ///
    /// The queue closes when the task reaches a terminal state.
    pub fn spawn(self) -> RetrieverHandle {
        RetrieverHandle {
            handle: tokio::spawn(self.run()),
        }
    }
}

/// Completion handle for a spawned retrieval session
pub struct RetrieverHandle {
    handle: JoinHandle<Result<RetrievalStats>>,
}

impl RetrieverHandle {
    /// Await the session outcome, preserving the typed fetch error
    pub async fn join(self) -> Result<RetrievalStats> {
        self.handle.await.map_err(|_| Error::SessionAborted)?
    }

    /// Whether the session has reached a terminal state
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

/// Start a full session: a queue of `capacity` and a spawned producer.
///
/// Returns the completion handle and the consumer half of the queue.
pub fn start_session(fetcher: PageFetcher, capacity: usize) -> (RetrieverHandle, QueueConsumer) {
    let (producer, consumer) = queue::bounded(capacity);
    let handle = RetrieverTask::new(fetcher, producer).spawn();
    (handle, consumer)
}
