//! Bounded identifier queue
//!
//! A fixed-capacity FIFO between one producing retrieval session and any
//! number of consumers, built on `tokio::sync::mpsc`. Insertion suspends
//! while the queue is full (backpressure); removal is available both as an
//! awaiting `recv` and as a timed `poll`.
//!
//! Completion is signaled by closure, not by a sentinel value: when the
//! producer half is dropped the channel closes, and consumers observe
//! [`Polled::Closed`] (or `recv() == None`) exactly once the buffer is also
//! drained. "Producer finished AND queue empty" is therefore a single
//! atomic observation; a timed-out poll only ever means "nothing yet".

use crate::error::{Error, Result};
use crate::types::Identifier;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, Mutex};

/// Capacity used when none is configured.
///
/// The largest buffer tokio's channel accepts; nothing is preallocated, so
/// this behaves as "effectively unbounded".
pub const DEFAULT_CAPACITY: usize = usize::MAX >> 3;

/// Outcome of a timed poll
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Polled {
    /// An identifier was removed from the queue
    Item(Identifier),
    /// The timeout elapsed; the producer may still be running
    Empty,
    /// The producer has finished and the queue is drained
    Closed,
}

/// Monotonic insertion and removal counters.
///
/// The queue length is derived as `sent - received`. Keeping the two sides
/// monotonic means a consumer that observes an item before the producer's
/// bookkeeping runs can at worst under-report the length for an instant; a
/// single up/down counter could wrap below zero in that window.
#[derive(Debug, Default)]
struct QueueCounters {
    sent: AtomicUsize,
    received: AtomicUsize,
}

impl QueueCounters {
    fn len(&self) -> usize {
        self.sent
            .load(Ordering::SeqCst)
            .saturating_sub(self.received.load(Ordering::SeqCst))
    }
}

/// Create a bounded queue of the given capacity.
///
/// Capacity zero is clamped to one.
pub fn bounded(capacity: usize) -> (QueueProducer, QueueConsumer) {
    let (tx, rx) = mpsc::channel(capacity.max(1));
    let counters = Arc::new(QueueCounters::default());

    let producer = QueueProducer {
        tx,
        counters: Arc::clone(&counters),
    };
    let consumer = QueueConsumer {
        rx: Arc::new(Mutex::new(rx)),
        counters,
    };
    (producer, consumer)
}

/// The inserting half of the queue, owned by the retrieval session
#[derive(Debug, Clone)]
pub struct QueueProducer {
    tx: mpsc::Sender<Identifier>,
    counters: Arc<QueueCounters>,
}

impl QueueProducer {
    /// Insert an identifier, suspending while the queue is full.
    ///
    /// Fails only if every consumer has been dropped.
    pub async fn put(&self, id: Identifier) -> Result<()> {
        self.tx
            .send(id)
            .await
            .map_err(|_| Error::QueueDisconnected)?;
        self.counters.sent.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    /// Current number of queued identifiers
    pub fn len(&self) -> usize {
        self.counters.len()
    }

    /// Whether the queue is currently empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The configured capacity
    pub fn capacity(&self) -> usize {
        self.tx.max_capacity()
    }
}

/// The removing half of the queue.
///
/// Cloning yields another handle onto the same queue, so any number of
/// consumers may drain concurrently; each identifier is delivered to exactly
/// one of them.
#[derive(Debug, Clone)]
pub struct QueueConsumer {
    rx: Arc<Mutex<mpsc::Receiver<Identifier>>>,
    counters: Arc<QueueCounters>,
}

impl QueueConsumer {
    /// Await the next identifier.
    ///
    /// Returns `None` once the producer has finished and the queue is
    /// drained.
    pub async fn recv(&self) -> Option<Identifier> {
        let mut rx = self.rx.lock().await;
        let item = rx.recv().await;
        if item.is_some() {
            self.counters.received.fetch_add(1, Ordering::SeqCst);
        }
        item
    }

    /// Remove the next identifier, waiting up to `timeout`.
    ///
    /// [`Polled::Empty`] is a spurious outcome while the producer is still
    /// running; only [`Polled::Closed`] terminates consumption.
    ///
    /// The timeout covers the whole wait, including the time spent queued
    /// behind other consumers of the same queue.
    pub async fn poll(&self, timeout: Duration) -> Polled {
        let outcome = tokio::time::timeout(timeout, async {
            let mut rx = self.rx.lock().await;
            rx.recv().await
        })
        .await;

        match outcome {
            Ok(Some(item)) => {
                self.counters.received.fetch_add(1, Ordering::SeqCst);
                Polled::Item(item)
            }
            Ok(None) => Polled::Closed,
            Err(_) => Polled::Empty,
        }
    }

    /// Current number of queued identifiers
    pub fn len(&self) -> usize {
        self.counters.len()
    }

    /// Whether the queue is currently empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drain whatever remains into a vector, ending at closure.
    ///
    /// Intended for single-consumer callers that just want the full
    /// collection.
    pub async fn drain(&self) -> Vec<Identifier> {
        let mut out = Vec::new();
        while let Some(id) = self.recv().await {
            out.push(id);
        }
        out
    }
}
