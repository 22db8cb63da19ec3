//! Fire-and-forget task queue for deferred cleanup work.
//!
//! The deletion endpoint must return without waiting for the (potentially
//! large) index purge, so admitted deletions are handed to a background
//! worker through this queue. Submitters observe no result and get no
//! ordering guarantee relative to their own synchronous work; the only
//! contract is that submission either enqueues the task or fails loudly.

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::mpsc;

#[derive(Debug, Error)]
pub enum QueueError {
    #[error("Task queue is not accepting work: {0}")]
    Closed(String),
}

pub type QueueResult<T> = Result<T, QueueError>;

/// Deferred cleanup of a deleted connector/credential pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CleanupTask {
    pub connector_id: i64,
    pub credential_id: i64,
}

#[async_trait]
pub trait TaskQueue: Send + Sync {
    /// Submit a task. Fire-and-forget: the caller never observes the
    /// task's outcome.
    async fn submit(&self, task: CleanupTask) -> QueueResult<()>;
}

/// In-process queue feeding the connector cleanup worker over a bounded
/// channel. A broker-backed implementation could replace this without
/// touching submitters.
pub struct ChannelTaskQueue {
    tx: mpsc::Sender<CleanupTask>,
}

impl ChannelTaskQueue {
    /// Create the queue and the receiving end for the worker.
    pub fn new(capacity: usize) -> (Self, mpsc::Receiver<CleanupTask>) {
        let (tx, rx) = mpsc::channel(capacity);
        (Self { tx }, rx)
    }
}

#[async_trait]
impl TaskQueue for ChannelTaskQueue {
    async fn submit(&self, task: CleanupTask) -> QueueResult<()> {
        self.tx
            .send(task)
            .await
            .map_err(|e| QueueError::Closed(e.to_string()))
    }
}
