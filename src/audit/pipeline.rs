// Audit pipeline implementation

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{error, info, warn};

use super::types::AuditLogEntry;
use crate::config::AuditConfig;
use crate::storage::Store;

/// Producer handle for the audit pipeline. Cloning yields another
/// producer on the same queue; exactly one background consumer drains it.
///
/// Enqueueing never fails the calling operation: a closed or full queue
/// drops the event with a warning, and persistence errors stay inside the
/// consumer task.
#[derive(Clone)]
pub struct AuditPipeline {
    sender: AuditSender,
}

#[derive(Clone)]
enum AuditSender {
    Unbounded(mpsc::UnboundedSender<String>),
    Bounded(mpsc::Sender<String>),
}

impl AuditPipeline {
    /// Spawn the pipeline with an unbounded queue (the default policy).
    pub fn spawn(store: Arc<dyn Store>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        tokio::spawn(run_consumer(AuditReceiver::Unbounded(rx), store));

        Self {
            sender: AuditSender::Unbounded(tx),
        }
    }

    /// Spawn the pipeline with a bounded queue. Once the queue is full,
    /// further events are dropped rather than blocking producers.
    pub fn spawn_bounded(store: Arc<dyn Store>, capacity: usize) -> Self {
        let (tx, rx) = mpsc::channel(capacity);
        tokio::spawn(run_consumer(AuditReceiver::Bounded(rx), store));

        Self {
            sender: AuditSender::Bounded(tx),
        }
    }

    /// Spawn with the queue policy selected by configuration.
    pub fn from_config(store: Arc<dyn Store>, config: &AuditConfig) -> Self {
        match config.queue_capacity {
            Some(capacity) => Self::spawn_bounded(store, capacity),
            None => Self::spawn(store),
        }
    }

    /// Enqueue a free-text audit event. Non-blocking; the primary
    /// operation has already committed by the time this is called, so a
    /// failed enqueue must never surface to the caller.
    pub fn enqueue(&self, action: impl Into<String>) {
        let action = action.into();
        let result = match &self.sender {
            AuditSender::Unbounded(tx) => tx.send(action).map_err(|e| e.to_string()),
            AuditSender::Bounded(tx) => tx.try_send(action).map_err(|e| e.to_string()),
        };

        if let Err(e) = result {
            warn!("Dropping audit event: {}", e);
        }
    }
}

enum AuditReceiver {
    Unbounded(mpsc::UnboundedReceiver<String>),
    Bounded(mpsc::Receiver<String>),
}

impl AuditReceiver {
    async fn recv(&mut self) -> Option<String> {
        match self {
            AuditReceiver::Unbounded(rx) => rx.recv().await,
            AuditReceiver::Bounded(rx) => rx.recv().await,
        }
    }
}

/// Consumer loop: dequeue in FIFO order, stamp a fresh id and timestamp,
/// append to the store. Runs for the lifetime of the process; exits once
/// every producer handle is dropped and the queue is drained.
async fn run_consumer(mut queue: AuditReceiver, store: Arc<dyn Store>) {
    while let Some(action) = queue.recv().await {
        let entry = AuditLogEntry::record(action);
        if let Err(e) = store.append_audit_entry(&entry).await {
            // One lost entry must not halt the trail.
            error!("Failed to store audit entry '{}': {}", entry.action, e);
        }
    }

    info!("Audit pipeline consumer stopped");
}
