//! Cart Sync
//!
//! Serialises writes to the remote cart. At most one write is in flight at a
//! time; writes enqueued while one is running collapse to the newest, so the
//! remote cart always ends up matching the last local state.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, warn};

use super::{CartGateway, CartItem};
use crate::credential::Credential;

/// Result of the most recent completed remote write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    /// The remote cart matches the written state.
    Synced,

    /// The write failed; the message describes why.
    Failed(String),
}

/// Progress of remote writes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncStatus {
    /// Generation of the last enqueued write.
    pub enqueued: u64,

    /// Generation of the last completed write.
    pub completed: u64,

    /// Outcome of the last completed write, if any write has completed.
    pub outcome: Option<SyncOutcome>,
}

impl SyncStatus {
    /// Whether every enqueued write has been attempted.
    pub fn is_idle(&self) -> bool {
        self.completed >= self.enqueued
    }
}

#[derive(Debug, Clone)]
enum SyncCommand {
    Replace(Vec<CartItem>),
    Clear,
}

#[derive(Debug, Clone)]
struct SyncJob {
    generation: u64,
    credential: Credential,
    command: SyncCommand,
}

/// Single-flight, latest-wins queue of remote cart writes.
///
/// Requires a Tokio runtime: the worker task is spawned on creation and exits
/// once the queue is dropped and any pending write has been attempted.
#[derive(Debug)]
pub struct SyncQueue {
    jobs: watch::Sender<Option<SyncJob>>,
    status: watch::Receiver<SyncStatus>,
    generation: u64,
}

impl SyncQueue {
    /// Spawn the worker writing through `gateway`.
    pub fn spawn(gateway: Arc<dyn CartGateway>) -> Self {
        let (jobs, jobs_rx) = watch::channel(None);
        let (status_tx, status) = watch::channel(SyncStatus::default());

        tokio::spawn(run_worker(gateway, jobs_rx, status_tx));

        Self {
            jobs,
            status,
            generation: 0,
        }
    }

    /// Replace the remote cart for `credential` with `items`.
    pub fn enqueue_replace(&mut self, credential: &Credential, items: Vec<CartItem>) -> u64 {
        self.enqueue(credential, SyncCommand::Replace(items))
    }

    /// Empty the remote cart for `credential`.
    pub fn enqueue_clear(&mut self, credential: &Credential) -> u64 {
        self.enqueue(credential, SyncCommand::Clear)
    }

    /// Current progress.
    pub fn status(&self) -> SyncStatus {
        SyncStatus {
            enqueued: self.generation,
            ..self.status.borrow().clone()
        }
    }

    /// Wait until the last enqueued write has been attempted.
    pub async fn flush(&self) -> SyncStatus {
        let target = self.generation;
        let mut status = self.status.clone();

        if let Err(error) = status.wait_for(|status| status.completed >= target).await {
            warn!(%error, "cart sync worker stopped before flushing");
        }

        self.status()
    }

    fn enqueue(&mut self, credential: &Credential, command: SyncCommand) -> u64 {
        self.generation += 1;

        let job = SyncJob {
            generation: self.generation,
            credential: credential.clone(),
            command,
        };

        // Replacing an unsent job drops it; only the newest state matters.
        self.jobs.send_replace(Some(job));

        self.generation
    }
}

async fn run_worker(
    gateway: Arc<dyn CartGateway>,
    mut jobs: watch::Receiver<Option<SyncJob>>,
    status: watch::Sender<SyncStatus>,
) {
    while jobs.changed().await.is_ok() {
        let Some(job) = jobs.borrow_and_update().clone() else {
            continue;
        };

        let result = match &job.command {
            SyncCommand::Replace(items) => gateway.set_cart(&job.credential, items).await,
            SyncCommand::Clear => gateway.clear_cart(&job.credential).await,
        };

        let outcome = match result {
            Ok(()) => {
                debug!(generation = job.generation, "cart synced");

                SyncOutcome::Synced
            }
            Err(error) => {
                warn!(generation = job.generation, %error, "cart sync failed");

                SyncOutcome::Failed(error.to_string())
            }
        };

        status.send_modify(|status| {
            status.completed = job.generation;
            status.outcome = Some(outcome);
        });
    }
}
