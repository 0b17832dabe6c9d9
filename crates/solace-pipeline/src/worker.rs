// SPDX-FileCopyrightText: 2026 Solace Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Queue consumer driving the generation stage.

use std::sync::Arc;
use std::time::Duration;

use solace_core::{SolaceError, WorkQueue};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::generation::Generation;

/// Pulls envelopes off the generation queue one at a time.
///
/// Transient failures hand the entry back to the queue, which retries it
/// until its attempts run out. Everything else is acknowledged so a poison
/// entry cannot stall the queue.
pub struct QueueWorker {
    queue: Arc<dyn WorkQueue>,
    queue_name: String,
    generation: Generation,
    poll_interval: Duration,
}

impl QueueWorker {
    pub fn new(
        queue: Arc<dyn WorkQueue>,
        queue_name: impl Into<String>,
        generation: Generation,
        poll_interval: Duration,
    ) -> Self {
        Self {
            queue,
            queue_name: queue_name.into(),
            generation,
            poll_interval,
        }
    }

    /// Process at most one entry. Returns `false` when the queue was empty.
    pub async fn process_next(&self) -> Result<bool, SolaceError> {
        let Some(entry) = self.queue.dequeue(&self.queue_name).await? else {
            return Ok(false);
        };

        match self.generation.process(&entry.payload).await {
            Ok(outcome) => {
                debug!(entry_id = entry.id, outcome = ?outcome, "queue entry processed");
                self.queue.ack(entry.id).await?;
            }
            Err(e) if e.is_transient() => {
                warn!(
                    entry_id = entry.id,
                    attempts = entry.attempts,
                    error = %e,
                    "generation failed, entry will be retried"
                );
                self.queue.fail(entry.id).await?;
            }
            Err(e) => {
                warn!(entry_id = entry.id, error = %e, "generation rejected entry, dropping");
                self.queue.ack(entry.id).await?;
            }
        }
        Ok(true)
    }

    /// Drain the queue until cancelled, sleeping `poll_interval` whenever it
    /// is empty. The entry in progress when cancellation arrives finishes.
    pub async fn run(&self, cancel: CancellationToken) {
        info!(queue = %self.queue_name, "queue worker started");
        loop {
            if cancel.is_cancelled() {
                break;
            }

            let worked = match self.process_next().await {
                Ok(worked) => worked,
                Err(e) => {
                    error!(error = %e, "queue worker error");
                    false
                }
            };

            if !worked {
                tokio::select! {
                    _ = tokio::time::sleep(self.poll_interval) => {}
                    _ = cancel.cancelled() => break,
                }
            }
        }
        info!(queue = %self.queue_name, "queue worker shutting down");
    }
}
