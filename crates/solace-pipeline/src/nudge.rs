// SPDX-FileCopyrightText: 2026 Solace Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Nudge scheduler: proactive check-ins with idle users.
//!
//! Each batch finds idle users and runs one unit of work per user on a pool
//! bounded by a semaphore. A failing unit is logged and counted; it never
//! aborts the batch.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use solace_core::SolaceError;
use solace_core::types::{HistoryEntry, User};
use solace_memory::MemoryWindow;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::context::PipelineContext;
use crate::outbound::Delivery;
use crate::prompt::PromptVariant;

/// Counts from one batch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NudgeReport {
    /// Users returned by the idle query.
    pub eligible: usize,
    /// Nudges accepted by the transport.
    pub sent: usize,
    /// Users passed over (nudges disabled, or the system account).
    pub skipped: usize,
    /// Units that errored or whose message the transport refused.
    pub failed: usize,
}

/// Periodic re-engagement of idle users.
#[derive(Clone)]
pub struct NudgeScheduler {
    ctx: PipelineContext,
    max_concurrency: usize,
}

impl NudgeScheduler {
    pub fn new(ctx: PipelineContext, max_concurrency: usize) -> Self {
        Self {
            ctx,
            max_concurrency: max_concurrency.max(1),
        }
    }

    /// Nudge every user with no messages since `idle_since`.
    pub async fn run_batch(&self, idle_since: DateTime<Utc>) -> Result<NudgeReport, SolaceError> {
        let candidates = self.ctx.users.idle_users(idle_since).await?;
        let mut report = NudgeReport {
            eligible: candidates.len(),
            ..NudgeReport::default()
        };

        let semaphore = Arc::new(Semaphore::new(self.max_concurrency));
        let mut units = JoinSet::new();

        for user in candidates {
            if self.ctx.system.is(user.id) || !user.nudge_enabled {
                debug!(user_id = %user.id, "nudge skipped");
                report.skipped += 1;
                continue;
            }

            let permit = semaphore
                .clone()
                .acquire_owned()
                .await
                .map_err(|e| SolaceError::Internal(format!("nudge pool closed: {e}")))?;
            let scheduler = self.clone();
            units.spawn(async move {
                let _permit = permit;
                let user_id = user.id;
                (user_id, scheduler.nudge_user(user).await)
            });
        }

        while let Some(joined) = units.join_next().await {
            match joined {
                Ok((_, Ok(true))) => report.sent += 1,
                Ok((user_id, Ok(false))) => {
                    debug!(user_id = %user_id, "nudge persisted but not sent");
                    report.failed += 1;
                }
                Ok((user_id, Err(e))) => {
                    warn!(user_id = %user_id, error = %e, "nudge failed");
                    report.failed += 1;
                }
                Err(e) => {
                    error!(error = %e, "nudge task panicked or was cancelled");
                    report.failed += 1;
                }
            }
        }

        info!(
            eligible = report.eligible,
            sent = report.sent,
            skipped = report.skipped,
            failed = report.failed,
            "nudge batch complete"
        );
        Ok(report)
    }

    /// One unit of work. Returns whether the transport accepted the nudge.
    async fn nudge_user(&self, user: User) -> Result<bool, SolaceError> {
        let memories = self
            .ctx
            .memory
            .get_memories(user.id, MemoryWindow::nudge(&self.ctx.memory_config))
            .await?;
        let authored = memories.iter().filter(|m| m.from_user_id == user.id).count();
        let variant = PromptVariant::for_count(authored, self.ctx.memory_config.nudge_threshold);
        let history: Vec<HistoryEntry> = memories
            .iter()
            .map(|m| m.to_history(&self.ctx.system))
            .collect();

        let prompt = self.ctx.prompts.nudge(variant, &user.first_name);
        let raw = self
            .ctx
            .completion
            .complete(&prompt, &prompt, &history)
            .await?;
        let text = self.ctx.completion.clean_text(&raw);
        if text.is_empty() {
            return Err(SolaceError::Provider {
                message: "completion was empty after cleaning".into(),
                source: None,
            });
        }

        let conversation = self.ctx.conversations.open(user.id).await?;
        let delivery = self.ctx.outbound.deliver(&conversation, &user, text).await;
        // Nudge conversations end as soon as the message is out.
        self.ctx.conversations.close(conversation.id).await?;

        let delivery = delivery?;
        debug!(
            user_id = %user.id,
            conversation_id = %conversation.id,
            variant = ?variant,
            authored,
            "nudge unit finished"
        );
        Ok(matches!(delivery, Delivery::Sent(_)))
    }

    /// Run a batch every `interval` with `idle_since = now - idle_for`, until
    /// cancelled. A batch in progress is allowed to finish.
    pub async fn run(&self, interval: Duration, idle_for: Duration, cancel: CancellationToken) {
        let idle_for = match chrono::Duration::from_std(idle_for) {
            Ok(d) => d,
            Err(e) => {
                error!(error = %e, "nudge idle window out of range, scheduler disabled");
                return;
            }
        };

        let mut ticker = tokio::time::interval(interval);
        // Skip the first immediate tick.
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    if let Err(e) = self.run_batch(Utc::now() - idle_for).await {
                        warn!(error = %e, "nudge batch failed");
                    }
                }
                _ = cancel.cancelled() => {
                    info!("nudge scheduler shutting down");
                    break;
                }
            }
        }
    }
}
