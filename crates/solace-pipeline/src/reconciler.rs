// SPDX-FileCopyrightText: 2026 Solace Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Delivery status reconciliation.
//!
//! Status callbacks are joined to stored messages by transport reference id.
//! A terminal status closes the owning conversation; `Delivered` also charges
//! the recipient once.

use std::time::Duration;

use chrono::Utc;
use solace_core::types::{CreditDebit, Message, StatusCallback};
use solace_core::{MessageStatus, SolaceError, StatusEffect};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::context::PipelineContext;

/// Applies status callbacks and sweeps messages that never left.
#[derive(Clone)]
pub struct Reconciler {
    ctx: PipelineContext,
}

impl Reconciler {
    pub fn new(ctx: PipelineContext) -> Self {
        Self { ctx }
    }

    /// Apply one status callback. Returns the status the message ends up in.
    ///
    /// Side effects run before the status is written, so a callback whose
    /// charge or close failed is retried in full by the transport. Once the
    /// stored status is settled (`Delivered`, `Failed`, or `Read`) repeats
    /// and late intermediate statuses change nothing; `Read` may still follow
    /// `Delivered`.
    pub async fn reconcile(&self, callback: StatusCallback) -> Result<MessageStatus, SolaceError> {
        let mut message = self
            .ctx
            .messages
            .find_by_reference(&callback.reference_id)
            .await?
            .ok_or_else(|| SolaceError::not_found("message", &callback.reference_id))?;

        let status = MessageStatus::from_transport(&callback.status);
        if status == MessageStatus::Unknown {
            warn!(
                reference_id = %callback.reference_id,
                raw_status = %callback.status,
                "unrecognized transport status"
            );
        }

        let stored = message.status;
        let read_receipt = stored == MessageStatus::Delivered && status == MessageStatus::Read;
        if is_settled(stored) && !read_receipt {
            debug!(
                message_id = %message.id,
                stored = %stored,
                incoming = %status,
                "callback after settled status ignored"
            );
            return Ok(stored);
        }

        match status.effect() {
            StatusEffect::DeductAndClose => {
                self.charge(&message).await?;
                self.ctx.conversations.close(message.conversation_id).await?;
            }
            StatusEffect::Close => {
                self.ctx.conversations.close(message.conversation_id).await?;
            }
            StatusEffect::None => {}
        }

        message.status = status;
        self.ctx.messages.update_message(&message).await?;

        info!(
            message_id = %message.id,
            conversation_id = %message.conversation_id,
            reference_id = %callback.reference_id,
            status = %status,
            "delivery status reconciled"
        );
        Ok(status)
    }

    async fn charge(&self, message: &Message) -> Result<(), SolaceError> {
        let inserted = self
            .ctx
            .ledger
            .debit(CreditDebit {
                user_id: message.to_user_id,
                conversation_id: message.conversation_id,
                message_id: message.id,
                amount: message.message_type.bill_rate(),
            })
            .await?;
        if !inserted {
            debug!(message_id = %message.id, "message already charged");
        }
        Ok(())
    }

    /// Fail outbound messages stuck in `Sending` without a reference id for
    /// longer than `older_than`, closing their conversations.
    ///
    /// Returns how many messages were failed.
    pub async fn sweep_unsent(&self, older_than: Duration) -> Result<usize, SolaceError> {
        let age = chrono::Duration::from_std(older_than)
            .map_err(|e| SolaceError::Validation(format!("sweep age out of range: {e}")))?;
        let stale = self
            .ctx
            .messages
            .stale_unsent(self.ctx.system.user_id, Utc::now() - age)
            .await?;

        let mut swept = 0;
        for mut message in stale {
            message.status = MessageStatus::Failed;
            let result = async {
                self.ctx.messages.update_message(&message).await?;
                self.ctx.conversations.close(message.conversation_id).await
            }
            .await;
            match result {
                Ok(()) => swept += 1,
                Err(e) => warn!(message_id = %message.id, error = %e, "failed to sweep message"),
            }
        }

        if swept > 0 {
            info!(count = swept, "unsent messages failed");
        }
        Ok(swept)
    }

    /// Run [`Reconciler::sweep_unsent`] every `interval` until cancelled.
    pub async fn run_sweeper(
        &self,
        interval: Duration,
        older_than: Duration,
        cancel: CancellationToken,
    ) {
        let mut ticker = tokio::time::interval(interval);
        // Skip the first immediate tick.
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    if let Err(e) = self.sweep_unsent(older_than).await {
                        warn!(error = %e, "unsent sweep failed");
                    }
                }
                _ = cancel.cancelled() => {
                    info!("unsent sweeper shutting down");
                    break;
                }
            }
        }
    }
}

/// Statuses after which the delivery lifecycle is over.
fn is_settled(status: MessageStatus) -> bool {
    status.is_terminal() || status == MessageStatus::Read
}
