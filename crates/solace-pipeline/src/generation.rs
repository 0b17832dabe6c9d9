// SPDX-FileCopyrightText: 2026 Solace Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Generation stage: turn a queued inbound message into a sent reply.

use chrono::Utc;
use solace_core::SolaceError;
use solace_core::types::{HistoryEntry, MessageId};
use solace_memory::MemoryWindow;
use tracing::{debug, info};

use crate::context::PipelineContext;
use crate::envelope::QueueEnvelope;
use crate::outbound::Delivery;
use crate::prompt::PromptVariant;

/// Result of processing one queue payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationOutcome {
    /// A reply was persisted and handed to the transport.
    Replied { reply_id: MessageId },
    /// A reply was persisted but the transport refused it.
    Unsent { reply_id: MessageId },
    /// The message came from the system account itself.
    SkippedSystemSender,
    /// The conversation already holds an agent reply (redelivered entry).
    SkippedDuplicate,
}

/// Consumes envelopes produced by ingestion.
#[derive(Clone)]
pub struct Generation {
    ctx: PipelineContext,
}

impl Generation {
    pub fn new(ctx: PipelineContext) -> Self {
        Self { ctx }
    }

    /// Generate and send the reply for one queue payload.
    pub async fn process(&self, payload: &str) -> Result<GenerationOutcome, SolaceError> {
        let inbound = QueueEnvelope::decode(payload)?;

        let sender = self
            .ctx
            .users
            .get_user(inbound.from_user_id)
            .await?
            .ok_or_else(|| SolaceError::not_found("user", inbound.from_user_id))?;

        if self.ctx.system.is(sender.id) {
            debug!(message_id = %inbound.id, "skipping message from system account");
            return Ok(GenerationOutcome::SkippedSystemSender);
        }

        let thread = self
            .ctx
            .messages
            .conversation_messages(inbound.conversation_id)
            .await?;
        if thread.iter().any(|m| self.ctx.system.is(m.from_user_id)) {
            debug!(
                message_id = %inbound.id,
                conversation_id = %inbound.conversation_id,
                "conversation already answered"
            );
            return Ok(GenerationOutcome::SkippedDuplicate);
        }

        let memories = self
            .ctx
            .memory
            .get_memories(sender.id, MemoryWindow::reply(&self.ctx.memory_config))
            .await?;
        let history: Vec<HistoryEntry> = memories
            .iter()
            .filter(|m| m.id != inbound.id)
            .map(|m| m.to_history(&self.ctx.system))
            .collect();

        let variant =
            PromptVariant::for_count(history.len(), self.ctx.memory_config.reply_threshold);
        let prompt = self
            .ctx
            .prompts
            .reply(variant, &sender.first_name, Utc::now());

        let raw = self
            .ctx
            .completion
            .complete(&inbound.body, &prompt, &history)
            .await?;
        let text = self.ctx.completion.clean_text(&raw);
        if text.is_empty() {
            return Err(SolaceError::Provider {
                message: "completion was empty after cleaning".into(),
                source: None,
            });
        }

        let conversation = self.ctx.conversations.get(inbound.conversation_id).await?;
        let delivery = self.ctx.outbound.deliver(&conversation, &sender, text).await?;

        if let Some(emotion) = &self.ctx.emotion {
            emotion.record_best_effort(sender.id, &inbound).await;
        }

        let reply_id = delivery.message().id;
        info!(
            message_id = %inbound.id,
            reply_id = %reply_id,
            user_id = %sender.id,
            history = history.len(),
            variant = ?variant,
            sent = delivery.is_sent(),
            "reply generated"
        );

        Ok(match delivery {
            Delivery::Sent(_) => GenerationOutcome::Replied { reply_id },
            Delivery::Unsent { .. } => GenerationOutcome::Unsent { reply_id },
        })
    }
}
