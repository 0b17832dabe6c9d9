// SPDX-FileCopyrightText: 2026 Solace Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Inbound stage: validate, record, and enqueue for generation.

use chrono::Utc;
use solace_core::phone::normalize_e164;
use solace_core::types::{InboundSms, Message, MessageType, NewMessage};
use solace_core::{MessageStatus, SolaceError};
use tracing::{debug, error, info, warn};

use crate::context::PipelineContext;
use crate::envelope::QueueEnvelope;

/// Records inbound messages and hands them to the generation queue.
#[derive(Clone)]
pub struct Ingestion {
    ctx: PipelineContext,
}

impl Ingestion {
    pub fn new(ctx: PipelineContext) -> Self {
        Self { ctx }
    }

    /// Accept one inbound SMS.
    ///
    /// Opens a conversation, stores the message as `Received`, and enqueues
    /// it. A redelivered webhook whose transport id is already stored returns
    /// the stored message without enqueueing again. If the enqueue fails the
    /// message is marked `Failed` and its conversation closed before the
    /// error is returned.
    pub async fn receive(&self, inbound: InboundSms) -> Result<Message, SolaceError> {
        let from = validate(&inbound)?;

        let user = self
            .ctx
            .users
            .find_user_by_phone(&from)
            .await?
            .ok_or_else(|| SolaceError::not_found("user", &from))?;

        if let Some(reference_id) = inbound.reference_id.as_deref()
            && let Some(existing) = self.ctx.messages.find_by_reference(reference_id).await?
        {
            debug!(
                message_id = %existing.id,
                reference_id,
                "inbound message already recorded"
            );
            return Ok(existing);
        }

        let conversation = self.ctx.conversations.open(user.id).await?;
        let now = Utc::now();
        let created = self
            .ctx
            .messages
            .create_message(NewMessage {
                conversation_id: conversation.id,
                from_user_id: user.id,
                to_user_id: self.ctx.system.user_id,
                body: inbound.body,
                message_type: MessageType::Sms,
                status: MessageStatus::Received,
                reference_id: inbound.reference_id,
                sent_at: None,
                received_at: Some(now),
            })
            .await?;

        let mut message = self
            .ctx
            .messages
            .get_message(created.id)
            .await?
            .ok_or_else(|| SolaceError::not_found("message", created.id))?;

        if let Err(e) = self.enqueue(&message).await {
            error!(
                message_id = %message.id,
                conversation_id = %conversation.id,
                error = %e,
                "failed to enqueue inbound message"
            );
            message.status = MessageStatus::Failed;
            if let Err(update_err) = self.ctx.messages.update_message(&message).await {
                warn!(message_id = %message.id, error = %update_err, "failed to mark message failed");
            }
            if let Err(close_err) = self.ctx.conversations.close(conversation.id).await {
                warn!(conversation_id = %conversation.id, error = %close_err, "failed to close conversation");
            }
            return Err(e);
        }

        info!(
            message_id = %message.id,
            conversation_id = %conversation.id,
            user_id = %user.id,
            "inbound message recorded"
        );
        Ok(message)
    }

    async fn enqueue(&self, message: &Message) -> Result<i64, SolaceError> {
        let payload = QueueEnvelope::wrap(message)?.to_json()?;
        self.ctx.queue.enqueue(&self.ctx.queue_name, &payload).await
    }
}

/// Required fields present and a well-formed sender. Returns the normalized
/// sender number.
fn validate(inbound: &InboundSms) -> Result<String, SolaceError> {
    for (field, value) in [
        ("From", &inbound.from),
        ("To", &inbound.to),
        ("Body", &inbound.body),
    ] {
        if value.trim().is_empty() {
            return Err(SolaceError::Validation(format!("missing {field}")));
        }
    }
    normalize_e164(&inbound.from)
}
