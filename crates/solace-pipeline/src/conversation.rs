// SPDX-FileCopyrightText: 2026 Solace Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Open/closed lifecycle of conversations.

use std::sync::Arc;

use chrono::Utc;
use solace_core::types::{Conversation, ConversationId, UserId};
use solace_core::{ConversationRepository, SolaceError};
use tracing::debug;

/// Opens and closes conversations. A closed conversation is never reopened.
#[derive(Clone)]
pub struct ConversationLifecycle {
    conversations: Arc<dyn ConversationRepository>,
}

impl ConversationLifecycle {
    pub fn new(conversations: Arc<dyn ConversationRepository>) -> Self {
        Self { conversations }
    }

    /// Start a new conversation owned by `user_id`.
    pub async fn open(&self, user_id: UserId) -> Result<Conversation, SolaceError> {
        let conversation = self
            .conversations
            .create_conversation(user_id, Utc::now())
            .await?;
        debug!(
            conversation_id = %conversation.id,
            user_id = %user_id,
            "conversation opened"
        );
        Ok(conversation)
    }

    /// Stamp `end_time = now`.
    ///
    /// Closing twice overwrites the end time; an unknown id is `NotFound`.
    pub async fn close(&self, id: ConversationId) -> Result<(), SolaceError> {
        self.conversations.end_conversation(id, Utc::now()).await?;
        debug!(conversation_id = %id, "conversation closed");
        Ok(())
    }

    /// Fetch a conversation that must exist.
    pub async fn get(&self, id: ConversationId) -> Result<Conversation, SolaceError> {
        self.conversations
            .get_conversation(id)
            .await?
            .ok_or_else(|| SolaceError::not_found("conversation", id))
    }
}
