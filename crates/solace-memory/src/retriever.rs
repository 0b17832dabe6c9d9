// SPDX-FileCopyrightText: 2026 Solace Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Memory retrieval: recent window plus a random sample of older messages.

use std::fmt::Write;
use std::sync::Arc;

use solace_core::types::{Author, Message, SystemAccount, UserId};
use solace_core::{MessageRepository, SolaceError};
use tracing::debug;

use crate::window::MemoryWindow;

/// Builds memory windows from the message repository.
#[derive(Clone)]
pub struct MemoryRetriever {
    messages: Arc<dyn MessageRepository>,
}

impl MemoryRetriever {
    pub fn new(messages: Arc<dyn MessageRepository>) -> Self {
        Self { messages }
    }

    /// Messages to replay for `user`, oldest first.
    ///
    /// Never returns more than `window.capacity()` entries. Every sampled
    /// message is strictly older than the oldest recent one, so the result is
    /// free of duplicates and ordered by `created_at`. Repository errors are
    /// returned as-is.
    pub async fn get_memories(
        &self,
        user: UserId,
        window: MemoryWindow,
    ) -> Result<Vec<Message>, SolaceError> {
        let recent = if window.recent_limit > 0 {
            self.messages
                .recent_messages(user, window.recent_limit)
                .await?
        } else {
            Vec::new()
        };

        // No recent messages means no history at all.
        if window.recent_limit > 0 && recent.is_empty() {
            return Ok(Vec::new());
        }

        let historical = if window.historical_limit > 0 {
            self.messages
                .sample_older_messages(
                    user,
                    recent.last(),
                    window.historical_limit,
                    window.authored_only,
                )
                .await?
        } else {
            Vec::new()
        };

        let mut memories = recent;
        memories.extend(historical);
        memories.reverse();

        debug!(
            user_id = %user,
            count = memories.len(),
            recent_limit = window.recent_limit,
            historical_limit = window.historical_limit,
            "memories retrieved"
        );
        Ok(memories)
    }
}

/// One `[timestamp] author: body` line per message.
pub fn render_transcript(messages: &[Message], system: &SystemAccount) -> String {
    let mut out = String::new();
    for message in messages {
        let entry = message.to_history(system);
        let author = match entry.author {
            Author::Agent => "agent",
            Author::User => "user",
        };
        let _ = writeln!(
            out,
            "[{}] {author}: {}",
            entry.timestamp.format("%Y-%m-%d %H:%M"),
            entry.body
        );
    }
    out
}
