// SPDX-FileCopyrightText: 2026 Solace Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Completion provider capability.

use async_trait::async_trait;

use crate::error::SolaceError;
use crate::text::clean_completion_text;
use crate::traits::adapter::PluginAdapter;
use crate::types::HistoryEntry;

/// Produces the agent's next text message.
#[async_trait]
pub trait CompletionProvider: PluginAdapter {
    /// Generate a reply to `message`, conditioned on `prompt` and prior `history`
    /// (chronological, oldest first).
    async fn complete(
        &self,
        message: &str,
        prompt: &str,
        history: &[HistoryEntry],
    ) -> Result<String, SolaceError>;

    /// Normalize raw completion output for SMS delivery.
    fn clean_text(&self, text: &str) -> String {
        clean_completion_text(text, false)
    }
}
