// SPDX-FileCopyrightText: 2026 Solace Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Emotion analysis capability.

use async_trait::async_trait;

use crate::error::SolaceError;
use crate::traits::adapter::PluginAdapter;
use crate::types::EmotionScores;

/// Scores the emotional content of a piece of text.
#[async_trait]
pub trait EmotionAnalyzer: PluginAdapter {
    async fn analyze(&self, text: &str) -> Result<EmotionScores, SolaceError>;
}
