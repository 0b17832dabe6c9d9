// SPDX-FileCopyrightText: 2026 Solace Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Emotion analysis for inbound messages.
//!
//! Scores come from an external sentiment service returning NRC lexicon
//! emotions and VADER sentiment. Requests are retried with capped
//! exponential backoff.

pub mod client;
pub mod retry;

pub use client::{EmotionClient, SentimentResponse};
pub use retry::RetryPolicy;
