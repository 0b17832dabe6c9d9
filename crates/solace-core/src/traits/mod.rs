// SPDX-FileCopyrightText: 2026 Solace Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapter traits for the Solace SMS agent.
//!
//! Pipeline stages depend only on these traits; concrete adapters live in
//! their own crates and are wired together by the binary.

pub mod adapter;
pub mod analyzer;
pub mod provider;
pub mod storage;
pub mod transport;

pub use adapter::PluginAdapter;
pub use analyzer::EmotionAnalyzer;
pub use provider::CompletionProvider;
pub use storage::{
    ConversationRepository, CreditLedger, EmotionRepository, MessageRepository,
    StorageAdapter, UserRepository, WorkQueue,
};
pub use transport::{SignatureVerifier, SmsTransport};
