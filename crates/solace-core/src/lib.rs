// SPDX-FileCopyrightText: 2026 Solace Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Solace SMS agent.
//!
//! This crate provides the error taxonomy, domain types, message status
//! lifecycle, and the adapter traits that every pipeline stage depends on.
//! Concrete adapters (SQLite, Anthropic, Twilio) implement traits defined here.

pub mod error;
pub mod phone;
pub mod status;
pub mod text;
pub mod traits;
pub mod types;

pub use error::{ErrorKind, SolaceError};
pub use status::{MessageStatus, StatusEffect};
pub use types::{
    AdapterType, Conversation, ConversationId, ConversationState, HealthStatus, Message,
    MessageId, SystemAccount, User, UserId,
};

pub use traits::{
    CompletionProvider, ConversationRepository, CreditLedger, EmotionAnalyzer,
    EmotionRepository, MessageRepository, PluginAdapter, SignatureVerifier, SmsTransport,
    StorageAdapter, UserRepository, WorkQueue,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adapter_type_round_trips_through_display() {
        use std::str::FromStr;

        for variant in [
            AdapterType::Storage,
            AdapterType::Completion,
            AdapterType::Transport,
            AdapterType::Analyzer,
        ] {
            let parsed = AdapterType::from_str(&variant.to_string()).expect("should parse back");
            assert_eq!(variant, parsed);
        }
    }

    #[test]
    fn all_traits_are_exported() {
        fn _assert_plugin_adapter<T: PluginAdapter>() {}
        fn _assert_storage_adapter<T: StorageAdapter>() {}
        fn _assert_completion<T: CompletionProvider>() {}
        fn _assert_transport<T: SmsTransport>() {}
        fn _assert_analyzer<T: EmotionAnalyzer>() {}
        fn _assert_verifier<T: SignatureVerifier>() {}
        fn _assert_users<T: UserRepository>() {}
        fn _assert_conversations<T: ConversationRepository>() {}
        fn _assert_messages<T: MessageRepository>() {}
        fn _assert_ledger<T: CreditLedger>() {}
        fn _assert_emotions<T: EmotionRepository>() {}
        fn _assert_queue<T: WorkQueue>() {}
    }
}
