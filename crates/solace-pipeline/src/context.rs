// SPDX-FileCopyrightText: 2026 Solace Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shared collaborators handed to every pipeline stage.
//!
//! Everything is constructed once by the caller (the `serve` command or a
//! test harness) and passed in. Stages never reach for globals.

use std::sync::Arc;

use solace_config::SolaceConfig;
use solace_config::model::MemoryConfig;
use solace_core::types::{Message, SystemAccount, UserId};
use solace_core::{
    CompletionProvider, ConversationRepository, CreditLedger, EmotionAnalyzer,
    EmotionRepository, MessageRepository, SmsTransport, SolaceError, UserRepository, WorkQueue,
};
use solace_memory::MemoryRetriever;
use tracing::{debug, warn};

use crate::conversation::ConversationLifecycle;
use crate::outbound::OutboundSender;
use crate::prompt::PromptBuilder;

/// Emotion analysis plus the place its scores are stored.
#[derive(Clone)]
pub struct EmotionSink {
    analyzer: Arc<dyn EmotionAnalyzer>,
    scores: Arc<dyn EmotionRepository>,
}

impl EmotionSink {
    pub fn new(analyzer: Arc<dyn EmotionAnalyzer>, scores: Arc<dyn EmotionRepository>) -> Self {
        Self { analyzer, scores }
    }

    /// Analyze and store scores for `message`.
    pub async fn record(&self, user_id: UserId, message: &Message) -> Result<(), SolaceError> {
        let scores = self.analyzer.analyze(&message.body).await?;
        self.scores.save_scores(user_id, message.id, &scores).await?;
        debug!(
            message_id = %message.id,
            compound = scores.vader.compound,
            "emotion scores stored"
        );
        Ok(())
    }

    /// Like [`EmotionSink::record`], but failures only produce a warning.
    pub async fn record_best_effort(&self, user_id: UserId, message: &Message) {
        if let Err(e) = self.record(user_id, message).await {
            warn!(
                message_id = %message.id,
                user_id = %user_id,
                error = %e,
                "emotion analysis failed"
            );
        }
    }
}

/// Collaborators and settings shared by ingestion, generation, reconciliation,
/// and the nudge scheduler.
#[derive(Clone)]
pub struct PipelineContext {
    pub users: Arc<dyn UserRepository>,
    pub conversations: ConversationLifecycle,
    pub messages: Arc<dyn MessageRepository>,
    pub queue: Arc<dyn WorkQueue>,
    pub ledger: Arc<dyn CreditLedger>,
    pub completion: Arc<dyn CompletionProvider>,
    pub outbound: OutboundSender,
    pub emotion: Option<EmotionSink>,
    pub memory: MemoryRetriever,
    pub prompts: PromptBuilder,
    pub system: SystemAccount,
    pub memory_config: MemoryConfig,
    pub queue_name: String,
}

impl PipelineContext {
    /// Wire a context from one storage backend that implements every
    /// repository trait.
    pub fn from_storage<S>(
        storage: Arc<S>,
        completion: Arc<dyn CompletionProvider>,
        transport: Arc<dyn SmsTransport>,
        config: &SolaceConfig,
    ) -> Result<Self, SolaceError>
    where
        S: UserRepository
            + ConversationRepository
            + MessageRepository
            + WorkQueue
            + CreditLedger
            + EmotionRepository
            + 'static,
    {
        let system = SystemAccount {
            user_id: UserId(config.system.user_id),
            phone_number: config.system.phone_number.clone(),
        };
        let messages: Arc<dyn MessageRepository> = storage.clone();

        Ok(Self {
            users: storage.clone(),
            conversations: ConversationLifecycle::new(storage.clone()),
            messages: messages.clone(),
            queue: storage.clone(),
            ledger: storage,
            completion,
            outbound: OutboundSender::new(messages.clone(), transport, system.clone()),
            emotion: None,
            memory: MemoryRetriever::new(messages),
            prompts: PromptBuilder::new(config.agent.name.clone(), &config.agent.timezone)?,
            system,
            memory_config: config.memory.clone(),
            queue_name: config.queue.name.clone(),
        })
    }

    /// Enable emotion analysis of inbound messages.
    pub fn with_emotion(mut self, sink: EmotionSink) -> Self {
        self.emotion = Some(sink);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use solace_core::MessageStatus;
    use solace_core::types::{ConversationId, MessageId, MessageType};
    use solace_test_utils::{MockEmotion, TestStorage};
    use tracing_test::traced_test;

    fn inbound() -> Message {
        Message {
            id: MessageId(7),
            conversation_id: ConversationId(3),
            from_user_id: UserId(2),
            to_user_id: UserId(1),
            body: "rough day".into(),
            message_type: MessageType::Sms,
            status: MessageStatus::Received,
            reference_id: Some("SMin7".into()),
            sent_at: None,
            received_at: Some(Utc::now()),
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    #[traced_test]
    async fn best_effort_recording_only_warns() {
        let store = TestStorage::new().await.unwrap();
        let analyzer = Arc::new(MockEmotion::failing());
        let sink = EmotionSink::new(analyzer.clone(), store.storage.clone());

        assert!(sink.record(UserId(2), &inbound()).await.is_err());
        sink.record_best_effort(UserId(2), &inbound()).await;

        assert_eq!(analyzer.calls(), 2);
        assert!(logs_contain("emotion analysis failed"));
        assert!(logs_contain("message_id=7"));
    }
}
