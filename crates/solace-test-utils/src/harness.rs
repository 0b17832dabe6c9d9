// SPDX-FileCopyrightText: 2026 Solace Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness for end-to-end pipeline testing.
//!
//! `TestHarness` assembles the full pipeline with mock completion, transport,
//! and emotion adapters over a temp SQLite database. Helpers drive each stage
//! the way the webhook gateway and background workers would.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use solace_config::SolaceConfig;
use solace_config::model::MemoryConfig;
use solace_core::types::{InboundSms, Message, StatusCallback, User};
use solace_core::{MessageStatus, SolaceError};
use solace_pipeline::{
    EmotionSink, Generation, Ingestion, NudgeReport, NudgeScheduler, PipelineContext,
    QueueWorker, Reconciler,
};

use crate::mock_completion::MockCompletion;
use crate::mock_emotion::MockEmotion;
use crate::mock_transport::MockTransport;
use crate::storage::TestStorage;
use crate::SYSTEM_PHONE;

/// Builder for creating test environments with configurable options.
pub struct TestHarnessBuilder {
    responses: Vec<String>,
    completion: Option<MockCompletion>,
    failing_transport: bool,
    emotion: Option<MockEmotion>,
    memory: MemoryConfig,
    max_concurrency: usize,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        Self {
            responses: Vec::new(),
            completion: None,
            failing_transport: false,
            emotion: None,
            memory: MemoryConfig::default(),
            max_concurrency: 4,
        }
    }

    /// Set mock completion responses.
    pub fn with_mock_responses(mut self, responses: Vec<String>) -> Self {
        self.responses = responses;
        self
    }

    /// Use a specific completion mock (e.g. [`MockCompletion::failing`]).
    pub fn with_completion(mut self, completion: MockCompletion) -> Self {
        self.completion = Some(completion);
        self
    }

    /// Make every transport send fail.
    pub fn with_failing_transport(mut self) -> Self {
        self.failing_transport = true;
        self
    }

    /// Enable emotion analysis backed by `emotion`.
    pub fn with_emotion(mut self, emotion: MockEmotion) -> Self {
        self.emotion = Some(emotion);
        self
    }

    /// Override memory window sizes and thresholds.
    pub fn with_memory(mut self, memory: MemoryConfig) -> Self {
        self.memory = memory;
        self
    }

    /// Cap on concurrent nudge units.
    pub fn with_max_concurrency(mut self, max_concurrency: usize) -> Self {
        self.max_concurrency = max_concurrency;
        self
    }

    /// Build the harness, creating the database and wiring every stage.
    pub async fn build(self) -> Result<TestHarness, SolaceError> {
        let store = TestStorage::new().await?;

        let mut config = SolaceConfig::default();
        config.system.phone_number = SYSTEM_PHONE.to_string();
        config.memory = self.memory;
        config.nudge.max_concurrency = self.max_concurrency;

        let completion = Arc::new(
            self.completion
                .unwrap_or_else(|| MockCompletion::with_responses(self.responses)),
        );
        let transport = Arc::new(MockTransport::new());
        transport.set_failing(self.failing_transport);

        let mut ctx = PipelineContext::from_storage(
            store.storage.clone(),
            completion.clone(),
            transport.clone(),
            &config,
        )?;

        let emotion = self.emotion.map(Arc::new);
        if let Some(analyzer) = &emotion {
            ctx = ctx.with_emotion(EmotionSink::new(analyzer.clone(), store.storage.clone()));
        }

        let worker = QueueWorker::new(
            store.storage.clone(),
            config.queue.name.clone(),
            Generation::new(ctx.clone()),
            Duration::from_millis(10),
        );

        Ok(TestHarness {
            ingestion: Ingestion::new(ctx.clone()),
            reconciler: Reconciler::new(ctx.clone()),
            nudges: NudgeScheduler::new(ctx.clone(), config.nudge.max_concurrency),
            worker,
            ctx,
            completion,
            transport,
            emotion,
            config,
            store,
        })
    }
}

/// A complete test environment with mock adapters and temp storage.
pub struct TestHarness {
    /// Temp storage seeded with the system account (id 1).
    pub store: TestStorage,
    /// The mock completion provider.
    pub completion: Arc<MockCompletion>,
    /// The mock SMS transport.
    pub transport: Arc<MockTransport>,
    /// The mock emotion analyzer, when enabled.
    pub emotion: Option<Arc<MockEmotion>>,
    /// Configuration the pipeline was built from.
    pub config: SolaceConfig,
    /// Shared pipeline context.
    pub ctx: PipelineContext,
    pub ingestion: Ingestion,
    pub reconciler: Reconciler,
    pub nudges: NudgeScheduler,
    pub worker: QueueWorker,
}

impl TestHarness {
    /// Create a new builder for configuring the test harness.
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }

    /// Add an active, verified user with nudges enabled.
    pub async fn add_user(&self, first_name: &str, phone: &str) -> Result<User, SolaceError> {
        self.store.add_user(first_name, phone).await
    }

    /// Deliver an inbound SMS to the system number, as the inbound webhook would.
    pub async fn receive_sms(
        &self,
        from: &str,
        body: &str,
        reference_id: Option<&str>,
    ) -> Result<Message, SolaceError> {
        self.ingestion
            .receive(InboundSms {
                from: from.to_string(),
                to: SYSTEM_PHONE.to_string(),
                body: body.to_string(),
                reference_id: reference_id.map(str::to_string),
            })
            .await
    }

    /// Run the queue worker until the queue is empty. Returns how many
    /// entries were processed (retries count again).
    pub async fn drain_queue(&self) -> Result<usize, SolaceError> {
        let mut processed = 0;
        while self.worker.process_next().await? {
            processed += 1;
        }
        Ok(processed)
    }

    /// Post a status callback, as the status webhook would.
    pub async fn deliver_status(
        &self,
        reference_id: &str,
        status: &str,
    ) -> Result<MessageStatus, SolaceError> {
        self.reconciler
            .reconcile(StatusCallback {
                reference_id: reference_id.to_string(),
                status: status.to_string(),
            })
            .await
    }

    /// Run one nudge batch for users idle since `idle_since`.
    pub async fn run_nudges(&self, idle_since: DateTime<Utc>) -> Result<NudgeReport, SolaceError> {
        self.nudges.run_batch(idle_since).await
    }

    /// Run one nudge batch treating everyone without a message in the future
    /// as idle, which includes every user in a fresh database.
    pub async fn run_nudges_now(&self) -> Result<NudgeReport, SolaceError> {
        self.run_nudges(Utc::now() + chrono::Duration::seconds(1)).await
    }
}
