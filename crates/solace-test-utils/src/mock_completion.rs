// SPDX-FileCopyrightText: 2026 Solace Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock completion provider for deterministic testing.

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;

use solace_core::types::{AdapterType, HealthStatus, HistoryEntry};
use solace_core::{CompletionProvider, PluginAdapter, SolaceError};

/// Arguments of one `complete` call.
#[derive(Debug, Clone)]
pub struct CompletionCall {
    pub message: String,
    pub prompt: String,
    pub history: Vec<HistoryEntry>,
}

/// A completion provider that returns pre-configured responses.
///
/// Responses are popped from a FIFO queue. When the queue is empty,
/// a default "mock response" text is returned. Every call is recorded.
pub struct MockCompletion {
    responses: Arc<Mutex<VecDeque<String>>>,
    calls: Arc<Mutex<Vec<CompletionCall>>>,
    fail: bool,
    latency: Duration,
    in_flight: Arc<AtomicUsize>,
    peak: Arc<AtomicUsize>,
}

impl MockCompletion {
    /// Create a new mock provider with an empty response queue.
    pub fn new() -> Self {
        Self::with_responses(Vec::new())
    }

    /// Create a mock provider pre-loaded with the given responses.
    pub fn with_responses(responses: Vec<String>) -> Self {
        Self {
            responses: Arc::new(Mutex::new(VecDeque::from(responses))),
            calls: Arc::new(Mutex::new(Vec::new())),
            fail: false,
            latency: Duration::ZERO,
            in_flight: Arc::new(AtomicUsize::new(0)),
            peak: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Hold every call open for `latency` before answering, so overlapping
    /// calls become observable through [`MockCompletion::peak_concurrency`].
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Most calls that were in progress at the same time.
    pub fn peak_concurrency(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }

    /// A provider whose every call fails with a provider error.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new()
        }
    }

    /// Add a response to the end of the queue.
    pub async fn add_response(&self, text: impl Into<String>) {
        self.responses.lock().await.push_back(text.into());
    }

    /// Calls received so far, in order.
    pub async fn calls(&self) -> Vec<CompletionCall> {
        self.calls.lock().await.clone()
    }

    async fn next_response(&self) -> String {
        self.responses
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| "mock response".to_string())
    }
}

impl Default for MockCompletion {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PluginAdapter for MockCompletion {
    fn name(&self) -> &str {
        "mock-completion"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Completion
    }

    async fn health_check(&self) -> Result<HealthStatus, SolaceError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), SolaceError> {
        Ok(())
    }
}

#[async_trait]
impl CompletionProvider for MockCompletion {
    async fn complete(
        &self,
        message: &str,
        prompt: &str,
        history: &[HistoryEntry],
    ) -> Result<String, SolaceError> {
        self.calls.lock().await.push(CompletionCall {
            message: message.to_string(),
            prompt: prompt.to_string(),
            history: history.to_vec(),
        });

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if self.fail {
            return Err(SolaceError::Provider {
                message: "mock completion failure".into(),
                source: None,
            });
        }
        Ok(self.next_response().await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn default_response_when_queue_empty() {
        let provider = MockCompletion::new();
        let text = provider.complete("hi", "prompt", &[]).await.unwrap();
        assert_eq!(text, "mock response");
    }

    #[tokio::test]
    async fn queued_responses_returned_in_order() {
        let provider = MockCompletion::with_responses(vec!["first".into(), "second".into()]);
        assert_eq!(provider.complete("a", "p", &[]).await.unwrap(), "first");
        assert_eq!(provider.complete("b", "p", &[]).await.unwrap(), "second");
        assert_eq!(provider.complete("c", "p", &[]).await.unwrap(), "mock response");
    }

    #[tokio::test]
    async fn overlapping_calls_raise_peak() {
        let provider = MockCompletion::new().with_latency(Duration::from_millis(20));
        let (a, b) = tokio::join!(
            provider.complete("a", "p", &[]),
            provider.complete("b", "p", &[])
        );
        assert!(a.is_ok() && b.is_ok());
        assert_eq!(provider.peak_concurrency(), 2);

        provider.complete("c", "p", &[]).await.unwrap();
        assert_eq!(provider.peak_concurrency(), 2);
    }

    #[tokio::test]
    async fn records_calls_even_when_failing() {
        let provider = MockCompletion::failing();
        assert!(provider.complete("hello", "p", &[]).await.is_err());
        let calls = provider.calls().await;
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].message, "hello");
    }
}
