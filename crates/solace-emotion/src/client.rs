// SPDX-FileCopyrightText: 2026 Solace Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the sentiment service.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use solace_config::model::EmotionConfig;
use solace_core::types::{AdapterType, EmotionScores, HealthStatus, NrcScores, VaderScores};
use solace_core::{EmotionAnalyzer, PluginAdapter, SolaceError};
use tracing::{debug, warn};

use crate::retry::{RetryPolicy, should_retry_status};

/// Successful analysis response.
#[derive(Debug, Clone, Deserialize)]
pub struct SentimentResponse {
    #[serde(default)]
    pub text: String,
    pub emotion_scores: NrcScores,
    pub vader_emotion_scores: VaderScores,
}

impl SentimentResponse {
    pub fn into_scores(self) -> EmotionScores {
        EmotionScores {
            nrc: self.emotion_scores,
            vader: self.vader_emotion_scores,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: String,
}

/// Sentiment service client with capped exponential backoff.
#[derive(Debug, Clone)]
pub struct EmotionClient {
    client: reqwest::Client,
    url: String,
    policy: RetryPolicy,
}

impl EmotionClient {
    pub fn new(config: &EmotionConfig) -> Result<Self, SolaceError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| SolaceError::Provider {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            url: format!("{}/sentiment", config.base_url.trim_end_matches('/')),
            policy: RetryPolicy::from_config(config),
        })
    }

    /// Analyze `text`.
    ///
    /// Transport errors and retryable statuses are retried per the policy;
    /// once retries run out the result is [`SolaceError::RetryExceeded`].
    /// Other error statuses fail immediately.
    pub async fn analyze_text(&self, text: &str) -> Result<SentimentResponse, SolaceError> {
        let mut last_error = String::new();
        let attempts = self.policy.max_retries + 1;

        for attempt in 0..attempts {
            if attempt > 0 {
                let delay = self.policy.backoff(attempt);
                warn!(
                    attempt,
                    delay_ms = delay.as_millis() as u64,
                    error = %last_error,
                    "retrying sentiment request"
                );
                tokio::time::sleep(delay).await;
            }

            let response = match self
                .client
                .post(&self.url)
                .form(&[("text", text)])
                .send()
                .await
            {
                Ok(response) => response,
                Err(e) => {
                    last_error = format!("request failed: {e}");
                    continue;
                }
            };

            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            debug!(status = %status, attempt, "sentiment response received");

            if status.is_success() {
                return serde_json::from_str(&body).map_err(|e| SolaceError::Provider {
                    message: format!("failed to parse sentiment response: {e}"),
                    source: Some(Box::new(e)),
                });
            }

            let detail = serde_json::from_str::<ErrorResponse>(&body)
                .map(|e| e.error)
                .unwrap_or(body);
            if should_retry_status(status.as_u16()) {
                last_error = format!("service returned {status}: {detail}");
                continue;
            }

            return Err(SolaceError::Provider {
                message: format!("sentiment service returned {status}: {detail}"),
                source: None,
            });
        }

        Err(SolaceError::RetryExceeded {
            attempts,
            last_error,
        })
    }
}

#[async_trait]
impl PluginAdapter for EmotionClient {
    fn name(&self) -> &str {
        "sentiment"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Analyzer
    }

    async fn health_check(&self) -> Result<HealthStatus, SolaceError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), SolaceError> {
        Ok(())
    }
}

#[async_trait]
impl EmotionAnalyzer for EmotionClient {
    async fn analyze(&self, text: &str) -> Result<EmotionScores, SolaceError> {
        Ok(self.analyze_text(text).await?.into_scores())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_string_contains, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(server: &MockServer) -> EmotionClient {
        EmotionClient::new(&EmotionConfig {
            enabled: true,
            base_url: server.uri(),
            initial_backoff_ms: 5,
            max_backoff_ms: 20,
            ..EmotionConfig::default()
        })
        .unwrap()
    }

    fn scores_body() -> serde_json::Value {
        serde_json::json!({
            "text": "I feel great",
            "emotion_scores": {"joy": 0.5, "positive": 0.5},
            "vader_emotion_scores": {"compound": 0.6249, "neg": 0.0, "neu": 0.328, "pos": 0.672}
        })
    }

    #[tokio::test]
    async fn analyze_posts_form_text() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/sentiment"))
            .and(body_string_contains("text=I+feel+great"))
            .respond_with(ResponseTemplate::new(200).set_body_json(scores_body()))
            .expect(1)
            .mount(&server)
            .await;

        let scores = client(&server).analyze("I feel great").await.unwrap();
        assert_eq!(scores.nrc.joy, 0.5);
        assert_eq!(scores.nrc.anger, 0.0);
        assert_eq!(scores.vader.compound, 0.6249);
    }

    #[tokio::test]
    async fn retries_three_times_then_gives_up() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503).set_body_json(serde_json::json!({
                "error": "warming up"
            })))
            .expect(4)
            .mount(&server)
            .await;

        let err = client(&server).analyze("hello").await.unwrap_err();
        match err {
            SolaceError::RetryExceeded {
                attempts,
                last_error,
            } => {
                assert_eq!(attempts, 4);
                assert!(last_error.contains("warming up"), "got: {last_error}");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn recovers_after_transient_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429))
            .up_to_n_times(2)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(scores_body()))
            .mount(&server)
            .await;

        assert!(client(&server).analyze("hello").await.is_ok());
    }

    #[tokio::test]
    async fn client_errors_are_not_retried() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
                "error": "text is required"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let err = client(&server).analyze("").await.unwrap_err();
        assert!(matches!(err, SolaceError::Provider { .. }));
        assert!(err.to_string().contains("text is required"));
    }
}
