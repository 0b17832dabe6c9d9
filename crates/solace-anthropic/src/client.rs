// SPDX-FileCopyrightText: 2026 Solace Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Thin reqwest wrapper around the Messages endpoint.

use std::time::Duration;

use reqwest::StatusCode;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use solace_core::SolaceError;
use tracing::{debug, warn};

use crate::types::{CompletionRequest, CompletionResponse, ErrorEnvelope};

const MESSAGES_URL: &str = "https://api.anthropic.com/v1/messages";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// Statuses worth one more try: rate limited, server error, unavailable,
/// overloaded.
const RETRYABLE: [u16; 4] = [429, 500, 503, 529];

/// Outcome of one HTTP exchange.
enum Attempt {
    Done(CompletionResponse),
    Retryable(SolaceError),
}

fn provider_error(message: String, source: Option<reqwest::Error>) -> SolaceError {
    SolaceError::Provider {
        message,
        source: source.map(|e| Box::new(e) as _),
    }
}

#[derive(Debug, Clone)]
pub struct AnthropicClient {
    http: reqwest::Client,
    endpoint: String,
    retries: u32,
    backoff: Duration,
}

impl AnthropicClient {
    pub fn new(api_key: &str, api_version: &str) -> Result<Self, SolaceError> {
        let header = |name: &str, value: &str| {
            HeaderValue::from_str(value)
                .map_err(|e| SolaceError::Config(format!("anthropic {name} is not a valid header: {e}")))
        };
        let mut headers = HeaderMap::new();
        headers.insert("x-api-key", header("api_key", api_key)?);
        headers.insert("anthropic-version", header("api_version", api_version)?);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| provider_error(format!("cannot build anthropic client: {e}"), Some(e)))?;

        Ok(Self {
            http,
            endpoint: MESSAGES_URL.to_string(),
            retries: 1,
            backoff: Duration::from_secs(1),
        })
    }

    #[cfg(test)]
    pub(crate) fn with_base_url(self, endpoint: String) -> Self {
        Self {
            endpoint,
            backoff: Duration::from_millis(5),
            ..self
        }
    }

    /// Posts `request` and returns the parsed reply, retrying once when the
    /// API reports a retryable status.
    pub async fn create_message(
        &self,
        request: &CompletionRequest,
    ) -> Result<CompletionResponse, SolaceError> {
        let mut attempt = 0;
        loop {
            match self.send_once(request).await? {
                Attempt::Done(response) => return Ok(response),
                Attempt::Retryable(err) if attempt < self.retries => {
                    attempt += 1;
                    warn!(attempt, error = %err, "anthropic busy, retrying");
                    tokio::time::sleep(self.backoff).await;
                }
                Attempt::Retryable(err) => return Err(err),
            }
        }
    }

    async fn send_once(&self, request: &CompletionRequest) -> Result<Attempt, SolaceError> {
        let response = self
            .http
            .post(&self.endpoint)
            .json(request)
            .send()
            .await
            .map_err(|e| provider_error(format!("could not reach anthropic: {e}"), Some(e)))?;

        let status = response.status();
        debug!(%status, "anthropic responded");

        if status.is_success() {
            let parsed = response.json::<CompletionResponse>().await.map_err(|e| {
                provider_error(format!("unreadable anthropic response: {e}"), Some(e))
            })?;
            return Ok(Attempt::Done(parsed));
        }

        let raw = response.text().await.unwrap_or_default();
        let err = provider_error(describe_failure(status, &raw), None);
        if RETRYABLE.contains(&status.as_u16()) {
            Ok(Attempt::Retryable(err))
        } else {
            Err(err)
        }
    }
}

fn describe_failure(status: StatusCode, raw: &str) -> String {
    match serde_json::from_str::<ErrorEnvelope>(raw) {
        Ok(envelope) => format!("anthropic rejected request ({status}) {}", envelope.error),
        Err(_) => format!("anthropic rejected request ({status}) {raw}"),
    }
}
