// SPDX-FileCopyrightText: 2026 Solace Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Anthropic Claude completion provider for the Solace SMS agent.
//!
//! Implements [`CompletionProvider`] over the non-streaming Messages API.
//! The conditioning prompt becomes the system prompt and the memory window
//! is replayed as alternating user/assistant turns.

pub mod client;
pub mod types;

use async_trait::async_trait;
use solace_config::model::AnthropicConfig;
use solace_core::text::clean_completion_text;
use solace_core::types::{AdapterType, Author, HealthStatus, HistoryEntry};
use solace_core::{CompletionProvider, PluginAdapter, SolaceError};
use tracing::{debug, info};

use crate::client::AnthropicClient;
use crate::types::{CompletionRequest, Turn};

const COMPLETION_TEMPERATURE: f32 = 0.9;

/// Anthropic Claude provider implementing [`CompletionProvider`].
///
/// API key resolution order: config -> `ANTHROPIC_API_KEY` env var -> error.
pub struct AnthropicProvider {
    client: AnthropicClient,
    model: String,
    max_tokens: u32,
    remove_emojis: bool,
}

impl AnthropicProvider {
    pub fn new(config: &AnthropicConfig) -> Result<Self, SolaceError> {
        let api_key = resolve_api_key(&config.api_key)?;
        let client = AnthropicClient::new(&api_key, &config.api_version)?;
        info!(model = %config.model, "Anthropic provider initialized");
        Ok(Self::with_client(client, config))
    }

    fn with_client(client: AnthropicClient, config: &AnthropicConfig) -> Self {
        Self {
            client,
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            remove_emojis: config.remove_emojis,
        }
    }

    fn to_message_request(
        &self,
        message: &str,
        prompt: &str,
        history: &[HistoryEntry],
    ) -> CompletionRequest {
        CompletionRequest {
            model: self.model.clone(),
            messages: build_turns(message, history),
            system: (!prompt.trim().is_empty()).then(|| prompt.to_string()),
            max_tokens: self.max_tokens,
            temperature: Some(COMPLETION_TEMPERATURE),
            stream: false,
        }
    }
}

/// Replay `history` as alternating turns ending with `message` from the user.
///
/// Consecutive entries by the same author are merged into one turn and any
/// leading agent turns are dropped, since the API requires the first turn to
/// come from the user. Each history line carries its timestamp so the model
/// can reason about elapsed time.
fn build_turns(message: &str, history: &[HistoryEntry]) -> Vec<Turn> {
    let mut turns: Vec<Turn> = Vec::with_capacity(history.len() + 1);

    let lines = history.iter().map(|entry| {
        let role = match entry.author {
            Author::User => "user",
            Author::Agent => "assistant",
        };
        (
            role,
            format!("[{}] {}", entry.timestamp.format("%Y-%m-%d %H:%M"), entry.body),
        )
    });

    for (role, content) in lines.chain(std::iter::once(("user", message.to_string()))) {
        match turns.last_mut() {
            Some(last) if last.role == role => {
                last.content.push('\n');
                last.content.push_str(&content);
            }
            None if role == "assistant" => {}
            _ => turns.push(Turn {
                role: role.to_string(),
                content,
            }),
        }
    }

    turns
}

#[async_trait]
impl PluginAdapter for AnthropicProvider {
    fn name(&self) -> &str {
        "anthropic"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Completion
    }

    async fn health_check(&self) -> Result<HealthStatus, SolaceError> {
        // No probe request: it would spend tokens.
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), SolaceError> {
        debug!("Anthropic provider shutting down");
        Ok(())
    }
}

#[async_trait]
impl CompletionProvider for AnthropicProvider {
    async fn complete(
        &self,
        message: &str,
        prompt: &str,
        history: &[HistoryEntry],
    ) -> Result<String, SolaceError> {
        let request = self.to_message_request(message, prompt, history);
        debug!(
            model = %request.model,
            turns = request.messages.len(),
            history = history.len(),
            prompt_chars = prompt.len(),
            "sending completion request"
        );

        let response = self.client.create_message(&request).await?;
        info!(
            model = %response.model,
            input_tokens = response.usage.input_tokens,
            output_tokens = response.usage.output_tokens,
            stop_reason = response.stop_reason.as_deref().unwrap_or("none"),
            "completion received"
        );

        let text = response.text();
        if text.trim().is_empty() {
            return Err(SolaceError::Provider {
                message: "completion contained no text".into(),
                source: None,
            });
        }
        Ok(text)
    }

    fn clean_text(&self, text: &str) -> String {
        clean_completion_text(text, self.remove_emojis)
    }
}

/// Resolves the API key: config value first, then `ANTHROPIC_API_KEY`.
fn resolve_api_key(config_key: &Option<String>) -> Result<String, SolaceError> {
    if let Some(key) = config_key
        && !key.is_empty()
    {
        return Ok(key.clone());
    }

    std::env::var("ANTHROPIC_API_KEY").map_err(|_| {
        SolaceError::Config(
            "Anthropic API key not found. Set anthropic.api_key in config or ANTHROPIC_API_KEY environment variable.".into(),
        )
    })
}
