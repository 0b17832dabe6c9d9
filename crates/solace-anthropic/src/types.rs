// SPDX-FileCopyrightText: 2026 Solace Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Wire shapes for `POST /v1/messages`.
//!
//! Only the fields the SMS reply path reads are modelled; serde drops the
//! rest of the response.

use serde::{Deserialize, Serialize};

/// Body of a single non-streaming completion call.
#[derive(Debug, Clone, Serialize)]
pub struct CompletionRequest {
    pub model: String,
    pub max_tokens: u32,
    /// Conditioning prompt, sent as the top-level `system` field.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,
    pub messages: Vec<Turn>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    pub stream: bool,
}

/// One side of the exchange. `role` is `"user"` or `"assistant"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub role: String,
    pub content: String,
}

impl Turn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".into(),
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CompletionResponse {
    pub id: String,
    pub model: String,
    #[serde(default)]
    pub content: Vec<Block>,
    pub stop_reason: Option<String>,
    #[serde(default)]
    pub usage: TokenUsage,
}

impl CompletionResponse {
    /// Text blocks joined in order; other block kinds are skipped.
    pub fn text(&self) -> String {
        let mut out = String::new();
        for block in &self.content {
            if let Block::Text { text } = block {
                out.push_str(text);
            }
        }
        out
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    Text { text: String },
    #[serde(other)]
    Unsupported,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct TokenUsage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

/// `{"type":"error","error":{"type":...,"message":...}}`
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorEnvelope {
    pub error: ErrorBody,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ErrorBody {
    #[serde(rename = "type")]
    pub kind: String,
    pub message: String,
}

impl std::fmt::Display for ErrorBody {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_system_and_temperature_are_not_sent() {
        let body = CompletionRequest {
            model: "claude-3-5-haiku-latest".into(),
            max_tokens: 160,
            system: None,
            messages: vec![Turn::user("Good morning")],
            temperature: None,
            stream: false,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["messages"][0]["role"], "user");
        assert_eq!(json["messages"][0]["content"], "Good morning");
        assert_eq!(json["stream"], false);
        assert!(json.get("system").is_none());
        assert!(json.get("temperature").is_none());
    }

    #[test]
    fn text_joins_only_text_blocks() {
        let response: CompletionResponse = serde_json::from_value(serde_json::json!({
            "id": "msg_sms_01",
            "type": "message",
            "role": "assistant",
            "model": "claude-3-5-haiku-latest",
            "content": [
                {"type": "text", "text": "Glad "},
                {"type": "tool_use", "id": "tu_1", "name": "x", "input": {}},
                {"type": "text", "text": "you wrote."}
            ],
            "stop_reason": "end_turn",
            "usage": {"input_tokens": 40, "output_tokens": 6}
        }))
        .unwrap();
        assert_eq!(response.text(), "Glad you wrote.");
        assert_eq!(response.usage.input_tokens, 40);
    }

    #[test]
    fn error_envelope_displays_kind_and_message() {
        let envelope: ErrorEnvelope = serde_json::from_str(
            r#"{"type":"error","error":{"type":"rate_limit_error","message":"Slow down"}}"#,
        )
        .unwrap();
        assert_eq!(envelope.error.to_string(), "rate_limit_error: Slow down");
    }
}
