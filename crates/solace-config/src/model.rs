// SPDX-FileCopyrightText: 2026 Solace Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Solace SMS agent.
//!
//! Every section denies unknown fields, so a misspelt key fails loading
//! with a suggestion instead of being silently ignored.

use serde::{Deserialize, Serialize};

/// Top-level Solace configuration.
///
/// Each section may be omitted from `solace.toml`; `SOLACE_*` environment
/// variables override file values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SolaceConfig {
    /// Agent persona and process settings.
    #[serde(default)]
    pub agent: AgentConfig,

    /// The agent's own sending account.
    #[serde(default)]
    pub system: SystemConfig,

    /// Anthropic API settings.
    #[serde(default)]
    pub anthropic: AnthropicConfig,

    /// Twilio SMS settings.
    #[serde(default)]
    pub sms: SmsConfig,

    /// Storage backend settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Webhook HTTP server settings.
    #[serde(default)]
    pub gateway: GatewayConfig,

    /// Generation queue settings.
    #[serde(default)]
    pub queue: QueueConfig,

    /// Conversational memory windows.
    #[serde(default)]
    pub memory: MemoryConfig,

    /// Idle-user re-engagement.
    #[serde(default)]
    pub nudge: NudgeConfig,

    /// Emotion analysis side effect.
    #[serde(default)]
    pub emotion: EmotionConfig,

    /// Reconciliation of messages stuck in `Sending`.
    #[serde(default)]
    pub sweep: SweepConfig,
}

/// Agent persona and process configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AgentConfig {
    /// Name the agent introduces itself with.
    #[serde(default = "default_agent_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// IANA timezone used for the date stamped into prompts.
    #[serde(default = "default_timezone")]
    pub timezone: String,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            name: default_agent_name(),
            log_level: default_log_level(),
            timezone: default_timezone(),
        }
    }
}

fn default_agent_name() -> String {
    "Solace".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_timezone() -> String {
    "America/Los_Angeles".to_string()
}

/// The system account: the user row the agent sends from.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SystemConfig {
    /// Primary key of the system user row.
    #[serde(default = "default_system_user_id")]
    pub user_id: i64,

    /// E.164 number outbound messages are sent from. Required by `serve`.
    #[serde(default)]
    pub phone_number: String,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            user_id: default_system_user_id(),
            phone_number: String::new(),
        }
    }
}

fn default_system_user_id() -> i64 {
    1
}

/// Anthropic API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AnthropicConfig {
    /// API key. Falls back to `ANTHROPIC_API_KEY` when unset.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Anthropic API version header.
    #[serde(default = "default_api_version")]
    pub api_version: String,

    /// Model identifier.
    #[serde(default = "default_model")]
    pub model: String,

    /// Maximum tokens per completion.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Strip emoji from completions before sending.
    #[serde(default)]
    pub remove_emojis: bool,
}

impl Default for AnthropicConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_version: default_api_version(),
            model: default_model(),
            max_tokens: default_max_tokens(),
            remove_emojis: false,
        }
    }
}

fn default_api_version() -> String {
    "2023-06-01".to_string()
}

fn default_model() -> String {
    "claude-sonnet-4-20250514".to_string()
}

fn default_max_tokens() -> u32 {
    1024
}

/// Twilio configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SmsConfig {
    /// Account SID used for REST calls and basic auth.
    #[serde(default)]
    pub account_sid: Option<String>,

    /// Auth token used for basic auth and webhook signatures.
    #[serde(default)]
    pub auth_token: Option<String>,

    /// REST API base URL.
    #[serde(default = "default_sms_api_base_url")]
    pub api_base_url: String,

    /// URL Twilio posts delivery status callbacks to.
    #[serde(default)]
    pub status_callback_url: Option<String>,

    /// Public base URL of the gateway, used to rebuild the signed webhook URL.
    #[serde(default)]
    pub public_base_url: Option<String>,

    /// Reject webhooks without a valid `X-Twilio-Signature`.
    #[serde(default = "default_true")]
    pub validate_signatures: bool,
}

impl Default for SmsConfig {
    fn default() -> Self {
        Self {
            account_sid: None,
            auth_token: None,
            api_base_url: default_sms_api_base_url(),
            status_callback_url: None,
            public_base_url: None,
            validate_signatures: true,
        }
    }
}

fn default_sms_api_base_url() -> String {
    "https://api.twilio.com".to_string()
}

fn default_true() -> bool {
    true
}

/// Storage backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Enable WAL journal mode.
    #[serde(default = "default_true")]
    pub wal_mode: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            wal_mode: true,
        }
    }
}

fn default_database_path() -> String {
    dirs::data_dir()
        .map(|d| d.join("solace").join("solace.db"))
        .unwrap_or_else(|| std::path::PathBuf::from("solace.db"))
        .display()
        .to_string()
}

/// Webhook HTTP server configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GatewayConfig {
    /// Host address to bind.
    #[serde(default = "default_gateway_host")]
    pub host: String,

    /// Port to bind.
    #[serde(default = "default_gateway_port")]
    pub port: u16,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: default_gateway_host(),
            port: default_gateway_port(),
        }
    }
}

fn default_gateway_host() -> String {
    "127.0.0.1".to_string()
}

fn default_gateway_port() -> u16 {
    3000
}

/// Generation queue configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct QueueConfig {
    /// Queue name inbound messages are enqueued on.
    #[serde(default = "default_queue_name")]
    pub name: String,

    /// Delay between polls when the queue is empty.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            name: default_queue_name(),
            poll_interval_ms: default_poll_interval_ms(),
        }
    }
}

fn default_queue_name() -> String {
    "generation".to_string()
}

fn default_poll_interval_ms() -> u64 {
    500
}

/// Memory window sizes and the thresholds that pick a prompt variant.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct MemoryConfig {
    /// Most recent messages included when replying.
    #[serde(default = "default_reply_recent")]
    pub reply_recent: usize,

    /// Older user-authored messages sampled when replying.
    #[serde(default = "default_reply_historical")]
    pub reply_historical: usize,

    /// Below this many memories the reply uses the new-relationship prompt.
    #[serde(default = "default_reply_threshold")]
    pub reply_threshold: usize,

    /// Most recent messages included in a nudge.
    #[serde(default = "default_nudge_recent")]
    pub nudge_recent: usize,

    /// Older messages sampled for a nudge.
    #[serde(default = "default_nudge_historical")]
    pub nudge_historical: usize,

    /// Below this many user-authored messages the nudge uses the new-relationship prompt.
    #[serde(default = "default_nudge_threshold")]
    pub nudge_threshold: usize,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            reply_recent: default_reply_recent(),
            reply_historical: default_reply_historical(),
            reply_threshold: default_reply_threshold(),
            nudge_recent: default_nudge_recent(),
            nudge_historical: default_nudge_historical(),
            nudge_threshold: default_nudge_threshold(),
        }
    }
}

fn default_reply_recent() -> usize {
    250
}

fn default_reply_historical() -> usize {
    25
}

fn default_reply_threshold() -> usize {
    5
}

fn default_nudge_recent() -> usize {
    20
}

fn default_nudge_historical() -> usize {
    15
}

fn default_nudge_threshold() -> usize {
    3
}

/// Idle-user re-engagement configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct NudgeConfig {
    /// Run the nudge scheduler inside `serve`.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Hours without any message before a user is considered idle.
    #[serde(default = "default_idle_hours")]
    pub idle_hours: u32,

    /// Seconds between batches.
    #[serde(default = "default_nudge_interval_secs")]
    pub interval_secs: u64,

    /// Maximum nudges generated concurrently.
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,
}

impl Default for NudgeConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            idle_hours: default_idle_hours(),
            interval_secs: default_nudge_interval_secs(),
            max_concurrency: default_max_concurrency(),
        }
    }
}

fn default_idle_hours() -> u32 {
    7
}

fn default_nudge_interval_secs() -> u64 {
    3600
}

fn default_max_concurrency() -> usize {
    8
}

/// Emotion analysis configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct EmotionConfig {
    /// Analyze inbound messages after each reply.
    #[serde(default)]
    pub enabled: bool,

    /// Base URL of the sentiment service.
    #[serde(default = "default_emotion_base_url")]
    pub base_url: String,

    /// Retries after the first attempt.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// First backoff delay; doubles on every retry.
    #[serde(default = "default_initial_backoff_ms")]
    pub initial_backoff_ms: u64,

    /// Ceiling for the backoff delay.
    #[serde(default = "default_max_backoff_ms")]
    pub max_backoff_ms: u64,

    /// Per-request timeout.
    #[serde(default = "default_emotion_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for EmotionConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            base_url: default_emotion_base_url(),
            max_retries: default_max_retries(),
            initial_backoff_ms: default_initial_backoff_ms(),
            max_backoff_ms: default_max_backoff_ms(),
            timeout_secs: default_emotion_timeout_secs(),
        }
    }
}

fn default_emotion_base_url() -> String {
    "https://langtool.net".to_string()
}

fn default_max_retries() -> u32 {
    3
}

fn default_initial_backoff_ms() -> u64 {
    2000
}

fn default_max_backoff_ms() -> u64 {
    6000
}

fn default_emotion_timeout_secs() -> u64 {
    6
}

/// Sweep of outbound messages that never reached the transport.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SweepConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Age after which a `Sending` message without reference id is failed.
    #[serde(default = "default_stale_after_secs")]
    pub stale_after_secs: u64,

    /// Seconds between sweeps.
    #[serde(default = "default_sweep_interval_secs")]
    pub interval_secs: u64,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            stale_after_secs: default_stale_after_secs(),
            interval_secs: default_sweep_interval_secs(),
        }
    }
}

fn default_stale_after_secs() -> u64 {
    900
}

fn default_sweep_interval_secs() -> u64 {
    300
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = SolaceConfig::default();
        assert_eq!(config.agent.name, "Solace");
        assert_eq!(config.agent.timezone, "America/Los_Angeles");
        assert_eq!(config.system.user_id, 1);
        assert_eq!(config.memory.reply_recent, 250);
        assert_eq!(config.memory.reply_threshold, 5);
        assert_eq!(config.memory.nudge_recent, 20);
        assert_eq!(config.memory.nudge_historical, 15);
        assert_eq!(config.memory.nudge_threshold, 3);
        assert_eq!(config.nudge.idle_hours, 7);
        assert_eq!(config.nudge.max_concurrency, 8);
        assert_eq!(config.emotion.max_retries, 3);
        assert!(config.sms.validate_signatures);
        assert!(!config.emotion.enabled);
    }

    #[test]
    fn partial_section_keeps_other_defaults() {
        let config: SolaceConfig = toml::from_str(
            r#"
[memory]
reply_recent = 10
"#,
        )
        .unwrap();
        assert_eq!(config.memory.reply_recent, 10);
        assert_eq!(config.memory.reply_historical, 25);
        assert_eq!(config.gateway.port, 3000);
    }

    #[test]
    fn unknown_section_key_is_rejected() {
        let result = toml::from_str::<SolaceConfig>(
            r#"
[nudge]
idle_hourz = 3
"#,
        );
        assert!(result.is_err());
    }
}
