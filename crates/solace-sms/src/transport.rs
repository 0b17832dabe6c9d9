// SPDX-FileCopyrightText: 2026 Solace Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Outbound SMS over the Twilio REST API.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use solace_config::model::SmsConfig;
use solace_core::types::{AdapterType, HealthStatus, SendReceipt};
use solace_core::{MessageStatus, PluginAdapter, SmsTransport, SolaceError};
use tracing::{debug, info};

#[derive(Debug, Deserialize)]
struct CreateMessageResponse {
    sid: String,
    #[serde(default)]
    status: String,
}

#[derive(Debug, Deserialize)]
struct ApiErrorResponse {
    #[serde(default)]
    code: Option<i64>,
    message: String,
}

/// Twilio REST transport.
pub struct TwilioTransport {
    client: reqwest::Client,
    account_sid: String,
    auth_token: String,
    messages_url: String,
    status_callback_url: Option<String>,
}

impl TwilioTransport {
    /// Build the transport. Requires `sms.account_sid` and `sms.auth_token`.
    pub fn new(config: &SmsConfig) -> Result<Self, SolaceError> {
        let account_sid = config
            .account_sid
            .clone()
            .filter(|s| !s.is_empty())
            .ok_or_else(|| SolaceError::Config("sms.account_sid is required".into()))?;
        let auth_token = config
            .auth_token
            .clone()
            .filter(|s| !s.is_empty())
            .ok_or_else(|| SolaceError::Config("sms.auth_token is required".into()))?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| SolaceError::Transport {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        let messages_url = format!(
            "{}/2010-04-01/Accounts/{account_sid}/Messages.json",
            config.api_base_url.trim_end_matches('/')
        );
        info!(url = %messages_url, "Twilio transport initialized");

        Ok(Self {
            client,
            account_sid,
            auth_token,
            messages_url,
            status_callback_url: config.status_callback_url.clone(),
        })
    }
}

#[async_trait]
impl PluginAdapter for TwilioTransport {
    fn name(&self) -> &str {
        "twilio"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Transport
    }

    async fn health_check(&self) -> Result<HealthStatus, SolaceError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), SolaceError> {
        debug!("Twilio transport shutting down");
        Ok(())
    }
}

#[async_trait]
impl SmsTransport for TwilioTransport {
    async fn send(&self, from: &str, to: &str, body: &str) -> Result<SendReceipt, SolaceError> {
        let mut form = vec![("From", from), ("To", to), ("Body", body)];
        if let Some(callback) = self.status_callback_url.as_deref() {
            form.push(("StatusCallback", callback));
        }

        let response = self
            .client
            .post(&self.messages_url)
            .basic_auth(&self.account_sid, Some(&self.auth_token))
            .form(&form)
            .send()
            .await
            .map_err(|e| SolaceError::Transport {
                message: format!("SMS request failed: {e}"),
                source: Some(Box::new(e)),
            })?;

        let status = response.status();
        let text = response.text().await.map_err(|e| SolaceError::Transport {
            message: format!("failed to read SMS response: {e}"),
            source: Some(Box::new(e)),
        })?;

        if !status.is_success() {
            let message = match serde_json::from_str::<ApiErrorResponse>(&text) {
                Ok(err) => match err.code {
                    Some(code) => format!("Twilio error {code}: {}", err.message),
                    None => format!("Twilio error: {}", err.message),
                },
                Err(_) => format!("Twilio returned {status}: {text}"),
            };
            return Err(SolaceError::Transport {
                message,
                source: None,
            });
        }

        let created: CreateMessageResponse =
            serde_json::from_str(&text).map_err(|e| SolaceError::Transport {
                message: format!("failed to parse SMS response: {e}"),
                source: Some(Box::new(e)),
            })?;

        let receipt = SendReceipt {
            status: MessageStatus::from_transport(&created.status),
            delivery_id: created.sid,
        };
        debug!(
            reference_id = %receipt.delivery_id,
            status = %receipt.status,
            "SMS accepted by transport"
        );
        Ok(receipt)
    }
}
