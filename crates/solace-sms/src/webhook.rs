// SPDX-FileCopyrightText: 2026 Solace Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Form payloads posted by Twilio to the inbound and status webhooks.

use serde::Deserialize;
use solace_core::SolaceError;
use solace_core::types::{InboundSms, StatusCallback};

/// The subset of Twilio webhook fields the pipeline reads.
///
/// Unknown fields (geo data, media counts, ...) are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TwilioWebhook {
    #[serde(rename = "MessageSid")]
    pub message_sid: String,
    #[serde(rename = "SmsMessageSid")]
    pub sms_message_sid: String,
    #[serde(rename = "SmsSid")]
    pub sms_sid: String,
    #[serde(rename = "SmsStatus")]
    pub sms_status: String,
    #[serde(rename = "MessageStatus")]
    pub message_status: String,
    #[serde(rename = "AccountSid")]
    pub account_sid: String,
    #[serde(rename = "ErrorCode")]
    pub error_code: String,
    #[serde(rename = "ErrorMessage")]
    pub error_message: String,
    #[serde(rename = "Body")]
    pub body: String,
    #[serde(rename = "From")]
    pub from: String,
    #[serde(rename = "To")]
    pub to: String,
}

fn first_non_empty<'a>(candidates: &[&'a str]) -> Option<&'a str> {
    candidates
        .iter()
        .copied()
        .map(str::trim)
        .find(|s| !s.is_empty())
}

impl TwilioWebhook {
    /// Decode an `application/x-www-form-urlencoded` body.
    pub fn from_form(body: &[u8]) -> Result<Self, SolaceError> {
        serde_urlencoded::from_bytes(body)
            .map_err(|e| SolaceError::Validation(format!("malformed webhook form: {e}")))
    }

    /// Delivery identifier: `SmsSid`, falling back to `MessageSid`.
    pub fn reference_id(&self) -> Option<&str> {
        first_non_empty(&[
            self.sms_sid.as_str(),
            self.message_sid.as_str(),
            self.sms_message_sid.as_str(),
        ])
    }

    /// Reported status: `MessageStatus`, falling back to `SmsStatus`.
    pub fn status(&self) -> Option<&str> {
        first_non_empty(&[self.message_status.as_str(), self.sms_status.as_str()])
    }

    /// The inbound message carried by this webhook. Field validation happens
    /// at ingestion.
    pub fn into_inbound(self) -> InboundSms {
        let reference_id = self.reference_id().map(str::to_string);
        InboundSms {
            from: self.from,
            to: self.to,
            body: self.body,
            reference_id,
        }
    }

    /// The status callback carried by this webhook.
    pub fn into_status_callback(self) -> Result<StatusCallback, SolaceError> {
        let reference_id = self
            .reference_id()
            .ok_or_else(|| SolaceError::Validation("status callback without SmsSid".into()))?
            .to_string();
        let status = self
            .status()
            .ok_or_else(|| SolaceError::Validation("status callback without status".into()))?
            .to_string();
        Ok(StatusCallback {
            reference_id,
            status,
        })
    }
}

/// All form parameters in body order, as signed by Twilio.
pub fn parse_form_params(body: &[u8]) -> Result<Vec<(String, String)>, SolaceError> {
    serde_urlencoded::from_bytes(body)
        .map_err(|e| SolaceError::Validation(format!("malformed webhook form: {e}")))
}
