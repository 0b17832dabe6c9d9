// SPDX-FileCopyrightText: 2026 Solace Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Notification envelope carried through the generation queue.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use solace_core::SolaceError;
use solace_core::types::Message;
use uuid::Uuid;

/// `Type` value of every envelope this crate produces.
pub const NOTIFICATION: &str = "Notification";

/// Wire shape: `{"Type","MessageId","Message","Timestamp"}` where `Message`
/// is itself a JSON-encoded [`Message`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct QueueEnvelope {
    #[serde(rename = "Type")]
    pub kind: String,
    pub message_id: Uuid,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

impl QueueEnvelope {
    /// Wrap a persisted message.
    pub fn wrap(message: &Message) -> Result<Self, SolaceError> {
        let message = serde_json::to_string(message)
            .map_err(|e| SolaceError::Internal(format!("failed to encode message: {e}")))?;
        Ok(Self {
            kind: NOTIFICATION.to_string(),
            message_id: Uuid::new_v4(),
            message,
            timestamp: Utc::now(),
        })
    }

    pub fn to_json(&self) -> Result<String, SolaceError> {
        serde_json::to_string(self)
            .map_err(|e| SolaceError::Internal(format!("failed to encode envelope: {e}")))
    }

    /// Decode a queue payload down to the message it carries.
    ///
    /// Anything malformed is a `Validation` error: retrying will not fix it.
    pub fn decode(payload: &str) -> Result<Message, SolaceError> {
        let envelope: QueueEnvelope = serde_json::from_str(payload)
            .map_err(|e| SolaceError::Validation(format!("malformed queue envelope: {e}")))?;
        if envelope.kind != NOTIFICATION {
            return Err(SolaceError::Validation(format!(
                "unexpected envelope type `{}`",
                envelope.kind
            )));
        }
        serde_json::from_str(&envelope.message)
            .map_err(|e| SolaceError::Validation(format!("malformed envelope message: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use solace_core::MessageStatus;
    use solace_core::types::{ConversationId, MessageId, MessageType, UserId};

    fn message() -> Message {
        Message {
            id: MessageId(11),
            conversation_id: ConversationId(3),
            from_user_id: UserId(2),
            to_user_id: UserId(1),
            body: "Hello".into(),
            message_type: MessageType::Sms,
            status: MessageStatus::Received,
            reference_id: Some("SM123".into()),
            sent_at: None,
            received_at: Some(Utc::now()),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn envelope_uses_pascal_case_keys() {
        let json = QueueEnvelope::wrap(&message()).unwrap().to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["Type"], "Notification");
        assert!(value["MessageId"].is_string());
        assert!(value["Message"].as_str().unwrap().contains("\"body\":\"Hello\""));
        assert!(value["Timestamp"].is_string());
    }

    #[test]
    fn decode_returns_wrapped_message() {
        let original = message();
        let json = QueueEnvelope::wrap(&original).unwrap().to_json().unwrap();
        assert_eq!(QueueEnvelope::decode(&json).unwrap(), original);
    }

    #[test]
    fn garbage_is_validation_error() {
        let err = QueueEnvelope::decode("not json").unwrap_err();
        assert!(matches!(err, SolaceError::Validation(_)));
    }

    #[test]
    fn unparseable_inner_message_is_validation_error() {
        let payload = r#"{"Type":"Notification","MessageId":"9f2a4c1e-8d7b-4f7a-9a51-0c6d0f3b7e21","Message":"{}","Timestamp":"2026-03-01T12:00:00Z"}"#;
        let err = QueueEnvelope::decode(payload).unwrap_err();
        assert!(matches!(err, SolaceError::Validation(_)));
    }

    #[test]
    fn other_envelope_types_are_rejected() {
        let mut envelope = QueueEnvelope::wrap(&message()).unwrap();
        envelope.kind = "SubscriptionConfirmation".into();
        let err = QueueEnvelope::decode(&envelope.to_json().unwrap()).unwrap_err();
        assert!(err.to_string().contains("SubscriptionConfirmation"));
    }
}
