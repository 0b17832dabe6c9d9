// SPDX-FileCopyrightText: 2026 Solace Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Persist-then-send for agent-authored messages.

use std::sync::Arc;

use chrono::Utc;
use solace_core::types::{Conversation, Message, MessageType, NewMessage, SystemAccount, User};
use solace_core::{MessageRepository, MessageStatus, SmsTransport, SolaceError};
use tracing::{info, warn};

/// What happened to an outbound message.
#[derive(Debug)]
pub enum Delivery {
    /// The transport accepted it; `reference_id` is set.
    Sent(Message),
    /// Persisted but the transport refused it. It stays `Sending` without a
    /// reference id until the unsent sweep fails it.
    Unsent { message: Message, error: SolaceError },
}

impl Delivery {
    pub fn message(&self) -> &Message {
        match self {
            Delivery::Sent(message) | Delivery::Unsent { message, .. } => message,
        }
    }

    pub fn is_sent(&self) -> bool {
        matches!(self, Delivery::Sent(_))
    }
}

/// Records an outbound message before handing it to the transport.
#[derive(Clone)]
pub struct OutboundSender {
    messages: Arc<dyn MessageRepository>,
    transport: Arc<dyn SmsTransport>,
    system: SystemAccount,
}

impl OutboundSender {
    pub fn new(
        messages: Arc<dyn MessageRepository>,
        transport: Arc<dyn SmsTransport>,
        system: SystemAccount,
    ) -> Self {
        Self {
            messages,
            transport,
            system,
        }
    }

    /// Persist `body` as `Sending`, transmit it, then store the delivery id.
    ///
    /// Storage failures are errors. A transport failure is not: the persisted
    /// message is returned as [`Delivery::Unsent`].
    pub async fn deliver(
        &self,
        conversation: &Conversation,
        recipient: &User,
        body: String,
    ) -> Result<Delivery, SolaceError> {
        let mut message = self
            .messages
            .create_message(NewMessage {
                conversation_id: conversation.id,
                from_user_id: self.system.user_id,
                to_user_id: recipient.id,
                body,
                message_type: MessageType::Sms,
                status: MessageStatus::Sending,
                reference_id: None,
                sent_at: Some(Utc::now()),
                received_at: None,
            })
            .await?;

        let receipt = match self
            .transport
            .send(&self.system.phone_number, &recipient.phone_number, &message.body)
            .await
        {
            Ok(receipt) => receipt,
            Err(error) => {
                warn!(
                    message_id = %message.id,
                    conversation_id = %conversation.id,
                    user_id = %recipient.id,
                    error = %error,
                    "outbound message not sent"
                );
                return Ok(Delivery::Unsent { message, error });
            }
        };

        message.reference_id = Some(receipt.delivery_id);
        message.status = receipt.status;
        self.messages.update_message(&message).await?;

        info!(
            message_id = %message.id,
            conversation_id = %conversation.id,
            user_id = %recipient.id,
            reference_id = message.reference_id.as_deref().unwrap_or_default(),
            status = %message.status,
            "outbound message sent"
        );
        Ok(Delivery::Sent(message))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use solace_core::ConversationRepository;
    use solace_test_utils::{MockTransport, TestStorage};

    #[tokio::test]
    async fn persists_before_sending_and_stores_reference() {
        let store = TestStorage::new().await.unwrap();
        let user = store.add_user("Dana", "+15550000002").await.unwrap();
        let conv = store
            .storage
            .create_conversation(user.id, Utc::now())
            .await
            .unwrap();
        let transport = Arc::new(MockTransport::new());
        let sender = OutboundSender::new(store.storage.clone(), transport.clone(), store.system());

        let delivery = sender
            .deliver(&conv, &user, "Hi Dana".into())
            .await
            .unwrap();
        assert!(delivery.is_sent());
        let message = delivery.message();
        assert_eq!(message.reference_id.as_deref(), Some("SM-mock-1"));
        assert_eq!(message.status, MessageStatus::Queued);
        assert!(message.sent_at.is_some());

        let sent = transport.sent().await;
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].from, "+15550000001");
        assert_eq!(sent[0].to, "+15550000002");
        assert_eq!(sent[0].body, "Hi Dana");
    }

    #[tokio::test]
    async fn transport_failure_leaves_message_sending() {
        let store = TestStorage::new().await.unwrap();
        let user = store.add_user("Dana", "+15550000002").await.unwrap();
        let conv = store
            .storage
            .create_conversation(user.id, Utc::now())
            .await
            .unwrap();
        let transport = Arc::new(MockTransport::failing());
        let sender = OutboundSender::new(store.storage.clone(), transport, store.system());

        let delivery = sender.deliver(&conv, &user, "Hi".into()).await.unwrap();
        let Delivery::Unsent { message, error } = delivery else {
            panic!("expected unsent delivery");
        };
        assert!(error.is_transient());

        let stored = store.storage.get_message(message.id).await.unwrap().unwrap();
        assert_eq!(stored.status, MessageStatus::Sending);
        assert!(stored.reference_id.is_none());
    }
}
