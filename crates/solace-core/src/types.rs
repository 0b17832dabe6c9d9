// SPDX-FileCopyrightText: 2026 Solace Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain types shared across adapter trait boundaries.

use std::fmt;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::status::MessageStatus;

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Adapter is fully operational.
    Healthy,
    /// Adapter is operational but experiencing issues.
    Degraded(String),
    /// Adapter is not operational.
    Unhealthy(String),
}

/// Identifies the kind of adapter behind a trait object.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum AdapterType {
    Storage,
    Completion,
    Transport,
    Analyzer,
}

macro_rules! id_newtype {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

id_newtype!(
    /// Primary key of a user row.
    UserId
);
id_newtype!(
    /// Primary key of a conversation row.
    ConversationId
);
id_newtype!(
    /// Primary key of a message row.
    MessageId
);

/// Format a timestamp the way every table stores it.
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Parse a stored timestamp.
pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    DateTime::parse_from_rfc3339(raw).map(|dt| dt.with_timezone(&Utc))
}

// --- Users ---

/// Account lifecycle of a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize, Deserialize)]
pub enum AccountStatus {
    PendingActivation,
    Active,
    Suspended,
    Expired,
}

impl AccountStatus {
    pub fn id(self) -> i64 {
        match self {
            AccountStatus::PendingActivation => 1,
            AccountStatus::Active => 2,
            AccountStatus::Suspended => 3,
            AccountStatus::Expired => 4,
        }
    }

    /// Unrecognized ids are treated as not yet activated.
    pub fn from_id(id: i64) -> Self {
        match id {
            2 => AccountStatus::Active,
            3 => AccountStatus::Suspended,
            4 => AccountStatus::Expired,
            _ => AccountStatus::PendingActivation,
        }
    }
}

/// A person reachable over SMS. Also used for the agent's own sending identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    /// E.164 phone number.
    pub phone_number: String,
    pub phone_verified: bool,
    pub nudge_enabled: bool,
    pub status: AccountStatus,
    pub created_at: DateTime<Utc>,
}

/// Fields required to insert a user.
#[derive(Debug, Clone)]
pub struct NewUser {
    /// Explicit id, used when seeding the system account.
    pub id: Option<UserId>,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub phone_number: String,
    pub phone_verified: bool,
    pub nudge_enabled: bool,
    pub status: AccountStatus,
}

/// The agent's own account, injected from configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemAccount {
    pub user_id: UserId,
    pub phone_number: String,
}

impl SystemAccount {
    pub fn is(&self, user_id: UserId) -> bool {
        self.user_id == user_id
    }
}

// --- Conversations ---

/// Whether a conversation still accepts messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum ConversationState {
    Open,
    Closed,
}

/// A bounded session: one inbound/reply exchange or one nudge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conversation {
    pub id: ConversationId,
    /// The user the session belongs to (never the system account).
    pub user_id: UserId,
    pub start_time: DateTime<Utc>,
    /// `None` while open.
    pub end_time: Option<DateTime<Utc>>,
}

impl Conversation {
    pub fn state(&self) -> ConversationState {
        if self.end_time.is_some() {
            ConversationState::Closed
        } else {
            ConversationState::Open
        }
    }

    pub fn is_open(&self) -> bool {
        self.state() == ConversationState::Open
    }
}

// --- Messages ---

/// Billing category of a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize, Deserialize)]
pub enum MessageType {
    Sms,
}

impl MessageType {
    pub fn id(self) -> i64 {
        match self {
            MessageType::Sms => 2,
        }
    }

    pub fn from_id(_id: i64) -> Self {
        MessageType::Sms
    }

    /// Credits charged per delivered message.
    pub fn bill_rate(self) -> f64 {
        match self {
            MessageType::Sms => 0.5,
        }
    }
}

/// A persisted message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: MessageId,
    pub conversation_id: ConversationId,
    pub from_user_id: UserId,
    pub to_user_id: UserId,
    pub body: String,
    pub message_type: MessageType,
    pub status: MessageStatus,
    /// Transport delivery id. Join key for status callbacks.
    pub reference_id: Option<String>,
    pub sent_at: Option<DateTime<Utc>>,
    pub received_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Message {
    /// Project into the shape handed to the completion provider.
    pub fn to_history(&self, system: &SystemAccount) -> HistoryEntry {
        HistoryEntry {
            author: if system.is(self.from_user_id) {
                Author::Agent
            } else {
                Author::User
            },
            body: self.body.clone(),
            timestamp: self.created_at,
        }
    }
}

/// Fields required to insert a message.
#[derive(Debug, Clone)]
pub struct NewMessage {
    pub conversation_id: ConversationId,
    pub from_user_id: UserId,
    pub to_user_id: UserId,
    pub body: String,
    pub message_type: MessageType,
    pub status: MessageStatus,
    pub reference_id: Option<String>,
    pub sent_at: Option<DateTime<Utc>>,
    pub received_at: Option<DateTime<Utc>>,
}

/// Who wrote a history entry, from the model's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Author {
    User,
    Agent,
}

/// One prior message as seen by the completion provider.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryEntry {
    pub author: Author,
    pub body: String,
    pub timestamp: DateTime<Utc>,
}

/// An inbound SMS after webhook decoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundSms {
    pub from: String,
    pub to: String,
    pub body: String,
    /// Transport id of the inbound message.
    pub reference_id: Option<String>,
}

/// A delivery status callback after webhook decoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusCallback {
    pub reference_id: String,
    /// Raw transport status string.
    pub status: String,
}

/// Result of handing a message to the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendReceipt {
    pub delivery_id: String,
    pub status: MessageStatus,
}

// --- Ledger, analysis, queue ---

/// A single credit deduction. At most one per message.
#[derive(Debug, Clone, PartialEq)]
pub struct CreditDebit {
    pub user_id: UserId,
    pub conversation_id: ConversationId,
    pub message_id: MessageId,
    pub amount: f64,
}

/// NRC emotion lexicon scores.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NrcScores {
    #[serde(default)]
    pub anger: f64,
    #[serde(default)]
    pub anticipation: f64,
    #[serde(default)]
    pub disgust: f64,
    #[serde(default)]
    pub fear: f64,
    #[serde(default)]
    pub trust: f64,
    #[serde(default)]
    pub joy: f64,
    #[serde(default)]
    pub negative: f64,
    #[serde(default)]
    pub positive: f64,
    #[serde(default)]
    pub sadness: f64,
    #[serde(default)]
    pub surprise: f64,
}

/// VADER sentiment scores.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VaderScores {
    #[serde(default)]
    pub compound: f64,
    #[serde(default)]
    pub neg: f64,
    #[serde(default)]
    pub neu: f64,
    #[serde(default)]
    pub pos: f64,
}

/// Emotion analysis of one message.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EmotionScores {
    pub nrc: NrcScores,
    pub vader: VaderScores,
}

/// An entry in the durable work queue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueEntry {
    pub id: i64,
    pub queue_name: String,
    pub payload: String,
    /// One of `pending`, `processing`, `completed`, `failed`.
    pub status: String,
    pub attempts: i32,
    pub max_attempts: i32,
    pub created_at: String,
    pub updated_at: String,
    pub locked_until: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn message(from: i64) -> Message {
        Message {
            id: MessageId(1),
            conversation_id: ConversationId(1),
            from_user_id: UserId(from),
            to_user_id: UserId(if from == 1 { 2 } else { 1 }),
            body: "hi".into(),
            message_type: MessageType::Sms,
            status: MessageStatus::Received,
            reference_id: None,
            sent_at: None,
            received_at: None,
            created_at: Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap(),
        }
    }

    #[test]
    fn timestamps_round_trip_through_storage_format() {
        let at = Utc.with_ymd_and_hms(2026, 1, 2, 15, 4, 5).unwrap();
        let raw = format_timestamp(at);
        assert_eq!(raw, "2026-01-02T15:04:05.000Z");
        assert_eq!(parse_timestamp(&raw).unwrap(), at);
    }

    #[test]
    fn conversation_state_follows_end_time() {
        let mut conv = Conversation {
            id: ConversationId(7),
            user_id: UserId(2),
            start_time: Utc::now(),
            end_time: None,
        };
        assert!(conv.is_open());
        conv.end_time = Some(Utc::now());
        assert_eq!(conv.state(), ConversationState::Closed);
    }

    #[test]
    fn history_author_is_agent_only_for_system_messages() {
        let system = SystemAccount {
            user_id: UserId(1),
            phone_number: "+15550000001".into(),
        };
        assert_eq!(message(1).to_history(&system).author, Author::Agent);
        assert_eq!(message(2).to_history(&system).author, Author::User);
    }

    #[test]
    fn account_status_ids() {
        for status in [
            AccountStatus::PendingActivation,
            AccountStatus::Active,
            AccountStatus::Suspended,
            AccountStatus::Expired,
        ] {
            assert_eq!(AccountStatus::from_id(status.id()), status);
        }
    }

    #[test]
    fn sms_bill_rate() {
        assert_eq!(MessageType::Sms.bill_rate(), 0.5);
        assert_eq!(MessageType::from_id(MessageType::Sms.id()), MessageType::Sms);
    }

    #[test]
    fn message_serializes_with_numeric_ids() {
        let json = serde_json::to_value(message(2)).unwrap();
        assert_eq!(json["from_user_id"], 2);
        assert_eq!(json["status"], "Received");
    }
}
