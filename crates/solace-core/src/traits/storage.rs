// SPDX-FileCopyrightText: 2026 Solace Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Persistence traits.
//!
//! Each repository covers one aggregate so that pipeline stages can depend on
//! exactly what they touch. A single storage backend usually implements all
//! of them.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::SolaceError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{
    Conversation, ConversationId, CreditDebit, EmotionScores, Message, MessageId, NewMessage,
    NewUser, QueueEntry, User, UserId,
};

/// Lifecycle of a storage backend.
#[async_trait]
pub trait StorageAdapter: PluginAdapter {
    /// Initializes the storage backend (migrations, connection, etc.).
    async fn initialize(&self) -> Result<(), SolaceError>;

    /// Closes the storage backend, flushing pending writes.
    async fn close(&self) -> Result<(), SolaceError>;
}

/// User lookups. Users are owned by the account subsystem.
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create_user(&self, user: NewUser) -> Result<User, SolaceError>;

    async fn get_user(&self, id: UserId) -> Result<Option<User>, SolaceError>;

    async fn find_user_by_phone(&self, phone_number: &str) -> Result<Option<User>, SolaceError>;

    /// Active, phone-verified users with no message sent or received at or
    /// after `since`.
    async fn idle_users(&self, since: DateTime<Utc>) -> Result<Vec<User>, SolaceError>;
}

/// Conversation persistence.
#[async_trait]
pub trait ConversationRepository: Send + Sync {
    async fn create_conversation(
        &self,
        user_id: UserId,
        start_time: DateTime<Utc>,
    ) -> Result<Conversation, SolaceError>;

    async fn get_conversation(
        &self,
        id: ConversationId,
    ) -> Result<Option<Conversation>, SolaceError>;

    /// Set `end_time`. Fails with `NotFound` for an unknown id.
    async fn end_conversation(
        &self,
        id: ConversationId,
        end_time: DateTime<Utc>,
    ) -> Result<(), SolaceError>;
}

/// Message persistence and history queries.
#[async_trait]
pub trait MessageRepository: Send + Sync {
    async fn create_message(&self, message: NewMessage) -> Result<Message, SolaceError>;

    async fn get_message(&self, id: MessageId) -> Result<Option<Message>, SolaceError>;

    async fn find_by_reference(&self, reference_id: &str) -> Result<Option<Message>, SolaceError>;

    /// Persist `status`, `reference_id`, `sent_at`, and `received_at`.
    async fn update_message(&self, message: &Message) -> Result<(), SolaceError>;

    /// All messages of one conversation, oldest first.
    async fn conversation_messages(
        &self,
        conversation_id: ConversationId,
    ) -> Result<Vec<Message>, SolaceError>;

    /// Up to `limit` most recent messages sent or received by `user`, newest first.
    async fn recent_messages(&self, user: UserId, limit: usize)
    -> Result<Vec<Message>, SolaceError>;

    /// Up to `limit` messages sampled at random from `user`'s history strictly
    /// older than `before` (when given), newest first. With `authored_only`
    /// only messages written by `user` are eligible.
    async fn sample_older_messages(
        &self,
        user: UserId,
        before: Option<&Message>,
        limit: usize,
        authored_only: bool,
    ) -> Result<Vec<Message>, SolaceError>;

    /// Outbound messages from `sender` still in `Sending` without a
    /// reference id, created before `before`.
    async fn stale_unsent(
        &self,
        sender: UserId,
        before: DateTime<Utc>,
    ) -> Result<Vec<Message>, SolaceError>;
}

/// Credit deductions.
#[async_trait]
pub trait CreditLedger: Send + Sync {
    /// Record a debit. Returns `false` when the message was already charged.
    async fn debit(&self, debit: CreditDebit) -> Result<bool, SolaceError>;
}

/// Emotion score persistence.
#[async_trait]
pub trait EmotionRepository: Send + Sync {
    async fn save_scores(
        &self,
        user_id: UserId,
        message_id: MessageId,
        scores: &EmotionScores,
    ) -> Result<(), SolaceError>;
}

/// Durable at-least-once work queue.
#[async_trait]
pub trait WorkQueue: Send + Sync {
    async fn enqueue(&self, queue_name: &str, payload: &str) -> Result<i64, SolaceError>;

    /// Claim the oldest pending entry, if any.
    async fn dequeue(&self, queue_name: &str) -> Result<Option<QueueEntry>, SolaceError>;

    /// Mark an entry completed.
    async fn ack(&self, id: i64) -> Result<(), SolaceError>;

    /// Record a failed attempt; the entry is retried until its attempts run out.
    async fn fail(&self, id: i64) -> Result<(), SolaceError>;
}
