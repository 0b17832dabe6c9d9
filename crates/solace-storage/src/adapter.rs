// SPDX-FileCopyrightText: 2026 Solace Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of the storage and repository traits.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::OnceCell;
use tracing::{debug, info};

use solace_config::model::StorageConfig;
use solace_core::types::{
    AccountStatus, Conversation, ConversationId, CreditDebit, EmotionScores, Message, MessageId,
    NewMessage, NewUser, QueueEntry, SystemAccount, User, UserId,
};
use solace_core::{
    AdapterType, ConversationRepository, CreditLedger, EmotionRepository, HealthStatus,
    MessageRepository, PluginAdapter, SolaceError, StorageAdapter, UserRepository, WorkQueue,
};

use crate::database::Database;
use crate::queries;

/// SQLite-backed storage.
///
/// The database is opened lazily by [`StorageAdapter::initialize`]; every
/// other call fails with a storage error until then.
pub struct SqliteStorage {
    config: StorageConfig,
    db: OnceCell<Database>,
}

impl SqliteStorage {
    pub fn new(config: StorageConfig) -> Self {
        Self {
            config,
            db: OnceCell::new(),
        }
    }

    /// The underlying database handle.
    pub fn database(&self) -> Result<&Database, SolaceError> {
        self.db.get().ok_or_else(|| SolaceError::Storage {
            source: "storage not initialized -- call initialize() first".into(),
        })
    }

    /// Make sure the agent's own user row exists and matches `system`.
    ///
    /// Creates it on first start. An existing row with a different phone
    /// number is a configuration error.
    pub async fn ensure_system_user(
        &self,
        system: &SystemAccount,
        display_name: &str,
    ) -> Result<User, SolaceError> {
        let db = self.database()?;
        if let Some(user) = queries::users::get_user(db, system.user_id).await? {
            if user.phone_number != system.phone_number {
                return Err(SolaceError::Config(format!(
                    "system user {} has phone {}, configured {}",
                    user.id, user.phone_number, system.phone_number
                )));
            }
            return Ok(user);
        }

        let user = queries::users::create_user(
            db,
            NewUser {
                id: Some(system.user_id),
                first_name: display_name.to_string(),
                last_name: String::new(),
                email: None,
                phone_number: system.phone_number.clone(),
                phone_verified: true,
                nudge_enabled: false,
                status: AccountStatus::Active,
            },
        )
        .await?;
        info!(user_id = %user.id, "system user created");
        Ok(user)
    }
}

#[async_trait]
impl PluginAdapter for SqliteStorage {
    fn name(&self) -> &str {
        "sqlite"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Storage
    }

    async fn health_check(&self) -> Result<HealthStatus, SolaceError> {
        let db = self.database()?;
        db.connection()
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.execute_batch("SELECT 1;")?;
                Ok(())
            })
            .await
            .map_err(crate::database::map_tr_err)?;
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), SolaceError> {
        if self.db.get().is_some() {
            self.close().await?;
        }
        Ok(())
    }
}

#[async_trait]
impl StorageAdapter for SqliteStorage {
    async fn initialize(&self) -> Result<(), SolaceError> {
        let path = self.config.database_path.clone();
        let db = Database::open_with(&path, self.config.wal_mode).await?;
        self.db.set(db).map_err(|_| SolaceError::Storage {
            source: "storage already initialized".into(),
        })?;
        debug!(path = %self.config.database_path, "SQLite storage initialized");
        Ok(())
    }

    async fn close(&self) -> Result<(), SolaceError> {
        self.database()?.close().await
    }
}

#[async_trait]
impl UserRepository for SqliteStorage {
    async fn create_user(&self, user: NewUser) -> Result<User, SolaceError> {
        queries::users::create_user(self.database()?, user).await
    }

    async fn get_user(&self, id: UserId) -> Result<Option<User>, SolaceError> {
        queries::users::get_user(self.database()?, id).await
    }

    async fn find_user_by_phone(&self, phone_number: &str) -> Result<Option<User>, SolaceError> {
        queries::users::find_user_by_phone(self.database()?, phone_number).await
    }

    async fn idle_users(&self, since: DateTime<Utc>) -> Result<Vec<User>, SolaceError> {
        queries::users::idle_users(self.database()?, since).await
    }
}

#[async_trait]
impl ConversationRepository for SqliteStorage {
    async fn create_conversation(
        &self,
        user_id: UserId,
        start_time: DateTime<Utc>,
    ) -> Result<Conversation, SolaceError> {
        queries::conversations::create_conversation(self.database()?, user_id, start_time).await
    }

    async fn get_conversation(
        &self,
        id: ConversationId,
    ) -> Result<Option<Conversation>, SolaceError> {
        queries::conversations::get_conversation(self.database()?, id).await
    }

    async fn end_conversation(
        &self,
        id: ConversationId,
        end_time: DateTime<Utc>,
    ) -> Result<(), SolaceError> {
        queries::conversations::end_conversation(self.database()?, id, end_time).await
    }
}

#[async_trait]
impl MessageRepository for SqliteStorage {
    async fn create_message(&self, message: NewMessage) -> Result<Message, SolaceError> {
        queries::messages::create_message(self.database()?, message).await
    }

    async fn get_message(&self, id: MessageId) -> Result<Option<Message>, SolaceError> {
        queries::messages::get_message(self.database()?, id).await
    }

    async fn find_by_reference(&self, reference_id: &str) -> Result<Option<Message>, SolaceError> {
        queries::messages::find_by_reference(self.database()?, reference_id).await
    }

    async fn update_message(&self, message: &Message) -> Result<(), SolaceError> {
        queries::messages::update_message(self.database()?, message).await
    }

    async fn conversation_messages(
        &self,
        conversation_id: ConversationId,
    ) -> Result<Vec<Message>, SolaceError> {
        queries::messages::conversation_messages(self.database()?, conversation_id).await
    }

    async fn recent_messages(
        &self,
        user: UserId,
        limit: usize,
    ) -> Result<Vec<Message>, SolaceError> {
        queries::messages::recent_messages(self.database()?, user, limit).await
    }

    async fn sample_older_messages(
        &self,
        user: UserId,
        before: Option<&Message>,
        limit: usize,
        authored_only: bool,
    ) -> Result<Vec<Message>, SolaceError> {
        queries::messages::sample_older_messages(
            self.database()?,
            user,
            before,
            limit,
            authored_only,
        )
        .await
    }

    async fn stale_unsent(
        &self,
        sender: UserId,
        before: DateTime<Utc>,
    ) -> Result<Vec<Message>, SolaceError> {
        queries::messages::stale_unsent(self.database()?, sender, before).await
    }
}

#[async_trait]
impl CreditLedger for SqliteStorage {
    async fn debit(&self, debit: CreditDebit) -> Result<bool, SolaceError> {
        queries::credits::debit(self.database()?, debit).await
    }
}

#[async_trait]
impl EmotionRepository for SqliteStorage {
    async fn save_scores(
        &self,
        user_id: UserId,
        message_id: MessageId,
        scores: &EmotionScores,
    ) -> Result<(), SolaceError> {
        queries::emotions::save_scores(self.database()?, user_id, message_id, scores).await
    }
}

#[async_trait]
impl WorkQueue for SqliteStorage {
    async fn enqueue(&self, queue_name: &str, payload: &str) -> Result<i64, SolaceError> {
        queries::queue::enqueue(self.database()?, queue_name, payload).await
    }

    async fn dequeue(&self, queue_name: &str) -> Result<Option<QueueEntry>, SolaceError> {
        queries::queue::dequeue(self.database()?, queue_name).await
    }

    async fn ack(&self, id: i64) -> Result<(), SolaceError> {
        queries::queue::ack(self.database()?, id).await
    }

    async fn fail(&self, id: i64) -> Result<(), SolaceError> {
        queries::queue::fail(self.database()?, id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn config(dir: &tempfile::TempDir) -> StorageConfig {
        StorageConfig {
            database_path: dir.path().join("solace.db").display().to_string(),
            wal_mode: true,
        }
    }

    fn system() -> SystemAccount {
        SystemAccount {
            user_id: UserId(1),
            phone_number: "+15550000001".into(),
        }
    }

    #[tokio::test]
    async fn calls_before_initialize_fail() {
        let dir = tempdir().unwrap();
        let storage = SqliteStorage::new(config(&dir));
        let err = storage.get_user(UserId(1)).await.unwrap_err();
        assert!(matches!(err, SolaceError::Storage { .. }));
    }

    #[tokio::test]
    async fn double_initialize_is_rejected() {
        let dir = tempdir().unwrap();
        let storage = SqliteStorage::new(config(&dir));
        storage.initialize().await.unwrap();
        assert!(storage.initialize().await.is_err());
        assert_eq!(storage.health_check().await.unwrap(), HealthStatus::Healthy);
        storage.close().await.unwrap();
    }

    #[tokio::test]
    async fn ensure_system_user_is_idempotent() {
        let dir = tempdir().unwrap();
        let storage = SqliteStorage::new(config(&dir));
        storage.initialize().await.unwrap();

        let first = storage.ensure_system_user(&system(), "Solace").await.unwrap();
        let second = storage.ensure_system_user(&system(), "Solace").await.unwrap();
        assert_eq!(first.id, UserId(1));
        assert_eq!(first, second);
        assert!(!first.nudge_enabled);

        let moved = SystemAccount {
            phone_number: "+15559999999".into(),
            ..system()
        };
        assert!(matches!(
            storage.ensure_system_user(&moved, "Solace").await,
            Err(SolaceError::Config(_))
        ));
        storage.close().await.unwrap();
    }
}
