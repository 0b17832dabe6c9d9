// SPDX-FileCopyrightText: 2026 Solace Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Temp SQLite storage seeded with the system account.

use std::sync::Arc;

use solace_config::model::StorageConfig;
use solace_core::types::{
    AccountStatus, Conversation, EmotionScores, MessageId, NewUser, SystemAccount, User, UserId,
};
use solace_core::{SolaceError, StorageAdapter, UserRepository};
use solace_storage::SqliteStorage;
use solace_storage::queries;

use crate::SYSTEM_PHONE;

/// A migrated database in a temp directory. The directory is removed on drop.
pub struct TestStorage {
    pub storage: Arc<SqliteStorage>,
    system: SystemAccount,
    _temp_dir: tempfile::TempDir,
}

impl TestStorage {
    /// Create the database and insert the system user (id 1).
    pub async fn new() -> Result<Self, SolaceError> {
        let temp_dir =
            tempfile::TempDir::new().map_err(|e| SolaceError::Storage { source: e.into() })?;
        let storage = SqliteStorage::new(StorageConfig {
            database_path: temp_dir.path().join("test.db").display().to_string(),
            wal_mode: true,
        });
        storage.initialize().await?;

        let system = SystemAccount {
            user_id: UserId(1),
            phone_number: SYSTEM_PHONE.to_string(),
        };
        storage.ensure_system_user(&system, "Solace").await?;

        Ok(Self {
            storage: Arc::new(storage),
            system,
            _temp_dir: temp_dir,
        })
    }

    pub fn system(&self) -> SystemAccount {
        self.system.clone()
    }

    /// An active, verified user with nudges enabled.
    pub async fn add_user(&self, first_name: &str, phone: &str) -> Result<User, SolaceError> {
        self.insert_user(first_name, phone, true).await
    }

    /// Same as [`TestStorage::add_user`] with nudges switched off.
    pub async fn add_user_without_nudges(
        &self,
        first_name: &str,
        phone: &str,
    ) -> Result<User, SolaceError> {
        self.insert_user(first_name, phone, false).await
    }

    async fn insert_user(
        &self,
        first_name: &str,
        phone: &str,
        nudge_enabled: bool,
    ) -> Result<User, SolaceError> {
        self.storage
            .create_user(NewUser {
                id: None,
                first_name: first_name.to_string(),
                last_name: "Tester".to_string(),
                email: None,
                phone_number: phone.to_string(),
                phone_verified: true,
                nudge_enabled,
                status: AccountStatus::Active,
            })
            .await
    }

    /// Every conversation owned by `user_id`, oldest first.
    pub async fn conversations_of(&self, user_id: UserId) -> Result<Vec<Conversation>, SolaceError> {
        queries::conversations::conversations_for_user(self.storage.database()?, user_id).await
    }

    /// Number of debits recorded for one message.
    pub async fn debits_for(&self, message_id: MessageId) -> Result<u64, SolaceError> {
        queries::credits::debits_for_message(self.storage.database()?, message_id).await
    }

    /// Sum of credits charged to `user_id`.
    pub async fn total_debited(&self, user_id: UserId) -> Result<f64, SolaceError> {
        queries::credits::total_debited(self.storage.database()?, user_id).await
    }

    /// Emotion scores stored for one message.
    pub async fn emotion_scores_for(
        &self,
        message_id: MessageId,
    ) -> Result<Vec<EmotionScores>, SolaceError> {
        queries::emotions::scores_for_message(self.storage.database()?, message_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn seeds_system_account() {
        let store = TestStorage::new().await.unwrap();
        let system = store.storage.get_user(UserId(1)).await.unwrap().unwrap();
        assert_eq!(system.phone_number, SYSTEM_PHONE);
        assert!(!system.nudge_enabled);

        let user = store.add_user("Dana", "+15550000002").await.unwrap();
        assert!(user.id > system.id);
        assert!(store.conversations_of(user.id).await.unwrap().is_empty());
    }
}
