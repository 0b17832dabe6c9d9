// SPDX-FileCopyrightText: 2026 Solace Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! User lookups.

use chrono::{DateTime, Utc};
use rusqlite::{OptionalExtension, Row, params};
use solace_core::SolaceError;
use solace_core::types::{AccountStatus, NewUser, User, UserId, format_timestamp};

use crate::database::Database;
use crate::queries::timestamp;

const USER_COLUMNS: &str = "id, first_name, last_name, email, phone_number, phone_verified,
                            nudge_enabled, account_status, created_at";

fn map_user(row: &Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: UserId(row.get(0)?),
        first_name: row.get(1)?,
        last_name: row.get(2)?,
        email: row.get(3)?,
        phone_number: row.get(4)?,
        phone_verified: row.get(5)?,
        nudge_enabled: row.get(6)?,
        status: AccountStatus::from_id(row.get(7)?),
        created_at: timestamp(row, 8)?,
    })
}

/// Insert a user and return the stored row.
pub async fn create_user(db: &Database, user: NewUser) -> Result<User, SolaceError> {
    let created_at = format_timestamp(Utc::now());
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO users (id, first_name, last_name, email, phone_number,
                                    phone_verified, nudge_enabled, account_status, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                params![
                    user.id.map(|id| id.0),
                    user.first_name,
                    user.last_name,
                    user.email,
                    user.phone_number,
                    user.phone_verified,
                    user.nudge_enabled,
                    user.status.id(),
                    created_at,
                ],
            )?;
            let id = conn.last_insert_rowid();
            conn.query_row(
                &format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1"),
                params![id],
                map_user,
            )
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Get a user by ID.
pub async fn get_user(db: &Database, id: UserId) -> Result<Option<User>, SolaceError> {
    db.connection()
        .call(move |conn| {
            conn.query_row(
                &format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1"),
                params![id.0],
                map_user,
            )
            .optional()
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Get a user by E.164 phone number.
pub async fn find_user_by_phone(db: &Database, phone: &str) -> Result<Option<User>, SolaceError> {
    let phone = phone.to_string();
    db.connection()
        .call(move |conn| {
            conn.query_row(
                &format!("SELECT {USER_COLUMNS} FROM users WHERE phone_number = ?1"),
                params![phone],
                map_user,
            )
            .optional()
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Active, phone-verified users with no message in either direction at or after `since`.
pub async fn idle_users(db: &Database, since: DateTime<Utc>) -> Result<Vec<User>, SolaceError> {
    let since = format_timestamp(since);
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {USER_COLUMNS} FROM users u
                 WHERE u.account_status = ?1
                   AND u.phone_verified = 1
                   AND NOT EXISTS (
                       SELECT 1 FROM messages m
                       WHERE (m.from_user_id = u.id OR m.to_user_id = u.id)
                         AND m.created_at >= ?2
                   )
                 ORDER BY u.id ASC"
            ))?;
            let rows = stmt.query_map(params![AccountStatus::Active.id(), since], map_user)?;
            rows.collect::<Result<Vec<_>, _>>()
        })
        .await
        .map_err(crate::database::map_tr_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queries::fixtures::{new_user, seed_pair, setup_db};
    use crate::queries::{conversations, messages};
    use chrono::Duration;
    use solace_core::MessageStatus;
    use solace_core::types::{MessageType, NewMessage};

    #[tokio::test]
    async fn create_and_lookup_user() {
        let (db, _dir) = setup_db().await;
        let (system, user) = seed_pair(&db).await;
        assert_eq!(system.id, UserId(1));

        let by_id = get_user(&db, user.id).await.unwrap().unwrap();
        assert_eq!(by_id.first_name, "Dana");
        assert_eq!(by_id.status, AccountStatus::Active);

        let by_phone = find_user_by_phone(&db, "+15550000002").await.unwrap();
        assert_eq!(by_phone.map(|u| u.id), Some(user.id));

        assert!(find_user_by_phone(&db, "+15559999999").await.unwrap().is_none());
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn duplicate_phone_is_rejected() {
        let (db, _dir) = setup_db().await;
        create_user(&db, new_user(None, "A", "+15550000003")).await.unwrap();
        let dup = create_user(&db, new_user(None, "B", "+15550000003")).await;
        assert!(matches!(dup, Err(SolaceError::Storage { .. })));
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn idle_users_excludes_recent_and_unverified() {
        let (db, _dir) = setup_db().await;
        let (system, active) = seed_pair(&db).await;

        let mut unverified = new_user(None, "Uma", "+15550000004");
        unverified.phone_verified = false;
        create_user(&db, unverified).await.unwrap();

        let mut suspended = new_user(None, "Sam", "+15550000005");
        suspended.status = AccountStatus::Suspended;
        create_user(&db, suspended).await.unwrap();

        let quiet = create_user(&db, new_user(None, "Quinn", "+15550000006"))
            .await
            .unwrap();

        // `active` just talked to the agent.
        let conv = conversations::create_conversation(&db, active.id, Utc::now())
            .await
            .unwrap();
        messages::create_message(
            &db,
            NewMessage {
                conversation_id: conv.id,
                from_user_id: active.id,
                to_user_id: system.id,
                body: "hey".into(),
                message_type: MessageType::Sms,
                status: MessageStatus::Received,
                reference_id: None,
                sent_at: None,
                received_at: Some(Utc::now()),
            },
        )
        .await
        .unwrap();

        let since = Utc::now() - Duration::hours(7);
        let idle: Vec<UserId> = idle_users(&db, since)
            .await
            .unwrap()
            .into_iter()
            .map(|u| u.id)
            .collect();

        // The system account took part in the exchange, so it is not idle either.
        assert_eq!(idle, vec![quiet.id]);
        db.close().await.unwrap();
    }
}
