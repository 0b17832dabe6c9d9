// SPDX-FileCopyrightText: 2026 Solace Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Message CRUD operations and history queries.

use chrono::{DateTime, Utc};
use rusqlite::{OptionalExtension, Row, params};
use solace_core::types::{
    ConversationId, Message, MessageId, MessageType, NewMessage, UserId, format_timestamp,
};
use solace_core::{MessageStatus, SolaceError};

use crate::database::Database;
use crate::queries::{opt_timestamp, timestamp};

const MESSAGE_COLUMNS: &str = "id, conversation_id, from_user_id, to_user_id, body, message_type,
                               status, reference_id, sent_at, received_at, created_at";

fn map_message(row: &Row<'_>) -> rusqlite::Result<Message> {
    Ok(Message {
        id: MessageId(row.get(0)?),
        conversation_id: ConversationId(row.get(1)?),
        from_user_id: UserId(row.get(2)?),
        to_user_id: UserId(row.get(3)?),
        body: row.get(4)?,
        message_type: MessageType::from_id(row.get(5)?),
        status: MessageStatus::from_id(row.get(6)?),
        reference_id: row.get(7)?,
        sent_at: opt_timestamp(row, 8)?,
        received_at: opt_timestamp(row, 9)?,
        created_at: timestamp(row, 10)?,
    })
}

/// Insert a message and return the stored row.
pub async fn create_message(db: &Database, message: NewMessage) -> Result<Message, SolaceError> {
    let created_at = format_timestamp(Utc::now());
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO messages (conversation_id, from_user_id, to_user_id, body,
                                       message_type, status, reference_id, sent_at,
                                       received_at, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
                params![
                    message.conversation_id.0,
                    message.from_user_id.0,
                    message.to_user_id.0,
                    message.body,
                    message.message_type.id(),
                    message.status.id(),
                    message.reference_id,
                    message.sent_at.map(format_timestamp),
                    message.received_at.map(format_timestamp),
                    created_at,
                ],
            )?;
            let id = conn.last_insert_rowid();
            conn.query_row(
                &format!("SELECT {MESSAGE_COLUMNS} FROM messages WHERE id = ?1"),
                params![id],
                map_message,
            )
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Get a message by ID.
pub async fn get_message(db: &Database, id: MessageId) -> Result<Option<Message>, SolaceError> {
    db.connection()
        .call(move |conn| {
            conn.query_row(
                &format!("SELECT {MESSAGE_COLUMNS} FROM messages WHERE id = ?1"),
                params![id.0],
                map_message,
            )
            .optional()
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Get a message by its transport reference id.
pub async fn find_by_reference(
    db: &Database,
    reference_id: &str,
) -> Result<Option<Message>, SolaceError> {
    let reference_id = reference_id.to_string();
    db.connection()
        .call(move |conn| {
            conn.query_row(
                &format!("SELECT {MESSAGE_COLUMNS} FROM messages WHERE reference_id = ?1"),
                params![reference_id],
                map_message,
            )
            .optional()
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Persist the mutable delivery fields of a message.
pub async fn update_message(db: &Database, message: &Message) -> Result<(), SolaceError> {
    let id = message.id;
    let status = message.status.id();
    let reference_id = message.reference_id.clone();
    let sent_at = message.sent_at.map(format_timestamp);
    let received_at = message.received_at.map(format_timestamp);
    let updated = db
        .connection()
        .call(move |conn| {
            conn.execute(
                "UPDATE messages SET status = ?1, reference_id = ?2, sent_at = ?3, received_at = ?4
                 WHERE id = ?5",
                params![status, reference_id, sent_at, received_at, id.0],
            )
        })
        .await
        .map_err(crate::database::map_tr_err)?;

    if updated == 0 {
        return Err(SolaceError::not_found("message", id));
    }
    Ok(())
}

/// All messages of a conversation, oldest first.
pub async fn conversation_messages(
    db: &Database,
    conversation_id: ConversationId,
) -> Result<Vec<Message>, SolaceError> {
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {MESSAGE_COLUMNS} FROM messages
                 WHERE conversation_id = ?1 ORDER BY created_at ASC, id ASC"
            ))?;
            let rows = stmt.query_map(params![conversation_id.0], map_message)?;
            rows.collect::<Result<Vec<_>, _>>()
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Most recent messages sent or received by `user`, newest first.
pub async fn recent_messages(
    db: &Database,
    user: UserId,
    limit: usize,
) -> Result<Vec<Message>, SolaceError> {
    let limit = limit as i64;
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {MESSAGE_COLUMNS} FROM messages
                 WHERE from_user_id = ?1 OR to_user_id = ?1
                 ORDER BY created_at DESC, id DESC
                 LIMIT ?2"
            ))?;
            let rows = stmt.query_map(params![user.0, limit], map_message)?;
            rows.collect::<Result<Vec<_>, _>>()
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Random sample of `user`'s messages strictly older than `before`, newest first.
pub async fn sample_older_messages(
    db: &Database,
    user: UserId,
    before: Option<&Message>,
    limit: usize,
    authored_only: bool,
) -> Result<Vec<Message>, SolaceError> {
    let limit = limit as i64;
    // (created_at, id) is a total order, so "older" excludes the boundary row.
    let (before_at, before_id) = match before {
        Some(m) => (format_timestamp(m.created_at), m.id.0),
        None => ("9999-12-31T23:59:59.999Z".to_string(), i64::MAX),
    };
    let mut sample = db
        .connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {MESSAGE_COLUMNS} FROM messages
                 WHERE (from_user_id = ?1 OR (?2 = 0 AND to_user_id = ?1))
                   AND (created_at < ?3 OR (created_at = ?3 AND id < ?4))
                 ORDER BY RANDOM()
                 LIMIT ?5"
            ))?;
            let rows = stmt.query_map(
                params![user.0, authored_only, before_at, before_id, limit],
                map_message,
            )?;
            rows.collect::<Result<Vec<_>, _>>()
        })
        .await
        .map_err(crate::database::map_tr_err)?;

    sample.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
    Ok(sample)
}

/// Messages from `sender` still `Sending` without a reference id, created before `before`.
pub async fn stale_unsent(
    db: &Database,
    sender: UserId,
    before: DateTime<Utc>,
) -> Result<Vec<Message>, SolaceError> {
    let before = format_timestamp(before);
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {MESSAGE_COLUMNS} FROM messages
                 WHERE from_user_id = ?1 AND status = ?2 AND reference_id IS NULL
                   AND created_at < ?3
                 ORDER BY id ASC"
            ))?;
            let rows = stmt.query_map(
                params![sender.0, MessageStatus::Sending.id(), before],
                map_message,
            )?;
            rows.collect::<Result<Vec<_>, _>>()
        })
        .await
        .map_err(crate::database::map_tr_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queries::conversations;
    use crate::queries::fixtures::{seed_pair, setup_db};
    use chrono::Duration;
    use solace_core::types::User;

    async fn insert(db: &Database, from: &User, to: &User, body: &str) -> Message {
        let conv = conversations::create_conversation(db, from.id.max(to.id), Utc::now())
            .await
            .unwrap();
        create_message(
            db,
            NewMessage {
                conversation_id: conv.id,
                from_user_id: from.id,
                to_user_id: to.id,
                body: body.into(),
                message_type: MessageType::Sms,
                status: MessageStatus::Received,
                reference_id: None,
                sent_at: None,
                received_at: None,
            },
        )
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn create_update_and_find_by_reference() {
        let (db, _dir) = setup_db().await;
        let (system, user) = seed_pair(&db).await;

        let mut msg = insert(&db, &system, &user, "hello").await;
        assert!(msg.reference_id.is_none());

        msg.reference_id = Some("SM123".into());
        msg.status = MessageStatus::Sent;
        msg.sent_at = Some(Utc::now());
        update_message(&db, &msg).await.unwrap();

        let found = find_by_reference(&db, "SM123").await.unwrap().unwrap();
        assert_eq!(found.id, msg.id);
        assert_eq!(found.status, MessageStatus::Sent);
        assert!(found.sent_at.is_some());
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn reference_ids_are_unique() {
        let (db, _dir) = setup_db().await;
        let (system, user) = seed_pair(&db).await;
        let mut a = insert(&db, &system, &user, "a").await;
        let mut b = insert(&db, &system, &user, "b").await;

        a.reference_id = Some("SMdup".into());
        update_message(&db, &a).await.unwrap();
        b.reference_id = Some("SMdup".into());
        assert!(update_message(&db, &b).await.is_err());
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn recent_messages_newest_first_with_limit() {
        let (db, _dir) = setup_db().await;
        let (system, user) = seed_pair(&db).await;
        for i in 0..5 {
            insert(&db, &user, &system, &format!("m{i}")).await;
        }

        let recent = recent_messages(&db, user.id, 3).await.unwrap();
        let bodies: Vec<_> = recent.iter().map(|m| m.body.as_str()).collect();
        assert_eq!(bodies, vec!["m4", "m3", "m2"]);
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn sample_is_strictly_older_and_respects_authorship() {
        let (db, _dir) = setup_db().await;
        let (system, user) = seed_pair(&db).await;
        for i in 0..6 {
            insert(&db, &user, &system, &format!("u{i}")).await;
            insert(&db, &system, &user, &format!("a{i}")).await;
        }
        let recent = recent_messages(&db, user.id, 4).await.unwrap();
        let boundary = recent.last().unwrap().clone();

        let any = sample_older_messages(&db, user.id, Some(&boundary), 100, false)
            .await
            .unwrap();
        assert_eq!(any.len(), 8);
        assert!(any.iter().all(|m| (m.created_at, m.id) < (boundary.created_at, boundary.id)));
        assert!(any.windows(2).all(|w| (w[0].created_at, w[0].id) > (w[1].created_at, w[1].id)));

        let authored = sample_older_messages(&db, user.id, Some(&boundary), 100, true)
            .await
            .unwrap();
        assert_eq!(authored.len(), 4);
        assert!(authored.iter().all(|m| m.from_user_id == user.id));

        let capped = sample_older_messages(&db, user.id, Some(&boundary), 2, false)
            .await
            .unwrap();
        assert_eq!(capped.len(), 2);
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn stale_unsent_only_returns_old_unreferenced_sends() {
        let (db, _dir) = setup_db().await;
        let (system, user) = seed_pair(&db).await;
        insert(&db, &user, &system, "one").await;
        let mut outbound = insert(&db, &system, &user, "reply").await;
        outbound.status = MessageStatus::Sending;
        update_message(&db, &outbound).await.unwrap();

        let future = Utc::now() + Duration::seconds(5);
        let stale = stale_unsent(&db, system.id, future).await.unwrap();
        assert_eq!(stale.len(), 1);
        assert_eq!(stale[0].id, outbound.id);

        let past = Utc::now() - Duration::hours(1);
        assert!(stale_unsent(&db, system.id, past).await.unwrap().is_empty());
        db.close().await.unwrap();
    }
}
