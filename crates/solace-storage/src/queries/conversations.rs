// SPDX-FileCopyrightText: 2026 Solace Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversation CRUD operations.

use chrono::{DateTime, Utc};
use rusqlite::{OptionalExtension, params};
use solace_core::SolaceError;
use solace_core::types::{Conversation, ConversationId, UserId, format_timestamp};

use crate::database::Database;
use crate::queries::{opt_timestamp, timestamp};

fn map_conversation(row: &rusqlite::Row<'_>) -> rusqlite::Result<Conversation> {
    Ok(Conversation {
        id: ConversationId(row.get(0)?),
        user_id: UserId(row.get(1)?),
        start_time: timestamp(row, 2)?,
        end_time: opt_timestamp(row, 3)?,
    })
}

/// Open a new conversation for `user_id`.
pub async fn create_conversation(
    db: &Database,
    user_id: UserId,
    start_time: DateTime<Utc>,
) -> Result<Conversation, SolaceError> {
    let start = format_timestamp(start_time);
    let id = db
        .connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO conversations (user_id, start_time) VALUES (?1, ?2)",
                params![user_id.0, start],
            )?;
            Ok(conn.last_insert_rowid())
        })
        .await
        .map_err(crate::database::map_tr_err)?;

    get_conversation(db, ConversationId(id))
        .await?
        .ok_or_else(|| SolaceError::Internal(format!("conversation {id} vanished after insert")))
}

/// Get a conversation by ID.
pub async fn get_conversation(
    db: &Database,
    id: ConversationId,
) -> Result<Option<Conversation>, SolaceError> {
    db.connection()
        .call(move |conn| {
            conn.query_row(
                "SELECT id, user_id, start_time, end_time FROM conversations WHERE id = ?1",
                params![id.0],
                map_conversation,
            )
            .optional()
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Every conversation owned by `user_id`, oldest first.
pub async fn conversations_for_user(
    db: &Database,
    user_id: UserId,
) -> Result<Vec<Conversation>, SolaceError> {
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, user_id, start_time, end_time FROM conversations
                 WHERE user_id = ?1 ORDER BY id ASC",
            )?;
            let rows = stmt.query_map(params![user_id.0], map_conversation)?;
            rows.collect::<Result<Vec<_>, _>>()
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Set `end_time`. Re-closing overwrites the previous end time.
pub async fn end_conversation(
    db: &Database,
    id: ConversationId,
    end_time: DateTime<Utc>,
) -> Result<(), SolaceError> {
    let end = format_timestamp(end_time);
    let updated = db
        .connection()
        .call(move |conn| {
            conn.execute(
                "UPDATE conversations SET end_time = ?1 WHERE id = ?2",
                params![end, id.0],
            )
        })
        .await
        .map_err(crate::database::map_tr_err)?;

    if updated == 0 {
        return Err(SolaceError::not_found("conversation", id));
    }
    Ok(())
}
