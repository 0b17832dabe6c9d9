// SPDX-FileCopyrightText: 2026 Solace Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Durable work queue backing the generation stage.
//!
//! Entries move `pending -> processing -> completed`, or back to `pending`
//! on a retryable failure until `max_attempts` is reached. A `processing`
//! entry whose lock has expired is handed out again, so a worker that died
//! mid-job does not strand its message.

use rusqlite::{OptionalExtension, Row, params};
use solace_core::SolaceError;
use solace_core::types::QueueEntry;

use crate::database::{Database, map_tr_err};

/// How long a claimed entry stays invisible to other workers.
const LEASE: &str = "+5 minutes";

fn entry_from_row(row: &Row<'_>) -> rusqlite::Result<QueueEntry> {
    Ok(QueueEntry {
        id: row.get("id")?,
        queue_name: row.get("queue_name")?,
        payload: row.get("payload")?,
        status: row.get("status")?,
        attempts: row.get("attempts")?,
        max_attempts: row.get("max_attempts")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
        locked_until: row.get("locked_until")?,
    })
}

/// Append a job to `queue_name` and return its id.
pub async fn enqueue(db: &Database, queue_name: &str, payload: &str) -> Result<i64, SolaceError> {
    let (name, body) = (queue_name.to_owned(), payload.to_owned());
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO queue (queue_name, payload) VALUES (?1, ?2)",
                params![name, body],
            )?;
            Ok(conn.last_insert_rowid())
        })
        .await
        .map_err(map_tr_err)
}

/// Lease the oldest claimable job of `queue_name`, if any.
///
/// Claimable means `pending`, or `processing` with a lapsed lease. The
/// select and the lease happen in one statement.
pub async fn dequeue(db: &Database, queue_name: &str) -> Result<Option<QueueEntry>, SolaceError> {
    let name = queue_name.to_owned();
    db.connection()
        .call(move |conn| {
            let leased = conn
                .query_row(
                    "UPDATE queue
                        SET status = 'processing',
                            locked_until = strftime('%Y-%m-%dT%H:%M:%fZ', 'now', ?2),
                            updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
                      WHERE id = (
                            SELECT id FROM queue
                             WHERE queue_name = ?1
                               AND (status = 'pending'
                                    OR (status = 'processing'
                                        AND locked_until < strftime('%Y-%m-%dT%H:%M:%fZ', 'now')))
                             ORDER BY id
                             LIMIT 1)
                  RETURNING *",
                    params![name, LEASE],
                    entry_from_row,
                )
                .optional()?;
            Ok(leased)
        })
        .await
        .map_err(map_tr_err)
}

/// Job finished; it is never handed out again.
pub async fn ack(db: &Database, id: i64) -> Result<(), SolaceError> {
    settle(db, id, "status = 'completed'").await
}

/// Count a failed attempt. The job goes back to `pending` while attempts
/// remain and to `failed` once they run out.
pub async fn fail(db: &Database, id: i64) -> Result<(), SolaceError> {
    settle(
        db,
        id,
        "attempts = attempts + 1,
         status = IIF(attempts + 1 >= max_attempts, 'failed', 'pending')",
    )
    .await
}

async fn settle(db: &Database, id: i64, assignments: &'static str) -> Result<(), SolaceError> {
    db.connection()
        .call(move |conn| {
            conn.execute(
                &format!(
                    "UPDATE queue SET {assignments}, locked_until = NULL,
                     updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
                     WHERE id = ?1"
                ),
                params![id],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}
