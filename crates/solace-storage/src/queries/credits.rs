// SPDX-FileCopyrightText: 2026 Solace Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Credit ledger. At most one debit is ever recorded per message.

use rusqlite::params;
use solace_core::SolaceError;
use solace_core::types::{CreditDebit, MessageId, UserId};

use crate::database::Database;

/// Record a debit. Returns `false` when the message was already debited.
pub async fn debit(db: &Database, debit: CreditDebit) -> Result<bool, SolaceError> {
    let inserted = db
        .connection()
        .call(move |conn| {
            conn.execute(
                "INSERT OR IGNORE INTO credit_debits (user_id, conversation_id, message_id, amount)
                 VALUES (?1, ?2, ?3, ?4)",
                params![
                    debit.user_id.0,
                    debit.conversation_id.0,
                    debit.message_id.0,
                    debit.amount
                ],
            )
        })
        .await
        .map_err(crate::database::map_tr_err)?;
    Ok(inserted == 1)
}

/// Number of debits recorded against a message (0 or 1).
pub async fn debits_for_message(db: &Database, message_id: MessageId) -> Result<u64, SolaceError> {
    let count: i64 = db
        .connection()
        .call(move |conn| {
            conn.query_row(
                "SELECT COUNT(*) FROM credit_debits WHERE message_id = ?1",
                params![message_id.0],
                |row| row.get(0),
            )
        })
        .await
        .map_err(crate::database::map_tr_err)?;
    Ok(count.max(0) as u64)
}

/// Sum of all debits charged to a user.
pub async fn total_debited(db: &Database, user_id: UserId) -> Result<f64, SolaceError> {
    db.connection()
        .call(move |conn| {
            conn.query_row(
                "SELECT COALESCE(SUM(amount), 0.0) FROM credit_debits WHERE user_id = ?1",
                params![user_id.0],
                |row| row.get(0),
            )
        })
        .await
        .map_err(crate::database::map_tr_err)
}
