// SPDX-FileCopyrightText: 2026 Solace Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Typed query modules. Each function takes `&Database` and runs on the
//! single writer thread.

pub mod conversations;
pub mod credits;
pub mod emotions;
pub mod messages;
pub mod queue;
pub mod users;

use chrono::{DateTime, Utc};
use rusqlite::Row;
use rusqlite::types::Type;
use solace_core::types::parse_timestamp;

/// Read a required timestamp column.
pub(crate) fn timestamp(row: &Row<'_>, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    let raw: String = row.get(idx)?;
    parse_timestamp(&raw)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

/// Read a nullable timestamp column.
pub(crate) fn opt_timestamp(row: &Row<'_>, idx: usize) -> rusqlite::Result<Option<DateTime<Utc>>> {
    let raw: Option<String> = row.get(idx)?;
    raw.map(|raw| {
        parse_timestamp(&raw)
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
    })
    .transpose()
}

/// Test fixtures shared by the query module tests.
#[cfg(test)]
pub(crate) mod fixtures {
    use solace_core::types::{AccountStatus, NewUser, User, UserId};
    use tempfile::{TempDir, tempdir};

    use crate::database::Database;

    pub async fn setup_db() -> (Database, TempDir) {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let db = Database::open(db_path.to_str().unwrap()).await.unwrap();
        (db, dir)
    }

    pub fn new_user(id: Option<i64>, first_name: &str, phone: &str) -> NewUser {
        NewUser {
            id: id.map(UserId),
            first_name: first_name.to_string(),
            last_name: String::new(),
            email: None,
            phone_number: phone.to_string(),
            phone_verified: true,
            nudge_enabled: true,
            status: AccountStatus::Active,
        }
    }

    /// System account (id 1) plus one regular user.
    pub async fn seed_pair(db: &Database) -> (User, User) {
        let system = super::users::create_user(db, new_user(Some(1), "Solace", "+15550000001"))
            .await
            .unwrap();
        let user = super::users::create_user(db, new_user(None, "Dana", "+15550000002"))
            .await
            .unwrap();
        (system, user)
    }
}
