// SPDX-FileCopyrightText: 2026 Shelter Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! User lookups. Users exist so adoption requests have a real requester.

use rusqlite::{params, Connection, OptionalExtension};
use shelter_core::types::{NewUser, User};
use shelter_core::UserId;

use super::parse_column;

const USER_COLUMNS: &str =
    "id, username, first_name, last_name, middle_name, role, created_at";

fn user_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: UserId(row.get(0)?),
        username: row.get(1)?,
        first_name: row.get(2)?,
        last_name: row.get(3)?,
        middle_name: row.get(4)?,
        role: parse_column(row, 5)?,
        created_at: row.get(6)?,
    })
}

/// Insert a user. Returns the new id.
pub fn insert_user(conn: &Connection, user: &NewUser) -> rusqlite::Result<UserId> {
    conn.execute(
        "INSERT INTO users (username, first_name, last_name, middle_name, role)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            user.username,
            user.first_name,
            user.last_name,
            user.middle_name,
            user.role.to_string(),
        ],
    )?;
    Ok(UserId(conn.last_insert_rowid()))
}

pub fn count_users(conn: &Connection) -> rusqlite::Result<i64> {
    conn.query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))
}

pub fn get_user(conn: &Connection, id: UserId) -> rusqlite::Result<Option<User>> {
    conn.query_row(
        &format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1"),
        params![id.0],
        user_from_row,
    )
    .optional()
}

pub fn get_user_by_username(conn: &Connection, username: &str) -> rusqlite::Result<Option<User>> {
    conn.query_row(
        &format!("SELECT {USER_COLUMNS} FROM users WHERE username = ?1"),
        params![username],
        user_from_row,
    )
    .optional()
}
