// SPDX-FileCopyrightText: 2026 Shelter Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Typed queries over the shelter tables.
//!
//! Every function takes a plain `&rusqlite::Connection` so that callers can
//! compose several of them inside one transaction (a `Transaction` derefs
//! to `Connection`).

pub mod adoptions;
pub mod animals;
pub mod photos;
pub mod users;

use std::str::FromStr;

use rusqlite::types::Type;

/// Read a TEXT column and parse it with `FromStr` (status and role enums).
pub(crate) fn parse_column<T>(row: &rusqlite::Row<'_>, idx: usize) -> rusqlite::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let raw: String = row.get(idx)?;
    raw.parse()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

/// Whether `err` is a UNIQUE constraint failure.
pub fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _)
            if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
    )
}
