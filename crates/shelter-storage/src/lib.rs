// SPDX-FileCopyrightText: 2026 Shelter Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite persistence for the shelter adoption workflow.
//!
//! Provides WAL-mode SQLite storage with embedded migrations, a single-writer
//! concurrency model via `tokio-rusqlite`, and typed queries for animals,
//! adoption requests, photos, and users.

pub mod database;
pub mod migrations;
pub mod queries;

pub use database::{begin_immediate, Database, TxError};
