// SPDX-FileCopyrightText: 2026 Shelter Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Database connection management with PRAGMA setup, WAL mode, and lifecycle.
//!
//! All access is serialized through tokio-rusqlite's single background
//! thread. `Database` is that single writer: clones share the same thread.
//! Do NOT create additional Connection instances for writes.

use shelter_config::model::StorageConfig;
use shelter_core::ShelterError;
use thiserror::Error;
use tracing::debug;

use crate::migrations::run_migrations;

/// Failure inside a database closure: either SQL or a business rule.
///
/// Both convert with `?`, so query code and workflow checks can be mixed
/// freely inside [`Database::transaction`].
#[derive(Debug, Error)]
pub enum TxError {
    #[error(transparent)]
    Sql(#[from] rusqlite::Error),
    #[error(transparent)]
    Domain(#[from] ShelterError),
}

/// Convert a tokio-rusqlite error into `ShelterError`.
pub(crate) fn map_tr_err(e: tokio_rusqlite::Error<TxError>) -> ShelterError {
    match e {
        tokio_rusqlite::Error::Error(TxError::Domain(err)) => err,
        tokio_rusqlite::Error::Error(TxError::Sql(err)) => ShelterError::storage(err),
        other => ShelterError::storage(other.to_string()),
    }
}

/// Begin a write transaction that holds the database write lock from the start.
pub fn begin_immediate(conn: &mut rusqlite::Connection) -> rusqlite::Result<rusqlite::Transaction<'_>> {
    conn.transaction_with_behavior(rusqlite::TransactionBehavior::Immediate)
}

/// Handle to the shelter SQLite database.
#[derive(Clone)]
pub struct Database {
    conn: tokio_rusqlite::Connection,
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database").finish_non_exhaustive()
    }
}

impl Database {
    /// Open (creating if needed) the database at `path` in WAL mode and run migrations.
    pub async fn open(path: &str) -> Result<Self, ShelterError> {
        Self::open_with(path, true).await
    }

    /// Open using the `[storage]` configuration section.
    pub async fn open_with_config(config: &StorageConfig) -> Result<Self, ShelterError> {
        Self::open_with(&config.database_path, config.wal_mode).await
    }

    async fn open_with(path: &str, wal_mode: bool) -> Result<Self, ShelterError> {
        if let Some(parent) = std::path::Path::new(path).parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(ShelterError::storage)?;
        }

        let conn = tokio_rusqlite::Connection::open(path)
            .await
            .map_err(ShelterError::storage)?;

        conn.call(move |conn| -> Result<(), TxError> {
            if wal_mode {
                conn.pragma_update(None, "journal_mode", "WAL")?;
            }
            conn.pragma_update(None, "foreign_keys", "ON")?;
            conn.pragma_update(None, "synchronous", "NORMAL")?;
            conn.busy_timeout(std::time::Duration::from_secs(5))?;
            run_migrations(conn)?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)?;

        debug!(path, wal_mode, "database opened");
        Ok(Self { conn })
    }

    /// The underlying tokio-rusqlite connection.
    pub fn connection(&self) -> &tokio_rusqlite::Connection {
        &self.conn
    }

    /// Run `f` on the database thread without an explicit transaction.
    pub async fn call<T, F>(&self, f: F) -> Result<T, ShelterError>
    where
        F: FnOnce(&mut rusqlite::Connection) -> Result<T, TxError> + Send + 'static,
        T: Send + 'static,
    {
        self.conn.call(f).await.map_err(map_tr_err)
    }

    /// Run `f` inside one transaction.
    ///
    /// Commits when `f` returns `Ok`. Any error, SQL or business rule,
    /// drops the transaction, which rolls every write back.
    ///
    /// The transaction is IMMEDIATE: the write lock is taken before `f`
    /// reads anything, so another process writing the same file makes this
    /// one wait (up to the busy timeout) and then read the committed state.
    pub async fn transaction<T, F>(&self, f: F) -> Result<T, ShelterError>
    where
        F: FnOnce(&rusqlite::Transaction<'_>) -> Result<T, TxError> + Send + 'static,
        T: Send + 'static,
    {
        self.call(move |conn| {
            let tx = begin_immediate(conn)?;
            let value = f(&tx)?;
            tx.commit()?;
            Ok(value)
        })
        .await
    }

    /// Checkpoint the WAL and close the connection thread.
    pub async fn close(&self) -> Result<(), ShelterError> {
        self.call(|conn| {
            conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
            Ok(())
        })
        .await?;
        self.conn
            .clone()
            .close()
            .await
            .map_err(|e| ShelterError::storage(e.to_string()))?;
        debug!("database closed");
        Ok(())
    }
}
