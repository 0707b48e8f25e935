//! Key-value store contract and its SQLite implementation.

use crate::db::DbError;
use log::{debug, error};
use rusqlite::{params, Connection, OptionalExtension};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Store key holding the full card map (`id -> Card`).
pub const CARDS_KEY: &str = "leadboard.cards";
/// Store key holding the record mirror (`{deals, orders}`).
pub const RECORDS_KEY: &str = "leadboard.records";

pub type StoreResult<T> = Result<T, StoreError>;

/// Durable storage failure.
#[derive(Debug)]
pub enum StoreError {
    Db(DbError),
    /// Blob could not be encoded or the persisted blob is malformed.
    Serialization {
        key: String,
        source: serde_json::Error,
    },
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Serialization { key, source } => {
                write!(f, "invalid blob under store key `{key}`: {source}")
            }
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Serialization { source, .. } => Some(source),
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Raw string-valued key-value storage.
pub trait KvStore {
    fn get_raw(&self, key: &str) -> StoreResult<Option<String>>;
    fn put_raw(&self, key: &str, value: &str) -> StoreResult<()>;
}

/// Reads and decodes a JSON blob; `None` when the key was never written.
pub fn load_json<S, T>(store: &S, key: &str) -> StoreResult<Option<T>>
where
    S: KvStore + ?Sized,
    T: DeserializeOwned,
{
    match store.get_raw(key)? {
        Some(raw) => serde_json::from_str(&raw)
            .map(Some)
            .map_err(|source| StoreError::Serialization {
                key: key.to_string(),
                source,
            }),
        None => Ok(None),
    }
}

/// Encodes `value` as JSON and overwrites the blob under `key`.
pub fn save_json<S, T>(store: &S, key: &str, value: &T) -> StoreResult<()>
where
    S: KvStore + ?Sized,
    T: Serialize + ?Sized,
{
    let raw = serde_json::to_string(value).map_err(|source| StoreError::Serialization {
        key: key.to_string(),
        source,
    })?;
    store.put_raw(key, &raw)
}

/// SQLite-backed store over the `kv_entries` table.
#[derive(Clone, Copy)]
pub struct SqliteKvStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteKvStore<'conn> {
    /// Wraps a connection returned by `open_db`/`open_db_in_memory`.
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl KvStore for SqliteKvStore<'_> {
    fn get_raw(&self, key: &str) -> StoreResult<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM kv_entries WHERE key = ?1;",
                [key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn put_raw(&self, key: &str, value: &str) -> StoreResult<()> {
        let result = self.conn.execute(
            "INSERT INTO kv_entries (key, value, updated_at)
             VALUES (?1, ?2, strftime('%s', 'now') * 1000)
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at;",
            params![key, value],
        );

        match result {
            Ok(_) => {
                debug!(
                    "event=store_write module=store status=ok key={} bytes={}",
                    key,
                    value.len()
                );
                Ok(())
            }
            Err(err) => {
                error!(
                    "event=store_write module=store status=error key={} error_code=store_write_failed error={}",
                    key, err
                );
                Err(err.into())
            }
        }
    }
}
