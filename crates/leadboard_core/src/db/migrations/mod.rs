//! Schema steps for the board database.
//!
//! Each step is a SQL file applied once; the highest applied step is
//! recorded in `PRAGMA user_version`. Steps are append-only and numbered
//! without gaps.

use crate::db::{DbError, DbResult};
use rusqlite::Connection;

/// Schema steps, index `i` is version `i + 1`.
const SCHEMA_STEPS: &[&str] = &[
    // v1: key-value table holding the card map and record mirror blobs.
    include_str!("0001_init.sql"),
];

/// Schema version this build writes.
pub fn latest_version() -> u32 {
    u32::try_from(SCHEMA_STEPS.len()).unwrap_or(u32::MAX)
}

/// Brings `conn` up to [`latest_version`] inside one transaction.
///
/// Refuses databases stamped with a newer version.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    let on_disk: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    let latest = latest_version();

    if on_disk > latest {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: on_disk,
            latest_supported: latest,
        });
    }

    let pending: Vec<(u32, &str)> = (1_u32..)
        .zip(SCHEMA_STEPS.iter().copied())
        .filter(|(version, _)| *version > on_disk)
        .collect();
    if pending.is_empty() {
        return Ok(());
    }

    let tx = conn.transaction()?;
    for (version, sql) in pending {
        tx.execute_batch(sql)?;
        tx.pragma_update(None, "user_version", version)?;
    }
    tx.commit()?;
    Ok(())
}
