//! SQLite persistence for the feed snapshot
//!
//! Schema:
//! - feed_cache: at most one row (slot is pinned to 0), holds the timestamp
//! - feed_images: one row per image, `position` keeps insertion order
//!
//! Every write is a single IMMEDIATE transaction. An error anywhere inside it
//! drops the transaction, which rolls back, so readers only ever see the old
//! snapshot or the complete new one.

use crate::config::{FeedStoreConfig, StoreLocation};
use crate::error::FeedStoreError;
use crate::records::{StoredFeedImage, StoredSnapshot};
use rusqlite::{params, Connection, OpenFlags, OptionalExtension, TransactionBehavior};
use tracing::{debug, warn};

const SCHEMA: &str = r#"
    CREATE TABLE IF NOT EXISTS feed_cache (
        slot INTEGER PRIMARY KEY CHECK (slot = 0),
        timestamp TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS feed_images (
        position INTEGER PRIMARY KEY,
        id TEXT NOT NULL,
        description TEXT,
        location TEXT,
        url TEXT NOT NULL
    );
"#;

/// Open (and, unless read-only, initialize) the database described by `config`
pub fn open(config: &FeedStoreConfig) -> Result<Connection, FeedStoreError> {
    let open_err = |source: rusqlite::Error| FeedStoreError::Open {
        location: config.location.clone(),
        source,
    };

    if let StoreLocation::File(path) = &config.location {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            if !config.read_only {
                std::fs::create_dir_all(parent).map_err(|source| FeedStoreError::CreateDir {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }
    }

    let flags = if config.read_only {
        OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_URI | OpenFlags::SQLITE_OPEN_NO_MUTEX
    } else {
        OpenFlags::SQLITE_OPEN_READ_WRITE
            | OpenFlags::SQLITE_OPEN_CREATE
            | OpenFlags::SQLITE_OPEN_URI
            | OpenFlags::SQLITE_OPEN_NO_MUTEX
    };

    let conn = Connection::open_with_flags(config.location.sqlite_target(), flags).map_err(open_err)?;
    conn.busy_timeout(config.busy_timeout).map_err(open_err)?;

    if !config.read_only {
        if config.wal && !config.location.is_in_memory() {
            conn.pragma_update(None, "journal_mode", "WAL").map_err(open_err)?;
        }
        conn.execute_batch(SCHEMA).map_err(open_err)?;
    }

    debug!(location = %config.location, read_only = config.read_only, "Feed cache database opened");
    Ok(conn)
}

/// Flush the WAL back into the main file before the connection goes away
pub fn close(conn: Connection, config: &FeedStoreConfig) {
    if config.wal && !config.read_only && !config.location.is_in_memory() {
        if let Err(e) = conn.pragma_update(None, "wal_checkpoint", "TRUNCATE") {
            warn!("Failed to checkpoint WAL on feed cache close: {}", e);
        } else {
            debug!("WAL checkpoint completed on feed cache close");
        }
    }

    if let Err((_, e)) = conn.close() {
        warn!(error = %e, "Failed to close feed cache database");
    }
}

/// Load the stored snapshot, if any, from one consistent read
pub fn load(conn: &mut Connection) -> Result<Option<StoredSnapshot>, FeedStoreError> {
    let tx = conn.transaction().map_err(FeedStoreError::ReadFailed)?;

    let timestamp: Option<String> = tx
        .query_row("SELECT timestamp FROM feed_cache WHERE slot = 0", [], |row| {
            row.get(0)
        })
        .optional()
        .map_err(FeedStoreError::ReadFailed)?;

    let Some(timestamp) = timestamp else {
        return Ok(None);
    };

    let images = {
        let mut stmt = tx
            .prepare_cached(
                "SELECT id, description, location, url FROM feed_images ORDER BY position",
            )
            .map_err(FeedStoreError::ReadFailed)?;

        let rows = stmt
            .query_map([], |row| {
                Ok(StoredFeedImage {
                    id: row.get(0)?,
                    description: row.get(1)?,
                    location: row.get(2)?,
                    url: row.get(3)?,
                })
            })
            .map_err(FeedStoreError::ReadFailed)?;

        rows.collect::<Result<Vec<_>, _>>()
            .map_err(FeedStoreError::ReadFailed)?
    };

    Ok(Some(StoredSnapshot { images, timestamp }))
}

/// Replace the stored snapshot in one transaction
pub fn replace(conn: &mut Connection, snapshot: &StoredSnapshot) -> Result<(), FeedStoreError> {
    let tx = conn
        .transaction_with_behavior(TransactionBehavior::Immediate)
        .map_err(FeedStoreError::WriteFailed)?;

    clear_tables(&tx).map_err(FeedStoreError::WriteFailed)?;

    tx.execute(
        "INSERT INTO feed_cache (slot, timestamp) VALUES (0, ?1)",
        params![snapshot.timestamp],
    )
    .map_err(FeedStoreError::WriteFailed)?;

    {
        let mut stmt = tx
            .prepare_cached(
                "INSERT INTO feed_images (position, id, description, location, url)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
            )
            .map_err(FeedStoreError::WriteFailed)?;

        for (position, image) in snapshot.images.iter().enumerate() {
            stmt.execute(params![
                position as i64,
                image.id,
                image.description.as_deref(),
                image.location.as_deref(),
                image.url,
            ])
            .map_err(FeedStoreError::WriteFailed)?;
        }
    }

    tx.commit().map_err(FeedStoreError::WriteFailed)
}

/// Remove the stored snapshot in one transaction
pub fn clear(conn: &mut Connection) -> Result<(), FeedStoreError> {
    let tx = conn
        .transaction_with_behavior(TransactionBehavior::Immediate)
        .map_err(FeedStoreError::WriteFailed)?;

    clear_tables(&tx).map_err(FeedStoreError::WriteFailed)?;

    tx.commit().map_err(FeedStoreError::WriteFailed)
}

fn clear_tables(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute("DELETE FROM feed_images", [])?;
    conn.execute("DELETE FROM feed_cache", [])?;
    Ok(())
}
