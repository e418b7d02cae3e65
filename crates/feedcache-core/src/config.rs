//! Store configuration
//!
//! A store is either backed by a durable SQLite file or by a named in-memory
//! database. Named in-memory databases live in SQLite's `memdb` VFS: every
//! handle opened with the same identifier inside one process sees the same
//! data, and the database vanishes with the last handle, which keeps test runs
//! isolated from each other. `memdb` uses ordinary file locking, so contending
//! handles wait out `busy_timeout` instead of failing on a table lock.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// File name used inside the data directory
pub const DEFAULT_DB_FILE: &str = "feed-cache.db";

/// Where the snapshot lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreLocation {
    /// Durable database file (parent directories are created on open)
    File(PathBuf),
    /// Ephemeral database keyed by an identifier
    InMemory(String),
}

impl StoreLocation {
    /// Name handed to SQLite when opening with URI filenames enabled
    pub(crate) fn sqlite_target(&self) -> String {
        match self {
            StoreLocation::File(path) => path.to_string_lossy().into_owned(),
            StoreLocation::InMemory(id) => {
                let encoded: String = url::form_urlencoded::byte_serialize(id.as_bytes()).collect();
                // the leading slash makes the memdb database visible to other connections
                format!("file:/feedcache-{encoded}?vfs=memdb")
            }
        }
    }

    pub fn is_in_memory(&self) -> bool {
        matches!(self, StoreLocation::InMemory(_))
    }
}

impl fmt::Display for StoreLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreLocation::File(path) => write!(f, "{}", path.display()),
            StoreLocation::InMemory(id) => write!(f, "memory:{id}"),
        }
    }
}

/// Configuration for [`FeedCacheStore`](crate::FeedCacheStore)
#[derive(Debug, Clone)]
pub struct FeedStoreConfig {
    pub location: StoreLocation,

    /// Use WAL journaling for file databases
    pub wal: bool,

    /// How long SQLite waits on a lock held by another connection
    pub busy_timeout: Duration,

    /// Open without write access; every insert / delete fails with `WriteFailed`
    pub read_only: bool,
}

impl Default for FeedStoreConfig {
    fn default() -> Self {
        Self::file(Self::default_path())
    }
}

impl FeedStoreConfig {
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self {
            location: StoreLocation::File(path.into()),
            wal: true,
            busy_timeout: Duration::from_secs(5),
            read_only: false,
        }
    }

    pub fn in_memory(id: impl Into<String>) -> Self {
        Self {
            location: StoreLocation::InMemory(id.into()),
            wal: false,
            busy_timeout: Duration::from_secs(5),
            read_only: false,
        }
    }

    /// `<data_dir>/feedcache/feed-cache.db`, or the bare file name when the
    /// platform has no data directory
    pub fn default_path() -> PathBuf {
        dirs::data_dir()
            .map(|dir| dir.join("feedcache").join(DEFAULT_DB_FILE))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DB_FILE))
    }

    pub fn with_wal(mut self, wal: bool) -> Self {
        self.wal = wal;
        self
    }

    pub fn with_busy_timeout(mut self, timeout: Duration) -> Self {
        self.busy_timeout = timeout;
        self
    }

    pub fn read_only(mut self, read_only: bool) -> Self {
        self.read_only = read_only;
        self
    }

    pub fn path(&self) -> Option<&Path> {
        match &self.location {
            StoreLocation::File(path) => Some(path),
            StoreLocation::InMemory(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_points_at_data_dir_file() {
        let config = FeedStoreConfig::default();
        let path = config.path().expect("default config is file backed");
        assert!(path.ends_with(DEFAULT_DB_FILE));
        assert!(config.wal);
        assert!(!config.read_only);
    }

    #[test]
    fn test_in_memory_target_is_named_memdb_uri() {
        let location = StoreLocation::InMemory("retrieve empty/1".to_string());
        assert_eq!(
            location.sqlite_target(),
            "file:/feedcache-retrieve+empty%2F1?vfs=memdb"
        );
        assert!(location.is_in_memory());
    }

    #[test]
    fn test_builders() {
        let config = FeedStoreConfig::file("/tmp/feed.db")
            .with_wal(false)
            .with_busy_timeout(Duration::from_millis(250))
            .read_only(true);

        assert!(!config.wal);
        assert!(config.read_only);
        assert_eq!(config.busy_timeout, Duration::from_millis(250));
        assert_eq!(config.location.to_string(), "/tmp/feed.db");
    }
}
