//! [`FeedStore`] implementation over SQLite

use crate::cache::sqlite;
use crate::cache::worker::SerialWorker;
use crate::config::FeedStoreConfig;
use crate::error::FeedStoreError;
use crate::records::StoredSnapshot;
use crate::store::{
    CacheRetrieval, DeletionCompletion, FeedStore, InsertionCompletion, RetrievalCompletion,
};
use chrono::{DateTime, Utc};
use feedcache_types::FeedImage;
use tracing::{debug, info, warn};

/// Persistent single-snapshot feed cache
///
/// Operations may be issued back-to-back from any thread without waiting.
/// Their effects apply, and their completions run, strictly in call order.
/// Completions run on the store's worker thread.
pub struct FeedCacheStore {
    config: FeedStoreConfig,
    worker: SerialWorker,
}

impl FeedCacheStore {
    /// Open or create the store described by `config`
    pub fn open(config: FeedStoreConfig) -> Result<Self, FeedStoreError> {
        let worker = SerialWorker::spawn(config.clone())?;
        info!(location = %config.location, "Feed cache store opened");
        Ok(Self { config, worker })
    }

    /// Open a file store at the platform default location
    pub fn open_default() -> Result<Self, FeedStoreError> {
        Self::open(FeedStoreConfig::default())
    }

    pub fn config(&self) -> &FeedStoreConfig {
        &self.config
    }
}

impl FeedStore for FeedCacheStore {
    fn retrieve(&self, completion: RetrievalCompletion) {
        self.worker.submit(Box::new(move |conn| {
            let result = conn
                .and_then(sqlite::load)
                .and_then(|stored| match stored {
                    Some(snapshot) => snapshot.into_retrieval(),
                    None => Ok(CacheRetrieval::Empty),
                });

            match &result {
                Ok(CacheRetrieval::Found { feed, .. }) => {
                    debug!(images = feed.len(), "Feed cache hit")
                }
                Ok(CacheRetrieval::Empty) => debug!("Feed cache miss"),
                Err(e) => warn!(error = %e, "Feed cache retrieval failed"),
            }

            completion(result);
        }));
    }

    fn insert(
        &self,
        feed: Vec<FeedImage>,
        timestamp: DateTime<Utc>,
        completion: InsertionCompletion,
    ) {
        self.worker.submit(Box::new(move |conn| {
            let snapshot = StoredSnapshot::new(&feed, timestamp);
            let result = conn.and_then(|conn| sqlite::replace(conn, &snapshot));

            match &result {
                Ok(()) => debug!(images = snapshot.images.len(), "Feed cache replaced"),
                Err(e) => warn!(error = %e, "Feed cache insert failed"),
            }

            completion(result);
        }));
    }

    fn delete_cached_feed(&self, completion: DeletionCompletion) {
        self.worker.submit(Box::new(move |conn| {
            let result = conn.and_then(sqlite::clear);

            match &result {
                Ok(()) => debug!("Feed cache cleared"),
                Err(e) => warn!(error = %e, "Feed cache delete failed"),
            }

            completion(result);
        }));
    }
}
