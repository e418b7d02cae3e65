//! Caller-facing feed store contract
//!
//! Every operation takes a completion that receives exactly one result. The
//! completion runs after the operation's effect has been applied, and
//! implementations deliver results in the order the operations were issued.

use crate::error::FeedStoreError;
use chrono::{DateTime, Utc};
use feedcache_types::{CachedFeed, FeedImage};
use std::future::Future;
use tokio::sync::oneshot;

/// What a successful retrieve observed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheRetrieval {
    /// No snapshot, or a snapshot holding zero images
    Empty,
    Found {
        feed: Vec<FeedImage>,
        timestamp: DateTime<Utc>,
    },
}

impl CacheRetrieval {
    pub fn into_cached_feed(self) -> Option<CachedFeed> {
        match self {
            CacheRetrieval::Empty => None,
            CacheRetrieval::Found { feed, timestamp } => Some(CachedFeed::new(feed, timestamp)),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, CacheRetrieval::Empty)
    }
}

impl From<CachedFeed> for CacheRetrieval {
    fn from(cached: CachedFeed) -> Self {
        if cached.is_empty() {
            CacheRetrieval::Empty
        } else {
            CacheRetrieval::Found {
                feed: cached.feed,
                timestamp: cached.timestamp,
            }
        }
    }
}

pub type RetrievalResult = Result<CacheRetrieval, FeedStoreError>;
pub type InsertionResult = Result<(), FeedStoreError>;
pub type DeletionResult = Result<(), FeedStoreError>;

pub type RetrievalCompletion = Box<dyn FnOnce(RetrievalResult) + Send + 'static>;
pub type InsertionCompletion = Box<dyn FnOnce(InsertionResult) + Send + 'static>;
pub type DeletionCompletion = Box<dyn FnOnce(DeletionResult) + Send + 'static>;

/// Single-snapshot feed cache
pub trait FeedStore: Send + Sync {
    /// Read the current snapshot. Never modifies storage.
    fn retrieve(&self, completion: RetrievalCompletion);

    /// Replace whatever is stored with `feed` captured at `timestamp`.
    fn insert(
        &self,
        feed: Vec<FeedImage>,
        timestamp: DateTime<Utc>,
        completion: InsertionCompletion,
    );

    /// Remove the stored snapshot. Succeeds when nothing is stored.
    fn delete_cached_feed(&self, completion: DeletionCompletion);
}

/// Future-returning variants of [`FeedStore`] operations
///
/// The operation is enqueued when the method is called, not when the future
/// is first polled, so issuing several calls before awaiting any of them keeps
/// their call order.
pub trait FeedStoreExt: FeedStore {
    fn retrieve_async(&self) -> impl Future<Output = RetrievalResult> + Send + 'static {
        let (tx, rx) = oneshot::channel();
        self.retrieve(Box::new(move |result| {
            let _ = tx.send(result);
        }));
        async move { rx.await.unwrap_or(Err(FeedStoreError::WorkerUnavailable)) }
    }

    fn insert_async(
        &self,
        feed: Vec<FeedImage>,
        timestamp: DateTime<Utc>,
    ) -> impl Future<Output = InsertionResult> + Send + 'static {
        let (tx, rx) = oneshot::channel();
        self.insert(
            feed,
            timestamp,
            Box::new(move |result| {
                let _ = tx.send(result);
            }),
        );
        async move { rx.await.unwrap_or(Err(FeedStoreError::WorkerUnavailable)) }
    }

    fn delete_async(&self) -> impl Future<Output = DeletionResult> + Send + 'static {
        let (tx, rx) = oneshot::channel();
        self.delete_cached_feed(Box::new(move |result| {
            let _ = tx.send(result);
        }));
        async move { rx.await.unwrap_or(Err(FeedStoreError::WorkerUnavailable)) }
    }
}

impl<S: FeedStore + ?Sized> FeedStoreExt for S {}
