//! feedcache-core - Core library for feedcache
//!
//! Persists exactly one feed snapshot (ordered images plus a timestamp) in an
//! embedded SQLite database and exposes retrieve / insert / delete through the
//! [`FeedStore`] trait. All operations on a [`FeedCacheStore`] run one at a time,
//! in call order, on a dedicated worker thread that owns the connection.

pub mod cache;
pub mod config;
pub mod error;
pub mod records;
pub mod store;

pub use cache::FeedCacheStore;
pub use config::{FeedStoreConfig, StoreLocation};
pub use error::FeedStoreError;
pub use feedcache_types::{CachedFeed, FeedImage};
pub use store::{
    CacheRetrieval, DeletionCompletion, DeletionResult, FeedStore, FeedStoreExt,
    InsertionCompletion, InsertionResult, RetrievalCompletion, RetrievalResult,
};
