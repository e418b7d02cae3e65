//! SQLite-backed feed cache
//!
//! Holds one snapshot per database. All access goes through a single worker
//! thread, so operations never interleave.

pub mod feed_cache_store;
pub mod sqlite;
pub mod worker;

pub use feed_cache_store::FeedCacheStore;
