//! feedcache-types - Shared value types for feedcache
//!
//! Plain serde-serializable records. Nothing here knows how a feed is
//! persisted; the storage representation lives in feedcache-core.
//!
//! Used by:
//! - feedcache-core (cache store)
//! - feedcache (command-line front end)

pub mod models;

pub use models::{CachedFeed, FeedImage};
