use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::FeedImage;

/// A feed snapshot: ordered images plus the moment they were captured.
///
/// Order of `feed` is significant and is preserved by every store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachedFeed {
    pub feed: Vec<FeedImage>,
    pub timestamp: DateTime<Utc>,
}

impl CachedFeed {
    pub fn new(feed: Vec<FeedImage>, timestamp: DateTime<Utc>) -> Self {
        Self { feed, timestamp }
    }

    pub fn is_empty(&self) -> bool {
        self.feed.is_empty()
    }

    pub fn len(&self) -> usize {
        self.feed.len()
    }
}
