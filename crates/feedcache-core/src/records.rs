//! Persisted form of the feed snapshot
//!
//! Identifiers and URLs are stored as text. Converting back to the value form
//! validates every record; one bad record fails the whole snapshot.

use crate::error::FeedStoreError;
use crate::store::CacheRetrieval;
use chrono::{DateTime, SecondsFormat, Utc};
use feedcache_types::FeedImage;
use url::Url;
use uuid::Uuid;

/// Length of the hyphenated UUID text form, the only form accepted on read
const HYPHENATED_UUID_LEN: usize = 36;

/// One image row as it sits in storage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredFeedImage {
    pub id: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub url: String,
}

impl From<&FeedImage> for StoredFeedImage {
    fn from(image: &FeedImage) -> Self {
        Self {
            id: image.id.hyphenated().to_string(),
            description: image.description.clone(),
            location: image.location.clone(),
            url: image.url.as_str().to_string(),
        }
    }
}

impl StoredFeedImage {
    /// Parse back into a [`FeedImage`]; `position` only feeds the error message
    pub fn into_feed_image(self, position: usize) -> Result<FeedImage, FeedStoreError> {
        let id = parse_hyphenated(&self.id).map_err(|reason| {
            FeedStoreError::invalid_data(format!("images[{position}].id"), reason)
        })?;
        let url = Url::parse(&self.url).map_err(|e| {
            FeedStoreError::invalid_data(format!("images[{position}].url"), e)
        })?;

        Ok(FeedImage {
            id,
            description: self.description,
            location: self.location,
            url,
        })
    }
}

/// Simple, braced and URN forms are rejected even though `Uuid` could parse them
fn parse_hyphenated(raw: &str) -> Result<Uuid, String> {
    if raw.len() != HYPHENATED_UUID_LEN {
        return Err(format!("expected a hyphenated UUID, got {} characters", raw.len()));
    }
    Uuid::try_parse(raw).map_err(|e| e.to_string())
}

/// The whole snapshot as it sits in storage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredSnapshot {
    pub images: Vec<StoredFeedImage>,
    pub timestamp: String,
}

impl StoredSnapshot {
    pub fn new(feed: &[FeedImage], timestamp: DateTime<Utc>) -> Self {
        Self {
            images: feed.iter().map(StoredFeedImage::from).collect(),
            timestamp: encode_timestamp(timestamp),
        }
    }

    /// Map to what `retrieve` reports.
    ///
    /// A snapshot with no images is reported as `Empty`, exactly like a
    /// missing snapshot.
    pub fn into_retrieval(self) -> Result<CacheRetrieval, FeedStoreError> {
        if self.images.is_empty() {
            return Ok(CacheRetrieval::Empty);
        }

        let timestamp = decode_timestamp(&self.timestamp)?;
        let feed = self
            .images
            .into_iter()
            .enumerate()
            .map(|(position, image)| image.into_feed_image(position))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(CacheRetrieval::Found { feed, timestamp })
    }
}

/// RFC 3339 with as many fractional digits as needed, so nanoseconds survive
pub fn encode_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

pub fn decode_timestamp(raw: &str) -> Result<DateTime<Utc>, FeedStoreError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| FeedStoreError::invalid_data("timestamp", e))
}
