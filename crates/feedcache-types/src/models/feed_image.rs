use serde::{Deserialize, Serialize};
use url::Url;
use uuid::Uuid;

/// A single image of a feed, in its validated value form.
///
/// `id` and `url` are already parsed, so a `FeedImage` can never carry a
/// malformed identifier or a relative URL.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FeedImage {
    pub id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub url: Url,
}

impl FeedImage {
    /// Create an image with no description and no location
    ///
    /// # Examples
    ///
    /// ```
    /// use feedcache_types::FeedImage;
    /// use url::Url;
    /// use uuid::Uuid;
    ///
    /// let image = FeedImage::new(Uuid::nil(), Url::parse("https://example.com/a.png").unwrap())
    ///     .with_description("sunset")
    ///     .with_location("Lisbon");
    ///
    /// assert_eq!(image.description.as_deref(), Some("sunset"));
    /// assert_eq!(image.location.as_deref(), Some("Lisbon"));
    /// ```
    pub fn new(id: Uuid, url: Url) -> Self {
        Self {
            id,
            description: None,
            location: None,
            url,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }
}
