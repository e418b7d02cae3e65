//! Feed value records

pub mod cached_feed;
pub mod feed_image;

pub use cached_feed::CachedFeed;
pub use feed_image::FeedImage;
