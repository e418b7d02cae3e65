//! Rendering and input parsing for the feedcache binary

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use comfy_table::{Cell, Color, ContentArrangement, Table};
use feedcache_core::{CachedFeed, FeedImage};
use serde::Deserialize;

/// Accepted import layouts
#[derive(Deserialize)]
#[serde(untagged)]
enum ImportFile {
    Snapshot(CachedFeed),
    Images(Vec<FeedImage>),
}

/// Parse an import file. A bare image array is stamped with `now`.
pub fn parse_import(content: &str, now: DateTime<Utc>) -> Result<CachedFeed> {
    let parsed: ImportFile =
        serde_json::from_str(content).context("Expected a feed snapshot or an array of images")?;

    Ok(match parsed {
        ImportFile::Snapshot(cached) => cached,
        ImportFile::Images(feed) => CachedFeed::new(feed, now),
    })
}

pub fn format_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}

pub fn render_table(cached: &CachedFeed) -> String {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("#").fg(Color::Cyan),
        Cell::new("ID").fg(Color::Cyan),
        Cell::new("Description").fg(Color::Cyan),
        Cell::new("Location").fg(Color::Cyan),
        Cell::new("URL").fg(Color::Cyan),
    ]);

    for (index, image) in cached.feed.iter().enumerate() {
        table.add_row(vec![
            Cell::new(index + 1),
            Cell::new(image.id),
            Cell::new(image.description.as_deref().unwrap_or("-")),
            Cell::new(image.location.as_deref().unwrap_or("-")),
            Cell::new(image.url.as_str()),
        ]);
    }

    format!(
        "Feed captured at {} ({} image(s))\n{}",
        format_timestamp(&cached.timestamp),
        cached.len(),
        table
    )
}
