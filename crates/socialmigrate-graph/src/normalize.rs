//! Conversion of Graph API feed entries into [`Post`]s.

use chrono::{DateTime, FixedOffset, Utc};
use socialmigrate_core::Post;

use crate::types::FeedItem;

/// Author name used when the feed entry carries no `from` object.
pub const DEFAULT_AUTHOR: &str = "Me";

/// Parses a Graph `created_time` (`2019-05-12T18:30:00+0000`, or RFC 3339)
/// and returns its UTC calendar date as `YYYY-MM-DD`.
///
/// Returns `None` if the timestamp matches neither format.
#[must_use]
pub fn normalize_created_time(raw: &str) -> Option<String> {
    let parsed: DateTime<FixedOffset> = DateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%z")
        .or_else(|_| DateTime::parse_from_rfc3339(raw))
        .ok()?;
    Some(
        parsed
            .with_timezone(&Utc)
            .date_naive()
            .format("%Y-%m-%d")
            .to_string(),
    )
}

/// Converts a feed entry into a [`Post`].
///
/// Text is taken from `message`, falling back to `story`. Entries with no
/// text or an unparseable `created_time` yield `None`.
#[must_use]
pub fn normalize_feed_item(item: FeedItem) -> Option<Post> {
    let content = [item.message, item.story]
        .into_iter()
        .flatten()
        .find(|text| !text.trim().is_empty())?;

    let Some(date) = item.created_time.as_deref().and_then(normalize_created_time) else {
        tracing::warn!(
            post_id = %item.id,
            created_time = ?item.created_time,
            "skipping feed item with unparseable created_time"
        );
        return None;
    };

    let like_count = item
        .reactions
        .and_then(|r| r.summary)
        .and_then(|s| s.total_count)
        .unwrap_or(0);

    let original_author = item
        .from
        .and_then(|f| f.name)
        .unwrap_or_else(|| DEFAULT_AUTHOR.to_string());

    Some(Post {
        id: item.id,
        content,
        date,
        like_count,
        image_url: item.full_picture,
        original_author,
    })
}
