use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Number of characters kept by [`Post::content_preview`].
pub const PREVIEW_CHARS: usize = 50;

/// A historical post fetched from a content source.
///
/// `id` is unique within one source. `content` is the only field that may
/// change after fetch, and only while the selection is being edited.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: String,
    pub content: String,
    /// Calendar date in `YYYY-MM-DD` form.
    pub date: String,
    pub like_count: u64,
    pub image_url: Option<String>,
    pub original_author: String,
}

impl Post {
    /// First [`PREVIEW_CHARS`] characters of the content, with `...` appended
    /// when the content was cut.
    #[must_use]
    pub fn content_preview(&self) -> String {
        let mut chars = self.content.chars();
        let head: String = chars.by_ref().take(PREVIEW_CHARS).collect();
        if chars.next().is_some() {
            format!("{head}...")
        } else {
            head
        }
    }
}

/// Inclusive date bounds applied to candidate posts before classification.
///
/// A `None` bound imposes no constraint. Bounds are compared as strings,
/// which is exact for `YYYY-MM-DD` dates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    start: Option<String>,
    end: Option<String>,
}

impl DateRange {
    /// Build a range from optional `YYYY-MM-DD` bounds.
    ///
    /// Empty or whitespace-only bounds are treated as absent.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidDate`] if a bound is not a calendar date,
    /// or [`CoreError::InvertedDateRange`] if `start` is after `end`.
    pub fn new(start: Option<&str>, end: Option<&str>) -> Result<Self, CoreError> {
        let start = normalize_bound(start)?;
        let end = normalize_bound(end)?;

        if let (Some(s), Some(e)) = (&start, &end) {
            if s > e {
                return Err(CoreError::InvertedDateRange {
                    start: s.clone(),
                    end: e.clone(),
                });
            }
        }

        Ok(Self { start, end })
    }

    /// A range with no bounds.
    #[must_use]
    pub fn unbounded() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn start(&self) -> Option<&str> {
        self.start.as_deref()
    }

    #[must_use]
    pub fn end(&self) -> Option<&str> {
        self.end.as_deref()
    }

    #[must_use]
    pub fn is_unbounded(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }

    /// Whether `date` falls inside the range, bounds included.
    #[must_use]
    pub fn contains(&self, date: &str) -> bool {
        self.start.as_deref().is_none_or(|s| date >= s)
            && self.end.as_deref().is_none_or(|e| date <= e)
    }

    /// Keep the posts whose date falls inside the range, in input order.
    #[must_use]
    pub fn apply(&self, posts: Vec<Post>) -> Vec<Post> {
        if self.is_unbounded() {
            return posts;
        }
        posts.into_iter().filter(|p| self.contains(&p.date)).collect()
    }
}

fn normalize_bound(raw: Option<&str>) -> Result<Option<String>, CoreError> {
    let Some(value) = raw.map(str::trim).filter(|v| !v.is_empty()) else {
        return Ok(None);
    };
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|e| CoreError::InvalidDate {
        value: value.to_string(),
        reason: e.to_string(),
    })?;
    Ok(Some(value.to_string()))
}
