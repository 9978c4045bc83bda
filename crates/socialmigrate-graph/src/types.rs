//! Graph API response types.
//!
//! Only the fields requested by [`crate::GraphClient`] are modeled. Collection
//! endpoints wrap their items in `{"data": [...]}`; [`Paged`] captures that
//! envelope. Optional nested objects are all `#[serde(default)]` because the
//! API omits fields the token has no permission to read.

use serde::{Deserialize, Serialize};

/// Collection envelope: `{ "data": [ ... ] }`.
#[derive(Debug, Deserialize)]
pub struct Paged<T> {
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
}

// ---------------------------------------------------------------------------
// me?fields=id,name,picture
// ---------------------------------------------------------------------------

/// Response of the `me` profile lookup.
#[derive(Debug, Deserialize)]
pub struct ProfileResponse {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub picture: Option<Picture>,
}

/// `picture` object: `{ "data": { "url": "..." } }`.
#[derive(Debug, Deserialize)]
pub struct Picture {
    #[serde(default)]
    pub data: Option<PictureData>,
}

#[derive(Debug, Deserialize)]
pub struct PictureData {
    #[serde(default)]
    pub url: Option<String>,
}

impl Picture {
    pub(crate) fn url(&self) -> Option<&str> {
        self.data.as_ref().and_then(|d| d.url.as_deref())
    }
}

// ---------------------------------------------------------------------------
// me/accounts
// ---------------------------------------------------------------------------

/// A page the user manages, with the page-scoped access token.
#[derive(Debug, Deserialize)]
pub struct ManagedPage {
    pub id: String,
    pub name: String,
    pub access_token: String,
    #[serde(default)]
    pub picture: Option<Picture>,
}

// ---------------------------------------------------------------------------
// {account}/feed
// ---------------------------------------------------------------------------

/// One feed entry as returned by the feed endpoint.
#[derive(Debug, Deserialize)]
pub struct FeedItem {
    pub id: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub story: Option<String>,
    #[serde(default)]
    pub created_time: Option<String>,
    #[serde(default)]
    pub full_picture: Option<String>,
    #[serde(default)]
    pub reactions: Option<ReactionSummary>,
    #[serde(default)]
    pub from: Option<FeedAuthor>,
}

/// `reactions.summary(true)` object.
#[derive(Debug, Deserialize)]
pub struct ReactionSummary {
    #[serde(default)]
    pub summary: Option<ReactionTotals>,
}

#[derive(Debug, Deserialize)]
pub struct ReactionTotals {
    #[serde(default)]
    pub total_count: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub struct FeedAuthor {
    #[serde(default)]
    pub name: Option<String>,
}

// ---------------------------------------------------------------------------
// POST {page}/feed
// ---------------------------------------------------------------------------

/// Body of a page feed publish request.
#[derive(Debug, Serialize)]
pub struct PublishRequest<'a> {
    pub message: &'a str,
    pub access_token: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
pub struct PublishResponse {
    pub id: String,
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Error envelope: `{ "error": { "message": "...", "type": "...", "code": 190 } }`.
#[derive(Debug, Deserialize)]
pub struct ErrorEnvelope {
    #[serde(default)]
    pub error: Option<ErrorBody>,
}

#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub code: Option<i64>,
}
