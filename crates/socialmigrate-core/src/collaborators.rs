//! Interfaces to the external services a migration depends on.
//!
//! Implementations are injected into the pipeline as trait objects; the
//! Graph API client and the classifier backends live in their own crates.

use async_trait::async_trait;
use serde::Serialize;

use crate::account::{Credential, PostableTarget, Profile};
use crate::error::{AuthError, ClassifierError, SinkError, SourceFetchError};
use crate::post::Post;

/// Resolves credentials to identities.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Resolve the profile that owns `credential`.
    async fn resolve_profile(&self, credential: &Credential) -> Result<Profile, AuthError>;

    /// List the accounts `credential` may publish to, each with its own
    /// post credential.
    async fn list_postable_targets(
        &self,
        credential: &Credential,
    ) -> Result<Vec<PostableTarget>, AuthError>;
}

/// Fetches one page of historical posts.
#[async_trait]
pub trait ContentSource: Send + Sync {
    /// Returns posts in the source's order. Items without text are dropped,
    /// dates are `YYYY-MM-DD`, missing like counts are `0`.
    async fn fetch_posts(
        &self,
        credential: &Credential,
        account_ref: &str,
        limit: usize,
    ) -> Result<Vec<Post>, SourceFetchError>;
}

/// Publishes one item to a destination account.
#[async_trait]
pub trait ContentSink: Send + Sync {
    /// Returns the remote id of the created item.
    async fn publish(
        &self,
        account_ref: &str,
        credential: &Credential,
        text: &str,
        image_uri: Option<&str>,
    ) -> Result<String, SinkError>;
}

/// The `{id, content}` pair sent to a classifier. Borrowed so a classifier
/// cannot touch the posts it is judging.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Candidate<'a> {
    pub id: &'a str,
    pub content: &'a str,
}

impl<'a> From<&'a Post> for Candidate<'a> {
    fn from(post: &'a Post) -> Self {
        Self {
            id: &post.id,
            content: &post.content,
        }
    }
}

/// Picks the candidates that relate to a topic.
///
/// Results are advisory; callers must tolerate ids they did not send and
/// treat every error as "no opinion".
#[async_trait]
pub trait RelevanceClassifier: Send + Sync {
    async fn classify(
        &self,
        candidates: &[Candidate<'_>],
        topic: &str,
    ) -> Result<Vec<String>, ClassifierError>;
}
