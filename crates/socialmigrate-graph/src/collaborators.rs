use async_trait::async_trait;
use socialmigrate_core::{
    AuthError, ContentSink, ContentSource, Credential, IdentityProvider, Post, PostableTarget,
    Profile, SinkError, SourceFetchError,
};

use crate::client::GraphClient;

#[async_trait]
impl IdentityProvider for GraphClient {
    async fn resolve_profile(&self, credential: &Credential) -> Result<Profile, AuthError> {
        self.fetch_profile(credential)
            .await
            .map_err(|e| AuthError::new(e.describe("Failed to fetch profile")))
    }

    async fn list_postable_targets(
        &self,
        credential: &Credential,
    ) -> Result<Vec<PostableTarget>, AuthError> {
        self.fetch_managed_pages(credential)
            .await
            .map_err(|e| AuthError::new(e.describe("Failed to fetch managed pages")))
    }
}

#[async_trait]
impl ContentSource for GraphClient {
    async fn fetch_posts(
        &self,
        credential: &Credential,
        account_ref: &str,
        limit: usize,
    ) -> Result<Vec<Post>, SourceFetchError> {
        self.fetch_feed(credential, account_ref, limit)
            .await
            .map_err(|e| SourceFetchError::new(e.describe("Failed to fetch posts")))
    }
}

#[async_trait]
impl ContentSink for GraphClient {
    async fn publish(
        &self,
        account_ref: &str,
        credential: &Credential,
        text: &str,
        image_uri: Option<&str>,
    ) -> Result<String, SinkError> {
        self.publish_to_feed(account_ref, credential, text, image_uri)
            .await
            .map_err(|e| SinkError::new(e.describe("Failed to publish post")))
    }
}
