//! HTTP client for the Graph REST API.
//!
//! Wraps `reqwest` with Graph-specific URL building, error-envelope handling
//! and typed response deserialization. Every non-2xx response is turned into
//! [`GraphError::Api`] carrying the upstream `error.message` when present.

use std::time::Duration;

use reqwest::{Client, Response, Url};
use serde::de::DeserializeOwned;
use socialmigrate_core::{AppConfig, Credential, Post, PostableTarget, Profile};

use crate::error::GraphError;
use crate::normalize::normalize_feed_item;
use crate::types::{
    ErrorEnvelope, FeedItem, ManagedPage, Paged, ProfileResponse, PublishRequest, PublishResponse,
};

const DEFAULT_BASE_URL: &str = "https://graph.facebook.com/";
const DEFAULT_API_VERSION: &str = "v19.0";

/// Avatar used when the API returns no picture.
pub const PLACEHOLDER_AVATAR: &str = "https://via.placeholder.com/100";

const PROFILE_FIELDS: &str = "id,name,picture.type(large)";
const PAGE_FIELDS: &str = "id,name,access_token,picture";
const FEED_FIELDS: &str =
    "id,message,story,created_time,full_picture,reactions.summary(true).limit(0),from";

/// Client for the Graph REST API.
///
/// Use [`GraphClient::new`] for production or [`GraphClient::with_base_url`]
/// to point at a mock server in tests.
pub struct GraphClient {
    client: Client,
    base_url: Url,
    api_version: String,
}

impl GraphClient {
    /// Creates a client pointed at the production Graph API.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(timeout_secs: u64, user_agent: &str) -> Result<Self, GraphError> {
        Self::with_base_url(DEFAULT_BASE_URL, DEFAULT_API_VERSION, timeout_secs, user_agent)
    }

    /// Creates a client from the application configuration.
    ///
    /// # Errors
    ///
    /// See [`GraphClient::with_base_url`].
    pub fn from_config(config: &AppConfig) -> Result<Self, GraphError> {
        Self::with_base_url(
            &config.graph_base_url,
            &config.graph_api_version,
            config.request_timeout_secs,
            &config.user_agent,
        )
    }

    /// Creates a client with a custom base URL and API version.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`GraphError::InvalidUrl`] if `base_url`
    /// is not a valid URL.
    pub fn with_base_url(
        base_url: &str,
        api_version: &str,
        timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, GraphError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised)
            .map_err(|e| GraphError::InvalidUrl(format!("'{normalised}': {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(GraphError::InvalidUrl(format!(
                "'{normalised}' cannot be used as a base URL"
            )));
        }

        Ok(Self {
            client,
            base_url,
            api_version: api_version.trim_matches('/').to_owned(),
        })
    }

    /// Fetches the profile that owns `token`.
    ///
    /// # Errors
    ///
    /// - [`GraphError::Api`] if the token is rejected.
    /// - [`GraphError::Http`] on network failure.
    /// - [`GraphError::Deserialize`] if the response has an unexpected shape.
    pub async fn fetch_profile(&self, token: &Credential) -> Result<Profile, GraphError> {
        let url = self.build_url(
            "me",
            &[("fields", PROFILE_FIELDS), ("access_token", token.expose())],
        )?;
        let body: ProfileResponse = self.get_json(url, "me").await?;

        Ok(Profile {
            avatar_uri: body
                .picture
                .as_ref()
                .and_then(|p| p.url())
                .unwrap_or(PLACEHOLDER_AVATAR)
                .to_string(),
            id: body.id,
            display_name: body.name,
        })
    }

    /// Lists the pages the user behind `token` manages, each with its
    /// page-scoped access token.
    ///
    /// # Errors
    ///
    /// Same as [`GraphClient::fetch_profile`].
    pub async fn fetch_managed_pages(
        &self,
        token: &Credential,
    ) -> Result<Vec<PostableTarget>, GraphError> {
        let url = self.build_url(
            "me/accounts",
            &[("fields", PAGE_FIELDS), ("access_token", token.expose())],
        )?;
        let body: Paged<ManagedPage> = self.get_json(url, "me/accounts").await?;

        let pages = body
            .data
            .into_iter()
            .map(|page| PostableTarget {
                profile: Profile {
                    avatar_uri: page
                        .picture
                        .as_ref()
                        .and_then(|p| p.url())
                        .unwrap_or_default()
                        .to_string(),
                    id: page.id,
                    display_name: page.name,
                },
                post_credential: Credential::new(page.access_token),
            })
            .collect::<Vec<_>>();

        tracing::debug!(count = pages.len(), "fetched managed pages");
        Ok(pages)
    }

    /// Fetches one page of the feed for `account_ref` (`me` or a page id).
    ///
    /// Entries without text are dropped; see [`normalize_feed_item`].
    ///
    /// # Errors
    ///
    /// Same as [`GraphClient::fetch_profile`].
    pub async fn fetch_feed(
        &self,
        token: &Credential,
        account_ref: &str,
        limit: usize,
    ) -> Result<Vec<Post>, GraphError> {
        let path = format!("{account_ref}/feed");
        let limit = limit.to_string();
        let url = self.build_url(
            &path,
            &[
                ("fields", FEED_FIELDS),
                ("limit", &limit),
                ("access_token", token.expose()),
            ],
        )?;
        let body: Paged<FeedItem> = self.get_json(url, &path).await?;

        let fetched = body.data.len();
        let posts: Vec<Post> = body.data.into_iter().filter_map(normalize_feed_item).collect();

        tracing::debug!(
            account_ref,
            fetched,
            kept = posts.len(),
            "fetched feed page"
        );
        Ok(posts)
    }

    /// Publishes `message` to the feed of page `page_id`, attaching `link`
    /// when given. Returns the id of the created post.
    ///
    /// # Errors
    ///
    /// Same as [`GraphClient::fetch_profile`].
    pub async fn publish_to_feed(
        &self,
        page_id: &str,
        token: &Credential,
        message: &str,
        link: Option<&str>,
    ) -> Result<String, GraphError> {
        let path = format!("{page_id}/feed");
        let url = self.build_url(&path, &[])?;
        let request = PublishRequest {
            message,
            access_token: token.expose(),
            link,
        };

        let response = self.client.post(url).json(&request).send().await?;
        let body: PublishResponse = Self::parse_response(response, &path).await?;

        tracing::debug!(page_id, remote_id = %body.id, "published post");
        Ok(body.id)
    }

    /// Builds `{base}/{version}/{path}?{params}` with every path segment and
    /// query value percent-encoded.
    fn build_url(&self, path: &str, params: &[(&str, &str)]) -> Result<Url, GraphError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| GraphError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .push(&self.api_version)
            .extend(path.split('/').filter(|s| !s.is_empty()));
        if !params.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (k, v) in params {
                pairs.append_pair(k, v);
            }
        }
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url, context: &str) -> Result<T, GraphError> {
        let response = self.client.get(url).send().await?;
        Self::parse_response(response, context).await
    }

    /// Reads the body, maps non-2xx statuses to [`GraphError::Api`] and
    /// deserializes the rest.
    async fn parse_response<T: DeserializeOwned>(
        response: Response,
        context: &str,
    ) -> Result<T, GraphError> {
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let envelope = serde_json::from_str::<ErrorEnvelope>(&body)
                .ok()
                .and_then(|e| e.error);
            if let Some(err) = &envelope {
                tracing::warn!(
                    context,
                    status = status.as_u16(),
                    code = ?err.code,
                    kind = ?err.kind,
                    "Graph API returned an error"
                );
            }
            return Err(GraphError::Api {
                status: status.as_u16(),
                message: envelope.and_then(|e| e.message),
            });
        }

        serde_json::from_str(&body).map_err(|e| GraphError::Deserialize {
            context: context.to_string(),
            source: e,
        })
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
