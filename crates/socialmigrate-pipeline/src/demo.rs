//! In-memory collaborators for running the wizard without network access.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use socialmigrate_core::{
    AuthError, ContentSink, ContentSource, Credential, IdentityProvider, Post, PostableTarget,
    Profile, RelevanceClassifier, SinkError, SourceFetchError,
};

use crate::orchestrator::Collaborators;

/// Credential the demo identity resolves to the legacy profile.
pub const DEMO_SOURCE_TOKEN: &str = "demo-source";
/// Credential the demo identity resolves to the new profile.
pub const DEMO_DESTINATION_TOKEN: &str = "demo-destination";

/// `(id, content, date, likes, image)`
const SAMPLE_POSTS: &[(&str, &str, &str, u64, Option<&str>)] = &[
    (
        "p1",
        "Just got tickets to the Rolling Stones concert! So excited! 🎸 #classic",
        "2019-05-12",
        45,
        Some("https://picsum.photos/id/145/400/300"),
    ),
    (
        "p2",
        "Delicious sushi for lunch today at the new downtown spot. 🍣",
        "2019-06-01",
        12,
        None,
    ),
    (
        "p3",
        "The acoustic set at the local cafe was surprisingly good last night.",
        "2019-07-20",
        23,
        None,
    ),
    (
        "p4",
        "Hiking up Mt. Rainier. The view is breathtaking! 🏔️",
        "2019-08-15",
        89,
        Some("https://picsum.photos/id/1018/400/300"),
    ),
    (
        "p5",
        "Anyone selling tickets to the EDM festival next weekend? DM me!",
        "2019-09-02",
        5,
        None,
    ),
    (
        "p6",
        "My cat just knocked over my coffee. Happy Monday. 🐈",
        "2019-10-10",
        150,
        None,
    ),
    (
        "p7",
        "Throwback to that insane mosh pit at the metal gig. My ears are still ringing.",
        "2020-01-15",
        67,
        Some("https://picsum.photos/id/452/400/300"),
    ),
    (
        "p8",
        "Coding all night long. React is fun but tiring.",
        "2020-03-01",
        42,
        None,
    ),
    (
        "p9",
        "Live music is finally back! Heading to the Jazz club tonight.",
        "2021-06-15",
        55,
        None,
    ),
    (
        "p10",
        "Just booked my flight to Tokyo! ✈️",
        "2022-11-20",
        112,
        None,
    ),
];

/// `(id, name, token, avatar)`
const SAMPLE_PAGES: &[(&str, &str, &str, &str)] = &[
    (
        "page_demo_1",
        "Alex's Photography Studio",
        "mock_token_1",
        "https://picsum.photos/id/250/100/100",
    ),
    (
        "page_demo_2",
        "Vintage Car Enthusiasts",
        "mock_token_2",
        "https://picsum.photos/id/111/100/100",
    ),
    (
        "page_demo_3",
        "Downtown Foodie Reviews",
        "mock_token_3",
        "https://picsum.photos/id/292/100/100",
    ),
];

/// The ten sample posts, newest last.
#[must_use]
pub fn sample_posts() -> Vec<Post> {
    SAMPLE_POSTS
        .iter()
        .map(|&(id, content, date, likes, image)| Post {
            id: id.to_string(),
            content: content.to_string(),
            date: date.to_string(),
            like_count: likes,
            image_url: image.map(str::to_string),
            original_author: "Alex Doe".to_string(),
        })
        .collect()
}

/// Demo identity, source and sink around `classifier`.
#[must_use]
pub fn collaborators(classifier: Arc<dyn RelevanceClassifier>) -> Collaborators {
    Collaborators {
        identity: Arc::new(DemoIdentity),
        source: Arc::new(DemoSource),
        sink: Arc::new(DemoSink::new()),
        classifier,
    }
}

/// Resolves the two demo tokens to fixed profiles. Any other non-empty token
/// is rejected, as is an empty one.
#[derive(Debug, Default, Clone, Copy)]
pub struct DemoIdentity;

#[async_trait]
impl IdentityProvider for DemoIdentity {
    async fn resolve_profile(&self, credential: &Credential) -> Result<Profile, AuthError> {
        let (id, name, avatar) = match credential.expose() {
            DEMO_SOURCE_TOKEN => (
                "demo_source",
                "Alex Doe (Old)",
                "https://picsum.photos/id/64/100/100",
            ),
            DEMO_DESTINATION_TOKEN => (
                "demo_destination",
                "Alex Doe (New)",
                "https://picsum.photos/id/65/100/100",
            ),
            _ => return Err(AuthError::new("Invalid OAuth access token.")),
        };
        Ok(Profile {
            id: id.to_string(),
            display_name: name.to_string(),
            avatar_uri: avatar.to_string(),
        })
    }

    async fn list_postable_targets(
        &self,
        credential: &Credential,
    ) -> Result<Vec<PostableTarget>, AuthError> {
        self.resolve_profile(credential).await?;
        Ok(SAMPLE_PAGES
            .iter()
            .map(|&(id, name, token, avatar)| PostableTarget {
                profile: Profile {
                    id: id.to_string(),
                    display_name: name.to_string(),
                    avatar_uri: avatar.to_string(),
                },
                post_credential: Credential::new(token),
            })
            .collect())
    }
}

/// Serves [`sample_posts`] for every account.
#[derive(Debug, Default, Clone, Copy)]
pub struct DemoSource;

#[async_trait]
impl ContentSource for DemoSource {
    async fn fetch_posts(
        &self,
        _credential: &Credential,
        _account_ref: &str,
        limit: usize,
    ) -> Result<Vec<Post>, SourceFetchError> {
        Ok(sample_posts().into_iter().take(limit).collect())
    }
}

/// Accepts every publish, optionally after a delay, and hands out sequential
/// remote ids.
#[derive(Debug, Default)]
pub struct DemoSink {
    delay: Duration,
    published: AtomicUsize,
}

impl DemoSink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sleep for `delay` before each publish.
    #[must_use]
    pub fn with_delay(delay: Duration) -> Self {
        Self {
            delay,
            published: AtomicUsize::new(0),
        }
    }

    #[must_use]
    pub fn published(&self) -> usize {
        self.published.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ContentSink for DemoSink {
    async fn publish(
        &self,
        account_ref: &str,
        _credential: &Credential,
        _text: &str,
        _image_uri: Option<&str>,
    ) -> Result<String, SinkError> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        let n = self.published.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(format!("{account_ref}_{n}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_posts_are_ten_in_date_order() {
        let posts = sample_posts();
        assert_eq!(posts.len(), 10);
        assert!(posts.windows(2).all(|w| w[0].date <= w[1].date));
        assert_eq!(posts[0].image_url.as_deref(), Some("https://picsum.photos/id/145/400/300"));
    }

    #[tokio::test]
    async fn demo_tokens_resolve_and_others_fail() {
        let identity = DemoIdentity;
        let old = identity
            .resolve_profile(&Credential::new(DEMO_SOURCE_TOKEN))
            .await
            .unwrap();
        assert_eq!(old.display_name, "Alex Doe (Old)");

        let err = identity
            .resolve_profile(&Credential::new("nope"))
            .await
            .unwrap_err();
        assert_eq!(err.message, "Invalid OAuth access token.");
    }

    #[tokio::test]
    async fn targets_carry_page_tokens() {
        let targets = DemoIdentity
            .list_postable_targets(&Credential::new(DEMO_DESTINATION_TOKEN))
            .await
            .unwrap();
        assert_eq!(targets.len(), 3);
        assert_eq!(targets[2].profile.id, "page_demo_3");
        assert_eq!(targets[2].post_credential.expose(), "mock_token_3");
    }

    #[tokio::test]
    async fn source_respects_limit() {
        let posts = DemoSource
            .fetch_posts(&Credential::new("t"), "me", 3)
            .await
            .unwrap();
        assert_eq!(posts.len(), 3);
    }

    #[tokio::test]
    async fn sink_hands_out_sequential_ids() {
        let sink = DemoSink::new();
        let cred = Credential::new("t");
        assert_eq!(sink.publish("page_1", &cred, "a", None).await.unwrap(), "page_1_1");
        assert_eq!(sink.publish("page_1", &cred, "b", None).await.unwrap(), "page_1_2");
        assert_eq!(sink.published(), 2);
    }
}
