//! In-memory collaborators shared by the pipeline integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use socialmigrate_core::{
    AccountKind, AuthError, Candidate, ClassifierError, ContentSink, ContentSource, Credential,
    IdentityProvider, Post, PostableTarget, Profile, RelevanceClassifier, Role, SinkError,
    SourceFetchError,
};
use socialmigrate_pipeline::{Collaborators, Orchestrator};

pub const PERMISSION_ERROR: &str = "(#200) Permissions error";

pub fn post(id: &str, date: &str, content: &str) -> Post {
    Post {
        id: id.to_string(),
        content: content.to_string(),
        date: date.to_string(),
        like_count: 0,
        image_url: None,
        original_author: "Alex Doe".to_string(),
    }
}

pub fn profile(id: &str) -> Profile {
    Profile {
        id: id.to_string(),
        display_name: format!("User {id}"),
        avatar_uri: String::new(),
    }
}

/// Identity provider keyed by token. Unknown tokens are rejected.
#[derive(Default)]
pub struct StaticIdentity {
    pub profiles: HashMap<String, Profile>,
    pub targets: Vec<PostableTarget>,
}

impl StaticIdentity {
    pub fn with(mut self, token: &str, profile: Profile) -> Self {
        self.profiles.insert(token.to_string(), profile);
        self
    }

    pub fn with_target(mut self, id: &str, token: &str) -> Self {
        self.targets.push(PostableTarget {
            profile: profile(id),
            post_credential: Credential::new(token),
        });
        self
    }
}

#[async_trait]
impl IdentityProvider for StaticIdentity {
    async fn resolve_profile(&self, credential: &Credential) -> Result<Profile, AuthError> {
        self.profiles
            .get(credential.expose())
            .cloned()
            .ok_or_else(|| AuthError::new("Error validating access token: Session has expired"))
    }

    async fn list_postable_targets(
        &self,
        credential: &Credential,
    ) -> Result<Vec<PostableTarget>, AuthError> {
        self.resolve_profile(credential).await?;
        Ok(self.targets.clone())
    }
}

pub enum StaticSource {
    Posts(Vec<Post>),
    Failing(&'static str),
}

#[async_trait]
impl ContentSource for StaticSource {
    async fn fetch_posts(
        &self,
        _credential: &Credential,
        _account_ref: &str,
        limit: usize,
    ) -> Result<Vec<Post>, SourceFetchError> {
        match self {
            Self::Posts(posts) => Ok(posts.iter().take(limit).cloned().collect()),
            Self::Failing(message) => Err(SourceFetchError::new(*message)),
        }
    }
}

pub enum StaticClassifier {
    Ids(Vec<&'static str>),
    Failing,
}

#[async_trait]
impl RelevanceClassifier for StaticClassifier {
    async fn classify(
        &self,
        _candidates: &[Candidate<'_>],
        _topic: &str,
    ) -> Result<Vec<String>, ClassifierError> {
        match self {
            Self::Ids(ids) => Ok(ids.iter().map(|s| (*s).to_string()).collect()),
            Self::Failing => Err(ClassifierError::Transport("connection refused".to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishCall {
    pub account_ref: String,
    pub token: String,
    pub text: String,
    pub image_uri: Option<String>,
}

/// Records every publish. Fails any post whose text is in `failing_texts`.
#[derive(Default)]
pub struct RecordingSink {
    pub failing_texts: Vec<String>,
    pub calls: Mutex<Vec<PublishCall>>,
}

impl RecordingSink {
    pub fn failing_on(texts: &[&str]) -> Self {
        Self {
            failing_texts: texts.iter().map(|t| (*t).to_string()).collect(),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<PublishCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ContentSink for RecordingSink {
    async fn publish(
        &self,
        account_ref: &str,
        credential: &Credential,
        text: &str,
        image_uri: Option<&str>,
    ) -> Result<String, SinkError> {
        let mut calls = self.calls.lock().unwrap();
        calls.push(PublishCall {
            account_ref: account_ref.to_string(),
            token: credential.expose().to_string(),
            text: text.to_string(),
            image_uri: image_uri.map(str::to_string),
        });
        if self.failing_texts.iter().any(|t| t == text) {
            return Err(SinkError::new(PERMISSION_ERROR));
        }
        Ok(format!("{account_ref}_{}", calls.len()))
    }
}

pub struct Harness {
    pub orchestrator: Orchestrator,
    pub sink: Arc<RecordingSink>,
}

pub fn harness(posts: Vec<Post>, classifier: StaticClassifier, sink: RecordingSink) -> Harness {
    let identity = StaticIdentity::default()
        .with("src-token", profile("old"))
        .with("dst-token", profile("new"))
        .with_target("page_1", "page-token-1");
    harness_with(identity, StaticSource::Posts(posts), classifier, sink)
}

pub fn harness_with(
    identity: StaticIdentity,
    source: StaticSource,
    classifier: StaticClassifier,
    sink: RecordingSink,
) -> Harness {
    let sink = Arc::new(sink);
    let orchestrator = Orchestrator::new(
        Collaborators {
            identity: Arc::new(identity),
            source: Arc::new(source),
            sink: sink.clone(),
            classifier: Arc::new(classifier),
        },
        50,
    );
    Harness { orchestrator, sink }
}

/// Bind both roles directly, skipping the identity provider.
pub fn bind_both(orchestrator: &mut Orchestrator) {
    orchestrator
        .bind(
            Role::Source,
            AccountKind::Profile,
            profile("old"),
            Credential::new("src-token"),
        )
        .unwrap();
    orchestrator
        .bind(
            Role::Destination,
            AccountKind::Page,
            profile("page_1"),
            Credential::new("page-token-1"),
        )
        .unwrap();
}
