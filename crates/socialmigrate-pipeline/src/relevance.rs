//! Fail-soft wrapper around a [`RelevanceClassifier`].
//!
//! The wizard never fails because classification failed. Any classifier
//! error becomes an empty match set marked [`MatchOutcome::Degraded`], and the
//! user can still select posts by hand.

use std::collections::HashSet;
use std::sync::Arc;

use serde::Serialize;
use socialmigrate_core::{Candidate, Post, RelevanceClassifier};

/// How a [`MatchSet`] was produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MatchOutcome {
    Classified,
    Degraded { reason: String },
}

/// Candidate ids judged relevant to a topic.
///
/// Always a subset of the candidate ids it was computed from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchSet {
    ids: HashSet<String>,
    outcome: MatchOutcome,
}

impl MatchSet {
    #[must_use]
    pub fn empty() -> Self {
        Self {
            ids: HashSet::new(),
            outcome: MatchOutcome::Classified,
        }
    }

    fn degraded(reason: impl Into<String>) -> Self {
        Self {
            ids: HashSet::new(),
            outcome: MatchOutcome::Degraded {
                reason: reason.into(),
            },
        }
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> + Clone {
        self.ids.iter().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    #[must_use]
    pub fn outcome(&self) -> &MatchOutcome {
        &self.outcome
    }

    #[must_use]
    pub fn is_degraded(&self) -> bool {
        matches!(self.outcome, MatchOutcome::Degraded { .. })
    }
}

impl Default for MatchSet {
    fn default() -> Self {
        Self::empty()
    }
}

/// Adapter that turns classifier output into a [`MatchSet`].
#[derive(Clone)]
pub struct RelevanceFilter {
    classifier: Arc<dyn RelevanceClassifier>,
}

impl RelevanceFilter {
    #[must_use]
    pub fn new(classifier: Arc<dyn RelevanceClassifier>) -> Self {
        Self { classifier }
    }

    /// Classify `candidates` against `topic`. Never fails.
    ///
    /// With no candidates the classifier is not called. Ids the classifier
    /// returns that are not candidates are dropped.
    pub async fn classify(&self, candidates: &[Post], topic: &str) -> MatchSet {
        if candidates.is_empty() {
            return MatchSet::empty();
        }
        let topic = topic.trim();
        if topic.is_empty() {
            return MatchSet::degraded("empty topic");
        }

        let payload: Vec<Candidate<'_>> = candidates.iter().map(Candidate::from).collect();
        let returned = match self.classifier.classify(&payload, topic).await {
            Ok(ids) => ids,
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    candidates = candidates.len(),
                    "relevance classification failed, continuing with no matches"
                );
                return MatchSet::degraded(e.to_string());
            }
        };

        let known: HashSet<&str> = candidates.iter().map(|p| p.id.as_str()).collect();
        let returned_count = returned.len();
        let ids: HashSet<String> = returned
            .into_iter()
            .filter(|id| known.contains(id.as_str()))
            .collect();
        if ids.len() < returned_count {
            tracing::debug!(
                dropped = returned_count - ids.len(),
                "classifier returned ids outside the candidate set"
            );
        }

        MatchSet {
            ids,
            outcome: MatchOutcome::Classified,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use socialmigrate_core::ClassifierError;

    use super::*;

    struct Fixed {
        answer: Result<Vec<&'static str>, &'static str>,
        calls: AtomicUsize,
    }

    impl Fixed {
        fn ok(ids: Vec<&'static str>) -> Arc<Self> {
            Arc::new(Self {
                answer: Ok(ids),
                calls: AtomicUsize::new(0),
            })
        }

        fn failing(reason: &'static str) -> Arc<Self> {
            Arc::new(Self {
                answer: Err(reason),
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl RelevanceClassifier for Fixed {
        async fn classify(
            &self,
            _candidates: &[Candidate<'_>],
            _topic: &str,
        ) -> Result<Vec<String>, ClassifierError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.answer {
                Ok(ids) => Ok(ids.iter().map(|s| (*s).to_string()).collect()),
                Err(reason) => Err(ClassifierError::Transport((*reason).to_string())),
            }
        }
    }

    fn post(id: &str) -> Post {
        Post {
            id: id.to_string(),
            content: format!("content {id}"),
            date: "2020-01-01".to_string(),
            like_count: 0,
            image_url: None,
            original_author: "Alex Doe".to_string(),
        }
    }

    #[tokio::test]
    async fn keeps_only_candidate_ids() {
        let classifier = Fixed::ok(vec!["p1", "ghost"]);
        let filter = RelevanceFilter::new(classifier.clone());

        let set = filter.classify(&[post("p1"), post("p2")], "concerts").await;
        assert!(set.contains("p1"));
        assert!(!set.contains("ghost"));
        assert_eq!(set.len(), 1);
        assert_eq!(set.outcome(), &MatchOutcome::Classified);
    }

    #[tokio::test]
    async fn classifier_failure_degrades_to_empty() {
        let filter = RelevanceFilter::new(Fixed::failing("connection reset"));

        let set = filter.classify(&[post("p1")], "concerts").await;
        assert!(set.is_empty());
        assert!(set.is_degraded());
        match set.outcome() {
            MatchOutcome::Degraded { reason } => assert!(reason.contains("connection reset")),
            MatchOutcome::Classified => panic!("expected degraded outcome"),
        }
    }

    #[tokio::test]
    async fn no_candidates_skips_the_classifier() {
        let classifier = Fixed::ok(vec!["p1"]);
        let filter = RelevanceFilter::new(classifier.clone());

        let set = filter.classify(&[], "concerts").await;
        assert!(set.is_empty());
        assert!(!set.is_degraded());
        assert_eq!(classifier.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn blank_topic_is_degraded_without_a_call() {
        let classifier = Fixed::ok(vec!["p1"]);
        let filter = RelevanceFilter::new(classifier.clone());

        let set = filter.classify(&[post("p1")], "   ").await;
        assert!(set.is_degraded());
        assert_eq!(classifier.calls.load(Ordering::SeqCst), 0);
    }
}
