//! Offline keyword classifier.
//!
//! Matches topic words against post words after light normalization, widened
//! through a small table of related terms. Good enough for demo data; the
//! hosted model is the real classifier.

use std::collections::HashSet;

use async_trait::async_trait;
use socialmigrate_core::{Candidate, ClassifierError, RelevanceClassifier};

/// Topic stems and the words that count as related to them.
pub(crate) const RELATED: &[(&str, &[&str])] = &[
    (
        "concert",
        &["gig", "festival", "ticket", "music", "band", "acoustic", "jazz", "mosh"],
    ),
    (
        "music",
        &["concert", "gig", "festival", "band", "acoustic", "jazz", "song"],
    ),
    (
        "food",
        &["lunch", "dinner", "breakfast", "sushi", "delicious", "restaurant"],
    ),
    ("travel", &["flight", "trip", "booked", "hiking", "vacation"]),
    ("pet", &["cat", "dog", "kitten", "puppy"]),
    ("code", &["coding", "programming", "react", "rust"]),
];

/// Words ignored when splitting a topic.
const STOPWORDS: &[&str] = &[
    "about", "and", "for", "from", "posts", "the", "that", "this", "with", "my", "of", "to",
];

/// Classifier that needs no network.
#[derive(Debug, Default, Clone, Copy)]
pub struct KeywordClassifier;

impl KeywordClassifier {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Expanded set of stems that count as a match for `topic`.
    fn topic_terms(topic: &str) -> HashSet<String> {
        let mut terms = HashSet::new();
        for word in words(topic) {
            if STOPWORDS.contains(&word.as_str()) {
                continue;
            }
            let stem = stem(&word).to_string();
            for &(key, related) in RELATED {
                if stem == key {
                    terms.extend(related.iter().map(|r| (*r).to_string()));
                }
            }
            terms.insert(stem);
        }
        terms
    }

    /// Whether any word of `content` matches one of `terms`.
    fn matches(content: &str, terms: &HashSet<String>) -> bool {
        words(content).any(|w| terms.contains(stem(&w)))
    }
}

#[async_trait]
impl RelevanceClassifier for KeywordClassifier {
    async fn classify(
        &self,
        candidates: &[Candidate<'_>],
        topic: &str,
    ) -> Result<Vec<String>, ClassifierError> {
        let terms = Self::topic_terms(topic);
        Ok(candidates
            .iter()
            .filter(|c| Self::matches(c.content, &terms))
            .map(|c| c.id.to_string())
            .collect())
    }
}

/// Lowercase alphabetic words of `text`.
fn words(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split_whitespace()
        .map(|w| w.trim_matches(|c: char| !c.is_alphabetic()).to_lowercase())
        .filter(|w| !w.is_empty())
}

/// Drops a plural `s` so `concerts` and `concert` compare equal.
fn stem(word: &str) -> &str {
    match word.strip_suffix('s') {
        Some(base) if base.len() >= 3 && !base.ends_with('s') => base,
        _ => word,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidates() -> Vec<Candidate<'static>> {
        vec![
            Candidate {
                id: "p1",
                content: "Just got tickets to the Rolling Stones concert! So excited!",
            },
            Candidate {
                id: "p6",
                content: "My cat just knocked over my coffee. Happy Monday.",
            },
            Candidate {
                id: "p9",
                content: "Live music is finally back! Heading to the Jazz club tonight.",
            },
        ]
    }

    #[tokio::test]
    async fn concerts_topic_matches_related_posts() {
        let ids = KeywordClassifier::new()
            .classify(&candidates(), "concerts")
            .await
            .unwrap();
        assert_eq!(ids, vec!["p1", "p9"]);
    }

    #[tokio::test]
    async fn pet_topic_matches_cat_post() {
        let ids = KeywordClassifier::new()
            .classify(&candidates(), "my pets")
            .await
            .unwrap();
        assert_eq!(ids, vec!["p6"]);
    }

    #[tokio::test]
    async fn unrelated_topic_matches_nothing() {
        let ids = KeywordClassifier::new()
            .classify(&candidates(), "quantum physics")
            .await
            .unwrap();
        assert!(ids.is_empty());
    }

    #[test]
    fn stem_keeps_short_and_double_s_words() {
        assert_eq!(stem("gigs"), "gig");
        assert_eq!(stem("bus"), "bus");
        assert_eq!(stem("class"), "class");
    }

    #[test]
    fn punctuation_is_stripped() {
        let collected: Vec<String> = words("concert! (live)").collect();
        assert_eq!(collected, vec!["concert", "live"]);
    }
}
