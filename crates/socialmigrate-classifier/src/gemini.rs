//! Gemini `generateContent` client used as a relevance classifier.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};
use serde_json::json;
use socialmigrate_core::{AppConfig, Candidate, ClassifierError, RelevanceClassifier};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
const DEFAULT_MODEL: &str = "gemini-2.5-flash";
const API_KEY_HEADER: &str = "x-goog-api-key";

/// Classifier backed by the Gemini REST API.
///
/// The whole candidate set goes out in one request. A missing API key is not
/// a construction error: [`RelevanceClassifier::classify`] reports
/// [`ClassifierError::MissingApiKey`] instead, which callers degrade to "no
/// matches".
pub struct GeminiClassifier {
    client: Client,
    endpoint: Url,
    api_key: Option<String>,
}

#[derive(Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
    #[serde(rename = "generationConfig")]
    generation_config: serde_json::Value,
}

#[derive(Serialize, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<ResponseCandidate>,
}

#[derive(Deserialize)]
struct ResponseCandidate {
    #[serde(default)]
    content: Option<Content>,
}

#[derive(Deserialize)]
struct MatchedIds {
    #[serde(default)]
    ids: Vec<String>,
}

impl GeminiClassifier {
    /// Creates a classifier against the production endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`ClassifierError::Transport`] if the HTTP client cannot be
    /// built.
    pub fn new(api_key: Option<String>, timeout_secs: u64) -> Result<Self, ClassifierError> {
        Self::with_base_url(api_key, DEFAULT_BASE_URL, DEFAULT_MODEL, timeout_secs)
    }

    /// Creates a classifier from the application configuration.
    ///
    /// # Errors
    ///
    /// See [`GeminiClassifier::with_base_url`].
    pub fn from_config(config: &AppConfig) -> Result<Self, ClassifierError> {
        Self::with_base_url(
            config.gemini_api_key.clone(),
            &config.gemini_base_url,
            &config.gemini_model,
            config.request_timeout_secs,
        )
    }

    /// Creates a classifier with a custom base URL and model (for testing
    /// with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`ClassifierError::Transport`] if the HTTP client cannot be
    /// built or the endpoint URL is invalid.
    pub fn with_base_url(
        api_key: Option<String>,
        base_url: &str,
        model: &str,
        timeout_secs: u64,
    ) -> Result<Self, ClassifierError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| ClassifierError::Transport(e.to_string()))?;

        let raw = format!(
            "{}/v1beta/models/{model}:generateContent",
            base_url.trim_end_matches('/')
        );
        let endpoint = Url::parse(&raw)
            .map_err(|e| ClassifierError::Transport(format!("invalid endpoint '{raw}': {e}")))?;

        Ok(Self {
            client,
            endpoint,
            api_key: api_key.filter(|k| !k.trim().is_empty()),
        })
    }

    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    fn build_request(
        candidates: &[Candidate<'_>],
        topic: &str,
    ) -> Result<GenerateRequest, ClassifierError> {
        let posts = serde_json::to_string(candidates)
            .map_err(|e| ClassifierError::Malformed(format!("cannot encode candidates: {e}")))?;
        let prompt = format!(
            "You are a content filtering agent.\n\
             The user wants to find posts related to the topic: \"{topic}\".\n\n\
             Here is the list of posts:\n{posts}\n\n\
             Return a JSON object containing an array of \"ids\" for the posts that are \
             semantically related to the topic.\n\
             Be generous with the filtering (fuzzy match). If the topic is 'concerts', include \
             things about 'tickets', 'festivals', 'live music', 'gigs', etc."
        );

        Ok(GenerateRequest {
            contents: vec![Content {
                parts: vec![Part { text: Some(prompt) }],
            }],
            generation_config: json!({
                "responseMimeType": "application/json",
                "responseSchema": {
                    "type": "OBJECT",
                    "properties": {
                        "ids": { "type": "ARRAY", "items": { "type": "STRING" } }
                    }
                }
            }),
        })
    }

    /// Pulls the `{"ids": [...]}` document out of the first candidate's text.
    fn extract_ids(response: GenerateResponse) -> Result<Vec<String>, ClassifierError> {
        let text = response
            .candidates
            .into_iter()
            .filter_map(|c| c.content)
            .flat_map(|c| c.parts)
            .filter_map(|p| p.text)
            .find(|t| !t.trim().is_empty())
            .ok_or(ClassifierError::EmptyResponse)?;

        let parsed: MatchedIds = serde_json::from_str(text.trim())
            .map_err(|e| ClassifierError::Malformed(e.to_string()))?;
        Ok(parsed.ids)
    }
}

#[async_trait]
impl RelevanceClassifier for GeminiClassifier {
    async fn classify(
        &self,
        candidates: &[Candidate<'_>],
        topic: &str,
    ) -> Result<Vec<String>, ClassifierError> {
        let api_key = self.api_key.as_deref().ok_or(ClassifierError::MissingApiKey)?;
        let request = Self::build_request(candidates, topic)?;

        let response = self
            .client
            .post(self.endpoint.clone())
            .header(API_KEY_HEADER, api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| ClassifierError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            return Err(ClassifierError::Status(response.status().as_u16()));
        }

        let body: GenerateResponse = response
            .json()
            .await
            .map_err(|e| ClassifierError::Malformed(e.to_string()))?;

        let ids = Self::extract_ids(body)?;
        tracing::debug!(
            candidates = candidates.len(),
            matched = ids.len(),
            "gemini classification complete"
        );
        Ok(ids)
    }
}
