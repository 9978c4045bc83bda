use thiserror::Error;

/// Errors returned by the Graph API client.
#[derive(Debug, Error)]
pub enum GraphError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-2xx status. `message` is the
    /// `error.message` field of the response body when there was one.
    #[error("Graph API error (HTTP {status}): {}", .message.as_deref().unwrap_or("no message"))]
    Api {
        status: u16,
        message: Option<String>,
    },

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid Graph API URL: {0}")]
    InvalidUrl(String),
}

impl GraphError {
    /// Message to show for this error: the upstream message verbatim when the
    /// API supplied one, otherwise `fallback` followed by the error detail.
    #[must_use]
    pub fn describe(&self, fallback: &str) -> String {
        match self {
            GraphError::Api {
                message: Some(msg), ..
            } => msg.clone(),
            GraphError::Api { message: None, .. } => fallback.to_string(),
            other => format!("{fallback}: {other}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn describe_prefers_upstream_message() {
        let err = GraphError::Api {
            status: 400,
            message: Some("(#200) Permissions error".to_string()),
        };
        assert_eq!(err.describe("Failed to publish post"), "(#200) Permissions error");
    }

    #[test]
    fn describe_falls_back_without_message() {
        let err = GraphError::Api {
            status: 500,
            message: None,
        };
        assert_eq!(err.describe("Failed to fetch posts"), "Failed to fetch posts");
    }

    #[test]
    fn describe_wraps_other_errors() {
        let err = GraphError::InvalidUrl("nope".to_string());
        let msg = err.describe("Failed to fetch profile");
        assert!(msg.starts_with("Failed to fetch profile: "), "got {msg}");
    }
}
