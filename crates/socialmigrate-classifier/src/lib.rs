//! Relevance classifier backends.
//!
//! [`GeminiClassifier`] asks a hosted language model which posts relate to a
//! topic and expects a JSON `{"ids": [...]}` answer. [`KeywordClassifier`]
//! is an offline word-matching fallback used in demo mode and when no model
//! key is configured.

pub mod gemini;
pub mod keyword;

pub use gemini::GeminiClassifier;
pub use keyword::KeywordClassifier;
