//! Graph API client for socialmigrate.
//!
//! Implements the identity, content source and content sink interfaces from
//! `socialmigrate-core` against the Graph REST API: profile lookup, managed
//! page listing, feed reads and page feed publishing.

pub mod client;
pub mod error;
pub mod normalize;
pub mod types;

mod collaborators;

pub use client::GraphClient;
pub use error::GraphError;
pub use normalize::{normalize_created_time, normalize_feed_item};
