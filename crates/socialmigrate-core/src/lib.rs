//! Domain model, collaborator interfaces and configuration shared by the
//! socialmigrate crates.

pub mod account;
pub mod app_config;
pub mod collaborators;
pub mod config;
pub mod error;
pub mod post;

pub use account::{AccountBinding, AccountKind, Credential, PostableTarget, Profile, Role};
pub use app_config::{AppConfig, Environment};
pub use collaborators::{Candidate, ContentSink, ContentSource, IdentityProvider, RelevanceClassifier};
pub use config::{load_app_config, load_app_config_from_env};
pub use error::{AuthError, ClassifierError, ConfigError, CoreError, SinkError, SourceFetchError};
pub use post::{DateRange, Post, PREVIEW_CHARS};
