use socialmigrate_core::{AuthError, SourceFetchError};
use thiserror::Error;

use crate::step::WizardStep;

/// An operation was attempted in a step that does not allow it.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("cannot {action} while {step}")]
pub struct InvalidStateError {
    pub action: &'static str,
    pub step: WizardStep,
}

/// Errors surfaced by the migration orchestrator.
///
/// Per-item publish failures never appear here; they are recorded in the
/// migration log. Classifier failures never appear either.
#[derive(Debug, Error)]
pub enum MigrateError {
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    SourceFetch(#[from] SourceFetchError),

    #[error(transparent)]
    InvalidState(#[from] InvalidStateError),

    #[error("topic must not be empty")]
    EmptyTopic,

    #[error("post {0} is not among the current candidates")]
    UnknownPost(String),

    #[error("no postable target with id {0}")]
    UnknownTarget(String),
}
