//! Migration wizard: account bindings, candidate review, and the sequential
//! publish loop.

pub mod bindings;
pub mod candidates;
pub mod demo;
pub mod error;
pub mod log;
pub mod orchestrator;
pub mod relevance;
pub mod selection;
pub mod step;

pub use bindings::AccountBindings;
pub use candidates::fetch_candidates;
pub use error::{InvalidStateError, MigrateError};
pub use log::{ItemStatus, LogEntry, MigrationLog, MigrationReport, Progress};
pub use orchestrator::{Collaborators, ItemOutcome, Orchestrator, ReviewSummary};
pub use relevance::{MatchOutcome, MatchSet, RelevanceFilter};
pub use selection::SelectionSet;
pub use step::WizardStep;
