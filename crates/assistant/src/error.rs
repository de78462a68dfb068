//! Error types surfaced by the assistant.
//!
//! Behavior tree statuses only carry expected outcomes. Anything unexpected
//! (a collaborator going away, a broken invariant) is expressed with these
//! types and routed through the error channel or returned to the caller.

use thiserror::Error;

pub use crate::config::ConfigError;
pub use crate::repository::RepositoryError;

pub type Result<T> = std::result::Result<T, AssistantError>;

/// Failure reported by an external collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CollaboratorError {
    #[error("model unavailable: {0}")]
    ModelUnavailable(String),

    #[error("persistence failed: {0}")]
    Persistence(String),
}

/// Which external collaborator a failure came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum Collaborator {
    IntentClassifier,
    EntityExtractor,
    ModelUpdater,
    HistoryRepository,
}

#[derive(Debug, Error)]
pub enum AssistantError {
    #[error("query text is empty")]
    EmptyQuery,

    #[error("assistant requires a {0} to be configured before building")]
    MissingCollaborator(Collaborator),

    #[error("invariant violated: {0}")]
    InvariantViolation(String),

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}
