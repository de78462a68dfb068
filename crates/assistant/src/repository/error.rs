//! Error types raised by history repositories.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("history repository lock was poisoned")]
    LockPoisoned,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("invalid profile name {0:?}: use 1-64 ASCII letters, digits, '-' or '_'")]
    InvalidProfile(String),
}

pub type Result<T> = std::result::Result<T, RepositoryError>;
